// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Test support: random data and an in-memory Parquet file builder that
//! produces complete files (magic, pages, compact-Thrift footer) through
//! this crate's own encoders. Panics rather than propagating errors; it is
//! only meant to run under tests.

use rand::{thread_rng, Rng};

use crate::basic::{Compression, Encoding, PageType};
use crate::compression::create_codec;
use crate::data_type::{ByteArray, ByteArrayType, Int32Type, Int64Type};
use crate::encodings::encoding::{Encoder, PlainEncoder};
use crate::encodings::levels::LevelEncoder;
use crate::encodings::rle::RleEncoder;
use crate::format;
use crate::thrift::CompactWriter;

pub fn random_bytes(n: usize) -> Vec<u8> {
  let mut rng = thread_rng();
  (0..n).map(|_| rng.gen::<u8>()).collect()
}

// ----------------------------------------------------------------------
// Page payload helpers

pub fn plain_encode_i32(values: &[i32]) -> Vec<u8> {
  let mut encoder: PlainEncoder<Int32Type> = PlainEncoder::new(-1);
  encoder.put(values).expect("put() should be OK");
  encoder.consume_buffer()
}

pub fn plain_encode_i64(values: &[i64]) -> Vec<u8> {
  let mut encoder: PlainEncoder<Int64Type> = PlainEncoder::new(-1);
  encoder.put(values).expect("put() should be OK");
  encoder.consume_buffer()
}

pub fn plain_encode_strings(values: &[&str]) -> Vec<u8> {
  let byte_arrays: Vec<ByteArray> = values.iter().map(|s| ByteArray::from(*s)).collect();
  let mut encoder: PlainEncoder<ByteArrayType> = PlainEncoder::new(-1);
  encoder.put(&byte_arrays).expect("put() should be OK");
  encoder.consume_buffer()
}

/// The payload of a dictionary-encoded data page: a leading bit-width
/// byte, then the hybrid-encoded index stream.
pub fn rle_dict_indices(bit_width: usize, indices: &[u64]) -> Vec<u8> {
  let mut encoder = RleEncoder::new(bit_width);
  for idx in indices {
    encoder.put(*idx);
  }
  let mut out = vec![bit_width as u8];
  out.extend(encoder.consume());
  out
}

// ----------------------------------------------------------------------
// Page builders

pub struct DataPageSpec {
  pub encoding: Encoding,
  pub num_values: usize,
  pub rep_levels: Vec<i16>,
  pub def_levels: Vec<i16>,
  pub value_bytes: Vec<u8>
}

/// Serialize one v1 data page: header, then the (optionally compressed)
/// concatenation of prefixed repetition levels, prefixed definition
/// levels, and value bytes.
pub fn build_data_page(codec: Compression, max_def: i16, max_rep: i16,
                       spec: &DataPageSpec) -> Vec<u8> {
  let mut body = vec![];
  if max_rep > 0 {
    let mut encoder = LevelEncoder::new(max_rep);
    encoder.put(&spec.rep_levels);
    body.extend(encoder.consume());
  }
  if max_def > 0 {
    let mut encoder = LevelEncoder::new(max_def);
    encoder.put(&spec.def_levels);
    body.extend(encoder.consume());
  }
  body.extend_from_slice(&spec.value_bytes);

  let uncompressed_size = body.len();
  let body = compress_body(codec, body);

  let header = format::PageHeader {
    type_: PageType::DATA_PAGE.as_i32(),
    uncompressed_page_size: uncompressed_size as i32,
    compressed_page_size: body.len() as i32,
    crc: None,
    data_page_header: Some(format::DataPageHeader {
      num_values: spec.num_values as i32,
      encoding: spec.encoding.as_i32(),
      definition_level_encoding: Encoding::RLE.as_i32(),
      repetition_level_encoding: Encoding::RLE.as_i32(),
      statistics: None
    }),
    dictionary_page_header: None
  };
  serialize_page(header, body)
}

/// Serialize one dictionary page holding `num_values` plain-encoded values.
pub fn build_dictionary_page(codec: Compression, num_values: usize,
                             value_bytes: Vec<u8>) -> Vec<u8> {
  let uncompressed_size = value_bytes.len();
  let body = compress_body(codec, value_bytes);
  let header = format::PageHeader {
    type_: PageType::DICTIONARY_PAGE.as_i32(),
    uncompressed_page_size: uncompressed_size as i32,
    compressed_page_size: body.len() as i32,
    crc: None,
    data_page_header: None,
    dictionary_page_header: Some(format::DictionaryPageHeader {
      num_values: num_values as i32,
      encoding: Encoding::PLAIN_DICTIONARY.as_i32(),
      is_sorted: Some(false)
    })
  };
  serialize_page(header, body)
}

fn compress_body(codec: Compression, body: Vec<u8>) -> Vec<u8> {
  match create_codec(codec).expect("codec should be supported") {
    Some(mut c) => c.compress(&body).expect("compress should be OK"),
    None => body
  }
}

fn serialize_page(header: format::PageHeader, body: Vec<u8>) -> Vec<u8> {
  let mut writer = CompactWriter::new();
  header.write_to(&mut writer);
  let mut out = writer.into_inner();
  out.extend(body);
  out
}

// ----------------------------------------------------------------------
// Whole-file builder

/// One column chunk of one row group: pre-built page bytes plus the
/// metadata the footer will declare for them.
pub struct ChunkSpec {
  pub path: Vec<String>,
  /// raw physical type id for ColumnMetaData
  pub type_: i32,
  pub codec: Compression,
  pub num_values: i64,
  pub dict_page: Option<Vec<u8>>,
  pub data_pages: Vec<Vec<u8>>
}

/// Accumulates page bytes and row-group metadata, then writes the footer.
/// The output is a byte-complete Parquet file.
pub struct FileBuilder {
  out: Vec<u8>,
  schema: Vec<format::SchemaElement>,
  row_groups: Vec<format::RowGroup>,
  total_rows: i64
}

impl FileBuilder {
  pub fn new(schema: Vec<format::SchemaElement>) -> Self {
    FileBuilder {
      out: b"PAR1".to_vec(),
      schema,
      row_groups: vec![],
      total_rows: 0
    }
  }

  pub fn add_row_group(&mut self, num_rows: i64, chunks: Vec<ChunkSpec>) {
    let mut columns = vec![];
    let mut total_byte_size = 0i64;
    for chunk in chunks {
      let start = self.out.len() as i64;
      let dictionary_page_offset = chunk.dict_page.as_ref().map(|_| start);
      if let Some(dict) = chunk.dict_page {
        self.out.extend(dict);
      }
      let data_page_offset = self.out.len() as i64;
      for page in chunk.data_pages {
        self.out.extend(page);
      }
      let chunk_len = self.out.len() as i64 - start;
      total_byte_size += chunk_len;
      columns.push(format::ColumnChunk {
        file_path: None,
        file_offset: start,
        meta_data: Some(format::ColumnMetaData {
          type_: chunk.type_,
          encodings: vec![Encoding::PLAIN.as_i32(), Encoding::RLE.as_i32()],
          path_in_schema: chunk.path,
          codec: chunk.codec.as_i32(),
          num_values: chunk.num_values,
          total_uncompressed_size: chunk_len,
          total_compressed_size: chunk_len,
          data_page_offset,
          index_page_offset: None,
          dictionary_page_offset,
          statistics: None
        })
      });
    }
    self.row_groups.push(format::RowGroup {
      columns,
      total_byte_size,
      num_rows
    });
    self.total_rows += num_rows;
  }

  pub fn finish(self, version: i32) -> Vec<u8> {
    let metadata = format::FileMetaData {
      version,
      schema: self.schema,
      num_rows: self.total_rows,
      row_groups: self.row_groups,
      key_value_metadata: None,
      created_by: Some("parquet-lite test writer".to_owned())
    };
    let mut writer = CompactWriter::new();
    metadata.write_to(&mut writer);
    let footer = writer.into_inner();

    let mut out = self.out;
    out.extend_from_slice(&footer);
    out.extend_from_slice(&(footer.len() as u32).to_le_bytes());
    out.extend_from_slice(b"PAR1");
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_random_bytes() {
    assert_eq!(random_bytes(64).len(), 64);
  }

  #[test]
  fn test_file_builder_layout() {
    let schema = vec![
      format::SchemaElement {
        name: "schema".to_owned(),
        num_children: Some(1),
        ..Default::default()
      },
      format::SchemaElement {
        type_: Some(1),
        repetition_type: Some(0),
        name: "a".to_owned(),
        ..Default::default()
      },
    ];
    let mut builder = FileBuilder::new(schema);
    let page = build_data_page(Compression::UNCOMPRESSED, 0, 0, &DataPageSpec {
      encoding: Encoding::PLAIN,
      num_values: 2,
      rep_levels: vec![],
      def_levels: vec![],
      value_bytes: plain_encode_i32(&[1, 2])
    });
    builder.add_row_group(2, vec![ChunkSpec {
      path: vec!["a".to_owned()],
      type_: 1,
      codec: Compression::UNCOMPRESSED,
      num_values: 2,
      dict_page: None,
      data_pages: vec![page]
    }]);
    let data = builder.finish(1);

    // both magic markers in place, footer length consistent
    assert_eq!(&data[..4], b"PAR1");
    assert_eq!(&data[data.len() - 4..], b"PAR1");
    let footer_len = u32::from_le_bytes([
      data[data.len() - 8],
      data[data.len() - 7],
      data[data.len() - 6],
      data[data.len() - 5]
    ]) as usize;
    assert!(footer_len + 12 <= data.len());
  }
}
