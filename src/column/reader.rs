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

//! Stream-decoding of one column chunk: page headers through the compact
//! protocol, codec application, level streams, and value decoding into
//! `Value`s. The output is the chunk's flat representation — one slot per
//! definition level, with `Value::Null` placeholders where the definition
//! level is below the leaf's maximum — plus the parallel level streams.

use std::convert::TryFrom;

use byteorder::{ByteOrder, LittleEndian};

use crate::basic::{Compression, Encoding, PageType, Type as PhysicalType};
use crate::column::page::{Page, PageReader};
use crate::compression::{create_codec, Codec};
use crate::data_type::*;
use crate::encodings::decoding::{Decoder, PlainDecoder};
use crate::encodings::levels::LevelDecoder;
use crate::encodings::rle::RleDecoder;
use crate::errors::{corrupt_data_err, corrupt_meta_err, unsupported_enc_err, Result};
use crate::file::reader::ParquetOptions;
use crate::format::PageHeader;
use crate::record::api::Value;
use crate::schema::types::ColumnDescriptor;
use crate::thrift::CompactReader;
use crate::util::memory::BytePtr;

// ----------------------------------------------------------------------
// Serialized page reader

/// Reads the page sequence of one column chunk out of its contiguous byte
/// region, decompressing payloads as they are requested.
pub struct SerializedPageReader {
  // the chunk's compressed byte region
  buf: BytePtr,

  // current position within `buf`
  offset: usize,

  codec: Option<Box<dyn Codec>>,

  // data-page values seen so far; the chunk is exhausted once this
  // reaches the chunk's declared value count
  seen_values: i64,
  total_values: i64
}

impl SerializedPageReader {
  pub fn new(buf: BytePtr, total_values: i64, codec: Compression) -> Result<Self> {
    Ok(Self {
      buf,
      offset: 0,
      codec: create_codec(codec)?,
      seen_values: 0,
      total_values
    })
  }

  fn decompress(&mut self, raw: BytePtr, uncompressed_size: usize) -> Result<BytePtr> {
    match self.codec {
      Some(ref mut codec) => {
        let mut out = Vec::new();
        let written = codec.decompress(raw.as_ref(), &mut out)?;
        if written != uncompressed_size {
          return Err(corrupt_data_err!(
            "Page decompressed to {} bytes, header declares {}",
            written, uncompressed_size));
        }
        out.truncate(written);
        Ok(BytePtr::new(out))
      }
      None => {
        if raw.len() != uncompressed_size {
          return Err(corrupt_data_err!(
            "Uncompressed page of {} bytes declares size {}",
            raw.len(), uncompressed_size));
        }
        Ok(raw)
      }
    }
  }
}

impl PageReader for SerializedPageReader {
  fn get_next_page(&mut self) -> Result<Option<Page>> {
    loop {
      if self.seen_values >= self.total_values || self.offset >= self.buf.len() {
        return Ok(None);
      }

      let header = {
        let remaining = &self.buf.as_ref()[self.offset..];
        let mut prot = CompactReader::new(remaining);
        let header = PageHeader::read_from(&mut prot)?;
        self.offset += prot.pos();
        header
      };
      if header.compressed_page_size < 0 || header.uncompressed_page_size < 0 {
        return Err(corrupt_data_err!(
          "Negative page size in page header at offset {}", self.offset));
      }
      let compressed_len = header.compressed_page_size as usize;
      if self.offset + compressed_len > self.buf.len() {
        return Err(corrupt_data_err!(
          "Page of {} bytes extends past the column chunk", compressed_len));
      }
      let raw = self.buf.range(self.offset, compressed_len);
      self.offset += compressed_len;

      match PageType::try_from(header.type_)? {
        PageType::INDEX_PAGE => continue,
        PageType::DATA_PAGE_V2 => {
          return Err(unsupported_enc_err!("DATA_PAGE_V2 pages are not supported"));
        }
        PageType::DICTIONARY_PAGE => {
          let dict_header = header.dictionary_page_header.ok_or_else(
            || corrupt_meta_err!("Dictionary page is missing its header"))?;
          let buf = self.decompress(raw, header.uncompressed_page_size as usize)?;
          return Ok(Some(Page::DictionaryPage {
            buf,
            num_values: dict_header.num_values as u32,
            encoding: Encoding::try_from(dict_header.encoding)?,
            is_sorted: dict_header.is_sorted.unwrap_or(false)
          }));
        }
        PageType::DATA_PAGE => {
          let data_header = header.data_page_header.ok_or_else(
            || corrupt_meta_err!("Data page is missing its header"))?;
          let buf = self.decompress(raw, header.uncompressed_page_size as usize)?;
          self.seen_values += data_header.num_values as i64;
          return Ok(Some(Page::DataPage {
            buf,
            num_values: data_header.num_values as u32,
            encoding: Encoding::try_from(data_header.encoding)?,
            def_level_encoding: Encoding::try_from(data_header.definition_level_encoding)?,
            rep_level_encoding: Encoding::try_from(data_header.repetition_level_encoding)?
          }));
        }
      }
    }
  }
}

// ----------------------------------------------------------------------
// Chunk decoding

/// One column chunk, fully decoded: `values` has one slot per definition
/// level (with `Value::Null` placeholders for absent values), and the two
/// level streams run parallel to it.
pub struct DecodedColumn {
  pub values: Vec<Value>,
  pub def_levels: Vec<i16>,
  pub rep_levels: Vec<i16>
}

/// Decode every page of one column chunk. `total_values` is the value
/// count the chunk metadata declares; decoding stops when it is reached
/// and fails if the pages do not add up to it.
pub fn decode_chunk<P: PageReader>(mut pages: P, descr: &ColumnDescriptor,
                                   total_values: i64,
                                   options: &ParquetOptions) -> Result<DecodedColumn> {
  let max_def = descr.max_def_level();
  let max_rep = descr.max_rep_level();

  let mut dictionary: Option<Vec<Value>> = None;
  let mut values: Vec<Value> = vec![];
  let mut def_levels: Vec<i16> = vec![];
  let mut rep_levels: Vec<i16> = vec![];

  while (values.len() as i64) < total_values {
    let page = match pages.get_next_page()? {
      Some(p) => p,
      None => break
    };
    match page {
      Page::DictionaryPage { buf, num_values, encoding, .. } => {
        if dictionary.is_some() {
          return Err(corrupt_data_err!(
            "Column chunk {} has more than one dictionary page", descr.path()));
        }
        match encoding {
          Encoding::PLAIN | Encoding::PLAIN_DICTIONARY => {}
          e => {
            return Err(unsupported_enc_err!(
              "Dictionary page encoding {} is not supported", e))
          }
        }
        dictionary = Some(decode_plain_values(buf, num_values as usize, descr, options)?);
      }
      Page::DataPage { buf, num_values, encoding, def_level_encoding, rep_level_encoding } => {
        let n = num_values as usize;
        let mut offset = 0;

        let page_rep = if max_rep > 0 {
          let stream = buf.start_from(offset);
          let mut decoder = LevelDecoder::new(rep_level_encoding, max_rep)?;
          offset += decoder.set_data(&stream, n)?;
          let mut levels = vec![0i16; n];
          let read = decoder.get(&mut levels)?;
          if read != n {
            return Err(corrupt_data_err!(
              "Repetition level stream has {} levels, page declares {}", read, n));
          }
          levels
        } else {
          vec![0i16; n]
        };

        let page_def = if max_def > 0 {
          let stream = buf.start_from(offset);
          let mut decoder = LevelDecoder::new(def_level_encoding, max_def)?;
          offset += decoder.set_data(&stream, n)?;
          let mut levels = vec![0i16; n];
          let read = decoder.get(&mut levels)?;
          if read != n {
            return Err(corrupt_data_err!(
              "Definition level stream has {} levels, page declares {}", read, n));
          }
          levels
        } else {
          vec![0i16; n]
        };

        let present_count = page_def.iter().filter(|d| **d == max_def).count();
        let payload = buf.start_from(offset);
        let decoded = decode_page_values(
          payload, encoding, present_count, descr, dictionary.as_deref(), options)?;

        let mut decoded_iter = decoded.into_iter();
        for d in &page_def {
          if *d == max_def {
            let v = decoded_iter.next().ok_or_else(
              || corrupt_data_err!("Value payload shorter than the present count"))?;
            values.push(v);
          } else {
            values.push(Value::Null);
          }
        }
        def_levels.extend_from_slice(&page_def);
        rep_levels.extend_from_slice(&page_rep);
      }
    }
  }

  if values.len() as i64 != total_values {
    return Err(corrupt_data_err!(
      "Column chunk {} decoded {} values, metadata declares {}",
      descr.path(), values.len(), total_values));
  }
  Ok(DecodedColumn { values, def_levels, rep_levels })
}

/// Decode `present_count` values from one data page payload.
fn decode_page_values(payload: BytePtr, encoding: Encoding, present_count: usize,
                      descr: &ColumnDescriptor, dictionary: Option<&[Value]>,
                      options: &ParquetOptions) -> Result<Vec<Value>> {
  if present_count == 0 {
    return Ok(vec![]);
  }
  match encoding {
    Encoding::PLAIN => decode_plain_values(payload, present_count, descr, options),
    Encoding::PLAIN_DICTIONARY | Encoding::RLE_DICTIONARY => {
      let dictionary = dictionary.ok_or_else(|| corrupt_data_err!(
        "Column chunk {} has a dictionary-encoded page but no dictionary page",
        descr.path()))?;
      if payload.is_empty() {
        return Err(corrupt_data_err!("Dictionary-encoded page payload is empty"));
      }
      let bit_width = payload.as_ref()[0] as usize;
      if bit_width > 32 {
        return Err(corrupt_data_err!(
          "Impossible dictionary index bit width {}", bit_width));
      }
      let mut decoder = RleDecoder::new(bit_width);
      decoder.set_data(payload.start_from(1));
      let mut out = vec![Value::Null; present_count];
      let read = decoder.get_batch_with_dict(dictionary, &mut out, present_count)?;
      if read != present_count {
        return Err(corrupt_data_err!(
          "Dictionary index stream has {} entries, page needs {}", read, present_count));
      }
      Ok(out)
    }
    Encoding::RLE => {
      // RLE as a value encoding is defined for BOOLEAN only, with the
      // same u32 length prefix as level streams
      if descr.physical_type() != PhysicalType::BOOLEAN {
        return Err(unsupported_enc_err!(
          "RLE value encoding is only supported for BOOLEAN, not {}",
          descr.physical_type()));
      }
      if payload.len() < 4 {
        return Err(corrupt_data_err!("Not enough bytes for RLE value stream"));
      }
      let stream_len = LittleEndian::read_u32(payload.as_ref()) as usize;
      if 4 + stream_len > payload.len() {
        return Err(corrupt_data_err!(
          "RLE value stream length {} exceeds page size {}", stream_len, payload.len() - 4));
      }
      let mut decoder = RleDecoder::new(1);
      decoder.set_data(payload.range(4, stream_len));
      let mut bools = vec![false; present_count];
      let read = decoder.get_batch(&mut bools)?;
      if read != present_count {
        return Err(corrupt_data_err!(
          "RLE value stream has {} values, page needs {}", read, present_count));
      }
      Ok(bools.into_iter()
        .map(|b| Value::convert_bool(descr.logical_type(), b))
        .collect())
    }
    e => Err(unsupported_enc_err!("Value encoding {} is not supported", e))
  }
}

fn plain_typed<T: DataType>(buf: BytePtr, count: usize,
                            type_length: i32) -> Result<Vec<T::T>>
where PlainDecoder<T>: Decoder<T> {
  let mut decoder: PlainDecoder<T> = PlainDecoder::new(type_length);
  decoder.set_data(buf, count)?;
  let mut out = vec![T::T::default(); count];
  let read = decoder.get(&mut out)?;
  if read != count {
    return Err(corrupt_data_err!("Expected {} values in page, decoded {}", count, read));
  }
  Ok(out)
}

/// PLAIN-decode `count` values of the leaf's physical type and convert
/// them to `Value`s according to its logical type.
fn decode_plain_values(buf: BytePtr, count: usize, descr: &ColumnDescriptor,
                       options: &ParquetOptions) -> Result<Vec<Value>> {
  let logical = descr.logical_type();
  let precision = descr.type_precision();
  let scale = descr.type_scale();
  let result = match descr.physical_type() {
    PhysicalType::BOOLEAN => {
      plain_typed::<BoolType>(buf, count, -1)?
        .into_iter()
        .map(|v| Value::convert_bool(logical, v))
        .collect()
    }
    PhysicalType::INT32 => {
      plain_typed::<Int32Type>(buf, count, -1)?
        .into_iter()
        .map(|v| Value::convert_int32(logical, precision, scale, v))
        .collect()
    }
    PhysicalType::INT64 => {
      plain_typed::<Int64Type>(buf, count, -1)?
        .into_iter()
        .map(|v| Value::convert_int64(logical, precision, scale, v))
        .collect()
    }
    PhysicalType::INT96 => {
      plain_typed::<Int96Type>(buf, count, -1)?
        .iter()
        .map(Value::convert_int96)
        .collect()
    }
    PhysicalType::FLOAT => {
      plain_typed::<FloatType>(buf, count, -1)?
        .into_iter()
        .map(|v| Value::convert_float(logical, v))
        .collect()
    }
    PhysicalType::DOUBLE => {
      plain_typed::<DoubleType>(buf, count, -1)?
        .into_iter()
        .map(|v| Value::convert_double(logical, v))
        .collect()
    }
    PhysicalType::BYTE_ARRAY => {
      let raw = plain_typed::<ByteArrayType>(buf, count, -1)?;
      let mut converted = Vec::with_capacity(raw.len());
      for v in raw {
        converted.push(Value::convert_byte_array(
          PhysicalType::BYTE_ARRAY, logical, precision, scale,
          options.treat_byte_array_as_string, v)?);
      }
      converted
    }
    PhysicalType::FIXED_LEN_BYTE_ARRAY => {
      let raw = plain_typed::<FixedLenByteArrayType>(buf, count, descr.type_length())?;
      let mut converted = Vec::with_capacity(raw.len());
      for v in raw {
        converted.push(Value::convert_byte_array(
          PhysicalType::FIXED_LEN_BYTE_ARRAY, logical, precision, scale,
          options.treat_byte_array_as_string, v)?);
      }
      converted
    }
  };
  Ok(result)
}
