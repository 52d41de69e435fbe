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

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::SeekFrom;

use byteorder::{ByteOrder, LittleEndian};

use crate::column::reader::{decode_chunk, DecodedColumn, SerializedPageReader};
use crate::errors::{corrupt_meta_err, invalid_err, not_parquet_err, ParquetError, Result};
use crate::file::metadata::{FileMetaData, ParquetMetaData, RowGroupMetaData};
use crate::format;
use crate::record::reader::{read_dataset, DataSet, RowIter};
use crate::schema::logical::LogicalSchema;
use crate::schema::projection::PathPredicate;
use crate::schema::types::{self, SchemaDescPtr, SchemaDescriptor};
use crate::thrift::CompactReader;
use crate::util::io::ByteSource;
use crate::util::memory::BytePtr;

const FOOTER_SIZE: u64 = 8;
const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];

/// Options that shape how decoded values are exposed.
#[derive(Debug, Clone)]
pub struct ParquetOptions {
  /// With this set (the default), BYTE_ARRAY leaves without a UTF8
  /// annotation are exposed as strings; otherwise as raw bytes. Leaves
  /// with the annotation are always strings.
  pub treat_byte_array_as_string: bool
}

impl Default for ParquetOptions {
  fn default() -> Self {
    ParquetOptions { treat_byte_array_as_string: true }
  }
}

/// Per-read options: pagination window and column projection.
#[derive(Debug, Clone)]
pub struct ReaderOptions {
  /// Number of leading rows to skip.
  pub offset: i64,
  /// Number of rows to read; -1 means all.
  pub count: i64,
  /// Path predicates selecting the columns to read; `None` reads all.
  pub columns: Option<Vec<PathPredicate>>
}

impl Default for ReaderOptions {
  fn default() -> Self {
    ReaderOptions { offset: 0, count: -1, columns: None }
  }
}

impl ReaderOptions {
  pub(crate) fn validate(&self) -> Result<()> {
    if self.offset < 0 {
      return Err(invalid_err!("offset must be non-negative, got {}", self.offset));
    }
    if self.count < -1 {
      return Err(invalid_err!("count must be -1 or non-negative, got {}", self.count));
    }
    Ok(())
  }
}

/// Open a Parquet reader over a byte source: validates both magic
/// markers, decodes the footer, and rebuilds the logical schema.
pub fn open<S: ByteSource>(source: S, options: ParquetOptions)
                           -> Result<SerializedFileReader<S>> {
  SerializedFileReader::new(source, options)
}

/// A Parquet file reader over any seekable byte source. Single-owner and
/// single-threaded: the source cursor is moved by footer and page reads.
pub struct SerializedFileReader<S: ByteSource> {
  source: RefCell<S>,
  metadata: ParquetMetaData,
  schema_descr: SchemaDescPtr,
  logical_schema: LogicalSchema,
  leaf_paths: Vec<String>,
  options: ParquetOptions
}

impl<S: ByteSource> SerializedFileReader<S> {
  pub fn new(mut source: S, options: ParquetOptions) -> Result<Self> {
    let (metadata, schema_descr) = Self::parse_metadata(&mut source)?;
    let logical_schema = LogicalSchema::from_descriptor(&schema_descr)?;
    let leaf_paths = logical_schema.leaf_paths();
    Ok(Self {
      source: RefCell::new(source),
      metadata,
      schema_descr,
      logical_schema,
      leaf_paths,
      options
    })
  }

  fn parse_metadata(source: &mut S) -> Result<(ParquetMetaData, SchemaDescPtr)> {
    let file_size = source.length();
    if file_size <= FOOTER_SIZE {
      return Err(not_parquet_err!(
        "file of {} bytes is smaller than the footer", file_size));
    }

    let mut head = [0u8; 4];
    source.seek(SeekFrom::Start(0))?;
    source.read_exact(&mut head)?;
    if head != PARQUET_MAGIC {
      return Err(not_parquet_err!("bad magic at the start of the file"));
    }

    let mut footer = [0u8; FOOTER_SIZE as usize];
    source.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
    source.read_exact(&mut footer)?;
    if footer[4..] != PARQUET_MAGIC {
      return Err(not_parquet_err!("bad magic at the end of the file"));
    }

    let metadata_len = LittleEndian::read_u32(&footer[0..4]) as u64;
    let footer_start = file_size - FOOTER_SIZE;
    // the metadata cannot reach into the leading magic
    if metadata_len + 4 > footer_start {
      return Err(corrupt_meta_err!(
        "footer length {} is inconsistent with file size {}", metadata_len, file_size));
    }
    let metadata_start = footer_start - metadata_len;
    source.seek(SeekFrom::Start(metadata_start))?;
    let mut metadata_buf = vec![0u8; metadata_len as usize];
    source.read_exact(&mut metadata_buf)?;

    let mut prot = CompactReader::new(&metadata_buf);
    let t_metadata = format::FileMetaData::read_from(&mut prot)?;

    if t_metadata.version != 1 && t_metadata.version != 2 {
      return Err(ParquetError::UnsupportedVersion(t_metadata.version));
    }
    if t_metadata.num_rows < 0 {
      return Err(corrupt_meta_err!(
        "file declares {} rows", t_metadata.num_rows));
    }

    let root = types::from_thrift(&t_metadata.schema)?;
    let schema_descr = SchemaDescPtr::new(SchemaDescriptor::new(root));

    let mut row_groups = Vec::with_capacity(t_metadata.row_groups.len());
    for rg in t_metadata.row_groups {
      row_groups.push(RowGroupMetaData::from_thrift(rg)?);
    }
    Self::validate_row_groups(&schema_descr, &row_groups, t_metadata.num_rows)?;

    let key_value_metadata = t_metadata.key_value_metadata.map(|kvs| {
      kvs.into_iter()
        .map(|kv| (kv.key, kv.value.unwrap_or_default()))
        .collect::<HashMap<_, _>>()
    });
    let file_metadata = FileMetaData::new(
      t_metadata.version,
      t_metadata.num_rows,
      t_metadata.created_by,
      key_value_metadata);
    Ok((ParquetMetaData::new(file_metadata, row_groups), schema_descr))
  }

  fn validate_row_groups(schema_descr: &SchemaDescriptor,
                         row_groups: &[RowGroupMetaData],
                         num_rows: i64) -> Result<()> {
    let total: i64 = row_groups.iter().map(|rg| rg.num_rows()).sum();
    if total != num_rows {
      return Err(corrupt_meta_err!(
        "row groups hold {} rows, file declares {}", total, num_rows));
    }
    for (i, rg) in row_groups.iter().enumerate() {
      if rg.num_columns() != schema_descr.num_columns() {
        return Err(corrupt_meta_err!(
          "row group {} has {} column chunks, schema has {} leaves",
          i, rg.num_columns(), schema_descr.num_columns()));
      }
      for (j, chunk) in rg.columns().iter().enumerate() {
        if chunk.column_path() != schema_descr.column(j).path() {
          return Err(corrupt_meta_err!(
            "column chunk {} of row group {} is at path {}, schema leaf is {}",
            j, i, chunk.column_path(), schema_descr.column(j).path()));
        }
      }
    }
    Ok(())
  }

  /// Metadata decoded from the footer.
  pub fn metadata(&self) -> &ParquetMetaData {
    &self.metadata
  }

  /// The hierarchical logical schema of this file.
  pub fn schema(&self) -> &LogicalSchema {
    &self.logical_schema
  }

  pub fn schema_descr(&self) -> &SchemaDescPtr {
    &self.schema_descr
  }

  pub fn total_rows(&self) -> i64 {
    self.metadata.file_metadata().num_rows()
  }

  pub(crate) fn parquet_options(&self) -> &ParquetOptions {
    &self.options
  }

  /// Logical dotted path of every leaf, indexed by leaf position.
  pub(crate) fn leaf_paths(&self) -> &[String] {
    &self.leaf_paths
  }

  /// Materialize the selected window of the file column by column.
  pub fn read_dataset(&self, options: ReaderOptions) -> Result<DataSet> {
    read_dataset(self, options)
  }

  /// Iterate the selected window of the file row by row, lazily: each row
  /// group is decoded when the iteration first reaches it.
  pub fn iter_rows(&self, options: ReaderOptions) -> Result<RowIter<S>> {
    RowIter::new(self, options)
  }

  /// Read the raw byte region of one column chunk and wrap it in a page
  /// reader, positioned per the chunk's dictionary/data page offsets.
  pub(crate) fn chunk_page_reader(&self, rg_index: usize,
                                  col_index: usize) -> Result<SerializedPageReader> {
    let chunk = self.metadata.row_group(rg_index).column(col_index);
    let start = chunk.start_offset();
    let len = chunk.compressed_size();
    if start < 4 || (start as u64) + (len as u64) > self.source.borrow().length() {
      return Err(corrupt_meta_err!(
        "column chunk {} spans bytes [{}, {}) outside the file",
        chunk.column_path(), start, start + len));
    }
    let mut source = self.source.borrow_mut();
    source.seek(SeekFrom::Start(start as u64))?;
    let mut buf = vec![0u8; len as usize];
    source.read_exact(&mut buf)?;
    SerializedPageReader::new(BytePtr::new(buf), chunk.num_values(), chunk.compression())
  }

  /// Decode one column chunk into its flat value/level streams.
  pub(crate) fn decode_leaf(&self, rg_index: usize,
                            col_index: usize) -> Result<DecodedColumn> {
    let pages = self.chunk_page_reader(rg_index, col_index)?;
    let descr = self.schema_descr.column(col_index);
    let total = self.metadata.row_group(rg_index).column(col_index).num_values();
    decode_chunk(pages, &descr, total, &self.options)
  }
}
