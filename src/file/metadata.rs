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

use std::collections::HashMap;
use std::convert::TryFrom;

use crate::basic::{Compression, Encoding, Type};
use crate::errors::{corrupt_meta_err, Result};
use crate::format;
use crate::schema::types::ColumnPath;

/// Decoded file metadata plus the per-row-group descriptors, as produced
/// once at open time.
pub struct ParquetMetaData {
  file_metadata: FileMetaData,
  row_groups: Vec<RowGroupMetaData>
}

impl ParquetMetaData {
  pub fn new(file_metadata: FileMetaData, row_groups: Vec<RowGroupMetaData>) -> Self {
    ParquetMetaData { file_metadata, row_groups }
  }

  pub fn file_metadata(&self) -> &FileMetaData {
    &self.file_metadata
  }

  pub fn num_row_groups(&self) -> usize {
    self.row_groups.len()
  }

  pub fn row_group(&self, i: usize) -> &RowGroupMetaData {
    &self.row_groups[i]
  }

  pub fn row_groups(&self) -> &[RowGroupMetaData] {
    self.row_groups.as_slice()
  }
}

/// Metadata for a Parquet file
pub struct FileMetaData {
  version: i32,
  num_rows: i64,
  created_by: Option<String>,
  key_value_metadata: Option<HashMap<String, String>>
}

impl FileMetaData {
  pub fn new(version: i32, num_rows: i64, created_by: Option<String>,
             key_value_metadata: Option<HashMap<String, String>>) -> Self {
    FileMetaData { version, num_rows, created_by, key_value_metadata }
  }

  pub fn version(&self) -> i32 {
    self.version
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn created_by(&self) -> Option<&String> {
    self.created_by.as_ref()
  }

  pub fn key_value_metadata(&self) -> Option<&HashMap<String, String>> {
    self.key_value_metadata.as_ref()
  }
}

/// Metadata for a row group
pub struct RowGroupMetaData {
  columns: Vec<ColumnChunkMetaData>,
  num_rows: i64,
  total_byte_size: i64
}

impl RowGroupMetaData {
  pub fn num_columns(&self) -> usize {
    self.columns.len()
  }

  pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
    &self.columns[i]
  }

  pub fn columns(&self) -> &[ColumnChunkMetaData] {
    &self.columns
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn total_byte_size(&self) -> i64 {
    self.total_byte_size
  }

  pub fn from_thrift(rg: format::RowGroup) -> Result<RowGroupMetaData> {
    let total_byte_size = rg.total_byte_size;
    let num_rows = rg.num_rows;
    if num_rows < 0 {
      return Err(corrupt_meta_err!("Row group declares {} rows", num_rows));
    }
    let mut columns = Vec::with_capacity(rg.columns.len());
    for c in rg.columns {
      columns.push(ColumnChunkMetaData::from_thrift(c)?);
    }
    Ok(RowGroupMetaData { columns, num_rows, total_byte_size })
  }
}

/// Decoded min/max/null-count statistics of a column chunk. Optional
/// throughout, and not required for correctness of the read path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
  min: Option<Vec<u8>>,
  max: Option<Vec<u8>>,
  null_count: Option<i64>,
  distinct_count: Option<i64>
}

impl Statistics {
  pub fn from_thrift(stats: format::Statistics) -> Self {
    // newer writers fill min_value/max_value, older ones min/max
    Statistics {
      min: stats.min_value.or(stats.min),
      max: stats.max_value.or(stats.max),
      null_count: stats.null_count,
      distinct_count: stats.distinct_count
    }
  }

  pub fn min(&self) -> Option<&[u8]> {
    self.min.as_deref()
  }

  pub fn max(&self) -> Option<&[u8]> {
    self.max.as_deref()
  }

  pub fn null_count(&self) -> Option<i64> {
    self.null_count
  }

  pub fn distinct_count(&self) -> Option<i64> {
    self.distinct_count
  }
}

/// Metadata for a column chunk
pub struct ColumnChunkMetaData {
  column_type: Type,
  column_path: ColumnPath,
  encodings: Vec<Encoding>,
  file_path: Option<String>,
  file_offset: i64,
  num_values: i64,
  compression: Compression,
  total_compressed_size: i64,
  total_uncompressed_size: i64,
  data_page_offset: i64,
  index_page_offset: Option<i64>,
  dictionary_page_offset: Option<i64>,
  statistics: Option<Statistics>
}

/// Represents common operations for a column chunk
impl ColumnChunkMetaData {
  /// File where the column chunk is stored. If not set, assumed to
  /// be at the same file as the metadata.
  /// This path is relative to the current file.
  pub fn file_path(&self) -> Option<&String> {
    self.file_path.as_ref()
  }

  /// Byte offset in `file_path()`.
  pub fn file_offset(&self) -> i64 {
    self.file_offset
  }

  /// Type of this column. Must be primitive.
  pub fn column_type(&self) -> Type {
    self.column_type
  }

  /// Path (or identifier) of this column
  pub fn column_path(&self) -> &ColumnPath {
    &self.column_path
  }

  /// All encodings used for this column
  pub fn encodings(&self) -> &[Encoding] {
    &self.encodings
  }

  /// Total number of values in this column chunk
  pub fn num_values(&self) -> i64 {
    self.num_values
  }

  pub fn compression(&self) -> Compression {
    self.compression
  }

  /// Get the total compressed data size of this column chunk
  pub fn compressed_size(&self) -> i64 {
    self.total_compressed_size
  }

  /// Get the total uncompressed data size of this column chunk
  pub fn uncompressed_size(&self) -> i64 {
    self.total_uncompressed_size
  }

  /// Get the offset for the column data
  pub fn data_page_offset(&self) -> i64 {
    self.data_page_offset
  }

  /// Whether this column chunk contains an index page
  pub fn has_index_page(&self) -> bool {
    self.index_page_offset.is_some()
  }

  /// Get the offset for the index page
  pub fn index_page_offset(&self) -> Option<i64> {
    self.index_page_offset
  }

  /// Whether this column chunk contains a dictionary page
  pub fn has_dictionary_page(&self) -> bool {
    self.dictionary_page_offset.is_some()
  }

  /// Get the offset for the dictionary page, if any
  pub fn dictionary_page_offset(&self) -> Option<i64> {
    self.dictionary_page_offset
  }

  pub fn statistics(&self) -> Option<&Statistics> {
    self.statistics.as_ref()
  }

  /// Byte offset where this chunk's page sequence starts: the dictionary
  /// page when one precedes the data pages, the first data page otherwise.
  pub fn start_offset(&self) -> i64 {
    match self.dictionary_page_offset {
      Some(dict_offset) if dict_offset >= 0 && dict_offset < self.data_page_offset => {
        dict_offset
      }
      _ => self.data_page_offset
    }
  }

  /// Conversion from Thrift
  pub fn from_thrift(cc: format::ColumnChunk) -> Result<Self> {
    let col_metadata = match cc.meta_data {
      Some(m) => m,
      None => return Err(corrupt_meta_err!("Expected to have column metadata"))
    };
    let column_type = Type::try_from(col_metadata.type_)?;
    let column_path = ColumnPath::new(col_metadata.path_in_schema);
    let mut encodings = Vec::with_capacity(col_metadata.encodings.len());
    for e in col_metadata.encodings {
      encodings.push(Encoding::try_from(e)?);
    }
    let compression = Compression::try_from(col_metadata.codec)?;
    let file_path = cc.file_path;
    let file_offset = cc.file_offset;
    let num_values = col_metadata.num_values;
    if num_values < 0 {
      return Err(corrupt_meta_err!("Column chunk declares {} values", num_values));
    }
    let total_compressed_size = col_metadata.total_compressed_size;
    let total_uncompressed_size = col_metadata.total_uncompressed_size;
    if total_compressed_size < 0 || total_uncompressed_size < 0 {
      return Err(corrupt_meta_err!("Column chunk declares negative byte sizes"));
    }
    let data_page_offset = col_metadata.data_page_offset;
    let index_page_offset = col_metadata.index_page_offset;
    let dictionary_page_offset = col_metadata.dictionary_page_offset;
    let statistics = col_metadata.statistics.map(Statistics::from_thrift);
    Ok(ColumnChunkMetaData {
      column_type,
      column_path,
      encodings,
      file_path,
      file_offset,
      num_values,
      compression,
      total_compressed_size,
      total_uncompressed_size,
      data_page_offset,
      index_page_offset,
      dictionary_page_offset,
      statistics
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_chunk(dictionary_page_offset: Option<i64>) -> format::ColumnChunk {
    format::ColumnChunk {
      file_path: None,
      file_offset: 4,
      meta_data: Some(format::ColumnMetaData {
        type_: 1,
        encodings: vec![0, 3, 8],
        path_in_schema: vec!["a".to_owned(), "b".to_owned()],
        codec: 1,
        num_values: 10,
        total_uncompressed_size: 100,
        total_compressed_size: 80,
        data_page_offset: 40,
        index_page_offset: None,
        dictionary_page_offset,
        statistics: Some(format::Statistics {
          null_count: Some(2),
          min_value: Some(vec![1, 0, 0, 0]),
          max_value: Some(vec![9, 0, 0, 0]),
          min: Some(vec![0, 0, 0, 0]),
          max: Some(vec![8, 0, 0, 0]),
          distinct_count: None
        })
      })
    }
  }

  #[test]
  fn test_column_chunk_from_thrift() {
    let cc = ColumnChunkMetaData::from_thrift(sample_chunk(Some(4))).unwrap();
    assert_eq!(cc.column_type(), Type::INT32);
    assert_eq!(cc.column_path().string(), "a.b");
    assert_eq!(cc.encodings(),
               &[Encoding::PLAIN, Encoding::RLE, Encoding::RLE_DICTIONARY]);
    assert_eq!(cc.compression(), Compression::SNAPPY);
    assert_eq!(cc.num_values(), 10);
    assert_eq!(cc.compressed_size(), 80);
    assert_eq!(cc.uncompressed_size(), 100);
    assert!(cc.has_dictionary_page());
    // dictionary precedes the data pages, so the chunk starts there
    assert_eq!(cc.start_offset(), 4);

    let stats = cc.statistics().unwrap();
    assert_eq!(stats.null_count(), Some(2));
    // min_value/max_value win over the deprecated min/max slots
    assert_eq!(stats.min(), Some(&[1, 0, 0, 0][..]));
    assert_eq!(stats.max(), Some(&[9, 0, 0, 0][..]));
  }

  #[test]
  fn test_column_chunk_start_offset_without_dictionary() {
    let cc = ColumnChunkMetaData::from_thrift(sample_chunk(None)).unwrap();
    assert!(!cc.has_dictionary_page());
    assert_eq!(cc.start_offset(), 40);
  }

  #[test]
  fn test_column_chunk_missing_metadata() {
    let cc = format::ColumnChunk { file_path: None, file_offset: 0, meta_data: None };
    assert!(ColumnChunkMetaData::from_thrift(cc).is_err());
  }

  #[test]
  fn test_row_group_from_thrift() {
    let rg = format::RowGroup {
      columns: vec![sample_chunk(None)],
      total_byte_size: 100,
      num_rows: 10
    };
    let rg = RowGroupMetaData::from_thrift(rg).unwrap();
    assert_eq!(rg.num_columns(), 1);
    assert_eq!(rg.num_rows(), 10);
    assert_eq!(rg.total_byte_size(), 100);
  }

  #[test]
  fn test_row_group_negative_rows() {
    let rg = format::RowGroup { columns: vec![], total_byte_size: 0, num_rows: -1 };
    assert!(RowGroupMetaData::from_thrift(rg).is_err());
  }
}
