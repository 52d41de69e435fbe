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

//! Enumerations mirroring the Parquet metadata model. The footer stores
//! these as raw Thrift i32 values; decoding is fallible because a file
//! may carry enum values newer than this library.

use std::convert::TryFrom;
use std::fmt;

use crate::errors::{corrupt_meta_err, unsupported_codec_err, unsupported_enc_err, ParquetError};

// ----------------------------------------------------------------------
// Types from the Thrift definition

/// Mirrors `parquet::Type` (physical leaf type)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Type {
  BOOLEAN,
  INT32,
  INT64,
  INT96,
  FLOAT,
  DOUBLE,
  BYTE_ARRAY,
  FIXED_LEN_BYTE_ARRAY
}

/// Mirrors `parquet::ConvertedType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum LogicalType {
  NONE,
  UTF8,
  MAP,
  MAP_KEY_VALUE,
  LIST,
  ENUM,
  DECIMAL,
  DATE,
  TIME_MILLIS,
  TIME_MICROS,
  TIMESTAMP_MILLIS,
  TIMESTAMP_MICROS,
  UINT_8,
  UINT_16,
  UINT_32,
  UINT_64,
  INT_8,
  INT_16,
  INT_32,
  INT_64,
  JSON,
  BSON,
  INTERVAL
}

/// Mirrors `parquet::FieldRepetitionType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repetition {
  REQUIRED,
  OPTIONAL,
  REPEATED
}

/// Mirrors `parquet::Encoding`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Encoding {
  PLAIN,
  PLAIN_DICTIONARY,
  RLE,
  BIT_PACKED,
  DELTA_BINARY_PACKED,
  DELTA_LENGTH_BYTE_ARRAY,
  DELTA_BYTE_ARRAY,
  RLE_DICTIONARY
}

/// Mirrors `parquet::CompressionCodec`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
  UNCOMPRESSED,
  SNAPPY,
  GZIP,
  LZO,
  BROTLI,
  LZ4,
  ZSTD
}

/// Mirrors `parquet::PageType`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum PageType {
  DATA_PAGE,
  INDEX_PAGE,
  DICTIONARY_PAGE,
  DATA_PAGE_V2
}

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl fmt::Display for LogicalType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl fmt::Display for Repetition {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl fmt::Display for Encoding {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl fmt::Display for Compression {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl fmt::Display for PageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

// ----------------------------------------------------------------------
// Conversions to/from the raw Thrift enum values

impl TryFrom<i32> for Type {
  type Error = ParquetError;

  fn try_from(value: i32) -> Result<Self, ParquetError> {
    match value {
      0 => Ok(Type::BOOLEAN),
      1 => Ok(Type::INT32),
      2 => Ok(Type::INT64),
      3 => Ok(Type::INT96),
      4 => Ok(Type::FLOAT),
      5 => Ok(Type::DOUBLE),
      6 => Ok(Type::BYTE_ARRAY),
      7 => Ok(Type::FIXED_LEN_BYTE_ARRAY),
      _ => Err(corrupt_meta_err!("Unknown physical type {}", value))
    }
  }
}

impl Type {
  pub fn as_i32(self) -> i32 {
    match self {
      Type::BOOLEAN => 0,
      Type::INT32 => 1,
      Type::INT64 => 2,
      Type::INT96 => 3,
      Type::FLOAT => 4,
      Type::DOUBLE => 5,
      Type::BYTE_ARRAY => 6,
      Type::FIXED_LEN_BYTE_ARRAY => 7
    }
  }
}

impl TryFrom<Option<i32>> for LogicalType {
  type Error = ParquetError;

  fn try_from(value: Option<i32>) -> Result<Self, ParquetError> {
    match value {
      None => Ok(LogicalType::NONE),
      Some(0) => Ok(LogicalType::UTF8),
      Some(1) => Ok(LogicalType::MAP),
      Some(2) => Ok(LogicalType::MAP_KEY_VALUE),
      Some(3) => Ok(LogicalType::LIST),
      Some(4) => Ok(LogicalType::ENUM),
      Some(5) => Ok(LogicalType::DECIMAL),
      Some(6) => Ok(LogicalType::DATE),
      Some(7) => Ok(LogicalType::TIME_MILLIS),
      Some(8) => Ok(LogicalType::TIME_MICROS),
      Some(9) => Ok(LogicalType::TIMESTAMP_MILLIS),
      Some(10) => Ok(LogicalType::TIMESTAMP_MICROS),
      Some(11) => Ok(LogicalType::UINT_8),
      Some(12) => Ok(LogicalType::UINT_16),
      Some(13) => Ok(LogicalType::UINT_32),
      Some(14) => Ok(LogicalType::UINT_64),
      Some(15) => Ok(LogicalType::INT_8),
      Some(16) => Ok(LogicalType::INT_16),
      Some(17) => Ok(LogicalType::INT_32),
      Some(18) => Ok(LogicalType::INT_64),
      Some(19) => Ok(LogicalType::JSON),
      Some(20) => Ok(LogicalType::BSON),
      Some(21) => Ok(LogicalType::INTERVAL),
      Some(v) => Err(corrupt_meta_err!("Unknown converted type {}", v))
    }
  }
}

impl LogicalType {
  pub fn as_i32(self) -> Option<i32> {
    match self {
      LogicalType::NONE => None,
      LogicalType::UTF8 => Some(0),
      LogicalType::MAP => Some(1),
      LogicalType::MAP_KEY_VALUE => Some(2),
      LogicalType::LIST => Some(3),
      LogicalType::ENUM => Some(4),
      LogicalType::DECIMAL => Some(5),
      LogicalType::DATE => Some(6),
      LogicalType::TIME_MILLIS => Some(7),
      LogicalType::TIME_MICROS => Some(8),
      LogicalType::TIMESTAMP_MILLIS => Some(9),
      LogicalType::TIMESTAMP_MICROS => Some(10),
      LogicalType::UINT_8 => Some(11),
      LogicalType::UINT_16 => Some(12),
      LogicalType::UINT_32 => Some(13),
      LogicalType::UINT_64 => Some(14),
      LogicalType::INT_8 => Some(15),
      LogicalType::INT_16 => Some(16),
      LogicalType::INT_32 => Some(17),
      LogicalType::INT_64 => Some(18),
      LogicalType::JSON => Some(19),
      LogicalType::BSON => Some(20),
      LogicalType::INTERVAL => Some(21)
    }
  }
}

impl TryFrom<i32> for Repetition {
  type Error = ParquetError;

  fn try_from(value: i32) -> Result<Self, ParquetError> {
    match value {
      0 => Ok(Repetition::REQUIRED),
      1 => Ok(Repetition::OPTIONAL),
      2 => Ok(Repetition::REPEATED),
      _ => Err(corrupt_meta_err!("Unknown repetition type {}", value))
    }
  }
}

impl Repetition {
  pub fn as_i32(self) -> i32 {
    match self {
      Repetition::REQUIRED => 0,
      Repetition::OPTIONAL => 1,
      Repetition::REPEATED => 2
    }
  }
}

impl TryFrom<i32> for Encoding {
  type Error = ParquetError;

  fn try_from(value: i32) -> Result<Self, ParquetError> {
    match value {
      0 => Ok(Encoding::PLAIN),
      2 => Ok(Encoding::PLAIN_DICTIONARY),
      3 => Ok(Encoding::RLE),
      4 => Ok(Encoding::BIT_PACKED),
      5 => Ok(Encoding::DELTA_BINARY_PACKED),
      6 => Ok(Encoding::DELTA_LENGTH_BYTE_ARRAY),
      7 => Ok(Encoding::DELTA_BYTE_ARRAY),
      8 => Ok(Encoding::RLE_DICTIONARY),
      _ => Err(unsupported_enc_err!("Unknown encoding {}", value))
    }
  }
}

impl Encoding {
  pub fn as_i32(self) -> i32 {
    match self {
      Encoding::PLAIN => 0,
      Encoding::PLAIN_DICTIONARY => 2,
      Encoding::RLE => 3,
      Encoding::BIT_PACKED => 4,
      Encoding::DELTA_BINARY_PACKED => 5,
      Encoding::DELTA_LENGTH_BYTE_ARRAY => 6,
      Encoding::DELTA_BYTE_ARRAY => 7,
      Encoding::RLE_DICTIONARY => 8
    }
  }
}

impl TryFrom<i32> for Compression {
  type Error = ParquetError;

  fn try_from(value: i32) -> Result<Self, ParquetError> {
    match value {
      0 => Ok(Compression::UNCOMPRESSED),
      1 => Ok(Compression::SNAPPY),
      2 => Ok(Compression::GZIP),
      3 => Ok(Compression::LZO),
      4 => Ok(Compression::BROTLI),
      5 => Ok(Compression::LZ4),
      6 => Ok(Compression::ZSTD),
      _ => Err(unsupported_codec_err!("Unknown compression codec {}", value))
    }
  }
}

impl Compression {
  pub fn as_i32(self) -> i32 {
    match self {
      Compression::UNCOMPRESSED => 0,
      Compression::SNAPPY => 1,
      Compression::GZIP => 2,
      Compression::LZO => 3,
      Compression::BROTLI => 4,
      Compression::LZ4 => 5,
      Compression::ZSTD => 6
    }
  }
}

impl TryFrom<i32> for PageType {
  type Error = ParquetError;

  fn try_from(value: i32) -> Result<Self, ParquetError> {
    match value {
      0 => Ok(PageType::DATA_PAGE),
      1 => Ok(PageType::INDEX_PAGE),
      2 => Ok(PageType::DICTIONARY_PAGE),
      3 => Ok(PageType::DATA_PAGE_V2),
      _ => Err(corrupt_meta_err!("Unknown page type {}", value))
    }
  }
}

impl PageType {
  pub fn as_i32(self) -> i32 {
    match self {
      PageType::DATA_PAGE => 0,
      PageType::INDEX_PAGE => 1,
      PageType::DICTIONARY_PAGE => 2,
      PageType::DATA_PAGE_V2 => 3
    }
  }
}
