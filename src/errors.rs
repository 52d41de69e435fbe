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

use std::io;
use std::result;

use quick_error::quick_error;

quick_error! {
  #[derive(Debug)]
  pub enum ParquetError {
    /// Input is not a Parquet file: missing/invalid magic markers or too small.
    NotParquet(message: String) {
      display("Not a Parquet file: {}", message)
    }
    /// Footer declares a format version this library does not read.
    UnsupportedVersion(version: i32) {
      display("Unsupported Parquet version: {}", version)
    }
    UnsupportedEncoding(message: String) {
      display("Unsupported encoding: {}", message)
    }
    UnsupportedCodec(message: String) {
      display("Unsupported compression codec: {}", message)
    }
    /// The footer or a page header failed to decode, or is internally
    /// inconsistent.
    CorruptMetadata(message: String) {
      display("Corrupt metadata: {}", message)
    }
    /// A page payload failed to decode: size mismatch, impossible bit
    /// width, dictionary index out of range, truncated stream.
    CorruptData(message: String) {
      display("Corrupt data: {}", message)
    }
    InvalidArgument(message: String) {
      display("Invalid argument: {}", message)
    }
    Io(message: String, err: io::Error) {
      from(err: io::Error) -> ("underlying IO error".to_owned(), err)
      display("IO error: {}, {}", message, err)
    }
    /// A column failed while assembling rows. Wraps the underlying error
    /// together with the dotted path of the failing column chunk.
    ColumnRead(path: String, cause: Box<ParquetError>) {
      display("Error reading column {}: {}", path, cause)
    }
  }
}

pub type Result<T> = result::Result<T, ParquetError>;

/// Convenient macros for the different error kinds

macro_rules! not_parquet_err {
  ($fmt:expr) => (crate::errors::ParquetError::NotParquet($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::NotParquet(format!($fmt, $($args),*)));
}

macro_rules! corrupt_meta_err {
  ($fmt:expr) => (crate::errors::ParquetError::CorruptMetadata($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::CorruptMetadata(format!($fmt, $($args),*)));
}

macro_rules! corrupt_data_err {
  ($fmt:expr) => (crate::errors::ParquetError::CorruptData($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::CorruptData(format!($fmt, $($args),*)));
}

macro_rules! invalid_err {
  ($fmt:expr) => (crate::errors::ParquetError::InvalidArgument($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::InvalidArgument(format!($fmt, $($args),*)));
}

macro_rules! unsupported_enc_err {
  ($fmt:expr) => (crate::errors::ParquetError::UnsupportedEncoding($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::UnsupportedEncoding(format!($fmt, $($args),*)));
}

macro_rules! unsupported_codec_err {
  ($fmt:expr) => (crate::errors::ParquetError::UnsupportedCodec($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) =>
    (crate::errors::ParquetError::UnsupportedCodec(format!($fmt, $($args),*)));
}

pub(crate) use corrupt_data_err;
pub(crate) use corrupt_meta_err;
pub(crate) use invalid_err;
pub(crate) use not_parquet_err;
pub(crate) use unsupported_codec_err;
pub(crate) use unsupported_enc_err;
