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

//! A reader for the Apache Parquet columnar file format.
//!
//! Reads a Parquet file either column by column into a [`DataSet`] or row
//! by row through a lazy iterator, reconstructing nested lists, maps and
//! structs from their striped (Dremel) encoding.
//!
//! # Example
//!
//! ```rust,no_run
//! use parquet_lite::{open, FileSource, ParquetOptions, ReaderOptions};
//!
//! let source = FileSource::open("data/alltypes_plain.parquet").unwrap();
//! let reader = open(source, ParquetOptions::default()).unwrap();
//!
//! println!("{} rows", reader.total_rows());
//! for row in reader.iter_rows(ReaderOptions::default()).unwrap() {
//!   println!("{}", row.unwrap());
//! }
//! ```

pub mod errors;

pub mod basic;
pub mod data_type;
pub mod thrift;

pub mod format;
pub mod util;

pub mod compression;
pub mod encodings;

pub mod column;
pub mod file;
pub mod record;
pub mod schema;

pub use crate::errors::{ParquetError, Result};
pub use crate::file::reader::{open, ParquetOptions, ReaderOptions, SerializedFileReader};
pub use crate::record::api::Value;
pub use crate::record::reader::{DataSet, RowIter};
pub use crate::schema::logical::{LogicalField, LogicalSchema};
pub use crate::schema::projection::PathPredicate;
pub use crate::util::io::{ByteSource, FileSource, MemorySource};
