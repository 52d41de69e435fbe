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

use std::mem;
use std::str;

use crate::basic::Type;
use crate::errors::{corrupt_data_err, Result};
use crate::util::memory::BytePtr;

// ----------------------------------------------------------------------
// Types connect Parquet physical types with Rust-specific types

/// A 96-bit value, stored as three little-endian u32 words. Historically
/// used for nanosecond timestamps: words 0..2 are nanoseconds within the
/// day, word 2 is the Julian day.
#[derive(Clone, Debug, PartialEq)]
pub struct Int96 {
  value: [u32; 3]
}

impl Int96 {
  pub fn new() -> Self {
    Int96 { value: [0; 3] }
  }

  pub fn data(&self) -> &[u32] {
    &self.value
  }

  pub fn set_data(&mut self, v: [u32; 3]) {
    self.value = v;
  }
}

impl Default for Int96 {
  fn default() -> Self {
    Int96::new()
  }
}

impl From<[u32; 3]> for Int96 {
  fn from(v: [u32; 3]) -> Self {
    Int96 { value: v }
  }
}

/// A variable-length byte value backed by a shared buffer, so that decoded
/// values borrow the page they came from instead of copying.
#[derive(Clone, Debug)]
pub struct ByteArray {
  data: BytePtr
}

impl ByteArray {
  pub fn new() -> Self {
    ByteArray { data: BytePtr::default() }
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn data(&self) -> &[u8] {
    self.data.as_ref()
  }

  pub fn set_data(&mut self, data: BytePtr) {
    self.data = data;
  }

  pub fn as_utf8(&self) -> Result<&str> {
    str::from_utf8(self.data())
      .map_err(|e| corrupt_data_err!("Invalid UTF-8 in BYTE_ARRAY value: {}", e))
  }
}

impl Default for ByteArray {
  fn default() -> Self {
    ByteArray::new()
  }
}

impl PartialEq for ByteArray {
  fn eq(&self, other: &ByteArray) -> bool {
    self.data() == other.data()
  }
}

impl From<Vec<u8>> for ByteArray {
  fn from(v: Vec<u8>) -> Self {
    ByteArray { data: BytePtr::new(v) }
  }
}

impl From<&str> for ByteArray {
  fn from(s: &str) -> Self {
    ByteArray { data: BytePtr::new(s.as_bytes().to_vec()) }
  }
}

impl From<BytePtr> for ByteArray {
  fn from(p: BytePtr) -> Self {
    ByteArray { data: p }
  }
}

/// Marker trait binding a Parquet physical type to the Rust type values
/// decode into.
pub trait DataType {
  type T: PartialEq + ::std::fmt::Debug + Default + Clone;

  fn get_physical_type() -> Type;
  fn get_type_size() -> usize;
}

macro_rules! make_type {
  ($name:ident, $physical_ty:path, $native_ty:ty, $size:expr) => {
    pub struct $name {}

    impl DataType for $name {
      type T = $native_ty;

      fn get_physical_type() -> Type {
        $physical_ty
      }

      fn get_type_size() -> usize {
        $size
      }
    }
  };
}

/// Generate struct definitions for all physical types

make_type!(BoolType, Type::BOOLEAN, bool, 1);
make_type!(Int32Type, Type::INT32, i32, 4);
make_type!(Int64Type, Type::INT64, i64, 8);
make_type!(Int96Type, Type::INT96, Int96, 12);
make_type!(FloatType, Type::FLOAT, f32, 4);
make_type!(DoubleType, Type::DOUBLE, f64, 8);
make_type!(ByteArrayType, Type::BYTE_ARRAY, ByteArray, mem::size_of::<ByteArray>());
make_type!(FixedLenByteArrayType, Type::FIXED_LEN_BYTE_ARRAY,
           ByteArray, mem::size_of::<ByteArray>());

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_int96() {
    let mut value = Int96::new();
    assert_eq!(value.data(), &[0, 0, 0]);
    value.set_data([1, 2, 3]);
    assert_eq!(value.data(), &[1, 2, 3]);
    assert_eq!(Int96::from([1, 2, 3]), value);
  }

  #[test]
  fn test_byte_array() {
    let value = ByteArray::from("parquet");
    assert_eq!(value.len(), 7);
    assert_eq!(value.data(), b"parquet");
    assert_eq!(value.as_utf8().unwrap(), "parquet");
    assert_eq!(value, ByteArray::from(b"parquet".to_vec()));

    let invalid = ByteArray::from(vec![0xFF, 0xFE]);
    assert!(invalid.as_utf8().is_err());
  }

  #[test]
  fn test_physical_types() {
    assert_eq!(BoolType::get_physical_type(), Type::BOOLEAN);
    assert_eq!(Int32Type::get_physical_type(), Type::INT32);
    assert_eq!(Int64Type::get_physical_type(), Type::INT64);
    assert_eq!(Int96Type::get_physical_type(), Type::INT96);
    assert_eq!(FloatType::get_physical_type(), Type::FLOAT);
    assert_eq!(DoubleType::get_physical_type(), Type::DOUBLE);
    assert_eq!(ByteArrayType::get_physical_type(), Type::BYTE_ARRAY);
    assert_eq!(FixedLenByteArrayType::get_physical_type(), Type::FIXED_LEN_BYTE_ARRAY);

    assert_eq!(Int32Type::get_type_size(), 4);
    assert_eq!(Int64Type::get_type_size(), 8);
    assert_eq!(Int96Type::get_type_size(), 12);
  }
}
