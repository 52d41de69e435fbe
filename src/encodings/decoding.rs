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

use std::cmp;
use std::marker::PhantomData;

use byteorder::{ByteOrder, LittleEndian};

use crate::basic::Encoding;
use crate::data_type::*;
use crate::errors::{corrupt_data_err, Result};
use crate::util::bit_util::BitReader;
use crate::util::memory::BytePtr;

// ----------------------------------------------------------------------
// Decoders

pub trait Decoder<T: DataType> {
  /// Set the data to decode to be `data`, which should contain `num_values`
  /// of values to decode.
  fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()>;

  /// Consume values from this decoder and write the results to `buffer`.
  /// This will try to fill up `buffer`. Return the actual number of values
  /// written, which should be equal to `buffer.len()` unless the remaining
  /// number of values is less than that.
  fn get(&mut self, buffer: &mut [T::T]) -> Result<usize>;

  /// Number of values left in this decoder stream
  fn values_left(&self) -> usize;

  /// Return the encoding for this decoder
  fn encoding(&self) -> Encoding;
}

// ----------------------------------------------------------------------
// PLAIN Decoding

/// PLAIN decoding: type-specific little-endian for fixed-width types, a
/// 4-byte length prefix + bytes for BYTE_ARRAY, exactly `type_length`
/// bytes for FIXED_LEN_BYTE_ARRAY, 12 bytes for INT96, bit-packed bits for
/// BOOLEAN.
pub struct PlainDecoder<T: DataType> {
  // The remaining number of values in the byte array
  num_values: usize,

  // The current starting index in the byte array.
  start: usize,

  // The length for the type `T`. Only used when `T` is `FixedLenByteArrayType`
  type_length: i32,

  // The byte array to decode from. Not set if `T` is bool.
  data: Option<BytePtr>,

  // Read `data` bit by bit. Only set if `T` is bool.
  bit_reader: Option<BitReader>,

  // To allow `T` in the generic parameter for this struct. This doesn't take any space.
  _phantom: PhantomData<T>
}

impl<T: DataType> PlainDecoder<T> {
  pub fn new(type_length: i32) -> Self {
    PlainDecoder {
      data: None,
      bit_reader: None,
      type_length,
      num_values: 0,
      start: 0,
      _phantom: PhantomData
    }
  }
}

macro_rules! plain_fixed_width_impl {
  ($ty:ty, $native_ty:ty) => {
    impl Decoder<$ty> for PlainDecoder<$ty> {
      fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()> {
        self.num_values = num_values;
        self.start = 0;
        self.data = Some(data);
        Ok(())
      }

      fn get(&mut self, buffer: &mut [$native_ty]) -> Result<usize> {
        const SIZE: usize = ::std::mem::size_of::<$native_ty>();
        let data = self.data.as_ref()
          .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
        let num_values = cmp::min(buffer.len(), self.num_values);
        let bytes_to_decode = SIZE * num_values;
        if data.len() - self.start < bytes_to_decode {
          return Err(corrupt_data_err!("Not enough bytes to decode"));
        }
        let raw = &data.as_ref()[self.start..];
        for i in 0..num_values {
          let mut chunk = [0u8; SIZE];
          chunk.copy_from_slice(&raw[i * SIZE..(i + 1) * SIZE]);
          buffer[i] = <$native_ty>::from_le_bytes(chunk);
        }
        self.start += bytes_to_decode;
        self.num_values -= num_values;
        Ok(num_values)
      }

      fn values_left(&self) -> usize {
        self.num_values
      }

      fn encoding(&self) -> Encoding {
        Encoding::PLAIN
      }
    }
  };
}

plain_fixed_width_impl!(Int32Type, i32);
plain_fixed_width_impl!(Int64Type, i64);
plain_fixed_width_impl!(FloatType, f32);
plain_fixed_width_impl!(DoubleType, f64);

impl Decoder<BoolType> for PlainDecoder<BoolType> {
  fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()> {
    self.num_values = num_values;
    self.bit_reader = Some(BitReader::new(data));
    Ok(())
  }

  fn get(&mut self, buffer: &mut [bool]) -> Result<usize> {
    let bit_reader = self.bit_reader.as_mut()
      .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
    let num_values = cmp::min(buffer.len(), self.num_values);
    for i in 0..num_values {
      match bit_reader.get_value::<bool>(1) {
        Some(b) => buffer[i] = b,
        None => return Err(corrupt_data_err!("Not enough bytes to decode"))
      }
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<Int96Type> for PlainDecoder<Int96Type> {
  fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()> {
    self.num_values = num_values;
    self.start = 0;
    self.data = Some(data);
    Ok(())
  }

  fn get(&mut self, buffer: &mut [Int96]) -> Result<usize> {
    let data = self.data.as_ref()
      .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
    let num_values = cmp::min(buffer.len(), self.num_values);
    if data.len() - self.start < 12 * num_values {
      return Err(corrupt_data_err!("Not enough bytes to decode"));
    }
    for i in 0..num_values {
      let raw = &data.as_ref()[self.start..self.start + 12];
      buffer[i].set_data([
        LittleEndian::read_u32(&raw[0..4]),
        LittleEndian::read_u32(&raw[4..8]),
        LittleEndian::read_u32(&raw[8..12])
      ]);
      self.start += 12;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<ByteArrayType> for PlainDecoder<ByteArrayType> {
  fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()> {
    self.num_values = num_values;
    self.start = 0;
    self.data = Some(data);
    Ok(())
  }

  fn get(&mut self, buffer: &mut [ByteArray]) -> Result<usize> {
    let data = self.data.as_ref()
      .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
    let num_values = cmp::min(buffer.len(), self.num_values);
    for i in 0..num_values {
      if data.len() < self.start + 4 {
        return Err(corrupt_data_err!("Not enough bytes to decode"));
      }
      let len = LittleEndian::read_u32(&data.as_ref()[self.start..]) as usize;
      self.start += 4;
      if data.len() < self.start + len {
        return Err(corrupt_data_err!("Not enough bytes to decode"));
      }
      buffer[i].set_data(data.range(self.start, len));
      self.start += len;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}

impl Decoder<FixedLenByteArrayType> for PlainDecoder<FixedLenByteArrayType> {
  fn set_data(&mut self, data: BytePtr, num_values: usize) -> Result<()> {
    self.num_values = num_values;
    self.start = 0;
    self.data = Some(data);
    Ok(())
  }

  fn get(&mut self, buffer: &mut [ByteArray]) -> Result<usize> {
    if self.type_length <= 0 {
      return Err(corrupt_data_err!(
        "Invalid FIXED_LEN_BYTE_ARRAY length: {}", self.type_length));
    }
    let data = self.data.as_ref()
      .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
    let type_length = self.type_length as usize;
    let num_values = cmp::min(buffer.len(), self.num_values);
    for i in 0..num_values {
      if data.len() < self.start + type_length {
        return Err(corrupt_data_err!("Not enough bytes to decode"));
      }
      buffer[i].set_data(data.range(self.start, type_length));
      self.start += type_length;
    }
    self.num_values -= num_values;
    Ok(num_values)
  }

  fn values_left(&self) -> usize {
    self.num_values
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }
}
