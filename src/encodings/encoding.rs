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

//! PLAIN encoding, the inverse of `decoding::PlainDecoder`. Dictionary
//! page payloads are plain-encoded as well, so this is all that is needed
//! to synthesize page bytes.

use std::marker::PhantomData;
use std::mem;

use byteorder::{ByteOrder, LittleEndian};

use crate::basic::Encoding;
use crate::data_type::*;
use crate::errors::{invalid_err, Result};
use crate::util::bit_util::BitWriter;

pub trait Encoder<T: DataType> {
  /// Encode all values from `src`.
  fn put(&mut self, src: &[T::T]) -> Result<()>;

  /// Return the encoding type of this encoder.
  fn encoding(&self) -> Encoding;

  /// Take the byte buffer produced by this encoder, leaving it empty.
  fn consume_buffer(&mut self) -> Vec<u8>;
}

// ----------------------------------------------------------------------
// Plain encoding

pub struct PlainEncoder<T: DataType> {
  buffer: Vec<u8>,
  bit_writer: BitWriter,
  type_length: i32,
  _phantom: PhantomData<T>
}

impl<T: DataType> PlainEncoder<T> {
  pub fn new(type_length: i32) -> Self {
    Self {
      buffer: vec![],
      bit_writer: BitWriter::new(),
      type_length,
      _phantom: PhantomData
    }
  }
}

macro_rules! plain_fixed_width_enc_impl {
  ($ty:ty, $native_ty:ty) => {
    impl Encoder<$ty> for PlainEncoder<$ty> {
      fn put(&mut self, src: &[$native_ty]) -> Result<()> {
        for v in src {
          self.buffer.extend_from_slice(&v.to_le_bytes());
        }
        Ok(())
      }

      fn encoding(&self) -> Encoding {
        Encoding::PLAIN
      }

      fn consume_buffer(&mut self) -> Vec<u8> {
        mem::replace(&mut self.buffer, vec![])
      }
    }
  };
}

plain_fixed_width_enc_impl!(Int32Type, i32);
plain_fixed_width_enc_impl!(Int64Type, i64);
plain_fixed_width_enc_impl!(FloatType, f32);
plain_fixed_width_enc_impl!(DoubleType, f64);

impl Encoder<BoolType> for PlainEncoder<BoolType> {
  fn put(&mut self, src: &[bool]) -> Result<()> {
    for v in src {
      self.bit_writer.put_value(*v as u64, 1);
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }

  fn consume_buffer(&mut self) -> Vec<u8> {
    let writer = mem::replace(&mut self.bit_writer, BitWriter::new());
    writer.consume()
  }
}

impl Encoder<Int96Type> for PlainEncoder<Int96Type> {
  fn put(&mut self, src: &[Int96]) -> Result<()> {
    for v in src {
      for word in v.data() {
        let mut chunk = [0u8; 4];
        LittleEndian::write_u32(&mut chunk, *word);
        self.buffer.extend_from_slice(&chunk);
      }
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }

  fn consume_buffer(&mut self) -> Vec<u8> {
    mem::replace(&mut self.buffer, vec![])
  }
}

impl Encoder<ByteArrayType> for PlainEncoder<ByteArrayType> {
  fn put(&mut self, src: &[ByteArray]) -> Result<()> {
    for v in src {
      let mut len_bytes = [0u8; 4];
      LittleEndian::write_u32(&mut len_bytes, v.len() as u32);
      self.buffer.extend_from_slice(&len_bytes);
      self.buffer.extend_from_slice(v.data());
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }

  fn consume_buffer(&mut self) -> Vec<u8> {
    mem::replace(&mut self.buffer, vec![])
  }
}

impl Encoder<FixedLenByteArrayType> for PlainEncoder<FixedLenByteArrayType> {
  fn put(&mut self, src: &[ByteArray]) -> Result<()> {
    for v in src {
      if v.len() != self.type_length as usize {
        return Err(invalid_err!(
          "Fixed length value of {} bytes does not match type length {}",
          v.len(), self.type_length));
      }
      self.buffer.extend_from_slice(v.data());
    }
    Ok(())
  }

  fn encoding(&self) -> Encoding {
    Encoding::PLAIN
  }

  fn consume_buffer(&mut self) -> Vec<u8> {
    mem::replace(&mut self.buffer, vec![])
  }
}
