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

//! The RLE/bit-packed hybrid integer encoding. A stream is a sequence of
//! runs, each preceded by a ULEB128 header `h`: if `h & 1 == 0` it is a
//! repeated run of `h >> 1` copies of a single little-endian value of
//! `ceil(bit_width/8)` bytes; if `h & 1 == 1` it is `(h >> 1) * 8` values
//! bit-packed LSB first at `bit_width` bits each. The decoder yields the
//! exact count requested by the caller; excess values from the last run
//! are discarded.

use std::cmp;

use crate::errors::{corrupt_data_err, Result};
use crate::util::bit_util::{self, BitReader, BitWriter, FromBits};
use crate::util::memory::BytePtr;

// ----------------------------------------------------------------------
// RLE/Bit-Packing Hybrid Decoder

pub struct RleDecoder {
  /// Number of bits used to encode the value
  bit_width: usize,

  /// Bit reader loaded with input buffer.
  bit_reader: Option<BitReader>,

  /// The remaining number of values in RLE for this run
  rle_left: u32,

  /// The remaining number of values in Bit-Packing for this run
  bit_packed_left: u32,

  /// The current value for the case of RLE mode
  current_value: u64
}

impl RleDecoder {
  pub fn new(bit_width: usize) -> Self {
    assert!(bit_width <= 32, "bit width {} out of range", bit_width);
    RleDecoder {
      bit_width,
      bit_reader: None,
      rle_left: 0,
      bit_packed_left: 0,
      current_value: 0
    }
  }

  pub fn set_data(&mut self, data: BytePtr) {
    self.bit_reader = Some(BitReader::new(data));
    self.rle_left = 0;
    self.bit_packed_left = 0;
    self.reload();
  }

  pub fn get_batch<T: FromBits>(&mut self, buffer: &mut [T]) -> Result<usize> {
    assert!(self.bit_reader.is_some(), "Must call set_data() first!");

    let max_values = buffer.len();
    let mut values_read = 0;
    while values_read < max_values {
      if self.rle_left > 0 {
        let num_values = cmp::min(max_values - values_read, self.rle_left as usize);
        for i in 0..num_values {
          buffer[values_read + i] = T::from_u64(self.current_value);
        }
        self.rle_left -= num_values as u32;
        values_read += num_values;
      } else if self.bit_packed_left > 0 {
        let num_values = cmp::min(max_values - values_read, self.bit_packed_left as usize);
        let bit_reader = self.bit_reader.as_mut().unwrap();
        for i in 0..num_values {
          match bit_reader.get_value::<T>(self.bit_width) {
            Some(v) => buffer[values_read + i] = v,
            None => return Err(corrupt_data_err!("Truncated bit-packed run"))
          }
        }
        self.bit_packed_left -= num_values as u32;
        values_read += num_values;
      } else if !self.reload() {
        break;
      }
    }

    Ok(values_read)
  }

  pub fn get_batch_with_dict<T>(&mut self, dict: &[T], buffer: &mut [T],
                                max_values: usize) -> Result<usize>
  where T: Default + Clone {
    assert!(buffer.len() >= max_values);
    assert!(self.bit_reader.is_some(), "Must call set_data() first!");

    let mut values_read = 0;
    while values_read < max_values {
      if self.rle_left > 0 {
        let num_values = cmp::min(max_values - values_read, self.rle_left as usize);
        let dict_idx = self.current_value as usize;
        if dict_idx >= dict.len() {
          return Err(corrupt_data_err!(
            "Dictionary index {} out of range [0, {})", dict_idx, dict.len()));
        }
        for i in 0..num_values {
          buffer[values_read + i] = dict[dict_idx].clone();
        }
        self.rle_left -= num_values as u32;
        values_read += num_values;
      } else if self.bit_packed_left > 0 {
        let num_values = cmp::min(max_values - values_read, self.bit_packed_left as usize);
        let bit_reader = self.bit_reader.as_mut().unwrap();
        for i in 0..num_values {
          let dict_idx = match bit_reader.get_value::<u32>(self.bit_width) {
            Some(v) => v as usize,
            None => return Err(corrupt_data_err!("Truncated bit-packed run"))
          };
          if dict_idx >= dict.len() {
            return Err(corrupt_data_err!(
              "Dictionary index {} out of range [0, {})", dict_idx, dict.len()));
          }
          buffer[values_read + i] = dict[dict_idx].clone();
        }
        self.bit_packed_left -= num_values as u32;
        values_read += num_values;
      } else if !self.reload() {
        break;
      }
    }

    Ok(values_read)
  }

  fn reload(&mut self) -> bool {
    let bit_reader = match self.bit_reader {
      Some(ref mut r) => r,
      None => return false
    };
    match bit_reader.get_vlq_int() {
      Some(indicator_value) => {
        if indicator_value & 1 == 1 {
          self.bit_packed_left = ((indicator_value >> 1) * 8) as u32;
        } else {
          self.rle_left = (indicator_value >> 1) as u32;
          let value_width = bit_util::ceil(self.bit_width as i64, 8) as usize;
          match bit_reader.get_aligned(value_width) {
            Some(v) => self.current_value = v,
            None => return false
          }
        }
        true
      }
      None => false
    }
  }
}

// ----------------------------------------------------------------------
// RLE/Bit-Packing Hybrid Encoder

/// Buffers values and emits the hybrid stream on `consume()`: runs of 8 or
/// more identical values become repeated runs, everything else is emitted
/// as bit-packed groups of 8. The trailing group is zero-padded; decoders
/// read only the value count they were asked for.
pub struct RleEncoder {
  bit_width: usize,
  values: Vec<u64>
}

impl RleEncoder {
  pub fn new(bit_width: usize) -> Self {
    assert!(bit_width <= 32, "bit width {} out of range", bit_width);
    RleEncoder { bit_width, values: vec![] }
  }

  #[inline]
  pub fn put(&mut self, value: u64) {
    self.values.push(value);
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn consume(self) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let vals = &self.values;
    let n = vals.len();
    let value_width = bit_util::ceil(self.bit_width as i64, 8) as usize;

    let mut i = 0;
    while i < n {
      let mut j = i + 1;
      while j < n && vals[j] == vals[i] {
        j += 1;
      }
      if j - i >= 8 {
        writer.put_vlq_int(((j - i) as u64) << 1);
        writer.put_aligned(vals[i], value_width);
        i = j;
      } else {
        // bit-packed group of 8, zero-padded at the tail of the stream
        let end = cmp::min(i + 8, n);
        writer.put_vlq_int(1 << 1 | 1);
        for k in i..i + 8 {
          let v = if k < end { vals[k] } else { 0 };
          writer.put_value(v, self.bit_width);
        }
        writer.flush();
        i = end;
      }
    }

    writer.consume()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rle_decode_int32() {
    // test data: 0-7 with bit width 3
    // 00000011 10001000 11000110 11111010
    let data = BytePtr::new(vec![0x03, 0x88, 0xC6, 0xFA]);
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(data);
    let mut buffer = vec![0i32; 8];
    let expected = vec![0, 1, 2, 3, 4, 5, 6, 7];
    let result = decoder.get_batch(&mut buffer);
    assert_eq!(result.unwrap(), 8);
    assert_eq!(buffer, expected);
  }

  #[test]
  fn test_rle_decode_bool() {
    // rle test data: 50 1s followed by 50 0s
    // 01100100 00000001 01100100 00000000
    let data1 = BytePtr::new(vec![0x64, 0x01, 0x64, 0x00]);

    // bit-packing test data: alternating 1s and 0s, 100 total
    // 100 / 8 = 13 groups
    // 00011011 10101010 ... 00001010
    let data2 = BytePtr::new(vec![0x1B, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA,
                                  0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0xAA, 0x0A]);

    let mut decoder = RleDecoder::new(1);
    decoder.set_data(data1);
    let mut buffer = vec![false; 100];
    let mut expected = vec![];
    for i in 0..100 {
      expected.push(i < 50);
    }
    let result = decoder.get_batch(&mut buffer);
    assert_eq!(result.unwrap(), 100);
    assert_eq!(buffer, expected);

    decoder.set_data(data2);
    let mut buffer = vec![false; 100];
    let mut expected = vec![];
    for i in 0..100 {
      expected.push(i % 2 != 0);
    }
    let result = decoder.get_batch(&mut buffer);
    assert_eq!(result.unwrap(), 100);
    assert_eq!(buffer, expected);
  }

  #[test]
  fn test_rle_decode_with_dict_int32() {
    // test RLE encoding: 3 0s followed by 4 1s followed by 5 2s
    // 00000110 00000000 00001000 00000001 00001010 00000010
    let dict = vec![10, 20, 30];
    let data = BytePtr::new(vec![0x06, 0x00, 0x08, 0x01, 0x0A, 0x02]);
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(data);
    let mut buffer = vec![0; 12];
    let expected = vec![10, 10, 10, 20, 20, 20, 20, 30, 30, 30, 30, 30];
    let result = decoder.get_batch_with_dict(&dict, &mut buffer, 12);
    assert_eq!(result.unwrap(), 12);
    assert_eq!(buffer, expected);

    // test bit-pack encoding: 345345345455 (2 groups: 8 and 4)
    // 011 100 101 011 100 101 011 100 101 100 101 101
    // 00000011 01100011 11000111 10001110 00000011 01100101 00001011
    let dict = vec!["aaa", "bbb", "ccc", "ddd", "eee", "fff"];
    let data = BytePtr::new(vec![0x03, 0x63, 0xC7, 0x8E, 0x03, 0x65, 0x0B]);
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(data);
    let mut buffer = vec![""; 12];
    let expected = vec!["ddd", "eee", "fff", "ddd", "eee", "fff",
                        "ddd", "eee", "fff", "eee", "fff", "fff"];
    let result = decoder.get_batch_with_dict(dict.as_slice(), buffer.as_mut_slice(), 12);
    assert_eq!(result.unwrap(), 12);
    assert_eq!(buffer, expected);
  }

  #[test]
  fn test_rle_decode_index_out_of_range() {
    // RLE run of 4 copies of index 5, but the dictionary has 3 entries
    let data = BytePtr::new(vec![0x08, 0x05]);
    let dict = vec![10, 20, 30];
    let mut decoder = RleDecoder::new(3);
    decoder.set_data(data);
    let mut buffer = vec![0; 4];
    assert!(decoder.get_batch_with_dict(&dict, &mut buffer, 4).is_err());
  }

  fn test_encode_roundtrip(bit_width: usize, values: &[u64]) {
    let mut encoder = RleEncoder::new(bit_width);
    for v in values {
      encoder.put(*v);
    }
    let data = encoder.consume();
    let mut decoder = RleDecoder::new(bit_width);
    decoder.set_data(BytePtr::new(data));
    let mut buffer = vec![0u64; values.len()];
    let result = decoder.get_batch(&mut buffer);
    assert_eq!(result.unwrap(), values.len());
    assert_eq!(buffer, values);
  }

  #[test]
  fn test_rle_encode_roundtrip() {
    // long runs become repeated runs
    test_encode_roundtrip(1, &[1; 100]);
    // alternating values become bit-packed groups, tail padded
    let alternating: Vec<u64> = (0..50).map(|i| i % 2).collect();
    test_encode_roundtrip(1, &alternating);
    // runs shorter than 8 interleaved with long runs
    let mut mixed = vec![7u64; 20];
    mixed.extend(vec![0, 1, 2, 3, 4, 5]);
    mixed.extend(vec![3u64; 11]);
    test_encode_roundtrip(3, &mixed);
    // max level 10 style widths
    let levels: Vec<u64> = (0..100).map(|i| i % 11).collect();
    test_encode_roundtrip(4, &levels);
    // empty stream
    test_encode_roundtrip(2, &[]);
  }
}
