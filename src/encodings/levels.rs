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

//! Definition/repetition level streams of v1 data pages. The usual form is
//! the RLE/bit-packed hybrid prefixed by its own little-endian u32 byte
//! length; the legacy BIT_PACKED form has no prefix and packs values MSB
//! first at `ceil(log2(max_level + 1))` bits each.

use byteorder::{ByteOrder, LittleEndian};

use crate::basic::Encoding;
use crate::encodings::rle::{RleDecoder, RleEncoder};
use crate::errors::{corrupt_data_err, Result};
use crate::util::bit_util::{ceil, num_required_bits};
use crate::util::memory::BytePtr;

/// A decoder for definition/repetition levels. This is a thin wrapper on
/// `RleDecoder`, with a fallback for the legacy BIT_PACKED encoding.
pub struct LevelDecoder {
  encoding: Encoding,
  bit_width: usize,
  rle_decoder: Option<RleDecoder>,
  packed_data: Option<BytePtr>,
  packed_bit_pos: usize
}

impl LevelDecoder {
  pub fn new(encoding: Encoding, max_level: i16) -> Result<Self> {
    match encoding {
      Encoding::RLE | Encoding::BIT_PACKED => {}
      e => {
        return Err(crate::errors::unsupported_enc_err!(
          "Level encoding {} is not supported", e))
      }
    }
    let bit_width = num_required_bits(max_level as u64);
    Ok(Self {
      encoding,
      bit_width,
      rle_decoder: None,
      packed_data: None,
      packed_bit_pos: 0
    })
  }

  /// Point this decoder at the level stream for one page, which starts at
  /// the beginning of `data`. `num_buffered_values` is the page's value
  /// count, needed to size the unprefixed BIT_PACKED form. Returns the
  /// number of bytes the stream occupies.
  pub fn set_data(&mut self, data: &BytePtr, num_buffered_values: usize) -> Result<usize> {
    match self.encoding {
      Encoding::RLE => {
        if data.len() < 4 {
          return Err(corrupt_data_err!("Not enough bytes for level stream length prefix"));
        }
        let stream_len = LittleEndian::read_u32(data.as_ref()) as usize;
        if 4 + stream_len > data.len() {
          return Err(corrupt_data_err!(
            "Level stream length {} exceeds page size {}", stream_len, data.len() - 4));
        }
        let mut rle = RleDecoder::new(self.bit_width);
        rle.set_data(data.range(4, stream_len));
        self.rle_decoder = Some(rle);
        Ok(4 + stream_len)
      }
      Encoding::BIT_PACKED => {
        let num_bytes = ceil((num_buffered_values * self.bit_width) as i64, 8) as usize;
        if num_bytes > data.len() {
          return Err(corrupt_data_err!(
            "Bit-packed level stream needs {} bytes, page has {}", num_bytes, data.len()));
        }
        self.packed_data = Some(data.range(0, num_bytes));
        self.packed_bit_pos = 0;
        Ok(num_bytes)
      }
      _ => unreachable!()
    }
  }

  pub fn get(&mut self, buffer: &mut [i16]) -> Result<usize> {
    match self.encoding {
      Encoding::RLE => {
        let rle = self.rle_decoder.as_mut()
          .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
        rle.get_batch::<i16>(buffer)
      }
      Encoding::BIT_PACKED => {
        let data = self.packed_data.as_ref()
          .ok_or_else(|| corrupt_data_err!("set_data is not called"))?;
        let bytes = data.as_ref();
        let total_bits = bytes.len() * 8;
        let mut num_read = 0;
        // legacy layout packs values MSB first
        while num_read < buffer.len() {
          if self.packed_bit_pos + self.bit_width > total_bits {
            break;
          }
          let mut v: u16 = 0;
          for _ in 0..self.bit_width {
            let byte = bytes[self.packed_bit_pos / 8];
            let bit = (byte >> (7 - self.packed_bit_pos % 8)) & 1;
            v = (v << 1) | bit as u16;
            self.packed_bit_pos += 1;
          }
          buffer[num_read] = v as i16;
          num_read += 1;
        }
        Ok(num_read)
      }
      _ => unreachable!()
    }
  }
}

/// An encoder for definition/repetition levels, producing the prefixed
/// RLE/bit-packed hybrid form of v1 data pages.
pub struct LevelEncoder {
  rle_encoder: RleEncoder
}

impl LevelEncoder {
  pub fn new(max_level: i16) -> Self {
    let bit_width = num_required_bits(max_level as u64);
    Self { rle_encoder: RleEncoder::new(bit_width) }
  }

  pub fn put(&mut self, buffer: &[i16]) {
    for v in buffer {
      self.rle_encoder.put(*v as u64);
    }
  }

  /// Produce the encoded stream with its u32 length prefix.
  pub fn consume(self) -> Vec<u8> {
    let encoded = self.rle_encoder.consume();
    let mut result = vec![0u8; 4];
    LittleEndian::write_u32(&mut result[0..4], encoded.len() as u32);
    result.extend(encoded);
    result
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_roundtrip_one() {
    let max_level = 1;
    let levels: Vec<i16> = vec![0, 1, 1, 1, 1, 0, 0, 0, 0, 1];
    let mut encoder = LevelEncoder::new(max_level);
    encoder.put(&levels);
    let encoded_levels = encoder.consume();

    let mut decoder = LevelDecoder::new(Encoding::RLE, max_level).unwrap();
    let consumed = decoder
      .set_data(&BytePtr::new(encoded_levels.clone()), levels.len())
      .expect("set_data should be OK");
    assert_eq!(consumed, encoded_levels.len());
    let mut buffer = vec![0i16; levels.len()];
    let num_decoded = decoder.get(&mut buffer).expect("get() should be OK");
    assert_eq!(num_decoded, levels.len());
    assert_eq!(buffer, levels);
  }

  #[test]
  fn test_roundtrip() {
    let max_level = 10;
    let data: Vec<i16> = vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9];
    let mut encoder = LevelEncoder::new(max_level);
    encoder.put(&data);
    let buffer = encoder.consume();
    let buffer_len = buffer.len();

    let mut decoder = LevelDecoder::new(Encoding::RLE, max_level).unwrap();
    assert_eq!(
      decoder.set_data(&BytePtr::new(buffer), data.len()).unwrap(),
      buffer_len);
    let mut result = vec![0i16; 10];
    let num_decoded = decoder.get(&mut result).expect("get() should be OK");
    assert_eq!(num_decoded, 10);
    assert_eq!(result, data);
  }

  #[test]
  fn test_decoder_stream_is_prefix_of_page() {
    // the level stream is followed by value bytes; set_data must consume
    // only the prefixed length
    let max_level = 1;
    let levels: Vec<i16> = vec![0, 1, 0, 1];
    let mut encoder = LevelEncoder::new(max_level);
    encoder.put(&levels);
    let mut page = encoder.consume();
    let stream_len = page.len();
    page.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    let mut decoder = LevelDecoder::new(Encoding::RLE, max_level).unwrap();
    assert_eq!(decoder.set_data(&BytePtr::new(page), levels.len()).unwrap(), stream_len);
    let mut result = vec![0i16; 4];
    decoder.get(&mut result).unwrap();
    assert_eq!(result, levels);
  }

  #[test]
  fn test_bit_packed_legacy() {
    // values 0..4 at max level 4 (bit width 3), MSB-first packing:
    // 000 001 010 011 100 -> 00000101 00111000
    let data = BytePtr::new(vec![0b0000_0101, 0b0011_1000, 0xFF]);
    let mut decoder = LevelDecoder::new(Encoding::BIT_PACKED, 4).unwrap();
    let consumed = decoder.set_data(&data, 5).unwrap();
    assert_eq!(consumed, 2);
    let mut result = vec![0i16; 5];
    let num_decoded = decoder.get(&mut result).expect("get() should be OK");
    assert_eq!(num_decoded, 5);
    assert_eq!(result, vec![0, 1, 2, 3, 4]);
  }

  #[test]
  fn test_truncated_stream() {
    let mut decoder = LevelDecoder::new(Encoding::RLE, 1).unwrap();
    // prefix says 10 bytes, but only 2 present
    let data = BytePtr::new(vec![10, 0, 0, 0, 0x02, 0x01]);
    assert!(decoder.set_data(&data, 4).is_err());
  }

  #[test]
  fn test_unsupported_level_encoding() {
    assert!(LevelDecoder::new(Encoding::PLAIN, 1).is_err());
  }
}
