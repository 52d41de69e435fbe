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

use std::fs::File;
use std::io::{BufReader, Cursor, Read, Result as IoResult, Seek, SeekFrom};
use std::path::Path;

use crate::errors::Result;

/// The byte source a reader consumes: random-access reads over a region of
/// known length. Footer parsing seeks from the end; page reads seek to the
/// chunk offsets recorded in the footer. No write capability is required.
pub trait ByteSource: Read + Seek {
  /// Total number of bytes in the source.
  fn length(&self) -> u64;
}

// ----------------------------------------------------------------------
// File-backed source

/// A `ByteSource` over a file, buffered. The file length is captured at
/// construction; the file should not be mutated while a reader borrows it.
pub struct FileSource {
  reader: BufReader<File>,
  length: u64
}

impl FileSource {
  pub fn new(file: File) -> Result<Self> {
    let length = file.metadata()?.len();
    Ok(Self { reader: BufReader::new(file), length })
  }

  pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
    Self::new(File::open(path)?)
  }
}

impl Read for FileSource {
  fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
    self.reader.read(buf)
  }
}

impl Seek for FileSource {
  fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
    self.reader.seek(pos)
  }
}

impl ByteSource for FileSource {
  fn length(&self) -> u64 {
    self.length
  }
}

// ----------------------------------------------------------------------
// Memory-backed source

/// A `ByteSource` over an owned byte vector.
pub struct MemorySource {
  cursor: Cursor<Vec<u8>>
}

impl MemorySource {
  pub fn new(data: Vec<u8>) -> Self {
    Self { cursor: Cursor::new(data) }
  }
}

impl Read for MemorySource {
  fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
    self.cursor.read(buf)
  }
}

impl Seek for MemorySource {
  fn seek(&mut self, pos: SeekFrom) -> IoResult<u64> {
    self.cursor.seek(pos)
  }
}

impl ByteSource for MemorySource {
  fn length(&self) -> u64 {
    self.cursor.get_ref().len() as u64
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_memory_source_read() {
    let mut src = MemorySource::new(vec![b'P', b'A', b'R', b'1', 0, 0]);
    assert_eq!(src.length(), 6);

    let mut buf = [0u8; 4];
    src.read_exact(&mut buf).unwrap();
    assert_eq!(&buf, b"PAR1");
  }

  #[test]
  fn test_memory_source_seek() {
    let mut src = MemorySource::new((0u8..32).collect());
    src.seek(SeekFrom::End(-4)).unwrap();
    let mut buf = [0u8; 4];
    src.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [28, 29, 30, 31]);

    src.seek(SeekFrom::Start(2)).unwrap();
    src.read_exact(&mut buf).unwrap();
    assert_eq!(buf, [2, 3, 4, 5]);
  }
}
