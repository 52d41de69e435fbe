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

//! Wire-level metadata structures, one per Thrift struct in the Parquet
//! format definition, decoded through the compact-protocol codec. Enum
//! fields stay raw `i32` here; `basic` converts them to typed enums when
//! the descriptor layer is built. Fields this library does not consume
//! (column orders, sorting columns, page indexes, the new logical type
//! union) are skipped generically on read and never written.

use crate::errors::{corrupt_meta_err, Result};
use crate::thrift::{CompactReader, CompactWriter, FieldType};

// ----------------------------------------------------------------------
// Schema

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaElement {
  pub type_: Option<i32>,
  pub type_length: Option<i32>,
  pub repetition_type: Option<i32>,
  pub name: String,
  pub num_children: Option<i32>,
  pub converted_type: Option<i32>,
  pub scale: Option<i32>,
  pub precision: Option<i32>,
  pub field_id: Option<i32>
}

impl SchemaElement {
  pub fn read_from(prot: &mut CompactReader) -> Result<SchemaElement> {
    prot.read_struct_begin();
    let mut elem = SchemaElement::default();
    let mut has_name = false;
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => elem.type_ = Some(prot.read_i32()?),
        2 => elem.type_length = Some(prot.read_i32()?),
        3 => elem.repetition_type = Some(prot.read_i32()?),
        4 => {
          elem.name = prot.read_string()?;
          has_name = true;
        }
        5 => elem.num_children = Some(prot.read_i32()?),
        6 => elem.converted_type = Some(prot.read_i32()?),
        7 => elem.scale = Some(prot.read_i32()?),
        8 => elem.precision = Some(prot.read_i32()?),
        9 => elem.field_id = Some(prot.read_i32()?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if !has_name {
      return Err(corrupt_meta_err!("SchemaElement is missing required field 'name'"));
    }
    Ok(elem)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    if let Some(v) = self.type_ {
      prot.write_field_header(FieldType::I32, 1);
      prot.write_i32(v);
    }
    if let Some(v) = self.type_length {
      prot.write_field_header(FieldType::I32, 2);
      prot.write_i32(v);
    }
    if let Some(v) = self.repetition_type {
      prot.write_field_header(FieldType::I32, 3);
      prot.write_i32(v);
    }
    prot.write_field_header(FieldType::Binary, 4);
    prot.write_string(&self.name);
    if let Some(v) = self.num_children {
      prot.write_field_header(FieldType::I32, 5);
      prot.write_i32(v);
    }
    if let Some(v) = self.converted_type {
      prot.write_field_header(FieldType::I32, 6);
      prot.write_i32(v);
    }
    if let Some(v) = self.scale {
      prot.write_field_header(FieldType::I32, 7);
      prot.write_i32(v);
    }
    if let Some(v) = self.precision {
      prot.write_field_header(FieldType::I32, 8);
      prot.write_i32(v);
    }
    if let Some(v) = self.field_id {
      prot.write_field_header(FieldType::I32, 9);
      prot.write_i32(v);
    }
    prot.write_struct_end();
  }
}

// ----------------------------------------------------------------------
// Statistics and user metadata

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
  pub max: Option<Vec<u8>>,
  pub min: Option<Vec<u8>>,
  pub null_count: Option<i64>,
  pub distinct_count: Option<i64>,
  pub max_value: Option<Vec<u8>>,
  pub min_value: Option<Vec<u8>>
}

impl Statistics {
  pub fn read_from(prot: &mut CompactReader) -> Result<Statistics> {
    prot.read_struct_begin();
    let mut stats = Statistics::default();
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => stats.max = Some(prot.read_binary()?),
        2 => stats.min = Some(prot.read_binary()?),
        3 => stats.null_count = Some(prot.read_i64()?),
        4 => stats.distinct_count = Some(prot.read_i64()?),
        5 => stats.max_value = Some(prot.read_binary()?),
        6 => stats.min_value = Some(prot.read_binary()?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    Ok(stats)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    if let Some(ref v) = self.max {
      prot.write_field_header(FieldType::Binary, 1);
      prot.write_binary(v);
    }
    if let Some(ref v) = self.min {
      prot.write_field_header(FieldType::Binary, 2);
      prot.write_binary(v);
    }
    if let Some(v) = self.null_count {
      prot.write_field_header(FieldType::I64, 3);
      prot.write_i64(v);
    }
    if let Some(v) = self.distinct_count {
      prot.write_field_header(FieldType::I64, 4);
      prot.write_i64(v);
    }
    if let Some(ref v) = self.max_value {
      prot.write_field_header(FieldType::Binary, 5);
      prot.write_binary(v);
    }
    if let Some(ref v) = self.min_value {
      prot.write_field_header(FieldType::Binary, 6);
      prot.write_binary(v);
    }
    prot.write_struct_end();
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyValue {
  pub key: String,
  pub value: Option<String>
}

impl KeyValue {
  pub fn read_from(prot: &mut CompactReader) -> Result<KeyValue> {
    prot.read_struct_begin();
    let mut kv = KeyValue::default();
    let mut has_key = false;
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => {
          kv.key = prot.read_string()?;
          has_key = true;
        }
        2 => kv.value = Some(prot.read_string()?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if !has_key {
      return Err(corrupt_meta_err!("KeyValue is missing required field 'key'"));
    }
    Ok(kv)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::Binary, 1);
    prot.write_string(&self.key);
    if let Some(ref v) = self.value {
      prot.write_field_header(FieldType::Binary, 2);
      prot.write_string(v);
    }
    prot.write_struct_end();
  }
}

// ----------------------------------------------------------------------
// Column chunks and row groups

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMetaData {
  pub type_: i32,
  pub encodings: Vec<i32>,
  pub path_in_schema: Vec<String>,
  pub codec: i32,
  pub num_values: i64,
  pub total_uncompressed_size: i64,
  pub total_compressed_size: i64,
  pub data_page_offset: i64,
  pub index_page_offset: Option<i64>,
  pub dictionary_page_offset: Option<i64>,
  pub statistics: Option<Statistics>
}

impl ColumnMetaData {
  pub fn read_from(prot: &mut CompactReader) -> Result<ColumnMetaData> {
    prot.read_struct_begin();
    let mut md = ColumnMetaData::default();
    let mut seen = [false; 8];
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => {
          md.type_ = prot.read_i32()?;
          seen[0] = true;
        }
        2 => {
          let (_, size) = prot.read_list_header()?;
          for _ in 0..size {
            md.encodings.push(prot.read_i32()?);
          }
          seen[1] = true;
        }
        3 => {
          let (_, size) = prot.read_list_header()?;
          for _ in 0..size {
            md.path_in_schema.push(prot.read_string()?);
          }
          seen[2] = true;
        }
        4 => {
          md.codec = prot.read_i32()?;
          seen[3] = true;
        }
        5 => {
          md.num_values = prot.read_i64()?;
          seen[4] = true;
        }
        6 => {
          md.total_uncompressed_size = prot.read_i64()?;
          seen[5] = true;
        }
        7 => {
          md.total_compressed_size = prot.read_i64()?;
          seen[6] = true;
        }
        9 => {
          md.data_page_offset = prot.read_i64()?;
          seen[7] = true;
        }
        10 => md.index_page_offset = Some(prot.read_i64()?),
        11 => md.dictionary_page_offset = Some(prot.read_i64()?),
        12 => md.statistics = Some(Statistics::read_from(prot)?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if seen.iter().any(|s| !s) {
      return Err(corrupt_meta_err!("ColumnMetaData is missing required fields"));
    }
    Ok(md)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::I32, 1);
    prot.write_i32(self.type_);
    prot.write_field_header(FieldType::List, 2);
    prot.write_list_header(FieldType::I32, self.encodings.len());
    for e in &self.encodings {
      prot.write_i32(*e);
    }
    prot.write_field_header(FieldType::List, 3);
    prot.write_list_header(FieldType::Binary, self.path_in_schema.len());
    for p in &self.path_in_schema {
      prot.write_string(p);
    }
    prot.write_field_header(FieldType::I32, 4);
    prot.write_i32(self.codec);
    prot.write_field_header(FieldType::I64, 5);
    prot.write_i64(self.num_values);
    prot.write_field_header(FieldType::I64, 6);
    prot.write_i64(self.total_uncompressed_size);
    prot.write_field_header(FieldType::I64, 7);
    prot.write_i64(self.total_compressed_size);
    prot.write_field_header(FieldType::I64, 9);
    prot.write_i64(self.data_page_offset);
    if let Some(v) = self.index_page_offset {
      prot.write_field_header(FieldType::I64, 10);
      prot.write_i64(v);
    }
    if let Some(v) = self.dictionary_page_offset {
      prot.write_field_header(FieldType::I64, 11);
      prot.write_i64(v);
    }
    if let Some(ref v) = self.statistics {
      prot.write_field_header(FieldType::Struct, 12);
      v.write_to(prot);
    }
    prot.write_struct_end();
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnChunk {
  pub file_path: Option<String>,
  pub file_offset: i64,
  pub meta_data: Option<ColumnMetaData>
}

impl ColumnChunk {
  pub fn read_from(prot: &mut CompactReader) -> Result<ColumnChunk> {
    prot.read_struct_begin();
    let mut cc = ColumnChunk::default();
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => cc.file_path = Some(prot.read_string()?),
        2 => cc.file_offset = prot.read_i64()?,
        3 => cc.meta_data = Some(ColumnMetaData::read_from(prot)?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    Ok(cc)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    if let Some(ref v) = self.file_path {
      prot.write_field_header(FieldType::Binary, 1);
      prot.write_string(v);
    }
    prot.write_field_header(FieldType::I64, 2);
    prot.write_i64(self.file_offset);
    if let Some(ref v) = self.meta_data {
      prot.write_field_header(FieldType::Struct, 3);
      v.write_to(prot);
    }
    prot.write_struct_end();
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowGroup {
  pub columns: Vec<ColumnChunk>,
  pub total_byte_size: i64,
  pub num_rows: i64
}

impl RowGroup {
  pub fn read_from(prot: &mut CompactReader) -> Result<RowGroup> {
    prot.read_struct_begin();
    let mut rg = RowGroup::default();
    let mut has_columns = false;
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => {
          let (_, size) = prot.read_list_header()?;
          for _ in 0..size {
            rg.columns.push(ColumnChunk::read_from(prot)?);
          }
          has_columns = true;
        }
        2 => rg.total_byte_size = prot.read_i64()?,
        3 => rg.num_rows = prot.read_i64()?,
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if !has_columns {
      return Err(corrupt_meta_err!("RowGroup is missing required field 'columns'"));
    }
    Ok(rg)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::List, 1);
    prot.write_list_header(FieldType::Struct, self.columns.len());
    for c in &self.columns {
      c.write_to(prot);
    }
    prot.write_field_header(FieldType::I64, 2);
    prot.write_i64(self.total_byte_size);
    prot.write_field_header(FieldType::I64, 3);
    prot.write_i64(self.num_rows);
    prot.write_struct_end();
  }
}

// ----------------------------------------------------------------------
// File metadata

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileMetaData {
  pub version: i32,
  pub schema: Vec<SchemaElement>,
  pub num_rows: i64,
  pub row_groups: Vec<RowGroup>,
  pub key_value_metadata: Option<Vec<KeyValue>>,
  pub created_by: Option<String>
}

impl FileMetaData {
  pub fn read_from(prot: &mut CompactReader) -> Result<FileMetaData> {
    prot.read_struct_begin();
    let mut md = FileMetaData::default();
    let mut has_schema = false;
    let mut has_row_groups = false;
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => md.version = prot.read_i32()?,
        2 => {
          let (_, size) = prot.read_list_header()?;
          for _ in 0..size {
            md.schema.push(SchemaElement::read_from(prot)?);
          }
          has_schema = true;
        }
        3 => md.num_rows = prot.read_i64()?,
        4 => {
          let (_, size) = prot.read_list_header()?;
          for _ in 0..size {
            md.row_groups.push(RowGroup::read_from(prot)?);
          }
          has_row_groups = true;
        }
        5 => {
          let (_, size) = prot.read_list_header()?;
          let mut kvs = Vec::with_capacity(size);
          for _ in 0..size {
            kvs.push(KeyValue::read_from(prot)?);
          }
          md.key_value_metadata = Some(kvs);
        }
        6 => md.created_by = Some(prot.read_string()?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if !has_schema || !has_row_groups {
      return Err(corrupt_meta_err!("FileMetaData is missing required fields"));
    }
    Ok(md)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::I32, 1);
    prot.write_i32(self.version);
    prot.write_field_header(FieldType::List, 2);
    prot.write_list_header(FieldType::Struct, self.schema.len());
    for s in &self.schema {
      s.write_to(prot);
    }
    prot.write_field_header(FieldType::I64, 3);
    prot.write_i64(self.num_rows);
    prot.write_field_header(FieldType::List, 4);
    prot.write_list_header(FieldType::Struct, self.row_groups.len());
    for rg in &self.row_groups {
      rg.write_to(prot);
    }
    if let Some(ref kvs) = self.key_value_metadata {
      prot.write_field_header(FieldType::List, 5);
      prot.write_list_header(FieldType::Struct, kvs.len());
      for kv in kvs {
        kv.write_to(prot);
      }
    }
    if let Some(ref v) = self.created_by {
      prot.write_field_header(FieldType::Binary, 6);
      prot.write_string(v);
    }
    prot.write_struct_end();
  }
}

// ----------------------------------------------------------------------
// Page headers

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataPageHeader {
  pub num_values: i32,
  pub encoding: i32,
  pub definition_level_encoding: i32,
  pub repetition_level_encoding: i32,
  pub statistics: Option<Statistics>
}

impl DataPageHeader {
  pub fn read_from(prot: &mut CompactReader) -> Result<DataPageHeader> {
    prot.read_struct_begin();
    let mut h = DataPageHeader::default();
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => h.num_values = prot.read_i32()?,
        2 => h.encoding = prot.read_i32()?,
        3 => h.definition_level_encoding = prot.read_i32()?,
        4 => h.repetition_level_encoding = prot.read_i32()?,
        5 => h.statistics = Some(Statistics::read_from(prot)?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    Ok(h)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::I32, 1);
    prot.write_i32(self.num_values);
    prot.write_field_header(FieldType::I32, 2);
    prot.write_i32(self.encoding);
    prot.write_field_header(FieldType::I32, 3);
    prot.write_i32(self.definition_level_encoding);
    prot.write_field_header(FieldType::I32, 4);
    prot.write_i32(self.repetition_level_encoding);
    if let Some(ref v) = self.statistics {
      prot.write_field_header(FieldType::Struct, 5);
      v.write_to(prot);
    }
    prot.write_struct_end();
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DictionaryPageHeader {
  pub num_values: i32,
  pub encoding: i32,
  pub is_sorted: Option<bool>
}

impl DictionaryPageHeader {
  pub fn read_from(prot: &mut CompactReader) -> Result<DictionaryPageHeader> {
    prot.read_struct_begin();
    let mut h = DictionaryPageHeader::default();
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => h.num_values = prot.read_i32()?,
        2 => h.encoding = prot.read_i32()?,
        3 => {
          h.is_sorted = Some(header.bool_value.ok_or_else(
            || corrupt_meta_err!("DictionaryPageHeader.is_sorted is not a boolean"))?);
        }
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    Ok(h)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::I32, 1);
    prot.write_i32(self.num_values);
    prot.write_field_header(FieldType::I32, 2);
    prot.write_i32(self.encoding);
    if let Some(v) = self.is_sorted {
      prot.write_bool_field(3, v);
    }
    prot.write_struct_end();
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageHeader {
  pub type_: i32,
  pub uncompressed_page_size: i32,
  pub compressed_page_size: i32,
  pub crc: Option<i32>,
  pub data_page_header: Option<DataPageHeader>,
  pub dictionary_page_header: Option<DictionaryPageHeader>
}

impl PageHeader {
  pub fn read_from(prot: &mut CompactReader) -> Result<PageHeader> {
    prot.read_struct_begin();
    let mut h = PageHeader::default();
    let mut seen = [false; 3];
    while let Some(header) = prot.read_field()? {
      match header.id {
        1 => {
          h.type_ = prot.read_i32()?;
          seen[0] = true;
        }
        2 => {
          h.uncompressed_page_size = prot.read_i32()?;
          seen[1] = true;
        }
        3 => {
          h.compressed_page_size = prot.read_i32()?;
          seen[2] = true;
        }
        4 => h.crc = Some(prot.read_i32()?),
        5 => h.data_page_header = Some(DataPageHeader::read_from(prot)?),
        7 => h.dictionary_page_header = Some(DictionaryPageHeader::read_from(prot)?),
        _ => prot.skip_field(&header)?
      }
    }
    prot.read_struct_end();
    if seen.iter().any(|s| !s) {
      return Err(corrupt_meta_err!("PageHeader is missing required fields"));
    }
    Ok(h)
  }

  pub fn write_to(&self, prot: &mut CompactWriter) {
    prot.write_struct_begin();
    prot.write_field_header(FieldType::I32, 1);
    prot.write_i32(self.type_);
    prot.write_field_header(FieldType::I32, 2);
    prot.write_i32(self.uncompressed_page_size);
    prot.write_field_header(FieldType::I32, 3);
    prot.write_i32(self.compressed_page_size);
    if let Some(v) = self.crc {
      prot.write_field_header(FieldType::I32, 4);
      prot.write_i32(v);
    }
    if let Some(ref v) = self.data_page_header {
      prot.write_field_header(FieldType::Struct, 5);
      v.write_to(prot);
    }
    if let Some(ref v) = self.dictionary_page_header {
      prot.write_field_header(FieldType::Struct, 7);
      v.write_to(prot);
    }
    prot.write_struct_end();
  }
}
