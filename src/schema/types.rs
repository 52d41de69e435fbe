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

use std::fmt;
use std::rc::Rc;

use std::convert::TryFrom;

use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
use crate::errors::{corrupt_meta_err, Result};
use crate::format::SchemaElement;

// ----------------------------------------------------------------------
// Parquet Type definitions

pub type TypePtr = Rc<Type>;
pub type SchemaDescPtr = Rc<SchemaDescriptor>;
pub type ColumnDescPtr = Rc<ColumnDescriptor>;

/// Representation of a Parquet type. Note that the top-level schema type
/// is represented using `GroupType` whose repetition is `None`.
#[derive(Debug, PartialEq)]
pub enum Type {
  PrimitiveType {
    basic_info: BasicTypeInfo,
    physical_type: PhysicalType,
    type_length: i32,
    scale: i32,
    precision: i32
  },
  GroupType {
    basic_info: BasicTypeInfo,
    fields: Vec<TypePtr>
  }
}

impl Type {
  /// Create a new `PrimitiveType` instance from the input parameters.
  /// This also checks various illegal conditions and returns `Err` in case
  /// that happens.
  pub fn new_primitive_type(
    name: &str, repetition: Repetition,
    physical_type: PhysicalType, logical_type: LogicalType, length: i32,
    precision: i32, scale: i32, id: Option<i32>) -> Result<Type> {
    let basic_info = BasicTypeInfo {
      name: String::from(name),
      repetition: Some(repetition),
      logical_type,
      id
    };

    match logical_type {
      LogicalType::NONE => {}
      LogicalType::UTF8 | LogicalType::BSON | LogicalType::JSON => {
        if physical_type != PhysicalType::BYTE_ARRAY {
          return Err(corrupt_meta_err!(
            "{} can only annotate BYTE_ARRAY fields", logical_type));
        }
      }
      LogicalType::DECIMAL => {
        match physical_type {
          PhysicalType::INT32 | PhysicalType::INT64 | PhysicalType::BYTE_ARRAY |
          PhysicalType::FIXED_LEN_BYTE_ARRAY => (),
          _ => {
            return Err(corrupt_meta_err!(
              "DECIMAL can only annotate INT32, INT64, BYTE_ARRAY and FIXED"));
          }
        };
        if precision < 0 {
          return Err(corrupt_meta_err!("Invalid DECIMAL precision: {}", precision));
        }
        if scale < 0 {
          return Err(corrupt_meta_err!("Invalid DECIMAL scale: {}", scale));
        }
        if scale > precision {
          return Err(corrupt_meta_err!(
            "Invalid DECIMAL: scale ({}) cannot be greater than precision ({})",
            scale, precision));
        }
      }
      LogicalType::DATE | LogicalType::TIME_MILLIS | LogicalType::UINT_8 |
      LogicalType::UINT_16 | LogicalType::UINT_32 |
      LogicalType::INT_8 | LogicalType::INT_16 | LogicalType::INT_32 => {
        if physical_type != PhysicalType::INT32 {
          return Err(corrupt_meta_err!("{} can only annotate INT32", logical_type));
        }
      }
      LogicalType::TIME_MICROS | LogicalType::TIMESTAMP_MILLIS |
      LogicalType::TIMESTAMP_MICROS | LogicalType::UINT_64 | LogicalType::INT_64 => {
        if physical_type != PhysicalType::INT64 {
          return Err(corrupt_meta_err!("{} can only annotate INT64", logical_type));
        }
      }
      LogicalType::INTERVAL => {
        if physical_type != PhysicalType::FIXED_LEN_BYTE_ARRAY || length != 12 {
          return Err(corrupt_meta_err!("INTERVAL can only annotate FIXED(12)"));
        }
      }
      LogicalType::ENUM => {
        if physical_type != PhysicalType::BYTE_ARRAY {
          return Err(corrupt_meta_err!("ENUM can only annotate BYTE_ARRAY fields"));
        }
      }
      _ => {
        return Err(corrupt_meta_err!(
          "{} cannot be applied to a primitive type", logical_type));
      }
    };
    if physical_type == PhysicalType::FIXED_LEN_BYTE_ARRAY && length < 0 {
      return Err(corrupt_meta_err!("Invalid FIXED_LEN_BYTE_ARRAY length: {}", length));
    }
    Ok(Type::PrimitiveType {
      basic_info,
      physical_type,
      type_length: length,
      scale,
      precision
    })
  }

  /// Create a new `GroupType` instance from the input parameters.
  pub fn new_group_type(
    name: &str, repetition: Option<Repetition>,
    logical_type: LogicalType, fields: Vec<TypePtr>, id: Option<i32>) -> Result<Type> {
    let basic_info = BasicTypeInfo {
      name: String::from(name),
      repetition,
      logical_type,
      id
    };
    Ok(Type::GroupType { basic_info, fields })
  }

  pub fn get_basic_info(&self) -> &BasicTypeInfo {
    match *self {
      Type::PrimitiveType { ref basic_info, .. } => basic_info,
      Type::GroupType { ref basic_info, .. } => basic_info
    }
  }

  pub fn name(&self) -> &str {
    self.get_basic_info().name()
  }

  /// Get the fields from this group type.
  /// NOTE: this will panic if called on a non-group type.
  pub fn get_fields(&self) -> &[TypePtr] {
    match *self {
      Type::GroupType { ref fields, .. } => &fields[..],
      _ => panic!("Cannot call get_fields() on a non-group type")
    }
  }

  pub fn is_primitive(&self) -> bool {
    match *self {
      Type::PrimitiveType { .. } => true,
      _ => false
    }
  }

  pub fn is_group(&self) -> bool {
    match *self {
      Type::GroupType { .. } => true,
      _ => false
    }
  }

  /// Whether this is the top-level schema type (message type).
  pub fn is_schema(&self) -> bool {
    match *self {
      Type::GroupType { ref basic_info, .. } => !basic_info.has_repetition(),
      _ => false
    }
  }
}

/// Basic type info. This contains information such as the name of the type,
/// the repetition level, the logical type and the kind of the type (group, primitive).
#[derive(Debug, PartialEq)]
pub struct BasicTypeInfo {
  name: String,
  repetition: Option<Repetition>,
  logical_type: LogicalType,
  id: Option<i32>
}

impl BasicTypeInfo {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn has_repetition(&self) -> bool {
    self.repetition.is_some()
  }

  pub fn repetition(&self) -> Repetition {
    assert!(self.repetition.is_some());
    self.repetition.unwrap()
  }

  pub fn logical_type(&self) -> LogicalType {
    self.logical_type
  }

  pub fn has_id(&self) -> bool {
    self.id.is_some()
  }

  pub fn id(&self) -> i32 {
    assert!(self.id.is_some());
    self.id.unwrap()
  }
}

// ----------------------------------------------------------------------
// Parquet descriptor definitions

/// Represents a physical path in a nested schema, as recorded by column
/// chunks (`path_in_schema`).
#[derive(Clone, PartialEq, Debug)]
pub struct ColumnPath {
  parts: Vec<String>
}

impl ColumnPath {
  pub fn new(parts: Vec<String>) -> Self {
    ColumnPath { parts }
  }

  pub fn parts(&self) -> &[String] {
    &self.parts
  }

  pub fn string(&self) -> String {
    self.parts.join(".")
  }
}

impl fmt::Display for ColumnPath {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.string())
  }
}

/// A descriptor for leaf-level primitive columns. This encapsulates
/// information such as definition and repetition levels and is used to
/// re-assemble nested data.
pub struct ColumnDescriptor {
  // The "leaf" primitive type of this column
  primitive_type: TypePtr,

  // The maximum definition level for this column
  max_def_level: i16,

  // The maximum repetition level for this column
  max_rep_level: i16,

  // Repetition of every OPTIONAL or REPEATED node on the root-to-leaf path
  // (leaf included), in root-first order. Entry `d` is the ancestor whose
  // presence raises a value's definition level from `d` to `d + 1`.
  level_spec: Vec<Repetition>,

  // The physical path of this column. For instance, "a.b.c.d".
  path: ColumnPath
}

impl ColumnDescriptor {
  pub fn new(primitive_type: TypePtr, max_def_level: i16, max_rep_level: i16,
             level_spec: Vec<Repetition>, path: ColumnPath) -> Self {
    Self { primitive_type, max_def_level, max_rep_level, level_spec, path }
  }

  pub fn max_def_level(&self) -> i16 {
    self.max_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.max_rep_level
  }

  pub fn level_spec(&self) -> &[Repetition] {
    &self.level_spec
  }

  pub fn path(&self) -> &ColumnPath {
    &self.path
  }

  pub fn name(&self) -> &str {
    self.primitive_type.name()
  }

  pub fn logical_type(&self) -> LogicalType {
    self.primitive_type.get_basic_info().logical_type()
  }

  pub fn physical_type(&self) -> PhysicalType {
    match *self.primitive_type {
      Type::PrimitiveType { physical_type, .. } => physical_type,
      _ => panic!("Expected primitive type!")
    }
  }

  pub fn type_length(&self) -> i32 {
    match *self.primitive_type {
      Type::PrimitiveType { type_length, .. } => type_length,
      _ => panic!("Expected primitive type!")
    }
  }

  pub fn type_precision(&self) -> i32 {
    match *self.primitive_type {
      Type::PrimitiveType { precision, .. } => precision,
      _ => panic!("Expected primitive type!")
    }
  }

  pub fn type_scale(&self) -> i32 {
    match *self.primitive_type {
      Type::PrimitiveType { scale, .. } => scale,
      _ => panic!("Expected primitive type!")
    }
  }
}

/// A schema descriptor. This encapsulates the top-level schema for all
/// the columns, as well as all descriptors for all the primitive columns,
/// in depth-first order — the order column chunks appear in row groups.
pub struct SchemaDescriptor {
  // The top-level schema (the "message" type).
  schema: TypePtr,

  // All the descriptors for primitive columns in this schema, constructed
  // from `schema` in DFS order.
  leaves: Vec<ColumnDescPtr>
}

impl SchemaDescriptor {
  pub fn new(tp: TypePtr) -> Self {
    assert!(tp.is_group(), "SchemaDescriptor should take a GroupType");
    let mut leaves = vec![];
    for f in tp.get_fields() {
      let mut path = vec![];
      let mut level_spec = vec![];
      build_tree(f.clone(), 0, 0, &mut level_spec, &mut leaves, &mut path);
    }
    Self { schema: tp, leaves }
  }

  pub fn column(&self, i: usize) -> ColumnDescPtr {
    assert!(i < self.leaves.len(),
            "Index out of bound: {} not in [0, {})", i, self.leaves.len());
    self.leaves[i].clone()
  }

  pub fn columns(&self) -> &[ColumnDescPtr] {
    &self.leaves
  }

  pub fn num_columns(&self) -> usize {
    self.leaves.len()
  }

  pub fn root_schema(&self) -> &Type {
    self.schema.as_ref()
  }

  pub fn name(&self) -> &str {
    self.schema.name()
  }
}

fn build_tree(tp: TypePtr, mut max_def_level: i16, mut max_rep_level: i16,
              level_spec: &mut Vec<Repetition>,
              leaves: &mut Vec<ColumnDescPtr>,
              path_so_far: &mut Vec<String>) {
  assert!(tp.get_basic_info().has_repetition());

  path_so_far.push(String::from(tp.name()));
  match tp.get_basic_info().repetition() {
    Repetition::OPTIONAL => {
      max_def_level += 1;
      level_spec.push(Repetition::OPTIONAL);
    }
    Repetition::REPEATED => {
      max_def_level += 1;
      max_rep_level += 1;
      level_spec.push(Repetition::REPEATED);
    }
    _ => {}
  }

  match tp.as_ref() {
    Type::PrimitiveType { .. } => {
      leaves.push(Rc::new(ColumnDescriptor::new(
        tp.clone(), max_def_level, max_rep_level, level_spec.clone(),
        ColumnPath::new(path_so_far.clone()))));
    }
    Type::GroupType { ref fields, .. } => {
      for f in fields {
        build_tree(f.clone(), max_def_level, max_rep_level, level_spec, leaves, path_so_far);
      }
    }
  }

  path_so_far.pop();
  if tp.get_basic_info().repetition() != Repetition::REQUIRED {
    level_spec.pop();
  }
}

// ----------------------------------------------------------------------
// Conversion from the flat Thrift representation

/// Rebuild the schema tree by consuming the flat pre-order element list,
/// each non-leaf declaring a child count. The whole list must be consumed
/// by exactly one root.
pub fn from_thrift(elements: &[SchemaElement]) -> Result<TypePtr> {
  if elements.is_empty() {
    return Err(corrupt_meta_err!("Schema element list is empty"));
  }
  let (next_index, root) = from_thrift_helper(elements, 0, true)?;
  if next_index != elements.len() {
    return Err(corrupt_meta_err!(
      "Schema child counts cover {} elements, the flat list has {}",
      next_index, elements.len()));
  }
  if !root.is_group() {
    return Err(corrupt_meta_err!("Root schema element must be a group"));
  }
  Ok(root)
}

/// Construct a new Type from the `elements`, starting at index `index`.
/// The first result is the starting index for the next Type after this one.
/// The second result is the result Type.
fn from_thrift_helper(elements: &[SchemaElement], index: usize,
                      is_root: bool) -> Result<(usize, TypePtr)> {
  if index >= elements.len() {
    return Err(corrupt_meta_err!(
      "Schema child count points past the element list: index = {}, len = {}",
      index, elements.len()));
  }
  let element = &elements[index];
  let logical_type = LogicalType::try_from(element.converted_type)?;
  let field_id = element.field_id;
  match element.num_children {
    None | Some(0) if element.type_.is_some() => {
      // primitive type
      let repetition_raw = element.repetition_type.ok_or_else(
        || corrupt_meta_err!("Repetition level must be defined for a primitive type"))?;
      let repetition = Repetition::try_from(repetition_raw)?;
      let physical_type = PhysicalType::try_from(element.type_.unwrap())?;
      let length = element.type_length.unwrap_or(-1);
      let scale = element.scale.unwrap_or(-1);
      let precision = element.precision.unwrap_or(-1);
      let name = &element.name;
      let result = Type::new_primitive_type(
        name, repetition, physical_type, logical_type, length, precision, scale, field_id)?;
      Ok((index + 1, Rc::new(result)))
    }
    None | Some(0) => {
      Err(corrupt_meta_err!(
        "Schema element '{}' has no children and no physical type", element.name))
    }
    Some(n) if n < 0 => {
      Err(corrupt_meta_err!(
        "Schema element '{}' has negative child count {}", element.name, n))
    }
    Some(n) => {
      let repetition = match element.repetition_type {
        Some(r) => Some(Repetition::try_from(r)?),
        None if is_root => None,
        None => {
          return Err(corrupt_meta_err!(
            "Repetition level must be defined for a non-root group '{}'", element.name))
        }
      };
      let mut fields = vec![];
      let mut next_index = index + 1;
      for _ in 0..n {
        let child_result = from_thrift_helper(elements, next_index, false)?;
        next_index = child_result.0;
        fields.push(child_result.1);
      }

      let group_tp = Type::new_group_type(
        &element.name, repetition, logical_type, fields, field_id)?;
      Ok((next_index, Rc::new(group_tp)))
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_primitive_type() {
    let result = Type::new_primitive_type(
      "foo", Repetition::OPTIONAL, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, Some(0));
    assert!(result.is_ok());

    if let Ok(tp) = result {
      assert!(tp.is_primitive());
      assert!(!tp.is_group());
      let basic_info = tp.get_basic_info();
      assert_eq!(basic_info.repetition(), Repetition::OPTIONAL);
      assert_eq!(basic_info.logical_type(), LogicalType::INT_32);
      assert_eq!(basic_info.id(), 0);
      match tp {
        Type::PrimitiveType { physical_type, .. } => {
          assert_eq!(physical_type, PhysicalType::INT32);
        }
        _ => panic!()
      }
    }

    // Test illegal inputs
    let result = Type::new_primitive_type(
      "foo", Repetition::REPEATED, PhysicalType::INT64,
      LogicalType::BSON, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: BSON can only annotate BYTE_ARRAY fields");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT96,
      LogicalType::DECIMAL, 0, -1, -1, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: DECIMAL can only annotate INT32, INT64, BYTE_ARRAY and FIXED");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::DECIMAL, 0, -1, -1, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: Invalid DECIMAL precision: -1");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::DECIMAL, 0, 0, -1, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: Invalid DECIMAL scale: -1");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::DECIMAL, 0, 1, 2, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: Invalid DECIMAL: scale (2) cannot be greater than precision (1)");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT64,
      LogicalType::UINT_8, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: UINT_8 can only annotate INT32");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::TIME_MICROS, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: TIME_MICROS can only annotate INT64");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::BYTE_ARRAY,
      LogicalType::INTERVAL, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: INTERVAL can only annotate FIXED(12)");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::FIXED_LEN_BYTE_ARRAY,
      LogicalType::INTERVAL, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: INTERVAL can only annotate FIXED(12)");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::ENUM, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: ENUM can only annotate BYTE_ARRAY fields");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::MAP, 0, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: MAP cannot be applied to a primitive type");

    let result = Type::new_primitive_type(
      "foo", Repetition::REQUIRED, PhysicalType::FIXED_LEN_BYTE_ARRAY,
      LogicalType::NONE, -1, 0, 0, None);
    assert_eq!(
      result.unwrap_err().to_string(),
      "Corrupt metadata: Invalid FIXED_LEN_BYTE_ARRAY length: -1");
  }

  #[test]
  fn test_group_type() {
    let f1 = Type::new_primitive_type(
      "f1", Repetition::OPTIONAL, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, Some(0));
    let f2 = Type::new_primitive_type(
      "f2", Repetition::OPTIONAL, PhysicalType::BYTE_ARRAY,
      LogicalType::UTF8, 0, 0, 0, Some(1));

    let fields = vec![Rc::new(f1.unwrap()), Rc::new(f2.unwrap())];
    let result = Type::new_group_type(
      "foo", Some(Repetition::REPEATED), LogicalType::NONE, fields, Some(1));
    assert!(result.is_ok());

    let tp = result.unwrap();
    let basic_info = tp.get_basic_info();
    assert_eq!(basic_info.repetition(), Repetition::REPEATED);
    assert_eq!(basic_info.logical_type(), LogicalType::NONE);
    assert_eq!(basic_info.id(), 1);
    assert_eq!(tp.get_fields().len(), 2);
    assert_eq!(tp.get_fields()[0].name(), "f1");
    assert_eq!(tp.get_fields()[1].name(), "f2");
  }

  #[test]
  fn test_column_descriptor() {
    let tp = Type::new_primitive_type(
      "name", Repetition::OPTIONAL, PhysicalType::BYTE_ARRAY,
      LogicalType::UTF8, 0, 0, 0, None).unwrap();

    let path = vec![String::from("name")];
    let descr = ColumnDescriptor::new(
      Rc::new(tp), 4, 1,
      vec![Repetition::OPTIONAL, Repetition::REPEATED, Repetition::OPTIONAL,
           Repetition::OPTIONAL],
      ColumnPath::new(path));

    assert_eq!(descr.path(), &ColumnPath::new(vec![String::from("name")]));
    assert_eq!(descr.logical_type(), LogicalType::UTF8);
    assert_eq!(descr.physical_type(), PhysicalType::BYTE_ARRAY);
    assert_eq!(descr.max_def_level(), 4);
    assert_eq!(descr.max_rep_level(), 1);
    assert_eq!(descr.level_spec().len(), 4);
    assert_eq!(descr.name(), "name");
    assert_eq!(descr.type_length(), 0);
    assert_eq!(descr.type_precision(), 0);
    assert_eq!(descr.type_scale(), 0);
  }

  fn nested_test_schema() -> SchemaDescriptor {
    let mut fields = vec![];

    fields.push(Rc::new(Type::new_primitive_type(
      "a", Repetition::REQUIRED, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, None).unwrap()));
    fields.push(Rc::new(Type::new_primitive_type(
      "b", Repetition::OPTIONAL, PhysicalType::INT64,
      LogicalType::INT_64, 0, 0, 0, None).unwrap()));
    fields.push(Rc::new(Type::new_primitive_type(
      "c", Repetition::REPEATED, PhysicalType::BYTE_ARRAY,
      LogicalType::UTF8, 0, 0, 0, None).unwrap()));

    let item1 = Type::new_primitive_type(
      "item1", Repetition::REQUIRED, PhysicalType::INT64,
      LogicalType::INT_64, 0, 0, 0, None).unwrap();
    let item2 = Type::new_primitive_type(
      "item2", Repetition::OPTIONAL, PhysicalType::BOOLEAN,
      LogicalType::NONE, 0, 0, 0, None).unwrap();
    let item3 = Type::new_primitive_type(
      "item3", Repetition::REPEATED, PhysicalType::INT32,
      LogicalType::INT_32, 0, 0, 0, None).unwrap();
    let records = Type::new_group_type(
      "records", Some(Repetition::REPEATED), LogicalType::NONE,
      vec![Rc::new(item1), Rc::new(item2), Rc::new(item3)], None).unwrap();
    let bag = Type::new_group_type(
      "bag", Some(Repetition::OPTIONAL), LogicalType::NONE,
      vec![Rc::new(records)], None).unwrap();
    fields.push(Rc::new(bag));

    let schema = Type::new_group_type(
      "schema", None, LogicalType::NONE, fields, None).unwrap();
    SchemaDescriptor::new(Rc::new(schema))
  }

  #[test]
  fn test_schema_descriptor() {
    let descr = nested_test_schema();

    let nleaves = 6;
    assert_eq!(descr.num_columns(), nleaves);

    //                             mdef mrep
    // required int32 a            0    0
    // optional int64 b            1    0
    // repeated byte_array c       1    1
    // optional group bag          1    0
    //   repeated group records    2    1
    //     required int64 item1    2    1
    //     optional boolean item2  3    1
    //     repeated int32 item3    3    2
    let ex_max_def_levels = vec![0, 1, 1, 2, 3, 3];
    let ex_max_rep_levels = vec![0, 0, 1, 1, 1, 2];

    for i in 0..nleaves {
      let col = descr.column(i);
      assert_eq!(col.max_def_level(), ex_max_def_levels[i], "{}", i);
      assert_eq!(col.max_rep_level(), ex_max_rep_levels[i], "{}", i);
    }

    assert_eq!(descr.column(0).path().string(), "a");
    assert_eq!(descr.column(1).path().string(), "b");
    assert_eq!(descr.column(2).path().string(), "c");
    assert_eq!(descr.column(3).path().string(), "bag.records.item1");
    assert_eq!(descr.column(4).path().string(), "bag.records.item2");
    assert_eq!(descr.column(5).path().string(), "bag.records.item3");

    // level specs drive null/empty placement during assembly
    assert_eq!(descr.column(0).level_spec(), &[] as &[Repetition]);
    assert_eq!(descr.column(2).level_spec(), &[Repetition::REPEATED]);
    assert_eq!(
      descr.column(4).level_spec(),
      &[Repetition::OPTIONAL, Repetition::REPEATED, Repetition::OPTIONAL]);
    assert_eq!(
      descr.column(5).level_spec(),
      &[Repetition::OPTIONAL, Repetition::REPEATED, Repetition::REPEATED]);
  }

  fn leaf_element(name: &str, type_: i32, repetition: i32) -> SchemaElement {
    SchemaElement {
      type_: Some(type_),
      repetition_type: Some(repetition),
      name: name.to_owned(),
      ..Default::default()
    }
  }

  fn group_element(name: &str, repetition: Option<i32>, num_children: i32) -> SchemaElement {
    SchemaElement {
      repetition_type: repetition,
      name: name.to_owned(),
      num_children: Some(num_children),
      ..Default::default()
    }
  }

  #[test]
  fn test_from_thrift_flat() {
    let elements = vec![
      group_element("schema", None, 2),
      leaf_element("a", 1, 0),
      leaf_element("b", 6, 1),
    ];
    let root = from_thrift(&elements).expect("from_thrift should be OK");
    assert!(root.is_schema());
    assert_eq!(root.get_fields().len(), 2);

    let descr = SchemaDescriptor::new(root);
    assert_eq!(descr.num_columns(), 2);
    assert_eq!(descr.column(0).physical_type(), PhysicalType::INT32);
    assert_eq!(descr.column(1).physical_type(), PhysicalType::BYTE_ARRAY);
    assert_eq!(descr.column(1).max_def_level(), 1);
  }

  #[test]
  fn test_from_thrift_nested() {
    // message schema { optional group bag { repeated group records { required int64 x } } }
    let elements = vec![
      group_element("schema", None, 1),
      group_element("bag", Some(1), 1),
      group_element("records", Some(2), 1),
      leaf_element("x", 2, 0),
    ];
    let root = from_thrift(&elements).expect("from_thrift should be OK");
    let descr = SchemaDescriptor::new(root);
    assert_eq!(descr.num_columns(), 1);
    assert_eq!(descr.column(0).path().string(), "bag.records.x");
    assert_eq!(descr.column(0).max_def_level(), 2);
    assert_eq!(descr.column(0).max_rep_level(), 1);
  }

  #[test]
  fn test_from_thrift_child_count_mismatch() {
    // group claims 3 children but only 2 elements follow
    let elements = vec![
      group_element("schema", None, 3),
      leaf_element("a", 1, 0),
      leaf_element("b", 1, 0),
    ];
    assert!(from_thrift(&elements).is_err());

    // group claims 1 child but 2 elements follow
    let elements = vec![
      group_element("schema", None, 1),
      leaf_element("a", 1, 0),
      leaf_element("b", 1, 0),
    ];
    assert!(from_thrift(&elements).is_err());
  }

  #[test]
  fn test_from_thrift_root_must_be_group() {
    let elements = vec![leaf_element("a", 1, 0)];
    assert!(from_thrift(&elements).is_err());
  }

  #[test]
  fn test_from_thrift_missing_repetition_on_leaf() {
    let elements = vec![
      group_element("schema", None, 1),
      SchemaElement {
        type_: Some(1),
        name: "a".to_owned(),
        ..Default::default()
      },
    ];
    assert!(from_thrift(&elements).is_err());
  }
}
