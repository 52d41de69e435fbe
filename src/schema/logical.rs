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

//! The hierarchical view of a Parquet schema: structs, lists and maps
//! recognized from their group annotations, with the virtual layers of
//! LIST groups (the repeated `list`/`array`/`bag`/`tuple` child and its
//! `element`) folded away. Logical dotted paths therefore name what a
//! consumer sees, while `ColumnDescriptor` keeps the physical
//! `path_in_schema` of the underlying chunks.

use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
use crate::errors::{corrupt_meta_err, Result};
use crate::schema::types::{SchemaDescriptor, Type, TypePtr};

/// Names the two-level/three-level list rule treats as a virtual list layer.
const LIST_LAYER_NAMES: [&str; 4] = ["list", "array", "bag", "tuple"];

#[derive(Debug, Clone, PartialEq)]
pub enum LogicalField {
  Primitive {
    name: String,
    /// Dotted logical path, virtual list/map layers excluded.
    path: String,
    /// Index of this leaf in schema DFS order; equals the index of its
    /// column chunk within every row group.
    leaf_index: usize,
    physical_type: PhysicalType,
    logical_type: LogicalType,
    type_length: i32,
    precision: i32,
    scale: i32,
    repetition: Repetition
  },
  Struct {
    name: String,
    fields: Vec<LogicalField>
  },
  List {
    name: String,
    element: Box<LogicalField>
  },
  Map {
    name: String,
    key: Box<LogicalField>,
    value: Box<LogicalField>
  }
}

impl LogicalField {
  pub fn name(&self) -> &str {
    match self {
      LogicalField::Primitive { name, .. } => name,
      LogicalField::Struct { name, .. } => name,
      LogicalField::List { name, .. } => name,
      LogicalField::Map { name, .. } => name
    }
  }
}

/// The hierarchical logical schema of a file, or of a projected subset of
/// its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalSchema {
  name: String,
  fields: Vec<LogicalField>
}

impl LogicalSchema {
  pub fn from_descriptor(descr: &SchemaDescriptor) -> Result<LogicalSchema> {
    let root = descr.root_schema();
    let mut next_leaf = 0;
    let mut fields = vec![];
    for f in root.get_fields() {
      fields.push(convert(f, vec![f.name().to_owned()], &mut next_leaf, false)?);
    }
    if next_leaf != descr.num_columns() {
      return Err(corrupt_meta_err!(
        "Logical schema has {} leaves, descriptor has {}", next_leaf, descr.num_columns()));
    }
    Ok(LogicalSchema { name: root.name().to_owned(), fields })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn fields(&self) -> &[LogicalField] {
    &self.fields
  }

  /// All primitive leaves in DFS order, paired with their leaf index.
  pub fn leaves(&self) -> Vec<&LogicalField> {
    let mut result = vec![];
    for f in &self.fields {
      collect_leaves(f, &mut result);
    }
    result
  }

  /// Logical dotted path of every leaf, indexed by leaf index. Only valid
  /// on an unpruned schema, where leaf indices are dense.
  pub fn leaf_paths(&self) -> Vec<String> {
    let leaves = self.leaves();
    let mut paths = vec![String::new(); leaves.len()];
    for leaf in leaves {
      if let LogicalField::Primitive { path, leaf_index, .. } = leaf {
        paths[*leaf_index] = path.clone();
      }
    }
    paths
  }

  /// A copy of this schema containing only the leaves for which `keep` is
  /// true; groups left without any kept leaf are dropped.
  pub fn retain_leaves(&self, keep: &[bool]) -> LogicalSchema {
    let fields = self.fields.iter().filter_map(|f| retain(f, keep)).collect();
    LogicalSchema { name: self.name.clone(), fields }
  }
}

fn collect_leaves<'a>(field: &'a LogicalField, out: &mut Vec<&'a LogicalField>) {
  match field {
    LogicalField::Primitive { .. } => out.push(field),
    LogicalField::Struct { fields, .. } => {
      for f in fields {
        collect_leaves(f, out);
      }
    }
    LogicalField::List { element, .. } => collect_leaves(element, out),
    LogicalField::Map { key, value, .. } => {
      collect_leaves(key, out);
      collect_leaves(value, out);
    }
  }
}

fn retain(field: &LogicalField, keep: &[bool]) -> Option<LogicalField> {
  match field {
    LogicalField::Primitive { leaf_index, .. } => {
      if keep.get(*leaf_index).copied().unwrap_or(false) {
        Some(field.clone())
      } else {
        None
      }
    }
    LogicalField::Struct { name, fields } => {
      let kept: Vec<_> = fields.iter().filter_map(|f| retain(f, keep)).collect();
      if kept.is_empty() {
        None
      } else {
        Some(LogicalField::Struct { name: name.clone(), fields: kept })
      }
    }
    LogicalField::List { name, element } => {
      retain(element, keep).map(|e| LogicalField::List {
        name: name.clone(),
        element: Box::new(e)
      })
    }
    LogicalField::Map { name, key, value } => {
      match (retain(key, keep), retain(value, keep)) {
        (Some(k), Some(v)) => Some(LogicalField::Map {
          name: name.clone(),
          key: Box::new(k),
          value: Box::new(v)
        }),
        // a half-projected map degrades to a struct holding the kept side
        (Some(k), None) => Some(LogicalField::Struct {
          name: name.clone(),
          fields: vec![k]
        }),
        (None, Some(v)) => Some(LogicalField::Struct {
          name: name.clone(),
          fields: vec![v]
        }),
        (None, None) => None
      }
    }
  }
}

/// Convert one schema node. `path` is the logical path assigned to this
/// subtree; primitives take it verbatim, struct children extend it. When
/// `as_element` is set the node is already known to be the element of a
/// two-level list and the legacy repeated-field rule must not re-apply.
fn convert(tp: &TypePtr, path: Vec<String>, next_leaf: &mut usize,
           as_element: bool) -> Result<LogicalField> {
  let info = tp.get_basic_info();
  match info.logical_type() {
    LogicalType::LIST if tp.is_group() => return convert_list(tp, path, next_leaf),
    LogicalType::MAP | LogicalType::MAP_KEY_VALUE if tp.is_group() => {
      return convert_map(tp, path, next_leaf)
    }
    _ => {}
  }

  // a REPEATED field outside any LIST annotation is itself a list
  if !as_element && info.has_repetition() && info.repetition() == Repetition::REPEATED {
    let element = convert_element(tp, path, next_leaf)?;
    return Ok(LogicalField::List {
      name: info.name().to_owned(),
      element: Box::new(element)
    });
  }

  convert_element(tp, path, next_leaf)
}

/// Convert a node that stands for a value (a leaf, or a struct), without
/// applying the repeated-field rule to the node itself.
fn convert_element(tp: &TypePtr, path: Vec<String>,
                   next_leaf: &mut usize) -> Result<LogicalField> {
  let info = tp.get_basic_info();
  match tp.as_ref() {
    Type::PrimitiveType { physical_type, type_length, scale, precision, .. } => {
      let leaf_index = *next_leaf;
      *next_leaf += 1;
      Ok(LogicalField::Primitive {
        name: info.name().to_owned(),
        path: path.join("."),
        leaf_index,
        physical_type: *physical_type,
        logical_type: info.logical_type(),
        type_length: *type_length,
        precision: *precision,
        scale: *scale,
        repetition: info.repetition()
      })
    }
    Type::GroupType { fields, .. } => {
      match info.logical_type() {
        LogicalType::LIST => convert_list(tp, path, next_leaf),
        LogicalType::MAP | LogicalType::MAP_KEY_VALUE => convert_map(tp, path, next_leaf),
        _ => {
          let mut converted = vec![];
          for f in fields {
            let mut child_path = path.clone();
            child_path.push(f.name().to_owned());
            converted.push(convert(f, child_path, next_leaf, false)?);
          }
          Ok(LogicalField::Struct { name: info.name().to_owned(), fields: converted })
        }
      }
    }
  }
}

fn convert_list(tp: &TypePtr, path: Vec<String>,
                next_leaf: &mut usize) -> Result<LogicalField> {
  let fields = tp.get_fields();
  if fields.len() != 1 {
    return Err(corrupt_meta_err!(
      "LIST-annotated group '{}' must have exactly one child, found {}",
      tp.name(), fields.len()));
  }
  let repeated = &fields[0];
  let rep_info = repeated.get_basic_info();
  if !rep_info.has_repetition() || rep_info.repetition() != Repetition::REPEATED {
    return Err(corrupt_meta_err!(
      "Child of LIST-annotated group '{}' must be REPEATED", tp.name()));
  }

  // three-level form: repeated group named list/array/bag/tuple wrapping a
  // single element child; otherwise the repeated child itself is the element
  let element = if repeated.is_group()
    && LIST_LAYER_NAMES.contains(&rep_info.name())
    && repeated.get_fields().len() == 1
  {
    convert(&repeated.get_fields()[0], path, next_leaf, false)?
  } else {
    convert(repeated, path, next_leaf, true)?
  };

  Ok(LogicalField::List {
    name: tp.name().to_owned(),
    element: Box::new(element)
  })
}

fn convert_map(tp: &TypePtr, path: Vec<String>,
               next_leaf: &mut usize) -> Result<LogicalField> {
  let fields = tp.get_fields();
  if fields.len() != 1 {
    return Err(corrupt_meta_err!(
      "MAP-annotated group '{}' must have exactly one child, found {}",
      tp.name(), fields.len()));
  }
  let key_value = &fields[0];
  let kv_info = key_value.get_basic_info();
  if !key_value.is_group()
    || !kv_info.has_repetition()
    || kv_info.repetition() != Repetition::REPEATED
    || key_value.get_fields().len() != 2
  {
    return Err(corrupt_meta_err!(
      "MAP-annotated group '{}' must contain a single REPEATED group with two children",
      tp.name()));
  }
  let key_node = &key_value.get_fields()[0];
  let value_node = &key_value.get_fields()[1];
  if !key_node.is_primitive()
    || key_node.get_basic_info().repetition() != Repetition::REQUIRED
  {
    return Err(corrupt_meta_err!(
      "MAP key of group '{}' must be a REQUIRED primitive", tp.name()));
  }

  let mut key_path = path.clone();
  key_path.push(key_node.name().to_owned());
  let key = convert(key_node, key_path, next_leaf, false)?;

  let mut value_path = path.clone();
  value_path.push(value_node.name().to_owned());
  let value = convert(value_node, value_path, next_leaf, false)?;

  Ok(LogicalField::Map {
    name: tp.name().to_owned(),
    key: Box::new(key),
    value: Box::new(value)
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::format::SchemaElement;
  use crate::schema::types::{from_thrift, SchemaDescriptor};

  fn leaf(name: &str, type_: i32, repetition: i32) -> SchemaElement {
    SchemaElement {
      type_: Some(type_),
      repetition_type: Some(repetition),
      name: name.to_owned(),
      ..Default::default()
    }
  }

  fn annotated_leaf(name: &str, type_: i32, repetition: i32, converted: i32) -> SchemaElement {
    SchemaElement {
      type_: Some(type_),
      repetition_type: Some(repetition),
      name: name.to_owned(),
      converted_type: Some(converted),
      ..Default::default()
    }
  }

  fn group(name: &str, repetition: Option<i32>, converted: Option<i32>,
           num_children: i32) -> SchemaElement {
    SchemaElement {
      repetition_type: repetition,
      name: name.to_owned(),
      converted_type: converted,
      num_children: Some(num_children),
      ..Default::default()
    }
  }

  fn schema_of(elements: Vec<SchemaElement>) -> (SchemaDescriptor, LogicalSchema) {
    let root = from_thrift(&elements).expect("from_thrift should be OK");
    let descr = SchemaDescriptor::new(root);
    let logical = LogicalSchema::from_descriptor(&descr).expect("conversion should be OK");
    (descr, logical)
  }

  #[test]
  fn test_three_level_list() {
    // message schema { optional group a (LIST) { repeated group list { optional int64 element } } }
    let elements = vec![
      group("schema", None, None, 1),
      group("a", Some(1), Some(3), 1),
      group("list", Some(2), None, 1),
      leaf("element", 2, 1),
    ];
    let (_, logical) = schema_of(elements);
    match &logical.fields()[0] {
      LogicalField::List { name, element } => {
        assert_eq!(name, "a");
        match element.as_ref() {
          LogicalField::Primitive { path, leaf_index, .. } => {
            // the virtual list/element layers are folded away
            assert_eq!(path, "a");
            assert_eq!(*leaf_index, 0);
          }
          other => panic!("Expected primitive element, got {:?}", other)
        }
      }
      other => panic!("Expected list, got {:?}", other)
    }
  }

  #[test]
  fn test_two_level_list() {
    // message schema { required group a (LIST) { repeated int32 item } }
    let elements = vec![
      group("schema", None, None, 1),
      group("a", Some(0), Some(3), 1),
      leaf("item", 1, 2),
    ];
    let (_, logical) = schema_of(elements);
    match &logical.fields()[0] {
      LogicalField::List { name, element } => {
        assert_eq!(name, "a");
        match element.as_ref() {
          LogicalField::Primitive { path, .. } => assert_eq!(path, "a"),
          other => panic!("Expected primitive element, got {:?}", other)
        }
      }
      other => panic!("Expected list, got {:?}", other)
    }
  }

  #[test]
  fn test_list_of_structs() {
    // message schema { optional group a (LIST) {
    //   repeated group list { required group element { required int32 x  required int32 y } } } }
    let elements = vec![
      group("schema", None, None, 1),
      group("a", Some(1), Some(3), 1),
      group("list", Some(2), None, 1),
      group("element", Some(0), None, 2),
      leaf("x", 1, 0),
      leaf("y", 1, 0),
    ];
    let (descr, logical) = schema_of(elements);
    assert_eq!(descr.num_columns(), 2);
    match &logical.fields()[0] {
      LogicalField::List { element, .. } => match element.as_ref() {
        LogicalField::Struct { fields, .. } => {
          assert_eq!(fields.len(), 2);
          match &fields[0] {
            LogicalField::Primitive { path, leaf_index, .. } => {
              assert_eq!(path, "a.x");
              assert_eq!(*leaf_index, 0);
            }
            other => panic!("Expected primitive, got {:?}", other)
          }
          match &fields[1] {
            LogicalField::Primitive { path, leaf_index, .. } => {
              assert_eq!(path, "a.y");
              assert_eq!(*leaf_index, 1);
            }
            other => panic!("Expected primitive, got {:?}", other)
          }
        }
        other => panic!("Expected struct element, got {:?}", other)
      },
      other => panic!("Expected list, got {:?}", other)
    }
  }

  #[test]
  fn test_map() {
    // message schema { optional group m (MAP) {
    //   repeated group key_value { required byte_array key (UTF8)  optional int32 value } } }
    let elements = vec![
      group("schema", None, None, 1),
      group("m", Some(1), Some(1), 1),
      group("key_value", Some(2), None, 2),
      annotated_leaf("key", 6, 0, 0),
      leaf("value", 1, 1),
    ];
    let (descr, logical) = schema_of(elements);
    assert_eq!(descr.num_columns(), 2);
    match &logical.fields()[0] {
      LogicalField::Map { name, key, value } => {
        assert_eq!(name, "m");
        match key.as_ref() {
          LogicalField::Primitive { path, .. } => assert_eq!(path, "m.key"),
          other => panic!("Expected primitive key, got {:?}", other)
        }
        match value.as_ref() {
          LogicalField::Primitive { path, .. } => assert_eq!(path, "m.value"),
          other => panic!("Expected primitive value, got {:?}", other)
        }
      }
      other => panic!("Expected map, got {:?}", other)
    }
  }

  #[test]
  fn test_legacy_repeated_leaf() {
    let elements = vec![
      group("schema", None, None, 1),
      leaf("c", 6, 2),
    ];
    let (_, logical) = schema_of(elements);
    match &logical.fields()[0] {
      LogicalField::List { name, element } => {
        assert_eq!(name, "c");
        match element.as_ref() {
          LogicalField::Primitive { path, .. } => assert_eq!(path, "c"),
          other => panic!("Expected primitive element, got {:?}", other)
        }
      }
      other => panic!("Expected list, got {:?}", other)
    }
  }

  #[test]
  fn test_invalid_list_shapes() {
    // LIST group with two children
    let elements = vec![
      group("schema", None, None, 1),
      group("a", Some(1), Some(3), 2),
      leaf("x", 1, 2),
      leaf("y", 1, 2),
    ];
    let root = from_thrift(&elements).unwrap();
    let descr = SchemaDescriptor::new(root);
    assert!(LogicalSchema::from_descriptor(&descr).is_err());

    // LIST group whose child is not repeated
    let elements = vec![
      group("schema", None, None, 1),
      group("a", Some(1), Some(3), 1),
      leaf("item", 1, 1),
    ];
    let root = from_thrift(&elements).unwrap();
    let descr = SchemaDescriptor::new(root);
    assert!(LogicalSchema::from_descriptor(&descr).is_err());
  }

  #[test]
  fn test_invalid_map_key() {
    // key is OPTIONAL
    let elements = vec![
      group("schema", None, None, 1),
      group("m", Some(1), Some(1), 1),
      group("key_value", Some(2), None, 2),
      leaf("key", 6, 1),
      leaf("value", 1, 1),
    ];
    let root = from_thrift(&elements).unwrap();
    let descr = SchemaDescriptor::new(root);
    assert!(LogicalSchema::from_descriptor(&descr).is_err());
  }

  #[test]
  fn test_retain_leaves() {
    let elements = vec![
      group("schema", None, None, 3),
      leaf("a", 1, 0),
      leaf("b", 6, 1),
      group("g", Some(1), None, 2),
      leaf("x", 1, 1),
      leaf("y", 1, 1),
    ];
    let (descr, logical) = schema_of(elements);
    assert_eq!(descr.num_columns(), 4);
    assert_eq!(logical.leaf_paths(), vec!["a", "b", "g.x", "g.y"]);

    // keep only leaf "b"
    let pruned = logical.retain_leaves(&[false, true, false, false]);
    assert_eq!(pruned.fields().len(), 1);
    assert_eq!(pruned.fields()[0].name(), "b");

    // keep only "g.y": the containing struct survives with one field
    let pruned = logical.retain_leaves(&[false, false, false, true]);
    assert_eq!(pruned.fields().len(), 1);
    match &pruned.fields()[0] {
      LogicalField::Struct { name, fields } => {
        assert_eq!(name, "g");
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "y");
      }
      other => panic!("Expected struct, got {:?}", other)
    }
  }
}
