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

//! Conversion between the striped (value, repetition level, definition
//! level) representation of one leaf column and its nested form.
//!
//! The repetition axis: a slot with repetition level 0 starts a new
//! top-level record; a slot with level `r` keeps the outermost `r` lists
//! of the current record open and starts fresh lists below them.
//!
//! The definition axis: a slot whose definition level `d` is below the
//! leaf's maximum marks the first absent ancestor — entry `d` of the
//! leaf's level spec. An absent REPEATED ancestor is a present-but-empty
//! list at its list depth; an absent OPTIONAL ancestor is a null at the
//! innermost list depth that is still present.

use std::mem;

use crate::basic::Repetition;
use crate::errors::{corrupt_data_err, invalid_err, Result};
use crate::record::api::Value;
use crate::schema::types::ColumnDescriptor;

// ----------------------------------------------------------------------
// Flat -> hierarchical

/// What one flat slot contributes to the nested output.
enum Slot {
  /// A present leaf value, at full nesting depth.
  Leaf(Value),
  /// A null at list depth `0..=max_rep` (0 means the record itself).
  Null(i16),
  /// An empty list at list depth `1..=max_rep`.
  Empty(i16)
}

/// Incremental builder for nested record values: a stack of one open
/// element vector per list depth.
struct Nester {
  max_rep: i16,
  stack: Vec<Vec<Value>>,
  open_depth: i16,
  record_null: bool,
  started: bool,
  records: Vec<Value>
}

impl Nester {
  fn new(max_rep: i16) -> Self {
    assert!(max_rep >= 1);
    Nester {
      max_rep,
      stack: (0..max_rep).map(|_| vec![]).collect(),
      open_depth: 0,
      record_null: false,
      started: false,
      records: vec![]
    }
  }

  fn start_record(&mut self) {
    if self.started {
      self.flush_record();
    }
    self.started = true;
    self.open_depth = 0;
    self.record_null = false;
  }

  /// Close every list deeper than `r`, folding each into its parent.
  fn rewind(&mut self, r: i16) -> Result<()> {
    if !self.started || r > self.open_depth {
      return Err(corrupt_data_err!(
        "Repetition level {} continues a list that is not open", r));
    }
    let mut d = self.open_depth;
    while d > r {
      let inner = mem::replace(&mut self.stack[(d - 1) as usize], vec![]);
      self.stack[(d - 2) as usize].push(Value::List(inner));
      d -= 1;
    }
    self.open_depth = r;
    Ok(())
  }

  fn push(&mut self, slot: Slot) {
    match slot {
      Slot::Leaf(value) => {
        self.stack[(self.max_rep - 1) as usize].push(value);
        self.open_depth = self.max_rep;
      }
      Slot::Null(0) => {
        self.record_null = true;
        self.open_depth = 0;
      }
      Slot::Null(depth) => {
        self.stack[(depth - 1) as usize].push(Value::Null);
        self.open_depth = depth;
      }
      Slot::Empty(1) => {
        // the record's outermost list is present but empty
        self.open_depth = 1;
      }
      Slot::Empty(depth) => {
        self.stack[(depth - 2) as usize].push(Value::List(vec![]));
        self.open_depth = depth - 1;
      }
    }
  }

  fn flush_record(&mut self) {
    if self.record_null {
      self.records.push(Value::Null);
      return;
    }
    let mut d = self.open_depth;
    while d > 1 {
      let inner = mem::replace(&mut self.stack[(d - 1) as usize], vec![]);
      self.stack[(d - 2) as usize].push(Value::List(inner));
      d -= 1;
    }
    let top = mem::replace(&mut self.stack[0], vec![]);
    self.records.push(Value::List(top));
  }

  fn finish(mut self) -> Vec<Value> {
    if self.started {
      self.flush_record();
    }
    self.records
  }
}

fn nest_slots<I>(max_rep: i16, slots: I, rep_levels: &[i16]) -> Result<Vec<Value>>
where I: IntoIterator<Item = Slot> {
  let mut nester = Nester::new(max_rep);
  for (i, slot) in slots.into_iter().enumerate() {
    let r = rep_levels[i];
    if r < 0 || r > max_rep {
      return Err(corrupt_data_err!(
        "Repetition level {} out of range [0, {}]", r, max_rep));
    }
    if r == 0 {
      nester.start_record();
    } else {
      nester.rewind(r)?;
    }
    nester.push(slot);
  }
  Ok(nester.finish())
}

/// Convert one leaf's flat value stream into nested records on the
/// repetition axis only: all values are present, `rep_levels` decides the
/// list structure. For a leaf of max repetition level R, every record in
/// the output is an R-deep nested list.
pub fn flat_to_hierarchy(max_rep: i16, values: Vec<Value>,
                         rep_levels: &[i16]) -> Result<Vec<Value>> {
  if values.len() != rep_levels.len() {
    return Err(invalid_err!(
      "Value count {} does not match repetition level count {}",
      values.len(), rep_levels.len()));
  }
  if max_rep == 0 {
    return Ok(values);
  }
  nest_slots(max_rep, values.into_iter().map(Slot::Leaf), rep_levels)
}

/// The inverse of `flat_to_hierarchy`: traverse nested records depth-first
/// and emit (values, repetition levels). Defined for non-empty nested
/// sequences; an empty inner list has no flat form on the repetition axis
/// alone (it needs a definition level) and is rejected.
pub fn hierarchy_to_flat(max_rep: i16,
                         records: &[Value]) -> Result<(Vec<Value>, Vec<i16>)> {
  let mut values = vec![];
  let mut rep_levels = vec![];
  for record in records {
    flatten_value(record, 0, max_rep, 0, &mut values, &mut rep_levels)?;
  }
  Ok((values, rep_levels))
}

fn flatten_value(value: &Value, depth: i16, max_rep: i16, entry_rep: i16,
                 values: &mut Vec<Value>, rep_levels: &mut Vec<i16>) -> Result<()> {
  if depth == max_rep {
    values.push(value.clone());
    rep_levels.push(entry_rep);
    return Ok(());
  }
  match value {
    Value::List(elements) => {
      if elements.is_empty() {
        return Err(invalid_err!(
          "Empty list at depth {} has no repetition-only flat form", depth + 1));
      }
      for (i, element) in elements.iter().enumerate() {
        let rep = if i == 0 { entry_rep } else { depth + 1 };
        flatten_value(element, depth + 1, max_rep, rep, values, rep_levels)?;
      }
      Ok(())
    }
    _ => Err(invalid_err!(
      "Expected a list at depth {} for max repetition level {}", depth + 1, max_rep))
  }
}

// ----------------------------------------------------------------------
// Full assembly with definition levels

/// Convert one leaf column's decoded streams into one `Value` per
/// top-level record. `values` carries a `Value::Null` placeholder in the
/// slots where `def_levels` is below the maximum; the leaf's level spec
/// decides whether such a slot means a null or an empty list, and at which
/// depth.
pub fn assemble_records(descr: &ColumnDescriptor, values: Vec<Value>,
                        def_levels: &[i16], rep_levels: &[i16]) -> Result<Vec<Value>> {
  let n = values.len();
  if def_levels.len() != n || rep_levels.len() != n {
    return Err(corrupt_data_err!(
      "Column stream lengths disagree: {} values, {} definition levels, {} repetition levels",
      n, def_levels.len(), rep_levels.len()));
  }
  let max_def = descr.max_def_level();
  let max_rep = descr.max_rep_level();
  let spec = descr.level_spec();

  if max_rep == 0 {
    let mut records = Vec::with_capacity(n);
    for (i, value) in values.into_iter().enumerate() {
      let d = def_levels[i];
      if d == max_def {
        records.push(value);
      } else if d >= 0 && d < max_def {
        records.push(Value::Null);
      } else {
        return Err(corrupt_data_err!(
          "Definition level {} out of range [0, {}]", d, max_def));
      }
    }
    return Ok(records);
  }

  let mut slots = Vec::with_capacity(n);
  for (i, value) in values.into_iter().enumerate() {
    let d = def_levels[i];
    if d == max_def {
      slots.push(Slot::Leaf(value));
    } else if d >= 0 && d < max_def {
      // ancestors with definition levels 1..=d are present; entry `d` of
      // the level spec is the first absent one
      let blocked = spec[d as usize];
      let open_lists = spec[..d as usize]
        .iter()
        .filter(|r| **r == Repetition::REPEATED)
        .count() as i16;
      match blocked {
        Repetition::REPEATED => slots.push(Slot::Empty(open_lists + 1)),
        Repetition::OPTIONAL => slots.push(Slot::Null(open_lists)),
        Repetition::REQUIRED => {
          return Err(corrupt_data_err!(
            "Level spec of column {} contains a REQUIRED entry", descr.path()))
        }
      }
    } else {
      return Err(corrupt_data_err!(
        "Definition level {} out of range [0, {}]", d, max_def));
    }
  }
  nest_slots(max_rep, slots, rep_levels)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
  use crate::schema::types::{ColumnPath, Type};
  use std::rc::Rc;

  fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Long(*v)).collect()
  }

  fn list(values: &[i64]) -> Value {
    Value::List(ints(values))
  }

  #[test]
  fn test_flat_to_hierarchy_depth_one() {
    let values = ints(&[1, 2, 3, 4]);
    let rep_levels = vec![0, 1, 0, 1];
    let result = flat_to_hierarchy(1, values, &rep_levels).unwrap();
    assert_eq!(result, vec![list(&[1, 2]), list(&[3, 4])]);
  }

  #[test]
  fn test_flat_to_hierarchy_depth_two() {
    let values = ints(&[9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 6, 7, 19, 20, 21, 22, 23]);
    let rep_levels = vec![0, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2];
    let result = flat_to_hierarchy(2, values, &rep_levels).unwrap();
    assert_eq!(result, vec![Value::List(vec![
      list(&[9, 10, 11, 12, 13, 14, 15, 16, 17, 18]),
      list(&[6, 7, 19, 20, 21, 22, 23])
    ])]);
  }

  #[test]
  fn test_flat_to_hierarchy_depth_zero() {
    let values = ints(&[1, 2, 3]);
    let rep_levels = vec![0, 0, 0];
    let result = flat_to_hierarchy(0, values.clone(), &rep_levels).unwrap();
    assert_eq!(result, values);
  }

  #[test]
  fn test_hierarchy_to_flat_depth_one() {
    let nested = vec![list(&[1, 2]), list(&[3, 4])];
    let (values, rep_levels) = hierarchy_to_flat(1, &nested).unwrap();
    assert_eq!(values, ints(&[1, 2, 3, 4]));
    assert_eq!(rep_levels, vec![0, 1, 0, 1]);
  }

  #[test]
  fn test_roundtrip() {
    // R = 0
    let nested = ints(&[5, 6, 7]);
    let (values, reps) = hierarchy_to_flat(0, &nested).unwrap();
    assert_eq!(flat_to_hierarchy(0, values, &reps).unwrap(), nested);

    // R = 1
    let nested = vec![list(&[1]), list(&[2, 3, 4]), list(&[5, 6])];
    let (values, reps) = hierarchy_to_flat(1, &nested).unwrap();
    assert_eq!(flat_to_hierarchy(1, values, &reps).unwrap(), nested);

    // R = 2
    let nested = vec![
      Value::List(vec![list(&[1, 2]), list(&[3])]),
      Value::List(vec![list(&[4])]),
    ];
    let (values, reps) = hierarchy_to_flat(2, &nested).unwrap();
    assert_eq!(flat_to_hierarchy(2, values, &reps).unwrap(), nested);

    // R = 3
    let nested = vec![Value::List(vec![
      Value::List(vec![list(&[1]), list(&[2, 3])]),
      Value::List(vec![list(&[4, 5])]),
    ])];
    let (values, reps) = hierarchy_to_flat(3, &nested).unwrap();
    assert_eq!(reps, vec![0, 2, 3, 1, 3]);
    assert_eq!(flat_to_hierarchy(3, values, &reps).unwrap(), nested);
  }

  #[test]
  fn test_hierarchy_to_flat_rejects_empty_inner() {
    let nested = vec![Value::List(vec![])];
    assert!(hierarchy_to_flat(1, &nested).is_err());
  }

  fn list_leaf_descriptor() -> ColumnDescriptor {
    // optional group a (LIST) { repeated group list { required int64 element } }
    let leaf = Type::new_primitive_type(
      "element", Repetition::REQUIRED, PhysicalType::INT64,
      LogicalType::NONE, 0, 0, 0, None).unwrap();
    ColumnDescriptor::new(
      Rc::new(leaf), 2, 1,
      vec![Repetition::OPTIONAL, Repetition::REPEATED],
      ColumnPath::new(vec!["a".to_owned(), "list".to_owned(), "element".to_owned()]))
  }

  #[test]
  fn test_assemble_present_values() {
    let descr = list_leaf_descriptor();
    let values = ints(&[1, 2, 3]);
    let records = assemble_records(&descr, values, &[2, 2, 2], &[0, 1, 0]).unwrap();
    assert_eq!(records, vec![list(&[1, 2]), list(&[3])]);
  }

  #[test]
  fn test_assemble_empty_list() {
    // a present outer list with zero elements: def = max_def - 1 at rep 0
    let descr = list_leaf_descriptor();
    let values = vec![Value::Long(1), Value::Null, Value::Long(2)];
    let records = assemble_records(&descr, values, &[2, 1, 2], &[0, 0, 0]).unwrap();
    assert_eq!(records, vec![list(&[1]), Value::List(vec![]), list(&[2])]);
  }

  #[test]
  fn test_assemble_null_list() {
    // def = 0: the optional outer group itself is absent
    let descr = list_leaf_descriptor();
    let values = vec![Value::Null, Value::Long(7)];
    let records = assemble_records(&descr, values, &[0, 2], &[0, 0]).unwrap();
    assert_eq!(records, vec![Value::Null, list(&[7])]);
  }

  #[test]
  fn test_assemble_optional_leaf_in_list() {
    // optional group bag { repeated group records { optional bool item } }
    let leaf = Type::new_primitive_type(
      "item", Repetition::OPTIONAL, PhysicalType::BOOLEAN,
      LogicalType::NONE, 0, 0, 0, None).unwrap();
    let descr = ColumnDescriptor::new(
      Rc::new(leaf), 3, 1,
      vec![Repetition::OPTIONAL, Repetition::REPEATED, Repetition::OPTIONAL],
      ColumnPath::new(vec!["bag".to_owned(), "records".to_owned(), "item".to_owned()]));

    // record 1: [true, null]; record 2: empty; record 3: null
    let values = vec![Value::Bool(true), Value::Null, Value::Null, Value::Null];
    let records =
      assemble_records(&descr, values, &[3, 2, 1, 0], &[0, 1, 0, 0]).unwrap();
    assert_eq!(records, vec![
      Value::List(vec![Value::Bool(true), Value::Null]),
      Value::List(vec![]),
      Value::Null
    ]);
  }

  #[test]
  fn test_assemble_flat_optional_column() {
    let leaf = Type::new_primitive_type(
      "b", Repetition::OPTIONAL, PhysicalType::INT64,
      LogicalType::NONE, 0, 0, 0, None).unwrap();
    let descr = ColumnDescriptor::new(
      Rc::new(leaf), 1, 0, vec![Repetition::OPTIONAL],
      ColumnPath::new(vec!["b".to_owned()]));

    let values = vec![Value::Long(10), Value::Null, Value::Long(30)];
    let records = assemble_records(&descr, values, &[1, 0, 1], &[0, 0, 0]).unwrap();
    assert_eq!(records, vec![Value::Long(10), Value::Null, Value::Long(30)]);
  }

  #[test]
  fn test_assemble_two_deep_empty_inner() {
    // repeated group outer { repeated int64 inner } as a 2-level nesting:
    // level spec [REPEATED, REPEATED], max_def 2, max_rep 2
    let leaf = Type::new_primitive_type(
      "inner", Repetition::REPEATED, PhysicalType::INT64,
      LogicalType::NONE, 0, 0, 0, None).unwrap();
    let descr = ColumnDescriptor::new(
      Rc::new(leaf), 2, 2,
      vec![Repetition::REPEATED, Repetition::REPEATED],
      ColumnPath::new(vec!["outer".to_owned(), "inner".to_owned()]));

    // record: [[1, 2], [], [3]]
    let values = vec![
      Value::Long(1), Value::Long(2), Value::Null, Value::Long(3)
    ];
    let records =
      assemble_records(&descr, values, &[2, 2, 1, 2], &[0, 2, 1, 1]).unwrap();
    assert_eq!(records, vec![Value::List(vec![
      list(&[1, 2]),
      Value::List(vec![]),
      list(&[3])
    ])]);
  }

  #[test]
  fn test_assemble_rejects_bad_levels() {
    let descr = list_leaf_descriptor();
    // definition level above the maximum
    assert!(assemble_records(&descr, vec![Value::Long(1)], &[3], &[0]).is_err());
    // first slot not starting a record
    assert!(assemble_records(&descr, vec![Value::Long(1)], &[2], &[1]).is_err());
    // mismatched stream lengths
    assert!(assemble_records(&descr, vec![Value::Long(1)], &[2, 2], &[0]).is_err());
  }
}
