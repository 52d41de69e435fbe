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

//! Row and column materialization: composes footer metadata, chunk
//! decoding and record assembly into either a column-major `DataSet` or a
//! lazy row-major iterator. Both honour the same projection and
//! offset/count options and emit identical (row, column, value) triples.
//!
//! Pagination works on row-group windows: a group entirely before the
//! offset (or after the count is satisfied) is never opened; inside a
//! group, skipping happens on the flat streams by counting slots with
//! repetition level 0 before assembly.

use std::cmp;
use std::collections::VecDeque;

use crate::column::reader::DecodedColumn;
use crate::errors::{corrupt_data_err, ParquetError, Result};
use crate::file::reader::{ReaderOptions, SerializedFileReader};
use crate::record::api::Value;
use crate::record::assembly::assemble_records;
use crate::schema::logical::LogicalSchema;
use crate::schema::projection;
use crate::util::io::ByteSource;

// ----------------------------------------------------------------------
// Column-major output

/// Column-major materialization of (a window of) a file: one top-level
/// value list per projected leaf, keyed by the leaf's logical dotted path,
/// in schema leaf order.
pub struct DataSet {
  schema: LogicalSchema,
  columns: Vec<(String, Vec<Value>)>,
  num_rows: i64
}

impl DataSet {
  /// The logical schema, pruned to the projected leaves.
  pub fn schema(&self) -> &LogicalSchema {
    &self.schema
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  /// All materialized columns in schema leaf order.
  pub fn columns(&self) -> &[(String, Vec<Value>)] {
    &self.columns
  }

  /// One column by its logical dotted path.
  pub fn column(&self, path: &str) -> Option<&[Value]> {
    self.columns.iter()
      .find(|(p, _)| p == path)
      .map(|(_, values)| values.as_slice())
  }
}

// ----------------------------------------------------------------------
// Shared engine pieces

/// Which rows of a row group fall inside the (offset, count) window:
/// (rows to skip into the group, rows to emit from it).
fn group_window(offset: i64, count: i64, scheduled: i64,
                group_start: i64, group_rows: i64) -> (i64, i64) {
  if group_start + group_rows <= offset {
    return (0, 0);
  }
  if count != -1 && scheduled >= count {
    return (0, 0);
  }
  let skip = cmp::max(0, offset - group_start);
  let available = group_rows - skip;
  let take = if count == -1 {
    available
  } else {
    cmp::min(count - scheduled, available)
  };
  (skip, cmp::max(0, take))
}

/// Leaves accepted by the projection predicates, by leaf index. Predicates
/// match the chunk's physical dotted path.
fn projected_leaves<S: ByteSource>(reader: &SerializedFileReader<S>,
                                   options: &ReaderOptions) -> Vec<bool> {
  let descr = reader.schema_descr();
  (0..descr.num_columns())
    .map(|i| {
      let path = descr.column(i).path().string();
      projection::accepts(options.columns.as_deref(), &path)
    })
    .collect()
}

/// Drop the flat slots outside the record window [skip, skip + take),
/// counting top-level records by repetition level 0.
fn slice_records(col: DecodedColumn, skip: i64, take: i64,
                 expected_records: i64) -> Result<DecodedColumn> {
  let mut boundaries = vec![];
  for (i, r) in col.rep_levels.iter().enumerate() {
    if *r == 0 {
      boundaries.push(i);
    }
  }
  if boundaries.len() as i64 != expected_records {
    return Err(corrupt_data_err!(
      "column chunk holds {} records, row group declares {}",
      boundaries.len(), expected_records));
  }
  if skip == 0 && take == expected_records {
    return Ok(col);
  }
  let start_record = skip as usize;
  let end_record = (skip + take) as usize;
  let start_slot = boundaries.get(start_record).copied().unwrap_or(col.values.len());
  let end_slot = boundaries.get(end_record).copied().unwrap_or(col.values.len());
  Ok(DecodedColumn {
    values: col.values[start_slot..end_slot].to_vec(),
    def_levels: col.def_levels[start_slot..end_slot].to_vec(),
    rep_levels: col.rep_levels[start_slot..end_slot].to_vec()
  })
}

/// Decode one leaf of one row group, slice it to the record window, and
/// assemble nested per-record values. Failures are wrapped with the
/// column's path.
fn leaf_records<S: ByteSource>(reader: &SerializedFileReader<S>, rg_index: usize,
                               leaf: usize, skip: i64, take: i64,
                               expected_records: i64) -> Result<Vec<Value>> {
  let descr = reader.schema_descr().column(leaf);
  let result = reader
    .decode_leaf(rg_index, leaf)
    .and_then(|col| slice_records(col, skip, take, expected_records))
    .and_then(|col| {
      let DecodedColumn { values, def_levels, rep_levels } = col;
      assemble_records(&descr, values, &def_levels, &rep_levels)
    });
  result.map_err(|e| ParquetError::ColumnRead(descr.path().string(), Box::new(e)))
}

// ----------------------------------------------------------------------
// Column-major reader

pub(crate) fn read_dataset<S: ByteSource>(reader: &SerializedFileReader<S>,
                                          options: ReaderOptions) -> Result<DataSet> {
  options.validate()?;
  let keep = projected_leaves(reader, &options);
  let kept: Vec<usize> =
    keep.iter().enumerate().filter(|(_, k)| **k).map(|(i, _)| i).collect();
  let paths = reader.leaf_paths();

  let mut columns: Vec<(String, Vec<Value>)> =
    kept.iter().map(|i| (paths[*i].clone(), vec![])).collect();

  let mut group_start = 0i64;
  let mut scheduled = 0i64;
  for rg_index in 0..reader.metadata().num_row_groups() {
    if options.count != -1 && scheduled >= options.count {
      break;
    }
    let group_rows = reader.metadata().row_group(rg_index).num_rows();
    let (skip, take) =
      group_window(options.offset, options.count, scheduled, group_start, group_rows);
    group_start += group_rows;
    if take == 0 {
      continue;
    }
    for (slot, leaf) in kept.iter().enumerate() {
      let records = leaf_records(reader, rg_index, *leaf, skip, take, group_rows)?;
      columns[slot].1.extend(records);
    }
    scheduled += take;
  }

  Ok(DataSet {
    schema: reader.schema().retain_leaves(&keep),
    columns,
    num_rows: scheduled
  })
}

// ----------------------------------------------------------------------
// Row-major reader

/// Lazily yields one logical row per advance: a `Value::Group` of
/// (logical leaf path, value) in schema leaf order, holding only the
/// projected columns. Rows buffer one row group at a time; abandoning the
/// iterator releases the buffers.
pub struct RowIter<'a, S: ByteSource> {
  reader: &'a SerializedFileReader<S>,
  offset: i64,
  count: i64,
  kept: Vec<usize>,
  rg_index: usize,
  group_start: i64,
  scheduled: i64,
  buffered: VecDeque<Value>,
  finished: bool
}

impl<'a, S: ByteSource> RowIter<'a, S> {
  pub(crate) fn new(reader: &'a SerializedFileReader<S>,
                    options: ReaderOptions) -> Result<Self> {
    options.validate()?;
    let keep = projected_leaves(reader, &options);
    let kept =
      keep.iter().enumerate().filter(|(_, k)| **k).map(|(i, _)| i).collect();
    Ok(Self {
      reader,
      offset: options.offset,
      count: options.count,
      kept,
      rg_index: 0,
      group_start: 0,
      scheduled: 0,
      buffered: VecDeque::new(),
      finished: false
    })
  }

  fn load_group(&self, rg_index: usize, skip: i64, take: i64,
                group_rows: i64) -> Result<VecDeque<Value>> {
    let paths = self.reader.leaf_paths();
    let mut columns: Vec<(String, std::vec::IntoIter<Value>)> =
      Vec::with_capacity(self.kept.len());
    for leaf in &self.kept {
      let records =
        leaf_records(self.reader, rg_index, *leaf, skip, take, group_rows)?;
      columns.push((paths[*leaf].clone(), records.into_iter()));
    }

    let mut rows = VecDeque::with_capacity(take as usize);
    for _ in 0..take {
      let mut fields = Vec::with_capacity(columns.len());
      for (path, values) in &mut columns {
        let value = values.next().ok_or_else(
          || corrupt_data_err!("column {} ran out of rows while zipping", path))?;
        fields.push((path.clone(), value));
      }
      rows.push_back(Value::Group(fields));
    }
    Ok(rows)
  }
}

impl<'a, S: ByteSource> Iterator for RowIter<'a, S> {
  type Item = Result<Value>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      if let Some(row) = self.buffered.pop_front() {
        return Some(Ok(row));
      }
      if self.finished {
        return None;
      }
      if self.count != -1 && self.scheduled >= self.count {
        self.finished = true;
        return None;
      }
      if self.rg_index >= self.reader.metadata().num_row_groups() {
        self.finished = true;
        return None;
      }

      let rg_index = self.rg_index;
      let group_rows = self.reader.metadata().row_group(rg_index).num_rows();
      let (skip, take) = group_window(
        self.offset, self.count, self.scheduled, self.group_start, group_rows);
      self.rg_index += 1;
      self.group_start += group_rows;
      if take == 0 {
        continue;
      }
      match self.load_group(rg_index, skip, take, group_rows) {
        Ok(rows) => {
          self.scheduled += take;
          self.buffered = rows;
        }
        Err(e) => {
          self.finished = true;
          return Some(Err(e));
        }
      }
    }
  }
}
