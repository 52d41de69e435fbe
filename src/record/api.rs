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

//! Contains the Value enum that is used to represent decoded Parquet data
//! in Rust, and the conversions from physical values according to each
//! leaf's logical type annotation.

use std::fmt;

use chrono::{TimeZone, Utc};

use crate::basic::{LogicalType, Type as PhysicalType};
use crate::data_type::{ByteArray, Int96};
use crate::errors::{corrupt_data_err, Result};

/// A single decoded value, possibly nested. A logical row is a `Group`;
/// column-major reads produce one (possibly `List`-nested) `Value` per
/// row per projected leaf.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
  // ----------------------------------------------------------------------
  // Primitive types

  /// Null value.
  #[default]
  Null,
  /// Boolean value (`true`, `false`).
  Bool(bool),
  /// Signed integer INT_8.
  Byte(i8),
  /// Signed integer INT_16.
  Short(i16),
  /// Signed integer INT_32.
  Int(i32),
  /// Signed integer INT_64.
  Long(i64),
  /// Unsigned integer UINT_8.
  UByte(u8),
  /// Unsigned integer UINT_16.
  UShort(u16),
  /// Unsigned integer UINT_32.
  UInt(u32),
  /// Unsigned integer UINT_64.
  ULong(u64),
  /// IEEE 32-bit floating point value.
  Float(f32),
  /// IEEE 64-bit floating point value.
  Double(f64),
  /// UTF-8 encoded character string.
  Str(String),
  /// General binary value.
  Bytes(ByteArray),
  /// Date without a time of day, as days from the Unix epoch.
  Date(i32),
  /// Time of day, as milliseconds since midnight.
  TimeMillis(i32),
  /// Milliseconds from the Unix epoch, 1 January 1970.
  Timestamp(i64),
  /// Decimal as an unscaled integer with (precision, scale).
  Decimal(i128, i32, i32),

  // ----------------------------------------------------------------------
  // Complex types

  /// Struct, child elements are tuples of field-value pairs.
  Group(Vec<(String, Value)>),
  /// List of elements.
  List(Vec<Value>),
  /// List of key-value pairs.
  Map(Vec<(Value, Value)>)
}

impl Value {
  pub fn is_null(&self) -> bool {
    *self == Value::Null
  }

  /// Converts Parquet BOOLEAN type with logical type into `bool` value.
  pub fn convert_bool(_logical_type: LogicalType, value: bool) -> Self {
    Value::Bool(value)
  }

  /// Converts Parquet INT32 type with logical type into a `Value`.
  pub fn convert_int32(
    logical_type: LogicalType,
    precision: i32,
    scale: i32,
    value: i32
  ) -> Self {
    match logical_type {
      LogicalType::INT_8 => Value::Byte(value as i8),
      LogicalType::INT_16 => Value::Short(value as i16),
      LogicalType::UINT_8 => Value::UByte(value as u8),
      LogicalType::UINT_16 => Value::UShort(value as u16),
      LogicalType::UINT_32 => Value::UInt(value as u32),
      LogicalType::DATE => Value::Date(value),
      LogicalType::TIME_MILLIS => Value::TimeMillis(value),
      LogicalType::DECIMAL => Value::Decimal(value as i128, precision, scale),
      _ => Value::Int(value)
    }
  }

  /// Converts Parquet INT64 type with logical type into a `Value`.
  pub fn convert_int64(
    logical_type: LogicalType,
    precision: i32,
    scale: i32,
    value: i64
  ) -> Self {
    match logical_type {
      LogicalType::UINT_64 => Value::ULong(value as u64),
      LogicalType::TIMESTAMP_MILLIS => Value::Timestamp(value),
      LogicalType::DECIMAL => Value::Decimal(value as i128, precision, scale),
      _ => Value::Long(value)
    }
  }

  /// Converts Parquet INT96 (nanosecond timestamps: two words of
  /// nanos-of-day, one word of Julian day) into a millisecond `Timestamp`.
  pub fn convert_int96(value: &Int96) -> Self {
    const JULIAN_TO_UNIX_EPOCH_DAYS: i64 = 2_440_588;
    const MILLIS_IN_A_DAY: i64 = 86_400_000;

    let days_since_epoch = value.data()[2] as i64 - JULIAN_TO_UNIX_EPOCH_DAYS;
    let nanos_of_day = ((value.data()[1] as i64) << 32) + value.data()[0] as i64;
    let millis = days_since_epoch * MILLIS_IN_A_DAY + nanos_of_day / 1_000_000;

    Value::Timestamp(millis)
  }

  /// Converts Parquet FLOAT type into a `Value`.
  pub fn convert_float(_logical_type: LogicalType, value: f32) -> Self {
    Value::Float(value)
  }

  /// Converts Parquet DOUBLE type into a `Value`.
  pub fn convert_double(_logical_type: LogicalType, value: f64) -> Self {
    Value::Double(value)
  }

  /// Converts Parquet BYTE_ARRAY or FIXED_LEN_BYTE_ARRAY type with logical
  /// type into a `Value`. A UTF8/ENUM/JSON annotation always produces a
  /// string (and invalid UTF-8 is corrupt data); without an annotation,
  /// `treat_as_string` decides between a lossily decoded string and raw
  /// bytes.
  pub fn convert_byte_array(
    physical_type: PhysicalType,
    logical_type: LogicalType,
    precision: i32,
    scale: i32,
    treat_as_string: bool,
    value: ByteArray
  ) -> Result<Self> {
    let result = match (physical_type, logical_type) {
      (PhysicalType::BYTE_ARRAY, LogicalType::UTF8)
      | (PhysicalType::BYTE_ARRAY, LogicalType::ENUM)
      | (PhysicalType::BYTE_ARRAY, LogicalType::JSON) => {
        Value::Str(value.as_utf8()?.to_owned())
      }
      (_, LogicalType::DECIMAL) => {
        Value::Decimal(decimal_from_bytes(value.data())?, precision, scale)
      }
      (PhysicalType::BYTE_ARRAY, LogicalType::NONE) if treat_as_string => {
        Value::Str(String::from_utf8_lossy(value.data()).into_owned())
      }
      _ => Value::Bytes(value)
    };
    Ok(result)
  }
}

/// Interpret a big-endian two's-complement byte string as an i128, the
/// representation DECIMAL uses over BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY.
fn decimal_from_bytes(bytes: &[u8]) -> Result<i128> {
  if bytes.len() > 16 {
    return Err(corrupt_data_err!(
      "DECIMAL value of {} bytes exceeds 128 bits", bytes.len()));
  }
  let mut result: i128 = if !bytes.is_empty() && bytes[0] & 0x80 != 0 { -1 } else { 0 };
  for b in bytes {
    result = (result << 8) | (*b as i128);
  }
  Ok(result)
}

/// Render the unscaled decimal with its decimal point inserted.
fn format_decimal(unscaled: i128, scale: i32) -> String {
  if scale <= 0 {
    return unscaled.to_string();
  }
  let negative = unscaled < 0;
  let digits = unscaled.checked_abs().map_or_else(
    || unscaled.to_string().trim_start_matches('-').to_owned(),
    |v| v.to_string());
  let scale = scale as usize;
  let padded = if digits.len() <= scale {
    format!("{}{}", "0".repeat(scale - digits.len() + 1), digits)
  } else {
    digits
  };
  let split = padded.len() - scale;
  format!("{}{}.{}", if negative { "-" } else { "" }, &padded[..split], &padded[split..])
}

/// Helper method to convert Parquet date into a string. Input `value` is a
/// number of days since the epoch. Rendered in UTC.
#[inline]
fn convert_date_to_string(value: i32) -> String {
  static NUM_SECONDS_IN_DAY: i64 = 60 * 60 * 24;
  match Utc.timestamp_opt(value as i64 * NUM_SECONDS_IN_DAY, 0).single() {
    Some(dt) => format!("{}", dt.format("%Y-%m-%d %:z")),
    None => format!("{} days", value)
  }
}

/// Helper method to convert Parquet timestamp into a string. Input `value`
/// is a number of milliseconds since the epoch. Rendered in UTC.
#[inline]
fn convert_timestamp_to_string(value: i64) -> String {
  match Utc.timestamp_millis_opt(value).single() {
    Some(dt) => format!("{}", dt.format("%Y-%m-%d %H:%M:%S %:z")),
    None => format!("{} ms", value)
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      Value::Null => write!(f, "null"),
      Value::Bool(value) => write!(f, "{}", value),
      Value::Byte(value) => write!(f, "{}", value),
      Value::Short(value) => write!(f, "{}", value),
      Value::Int(value) => write!(f, "{}", value),
      Value::Long(value) => write!(f, "{}", value),
      Value::UByte(value) => write!(f, "{}", value),
      Value::UShort(value) => write!(f, "{}", value),
      Value::UInt(value) => write!(f, "{}", value),
      Value::ULong(value) => write!(f, "{}", value),
      Value::Float(value) => write!(f, "{:?}", value),
      Value::Double(value) => write!(f, "{:?}", value),
      Value::Str(ref value) => write!(f, "\"{}\"", value),
      Value::Bytes(ref value) => write!(f, "{:?}", value.data()),
      Value::Date(value) => write!(f, "{}", convert_date_to_string(value)),
      Value::TimeMillis(value) => write!(f, "{}", value),
      Value::Timestamp(value) => write!(f, "{}", convert_timestamp_to_string(value)),
      Value::Decimal(unscaled, _, scale) => write!(f, "{}", format_decimal(unscaled, scale)),
      Value::Group(ref fields) => {
        write!(f, "{{")?;
        for (i, &(ref key, ref value)) in fields.iter().enumerate() {
          write!(f, "{}: ", key)?;
          value.fmt(f)?;
          if i < fields.len() - 1 {
            write!(f, ", ")?;
          }
        }
        write!(f, "}}")
      }
      Value::List(ref elements) => {
        write!(f, "[")?;
        for (i, element) in elements.iter().enumerate() {
          element.fmt(f)?;
          if i < elements.len() - 1 {
            write!(f, ", ")?;
          }
        }
        write!(f, "]")
      }
      Value::Map(ref pairs) => {
        write!(f, "{{")?;
        for (i, &(ref key, ref value)) in pairs.iter().enumerate() {
          key.fmt(f)?;
          write!(f, " -> ")?;
          value.fmt(f)?;
          if i < pairs.len() - 1 {
            write!(f, ", ")?;
          }
        }
        write!(f, "}}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_value_convert_bool() {
    assert_eq!(Value::convert_bool(LogicalType::NONE, true), Value::Bool(true));
    assert_eq!(Value::convert_bool(LogicalType::NONE, false), Value::Bool(false));
  }

  #[test]
  fn test_value_convert_int32() {
    assert_eq!(Value::convert_int32(LogicalType::INT_8, -1, -1, 111), Value::Byte(111));
    assert_eq!(Value::convert_int32(LogicalType::INT_16, -1, -1, 222), Value::Short(222));
    assert_eq!(Value::convert_int32(LogicalType::INT_32, -1, -1, 333), Value::Int(333));
    assert_eq!(Value::convert_int32(LogicalType::NONE, -1, -1, 444), Value::Int(444));
    assert_eq!(Value::convert_int32(LogicalType::UINT_8, -1, -1, 255), Value::UByte(255));
    assert_eq!(Value::convert_int32(LogicalType::UINT_16, -1, -1, 256), Value::UShort(256));
    assert_eq!(Value::convert_int32(LogicalType::UINT_32, -1, -1, -1), Value::UInt(u32::max_value()));
    assert_eq!(Value::convert_int32(LogicalType::DATE, -1, -1, 14611), Value::Date(14611));
    assert_eq!(
      Value::convert_int32(LogicalType::TIME_MILLIS, -1, -1, 47445123),
      Value::TimeMillis(47445123));
    assert_eq!(
      Value::convert_int32(LogicalType::DECIMAL, 9, 2, 12345),
      Value::Decimal(12345, 9, 2));
  }

  #[test]
  fn test_value_convert_int64() {
    assert_eq!(Value::convert_int64(LogicalType::INT_64, -1, -1, 1111), Value::Long(1111));
    assert_eq!(Value::convert_int64(LogicalType::NONE, -1, -1, 2222), Value::Long(2222));
    assert_eq!(
      Value::convert_int64(LogicalType::UINT_64, -1, -1, -1),
      Value::ULong(u64::max_value()));
    assert_eq!(
      Value::convert_int64(LogicalType::TIMESTAMP_MILLIS, -1, -1, 1238544060000),
      Value::Timestamp(1238544060000));
    assert_eq!(
      Value::convert_int64(LogicalType::DECIMAL, 18, 4, -12345),
      Value::Decimal(-12345, 18, 4));
  }

  #[test]
  fn test_value_convert_int96() {
    let value = Int96::from([0, 0, 2454923]);
    assert_eq!(Value::convert_int96(&value), Value::Timestamp(1238544000000));

    let value = Int96::from([4165425152, 13, 2454923]);
    assert_eq!(Value::convert_int96(&value), Value::Timestamp(1238544060000));
  }

  #[test]
  fn test_value_convert_float() {
    assert_eq!(Value::convert_float(LogicalType::NONE, 2.31), Value::Float(2.31));
  }

  #[test]
  fn test_value_convert_double() {
    assert_eq!(Value::convert_double(LogicalType::NONE, 1.56), Value::Double(1.56));
  }

  #[test]
  fn test_value_convert_byte_array() {
    // UTF8
    let value = ByteArray::from("ABCD");
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::UTF8, -1, -1, true, value).unwrap();
    assert_eq!(result, Value::Str("ABCD".to_string()));

    // ENUM
    let value = ByteArray::from("123");
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::ENUM, -1, -1, true, value).unwrap();
    assert_eq!(result, Value::Str("123".to_string()));

    // invalid UTF-8 under a UTF8 annotation is corrupt data
    let value = ByteArray::from(vec![0xFF, 0xFE]);
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::UTF8, -1, -1, true, value);
    assert!(result.is_err());

    // NONE with treat_as_string on
    let value = ByteArray::from("hello");
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::NONE, -1, -1, true, value).unwrap();
    assert_eq!(result, Value::Str("hello".to_string()));

    // NONE with treat_as_string off
    let value = ByteArray::from(vec![1, 2, 3, 4, 5]);
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::NONE, -1, -1, false, value.clone()).unwrap();
    assert_eq!(result, Value::Bytes(value));

    // BSON stays raw bytes
    let value = ByteArray::from(vec![1, 2, 3]);
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::BSON, -1, -1, true, value.clone()).unwrap();
    assert_eq!(result, Value::Bytes(value));

    // DECIMAL over big-endian bytes
    let value = ByteArray::from(vec![0x04, 0xD2]); // 1234
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::DECIMAL, 6, 2, true, value).unwrap();
    assert_eq!(result, Value::Decimal(1234, 6, 2));

    // negative DECIMAL
    let value = ByteArray::from(vec![0xFB, 0x2E]); // -1234
    let result = Value::convert_byte_array(
      PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalType::DECIMAL, 6, 2, true, value).unwrap();
    assert_eq!(result, Value::Decimal(-1234, 6, 2));

    // INTERVAL stays raw bytes
    let value = ByteArray::from(vec![0u8; 12]);
    let result = Value::convert_byte_array(
      PhysicalType::FIXED_LEN_BYTE_ARRAY, LogicalType::INTERVAL, -1, -1, true, value.clone())
      .unwrap();
    assert_eq!(result, Value::Bytes(value));
  }

  #[test]
  fn test_decimal_from_bytes_too_long() {
    let value = ByteArray::from(vec![0u8; 17]);
    let result = Value::convert_byte_array(
      PhysicalType::BYTE_ARRAY, LogicalType::DECIMAL, 40, 2, true, value);
    assert!(result.is_err());
  }

  #[test]
  fn test_format_decimal() {
    assert_eq!(format_decimal(12345, 2), "123.45");
    assert_eq!(format_decimal(-12345, 2), "-123.45");
    assert_eq!(format_decimal(5, 3), "0.005");
    assert_eq!(format_decimal(-5, 3), "-0.005");
    assert_eq!(format_decimal(42, 0), "42");
  }

  #[test]
  fn test_value_display() {
    // Primitive types
    assert_eq!(format!("{}", Value::Null), "null");
    assert_eq!(format!("{}", Value::Bool(true)), "true");
    assert_eq!(format!("{}", Value::Byte(1)), "1");
    assert_eq!(format!("{}", Value::Short(2)), "2");
    assert_eq!(format!("{}", Value::Int(3)), "3");
    assert_eq!(format!("{}", Value::Long(4)), "4");
    assert_eq!(format!("{}", Value::ULong(4)), "4");
    assert_eq!(format!("{}", Value::Float(5.0)), "5.0");
    assert_eq!(format!("{}", Value::Float(5.1234)), "5.1234");
    assert_eq!(format!("{}", Value::Double(6.0)), "6.0");
    assert_eq!(format!("{}", Value::Str("abc".to_string())), "\"abc\"");
    assert_eq!(format!("{}", Value::Bytes(ByteArray::from(vec![1, 2, 3]))), "[1, 2, 3]");
    assert_eq!(format!("{}", Value::Date(0)), "1970-01-01 +00:00");
    assert_eq!(
      format!("{}", Value::Timestamp(1238544060000)),
      "2009-04-01 00:01:00 +00:00");
    assert_eq!(format!("{}", Value::Decimal(12345, 6, 2)), "123.45");

    // Complex types
    let row = Value::Group(vec![
      ("x".to_string(), Value::Null),
      ("Y".to_string(), Value::Int(2)),
      ("z".to_string(), Value::Float(3.1)),
      ("a".to_string(), Value::Str("abc".to_string()))
    ]);
    assert_eq!(format!("{}", row), "{x: null, Y: 2, z: 3.1, a: \"abc\"}");

    let row = Value::List(vec![
      Value::Int(2),
      Value::Int(1),
      Value::Null,
      Value::Int(12)
    ]);
    assert_eq!(format!("{}", row), "[2, 1, null, 12]");

    let row = Value::Map(vec![
      (Value::Int(1), Value::Float(1.2)),
      (Value::Int(2), Value::Float(4.5)),
      (Value::Int(3), Value::Float(2.3))
    ]);
    assert_eq!(format!("{}", row), "{1 -> 1.2, 2 -> 4.5, 3 -> 2.3}");
  }
}
