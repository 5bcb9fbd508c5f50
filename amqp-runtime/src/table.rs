// Copyright 2026 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Field tables: the nested key/value maps carried by `table` fields.

use crate::codec::{
    check_remaining, read_bytes, read_longstr, read_shortstr, read_timestamp, write_long_bytes,
    write_longstr, write_shortstr, write_timestamp, Timestamp,
};
use crate::{DecodeError, EncodeError};
use bytes::{Buf, BufMut};
use std::collections::BTreeMap;

/// Decimal value: `value * 10^-scale`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    pub scale: u8,
    pub value: u32,
}

/// Typed value stored in a field table or field array.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    ShortShortInt(i8),
    ShortShortUint(u8),
    ShortInt(i16),
    ShortUint(u16),
    LongInt(i32),
    LongUint(u32),
    LongLongInt(i64),
    Float(f32),
    Double(f64),
    Decimal(Decimal),
    LongString(Vec<u8>),
    ByteArray(Vec<u8>),
    Array(Vec<FieldValue>),
    Timestamp(Timestamp),
    Table(FieldTable),
    Void,
}

/// Key/value map encoded with a 32-bit byte length prefix.
/// Keys are kept sorted so that encoding is deterministic.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FieldTable(BTreeMap<String, FieldValue>);

impl FieldTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) -> Option<FieldValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the length of the encoded table, including its length prefix.
    pub fn encoded_len(&self) -> usize {
        4 + self.content_len()
    }

    fn content_len(&self) -> usize {
        self.0.iter().map(|(key, value)| 1 + key.len() + 1 + value.encoded_len()).sum()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FieldTable {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        FieldTable(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FieldValue {
    fn tag(&self) -> u8 {
        match self {
            FieldValue::Boolean(_) => b't',
            FieldValue::ShortShortInt(_) => b'b',
            FieldValue::ShortShortUint(_) => b'B',
            FieldValue::ShortInt(_) => b's',
            FieldValue::ShortUint(_) => b'u',
            FieldValue::LongInt(_) => b'I',
            FieldValue::LongUint(_) => b'i',
            FieldValue::LongLongInt(_) => b'l',
            FieldValue::Float(_) => b'f',
            FieldValue::Double(_) => b'd',
            FieldValue::Decimal(_) => b'D',
            FieldValue::LongString(_) => b'S',
            FieldValue::ByteArray(_) => b'x',
            FieldValue::Array(_) => b'A',
            FieldValue::Timestamp(_) => b'T',
            FieldValue::Table(_) => b'F',
            FieldValue::Void => b'V',
        }
    }

    /// Length of the encoded value, without its type tag.
    fn encoded_len(&self) -> usize {
        match self {
            FieldValue::Boolean(_)
            | FieldValue::ShortShortInt(_)
            | FieldValue::ShortShortUint(_) => 1,
            FieldValue::ShortInt(_) | FieldValue::ShortUint(_) => 2,
            FieldValue::LongInt(_) | FieldValue::LongUint(_) | FieldValue::Float(_) => 4,
            FieldValue::LongLongInt(_) | FieldValue::Double(_) | FieldValue::Timestamp(_) => 8,
            FieldValue::Decimal(_) => 5,
            FieldValue::LongString(value) => 4 + value.len(),
            FieldValue::ByteArray(value) => 4 + value.len(),
            FieldValue::Array(values) => 4 + array_content_len(values),
            FieldValue::Table(table) => table.encoded_len(),
            FieldValue::Void => 0,
        }
    }

    fn decode(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        check_remaining(*buf, "field value", 1)?;
        let tag = buf.get_u8();
        let width = match tag {
            b't' | b'b' | b'B' => 1,
            b's' | b'u' => 2,
            b'I' | b'i' | b'f' => 4,
            b'D' => 5,
            b'l' | b'd' => 8,
            _ => 0,
        };
        check_remaining(*buf, "field value", width)?;
        Ok(match tag {
            b't' => FieldValue::Boolean(buf.get_u8() != 0),
            b'b' => FieldValue::ShortShortInt(buf.get_i8()),
            b'B' => FieldValue::ShortShortUint(buf.get_u8()),
            b's' => FieldValue::ShortInt(buf.get_i16()),
            b'u' => FieldValue::ShortUint(buf.get_u16()),
            b'I' => FieldValue::LongInt(buf.get_i32()),
            b'i' => FieldValue::LongUint(buf.get_u32()),
            b'l' => FieldValue::LongLongInt(buf.get_i64()),
            b'f' => FieldValue::Float(buf.get_f32()),
            b'd' => FieldValue::Double(buf.get_f64()),
            b'D' => FieldValue::Decimal(Decimal { scale: buf.get_u8(), value: buf.get_u32() }),
            b'S' => FieldValue::LongString(read_longstr(buf)?),
            b'x' => {
                check_remaining(*buf, "byte array", 4)?;
                let len = buf.get_u32() as usize;
                FieldValue::ByteArray(read_bytes(buf, "byte array", len)?)
            }
            b'A' => FieldValue::Array(read_array(buf)?),
            b'T' => FieldValue::Timestamp(read_timestamp(buf)?),
            b'F' => FieldValue::Table(read_table(buf)?),
            b'V' => FieldValue::Void,
            tag => return Err(DecodeError::InvalidFieldValueType { tag }),
        })
    }

    fn encode(&self, buf: &mut impl BufMut) -> Result<(), EncodeError> {
        buf.put_u8(self.tag());
        match self {
            FieldValue::Boolean(value) => buf.put_u8(*value as u8),
            FieldValue::ShortShortInt(value) => buf.put_i8(*value),
            FieldValue::ShortShortUint(value) => buf.put_u8(*value),
            FieldValue::ShortInt(value) => buf.put_i16(*value),
            FieldValue::ShortUint(value) => buf.put_u16(*value),
            FieldValue::LongInt(value) => buf.put_i32(*value),
            FieldValue::LongUint(value) => buf.put_u32(*value),
            FieldValue::LongLongInt(value) => buf.put_i64(*value),
            FieldValue::Float(value) => buf.put_f32(*value),
            FieldValue::Double(value) => buf.put_f64(*value),
            FieldValue::Decimal(Decimal { scale, value }) => {
                buf.put_u8(*scale);
                buf.put_u32(*value);
            }
            FieldValue::LongString(value) => write_longstr(buf, value)?,
            FieldValue::ByteArray(value) => write_long_bytes(buf, "byte array", value)?,
            FieldValue::Array(values) => write_array(buf, values)?,
            FieldValue::Timestamp(value) => write_timestamp(buf, *value),
            FieldValue::Table(table) => write_table(buf, table)?,
            FieldValue::Void => (),
        }
        Ok(())
    }
}

fn array_content_len(values: &[FieldValue]) -> usize {
    values.iter().map(|value| 1 + value.encoded_len()).sum()
}

/// Split off the `len` bytes of a length prefixed structure.
fn split_content<'a>(
    buf: &mut &'a [u8],
    obj: &'static str,
) -> Result<&'a [u8], DecodeError> {
    check_remaining(*buf, obj, 4)?;
    let len = buf.get_u32() as usize;
    check_remaining(*buf, obj, len)?;
    let data: &'a [u8] = *buf;
    let (content, remaining) = data.split_at(len);
    *buf = remaining;
    Ok(content)
}

fn content_len_prefix(obj: &'static str, size: usize) -> Result<u32, EncodeError> {
    u32::try_from(size).map_err(|_| EncodeError::SizeOverflow { obj, size })
}

fn read_array(buf: &mut &[u8]) -> Result<Vec<FieldValue>, DecodeError> {
    let mut content = split_content(buf, "field array")?;
    let mut values = vec![];
    while !content.is_empty() {
        values.push(FieldValue::decode(&mut content)?);
    }
    Ok(values)
}

fn write_array(buf: &mut impl BufMut, values: &[FieldValue]) -> Result<(), EncodeError> {
    buf.put_u32(content_len_prefix("field array", array_content_len(values))?);
    for value in values {
        value.encode(buf)?;
    }
    Ok(())
}

/// Read a field table with its 32-bit length prefix.
pub fn read_table(buf: &mut &[u8]) -> Result<FieldTable, DecodeError> {
    let mut content = split_content(buf, "field table")?;
    let mut table = FieldTable::new();
    while !content.is_empty() {
        let key = read_shortstr(&mut content)?;
        let value = FieldValue::decode(&mut content)?;
        table.insert(key, value);
    }
    Ok(table)
}

/// Write a field table with its 32-bit length prefix.
pub fn write_table(buf: &mut impl BufMut, table: &FieldTable) -> Result<(), EncodeError> {
    buf.put_u32(content_len_prefix("field table", table.content_len())?);
    for (key, value) in table.iter() {
        write_shortstr(buf, key)?;
        value.encode(buf)?;
    }
    Ok(())
}
