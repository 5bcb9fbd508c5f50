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

//! Length prefixed strings and timestamps.

use crate::{DecodeError, EncodeError};
use bytes::{Buf, BufMut};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// AMQP timestamp: 64-bit POSIX time, in seconds.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub u64);

impl From<SystemTime> for Timestamp {
    fn from(value: SystemTime) -> Self {
        // Times before the epoch are clamped, the wire format is unsigned.
        Timestamp(value.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()))
    }
}

impl From<Timestamp> for SystemTime {
    fn from(value: Timestamp) -> Self {
        UNIX_EPOCH + Duration::from_secs(value.0)
    }
}

pub(crate) fn check_remaining(
    buf: &[u8],
    obj: &'static str,
    wanted: usize,
) -> Result<(), DecodeError> {
    if buf.remaining() < wanted {
        return Err(DecodeError::InvalidLengthError { obj, wanted, got: buf.remaining() });
    }
    Ok(())
}

pub(crate) fn read_bytes(
    buf: &mut &[u8],
    obj: &'static str,
    len: usize,
) -> Result<Vec<u8>, DecodeError> {
    check_remaining(*buf, obj, len)?;
    let mut value = vec![0; len];
    buf.copy_to_slice(&mut value);
    Ok(value)
}

fn into_string(value: Vec<u8>, obj: &'static str) -> Result<String, DecodeError> {
    String::from_utf8(value).map_err(|_| DecodeError::InvalidUtf8 { obj })
}

/// Read a string with a one octet length prefix.
pub fn read_shortstr(buf: &mut &[u8]) -> Result<String, DecodeError> {
    check_remaining(*buf, "shortstr", 1)?;
    let len = buf.get_u8() as usize;
    into_string(read_bytes(buf, "shortstr", len)?, "shortstr")
}

/// Read a string with a four octet length prefix.
/// Long strings hold binary data, the content is not checked.
pub fn read_longstr(buf: &mut &[u8]) -> Result<Vec<u8>, DecodeError> {
    check_remaining(*buf, "longstr", 4)?;
    let len = buf.get_u32() as usize;
    read_bytes(buf, "longstr", len)
}

/// Write a string with a one octet length prefix.
pub fn write_shortstr(buf: &mut impl BufMut, value: &str) -> Result<(), EncodeError> {
    if value.len() > u8::MAX as usize {
        return Err(EncodeError::StringTooLong {
            obj: "shortstr",
            size: value.len(),
            maximum_size: u8::MAX as usize,
        });
    }
    buf.put_u8(value.len() as u8);
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Write a string with a four octet length prefix.
pub fn write_longstr(buf: &mut impl BufMut, value: &[u8]) -> Result<(), EncodeError> {
    write_long_bytes(buf, "longstr", value)
}

pub(crate) fn write_long_bytes(
    buf: &mut impl BufMut,
    obj: &'static str,
    value: &[u8],
) -> Result<(), EncodeError> {
    let len = u32::try_from(value.len())
        .map_err(|_| EncodeError::SizeOverflow { obj, size: value.len() })?;
    buf.put_u32(len);
    buf.put_slice(value);
    Ok(())
}

pub fn read_timestamp(buf: &mut &[u8]) -> Result<Timestamp, DecodeError> {
    check_remaining(*buf, "timestamp", 8)?;
    Ok(Timestamp(buf.get_u64()))
}

pub fn write_timestamp(buf: &mut impl BufMut, value: Timestamp) {
    buf.put_u64(value.0)
}
