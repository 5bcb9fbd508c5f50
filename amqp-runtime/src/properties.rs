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

//! Basic content header properties.

use crate::codec::{
    check_remaining, read_shortstr, read_timestamp, write_shortstr, write_timestamp, Timestamp,
};
use crate::table::{read_table, write_table, FieldTable};
use crate::{DecodeError, EncodeError};
use bytes::{Buf, BufMut};

const CONTENT_TYPE: u16 = 1 << 15;
const CONTENT_ENCODING: u16 = 1 << 14;
const HEADERS: u16 = 1 << 13;
const DELIVERY_MODE: u16 = 1 << 12;
const PRIORITY: u16 = 1 << 11;
const CORRELATION_ID: u16 = 1 << 10;
const REPLY_TO: u16 = 1 << 9;
const EXPIRATION: u16 = 1 << 8;
const MESSAGE_ID: u16 = 1 << 7;
const TIMESTAMP: u16 = 1 << 6;
const TYPE: u16 = 1 << 5;
const USER_ID: u16 = 1 << 4;
const APP_ID: u16 = 1 << 3;
const CLUSTER_ID: u16 = 1 << 2;
const CONTINUATION: u16 = 1;

/// Property set attached to content-bearing methods.
///
/// The properties are encoded in the content header frame as a 16-bit
/// presence mask followed by the present values, in declaration order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Properties {
    pub content_type: Option<String>,
    pub content_encoding: Option<String>,
    pub headers: Option<FieldTable>,
    pub delivery_mode: Option<u8>,
    pub priority: Option<u8>,
    pub correlation_id: Option<String>,
    pub reply_to: Option<String>,
    pub expiration: Option<String>,
    pub message_id: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub r#type: Option<String>,
    pub user_id: Option<String>,
    pub app_id: Option<String>,
}

fn shortstr_len(value: &Option<String>) -> usize {
    value.as_ref().map_or(0, |value| 1 + value.len())
}

fn decode_shortstr(
    buf: &mut &[u8],
    flags: u16,
    flag: u16,
) -> Result<Option<String>, DecodeError> {
    (flags & flag != 0).then(|| read_shortstr(buf)).transpose()
}

fn decode_octet(buf: &mut &[u8], flags: u16, flag: u16) -> Result<Option<u8>, DecodeError> {
    if flags & flag == 0 {
        return Ok(None);
    }
    check_remaining(*buf, "properties", 1)?;
    Ok(Some(buf.get_u8()))
}

fn encode_shortstr(buf: &mut impl BufMut, value: &Option<String>) -> Result<(), EncodeError> {
    match value {
        Some(value) => write_shortstr(buf, value),
        None => Ok(()),
    }
}

impl Properties {
    fn flags(&self) -> u16 {
        [
            (self.content_type.is_some(), CONTENT_TYPE),
            (self.content_encoding.is_some(), CONTENT_ENCODING),
            (self.headers.is_some(), HEADERS),
            (self.delivery_mode.is_some(), DELIVERY_MODE),
            (self.priority.is_some(), PRIORITY),
            (self.correlation_id.is_some(), CORRELATION_ID),
            (self.reply_to.is_some(), REPLY_TO),
            (self.expiration.is_some(), EXPIRATION),
            (self.message_id.is_some(), MESSAGE_ID),
            (self.timestamp.is_some(), TIMESTAMP),
            (self.r#type.is_some(), TYPE),
            (self.user_id.is_some(), USER_ID),
            (self.app_id.is_some(), APP_ID),
        ]
        .into_iter()
        .filter(|(present, _)| *present)
        .fold(0, |flags, (_, flag)| flags | flag)
    }

    /// Return the length of the encoded property list, including the
    /// presence flags.
    pub fn encoded_len(&self) -> usize {
        2 + shortstr_len(&self.content_type)
            + shortstr_len(&self.content_encoding)
            + self.headers.as_ref().map_or(0, FieldTable::encoded_len)
            + self.delivery_mode.map_or(0, |_| 1)
            + self.priority.map_or(0, |_| 1)
            + shortstr_len(&self.correlation_id)
            + shortstr_len(&self.reply_to)
            + shortstr_len(&self.expiration)
            + shortstr_len(&self.message_id)
            + self.timestamp.map_or(0, |_| 8)
            + shortstr_len(&self.r#type)
            + shortstr_len(&self.user_id)
            + shortstr_len(&self.app_id)
    }

    /// Parse a property list. The reserved cluster-id property is
    /// skipped, continuation flag words are consumed and ignored.
    pub fn decode(mut buf: &[u8]) -> Result<(Self, &[u8]), DecodeError> {
        check_remaining(buf, "properties", 2)?;
        let flags = buf.get_u16();
        let mut continuation = flags;
        while continuation & CONTINUATION != 0 {
            check_remaining(buf, "properties", 2)?;
            continuation = buf.get_u16();
        }

        let content_type = decode_shortstr(&mut buf, flags, CONTENT_TYPE)?;
        let content_encoding = decode_shortstr(&mut buf, flags, CONTENT_ENCODING)?;
        let headers = (flags & HEADERS != 0).then(|| read_table(&mut buf)).transpose()?;
        let delivery_mode = decode_octet(&mut buf, flags, DELIVERY_MODE)?;
        let priority = decode_octet(&mut buf, flags, PRIORITY)?;
        let correlation_id = decode_shortstr(&mut buf, flags, CORRELATION_ID)?;
        let reply_to = decode_shortstr(&mut buf, flags, REPLY_TO)?;
        let expiration = decode_shortstr(&mut buf, flags, EXPIRATION)?;
        let message_id = decode_shortstr(&mut buf, flags, MESSAGE_ID)?;
        let timestamp = (flags & TIMESTAMP != 0).then(|| read_timestamp(&mut buf)).transpose()?;
        let r#type = decode_shortstr(&mut buf, flags, TYPE)?;
        let user_id = decode_shortstr(&mut buf, flags, USER_ID)?;
        let app_id = decode_shortstr(&mut buf, flags, APP_ID)?;
        decode_shortstr(&mut buf, flags, CLUSTER_ID)?;

        Ok((
            Properties {
                content_type,
                content_encoding,
                headers,
                delivery_mode,
                priority,
                correlation_id,
                reply_to,
                expiration,
                message_id,
                timestamp,
                r#type,
                user_id,
                app_id,
            },
            buf,
        ))
    }

    /// Write the property list to an output buffer.
    pub fn encode(&self, buf: &mut impl BufMut) -> Result<(), EncodeError> {
        buf.put_u16(self.flags());
        encode_shortstr(buf, &self.content_type)?;
        encode_shortstr(buf, &self.content_encoding)?;
        if let Some(headers) = &self.headers {
            write_table(buf, headers)?;
        }
        if let Some(delivery_mode) = self.delivery_mode {
            buf.put_u8(delivery_mode);
        }
        if let Some(priority) = self.priority {
            buf.put_u8(priority);
        }
        encode_shortstr(buf, &self.correlation_id)?;
        encode_shortstr(buf, &self.reply_to)?;
        encode_shortstr(buf, &self.expiration)?;
        encode_shortstr(buf, &self.message_id)?;
        if let Some(timestamp) = self.timestamp {
            write_timestamp(buf, timestamp);
        }
        encode_shortstr(buf, &self.r#type)?;
        encode_shortstr(buf, &self.user_id)?;
        encode_shortstr(buf, &self.app_id)?;
        Ok(())
    }
}
