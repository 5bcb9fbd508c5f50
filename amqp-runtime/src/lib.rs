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

//! Helper definitions used by the generated AMQP method codecs.

use bytes::{BufMut, Bytes, BytesMut};

mod codec;
mod properties;
mod table;

pub use codec::{
    read_longstr, read_shortstr, read_timestamp, write_longstr, write_shortstr, write_timestamp,
    Timestamp,
};
pub use properties::Properties;
pub use table::{read_table, write_table, Decimal, FieldTable, FieldValue};

/// Type of parsing errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("when parsing {obj} needed length of {wanted} but got {got}")]
    InvalidLengthError { obj: &'static str, wanted: usize, got: usize },
    #[error("{obj} is not valid UTF-8")]
    InvalidUtf8 { obj: &'static str },
    #[error("field value type {tag:#04x} is not known")]
    InvalidFieldValueType { tag: u8 },
    #[error("unknown class {class_id}")]
    UnknownClass { class_id: u16 },
    #[error("unknown method {method_id} for class {class_id}")]
    UnknownMethod { class_id: u16, method_id: u16 },
    #[error("method has trailing bytes")]
    TrailingBytes,
}

/// Type of serialization errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("the size of {obj} ({size}) is outside the range of valid values 0..{maximum_size}")]
    StringTooLong { obj: &'static str, size: usize, maximum_size: usize },
    #[error("the encoded size of {obj} ({size}) does not fit its 32-bit length prefix")]
    SizeOverflow { obj: &'static str, size: usize },
}

/// Trait implemented for all generated method declarations.
pub trait Method: Sized {
    /// Class index of the method, first half of the frame discriminator.
    const CLASS_ID: u16;
    /// Method index within its class.
    const METHOD_ID: u16;

    /// Return the `(class, method)` pair identifying the method on the wire.
    fn id(&self) -> (u16, u16) {
        (Self::CLASS_ID, Self::METHOD_ID)
    }

    /// Return true if the peer is expected to answer this method.
    fn wait(&self) -> bool;

    /// Try parsing the method arguments of Self from the input slice.
    /// On success, returns the parsed object and the remaining unparsed slice.
    /// On failure, returns an error with the reason for the parsing failure.
    fn decode(buf: &[u8]) -> Result<(Self, &[u8]), DecodeError>;

    /// Try parsing the method arguments updating the slice in place
    /// to the remainder of the data. The input buffer is not updated if
    /// parsing fails.
    fn decode_mut(buf: &mut &[u8]) -> Result<Self, DecodeError> {
        let (method, remaining) = Self::decode(buf)?;
        *buf = remaining;
        Ok(method)
    }

    /// Try parsing the method arguments from the input slice.
    /// Returns an error if unparsed bytes remain at the end of the input slice.
    fn decode_full(buf: &[u8]) -> Result<Self, DecodeError> {
        let (method, remaining) = Self::decode(buf)?;
        if remaining.is_empty() {
            Ok(method)
        } else {
            Err(DecodeError::TrailingBytes)
        }
    }

    /// Return the length of the encoded method arguments.
    fn encoded_len(&self) -> usize;

    /// Write the method arguments to an output buffer.
    fn encode(&self, buf: &mut impl BufMut) -> Result<(), EncodeError>;

    /// Encode the method arguments to a byte vector.
    fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Encode the method arguments to a Bytes object.
    fn encode_to_bytes(&self) -> Result<Bytes, EncodeError> {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Trait implemented by methods carrying a content header and body.
///
/// The content travels in separate header and body frames, it is never
/// part of the encoded method arguments.
pub trait Content {
    fn properties(&self) -> &Properties;
    fn body(&self) -> &[u8];
    fn set_content(&mut self, properties: Properties, body: Vec<u8>);
}
