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

use amqp_derive::amqp_inline;

#[amqp_inline(
    r#"
<amqp>
  <class name="reserved" index="1">
    <method name="mixed" index="1">
      <field name="reserved-1" type="short" reserved="1"/>
      <field name="queue" type="shortstr"/>
      <field name="reserved-2" type="bit" reserved="1"/>
      <field name="active" type="bit"/>
      <field name="reserved-3" type="table" reserved="1"/>
      <field name="reserved-4" type="longstr" reserved="1"/>
      <field name="reserved-5" type="timestamp" reserved="1"/>
      <field name="count" type="long"/>
    </method>
    <method name="only-bit" index="2">
      <field name="reserved-1" type="bit" reserved="1"/>
    </method>
  </class>
</amqp>
"#
)]
#[cfg(test)]
mod reserved_fields {
    #[test]
    fn test_encode_zero_values() {
        let method = ReservedMixed { queue: "q".to_owned(), active: true, count: 1 };
        let bytes: Vec<u8> = vec![
            0, 0, // reserved-1
            1, b'q', // queue
            0b10, // reserved-2, active
            0, 0, 0, 0, // reserved-3
            0, 0, 0, 0, // reserved-4
            0, 0, 0, 0, 0, 0, 0, 0, // reserved-5
            0, 0, 0, 1, // count
        ];
        assert_eq!(method.encoded_len(), bytes.len());
        assert_eq!(method.encode_to_vec(), Ok(bytes));
    }

    #[test]
    fn test_decode_ignores_reserved_values() {
        let bytes: Vec<u8> = vec![
            0xff, 0xff, // reserved-1
            1, b'q', // queue
            0b11, // reserved-2, active
            0, 0, 0, 4, 1, b'k', b't', 1, // reserved-3
            0, 0, 0, 1, b'x', // reserved-4
            0, 0, 0, 0, 0x65, 0x53, 0xf1, 0x00, // reserved-5
            0, 0, 0, 9, // count
        ];
        assert_eq!(
            ReservedMixed::decode_full(&bytes),
            Ok(ReservedMixed { queue: "q".to_owned(), active: true, count: 9 })
        );
    }

    #[test]
    fn test_reserved_octet() {
        assert_eq!(ReservedOnlyBit {}.encode_to_vec(), Ok(vec![0]));
        assert_eq!(ReservedOnlyBit::decode_full(&[0xff]), Ok(ReservedOnlyBit {}));
        assert_eq!(
            ReservedOnlyBit::decode_full(&[]),
            Err(DecodeError::InvalidLengthError { obj: "ReservedOnlyBit", wanted: 1, got: 0 })
        );
    }
}
