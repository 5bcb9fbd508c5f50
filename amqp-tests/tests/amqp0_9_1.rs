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

use amqp_derive::amqp;

#[amqp("specs/amqp0-9-1.xml")]
#[cfg(test)]
mod amqp0_9_1 {
    #[test]
    fn test_constants() {
        assert_eq!((PROTOCOL_MAJOR, PROTOCOL_MINOR, PROTOCOL_REVISION), (0, 9, 1));
        assert_eq!(DEFAULT_PORT, 5672);
        assert_eq!(FRAME_METHOD, 1);
        assert_eq!(FRAME_END, 206);
        assert_eq!(REPLY_SUCCESS, 200);
        assert_eq!(INTERNAL_ERROR, 541);
    }

    #[test]
    fn test_connection_start() {
        use amqp_runtime::FieldValue;

        let mut server_properties = FieldTable::new();
        server_properties.insert("product", FieldValue::LongString(b"broker".to_vec()));
        let method = AnyMethod::from(ConnectionStart {
            version_major: 0,
            version_minor: 9,
            server_properties,
            mechanisms: b"PLAIN".to_vec(),
            locales: b"en_US".to_vec(),
        });

        let bytes = method.encode_to_vec().unwrap();
        assert_eq!(&bytes[..6], &[0, 10, 0, 10, 0, 9]);
        assert_eq!(bytes.len(), method.encoded_len());
        assert_eq!(&bytes[bytes.len() - 9..], &[0, 0, 0, 5, b'e', b'n', b'_', b'U', b'S']);
        assert_eq!(AnyMethod::decode_full(&bytes), Ok(method));
    }

    #[test]
    fn test_connection_secure_binary_challenge() {
        let frame = [0, 10, 0, 20, 0, 0, 0, 2, 0xff, 0xfe];
        let expected = ConnectionSecure { challenge: vec![0xff, 0xfe] };
        assert_eq!(AnyMethod::decode_full(&frame), Ok(AnyMethod::ConnectionSecure(expected)));

        let response = ConnectionSecureOk { response: vec![0, b'u', 0, b'p'] };
        assert_eq!(response.encode_to_vec(), Ok(vec![0, 0, 0, 4, 0, b'u', 0, b'p']));
    }

    #[test]
    fn test_exchange_declare() {
        let method = ExchangeDeclare {
            exchange: "logs".to_owned(),
            r#type: "fanout".to_owned(),
            durable: true,
            no_wait: true,
            ..Default::default()
        };
        assert!(!method.wait());
        assert_eq!(
            method.encode_to_vec(),
            Ok(vec![
                0, 0, 4, b'l', b'o', b'g', b's', 6, b'f', b'a', b'n', b'o', b'u', b't', 0b10010,
                0, 0, 0, 0
            ])
        );
    }

    #[test]
    fn test_basic_deliver() {
        let frame = [
            0, 60, 0, 60, 3, b'c', b't', b'g', 0, 0, 0, 0, 0, 0, 0, 7, 1, 0, 2, b'q', b'1',
        ];
        let expected = BasicDeliver {
            consumer_tag: "ctg".to_owned(),
            delivery_tag: 7,
            redelivered: true,
            exchange: String::new(),
            routing_key: "q1".to_owned(),
            ..Default::default()
        };
        assert_eq!(AnyMethod::decode_full(&frame), Ok(AnyMethod::BasicDeliver(expected)));
    }

    #[test]
    fn test_wait() {
        assert!(ConnectionTune::default().wait());
        assert!(QueueDeclare::default().wait());
        assert!(!QueueDeclare { no_wait: true, ..Default::default() }.wait());
        assert!(!BasicAck::default().wait());
        assert!(!ChannelFlowOk::default().wait());
        assert!(TxCommit::default().wait());
    }

    #[test]
    fn test_dispatch() {
        assert_eq!(AnyMethod::from(TxSelect {}).id(), (90, 10));
        assert_eq!(AnyMethod::from(ConfirmSelectOk {}).id(), (85, 11));
        assert_eq!(AnyMethod::from(ExchangeUnbindOk {}).id(), (40, 51));
        assert_eq!(
            AnyMethod::decode_full(&[0, 60, 0, 11]),
            Ok(AnyMethod::BasicQosOk(BasicQosOk {}))
        );
        assert_eq!(
            AnyMethod::decode_full(&[0, 60, 0, 12]),
            Err(DecodeError::UnknownMethod { class_id: 60, method_id: 12 })
        );
        assert_eq!(
            AnyMethod::decode_full(&[0, 100, 0, 10]),
            Err(DecodeError::UnknownClass { class_id: 100 })
        );
    }
}
