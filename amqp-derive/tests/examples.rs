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

//! Attribute macro tests.

use amqp_derive::{amqp, amqp_inline};

#[test]
fn test_file_specification() {
    #[amqp("src/test_valid.xml")]
    mod queue {}

    use amqp_runtime::Method;
    use queue::*;

    assert_eq!(FRAME_END, 206);
    assert_eq!(QueuePurge::CLASS_ID, 50);
    assert_eq!(QueuePurgeOk::METHOD_ID, 31);

    let purge = QueuePurge { queue: "tasks".to_owned(), no_wait: true };
    assert!(!purge.wait());
    let bytes = purge.encode_to_vec().unwrap();
    assert_eq!(bytes, [0, 0, 5, b't', b'a', b's', b'k', b's', 1]);
    assert_eq!(QueuePurge::decode_full(&bytes).unwrap(), purge);
}

#[test]
fn test_inline_specification() {
    #[amqp_inline(
        r#"
        <amqp major="0" minor="9" revision="1" port="5672">
          <class name="connection" index="10">
            <method name="secure-ok" index="21" synchronous="1">
              <field name="response" type="longstr"/>
            </method>
          </class>
        </amqp>
        "#
    )]
    mod connection {
        pub fn response(method: &ConnectionSecureOk) -> &[u8] {
            &method.response
        }
    }

    use amqp_runtime::Method;
    use connection::*;

    let bytes = [0, 0, 0, 2, b'o', b'k'];
    let method = ConnectionSecureOk::decode_full(&bytes).unwrap();
    assert_eq!(response(&method), b"ok");
    assert_eq!(PROTOCOL_MINOR, 9);
    assert_eq!(DEFAULT_PORT, 5672);
}
