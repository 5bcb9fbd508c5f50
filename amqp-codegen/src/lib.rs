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

//! AMQP protocol specification parser, analyzer and code generator.

pub mod analyzer;
pub mod ast;
pub mod backends;
pub mod parser;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rust_output_is_deterministic() {
        // The generated code should be deterministic, to avoid unnecessary rebuilds during
        // incremental builds.
        let src = r#"
<amqp major="0" minor="9" revision="1" port="5672">
  <constant name="frame-method" value="1"/>
  <domain name="bit" type="bit"/>
  <domain name="queue-name" type="shortstr"/>
  <domain name="no-wait" type="bit"/>
  <class name="queue" index="50">
    <method name="declare" index="10" synchronous="1">
      <field name="reserved-1" type="short" reserved="1"/>
      <field name="queue" domain="queue-name"/>
      <field name="passive" domain="bit"/>
      <field name="durable" domain="bit"/>
      <field name="no-wait" domain="no-wait"/>
      <field name="arguments" type="table"/>
    </method>
    <method name="declare-ok" index="11" synchronous="1">
      <field name="queue" domain="queue-name"/>
      <field name="message-count" type="long"/>
    </method>
  </class>
</amqp>
"#
        .to_owned();

        let mut sources1 = ast::SourceDatabase::new();
        let mut sources2 = ast::SourceDatabase::new();
        let mut sources3 = ast::SourceDatabase::new();

        let file1 = parser::parse_inline(&mut sources1, "foo", src.clone()).unwrap();
        let file2 = parser::parse_inline(&mut sources2, "foo", src.clone()).unwrap();
        let file3 = parser::parse_inline(&mut sources3, "foo", src).unwrap();

        assert!(analyzer::analyze(&file1).is_ok());

        let result1 = backends::rust::generate(&sources1, &file1).unwrap();
        let result2 = backends::rust::generate(&sources2, &file2).unwrap();
        let result3 = backends::rust::generate(&sources3, &file3).unwrap();

        assert_eq!(result1, result2);
        assert_eq!(result2, result3);
    }
}
