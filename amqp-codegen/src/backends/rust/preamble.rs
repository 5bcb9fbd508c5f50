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

use quote::quote;
use std::path::Path;

/// Generate the file preamble.
pub fn generate(path: &Path) -> proc_macro2::TokenStream {
    let filename = path.file_name().and_then(|name| name.to_str()).unwrap_or("<stdin>");
    let module_doc_string = format!(" @generated rust AMQP methods from {filename}.");
    // The doc comment is an outer comment: generated code can be
    // included in the middle of another module.
    quote! {
        #[doc = #module_doc_string]

        #[allow(unused_imports)]
        use bytes::{Buf, BufMut};
        #[allow(unused_imports)]
        use amqp_runtime::{
            read_longstr, read_shortstr, read_table, read_timestamp, write_longstr,
            write_shortstr, write_table, write_timestamp, Content, DecodeError, EncodeError,
            FieldTable, Method, Properties, Timestamp,
        };
    }
}
