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

//! AMQP method generator.

use argh::FromArgs;
use codespan_reporting::term::{self, termcolor};
use std::io::Read;
use tracing_subscriber::EnvFilter;

use amqp_codegen::{analyzer, ast, backends, parser};

#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    JSON,
    Rust,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.to_lowercase().as_str() {
            "json" => Ok(Self::JSON),
            "rust" => Ok(Self::Rust),
            _ => Err(format!("could not parse {input:?}, valid option are 'json', 'rust'.")),
        }
    }
}

#[derive(FromArgs, Debug)]
/// AMQP specification analyzer and method generator.
struct Opt {
    #[argh(switch)]
    /// print tool version and exit.
    version: bool,

    #[argh(option, default = "OutputFormat::Rust")]
    /// generate output in this format ("rust", "json").
    output_format: OutputFormat,

    #[argh(option, short = 'o')]
    /// write the generated output to this file.
    /// The output is printed on stdout when omitted.
    output: Option<String>,

    #[argh(positional)]
    /// input XML specification.
    /// The specification is read from stdin when omitted.
    input_file: Option<String>,

    #[argh(option)]
    /// exclude classes from the generated output.
    exclude_class: Vec<String>,
}

/// Remove classes listed in the input filter.
fn filter_classes(spec: ast::Specification, exclude_classes: &[String]) -> ast::Specification {
    ast::Specification {
        classes: spec
            .classes
            .into_iter()
            .filter(|class| !exclude_classes.contains(&class.name))
            .collect(),
        ..spec
    }
}

fn parse_input(
    sources: &mut ast::SourceDatabase,
    input_file: Option<&str>,
) -> Result<ast::Specification, codespan_reporting::diagnostic::Diagnostic<ast::FileId>> {
    match input_file {
        Some(input_file) => parser::parse_file(sources, input_file),
        None => {
            let mut source = String::new();
            std::io::stdin().read_to_string(&mut source).map_err(|err| {
                codespan_reporting::diagnostic::Diagnostic::error()
                    .with_message(format!("failed to read standard input: {err}"))
            })?;
            parser::parse_inline(sources, "<stdin>", source)
        }
    }
}

fn generate_backend(opt: &Opt) -> Result<String, String> {
    let mut sources = ast::SourceDatabase::new();
    let writer = termcolor::StandardStream::stderr(termcolor::ColorChoice::Auto);
    let spec = match parse_input(&mut sources, opt.input_file.as_deref()) {
        Ok(spec) => filter_classes(spec, &opt.exclude_class),
        Err(err) => {
            let config = term::Config::default();
            term::emit(&mut writer.lock(), &config, &sources, &err)
                .map_err(|err| format!("could not print error: {err}"))?;
            return Err(String::from("Error while parsing input"));
        }
    };

    if let Err(diagnostics) = analyzer::analyze(&spec) {
        diagnostics
            .emit(&sources, &mut writer.lock())
            .map_err(|err| format!("could not print analyzer diagnostics: {err}"))?;
        return Err(String::from("Analysis failed"));
    }

    match opt.output_format {
        OutputFormat::JSON => backends::json::generate(&spec),
        OutputFormat::Rust => {
            backends::rust::generate(&sources, &spec).map_err(|err| err.to_string())
        }
    }
}

fn main() -> Result<(), String> {
    let opt: Opt = argh::from_env();

    if opt.version {
        println!("amqpgen {}\nCopyright (C) 2026 Google LLC", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = generate_backend(&opt)?;
    match opt.output.as_ref() {
        Some(path) => std::fs::write(path, output)
            .map_err(|err| format!("failed to write output file '{path}': {err}"))?,
        None => println!("{output}"),
    }

    Ok(())
}
