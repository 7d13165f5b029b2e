mod cli;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;

use thrift_schema::{JsonAstParser, ThriftTool};

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    let tool = ThriftTool::new();
    let name = cli.name.as_deref();

    let result = if cli.input.starts_with("http://") || cli.input.starts_with("https://") {
        let source = match fetch(&cli.input) {
            Ok(source) => source,
            Err(error) => {
                eprintln!("failed to fetch {}: {error}", cli.input);
                return ExitCode::FAILURE;
            }
        };
        JsonAstParser
            .parse_str(&source, &cli.input)
            .map_err(Into::into)
            .and_then(|tree| tool.parse_tree(&tree, name).map(|(value, _)| value))
    } else {
        tool.parse(Path::new(&cli.input), name)
    };

    match result {
        Ok(value) => {
            let rendered = if cli.pretty {
                serde_json::to_string_pretty(&value)
            } else {
                serde_json::to_string(&value)
            }
            .expect("generated JSON serializes");
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn fetch(url: &str) -> Result<String, reqwest::Error> {
    reqwest::blocking::get(url)?.error_for_status()?.text()
}
