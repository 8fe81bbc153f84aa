//! CLI tool to scan a YAML file and output its tokens as JSON
//!
//! Usage: cargo run --bin tokens_to_json <file.yaml>

use std::env;
use std::fs;
use std::process;

use serde::Serialize;
use yamlstyle_scanner::{tokenize, Comment, Token};

#[derive(Serialize)]
struct Dump<'a> {
    tokens: &'a [Token],
    comments: &'a [Comment],
    error: Option<String>,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.yaml>", args[0]);
        eprintln!("  Scans a YAML file and outputs its token stream as JSON to stdout");
        process::exit(1);
    }

    let filename = &args[1];

    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            process::exit(1);
        }
    };

    let scanned = tokenize(&source);
    let dump = Dump {
        tokens: &scanned.tokens,
        comments: &scanned.comments,
        error: scanned.error.as_ref().map(ToString::to_string),
    };

    match serde_json::to_string_pretty(&dump) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing tokens to JSON: {}", e);
            process::exit(1);
        }
    }

    if scanned.error.is_some() {
        process::exit(1);
    }
}
