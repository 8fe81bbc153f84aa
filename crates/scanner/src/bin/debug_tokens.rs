use std::env;
use std::fs;

use yamlstyle_scanner::Scanner;

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <file.yaml> [target_line]", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];
    let source = match fs::read_to_string(filename) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", filename, e);
            std::process::exit(1);
        }
    };

    // Get line from arg if provided
    let target_line: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);

    let mut scanner = Scanner::new(&source);
    for result in scanner.by_ref() {
        match result {
            Ok(token) => {
                let line = token.start.line + 1;

                // Print tokens around target line
                if target_line == 0
                    || (line >= target_line.saturating_sub(5) && line <= target_line + 5)
                {
                    println!(
                        "Line {:4}: {:<22} {}:{} .. {}:{}  {:?}",
                        line,
                        token.kind.name(),
                        token.start.line + 1,
                        token.start.column + 1,
                        token.end.line + 1,
                        token.end.column + 1,
                        token.span()
                    );
                }
            }
            Err(e) => eprintln!("Scanner error: {}", e),
        }
    }

    for comment in scanner.comments() {
        let line = comment.start.line + 1;
        if target_line == 0 || (line >= target_line.saturating_sub(5) && line <= target_line + 5) {
            println!("Line {:4}: COMMENT {:?} (inline: {})", line, comment.text, comment.inline);
        }
    }
}
