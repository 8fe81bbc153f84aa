//! Problem output formats.

use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;
use yamlstyle_lint::{LintProblem, ProblemReporter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// File name, then one aligned line per problem
    Standard,
    /// `file:line:column: [level] message (rule)`, one per line
    Parsable,
    /// A JSON array of all problems
    Json,
    /// Source excerpts with the problem highlighted
    Pretty,
}

#[derive(Serialize)]
struct FileProblem<'a> {
    file: &'a str,
    #[serde(flatten)]
    problem: &'a LintProblem,
}

/// Writes problems as files are linted. The JSON format is buffered until
/// [`Printer::finish`].
pub struct Printer<W: Write> {
    out: W,
    format: Format,
    color: bool,
    json: Vec<serde_json::Value>,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, format: Format, color: bool) -> Self {
        Self { out, format, color, json: Vec::new() }
    }

    pub fn file(&mut self, name: &str, source: &str, problems: &[LintProblem]) -> io::Result<()> {
        match self.format {
            Format::Standard => self.standard(name, problems),
            Format::Parsable => {
                for problem in problems {
                    writeln!(self.out, "{}", parsable(name, problem))?;
                }
                Ok(())
            }
            Format::Json => {
                for problem in problems {
                    self.json.push(
                        serde_json::to_value(FileProblem { file: name, problem })
                            .map_err(io::Error::other)?,
                    );
                }
                Ok(())
            }
            Format::Pretty => {
                let mut reporter = ProblemReporter::new(name, source);
                if !self.color {
                    reporter = reporter.without_color();
                }
                for problem in problems {
                    self.out.write_all(reporter.render(problem)?.as_bytes())?;
                }
                Ok(())
            }
        }
    }

    fn standard(&mut self, name: &str, problems: &[LintProblem]) -> io::Result<()> {
        if problems.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{}", name)?;
        for problem in problems {
            writeln!(self.out, "{}", standard_line(problem))?;
        }
        writeln!(self.out)
    }

    pub fn finish(mut self) -> io::Result<()> {
        if self.format == Format::Json {
            serde_json::to_writer_pretty(&mut self.out, &self.json).map_err(io::Error::other)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

fn parsable(name: &str, problem: &LintProblem) -> String {
    format!(
        "{}:{}:{}: [{}] {}",
        name, problem.line, problem.column, problem.level, problem
    )
}

fn standard_line(problem: &LintProblem) -> String {
    let mut line = format!("  {}:{}", problem.line, problem.column);
    pad_to(&mut line, 12);
    line.push_str(&problem.level.to_string());
    pad_to(&mut line, 21);
    line.push_str(&problem.desc);
    if let Some(rule) = &problem.rule {
        line.push_str(&format!("  ({})", rule));
    }
    line
}

fn pad_to(line: &mut String, width: usize) {
    while line.len() < width {
        line.push(' ');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use yamlstyle_lint::Level;

    fn problem() -> LintProblem {
        let mut problem = LintProblem::new(3, 4, "wrong indentation: expected 4 but found 3");
        problem.rule = Some("indentation".into());
        problem
    }

    #[test]
    fn test_standard_line() {
        assert_eq!(
            standard_line(&problem()),
            "  3:4       error    wrong indentation: expected 4 but found 3  (indentation)"
        );
    }

    #[test]
    fn test_parsable_line() {
        let mut problem = problem();
        problem.level = Level::Warning;
        assert_eq!(
            parsable("a.yaml", &problem),
            "a.yaml:3:4: [warning] wrong indentation: expected 4 but found 3 (indentation)"
        );
    }

    #[test]
    fn test_standard_skips_clean_files() {
        let mut out = Vec::new();
        let mut printer = Printer::new(&mut out, Format::Standard, false);
        printer.file("clean.yaml", "a: 1\n", &[]).unwrap();
        printer.file("bad.yaml", "", &[problem()]).unwrap();
        printer.finish().unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "bad.yaml\n  3:4       error    wrong indentation: expected 4 but found 3  (indentation)\n\n"
        );
    }

    #[test]
    fn test_json_collects_all_files() {
        let mut out = Vec::new();
        let mut printer = Printer::new(&mut out, Format::Json, false);
        printer.file("a.yaml", "", &[problem()]).unwrap();
        printer.file("b.yaml", "", &[problem()]).unwrap();
        printer.finish().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let files: Vec<_> = value
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["file"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(files, vec!["a.yaml", "b.yaml"]);
        assert_eq!(value[0]["rule"], "indentation");
        assert_eq!(value[0]["level"], "error");
    }
}
