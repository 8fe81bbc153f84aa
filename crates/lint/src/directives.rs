//! In-source directives that switch rules off and on.
//!
//! ```yaml
//! # yamlstyle disable rule:indentation
//! messy:
//!      - ok here
//! # yamlstyle enable
//! key: value  # yamlstyle disable-line rule:key-duplicates
//! ```
//!
//! A `disable-file` directive on the first line turns linting off for the
//! whole input.

use std::collections::BTreeSet;

use chumsky::prelude::*;

/// Word that introduces a directive comment.
pub const MARKER: &str = "yamlstyle";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Disable,
    Enable,
    DisableLine,
    DisableFile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive<'src> {
    pub kind: DirectiveKind,
    /// Rule ids named with `rule:`, empty for all rules.
    pub rules: Vec<&'src str>,
}

fn directive_parser<'src>(
) -> impl Parser<'src, &'src str, Directive<'src>, extra::Err<Rich<'src, char>>> {
    let blank = one_of(" \t").repeated();
    let gap = one_of(" \t").repeated().at_least(1);

    let kind = choice((
        just("disable-line").to(DirectiveKind::DisableLine),
        just("disable-file").to(DirectiveKind::DisableFile),
        just("disable").to(DirectiveKind::Disable),
        just("enable").to(DirectiveKind::Enable),
    ));

    let rule = just("rule:").ignore_then(
        any()
            .filter(|c: &char| !c.is_whitespace())
            .repeated()
            .at_least(1)
            .to_slice(),
    );

    just('#')
        .ignore_then(blank.clone())
        .ignore_then(just(MARKER))
        .ignore_then(gap.clone())
        .ignore_then(kind)
        .then(gap.ignore_then(rule).repeated().collect::<Vec<_>>())
        .then_ignore(blank)
        .then_ignore(end())
        .map(|(kind, rules)| Directive { kind, rules })
}

/// Parses a comment (including its `#`) as a directive.
pub fn parse(comment: &str) -> Option<Directive<'_>> {
    directive_parser().parse(comment).into_result().ok()
}

/// Whether the first line of `source` disables linting for the whole input.
pub fn is_file_disabled(source: &str) -> bool {
    let first_line = source.lines().next().unwrap_or("");
    matches!(parse(first_line), Some(Directive { kind: DirectiveKind::DisableFile, .. }))
}

/// Rules currently switched off.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledRules {
    rules: BTreeSet<String>,
}

impl DisabledRules {
    pub fn is_disabled(&self, rule: Option<&str>) -> bool {
        rule.is_some_and(|id| self.rules.contains(id))
    }

    /// Applies a `disable` or `enable` directive. Unknown rule ids are ignored
    /// when disabling.
    pub fn apply(&mut self, directive: &Directive<'_>, known: &[&str]) {
        match directive.kind {
            DirectiveKind::Disable => self.disable(&directive.rules, known),
            DirectiveKind::Enable if directive.rules.is_empty() => self.rules.clear(),
            DirectiveKind::Enable => {
                for id in &directive.rules {
                    self.rules.remove(*id);
                }
            }
            DirectiveKind::DisableLine | DirectiveKind::DisableFile => {}
        }
    }

    /// Applies a `disable-line` directive.
    pub fn apply_line(&mut self, directive: &Directive<'_>, known: &[&str]) {
        if directive.kind == DirectiveKind::DisableLine {
            self.disable(&directive.rules, known);
        }
    }

    fn disable(&mut self, rules: &[&str], known: &[&str]) {
        if rules.is_empty() {
            self.rules.extend(known.iter().map(|id| id.to_string()));
        } else {
            self.rules
                .extend(rules.iter().filter(|id| known.contains(id)).map(|id| id.to_string()));
        }
    }
}
