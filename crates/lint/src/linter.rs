//! The lint driver.
//!
//! [`Linter::lint`] scans the source once, then feeds tokens, comments and
//! physical lines to the enabled rules in source order. Problems are buffered
//! per line so that `disable-line` directives can still drop them, and sorted
//! by position before they are released.

use tracing::{debug, debug_span};
use yamlstyle_scanner::{tokenize, Comment, ScanError, Token, Tokenized};

use crate::config::LintConfig;
use crate::directives::{self, DisabledRules};
use crate::error::ConfigError;
use crate::problem::{Level, LintProblem};
use crate::rules::{lines, CommentRule, DynTokenRule, Line, LineRule, TokenRule, TokenWindow};

struct Registered<R: ?Sized> {
    id: &'static str,
    level: Level,
    rule: Box<R>,
}

/// A set of configured rules.
#[derive(Default)]
pub struct Linter {
    token_rules: Vec<Registered<dyn DynTokenRule>>,
    line_rules: Vec<Registered<dyn LineRule>>,
    comment_rules: Vec<Registered<dyn CommentRule>>,
}

impl std::fmt::Debug for Linter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linter").field("rules", &self.rule_ids()).finish()
    }
}

/// Something that happens in the source, in the order rules see it.
enum Element<'a> {
    Token(usize),
    Comment(&'a Comment),
    Line(Line<'a>),
}

impl Linter {
    /// A linter with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the rules a configuration enables.
    pub fn from_config(config: &LintConfig) -> Result<Self, ConfigError> {
        let mut linter = Self::new();
        for enabled in config.enabled_rules()? {
            let rule = (enabled.entry.build)(&enabled.options)?;
            linter.token_rules.push(Registered {
                id: enabled.entry.id,
                level: enabled.level,
                rule,
            });
        }
        debug!(rules = ?linter.rule_ids(), "linter configured");
        Ok(linter)
    }

    pub fn with_token_rule<R: TokenRule>(mut self, rule: R, level: Level) -> Self {
        self.token_rules.push(Registered { id: rule.id(), level, rule: Box::new(rule) });
        self
    }

    pub fn with_line_rule<R: LineRule + 'static>(mut self, rule: R, level: Level) -> Self {
        self.line_rules.push(Registered { id: rule.id(), level, rule: Box::new(rule) });
        self
    }

    pub fn with_comment_rule<R: CommentRule + 'static>(mut self, rule: R, level: Level) -> Self {
        self.comment_rules.push(Registered { id: rule.id(), level, rule: Box::new(rule) });
        self
    }

    /// Ids of all rules, in the order they run.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.token_rules
            .iter()
            .map(|r| r.id)
            .chain(self.comment_rules.iter().map(|r| r.id))
            .chain(self.line_rules.iter().map(|r| r.id))
            .collect()
    }

    /// Lints one input. Problems come out sorted by position; a syntax error,
    /// if any, replaces the first problem at or after its position.
    pub fn lint(&self, source: &str) -> Vec<LintProblem> {
        let _span = debug_span!("lint", len = source.len()).entered();
        if directives::is_file_disabled(source) {
            debug!("linting disabled by directive");
            return Vec::new();
        }
        let scanned = tokenize(source);
        let problems = self.cosmetic_problems(source, &scanned);
        match &scanned.error {
            Some(error) => merge_syntax_error(problems, syntax_problem(error)),
            None => problems,
        }
    }

    fn cosmetic_problems(&self, source: &str, scanned: &Tokenized) -> Vec<LintProblem> {
        let known = self.rule_ids();
        let tokens = &scanned.tokens;
        // Before a syntax error, only tokens whose two successors were scanned
        // are checked.
        let checked = match scanned.error {
            Some(_) => tokens.len().saturating_sub(2),
            None => tokens.len(),
        };
        let mut passes: Vec<_> = self
            .token_rules
            .iter()
            .map(|registered| (registered.id, registered.level, registered.rule.start_pass()))
            .collect();

        let mut disabled = DisabledRules::default();
        let mut disabled_for_line = DisabledRules::default();
        let mut disabled_for_next_line = DisabledRules::default();
        let mut cache: Vec<LintProblem> = Vec::new();
        let mut problems = Vec::new();

        for element in elements(source, &tokens[..checked], &scanned.comments) {
            match element {
                Element::Token(i) => {
                    let window = TokenWindow {
                        source,
                        token: &tokens[i],
                        prev: i.checked_sub(1).map(|j| &tokens[j]),
                        next: tokens.get(i + 1),
                        next_next: tokens.get(i + 2),
                    };
                    for (id, level, pass) in passes.iter_mut() {
                        cache.extend(tag(pass.check(&window), *id, *level));
                    }
                }
                Element::Comment(comment) => {
                    for registered in &self.comment_rules {
                        cache.extend(tag(
                            registered.rule.check(comment, source),
                            registered.id,
                            registered.level,
                        ));
                    }
                    if let Some(directive) = directives::parse(&comment.text) {
                        disabled.apply(&directive, &known);
                        if comment.inline {
                            disabled_for_line.apply_line(&directive, &known);
                        } else {
                            disabled_for_next_line.apply_line(&directive, &known);
                        }
                    }
                }
                Element::Line(line) => {
                    for registered in &self.line_rules {
                        cache.extend(tag(registered.rule.check(&line), registered.id, registered.level));
                    }
                    cache.sort();
                    problems.extend(cache.drain(..).filter(|problem| {
                        let rule = problem.rule.as_deref();
                        !disabled_for_line.is_disabled(rule) && !disabled.is_disabled(rule)
                    }));
                    disabled_for_line = std::mem::take(&mut disabled_for_next_line);
                }
            }
        }
        problems
    }
}

fn tag(problems: Vec<LintProblem>, id: &str, level: Level) -> impl Iterator<Item = LintProblem> + '_ {
    problems.into_iter().map(move |mut problem| {
        problem.rule = Some(id.to_string());
        problem.level = level;
        problem
    })
}

/// Tokens and comments merged by position, each line released after the
/// tokens and comments that start on it.
fn elements<'a>(
    source: &'a str,
    tokens: &'a [Token],
    comments: &'a [Comment],
) -> impl Iterator<Item = Element<'a>> + 'a {
    let mut token_index = 0;
    let mut comment_index = 0;
    let mut lines = lines(source).peekable();

    std::iter::from_fn(move || {
        let token = tokens.get(token_index);
        let comment = comments.get(comment_index);
        let next = match (token, comment) {
            (Some(t), Some(c)) if c.start.index < t.start.index => Some((c.start.line, false)),
            (Some(t), _) => Some((t.start.line, true)),
            (None, Some(c)) => Some((c.start.line, false)),
            (None, None) => None,
        };
        let line_no = lines.peek().map(|line| line.line_no);
        match (next, line_no) {
            (Some((line, is_token)), Some(current)) if line < current => {
                Some(take(is_token, &mut token_index, &mut comment_index, comments))
            }
            (Some((_, is_token)), None) => {
                Some(take(is_token, &mut token_index, &mut comment_index, comments))
            }
            _ => lines.next().map(Element::Line),
        }
    })
}

fn take<'a>(
    is_token: bool,
    token_index: &mut usize,
    comment_index: &mut usize,
    comments: &'a [Comment],
) -> Element<'a> {
    if is_token {
        *token_index += 1;
        Element::Token(*token_index - 1)
    } else {
        *comment_index += 1;
        Element::Comment(&comments[*comment_index - 1])
    }
}

fn syntax_problem(error: &ScanError) -> LintProblem {
    debug!(%error, "syntax error");
    LintProblem::new(
        error.line(),
        error.column(),
        format!("syntax error: {}", error.problem),
    )
}

fn merge_syntax_error(problems: Vec<LintProblem>, syntax: LintProblem) -> Vec<LintProblem> {
    let mut merged = Vec::with_capacity(problems.len() + 1);
    let mut pending = Some(syntax);
    for problem in problems {
        match pending.take() {
            Some(syntax) if (syntax.line, syntax.column) <= (problem.line, problem.column) => {
                merged.push(syntax);
            }
            other => {
                pending = other;
                merged.push(problem);
            }
        }
    }
    merged.extend(pending);
    merged
}
