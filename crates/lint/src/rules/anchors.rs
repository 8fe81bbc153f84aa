//! The `anchors` rule: aliases must refer to an anchor declared earlier in the
//! same document; optionally anchors must be unique and used.

use indexmap::IndexMap;
use serde::Deserialize;
use yamlstyle_scanner::{Mark, Token, TokenKind};

use super::{parse_options, DynTokenRule, RuleOptions, TokenRule, TokenWindow};
use crate::error::ConfigError;
use crate::problem::LintProblem;

pub const ID: &str = "anchors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AnchorsConfig {
    pub forbid_undeclared_aliases: bool,
    pub forbid_duplicated_anchors: bool,
    pub forbid_unused_anchors: bool,
}

impl Default for AnchorsConfig {
    fn default() -> Self {
        Self {
            forbid_undeclared_aliases: true,
            forbid_duplicated_anchors: false,
            forbid_unused_anchors: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AnchorInfo {
    mark: Mark,
    used: bool,
}

/// Anchors of the current document, in declaration order.
#[derive(Debug, Default)]
pub struct AnchorsContext {
    anchors: IndexMap<String, AnchorInfo>,
}

#[derive(Debug, Default)]
pub struct Anchors {
    config: AnchorsConfig,
}

impl Anchors {
    pub fn new(config: AnchorsConfig) -> Self {
        Self { config }
    }
}

pub(crate) fn build(options: &RuleOptions) -> Result<Box<dyn DynTokenRule>, ConfigError> {
    let config: AnchorsConfig = parse_options(ID, options)?;
    Ok(Box::new(Anchors::new(config)))
}

fn at(mark: Mark, desc: String) -> LintProblem {
    LintProblem::new(mark.line + 1, mark.column + 1, desc)
}

fn ends_document(token: Option<&Token>) -> bool {
    matches!(
        token.map(|t| &t.kind),
        Some(TokenKind::StreamEnd | TokenKind::DocumentStart | TokenKind::DocumentEnd)
    )
}

impl TokenRule for Anchors {
    type Context = AnchorsContext;

    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, window: &TokenWindow<'_>, cx: &mut AnchorsContext) -> Vec<LintProblem> {
        let token = window.token;
        let mut problems = Vec::new();

        if matches!(
            token.kind,
            TokenKind::StreamStart | TokenKind::DocumentStart | TokenKind::DocumentEnd
        ) {
            cx.anchors.clear();
        }

        match &token.kind {
            TokenKind::Alias(name) => match cx.anchors.get_mut(name) {
                Some(info) => info.used = true,
                None if self.config.forbid_undeclared_aliases => {
                    problems.push(at(token.start, format!("found undeclared alias \"{}\"", name)));
                }
                None => {}
            },
            TokenKind::Anchor(name) => {
                if self.config.forbid_duplicated_anchors && cx.anchors.contains_key(name) {
                    problems.push(at(token.start, format!("found duplicated anchor \"{}\"", name)));
                }
                // A redeclared anchor shadows the previous one.
                cx.anchors.shift_remove(name);
                cx.anchors.insert(name.clone(), AnchorInfo { mark: token.start, used: false });
            }
            _ => {}
        }

        if self.config.forbid_unused_anchors && ends_document(window.next) {
            problems.extend(
                cx.anchors
                    .iter()
                    .filter(|(_, info)| !info.used)
                    .map(|(name, info)| at(info.mark, format!("found unused anchor \"{}\"", name))),
            );
        }
        problems
    }
}
