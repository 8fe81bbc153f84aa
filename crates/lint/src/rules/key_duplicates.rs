//! The `key-duplicates` rule: a key may appear only once per mapping.
//!
//! `<<` merge keys are exempt unless `forbid-duplicated-merge-keys` is set.

use std::collections::HashSet;

use serde::Deserialize;
use yamlstyle_scanner::TokenKind;

use super::{parse_options, DynTokenRule, RuleOptions, TokenRule, TokenWindow};
use crate::error::ConfigError;
use crate::problem::LintProblem;

pub const ID: &str = "key-duplicates";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct KeyDuplicatesConfig {
    pub forbid_duplicated_merge_keys: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Collection {
    Map,
    Seq,
}

#[derive(Debug)]
struct Parent {
    kind: Collection,
    keys: HashSet<String>,
}

impl Parent {
    fn new(kind: Collection) -> Self {
        Self { kind, keys: HashSet::new() }
    }
}

#[derive(Debug, Default)]
pub struct KeyDuplicatesContext {
    stack: Vec<Parent>,
}

#[derive(Debug, Default)]
pub struct KeyDuplicates {
    config: KeyDuplicatesConfig,
}

impl KeyDuplicates {
    pub fn new(config: KeyDuplicatesConfig) -> Self {
        Self { config }
    }
}

pub(crate) fn build(options: &RuleOptions) -> Result<Box<dyn DynTokenRule>, ConfigError> {
    let config: KeyDuplicatesConfig = parse_options(ID, options)?;
    Ok(Box::new(KeyDuplicates::new(config)))
}

impl TokenRule for KeyDuplicates {
    type Context = KeyDuplicatesContext;

    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self, window: &TokenWindow<'_>, cx: &mut KeyDuplicatesContext) -> Vec<LintProblem> {
        let token = window.token;
        match token.kind {
            TokenKind::BlockMappingStart | TokenKind::FlowMappingStart => {
                cx.stack.push(Parent::new(Collection::Map));
            }
            TokenKind::BlockSequenceStart | TokenKind::FlowSequenceStart => {
                cx.stack.push(Parent::new(Collection::Seq));
            }
            TokenKind::BlockEnd | TokenKind::FlowMappingEnd | TokenKind::FlowSequenceEnd => {
                cx.stack.pop();
            }
            TokenKind::Key => {
                let Some(next) = window.next else { return Vec::new() };
                let Some(key) = next.scalar_value() else { return Vec::new() };
                let Some(parent) = cx.stack.last_mut() else { return Vec::new() };
                if parent.kind != Collection::Map {
                    return Vec::new();
                }
                if parent.keys.contains(key)
                    && (key != "<<" || self.config.forbid_duplicated_merge_keys)
                {
                    return vec![LintProblem::new(
                        next.start.line + 1,
                        next.start.column + 1,
                        format!("duplication of key \"{}\" in mapping", key),
                    )];
                }
                parent.keys.insert(key.to_string());
            }
            _ => {}
        }
        Vec::new()
    }
}
