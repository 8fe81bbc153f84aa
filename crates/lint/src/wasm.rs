//! WebAssembly bindings for the linter.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { lint_yaml, lint_yaml_to_json } from './yamlstyle_lint.js';
//!
//! await init();
//!
//! const problems = lint_yaml("a:\n   b: 1\n", JSON.stringify({ rules: { indentation: { spaces: 2 } } }));
//! for (const p of problems) console.log(`${p.line}:${p.column} ${p.desc}`);
//! ```

use wasm_bindgen::prelude::*;

use crate::{LintConfig, LintProblem, Linter};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn run(source: &str, config_json: Option<String>) -> Result<Vec<LintProblem>, JsValue> {
    let config = match config_json {
        Some(json) => LintConfig::from_json(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => LintConfig::default(),
    };
    let linter = Linter::from_config(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(linter.lint(source))
}

/// Lint YAML source and return the problems as an array of JavaScript objects.
///
/// # Arguments
/// * `source` - The YAML source to lint
/// * `config_json` - Optional configuration as a JSON string
///
/// # Returns
/// * `Ok(JsValue)` - Array of `{ line, column, desc, rule, level }`
/// * `Err(JsValue)` - Error message if the configuration is invalid
#[wasm_bindgen]
pub fn lint_yaml(source: &str, config_json: Option<String>) -> Result<JsValue, JsValue> {
    let problems = run(source, config_json)?;
    serde_wasm_bindgen::to_value(&problems)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Lint YAML source and return the problems as a JSON string.
#[wasm_bindgen]
pub fn lint_yaml_to_json(source: &str, config_json: Option<String>) -> Result<String, JsValue> {
    let problems = run(source, config_json)?;
    serde_json::to_string_pretty(&problems)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {}", e)))
}
