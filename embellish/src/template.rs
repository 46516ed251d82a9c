use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `{{ name }}` or `{{{ name }}}`.
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\{?\s*([A-Za-z_][\w.]*)\s*\}?\}\}").expect("template pattern is valid")
});

/// Mustache-style variable substitution. Unknown variables render empty.
pub fn render(template: &str, vars: &HashMap<&str, String>) -> String {
    VARIABLE
        .replace_all(template, |caps: &Captures<'_>| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}
