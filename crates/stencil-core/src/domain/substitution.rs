//! Variable substitution.
//!
//! Placeholders have the form `{{identifier}}` where the identifier is made of
//! word characters only. `{{ name }}` is not a placeholder and survives
//! rendering untouched, which keeps JSX and Handlebars-style text intact.
//!
//! Rendering is strict: every placeholder must resolve, otherwise the whole
//! call fails and no partial output is produced.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::domain::error::DomainError;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder regex is valid"));

/// Immutable identifier → value mapping for one generation run.
///
/// Backed by a `BTreeMap` so that the "known variables" listing in
/// [`DomainError::MissingVariable`] is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Identifiers in sorted order.
    pub fn names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Variables
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Render `text`, replacing every `{{identifier}}` with its value.
///
/// # Errors
///
/// [`DomainError::MissingVariable`] on the first identifier that has no
/// value. The error lists every known identifier.
pub fn render(text: &str, variables: &Variables) -> Result<String, DomainError> {
    if text.is_empty() {
        return Ok(String::new());
    }

    // Validate everything before producing output.
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = &caps[1];
        if !variables.contains(name) {
            return Err(DomainError::MissingVariable {
                name: name.to_string(),
                known: variables.names(),
                file: None,
            });
        }
    }

    // Single pass; replacement text is never re-scanned.
    let rendered = PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| {
        variables.get(&caps[1]).unwrap_or_default().to_string()
    });

    Ok(rendered.into_owned())
}

// ============================================================================
// Case conversion
// ============================================================================

pub fn to_snake_case(s: &str) -> String {
    split_words(s).join("_")
}

pub fn to_kebab_case(s: &str) -> String {
    split_words(s).join("-")
}

pub fn to_pascal_case(s: &str) -> String {
    split_words(s)
        .into_iter()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Split an identifier into lowercase words.
///
/// Separators (`_`, `-`, `.`, whitespace) always split. A lower→upper
/// transition splits (`myApp`), and so does the end of an acronym
/// (`HTTPServer` → `http`, `server`).
fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c == '.' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(current.to_lowercase());
                current.clear();
            }
            continue;
        }

        current.push(c);

        if let Some(&next) = chars.peek() {
            let camel = c.is_lowercase() && next.is_uppercase();
            let acronym_end = c.is_uppercase()
                && next.is_uppercase()
                && chars.clone().nth(1).is_some_and(char::is_lowercase);
            if camel || acronym_end {
                words.push(current.to_lowercase());
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        words.push(current.to_lowercase());
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars() -> Variables {
        Variables::new()
            .with("projectName", "demo")
            .with("scope", "demo")
            .with("year", "2024")
    }

    #[test]
    fn renders_all_placeholders() {
        let out = render("{{projectName}} / {{scope}} / {{year}}", &vars()).unwrap();
        assert_eq!(out, "demo / demo / 2024");
    }

    #[test]
    fn missing_variable_fails_without_output() {
        let err = render("hello {{missingKey}}", &vars()).unwrap_err();
        match err {
            DomainError::MissingVariable { name, known, .. } => {
                assert_eq!(name, "missingKey");
                assert_eq!(known, vec!["projectName", "scope", "year"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_variable_detected_after_valid_ones() {
        assert!(render("{{projectName}} {{nope}}", &vars()).is_err());
    }

    #[test]
    fn whitespace_inside_braces_is_not_a_placeholder() {
        let text = "const x = {{ projectName }};";
        assert_eq!(render(text, &vars()).unwrap(), text);
    }

    #[test]
    fn empty_input_renders_empty() {
        assert_eq!(render("", &Variables::new()).unwrap(), "");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let vars = Variables::new().with("a", "{{b}}");
        assert_eq!(render("{{a}}", &vars).unwrap(), "{{b}}");
    }

    #[test]
    fn render_is_repeatable() {
        let text = "{{projectName}}-{{year}}";
        assert_eq!(render(text, &vars()).unwrap(), render(text, &vars()).unwrap());
    }

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("MyAwesomeApp"), "my_awesome_app");
        assert_eq!(to_kebab_case("my_awesome_app"), "my-awesome-app");
        assert_eq!(to_pascal_case("my-awesome-app"), "MyAwesomeApp");
        assert_eq!(to_snake_case("HTTPServer"), "http_server");
        assert_eq!(to_kebab_case("acme.web"), "acme-web");
    }
}
