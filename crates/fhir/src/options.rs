use std::sync::OnceLock;

use log::debug;
use regex::Regex;

/// One `key=value` option string, parsed.
///
/// Keys keep their first-seen position; a repeated key overwrites the value
/// in place. Fragments that do not match `key=value` are collected verbatim
/// so the caller can reject the whole set with a complete report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedOptions {
    values: Vec<(String, String)>,
    errors: Vec<String>,
}

fn fragment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\w+)=([^,]+)$").expect("valid pattern"))
}

impl ParsedOptions {
    /// Parse a comma-separated `key=value` list. Never fails; malformed
    /// fragments land in [`errors`](Self::errors) instead.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let mut parsed = Self::default();
        for fragment in input.split(',').map(str::trim).filter(|f| !f.is_empty()) {
            match fragment_pattern().captures(fragment) {
                Some(captures) => {
                    parsed.insert(&captures[1], &captures[2]);
                }
                None => {
                    debug!("malformed option fragment: {fragment:?}");
                    parsed.errors.push(fragment.to_string());
                }
            }
        }
        parsed
    }

    fn insert(&mut self, key: &str, value: &str) {
        match self.values.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.values.push((key.to_string(), value.to_string())),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_a_well_formed_list() {
        let options = ParsedOptions::parse("family=Park,gender=male");
        assert_eq!(options.get("family"), Some("Park"));
        assert_eq!(options.get("gender"), Some("male"));
        assert!(options.is_valid());
    }

    #[test]
    fn empty_input_is_empty_and_valid() {
        let options = ParsedOptions::parse("  ");
        assert!(options.is_empty());
        assert!(options.is_valid());
    }

    #[test]
    fn empty_fragments_are_discarded() {
        let options = ParsedOptions::parse("family=Park,,gender=male,");
        assert!(options.is_valid());
        assert_eq!(options.iter().count(), 2);
    }

    #[test]
    fn repeated_key_overwrites_in_place() {
        let options = ParsedOptions::parse("family=Park,gender=male,family=Kim");
        assert_eq!(options.get("family"), Some("Kim"));
        let keys: Vec<&str> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["family", "gender"]);
    }

    #[test]
    fn every_malformed_fragment_is_reported() {
        let options = ParsedOptions::parse("family=Park,nonsense,=alsobad,gender=male");
        assert_eq!(options.errors(), &["nonsense".to_string(), "=alsobad".to_string()]);
        assert!(!options.is_valid());
        assert_eq!(options.get("family"), Some("Park"));
        assert_eq!(options.get("gender"), Some("male"));
    }

    #[test]
    fn keys_are_word_characters_only() {
        let options = ParsedOptions::parse("birth-date=1983");
        assert!(!options.is_valid());
        assert_eq!(options.errors().len(), 1);
    }

    #[test]
    fn values_keep_internal_equals_signs() {
        let options = ParsedOptions::parse("note=a=b");
        assert_eq!(options.get("note"), Some("a=b"));
    }
}
