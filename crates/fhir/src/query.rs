use log::debug;
use url::Url;

use crate::error::{FhirError, Result};
use crate::options::ParsedOptions;

/// Every search asks for summary bodies only.
pub const SUMMARY_ONLY: bool = true;

/// Hard cap on returned records, applied after any requested limit.
pub const PAGE_CAP: u32 = 5;

/// An ordered FHIR search parameter list.
///
/// Filter keys become exact-match criteria; `orderby`, `include` and `limit`
/// map onto the protocol parameters `_sort`, `_include` and `_count`. The
/// summary flag and the page cap are always appended last, so the cap
/// overrides any requested limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    params: Vec<(String, String)>,
}

impl SearchQuery {
    /// Build a query from parsed options. Any malformed fragment or
    /// non-numeric limit rejects the whole set.
    pub fn from_options(options: &ParsedOptions) -> Result<Self> {
        Self::from_parts(options, None, None, None)
    }

    /// Build from parsed options plus explicit ordering, include and limit
    /// arguments. The explicit arguments win over their option-string
    /// spellings.
    pub fn from_parts(
        options: &ParsedOptions,
        order_by: Option<&str>,
        include: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Self> {
        if !options.is_valid() {
            return Err(FhirError::InvalidFilters(options.errors().to_vec()));
        }
        let mut query = Self::default();
        for (key, value) in options.iter() {
            match key {
                "orderby" => query.set("_sort", value),
                "include" => query.set("_include", value),
                "limit" => {
                    let parsed: u32 = value.parse().map_err(|_| {
                        FhirError::InvalidFilters(vec![format!("limit={value}")])
                    })?;
                    query.set("_count", &parsed.to_string());
                }
                _ => query.set(&format!("{key}:exact"), value),
            }
        }
        if let Some(field) = order_by {
            query.set("_sort", field);
        }
        if let Some(field) = include {
            query.set("_include", field);
        }
        if let Some(n) = limit {
            query.set("_count", &n.to_string());
        }
        query.finalize();
        debug!("search query: {:?}", query.params);
        Ok(query)
    }

    fn set(&mut self, key: &str, value: &str) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.params.push((key.to_string(), value.to_string())),
        }
    }

    fn finalize(&mut self) {
        if SUMMARY_ONLY {
            self.set("_summary", "true");
        }
        self.set("_count", &PAGE_CAP.to_string());
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// Attach the parameters to a resource URL.
    pub(crate) fn apply(&self, url: &mut Url) {
        url.query_pairs_mut().extend_pairs(self.params.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pairs(query: &SearchQuery) -> Vec<(&str, &str)> {
        query
            .params()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn filters_become_exact_matches_with_the_fixed_tail() {
        let options = ParsedOptions::parse("family=Park,gender=male");
        let query = SearchQuery::from_options(&options).expect("valid");
        assert_eq!(
            pairs(&query),
            vec![
                ("family:exact", "Park"),
                ("gender:exact", "male"),
                ("_summary", "true"),
                ("_count", "5"),
            ]
        );
    }

    #[test]
    fn protocol_keys_map_to_underscore_parameters() {
        let options = ParsedOptions::parse("orderby=family,include=Patient:organization");
        let query = SearchQuery::from_options(&options).expect("valid");
        assert_eq!(
            pairs(&query),
            vec![
                ("_sort", "family"),
                ("_include", "Patient:organization"),
                ("_summary", "true"),
                ("_count", "5"),
            ]
        );
    }

    #[test]
    fn the_page_cap_overrides_a_requested_limit() {
        let options = ParsedOptions::parse("limit=50");
        let query = SearchQuery::from_options(&options).expect("valid");
        assert_eq!(pairs(&query), vec![("_count", "5"), ("_summary", "true")]);
    }

    #[test]
    fn a_non_numeric_limit_is_rejected() {
        let options = ParsedOptions::parse("limit=lots");
        let err = SearchQuery::from_options(&options).expect_err("bad limit");
        assert!(matches!(err, FhirError::InvalidFilters(ref e) if e == &["limit=lots".to_string()]));
    }

    #[test]
    fn malformed_options_reject_the_whole_set() {
        let options = ParsedOptions::parse("family=Park,oops,also bad");
        let err = SearchQuery::from_options(&options).expect_err("malformed");
        match err {
            FhirError::InvalidFilters(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn explicit_arguments_win_over_option_spellings() {
        let options = ParsedOptions::parse("orderby=family");
        let query = SearchQuery::from_parts(&options, Some("birthdate"), Some("Patient:link"), None)
            .expect("valid");
        assert_eq!(
            pairs(&query),
            vec![
                ("_sort", "birthdate"),
                ("_include", "Patient:link"),
                ("_summary", "true"),
                ("_count", "5"),
            ]
        );
    }

    #[test]
    fn empty_options_still_carry_the_fixed_tail() {
        let query = SearchQuery::from_options(&ParsedOptions::default()).expect("valid");
        assert_eq!(pairs(&query), vec![("_summary", "true"), ("_count", "5")]);
    }

    #[test]
    fn parameters_apply_to_a_url() {
        let options = ParsedOptions::parse("family=Park");
        let query = SearchQuery::from_options(&options).expect("valid");
        let mut url = Url::parse("https://fhir.example.com/Patient").expect("valid url");
        query.apply(&mut url);
        assert_eq!(
            url.as_str(),
            "https://fhir.example.com/Patient?family%3Aexact=Park&_summary=true&_count=5"
        );
    }
}
