//! Profile search.
//!
//! The mode is chosen from the shape of the query: an explicit regex flag,
//! otherwise an `@` selects email-substring matching, otherwise the digits of
//! the query are matched as literal substrings.

use crate::rank::sort_by_number;
use crate::{Error, Result};
use regex::Regex;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Regex,
    EmailSubstring,
    Numeric,
}

impl SearchMode {
    /// Pick the mode for a query
    pub fn select(query: &str, regex: bool) -> Self {
        if regex {
            SearchMode::Regex
        } else if query.contains('@') {
            SearchMode::EmailSubstring
        } else {
            SearchMode::Numeric
        }
    }
}

/// Result of a search: either matches ordered by number, or a status line
/// explaining why nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Matches(Vec<String>),
    NoMatch(String),
}

impl SearchOutcome {
    pub fn matches(&self) -> &[String] {
        match self {
            SearchOutcome::Matches(matches) => matches,
            SearchOutcome::NoMatch(_) => &[],
        }
    }
}

/// Search `emails` for `query`.
///
/// Fails only with [`Error::InvalidPattern`] when regex mode is requested and
/// the query does not compile.
pub fn search(query: &str, emails: &[String], regex: bool) -> Result<SearchOutcome> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchOutcome::NoMatch(
            "Enter a number or email first.".to_string(),
        ));
    }

    let mode = SearchMode::select(query, regex);
    tracing::debug!("Searching {} profiles for {:?} ({:?})", emails.len(), query, mode);

    match mode {
        SearchMode::Regex => search_regex(query, emails),
        SearchMode::EmailSubstring => Ok(search_email(query, emails)),
        SearchMode::Numeric => Ok(search_numeric(query, emails)),
    }
}

fn search_regex(query: &str, emails: &[String]) -> Result<SearchOutcome> {
    let pattern = Regex::new(query).map_err(|_| Error::InvalidPattern(query.to_string()))?;

    let matches: Vec<String> = emails
        .iter()
        .filter(|email| pattern.is_match(email))
        .cloned()
        .collect();

    if matches.is_empty() {
        return Ok(SearchOutcome::NoMatch("No match (regex).".to_string()));
    }
    Ok(SearchOutcome::Matches(sort_by_number(matches)))
}

fn search_email(query: &str, emails: &[String]) -> SearchOutcome {
    if emails.iter().any(|email| email == query) {
        return SearchOutcome::Matches(vec![query.to_string()]);
    }

    let needle = query.to_lowercase();
    let matches: Vec<String> = emails
        .iter()
        .filter(|email| email.to_lowercase().contains(&needle))
        .cloned()
        .collect();

    if matches.is_empty() {
        return SearchOutcome::NoMatch("No emails contain that text.".to_string());
    }
    SearchOutcome::Matches(sort_by_number(matches))
}

fn search_numeric(query: &str, emails: &[String]) -> SearchOutcome {
    let (digits, normalized) = normalize_digits(query);
    if digits.is_empty() {
        return SearchOutcome::NoMatch("No digits found in input.".to_string());
    }

    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for email in emails {
        let hit = email.contains(&digits) || email.contains(&normalized);
        if hit && seen.insert(email.as_str()) {
            matches.push(email.clone());
        }
    }

    if matches.is_empty() {
        return SearchOutcome::NoMatch(format!(
            "No emails contain: {} (or {})",
            digits, normalized
        ));
    }
    SearchOutcome::Matches(sort_by_number(matches))
}

/// Digits of `input` in order, plus the same digits without leading zeros
/// (`"0"` when nothing is left).
pub fn normalize_digits(input: &str) -> (String, String) {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return (String::new(), String::new());
    }

    let normalized = match digits.trim_start_matches('0') {
        "" => "0".to_string(),
        rest => rest.to_string(),
    };
    (digits, normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emails() -> Vec<String> {
        ["user7@x.com", "user07@x.com", "admin@x.com", "User12@Example.com"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_mode_selection() {
        assert_eq!(SearchMode::select("user.*", true), SearchMode::Regex);
        assert_eq!(SearchMode::select("a@b", true), SearchMode::Regex);
        assert_eq!(SearchMode::select("a@b", false), SearchMode::EmailSubstring);
        assert_eq!(SearchMode::select("12", false), SearchMode::Numeric);
    }

    #[test]
    fn test_numeric_matches_digits_and_normalized() {
        let outcome = search("07", &emails(), false).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::Matches(vec!["user7@x.com".to_string(), "user07@x.com".to_string()])
        );
    }

    #[test]
    fn test_numeric_ignores_non_digits() {
        let outcome = search("no. 12", &emails(), false).unwrap();
        assert_eq!(outcome.matches(), ["User12@Example.com".to_string()]);
    }

    #[test]
    fn test_numeric_without_digits_is_status() {
        let outcome = search("abc", &emails(), false).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NoMatch("No digits found in input.".to_string())
        );
    }

    #[test]
    fn test_numeric_no_match_status_names_both_forms() {
        let outcome = search("0099", &emails(), false).unwrap();
        assert_eq!(
            outcome,
            SearchOutcome::NoMatch("No emails contain: 0099 (or 99)".to_string())
        );
    }

    #[test]
    fn test_exact_email_short_circuits() {
        let list = vec!["a1@x.com".to_string(), "a1@x.com.au".to_string()];
        let outcome = search("a1@x.com", &list, false).unwrap();
        assert_eq!(outcome.matches(), ["a1@x.com".to_string()]);
    }

    #[test]
    fn test_email_substring_is_case_insensitive() {
        let outcome = search("@EXAMPLE", &emails(), false).unwrap();
        assert_eq!(outcome.matches(), ["User12@Example.com".to_string()]);
    }

    #[test]
    fn test_regex_mode_sorted_by_number() {
        let outcome = search(r"^user\d+@", &emails(), true).unwrap();
        assert_eq!(
            outcome.matches(),
            ["user7@x.com".to_string(), "user07@x.com".to_string()]
        );
    }

    #[test]
    fn test_invalid_regex_is_error() {
        let result = search("user(", &emails(), true);
        assert!(matches!(result, Err(Error::InvalidPattern(_))));
    }

    #[test]
    fn test_empty_query() {
        let outcome = search("   ", &emails(), false).unwrap();
        assert!(matches!(outcome, SearchOutcome::NoMatch(_)));
    }

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("07"), ("07".to_string(), "7".to_string()));
        assert_eq!(normalize_digits("000"), ("000".to_string(), "0".to_string()));
        assert_eq!(normalize_digits("x"), (String::new(), String::new()));
    }
}
