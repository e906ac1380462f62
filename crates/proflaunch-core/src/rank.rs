//! Numeric ordering of email addresses.
//!
//! Every list shown to the user (profiles, favorites, recents, search
//! matches) is ordered by the first run of digits in the email, so
//! `user2@x.com` comes before `user10@x.com`.

use lazy_static::lazy_static;
use regex::Regex;

/// Rank given to emails that contain no digits at all, so they sort last.
pub const NO_NUMBER_RANK: u64 = 999_999;

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Integer value of the first maximal digit run in `email`.
///
/// Returns [`NO_NUMBER_RANK`] when the email has no digits. A run too long
/// for `u64` saturates to `u64::MAX`.
pub fn rank_key(email: &str) -> u64 {
    match DIGIT_RUN.find(email) {
        Some(run) => run.as_str().parse().unwrap_or(u64::MAX),
        None => NO_NUMBER_RANK,
    }
}

/// Stable sort by [`rank_key`], ascending. Equal keys keep their input order.
pub fn sort_by_number(mut emails: Vec<String>) -> Vec<String> {
    emails.sort_by_key(|email| rank_key(email));
    emails
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rank_key_first_digit_run() {
        assert_eq!(rank_key("user10@x.com"), 10);
        assert_eq!(rank_key("a7b22@x.com"), 7);
        assert_eq!(rank_key("007agent@x.com"), 7);
    }

    #[test]
    fn test_rank_key_without_digits() {
        assert_eq!(rank_key("admin@x.com"), NO_NUMBER_RANK);
        assert_eq!(rank_key(""), NO_NUMBER_RANK);
    }

    #[test]
    fn test_rank_key_overflow_saturates() {
        assert_eq!(rank_key("n99999999999999999999999@x.com"), u64::MAX);
    }

    #[test]
    fn test_sort_by_number_is_stable() {
        let sorted = sort_by_number(strings(&["b2@x", "a2@x", "c1@x"]));
        assert_eq!(sorted, strings(&["c1@x", "b2@x", "a2@x"]));
    }

    #[test]
    fn test_numberless_emails_sort_last() {
        let sorted = sort_by_number(strings(&["admin@x.com", "user10@x.com", "user2@x.com"]));
        assert_eq!(
            sorted,
            strings(&["user2@x.com", "user10@x.com", "admin@x.com"])
        );
    }
}
