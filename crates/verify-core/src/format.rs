//! RFC-5322-ish format validation with the length bounds the data model
//! requires. This is intentionally not a full grammar parser — it is the
//! same pragmatic single-regex check most mail-handling code in the wild
//! uses, tightened with explicit length checks the regex alone can't bound
//! well.

use regex::Regex;
use std::sync::LazyLock;

static FORMAT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-z0-9](?:[a-z0-9-]*[a-z0-9])?(?:\.[a-z0-9](?:[a-z0-9-]*[a-z0-9])?)+$").unwrap()
});

/// `true` iff `email` matches the permissive RFC-5322-style local-part
/// grammar, has a domain with at least one dot, and respects the
/// 64/253/254-byte length bounds from the data model.
pub fn is_valid_format(email: &str) -> bool {
    let trimmed = email.trim();
    if trimmed.is_empty() || trimmed.len() > 254 {
        return false;
    }
    let Some(at) = trimmed.rfind('@') else { return false };
    let local = &trimmed[..at];
    let domain = &trimmed[at + 1..];
    if local.is_empty() || local.len() > 64 || domain.is_empty() || domain.len() > 253 {
        return false;
    }
    FORMAT_RE.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_address() {
        assert!(is_valid_format("jane.doe@example.com"));
    }

    #[test]
    fn accepts_plus_and_dot_tagged_local_parts() {
        assert!(is_valid_format("jane+newsletter@example.com"));
        assert!(is_valid_format("j.a.n.e@example.co.uk"));
    }

    #[test]
    fn rejects_missing_at_or_domain_dot() {
        assert!(!is_valid_format("not-an-email"));
        assert!(!is_valid_format("jane@localhost"));
    }

    #[test]
    fn rejects_double_dots_and_empty_labels() {
        assert!(!is_valid_format("jane..doe@example.com"));
        assert!(!is_valid_format("jane@.example.com"));
        assert!(!is_valid_format("jane@example..com"));
    }

    #[test]
    fn rejects_oversized_local_part() {
        let local = "a".repeat(65);
        assert!(!is_valid_format(&format!("{local}@example.com")));
    }

    #[test]
    fn rejects_oversized_total_length() {
        let local = "a".repeat(64);
        let domain = format!("{}.com", "b".repeat(250));
        assert!(!is_valid_format(&format!("{local}@{domain}")));
    }
}
