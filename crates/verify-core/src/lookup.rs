//! Boolean/record lookups against the bundled static tables.

use crate::normalize::{extract_domain, extract_local_part, fold, strip_separators};
use crate::tables::{DISPOSABLE_DOMAINS, FREE_PROVIDERS, PROVIDER_SUBSTRINGS, ROLE_BASED_PREFIXES};
use verify_types::{MailProvider, MxRecord};

pub fn is_disposable_domain(domain: &str) -> bool {
    let folded = fold(domain);
    DISPOSABLE_DOMAINS.contains(&folded.as_str())
}

pub fn is_disposable_email(email: &str) -> bool {
    is_disposable_domain(&extract_domain(email))
}

pub fn is_free_domain(domain: &str) -> bool {
    let folded = fold(domain);
    FREE_PROVIDERS.contains(&folded.as_str())
}

pub fn is_free_email(email: &str) -> bool {
    is_free_domain(&extract_domain(email))
}

pub fn is_role_based_local_part(local: &str) -> bool {
    let key = strip_separators(&fold(local));
    ROLE_BASED_PREFIXES.iter().any(|prefix| key == strip_separators(prefix))
}

pub fn is_role_based_email(email: &str) -> bool {
    is_role_based_local_part(&extract_local_part(email))
}

/// First MX hostname matching a known provider substring wins — the table
/// is ordered so more specific substrings are checked before the broader
/// ones they'd otherwise be shadowed by.
pub fn detect_provider(mx_records: &[MxRecord]) -> Option<MailProvider> {
    for record in mx_records {
        let exchange = fold(&record.exchange);
        for (substring, name) in PROVIDER_SUBSTRINGS {
            if exchange.contains(substring) {
                return Some(MailProvider {
                    name: name.to_string(),
                    matched_substring: substring.to_string(),
                });
            }
        }
    }
    None
}
