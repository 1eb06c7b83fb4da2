//! String-level extract/normalize helpers, exposed as their own utility
//! re-exports alongside `verify_email`/`verify_emails`.

/// Lower-cases and trims, the normalization every cache key and table
/// lookup in this crate is built on.
pub fn fold(s: &str) -> String {
    s.trim().to_lowercase()
}

/// The substring after the last `@`, or `""` if there is none.
pub fn extract_domain(email: &str) -> String {
    let folded = fold(email);
    folded.rfind('@').map(|at| folded[at + 1..].to_string()).unwrap_or_default()
}

/// The substring before the last `@`, or the whole (folded) string if there
/// is no `@`.
pub fn extract_local_part(email: &str) -> String {
    let folded = fold(email);
    match folded.rfind('@') {
        Some(at) => folded[..at].to_string(),
        None => folded,
    }
}

/// Strips the `._-` separators a local part is commonly decorated with, for
/// matching against the role-based prefix table (`no-reply`, `no_reply`,
/// `noreply` all become `noreply`).
pub fn strip_separators(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '.' | '_' | '-')).collect()
}
