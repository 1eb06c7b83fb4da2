//! Shared data model for the email verification pipeline.
//!
//! Every other crate in the workspace depends on this one for the types
//! that cross component boundaries: the normalized `EmailAddress`, DNS and
//! SMTP result shapes, the catch-all signal bundle, and the final
//! `VerificationResult` returned to callers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized email address, decomposed into its local and domain parts.
///
/// Construction enforces the structural invariants from the data model:
/// `local` is 1-64 bytes with no leading, trailing, or consecutive dots;
/// `domain` is 1-253 bytes; the total is at most 254 bytes. This is
/// deliberately narrower than full RFC 5322 syntax checking (that lives in
/// `verify-core::format`) — it only guards the shape the rest of the
/// pipeline relies on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress {
    local: String,
    domain: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmailAddressError {
    Empty,
    LocalTooLong,
    DomainTooLong,
    TotalTooLong,
    LeadingOrTrailingDot,
    ConsecutiveDots,
    MissingAt,
}

impl fmt::Display for EmailAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Empty => "address is empty",
            Self::LocalTooLong => "local part exceeds 64 characters",
            Self::DomainTooLong => "domain exceeds 253 characters",
            Self::TotalTooLong => "address exceeds 254 characters",
            Self::LeadingOrTrailingDot => "local part has a leading or trailing dot",
            Self::ConsecutiveDots => "local part has consecutive dots",
            Self::MissingAt => "address has no '@'",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for EmailAddressError {}

impl EmailAddress {
    /// Normalizes (trim + lower-case) and decomposes `raw`, enforcing the
    /// length and dot invariants. This does not check RFC 5322 grammar;
    /// callers that need full syntax validation should run
    /// `verify-core::format::is_valid_format` first.
    pub fn parse(raw: &str) -> Result<Self, EmailAddressError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(EmailAddressError::Empty);
        }

        let at = normalized.rfind('@').ok_or(EmailAddressError::MissingAt)?;
        let local = &normalized[..at];
        let domain = &normalized[at + 1..];

        if local.is_empty() || local.len() > 64 {
            return Err(EmailAddressError::LocalTooLong);
        }
        if domain.is_empty() || domain.len() > 253 {
            return Err(EmailAddressError::DomainTooLong);
        }
        if normalized.len() > 254 {
            return Err(EmailAddressError::TotalTooLong);
        }
        if local.starts_with('.') || local.ends_with('.') {
            return Err(EmailAddressError::LeadingOrTrailingDot);
        }
        if local.contains("..") {
            return Err(EmailAddressError::ConsecutiveDots);
        }

        Ok(Self {
            local: local.to_string(),
            domain: domain.to_string(),
        })
    }

    pub fn local(&self) -> &str {
        &self.local
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The synthetic catch-all probe address: `x9x0<local>@<domain>`.
    pub fn catchall_probe(&self) -> String {
        format!("x9x0{}@{}", self.local, self.domain)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

/// Lower-cases and trims a string for use as a TTL-cache key.
pub fn email_cache_key(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Lower-cases and trims a domain for use as a TTL-cache key.
pub fn domain_cache_key(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// A DNS MX record: exchange hostname plus priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MxRecord {
    pub exchange: String,
    pub priority: u16,
}

/// The outcome of resolving a domain's mail exchangers, including the RFC
/// 5321 implicit-MX fallback to the domain's own A record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DnsResult {
    pub mx_records: Vec<MxRecord>,
    pub has_valid_dns: bool,
}

/// Outcome of an SMTP RCPT-TO probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpStatus {
    Accepted,
    Rejected,
    Unknown,
    Skipped,
}

impl fmt::Display for SmtpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Unknown => "unknown",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Per-stage timing for a single SMTP probe, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SmtpTiming {
    pub connect: u64,
    pub banner: u64,
    pub ehlo: u64,
    pub mail_from: u64,
    pub rcpt_to: u64,
    pub total: u64,
}

/// The result of a single one-shot RCPT-TO probe against one MX host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmtpResult {
    pub status: SmtpStatus,
    pub response_code: Option<u16>,
    pub response_message: Option<String>,
    pub timing: Option<SmtpTiming>,
}

impl SmtpResult {
    pub fn skipped() -> Self {
        Self {
            status: SmtpStatus::Skipped,
            response_code: None,
            response_message: None,
            timing: None,
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            status: SmtpStatus::Unknown,
            response_code: None,
            response_message: Some(message.into()),
            timing: None,
        }
    }
}

/// Aggregated timing over several probes against the same recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingStats {
    pub result: SmtpResult,
    pub timings: Vec<SmtpTiming>,
    pub avg_rcpt_to_time: u64,
    pub min_rcpt_to_time: u64,
    pub max_rcpt_to_time: u64,
}

/// A recognized mailbox provider, detected from an MX hostname substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailProvider {
    pub name: String,
    pub matched_substring: String,
}

/// Signals fed into / produced by the catch-all analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CatchAllSignals {
    pub pattern_match: f64,
    pub pattern_name: Option<String>,
    pub name_score: f64,
    pub timing_score: f64,
    pub z_score: Option<f64>,
    pub has_spf: bool,
    pub has_dmarc: bool,
    pub mx_count: usize,
    pub timing_analysis: Option<String>,
}

/// The nine independent verification checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VerificationChecks {
    pub is_valid_syntax: bool,
    pub is_valid_domain: bool,
    pub can_connect_smtp: bool,
    pub is_deliverable: bool,
    pub is_catch_all_domain: bool,
    pub is_disposable_email: bool,
    pub is_role_based_account: bool,
    pub is_free_email_provider: bool,
    pub is_unknown: bool,
}

/// The narrative and machine-readable detail behind a `VerificationResult`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VerificationDetails {
    pub format_valid: bool,
    pub mx_records: Vec<MxRecord>,
    pub smtp_status: Option<SmtpStatus>,
    pub catch_all: Option<bool>,
    pub provider: Option<MailProvider>,
    pub catch_all_signals: Option<CatchAllSignals>,
    pub confidence_reasons: Vec<String>,
}

/// The final result of verifying a single email address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub email: String,
    pub valid: bool,
    pub confidence: f64,
    pub is_safe_to_send: bool,
    pub checks: VerificationChecks,
    pub details: VerificationDetails,
}

/// Options accepted by `verify_email` / `verify_emails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyOptions {
    pub dns_timeout_ms: u64,
    pub smtp_timeout_ms: u64,
    pub smtp_check: bool,
    pub catchall_check: bool,
    pub sender_email: String,
    pub smtp_port: u16,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            dns_timeout_ms: 5_000,
            smtp_timeout_ms: 10_000,
            smtp_check: true,
            catchall_check: true,
            sender_email: "test@example.com".to_string(),
            smtp_port: 25,
        }
    }
}
