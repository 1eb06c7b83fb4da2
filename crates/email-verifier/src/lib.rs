//! The verification pipeline: cache short-circuit, static detections,
//! syntax check, DNS lookup, the SMTP RCPT-TO gate, catch-all
//! disambiguation, and confidence synthesis.
//!
//! Grounded on the teacher's top-level crates that wire subsystems
//! together (`kumod`'s queue/delivery orchestration style): an `Engine`
//! bundles the caches, throttle, resolver and prober behind trait objects,
//! and a `LazyLock` default instance backs the free-function façade that
//! mirrors the module's external interface.

mod engine;

pub use engine::Engine;

use dns_check::{HickoryLookup, Lookup};
use smtp_probe::{Prober, TcpProber};
use std::sync::LazyLock;
use verify_types::{VerificationResult, VerifyOptions};

fn default_lookup() -> Box<dyn Lookup> {
    match HickoryLookup::new() {
        Ok(lookup) => Box::new(lookup),
        Err(err) => {
            tracing::error!(error = %err, "failed to build default DNS resolver");
            Box::new(dns_check::FakeLookup::new())
        }
    }
}

fn default_prober() -> Box<dyn Prober> {
    Box::new(TcpProber)
}

static DEFAULT_ENGINE: LazyLock<Engine> = LazyLock::new(|| Engine::new(default_lookup(), default_prober()));

/// Verifies a single address against the default, process-wide engine.
pub async fn verify_email(email: &str, options: &VerifyOptions) -> VerificationResult {
    DEFAULT_ENGINE.verify_email(email, options).await
}

/// Verifies a batch of addresses sequentially (so throttling is honoured
/// naturally), against the default, process-wide engine.
pub async fn verify_emails(emails: &[String], options: &VerifyOptions) -> Vec<VerificationResult> {
    DEFAULT_ENGINE.verify_emails(emails, options).await
}

/// Clears both the email and domain TTL caches on the default engine.
pub fn clear_caches() {
    DEFAULT_ENGINE.clear_caches();
}

/// Clears all per-host throttle state on the default engine.
pub fn clear_throttle() {
    DEFAULT_ENGINE.clear_throttle();
}

pub use dns_check::{check_dns, get_primary_mx};
pub use smtp_probe::{probe_with_fallback, probe_with_timing_stats, smtp_probe};
pub use verify_core::{
    detect_provider, extract_domain, extract_local_part, is_disposable_domain, is_disposable_email,
    is_free_domain, is_free_email, is_role_based_email, is_role_based_local_part, is_valid_format,
};
