use catchall_analyzer::{build_signals, catchall_confidence};
use dns_check::{check_dmarc, check_dns, check_spf, get_primary_mx, Lookup};
use host_throttle::HostThrottle;
use smtp_probe::{probe_with_timing_stats, Prober};
use std::time::Duration;
use ttl_cache::TtlCache;
use verify_core::{
    detect_provider, extract_domain, extract_local_part, is_disposable_email, is_free_email,
    is_role_based_email, is_valid_format,
};
use verify_types::{
    domain_cache_key, email_cache_key, DnsResult, MxRecord, SmtpStatus, VerificationChecks,
    VerificationDetails, VerificationResult, VerifyOptions,
};

/// Bundles the two caches, the throttle, and the DNS/SMTP collaborators a
/// verification run depends on. One `Engine` is process-wide by default
/// (see the crate root's `DEFAULT_ENGINE`), but nothing stops a caller from
/// constructing its own for isolated tests.
pub struct Engine {
    email_cache: TtlCache<String, VerificationResult>,
    domain_cache: TtlCache<String, DnsResult>,
    throttle: HostThrottle,
    lookup: Box<dyn Lookup>,
    prober: Box<dyn Prober>,
}

impl Engine {
    pub fn new(lookup: Box<dyn Lookup>, prober: Box<dyn Prober>) -> Self {
        Self {
            email_cache: TtlCache::new("email"),
            domain_cache: TtlCache::new("domain"),
            throttle: HostThrottle::default(),
            lookup,
            prober,
        }
    }

    pub fn clear_caches(&self) {
        self.email_cache.clear();
        self.domain_cache.clear();
    }

    pub fn clear_throttle(&self) {
        self.throttle.clear();
    }

    pub async fn verify_emails(&self, emails: &[String], options: &VerifyOptions) -> Vec<VerificationResult> {
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            results.push(self.verify_email(email, options).await);
        }
        results
    }

    pub async fn verify_email(&self, email: &str, options: &VerifyOptions) -> VerificationResult {
        let cache_key = email_cache_key(email);
        if let Some(cached) = self.email_cache.get(&cache_key) {
            return cached;
        }

        let is_disposable = is_disposable_email(email);
        let is_role_based = is_role_based_email(email);
        let is_free = is_free_email(email);

        if !is_valid_format(email) {
            return skipped_result(email, is_disposable, is_role_based, is_free, false, Vec::new());
        }

        let domain = extract_domain(email);
        let dns_result = self.resolve_domain(&domain, Duration::from_millis(options.dns_timeout_ms)).await;

        if !dns_result.has_valid_dns {
            let result = invalid_domain_result(email, is_disposable, is_role_based, is_free);
            self.email_cache.set(cache_key, result.clone(), None);
            return result;
        }

        let provider = detect_provider(&dns_result.mx_records);
        let mut checks = VerificationChecks {
            is_valid_syntax: true,
            is_valid_domain: true,
            is_disposable_email: is_disposable,
            is_role_based_account: is_role_based,
            is_free_email_provider: is_free,
            ..Default::default()
        };
        let mut reasons = vec!["syntax is valid".to_string(), "domain has valid MX/A records".to_string()];

        if !options.smtp_check || dns_result.mx_records.is_empty() {
            reasons.push("SMTP check skipped by configuration or no MX hosts".to_string());
            checks.is_unknown = true;
            let result = VerificationResult {
                email: email.to_string(),
                valid: true,
                confidence: 0.70,
                is_safe_to_send: false,
                checks,
                details: VerificationDetails {
                    format_valid: true,
                    mx_records: dns_result.mx_records,
                    smtp_status: Some(SmtpStatus::Skipped),
                    catch_all: None,
                    provider,
                    catch_all_signals: None,
                    confidence_reasons: reasons,
                },
            };
            return result;
        }

        let primary_host = primary_mx_host(&dns_result);
        if !self.throttle.can_proceed(&primary_host) {
            reasons.push(format!("host {primary_host} is in backoff"));
            checks.is_unknown = true;
            return VerificationResult {
                email: email.to_string(),
                valid: true,
                confidence: 0.5,
                is_safe_to_send: false,
                checks,
                details: VerificationDetails {
                    format_valid: true,
                    mx_records: dns_result.mx_records,
                    smtp_status: Some(SmtpStatus::Unknown),
                    catch_all: None,
                    provider,
                    catch_all_signals: None,
                    confidence_reasons: reasons,
                },
            };
        }
        self.throttle.consume(&primary_host);

        let hosts = mx_hosts(&dns_result, options.smtp_port);
        let smtp_timeout = Duration::from_millis(options.smtp_timeout_ms);
        let real_stats = probe_with_timing_stats(
            self.prober.as_ref(),
            &hosts,
            &options.sender_email,
            email,
            &sender_domain(&options.sender_email),
            smtp_timeout,
        )
        .await;

        match real_stats.result.status {
            SmtpStatus::Unknown => self.throttle.record_failure(&primary_host),
            _ => self.throttle.record_success(&primary_host),
        }

        checks.can_connect_smtp =
            !matches!(real_stats.result.status, SmtpStatus::Unknown | SmtpStatus::Skipped);

        match real_stats.result.status {
            SmtpStatus::Rejected => {
                reasons.push("mailbox rejected at RCPT TO".to_string());
                let result = VerificationResult {
                    email: email.to_string(),
                    valid: false,
                    confidence: 0.0,
                    is_safe_to_send: false,
                    checks,
                    details: VerificationDetails {
                        format_valid: true,
                        mx_records: dns_result.mx_records,
                        smtp_status: Some(SmtpStatus::Rejected),
                        catch_all: None,
                        provider,
                        catch_all_signals: None,
                        confidence_reasons: reasons,
                    },
                };
                self.email_cache.set(cache_key, result.clone(), None);
                return result;
            }
            SmtpStatus::Unknown => {
                reasons.push("SMTP dialog was inconclusive".to_string());
                checks.is_unknown = true;
                return VerificationResult {
                    email: email.to_string(),
                    valid: true,
                    confidence: 0.5,
                    is_safe_to_send: false,
                    checks,
                    details: VerificationDetails {
                        format_valid: true,
                        mx_records: dns_result.mx_records,
                        smtp_status: Some(SmtpStatus::Unknown),
                        catch_all: None,
                        provider,
                        catch_all_signals: None,
                        confidence_reasons: reasons,
                    },
                };
            }
            SmtpStatus::Accepted => {}
            SmtpStatus::Skipped => unreachable!("probe_with_timing_stats never returns Skipped"),
        }

        checks.is_deliverable = true;
        reasons.push("mailbox accepted at RCPT TO".to_string());

        let mut is_catch_all = false;
        let mut catch_all_stats = None;
        if options.catchall_check && !hosts.is_empty() {
            let local = extract_local_part(email);
            let probe_address = format!("x9x0{local}@{domain}");
            let fake_stats = probe_with_timing_stats(
                self.prober.as_ref(),
                &hosts,
                &options.sender_email,
                &probe_address,
                &sender_domain(&options.sender_email),
                smtp_timeout,
            )
            .await;
            is_catch_all = fake_stats.result.status == SmtpStatus::Accepted;
            catch_all_stats = Some(fake_stats);
        }
        checks.is_catch_all_domain = is_catch_all;

        let (has_spf, has_dmarc) = tokio::join!(
            check_spf(self.lookup.as_ref(), &domain, Duration::from_millis(options.dns_timeout_ms)),
            check_dmarc(self.lookup.as_ref(), &domain, Duration::from_millis(options.dns_timeout_ms)),
        );

        let local = extract_local_part(email);
        let (real_avg, fake_avg) = match &catch_all_stats {
            Some(stats) => (real_stats.avg_rcpt_to_time as f64, stats.avg_rcpt_to_time as f64),
            None => (0.0, 0.0),
        };
        let signals = build_signals(&local, real_avg, fake_avg, dns_result.mx_records.len(), has_spf, has_dmarc);

        if has_spf {
            reasons.push("domain publishes SPF".to_string());
        }
        if has_dmarc {
            reasons.push("domain publishes DMARC".to_string());
        }

        let (confidence, is_unknown) = if is_catch_all {
            let band = catchall_analyzer::timing_zscore_band(real_avg, fake_avg);
            let confidence = catchall_confidence(&band, signals.pattern_match, signals.name_score);
            reasons.push(format!("domain is a catch-all: {}", band.reason));
            (confidence, band.confidence <= 0.65)
        } else {
            reasons.push("recipient accepted on a non-catch-all domain".to_string());
            (0.95, false)
        };
        checks.is_unknown = is_unknown;

        let is_safe_to_send = checks.is_valid_syntax
            && checks.is_valid_domain
            && checks.is_deliverable
            && !checks.is_disposable_email
            && !checks.is_role_based_account
            && (!is_catch_all || signals.z_score.is_some_and(|z| z > 2.0));

        let result = VerificationResult {
            email: email.to_string(),
            valid: true,
            confidence,
            is_safe_to_send,
            checks,
            details: VerificationDetails {
                format_valid: true,
                mx_records: dns_result.mx_records,
                smtp_status: Some(SmtpStatus::Accepted),
                catch_all: Some(is_catch_all),
                provider,
                catch_all_signals: Some(signals),
                confidence_reasons: reasons,
            },
        };
        self.email_cache.set(cache_key, result.clone(), None);
        result
    }

    async fn resolve_domain(&self, domain: &str, timeout: Duration) -> DnsResult {
        let key = domain_cache_key(domain);
        if let Some(cached) = self.domain_cache.get(&key) {
            return cached;
        }
        let result = check_dns(self.lookup.as_ref(), domain, timeout).await;
        self.domain_cache.set(key, result.clone(), None);
        result
    }
}

fn skipped_result(
    email: &str,
    is_disposable: bool,
    is_role_based: bool,
    is_free: bool,
    format_valid: bool,
    reasons: Vec<String>,
) -> VerificationResult {
    VerificationResult {
        email: email.to_string(),
        valid: false,
        confidence: 0.0,
        is_safe_to_send: false,
        checks: VerificationChecks {
            is_disposable_email: is_disposable,
            is_role_based_account: is_role_based,
            is_free_email_provider: is_free,
            ..Default::default()
        },
        details: VerificationDetails {
            format_valid,
            mx_records: Vec::new(),
            smtp_status: Some(SmtpStatus::Skipped),
            catch_all: None,
            provider: None,
            catch_all_signals: None,
            confidence_reasons: if reasons.is_empty() {
                vec!["address failed format validation".to_string()]
            } else {
                reasons
            },
        },
    }
}

fn invalid_domain_result(email: &str, is_disposable: bool, is_role_based: bool, is_free: bool) -> VerificationResult {
    VerificationResult {
        email: email.to_string(),
        valid: false,
        confidence: 0.0,
        is_safe_to_send: false,
        checks: VerificationChecks {
            is_valid_syntax: true,
            is_disposable_email: is_disposable,
            is_role_based_account: is_role_based,
            is_free_email_provider: is_free,
            ..Default::default()
        },
        details: VerificationDetails {
            format_valid: true,
            mx_records: Vec::new(),
            smtp_status: Some(SmtpStatus::Skipped),
            catch_all: None,
            provider: None,
            catch_all_signals: None,
            confidence_reasons: vec!["domain has no MX or A records".to_string()],
        },
    }
}

fn primary_mx_host(dns_result: &DnsResult) -> String {
    get_primary_mx(dns_result)
        .map(|mx| mx.exchange.clone())
        .unwrap_or_default()
}

fn mx_hosts(dns_result: &DnsResult, port: u16) -> Vec<(String, u16)> {
    dns_result
        .mx_records
        .iter()
        .map(|mx: &MxRecord| (mx.exchange.clone(), port))
        .collect()
}

fn sender_domain(sender_email: &str) -> String {
    extract_domain(sender_email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dns_check::FakeLookup;
    use smtp_probe::ProbeParams;
    use verify_types::{MxRecord, SmtpResult, SmtpTiming};

    /// A fake prober that accepts the catch-all probe address (recipients
    /// starting with `x9x0`) iff `catch_all` is set, and otherwise accepts
    /// any real recipient, with a fixed RCPT-TO time for each kind of
    /// address so the z-score band is deterministic.
    struct FakeProber {
        catch_all: bool,
        real_rcpt_ms: u64,
        fake_rcpt_ms: u64,
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, params: &ProbeParams<'_>) -> SmtpResult {
            let is_probe_address = params.recipient.starts_with("x9x0");
            let accepted = if is_probe_address { self.catch_all } else { true };
            let rcpt_to = if is_probe_address { self.fake_rcpt_ms } else { self.real_rcpt_ms };
            SmtpResult {
                status: if accepted { SmtpStatus::Accepted } else { SmtpStatus::Rejected },
                response_code: Some(if accepted { 250 } else { 550 }),
                response_message: Some("fake".into()),
                timing: Some(SmtpTiming { rcpt_to, total: rcpt_to, ..Default::default() }),
            }
        }
    }

    fn engine_with(lookup: FakeLookup, prober: FakeProber) -> Engine {
        Engine::new(Box::new(lookup), Box::new(prober))
    }

    fn opts() -> VerifyOptions {
        VerifyOptions::default()
    }

    #[tokio::test]
    async fn invalid_syntax_is_rejected_without_io() {
        let engine = engine_with(
            FakeLookup::new(),
            FakeProber { catch_all: false, real_rcpt_ms: 50, fake_rcpt_ms: 50 },
        );
        let result = engine.verify_email("not-an-email", &opts()).await;
        assert!(!result.valid);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.details.smtp_status, Some(SmtpStatus::Skipped));
    }

    #[tokio::test]
    async fn domain_with_no_dns_is_invalid_and_cached() {
        let engine = engine_with(
            FakeLookup::new(),
            FakeProber { catch_all: false, real_rcpt_ms: 50, fake_rcpt_ms: 50 },
        );
        let result = engine.verify_email("jane@nonexistent.invalid", &opts()).await;
        assert!(!result.valid);
        assert!(engine.email_cache.has(&email_cache_key("jane@nonexistent.invalid")));
    }

    #[tokio::test]
    async fn accepted_non_catch_all_domain_yields_high_confidence() {
        let lookup = FakeLookup::new().with_mx(
            "example.com",
            vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
        );
        let engine = engine_with(lookup, FakeProber { catch_all: false, real_rcpt_ms: 50, fake_rcpt_ms: 50 });
        let result = engine.verify_email("jane.doe@example.com", &opts()).await;
        assert!(result.valid);
        assert_eq!(result.confidence, 0.95);
        assert_eq!(result.details.catch_all, Some(false));
        assert!(result.is_safe_to_send);
    }

    #[tokio::test]
    async fn catch_all_domain_caps_confidence_and_flags_unknown() {
        let lookup = FakeLookup::new().with_mx(
            "example.com",
            vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
        );
        let engine = engine_with(lookup, FakeProber { catch_all: true, real_rcpt_ms: 50, fake_rcpt_ms: 50 });
        let result = engine.verify_email("random123@example.com", &opts()).await;
        assert!(result.valid);
        assert_eq!(result.details.catch_all, Some(true));
        assert!(result.confidence <= 0.85);
        assert!(result.checks.is_unknown);
    }

    struct AlwaysReject;

    #[async_trait]
    impl Prober for AlwaysReject {
        async fn probe(&self, _params: &ProbeParams<'_>) -> SmtpResult {
            SmtpResult {
                status: SmtpStatus::Rejected,
                response_code: Some(550),
                response_message: Some("no such user".into()),
                timing: Some(SmtpTiming::default()),
            }
        }
    }

    #[tokio::test]
    async fn rejected_recipient_is_cached_as_invalid() {
        let lookup = FakeLookup::new().with_mx(
            "example.com",
            vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
        );
        let engine = Engine::new(Box::new(lookup), Box::new(AlwaysReject));
        let result = engine.verify_email("nobody@example.com", &opts()).await;
        assert!(!result.valid);
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn smtp_check_disabled_yields_skipped_status() {
        let lookup = FakeLookup::new().with_mx(
            "example.com",
            vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
        );
        let engine = engine_with(lookup, FakeProber { catch_all: false, real_rcpt_ms: 50, fake_rcpt_ms: 50 });
        let mut options = opts();
        options.smtp_check = false;
        let result = engine.verify_email("jane@example.com", &options).await;
        assert_eq!(result.details.smtp_status, Some(SmtpStatus::Skipped));
        assert_eq!(result.confidence, 0.70);
        assert!(result.checks.is_unknown);
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_repeat_lookups() {
        let lookup = FakeLookup::new().with_mx(
            "example.com",
            vec![MxRecord { exchange: "mx.example.com".into(), priority: 10 }],
        );
        let engine = engine_with(lookup, FakeProber { catch_all: false, real_rcpt_ms: 50, fake_rcpt_ms: 50 });
        let first = engine.verify_email("jane.doe@example.com", &opts()).await;
        let second = engine.verify_email("jane.doe@example.com", &opts()).await;
        assert_eq!(first.confidence, second.confidence);
        assert_eq!(first.valid, second.valid);
    }
}
