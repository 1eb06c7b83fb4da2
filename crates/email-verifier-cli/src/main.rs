use clap::Parser;
use email_verifier::verify_emails;
use tabout::{Alignment, Column};
use verify_types::{SmtpStatus, VerificationResult, VerifyOptions};

/// Checks whether mail sent to one or more addresses is likely to be
/// accepted, without actually sending anything.
#[derive(Debug, Parser)]
#[command(name = "email-verifier", about, version, disable_version_flag = true)]
struct Opt {
    /// Print version information and exit.
    #[arg(short = 'v', long = "version", action = clap::ArgAction::Version)]
    version: Option<bool>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Parser)]
enum Command {
    /// Verify one or more email addresses.
    Check(CheckCommand),
}

#[derive(Debug, Parser)]
struct CheckCommand {
    /// Addresses to verify.
    #[arg(required = true)]
    emails: Vec<String>,

    /// Emit the raw result object(s) as JSON instead of a table.
    #[arg(short = 'j', long)]
    json: bool,

    /// Skip the SMTP RCPT-TO probe; relies on syntax and DNS alone.
    #[arg(long)]
    no_smtp: bool,

    /// Skip the catch-all disambiguation probe.
    #[arg(long)]
    no_catchall: bool,

    /// Per-operation timeout, in milliseconds, applied to both DNS and SMTP.
    #[arg(short = 't', long)]
    timeout: Option<u64>,
}

impl CheckCommand {
    fn options(&self) -> VerifyOptions {
        let mut options = VerifyOptions {
            smtp_check: !self.no_smtp,
            catchall_check: !self.no_catchall,
            ..Default::default()
        };
        if let Some(timeout) = self.timeout {
            options.dns_timeout_ms = timeout;
            options.smtp_timeout_ms = timeout;
        }
        options
    }

    async fn run(&self) -> anyhow::Result<bool> {
        let options = self.options();
        let results = verify_emails(&self.emails, &options).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            print_table(&results);
        }

        Ok(results.iter().all(|r| r.valid))
    }
}

fn print_table(results: &[VerificationResult]) {
    let columns = [
        Column { name: "EMAIL".to_string(), alignment: Alignment::Left },
        Column { name: "VALID".to_string(), alignment: Alignment::Left },
        Column { name: "CONFIDENCE".to_string(), alignment: Alignment::Right },
        Column { name: "SAFE".to_string(), alignment: Alignment::Left },
        Column { name: "SMTP".to_string(), alignment: Alignment::Left },
        Column { name: "CATCH-ALL".to_string(), alignment: Alignment::Left },
    ];

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|r| {
            vec![
                r.email.clone(),
                colour_bool(r.valid, r.valid),
                format!("{:.2}", r.confidence),
                colour_bool(r.is_safe_to_send, r.is_safe_to_send),
                r.details.smtp_status.map(smtp_status_label).unwrap_or("-").to_string(),
                match r.details.catch_all {
                    Some(true) => "yes".to_string(),
                    Some(false) => "no".to_string(),
                    None => "-".to_string(),
                },
            ]
        })
        .collect();

    if let Err(err) = tabout::tabulate_output(&columns, &rows, &mut std::io::stdout()) {
        eprintln!("failed to render table: {err}");
    }
}

fn smtp_status_label(status: SmtpStatus) -> &'static str {
    match status {
        SmtpStatus::Accepted => "accepted",
        SmtpStatus::Rejected => "rejected",
        SmtpStatus::Unknown => "unknown",
        SmtpStatus::Skipped => "skipped",
    }
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

fn colour_bool(value: bool, is_good: bool) -> String {
    let colour = if is_good { GREEN } else { RED };
    format!("{colour}{value}{RESET}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let opt = match Opt::try_parse() {
        Ok(opt) => opt,
        Err(err) if err.kind() == clap::error::ErrorKind::DisplayHelp
            || err.kind() == clap::error::ErrorKind::DisplayVersion =>
        {
            err.exit()
        }
        Err(err) => {
            eprint!("{err}");
            std::process::exit(1);
        }
    };
    let Command::Check(cmd) = opt.cmd;
    let all_valid = cmd.run().await?;

    if !all_valid {
        std::process::exit(1);
    }
    Ok(())
}
