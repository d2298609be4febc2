//! check_warranty - monitoring plugin for hardware support contracts.
//!
//! Prints one status line (plus optional detail) and exits with the
//! standard plugin codes: 0 OK, 1 WARNING, 2 CRITICAL, 3 UNKNOWN.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use warranty_core::{ThresholdConfig, Verdict, VerdictFormatter};
use warranty_probe::config::{DEFAULT_ENDPOINT, DEFAULT_SUPPORT_URL};
use warranty_probe::{
    AssetTarget, CheckReport, FileEntitlementSource, ProbeConfig, ProbeError, WarrantyProbe,
};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Report support contract expiry for a Dell server.
///
/// Give either a service tag, or a hostname whose service tag is read
/// over SNMP. Entitlements are fetched from the vendor API (or a local
/// JSON file) and every distinct service level is compared against the
/// warning and critical day thresholds.
#[derive(Parser, Debug)]
#[command(name = "check_warranty")]
#[command(version = VERSION)]
#[command(about = "Hardware support contract check")]
struct Cli {
    /// Hostname to look up the service tag for (via SNMP)
    #[arg(short = 'H', long)]
    hostname: Option<String>,

    /// Service tag to check (takes precedence over --hostname)
    #[arg(short = 's', long = "servicetag")]
    service_tag: Option<String>,

    /// SNMP community used for the service tag lookup
    #[arg(short = 'C', long, default_value = "public")]
    community: String,

    /// SNMP agent port
    #[arg(long, default_value_t = 161)]
    snmp_port: u16,

    /// Warning threshold in days remaining
    #[arg(short, long, default_value_t = 90, allow_negative_numbers = true)]
    warning: i64,

    /// Critical threshold in days remaining
    #[arg(short, long, default_value_t = 30, allow_negative_numbers = true)]
    critical: i64,

    /// Only consider the service level that ends last
    #[arg(short = 'D', long)]
    distant: bool,

    /// List every service level after the summary
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    debug: bool,

    /// Entitlement fetch timeout in seconds
    #[arg(short, long, default_value_t = 5)]
    timeout: u64,

    /// Entitlement API base URL
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Entitlement API bearer token
    #[arg(long, env = "WARRANTY_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Read entitlements from a JSON file instead of the API
    #[arg(long)]
    entitlements_file: Option<PathBuf>,

    /// Append an HTML link to the vendor support page
    #[arg(long)]
    link: bool,

    /// Support page prefix used by --link; the service tag is appended
    #[arg(long, default_value = DEFAULT_SUPPORT_URL)]
    support_url: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn config(&self) -> ProbeConfig {
        ProbeConfig {
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            timeout: Duration::from_secs(self.timeout),
            snmp_community: self.community.clone(),
            snmp_port: self.snmp_port,
            thresholds: ThresholdConfig {
                warn_days: self.warning,
                crit_days: self.critical,
            },
            distant_only: self.distant,
            support_url: self.support_url.clone(),
            ..ProbeConfig::default()
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.format == OutputFormat::Json {
        tracing::Level::ERROR
    } else if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    // stdout belongs to the plugin output
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_probe(cli: &Cli, config: ProbeConfig) -> Result<WarrantyProbe, ProbeError> {
    match &cli.entitlements_file {
        Some(path) => {
            let resolver = WarrantyProbe::snmp_resolver(&config);
            Ok(WarrantyProbe::new(
                config,
                Box::new(FileEntitlementSource::new(path)),
                Box::new(resolver),
            ))
        },
        None => WarrantyProbe::from_config(config),
    }
}

async fn run(cli: &Cli, config: ProbeConfig) -> CheckReport {
    let unknown = |e: ProbeError| CheckReport {
        asset_id: None,
        verdict: e.to_verdict(),
    };

    let target = match AssetTarget::from_options(cli.service_tag.clone(), cli.hostname.clone()) {
        Ok(t) => t,
        Err(e) => return unknown(e),
    };

    match build_probe(cli, config) {
        Ok(probe) => probe.run(&target, chrono::Utc::now()).await,
        Err(e) => unknown(e),
    }
}

/// Print the report and return the exit status.
fn print_report(cli: &Cli, config: &ProbeConfig, report: &CheckReport) -> u8 {
    if cli.format == OutputFormat::Json {
        return match serde_json::to_string(report) {
            Ok(line) => {
                println!("{}", line);
                report.verdict.exit_code()
            },
            Err(e) => {
                let verdict = Verdict::unknown(format!("cannot encode output: {}", e));
                println!("{}", VerdictFormatter::default().summary(&verdict));
                verdict.exit_code()
            },
        };
    }

    let mut formatter = VerdictFormatter::new(cli.verbose || cli.debug);
    if cli.link {
        if let Some(asset) = &report.asset_id {
            formatter = formatter.with_support_link(&config.support_url, asset.as_str());
        }
    }
    for line in formatter.render(&report.verdict) {
        println!("{}", line);
    }
    report.verdict.exit_code()
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    tracing::debug!(
        service_tag = ?cli.service_tag,
        hostname = ?cli.hostname,
        warning = cli.warning,
        critical = cli.critical,
        distant = cli.distant,
        "Starting check"
    );

    let config = cli.config();
    let report = run(&cli, config.clone()).await;
    ExitCode::from(print_report(&cli, &config, &report))
}
