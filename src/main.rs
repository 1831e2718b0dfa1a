mod errors;
mod librespeed;
mod report;
mod results;
mod scoring;
mod state;
mod thresholds;

use crate::errors::PluginError;
use crate::librespeed::client::{default_binary, Client};
use crate::librespeed::requests::{list::ListServers, measure::Measure};
use crate::report::{Output, Report, SpeedUnit};
use crate::state::ServiceState;
use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use clap_verbosity_flag::Verbosity;
use log::{debug, info, log_enabled, warn, Level};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Nagios/Icinga2 plugin that checks the internet speed with
/// librespeed-cli. Speed tests are run over HTTPS.
#[derive(Parser, Debug)]
#[command(
    version,
    long_version = env!("CHECK_LIBRESPEED_LONG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Warning thresholds, zero disables the check for a type
    #[arg(
        short,
        long,
        value_name = "<download>;<upload>;<ping>;<jitter>",
        default_value = thresholds::DEFAULT_WARNING,
        allow_hyphen_values = true
    )]
    warning: String,

    /// Critical thresholds, zero disables the check for a type
    #[arg(
        short,
        long,
        value_name = "<download>;<upload>;<ping>;<jitter>",
        default_value = thresholds::DEFAULT_CRITICAL,
        allow_hyphen_values = true
    )]
    critical: String,

    /// Append performance data to the output
    #[arg(long)]
    perfdata: bool,

    /// Server to test against, as numbered by --list [default: random]
    #[arg(short, long, value_name = "INTEGER")]
    server: Option<u32>,

    /// List the available speed test servers and exit
    #[arg(short, long)]
    list: bool,

    /// Use 1024 bytes as 1 kilobyte instead of 1000
    #[arg(long)]
    mebibytes: bool,

    /// Path to librespeed-cli [default: Librespeed-cli/librespeed-cli next
    /// to this plugin]
    #[arg(short, long, env = "CHECK_LIBRESPEED_BINARY", value_name = "PATH")]
    binary: Option<PathBuf>,

    /// Give up on the speed test after this many seconds
    #[arg(
        short,
        long,
        value_name = "SECONDS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout: Option<u64>,

    #[command(flatten)]
    verbose: Verbosity,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let output = match Cli::try_parse() {
        Ok(cli) => {
            init_logging(&cli);
            run(&cli).await.unwrap_or_else(|error| {
                debug!("Check failed: {:?}", error);
                Output::Report(Report::from_error(&error))
            })
        }
        Err(error)
            if matches!(
                error.kind(),
                ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion
            ) =>
        {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        Err(error) => Output::Report(Report::from_error(&usage_error(&error))),
    };

    println!("{}", output);

    ExitCode::from(output.exit_code())
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// Turn a clap error into a one line usage error.
fn usage_error(error: &clap::Error) -> PluginError {
    let rendered = error.to_string();
    let first_line = rendered.lines().next().unwrap_or_default();
    let message = first_line.strip_prefix("error: ").unwrap_or(first_line);

    PluginError::usage(message)
}

async fn run(cli: &Cli) -> Result<Output, PluginError> {
    let binary = cli.binary.clone().unwrap_or_else(default_binary);
    let client = Client::new(binary)
        .with_timeout(cli.timeout.map(Duration::from_secs));

    if cli.list {
        info!("Listing servers with {}", client.binary().display());
        let listing = client.send(ListServers).await?;
        return Ok(Output::Listing(listing));
    }

    let (warning, critical) =
        thresholds::parse_and_validate(&cli.warning, &cli.critical)?;

    info!("Running speed test with {}", client.binary().display());
    let request = Measure { server: cli.server, mebibytes: cli.mebibytes };
    let measurement = client.send(request).await?.into_record()?;
    info!(
        "Download: {:.2}, upload: {:.2}, ping: {:.2} ms, jitter: {:.2} ms",
        measurement.download,
        measurement.upload,
        measurement.ping,
        measurement.jitter
    );

    if log_enabled!(Level::Debug) {
        let evaluation = scoring::evaluate(&measurement, &warning, &critical);
        debug!(
            "Warning band: {:?}, past critical: {:?}, not clearing warning: {:?}",
            evaluation.warning, evaluation.critical, evaluation.not_ok
        );
    }

    let state = scoring::classify(&measurement, &warning, &critical);
    if state == ServiceState::Unknown {
        warn!("Measurement matched no threshold band, reporting UNKNOWN");
    }

    let unit = SpeedUnit::detect(cli.mebibytes);
    let mut report = Report::new(state, report::summary(&measurement, unit));
    if cli.perfdata {
        report = report.with_perf_data(report::performance_data(
            &measurement,
            &warning,
            &critical,
            unit,
        ));
    }

    Ok(Output::Report(report))
}
