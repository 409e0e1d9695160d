use std::process::ExitCode;

use gridcore::{cli, config, telemetry};

fn main() -> ExitCode {
    let cli = cli::parse_from(std::env::args_os());

    let config = config::load_or_init(cli.assets.as_deref());
    let _guard = telemetry::init(telemetry::TelemetryConfig::new(
        cli.verbose,
        config.logging.clone(),
    ));

    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
