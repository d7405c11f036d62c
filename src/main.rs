use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use iniq::cli::{self, Args};
use iniq::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let args = Args::parse();

    if !std::io::stderr().is_terminal() {
        colored::control::set_override(false);
    }

    let settings = match Settings::load(&args.config) {
        Ok(settings) => settings,
        Err(e) => {
            cli::report_error(&[format!("{:#}", e)]);
            return ExitCode::from(cli::EXIT_IO);
        }
    };

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| settings.log_filter(args.verbose).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!(
        settings = %args.config.display(),
        format = %args.format.unwrap_or(settings.format),
        max_text_len = settings.limits.max_text_len,
        "settings loaded"
    );

    cli::run(&args, &settings)
}
