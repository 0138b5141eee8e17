use clap::Parser;
use smartinvest::cli::{Cli, Command, run_dividend_yield, run_project};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Command::Serve { port } => smartinvest::api::run_http_server(port)
            .await
            .map_err(smartinvest::error::AppError::from),
        Command::Project(args) => run_project(&args),
        Command::DividendYield {
            dividend_per_share,
            share_price,
        } => run_dividend_yield(dividend_per_share, share_price),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
