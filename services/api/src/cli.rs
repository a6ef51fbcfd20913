use crate::commands::{
    run_catalog, run_estimate, run_quotes, CatalogCommand, EstimateArgs, QuotesCommand,
};
use crate::server;
use auto_quote::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Auto Quote",
    about = "Serve, price, and manage auto insurance quotes from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Price a driver and vehicle without saving a quote
    Estimate(EstimateArgs),
    /// Browse the vehicle catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommand,
    },
    /// Inspect or remove saved quotes in the configured store
    Quotes {
        #[command(subcommand)]
        command: QuotesCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Catalog { command } => run_catalog(command),
        Command::Quotes { command } => run_quotes(command),
    }
}
