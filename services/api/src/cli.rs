use crate::console::{run_assess, run_check, run_profiles, AssessArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ds_qualifier::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Digital Sovereignty Readiness Assessment",
    about = "Serve or run the digital sovereignty readiness assessment from the command line",
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
    /// Score a saved submission and optionally write the export document
    Assess(AssessArgs),
    /// List the weighting profiles and their domain weights
    Profiles,
    /// Load and validate the configured catalogs, then exit
    Check,
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
        Command::Assess(args) => run_assess(args),
        Command::Profiles => run_profiles(),
        Command::Check => run_check(),
    }
}
