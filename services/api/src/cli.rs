use crate::demo::{
    run_demo, run_listing_search, run_roi_estimate, DemoArgs, ListingSearchArgs, RoiEstimateArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use landvest::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "LandVest",
    about = "Search land listings and model development returns from the command line",
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
    /// Query the listing catalog
    Listings {
        #[command(subcommand)]
        command: ListingsCommand,
    },
    /// Run the ROI calculator
    Roi {
        #[command(subcommand)]
        command: RoiCommand,
    },
    /// Walk through search, ROI, risk and portfolio views on the demo dataset
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ListingsCommand {
    /// Filter, sort and page the catalog
    Search(ListingSearchArgs),
}

#[derive(Subcommand, Debug)]
enum RoiCommand {
    /// Estimate returns for a purchase and development plan
    Estimate(RoiEstimateArgs),
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
        Command::Listings {
            command: ListingsCommand::Search(args),
        } => run_listing_search(args),
        Command::Roi {
            command: RoiCommand::Estimate(args),
        } => run_roi_estimate(args),
        Command::Demo(args) => run_demo(args),
    }
}
