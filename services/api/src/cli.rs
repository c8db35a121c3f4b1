use crate::report::{
    run_browse, run_eligibility, run_export, run_facets, run_search, BrowseArgs, EligibilityArgs,
    ExportArgs, FacetArgs, SearchArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use scheme_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "SchemeFinder",
    about = "Search government welfare schemes and check eligibility from the command line",
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
    /// Filter the catalog by facets and free text
    Search(SearchArgs),
    /// List schemes a profile is eligible for
    Eligibility(EligibilityArgs),
    /// Show facet options with scheme counts
    Facets(FacetArgs),
    /// Summarise schemes per state or per central ministry
    Browse(BrowseArgs),
    /// Write a filtered result set as CSV
    Export(ExportArgs),
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
        Command::Search(args) => run_search(args),
        Command::Eligibility(args) => run_eligibility(args),
        Command::Facets(args) => run_facets(args),
        Command::Browse(args) => run_browse(args),
        Command::Export(args) => run_export(args),
    }
}
