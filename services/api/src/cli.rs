use crate::infra::read_json;
use crate::server;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use tender_criteria::criteria::{
    build_criteria, check_criteria, check_responses, BidPayload, CriteriaTree, TenderPayload,
    UuidIdGenerator, ValidationError,
};
use tender_criteria::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tender Criteria Engine",
    about = "Check tender criteria and conversions, build criteria trees and match bid responses",
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
    /// Run the criteria checks against a tender JSON file
    Check(TenderArgs),
    /// Check a tender and print its criteria tree with generated ids
    Build(TenderArgs),
    /// Match a bid's requirement responses against a built criteria tree
    Responses(ResponsesArgs),
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

#[derive(Args, Debug)]
pub(crate) struct TenderArgs {
    /// Tender payload (awardCriteria, lots, items, criteria, conversions)
    #[arg(long)]
    pub(crate) tender: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct ResponsesArgs {
    /// Criteria tree as printed by `build`
    #[arg(long)]
    pub(crate) tree: PathBuf,
    /// Bid payload carrying requirementResponses
    #[arg(long)]
    pub(crate) bid: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Check(args) => run_check(args),
        Command::Build(args) => run_build(args),
        Command::Responses(args) => run_responses(args),
    }
}

fn run_check(args: TenderArgs) -> Result<(), AppError> {
    let tender: TenderPayload = read_json(&args.tender)?;
    report(check_criteria(&tender))
}

fn run_build(args: TenderArgs) -> Result<(), AppError> {
    let tender: TenderPayload = read_json(&args.tender)?;
    let built = check_criteria(&tender).and_then(|()| build_criteria(&tender, &UuidIdGenerator));

    match built {
        Ok(tree) => {
            println!("{}", serde_json::to_string_pretty(&tree)?);
            Ok(())
        }
        Err(error) => report(Err(error)),
    }
}

fn run_responses(args: ResponsesArgs) -> Result<(), AppError> {
    let tree: CriteriaTree = read_json(&args.tree)?;
    let bid: BidPayload = read_json(&args.bid)?;
    report(check_responses(&bid, &tree))
}

/// Print the verdict as JSON; a failure also ends the process with an error.
fn report(verdict: Result<(), ValidationError>) -> Result<(), AppError> {
    match verdict {
        Ok(()) => {
            println!("{}", json!({ "status": "ok" }));
            Ok(())
        }
        Err(error) => {
            println!("{}", serde_json::to_string_pretty(&error.view())?);
            Err(error.into())
        }
    }
}
