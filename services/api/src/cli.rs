use crate::demo::{run_batch, run_demo, run_evaluate, run_rules, BatchArgs, EvaluateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use invoice_workflow::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Invoice Approval Workflow",
    about = "Route invoices to the right approver over HTTP or from the command line",
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
    /// Evaluate a single invoice against the approval rules
    Evaluate(EvaluateArgs),
    /// List the approval rules in evaluation order
    Rules,
    /// Walk through the reference invoices, including band boundaries
    Demo,
    /// Evaluate every invoice in a CSV export
    Batch(BatchArgs),
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
        Command::Evaluate(args) => run_evaluate(args),
        Command::Rules => {
            run_rules();
            Ok(())
        }
        Command::Demo => {
            run_demo();
            Ok(())
        }
        Command::Batch(args) => run_batch(args),
    }
}
