use ai_studio_history::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Add(args) => cli::history::add(args).await,
        Command::List(args) => cli::history::list(args).await,
    }
}
