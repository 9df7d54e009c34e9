use anyhow::Result;
use clap::Parser;
use startup_mentor::cli;
use startup_mentor::generator::workflow::launch;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let check_connection = args.check_connection;
    let submissions = args.submissions()?;
    let config = args.into_config()?;

    launch(&config, submissions, check_connection).await?;
    Ok(())
}
