use anyhow::Context;
use clap::Parser;
use intercomp_driver::cli::{run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let code = run(cli).await.context("intercomp-driver failed")?;
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
