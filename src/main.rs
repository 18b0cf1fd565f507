use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use cascade_tokens::config::CliArgs;

fn main() -> anyhow::Result<ExitCode> {
    let args = CliArgs::parse();
    let report = cascade_tokens::run(args).context("css variable generation failed")?;

    if report.is_publishable() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
