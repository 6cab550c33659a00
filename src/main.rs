use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::Path;

mod chart;
mod cli;
mod prompt;
mod render;
mod values;
mod writer;

use crate::prompt::Prompter;

fn main() -> Result<()> {
    env_logger::init();
    cli::App::parse();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run(stdin.lock(), &mut stdout, Path::new("."))
}

/// The whole pipeline: collect answers, assemble values, render, write.
/// Takes the channel and the output base so it can run against scripted
/// input in tests.
fn run(input: impl BufRead, mut output: impl Write, base: &Path) -> Result<()> {
    let request = Prompter::new(input, &mut output).collect()?;
    let values = values::assemble(&request);
    let artifacts = render::render_chart(&request.chart_name, &values, request.rbac)?;
    writer::write_chart(&base.join(&request.chart_name), &artifacts)?;
    writeln!(output, "Helm Chart generated in {}/", request.chart_name)?;
    Ok(())
}
