mod cli_args;
mod source_loader;
mod stdio_host;

use std::fs;
use std::io::{self, BufRead};

use anyhow::{bail, Context, Result};
use clap::Parser;
use csl_api::{CreateEngineOptions, ScriptingSession};
use csl_parser::preprocess;

use crate::cli_args::{Cli, ExecArgs, ListArgs, Mode, RunArgs, SourceArgs};
use crate::stdio_host::StdioHost;

fn main() -> Result<()> {
    match Cli::parse().command {
        Mode::Run(args) => run(args),
        Mode::Exec(args) => exec(args),
        Mode::List(args) => list(args),
    }
}

fn build_session(sources: &SourceArgs) -> Result<ScriptingSession> {
    let scripts = source_loader::load_scripts(sources)?;
    let session = ScriptingSession::new(CreateEngineOptions {
        scripts,
        ..Default::default()
    })?;
    Ok(session)
}

fn run(args: RunArgs) -> Result<()> {
    let mut session = build_session(&args.sources)?;
    let mut host = StdioHost::new(args.interactive_llm);

    let result = session.run_script(&args.script, &args.input, &mut host)?;
    if !result.ok {
        bail!(
            "script {} failed: {}",
            args.script,
            result.error.unwrap_or_default()
        );
    }
    Ok(())
}

fn exec(args: ExecArgs) -> Result<()> {
    let source = match &args.file {
        Some(file) => fs::read_to_string(file).with_context(|| format!("reading {file}"))?,
        None => io::stdin()
            .lock()
            .lines()
            .collect::<io::Result<Vec<String>>>()
            .context("reading stdin")?
            .join("\n"),
    };

    let mut session = build_session(&args.sources)?;
    let mut host = StdioHost::new(args.interactive_llm);
    for statement in preprocess(&source)? {
        session.execute(&statement, &mut host)?;
    }
    Ok(())
}

fn list(args: ListArgs) -> Result<()> {
    let scripts = source_loader::load_scripts(&args.sources)?;
    if scripts.is_empty() {
        println!("no scripts found");
        return Ok(());
    }
    for name in scripts.keys() {
        println!("{name}");
    }
    Ok(())
}
