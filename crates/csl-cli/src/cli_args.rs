use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "csl-cli")]
#[command(about = "Command scripting language CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Run a registered script by name.
    Run(RunArgs),
    /// Execute statements from a file, or from stdin when no file is
    /// given.
    Exec(ExecArgs),
    /// List the scripts found in the configured sources.
    List(ListArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
    /// Name of the script to run.
    pub(crate) script: String,
    /// Input string handed to builder-form scripts.
    #[arg(long = "input", default_value = "")]
    pub(crate) input: String,
    #[arg(long = "interactive-llm")]
    pub(crate) interactive_llm: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ExecArgs {
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
    /// File of statements; stdin when omitted.
    pub(crate) file: Option<String>,
    #[arg(long = "interactive-llm")]
    pub(crate) interactive_llm: bool,
}

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    #[command(flatten)]
    pub(crate) sources: SourceArgs,
}

#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    /// JSON file mapping script names to statement lists or source
    /// strings.
    #[arg(long = "config")]
    pub(crate) config: Option<String>,
    /// Directory scanned recursively for *.csl script files.
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: Option<String>,
}
