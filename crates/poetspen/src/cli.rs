//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// poetspen - scaffold and manage Poetry-based Python projects
#[derive(Parser, Debug)]
#[command(name = "poetspen")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a poetspen config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Directory holding the project(s)
    #[arg(
        short = 'p',
        long = "root-path",
        visible_alias = "root_path",
        global = true,
        default_value = "."
    )]
    pub root_path: Utf8PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new project
    New(NewArgs),

    /// Install project dependencies
    Install(InstallArgs),

    /// Run a command inside the project environment
    Run(RunArgs),

    /// Forward a command to poetry
    Poetry(PoetryArgs),

    /// List the templates `new` would copy
    Templates(TemplatesArgs),
}

// New command
#[derive(Args, Debug)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Replace an existing project
    #[arg(short, long)]
    pub recreate: bool,

    /// Skip environment creation and install
    #[arg(long)]
    pub no_install: bool,

    /// Template category to copy, highest priority first (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,
}

// Install command
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Project directory name under the root path
    pub project: Option<String>,

    /// Refresh the dependency resolution before installing
    #[arg(short, long)]
    pub update: bool,
}

// Run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Project directory name under the root path
    #[arg(long)]
    pub project: Option<String>,

    /// Command and arguments (default: run the package as a module)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

// Poetry command
#[derive(Args, Debug)]
pub struct PoetryArgs {
    /// Forward arguments verbatim, without managed pre-processing
    #[arg(
        short = 't',
        long = "poetry-pass-through",
        visible_alias = "poetry_pass_through"
    )]
    pub pass_through: bool,

    /// Project directory name under the root path
    #[arg(long)]
    pub project: Option<String>,

    /// Poetry command
    pub command: String,

    /// Arguments for the poetry command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Spellings of the pass-through flag accepted after the poetry arguments
const PASS_THROUGH_FLAGS: &[&str] = &[
    "-t",
    "-pt",
    "--poetry-pass-through",
    "--poetry_pass_through",
];

impl PoetryArgs {
    /// Pull a pass-through flag given after the command out of `args`.
    ///
    /// Trailing arguments are collected verbatim, so `poetry add x -t` would
    /// otherwise forward `-t` to poetry.
    pub fn take_trailing_flags(mut self) -> Self {
        let before = self.args.len();
        self.args.retain(|a| !PASS_THROUGH_FLAGS.contains(&a.as_str()));
        if self.args.len() != before {
            self.pass_through = true;
        }
        self
    }
}

// Templates command
#[derive(Args, Debug)]
pub struct TemplatesArgs {
    /// Template category, highest priority first (repeatable)
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Also show templates outside the selected categories
    #[arg(short, long)]
    pub all: bool,
}
