//! cxxbuild CLI - configure and build a CMake project per option triple

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cxxbuild::builder::cmake::synthesize;
use cxxbuild::core::options::BuildOptions;
use cxxbuild::ops::{execute, plan};
use cxxbuild::util::diagnostic::emit_error;
use cxxbuild::util::process::SystemRunner;
use cxxbuild::util::shell::Shell;
use cxxbuild::util::GlobalContext;

mod cli;

use cli::Cli;

fn main() {
    let cli = Cli::parse();
    let shell = Shell::from_flags(cli.quiet, cli.verbose, cli.color, cli.plan);

    match run(cli, &shell) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            emit_error(&e, shell.use_color());
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, shell: &Shell) -> Result<i32> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("cxxbuild=debug")
    } else if cli.quiet {
        EnvFilter::new("cxxbuild=error")
    } else {
        EnvFilter::new("cxxbuild=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(shell.use_color())
        .with_target(false)
        .without_time()
        .init();

    let ctx = GlobalContext::new()?;
    let root = ctx.source_root(cli.source_dir.as_deref())?;
    let config = ctx.config(&root);
    let opts = BuildOptions::resolve(cli.overrides(), &config)?;

    let invocation = synthesize(&root, &opts);

    if cli.plan {
        let plan = plan(&opts, &invocation);
        shell.json_event(&serde_json::to_value(&plan)?);
        return Ok(0);
    }

    let outcome = execute(&invocation, &mut SystemRunner, shell, &mut io::stdout().lock())?;
    Ok(outcome.exit_code)
}
