//! Implementation of a cxxbuild run: create the build directory, announce
//! the command, then configure and build.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::builder::cmake::{BuildInvocation, CommandSpec};
use crate::core::options::BuildOptions;
use crate::ops::errors::RunError;
use crate::util::fs::ensure_dir;
use crate::util::process::{CommandRunner, ProcessBuilder};
use crate::util::shell::{Shell, Status};

/// A step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Configure,
    Build,
}

impl Step {
    fn status(&self) -> Status {
        match self {
            Step::Configure => Status::Configuring,
            Step::Build => Status::Building,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Step::Configure => "configure",
            Step::Build => "build",
        }
    }
}

/// Result of running the pipeline to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOutcome {
    /// Exit code to report for the whole run
    pub exit_code: i32,
    /// The step that failed, if any
    pub failed_step: Option<Step>,
}

impl RunOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Machine-readable description of a run, emitted by `--plan`.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan<'a> {
    pub options: &'a BuildOptions,
    pub source_dir: &'a Path,
    pub build_dir: &'a Path,
    pub env: &'a [(String, String)],
    pub env_remove: &'a [String],
    pub steps: Vec<PlannedStep<'a>>,
    pub command_line: String,
}

/// One step of a [`BuildPlan`].
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStep<'a> {
    pub step: Step,
    pub program: &'a str,
    pub args: Vec<String>,
    pub cwd: &'a Path,
}

impl<'a> PlannedStep<'a> {
    fn new(step: Step, command: &'a CommandSpec) -> Self {
        PlannedStep {
            step,
            program: &command.program,
            args: command.display_args(),
            cwd: &command.cwd,
        }
    }
}

/// Describe what a run would do without touching the filesystem.
pub fn plan<'a>(opts: &'a BuildOptions, inv: &'a BuildInvocation) -> BuildPlan<'a> {
    BuildPlan {
        options: opts,
        source_dir: &inv.source_dir,
        build_dir: &inv.build_dir,
        env: &inv.env,
        env_remove: &inv.env_remove,
        steps: vec![
            PlannedStep::new(Step::Configure, &inv.configure),
            PlannedStep::new(Step::Build, &inv.build),
        ],
        command_line: inv.command_line(),
    }
}

/// Run the invocation.
///
/// The build directory is created first; failing that, nothing runs. The
/// directory and command line are then written to `out`. The configure step
/// runs before the build step, and a failing configure step skips the build.
pub fn execute(
    inv: &BuildInvocation,
    runner: &mut dyn CommandRunner,
    shell: &Shell,
    out: &mut dyn Write,
) -> Result<RunOutcome, RunError> {
    let created = !inv.build_dir.is_dir();
    ensure_dir(&inv.build_dir).map_err(|source| RunError::CreateDir {
        path: inv.build_dir.clone(),
        source,
    })?;
    if created {
        shell.verbose(Status::Created, inv.build_dir.display());
    }

    writeln!(out, "{}", inv.build_dir.display()).map_err(RunError::Output)?;
    writeln!(out, "{}", inv.command_line()).map_err(RunError::Output)?;
    out.flush().map_err(RunError::Output)?;

    let steps = [(Step::Configure, &inv.configure), (Step::Build, &inv.build)];
    for (step, spec) in steps {
        let cmd = ProcessBuilder::from_spec(spec, &inv.env, &inv.env_remove);
        shell.verbose(Status::Running, format!("`{}`", cmd.display_command()));

        let span = shell.span(step.status(), inv.build_dir.display());
        let code = runner.run(&cmd)?;

        if code != 0 {
            tracing::debug!("{} step exited with {}", step.name(), code);
            shell.error(format!(
                "{} step `{}` failed with exit code {}",
                step.name(),
                spec.program,
                code
            ));
            if step == Step::Configure {
                shell.status(Status::Warning, "skipping build step");
            }
            return Ok(RunOutcome {
                exit_code: code,
                failed_step: Some(step),
            });
        }
        span.finish(step.name());
    }

    Ok(RunOutcome {
        exit_code: 0,
        failed_step: None,
    })
}
