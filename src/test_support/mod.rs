//! Test utilities for cxxbuild unit tests.
//!
//! Provides a [`MockRunner`] that stands in for the operating system when
//! testing the executor: it records every command and returns scripted
//! exit codes instead of spawning processes.

use std::collections::HashMap;
use std::path::Path;

use crate::util::process::{CommandRunner, ProcessBuilder, ProcessError};

/// Scripted result for a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MockResult {
    Exit(i32),
    NotFound,
}

/// Mock command runner.
///
/// Programs with no scripted result exit with 0.
#[derive(Debug, Default)]
pub struct MockRunner {
    results: HashMap<String, MockResult>,
    calls: Vec<ProcessBuilder>,
}

impl MockRunner {
    /// Create a runner where every program succeeds.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Make `program` exit with `code`.
    pub fn exit_with(&mut self, program: &str, code: i32) -> &mut Self {
        self.results
            .insert(program.to_string(), MockResult::Exit(code));
        self
    }

    /// Make `program` look absent from PATH.
    pub fn missing(&mut self, program: &str) -> &mut Self {
        self.results
            .insert(program.to_string(), MockResult::NotFound);
        self
    }

    /// Get all commands that were run, in order.
    pub fn calls(&self) -> &[ProcessBuilder] {
        &self.calls
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, cmd: &ProcessBuilder) -> Result<i32, ProcessError> {
        let program = program_name(cmd.get_program());
        match self.results.get(&program).copied() {
            Some(MockResult::NotFound) => Err(ProcessError::NotFound { program }),
            Some(MockResult::Exit(code)) => {
                self.calls.push(cmd.clone());
                Ok(code)
            }
            None => {
                self.calls.push(cmd.clone());
                Ok(0)
            }
        }
    }
}

fn program_name(program: &Path) -> String {
    program.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_scripts_results() {
        let mut runner = MockRunner::new();
        runner.exit_with("make", 2).missing("ninja");

        assert_eq!(runner.run(&ProcessBuilder::new("cmake")).unwrap(), 0);
        assert_eq!(runner.run(&ProcessBuilder::new("make")).unwrap(), 2);
        assert!(runner.run(&ProcessBuilder::new("ninja")).is_err());
        assert_eq!(runner.calls().len(), 2);
    }
}
