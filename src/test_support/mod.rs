//! Test utilities and mocks for swagpack unit tests.
//!
//! Provides recorders for the two external seams: subprocesses
//! ([`MockRunner`]) and remote downloads ([`MockFetcher`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use swagpack::test_support::{MockRunner, MockProcessOutput};
//!
//! let runner = MockRunner::new();
//! runner.expect_program("autorest", MockProcessOutput::success(""));
//! runner.expect_program("swagpack-compile", MockProcessOutput::success("True"));
//! ```

pub mod fixtures;

use std::io::Write;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use url::Url;

use crate::sources::Fetcher;
use crate::util::process::{ProcessBuilder, ProcessOutput, ProcessRunner};

pub use fixtures::*;

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_output(&self) -> ProcessOutput {
        ProcessOutput {
            code: Some(self.status),
            success: self.status == 0,
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

type SideEffect = Arc<dyn Fn(&ProcessBuilder) + Send + Sync>;

struct Expectation {
    /// Matched against the program's file name
    program: String,
    output: MockProcessOutput,
    side_effect: Option<SideEffect>,
}

/// Records every command it is asked to run and answers from expectations.
///
/// Expectations are matched by program file name, first match wins.
#[derive(Default)]
pub struct MockRunner {
    expectations: Mutex<Vec<Expectation>>,
    calls: Mutex<Vec<ProcessBuilder>>,
}

impl MockRunner {
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Answer commands whose program file name is `program`.
    pub fn expect_program(&self, program: &str, output: MockProcessOutput) -> &Self {
        self.push(program, output, None)
    }

    /// Like [`MockRunner::expect_program`], also running `effect` on each call
    /// (e.g. to write the files a generator would emit).
    pub fn expect_program_with(
        &self,
        program: &str,
        output: MockProcessOutput,
        effect: impl Fn(&ProcessBuilder) + Send + Sync + 'static,
    ) -> &Self {
        self.push(program, output, Some(Arc::new(effect)))
    }

    fn push(&self, program: &str, output: MockProcessOutput, side_effect: Option<SideEffect>) -> &Self {
        if let Ok(mut exps) = self.expectations.lock() {
            exps.push(Expectation {
                program: program.to_string(),
                output,
                side_effect,
            });
        }
        self
    }

    /// Get all commands that were run, in order.
    pub fn calls(&self) -> Vec<ProcessBuilder> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Commands whose program file name is `program`.
    pub fn calls_to(&self, program: &str) -> Vec<ProcessBuilder> {
        self.calls()
            .into_iter()
            .filter(|c| program_name(c) == program)
            .collect()
    }
}

fn program_name(cmd: &ProcessBuilder) -> String {
    cmd.get_program()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl ProcessRunner for MockRunner {
    fn run(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(cmd.clone());
        }

        let name = program_name(cmd);
        let matched = self
            .expectations
            .lock()
            .ok()
            .and_then(|exps| {
                exps.iter()
                    .find(|e| e.program == name)
                    .map(|e| (e.output.clone(), e.side_effect.clone()))
            });

        match matched {
            Some((output, effect)) => {
                if let Some(effect) = effect {
                    effect(cmd);
                }
                Ok(output.to_output())
            }
            None => bail!("unexpected command: {}", cmd.display_command()),
        }
    }
}

/// Fetcher that serves a fixed body (or fails) and records requested URLs.
pub struct MockFetcher {
    body: Result<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new(body: impl Into<String>) -> Self {
        MockFetcher {
            body: Ok(body.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        MockFetcher {
            body: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &Url, dest: &mut dyn Write) -> Result<()> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        match &self.body {
            Ok(body) => {
                dest.write_all(body.as_bytes())?;
                Ok(())
            }
            Err(message) => bail!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_and_answers() {
        let runner = MockRunner::new();
        runner.expect_program("autorest", MockProcessOutput::success("done"));

        let cmd = ProcessBuilder::new("/opt/bin/autorest").args(["-Input", "spec.json"]);
        let out = runner.run(&cmd).unwrap();
        assert!(out.success);
        assert_eq!(out.stdout, "done");
        assert_eq!(runner.calls_to("autorest").len(), 1);
    }

    #[test]
    fn test_mock_runner_rejects_unexpected() {
        let runner = MockRunner::new();
        assert!(runner.run(&ProcessBuilder::new("rm")).is_err());
        assert_eq!(runner.calls().len(), 1);
    }
}
