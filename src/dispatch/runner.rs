use crate::dispatch::ProcessingCommand;
use crate::environment::RuntimeEnvironment;
use crate::models::DispatchTarget;
use crate::utils::{format_elapsed, ProgressReporter};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DispatchStatus {
    Exited { code: i32 },
    Signalled,
    SpawnFailed { message: String },
}

impl DispatchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchStatus::Exited { code: 0 })
    }

    fn describe(&self) -> String {
        match self {
            DispatchStatus::Exited { code } => format!("exit status {}", code),
            DispatchStatus::Signalled => "terminated by signal".to_string(),
            DispatchStatus::SpawnFailed { message } => format!("could not start: {}", message),
        }
    }
}

impl std::fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.describe())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub target: DispatchTarget,
    pub log_path: PathBuf,
    pub command_line: String,
    pub status: DispatchStatus,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Runs the external entry point for one target at a time.
///
/// Output of every invocation is appended to the target's log file; the
/// outcome is recorded but never retried.
pub struct Dispatcher {
    environment: RuntimeEnvironment,
    silent: bool,
}

impl Dispatcher {
    pub fn new(environment: RuntimeEnvironment) -> Self {
        Self {
            environment,
            silent: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.silent = !show_progress;
        self
    }

    /// Run `command` to completion with stdout and stderr appended to `log_path`.
    pub async fn dispatch(
        &self,
        target: &DispatchTarget,
        command: &ProcessingCommand,
        log_path: &Path,
    ) -> DispatchOutcome {
        let command_line = command.command_line();
        info!(target_id = %target, command = %command_line, log = %log_path.display(), "Dispatching");

        let progress = ProgressReporter::new_spinner(&format!("Processing {}...", target), self.silent);
        let started = Instant::now();
        let status = self.run_to_log(command, log_path).await;
        let elapsed = started.elapsed();

        progress.finish_with_message(&format!("{}: {}", target, status));
        if status.is_success() {
            info!(target_id = %target, elapsed = %format_elapsed(elapsed), "Dispatch finished");
        } else {
            warn!(
                target_id = %target,
                status = %status,
                elapsed = %format_elapsed(elapsed),
                log = %log_path.display(),
                "Dispatch did not succeed"
            );
        }

        DispatchOutcome {
            target: target.clone(),
            log_path: log_path.to_path_buf(),
            command_line,
            status,
            elapsed,
        }
    }

    async fn run_to_log(&self, command: &ProcessingCommand, log_path: &Path) -> DispatchStatus {
        let (stdout, stderr) = match open_log(log_path) {
            Ok(handles) => handles,
            Err(e) => {
                return DispatchStatus::SpawnFailed {
                    message: format!("cannot open log {}: {}", log_path.display(), e),
                }
            }
        };

        let mut cmd = self.environment.command(&command.entry_point, &command.args());
        cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr);

        match cmd.status().await {
            Ok(status) => match status.code() {
                Some(code) => DispatchStatus::Exited { code },
                None => DispatchStatus::Signalled,
            },
            Err(e) => DispatchStatus::SpawnFailed {
                message: e.to_string(),
            },
        }
    }
}

/// Open the log in append mode twice over, one handle per output stream.
fn open_log(path: &Path) -> std::io::Result<(File, File)> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let dup = file.try_clone()?;
    Ok((file, dup))
}
