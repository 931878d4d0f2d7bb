//! Batch-job wrapper: run one executable inside the runtime environment.

use crate::dispatch::ProcessingCommand;
use crate::environment::RuntimeEnvironment;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tracing::{error, info};

/// Exit code reported when the program could not be started at all.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Exit code reported when the program was killed by a signal.
pub const SIGNAL_FAILURE_CODE: i32 = 128;

pub struct JobSubmitter {
    environment: RuntimeEnvironment,
}

impl JobSubmitter {
    pub fn new(environment: RuntimeEnvironment) -> Self {
        Self { environment }
    }

    /// Run `executable` without arguments and pass its exit code through.
    ///
    /// The path is not checked beforehand; a bad path shows up as the
    /// failure code of the wrapper or of the spawn itself.
    pub async fn submit(&self, executable: &Path) -> i32 {
        info!(
            executable = %executable.display(),
            environment = self.environment.name(),
            "Submitting job"
        );
        let mut cmd = self.environment.command(executable, &[] as &[&str]);
        self.run(&mut cmd, &executable.display().to_string()).await
    }

    /// Run the entry point without a date window (`<entry> <config> -i <id>`).
    pub async fn launch(&self, command: &ProcessingCommand) -> i32 {
        let command_line = command.command_line();
        info!(command = %command_line, environment = self.environment.name(), "Launching");
        let mut cmd = self.environment.command(&command.entry_point, &command.args());
        self.run(&mut cmd, &command_line).await
    }

    async fn run(&self, cmd: &mut tokio::process::Command, label: &str) -> i32 {
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        match cmd.status().await {
            Ok(status) => exit_code(status, label),
            Err(e) => {
                error!(job = label, error = %e, "Could not start job");
                SPAWN_FAILURE_CODE
            }
        }
    }
}

fn exit_code(status: ExitStatus, label: &str) -> i32 {
    match status.code() {
        Some(code) => {
            info!(job = label, code, "Job finished");
            code
        }
        None => {
            error!(job = label, "Job terminated by signal");
            SIGNAL_FAILURE_CODE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EnvironmentSettings;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}", body)).expect("write script");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
        path
    }

    #[tokio::test]
    async fn test_submit_passes_exit_status_through() {
        let dir = TempDir::new().expect("create temp dir");
        let job = write_script(dir.path(), "job.sh", "exit 5\n");

        let code = JobSubmitter::new(RuntimeEnvironment::none()).submit(&job).await;
        assert_eq!(code, 5);
    }

    #[tokio::test]
    async fn test_submit_forwards_no_arguments() {
        let dir = TempDir::new().expect("create temp dir");
        let out = dir.path().join("argc");
        let job = write_script(dir.path(), "job.sh", &format!("echo $# > '{}'\n", out.display()));

        let code = JobSubmitter::new(RuntimeEnvironment::none()).submit(&job).await;
        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(out).unwrap().trim(), "0");
    }

    #[tokio::test]
    async fn test_submit_inside_environment_still_deactivates() {
        let dir = TempDir::new().expect("create temp dir");
        let marker = dir.path().join("deactivated");
        let job = write_script(dir.path(), "job.sh", "[ \"$JOB_ENV\" = batch ] || exit 9\nexit 4\n");
        let env = RuntimeEnvironment::new(&EnvironmentSettings {
            name: "batch".to_string(),
            activate_command: "export JOB_ENV={env}".to_string(),
            deactivate_command: format!("touch '{}'", marker.display()),
        });

        let code = JobSubmitter::new(env).submit(&job).await;
        assert_eq!(code, 4);
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_submit_missing_executable() {
        let code = JobSubmitter::new(RuntimeEnvironment::none())
            .submit(Path::new("/nonexistent/job.sh"))
            .await;
        assert_eq!(code, SPAWN_FAILURE_CODE);
    }

    #[tokio::test]
    async fn test_launch_plain_variant() {
        let dir = TempDir::new().expect("create temp dir");
        let out = dir.path().join("args");
        let entry = write_script(dir.path(), "entry.sh", &format!("echo \"$*\" > '{}'\n", out.display()));
        let command = ProcessingCommand::plain(entry.to_str().unwrap(), "rad4alp_gc_PHA.txt", "A");

        let code = JobSubmitter::new(RuntimeEnvironment::none()).launch(&command).await;
        assert_eq!(code, 0);
        assert_eq!(fs::read_to_string(out).unwrap().trim(), "rad4alp_gc_PHA.txt -i A");
    }
}
