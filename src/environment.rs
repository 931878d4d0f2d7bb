//! Activation bracket for the named runtime environment.
//!
//! Activating an environment only affects the shell that sources it, so the
//! bracket lives in a small `bash -c` script wrapped around the program:
//! activate, run, deactivate, then exit with the program's status. The
//! deactivation step runs whatever the program's outcome.

use crate::settings::EnvironmentSettings;
use crate::utils::constants::ENV_PLACEHOLDER;
use std::ffi::OsStr;
use tokio::process::Command;

const WRAPPER_NAME: &str = "intercomp-env";

#[derive(Debug, Clone)]
pub struct RuntimeEnvironment {
    name: String,
    activate_command: String,
    deactivate_command: String,
}

impl RuntimeEnvironment {
    pub fn new(settings: &EnvironmentSettings) -> Self {
        Self {
            name: settings.name.clone(),
            activate_command: settings.activate_command.clone(),
            deactivate_command: settings.deactivate_command.clone(),
        }
    }

    /// No activation: programs run as-is.
    pub fn none() -> Self {
        Self {
            name: String::new(),
            activate_command: String::new(),
            deactivate_command: String::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// Shell script run by `bash -c`; the program and its arguments arrive as `$@`.
    pub fn wrapper_script(&self) -> String {
        let activate = self.activate_command.replace(ENV_PLACEHOLDER, &self.name);
        let mut script = String::new();
        if !activate.trim().is_empty() {
            script.push_str(&activate);
            script.push('\n');
        }
        script.push_str("\"$@\"\nstatus=$?\n");
        if !self.deactivate_command.trim().is_empty() {
            script.push_str(&self.deactivate_command);
            script.push('\n');
        }
        script.push_str("exit $status\n");
        script
    }

    /// Build the command that runs `program args...` inside this environment.
    pub fn command<S: AsRef<OsStr>>(&self, program: impl AsRef<OsStr>, args: &[S]) -> Command {
        if !self.is_active() {
            let mut cmd = Command::new(program);
            cmd.args(args);
            return cmd;
        }

        let mut cmd = Command::new("bash");
        cmd.arg("-c")
            .arg(self.wrapper_script())
            .arg(WRAPPER_NAME)
            .arg(program)
            .args(args);
        cmd
    }
}
