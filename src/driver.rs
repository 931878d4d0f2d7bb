//! The daily intercomparison run.
//!
//! One invocation reads the run state, derives the window and rotation plan,
//! advances the state, then dispatches every radar followed by the combined
//! run, strictly one after another, and finally archives the image artifacts.

use crate::archive::{ArchiveReport, ArtifactArchiver};
use crate::dispatch::{DispatchOutcome, Dispatcher, ErrorPolicy, ProcessingCommand};
use crate::environment::RuntimeEnvironment;
use crate::error::{DriverError, Result};
use crate::models::{plan_run, DispatchTarget, RunPlan};
use crate::rotation::rotate_log;
use crate::settings::DriverSettings;
use crate::state::StateStore;
use crate::utils::format_elapsed;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub plan: RunPlan,
    pub rotated_logs: Vec<PathBuf>,
    pub dispatches: Vec<DispatchOutcome>,
    pub archive: ArchiveReport,
    pub elapsed_secs: f64,
}

impl RunReport {
    pub fn failed_dispatches(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.dispatches.iter().filter(|d| !d.status.is_success())
    }

    pub fn summary(&self) -> String {
        let failed = self.failed_dispatches().count();
        format!(
            "Window {} | {} dispatches ({} not successful) | {} logs rotated | {} artifacts archived | {}",
            self.plan.window,
            self.dispatches.len(),
            failed,
            self.rotated_logs.len(),
            self.archive.copied.len(),
            format_elapsed(Duration::from_secs_f64(self.elapsed_secs))
        )
    }
}

pub struct DailyDriver {
    settings: DriverSettings,
    store: StateStore,
    dispatcher: Dispatcher,
    policy: ErrorPolicy,
}

impl DailyDriver {
    pub fn new(settings: DriverSettings) -> Self {
        let store = StateStore::new(settings.state_file.clone());
        let dispatcher = Dispatcher::new(RuntimeEnvironment::new(&settings.environment));
        let policy = settings.error_policy;
        Self {
            settings,
            store,
            dispatcher,
            policy,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.dispatcher = self.dispatcher.with_progress(show_progress);
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Targets of one run in dispatch order.
    pub fn targets(&self) -> Vec<DispatchTarget> {
        DispatchTarget::daily_sequence(&self.settings.radars)
    }

    /// Plan the run for `today` without changing anything on disk.
    pub fn plan(&self, today: NaiveDate) -> Result<RunPlan> {
        Ok(plan_run(self.store.load()?, today))
    }

    /// Command executed for `target` under `plan`.
    pub fn command_for(&self, target: &DispatchTarget, plan: &RunPlan) -> ProcessingCommand {
        let s = &self.settings;
        ProcessingCommand::windowed(
            &s.entry_point,
            &target.config_name(&s.config_template, &s.intercomp_config),
            plan.window,
            &s.start_time,
            &s.end_time,
            target.identifier(),
        )
    }

    pub async fn run(&self, today: NaiveDate) -> Result<RunReport> {
        let started = Instant::now();

        let plan = self.plan(today)?;
        self.log_plan(&plan);

        // The state advances before any dispatch: a crash mid-run followed by a
        // same-day retry sees no day change and neither rotates nor widens the window.
        self.store.save(&plan.next_state)?;

        let mut rotated_logs = Vec::new();
        let mut dispatches = Vec::new();

        for target in self.targets() {
            let log_path = target.log_path(&self.settings.log_dir);

            if let Some(ref appendix) = plan.rotation_appendix {
                match rotate_log(&log_path, appendix) {
                    Ok(Some(rotated)) => rotated_logs.push(rotated),
                    Ok(None) => {}
                    Err(e) => warn!(log = %log_path.display(), error = %e, "Log rotation failed"),
                }
            }

            let command = self.command_for(&target, &plan);
            let outcome = self.dispatcher.dispatch(&target, &command, &log_path).await;
            let succeeded = outcome.status.is_success();
            let reason = outcome.status.to_string();
            dispatches.push(outcome);

            if !succeeded && self.policy == ErrorPolicy::StopOnError {
                return Err(DriverError::DispatchFailed {
                    target: target.to_string(),
                    reason,
                });
            }
        }

        let archiver = ArtifactArchiver::new(&self.settings.artifact_glob, &self.settings.archive_dir);
        let archive = archiver.archive()?;

        let elapsed = started.elapsed();
        info!(elapsed = %format_elapsed(elapsed), "Daily run complete");

        Ok(RunReport {
            plan,
            rotated_logs,
            dispatches,
            archive,
            elapsed_secs: elapsed.as_secs_f64(),
        })
    }

    fn log_plan(&self, plan: &RunPlan) {
        match plan.prior_state {
            Some(prior) => info!(prior = %prior, today = %plan.next_state, "Loaded run state"),
            None => info!(today = %plan.next_state, "First run, no prior state"),
        }
        info!(
            window = %plan.window,
            days = plan.window.day_count(),
            rotation = plan.rotation_appendix.as_deref().unwrap_or(""),
            policy = %self.policy,
            "Run planned"
        );
        if plan.window.is_inverted() {
            warn!(window = %plan.window, "Processing window is inverted (same-day rerun)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProcessingWindow, RunState};
    use crate::settings::EnvironmentSettings;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> DriverSettings {
        DriverSettings {
            entry_point: "true".to_string(),
            radars: vec!["A".to_string(), "L".to_string()],
            state_file: dir.path().join("state/last_run"),
            log_dir: dir.path().join("logs"),
            artifact_glob: format!("{}/out/**/*.png", dir.path().display()),
            archive_dir: dir.path().join("archive"),
            environment: EnvironmentSettings {
                name: String::new(),
                ..EnvironmentSettings::default()
            },
            ..DriverSettings::default()
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_plan_does_not_touch_state() -> Result<()> {
        let dir = TempDir::new()?;
        let driver = DailyDriver::new(settings(&dir));

        let plan = driver.plan(day(15))?;

        assert_eq!(plan.window, ProcessingWindow::new(day(14), day(14)));
        assert!(!dir.path().join("state/last_run").exists());
        Ok(())
    }

    #[test]
    fn test_command_for_targets() -> Result<()> {
        let dir = TempDir::new()?;
        let driver = DailyDriver::new(settings(&dir));
        let plan = plan_run(Some(RunState::new(day(13))), day(15));

        let radar = driver.command_for(&DispatchTarget::Radar("L".to_string()), &plan);
        assert_eq!(
            radar.command_line(),
            "true rad4alp_gc_PHL.txt 20240313 20240314 --starttime 000001 --endtime 240000 -i L"
        );

        let intercomp = driver.command_for(&DispatchTarget::Intercomp, &plan);
        assert_eq!(intercomp.config_name, "rad4alp_intercomp.txt");
        assert_eq!(intercomp.identifier, "intercomp");
        Ok(())
    }

    #[tokio::test]
    async fn test_run_advances_state_and_dispatches_in_order() -> Result<()> {
        let dir = TempDir::new()?;
        let driver = DailyDriver::new(settings(&dir));

        let report = driver.run(day(15)).await?;

        let order: Vec<&str> = report.dispatches.iter().map(|d| d.target.identifier()).collect();
        assert_eq!(order, vec!["A", "L", "intercomp"]);
        assert!(report.failed_dispatches().next().is_none());
        assert_eq!(
            StateStore::new(dir.path().join("state/last_run")).load()?,
            Some(RunState::new(day(15)))
        );
        Ok(())
    }
}
