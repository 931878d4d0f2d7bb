use chrono::NaiveDate;
use intercomp_driver::dispatch::{DispatchStatus, ErrorPolicy};
use intercomp_driver::models::RunState;
use intercomp_driver::settings::{DriverSettings, EnvironmentSettings};
use intercomp_driver::state::StateStore;
use intercomp_driver::{DailyDriver, DriverError};
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in entry point: records its arguments, writes an artifact for the
/// combined run and fails for radar `L`.
const ENTRY_POINT: &str = r#"#!/bin/sh
id=""
prev=""
for a in "$@"; do
  [ "$prev" = "-i" ] && id="$a"
  prev="$a"
done
echo "$*" >> "$WORKDIR/calls"
echo "processing $id"
if [ "$id" = "intercomp" ]; then
  mkdir -p "$WORKDIR/out/intercomp/$3/PLOT"
  echo png > "$WORKDIR/out/intercomp/$3/PLOT/bias_$3.png"
fi
[ "$id" = "L" ] && { echo "no data for L" >&2; exit 2; }
exit 0
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let entry = dir.path().join("main_process_data.sh");
        fs::write(&entry, ENTRY_POINT).expect("write entry point");
        fs::set_permissions(&entry, fs::Permissions::from_mode(0o755)).expect("chmod entry point");
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn settings(&self) -> DriverSettings {
        let root = self.dir.path();
        DriverSettings {
            entry_point: root.join("main_process_data.sh").display().to_string(),
            radars: vec!["A".to_string(), "L".to_string(), "W".to_string()],
            state_file: root.join("state/last_run"),
            log_dir: root.join("logs"),
            artifact_glob: format!("{}/out/intercomp/**/*.png", root.display()),
            archive_dir: root.join("archive"),
            environment: EnvironmentSettings {
                name: "radar".to_string(),
                activate_command: format!("export WORKDIR='{}'", root.display()),
                deactivate_command: "unset WORKDIR".to_string(),
            },
            ..DriverSettings::default()
        }
    }

    fn write_state(&self, state: &str) {
        fs::create_dir_all(self.path("state")).unwrap();
        fs::write(self.path("state/last_run"), state).unwrap();
    }

    fn state(&self) -> Option<RunState> {
        StateStore::new(self.path("state/last_run")).load().unwrap()
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.path("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn seed_logs(logs: &Path, ids: &[&str]) {
    fs::create_dir_all(logs).unwrap();
    for id in ids {
        fs::write(logs.join(format!("{id}.log")), format!("old {id}\n")).unwrap();
    }
}

#[tokio::test]
async fn test_first_run_without_state() {
    let fx = Fixture::new();
    let report = DailyDriver::new(fx.settings()).run(day(15)).await.unwrap();

    assert!(report.plan.is_first_run());
    assert!(!report.plan.rotation_armed());
    assert!(report.rotated_logs.is_empty());
    assert_eq!(fx.state(), Some(RunState::new(day(15))));
    assert_eq!(
        fs::read_to_string(fx.path("state/last_run")).unwrap(),
        "20240315\n"
    );

    let calls = fx.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(
        calls[0],
        "rad4alp_gc_PHA.txt 20240314 20240314 --starttime 000001 --endtime 240000 -i A"
    );
    assert_eq!(
        calls[3],
        "rad4alp_intercomp.txt 20240314 20240314 --starttime 000001 --endtime 240000 -i intercomp"
    );
}

#[tokio::test]
async fn test_day_change_rotates_existing_logs() {
    let fx = Fixture::new();
    fx.write_state("20240314\n");
    seed_logs(&fx.path("logs"), &["A", "intercomp"]);

    let report = DailyDriver::new(fx.settings()).run(day(15)).await.unwrap();

    assert_eq!(report.plan.rotation_appendix.as_deref(), Some("_20240314"));
    assert_eq!(
        report.rotated_logs,
        vec![
            fx.path("logs/A.log_20240314"),
            fx.path("logs/intercomp.log_20240314"),
        ]
    );
    assert_eq!(
        fs::read_to_string(fx.path("logs/A.log_20240314")).unwrap(),
        "old A\n"
    );
    // Fresh logs hold only today's output.
    assert_eq!(
        fs::read_to_string(fx.path("logs/A.log")).unwrap(),
        "processing A\n"
    );
    assert!(!fx.path("logs/W.log_20240314").exists());
    assert_eq!(fx.state(), Some(RunState::new(day(15))));
}

#[tokio::test]
async fn test_same_day_rerun_appends_with_inverted_window() {
    let fx = Fixture::new();
    fx.write_state("20240315");
    seed_logs(&fx.path("logs"), &["A"]);

    let report = DailyDriver::new(fx.settings()).run(day(15)).await.unwrap();

    assert!(!report.plan.rotation_armed());
    assert!(report.plan.window.is_inverted());
    assert!(!fx.path("logs/A.log_20240315").exists());
    assert_eq!(
        fs::read_to_string(fx.path("logs/A.log")).unwrap(),
        "old A\nprocessing A\n"
    );
    assert!(fx.calls()[0].contains(" 20240315 20240314 "));
}

#[tokio::test]
async fn test_failed_radar_does_not_stop_the_run() {
    let fx = Fixture::new();
    let report = DailyDriver::new(fx.settings()).run(day(15)).await.unwrap();

    let ids: Vec<&str> = report.dispatches.iter().map(|d| d.target.identifier()).collect();
    assert_eq!(ids, vec!["A", "L", "W", "intercomp"]);

    let failed: Vec<_> = report.failed_dispatches().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].status, DispatchStatus::Exited { code: 2 });
    assert!(fs::read_to_string(fx.path("logs/L.log"))
        .unwrap()
        .contains("no data for L"));

    assert_eq!(report.archive.copied, vec![fx.path("archive/bias_20240314.png")]);
}

#[tokio::test]
async fn test_stop_on_error_aborts_after_failure() {
    let fx = Fixture::new();
    let driver = DailyDriver::new(fx.settings()).with_error_policy(ErrorPolicy::StopOnError);

    let err = driver.run(day(15)).await.unwrap_err();

    match err {
        DriverError::DispatchFailed { target, .. } => assert_eq!(target, "L"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(fx.calls().len(), 2);
    assert!(!fx.path("archive").exists());
    // State was advanced before dispatching.
    assert_eq!(fx.state(), Some(RunState::new(day(15))));
}

#[tokio::test]
async fn test_corrupt_state_aborts_before_dispatch() {
    let fx = Fixture::new();
    fx.write_state("2024-03-14\n");

    let err = DailyDriver::new(fx.settings()).run(day(15)).await.unwrap_err();

    assert!(matches!(err, DriverError::InvalidState { .. }));
    assert!(fx.calls().is_empty());
}
