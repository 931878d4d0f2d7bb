use crate::cli::args::{Cli, Commands};
use crate::cli::logging;
use crate::dispatch::{ErrorPolicy, ProcessingCommand};
use crate::driver::DailyDriver;
use crate::environment::RuntimeEnvironment;
use crate::error::Result;
use crate::models::RunState;
use crate::rotation::rotated_path;
use crate::settings::DriverSettings;
use crate::state::StateStore;
use crate::submit::JobSubmitter;
use chrono::{Local, NaiveDate};
use std::io::{IsTerminal, Write};
use tracing::{error, info};

/// Execute the parsed command line and return the process exit code.
pub async fn run(cli: Cli) -> Result<i32> {
    logging::init(cli.verbose, cli.log_file.as_deref())?;
    let settings = DriverSettings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            date,
            stop_on_error,
            dry_run,
            report,
            quiet,
        } => {
            let today = match date {
                Some(d) => d.parse::<RunState>()?.date,
                None => Local::now().date_naive(),
            };

            let mut driver = DailyDriver::new(settings)
                .with_progress(!quiet && std::io::stderr().is_terminal());
            if stop_on_error {
                driver = driver.with_error_policy(ErrorPolicy::StopOnError);
            }

            if dry_run {
                print_dry_run(&driver, today)?;
                return Ok(0);
            }

            let run_report = driver.run(today).await?;
            println!("{}", run_report.summary());
            for failed in run_report.failed_dispatches() {
                println!(
                    "  {}: {} (see {})",
                    failed.target,
                    failed.status,
                    failed.log_path.display()
                );
            }

            if let Some(path) = report {
                std::fs::write(&path, serde_json::to_string_pretty(&run_report)?)?;
                info!(path = %path.display(), "Run report written");
            }
        }

        Commands::Submit { executable } => {
            let submitter = JobSubmitter::new(RuntimeEnvironment::new(&settings.environment));
            return Ok(submitter.submit(&executable).await);
        }

        Commands::Launch {
            config_name,
            identifier,
        } => {
            let command = ProcessingCommand::plain(&settings.entry_point, &config_name, &identifier);
            let submitter = JobSubmitter::new(RuntimeEnvironment::new(&settings.environment));
            let code = submitter.launch(&command).await;
            if code != 0 {
                error!(code, "Launch did not succeed");
            }
            return Ok(code);
        }

        Commands::State { json } => {
            let store = StateStore::new(settings.state_file.clone());
            let state = store.load()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                match state {
                    Some(s) => println!("Last run: {} ({})", s, store.path().display()),
                    None => println!("No run recorded yet ({})", store.path().display()),
                }
            }
        }
    }

    Ok(0)
}

fn print_dry_run(driver: &DailyDriver, today: NaiveDate) -> Result<()> {
    let stdout = std::io::stdout();
    write_dry_run(&mut stdout.lock(), driver, today)
}

/// Describe what `run` would do for `today`; reads the state, writes nothing to disk.
fn write_dry_run(out: &mut impl Write, driver: &DailyDriver, today: NaiveDate) -> Result<()> {
    let plan = driver.plan(today)?;
    let settings = driver.settings();

    writeln!(out, "Today:        {}", RunState::new(today))?;
    match plan.prior_state {
        Some(prior) => writeln!(out, "Prior state:  {}", prior)?,
        None => writeln!(out, "Prior state:  none (first run)")?,
    }
    writeln!(
        out,
        "Window:       {} ({} days){}",
        plan.window,
        plan.window.day_count(),
        if plan.window.is_inverted() { " (inverted)" } else { "" }
    )?;
    writeln!(out, "Next state:   {}", plan.next_state)?;
    writeln!(out)?;

    for target in driver.targets() {
        let log_path = target.log_path(&settings.log_dir);
        if let Some(ref appendix) = plan.rotation_appendix {
            if log_path.exists() {
                writeln!(
                    out,
                    "rotate {} -> {}",
                    log_path.display(),
                    rotated_path(&log_path, appendix).display()
                )?;
            }
        }
        writeln!(
            out,
            "{} >> {} 2>&1",
            driver.command_for(&target, &plan).command_line(),
            log_path.display()
        )?;
    }

    writeln!(
        out,
        "copy {} -> {}",
        settings.artifact_glob,
        settings.archive_dir.display()
    )?;
    Ok(())
}
