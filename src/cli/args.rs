use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intercomp-driver")]
#[command(about = "Daily driver and job wrapper for radar intercomparison processing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Settings file (TOML), overridden by INTERCOMP_* variables"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the daily per-radar and intercomparison processing
    Run {
        #[arg(long, help = "Run as if today were this day (YYYYMMDD)")]
        date: Option<String>,

        #[arg(long, help = "Abort after the first dispatch that does not succeed")]
        stop_on_error: bool,

        #[arg(long, help = "Show the plan and commands without running anything")]
        dry_run: bool,

        #[arg(long, help = "Write the run report as JSON to this path")]
        report: Option<PathBuf>,

        #[arg(short, long, help = "Disable the progress spinner")]
        quiet: bool,
    },

    /// Run one executable inside the runtime environment
    Submit {
        #[arg(help = "Executable to run; no arguments are forwarded")]
        executable: PathBuf,
    },

    /// Run the processing entry point for one configuration, without a date window
    Launch {
        #[arg(help = "Processing configuration name")]
        config_name: String,

        #[arg(short, long, help = "Run identifier")]
        identifier: String,
    },

    /// Show the persisted run state
    State {
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_takes_no_positional_arguments() {
        assert!(Cli::try_parse_from(["intercomp-driver", "run"]).is_ok());
        assert!(Cli::try_parse_from(["intercomp-driver", "run", "extra"]).is_err());
    }

    #[test]
    fn test_submit_requires_exactly_one_path() {
        let cli = Cli::try_parse_from(["intercomp-driver", "submit", "/opt/jobs/job.sh"]).unwrap();
        match cli.command {
            Commands::Submit { executable } => assert_eq!(executable, PathBuf::from("/opt/jobs/job.sh")),
            _ => panic!("expected submit"),
        }
        assert!(Cli::try_parse_from(["intercomp-driver", "submit"]).is_err());
        assert!(Cli::try_parse_from(["intercomp-driver", "submit", "a", "b"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "intercomp-driver",
            "run",
            "--dry-run",
            "--date",
            "20240315",
            "-c",
            "driver.toml",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("driver.toml")));
        assert!(matches!(cli.command, Commands::Run { dry_run: true, .. }));
    }
}
