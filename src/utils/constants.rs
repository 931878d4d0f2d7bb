/// Date format of the state file, the window arguments and rotation suffixes
pub const STATE_DATE_FORMAT: &str = "%Y%m%d";

/// Identifier of the combined cross-radar run
pub const INTERCOMP_IDENTIFIER: &str = "intercomp";

/// Placeholder replaced by the radar code in the config template
pub const ID_PLACEHOLDER: &str = "{id}";

/// Placeholder replaced by the environment name in the activation command
pub const ENV_PLACEHOLDER: &str = "{env}";

/// Time-of-day literals passed with every windowed dispatch
pub const DEFAULT_START_TIME: &str = "000001";
pub const DEFAULT_END_TIME: &str = "240000";

/// Entry point flags
pub const START_TIME_FLAG: &str = "--starttime";
pub const END_TIME_FLAG: &str = "--endtime";
pub const INFO_FLAG: &str = "-i";

/// Log files
pub const LOG_EXTENSION: &str = "log";

/// Settings defaults
pub const DEFAULT_ENTRY_POINT: &str = "main_process_data.py";
pub const DEFAULT_RADARS: [&str; 5] = ["A", "D", "L", "P", "W"];
pub const DEFAULT_CONFIG_TEMPLATE: &str = "rad4alp_gc_PH{id}.txt";
pub const DEFAULT_INTERCOMP_CONFIG: &str = "rad4alp_intercomp.txt";
pub const DEFAULT_STATE_FILE: &str = "state/last_run";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_ARTIFACT_GLOB: &str = "data/intercomp/**/*.png";
pub const DEFAULT_ARCHIVE_DIR: &str = "archive";
pub const DEFAULT_ENVIRONMENT: &str = "pyrad";
pub const DEFAULT_ACTIVATE_COMMAND: &str = "source activate {env}";
pub const DEFAULT_DEACTIVATE_COMMAND: &str = "conda deactivate";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "INTERCOMP";

/// Comma-separated radar list override
pub const RADARS_ENV_VAR: &str = "INTERCOMP_RADARS";
