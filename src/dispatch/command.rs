use crate::models::ProcessingWindow;
use crate::utils::constants::{END_TIME_FLAG, INFO_FLAG, START_TIME_FLAG};
use serde::Serialize;

/// Argument vector for one invocation of the external entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingCommand {
    pub entry_point: String,
    pub config_name: String,
    pub window: Option<WindowArgs>,
    pub identifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowArgs {
    pub window: ProcessingWindow,
    pub start_time: String,
    pub end_time: String,
}

impl ProcessingCommand {
    /// `<entry> <config> <start> <end> --starttime <t0> --endtime <t1> -i <id>`
    pub fn windowed(
        entry_point: &str,
        config_name: &str,
        window: ProcessingWindow,
        start_time: &str,
        end_time: &str,
        identifier: &str,
    ) -> Self {
        Self {
            entry_point: entry_point.to_string(),
            config_name: config_name.to_string(),
            window: Some(WindowArgs {
                window,
                start_time: start_time.to_string(),
                end_time: end_time.to_string(),
            }),
            identifier: identifier.to_string(),
        }
    }

    /// `<entry> <config> -i <id>`
    pub fn plain(entry_point: &str, config_name: &str, identifier: &str) -> Self {
        Self {
            entry_point: entry_point.to_string(),
            config_name: config_name.to_string(),
            window: None,
            identifier: identifier.to_string(),
        }
    }

    /// Arguments after the entry point.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.config_name.clone()];
        if let Some(ref w) = self.window {
            args.extend([
                w.window.start_arg(),
                w.window.end_arg(),
                START_TIME_FLAG.to_string(),
                w.start_time.clone(),
                END_TIME_FLAG.to_string(),
                w.end_time.clone(),
            ]);
        }
        args.extend([INFO_FLAG.to_string(), self.identifier.clone()]);
        args
    }

    /// Human-readable command line for logs and dry runs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.entry_point.clone())
            .chain(self.args())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_windowed_arguments() {
        let window = ProcessingWindow::new(
            NaiveDate::from_ymd_opt(2024, 3, 13).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
        );
        let cmd = ProcessingCommand::windowed(
            "main_process_data.py",
            "rad4alp_gc_PHA.txt",
            window,
            "000001",
            "240000",
            "A",
        );

        assert_eq!(
            cmd.args(),
            vec![
                "rad4alp_gc_PHA.txt",
                "20240313",
                "20240314",
                "--starttime",
                "000001",
                "--endtime",
                "240000",
                "-i",
                "A",
            ]
        );
    }

    #[test]
    fn test_plain_arguments() {
        let cmd = ProcessingCommand::plain("main_process_data.py", "rad4alp_intercomp.txt", "intercomp");
        assert_eq!(cmd.args(), vec!["rad4alp_intercomp.txt", "-i", "intercomp"]);
        assert_eq!(
            cmd.command_line(),
            "main_process_data.py rad4alp_intercomp.txt -i intercomp"
        );
    }
}
