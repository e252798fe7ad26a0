//! Check command implementation.
//!
//! The `cairn check` command acquires every capability and prints the
//! verdict, then keeps the terminal open for a moment so the result is
//! readable when the tool is launched from a double-click or a scheduler.

use std::time::Duration;

use crate::capability::{CapabilityRegistry, CapabilityStatus, EnvironmentChecker, LoaderProbe};
use crate::capability::status::EnvironmentReport;
use crate::cli::args::CheckArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Banner printed before any checking happens.
const BANNER: &str = "STARTING YOUR JOB";

// Verdict lines are matched verbatim by wrapper scripts; do not reword.
// The double space after the bang is intentional.
const SUCCESS_VERDICT: &str = "You did it!  You got the right environment";
const FAILURE_VERDICT: &str = "You probably got the wrong environment";
const FAREWELL: &str = "Goodbye";

/// The check command implementation.
pub struct CheckCommand {
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(args: CheckArgs) -> Self {
        Self { args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    /// Render a finished report and pause.
    ///
    /// Split from `execute` so tests can drive it with a canned report.
    fn report(&self, ui: &mut dyn UserInterface, report: &EnvironmentReport) -> Result<CommandResult> {
        if self.args.json {
            let json = serde_json::to_string_pretty(report).map_err(anyhow::Error::from)?;
            ui.message(&json);
            self.pause();
            return Ok(CommandResult::success());
        }

        if ui.output_mode().shows_detail() {
            for outcome in &report.outcomes {
                match &outcome.status {
                    CapabilityStatus::Acquired { path } => {
                        ui.success(&format!("{} acquired at {}", outcome.capability, path.display()));
                    }
                    CapabilityStatus::Missing { hint } => {
                        let mut line = format!("{} not found", outcome.capability);
                        if let Some(hint) = hint {
                            line.push_str(": ");
                            line.push_str(hint);
                        }
                        ui.warning(&line);
                    }
                    CapabilityStatus::Faulted { message } => {
                        ui.error(&format!("{} check faulted: {}", outcome.capability, message));
                    }
                }
            }
        }

        // Whatever went wrong, the user gets the plain verdict and a
        // normal exit. Detail stays behind --verbose and --json.
        if report.all_acquired() {
            ui.message(SUCCESS_VERDICT);
            self.pause();
            ui.message(FAREWELL);
        } else {
            ui.message(FAILURE_VERDICT);
            self.pause();
        }

        Ok(CommandResult::success())
    }

    fn pause(&self) {
        let delay = Duration::from_secs(self.args.pause);
        if delay.is_zero() {
            return;
        }
        tracing::debug!("pausing {}s before exit", delay.as_secs());
        std::thread::sleep(delay);
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.message(BANNER);

        let registry = CapabilityRegistry::new();
        let probe = LoaderProbe::run();
        let mut checker = EnvironmentChecker::new(&registry, &probe);
        let report = checker.check_environment();

        self.report(ui, &report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::status::CapabilityOutcome;
    use crate::ui::{MockUI, OutputMode};
    use std::path::PathBuf;

    fn no_pause() -> CheckArgs {
        CheckArgs {
            pause: 0,
            json: false,
        }
    }

    fn acquired(name: &str) -> CapabilityOutcome {
        CapabilityOutcome {
            capability: name.to_string(),
            status: CapabilityStatus::Acquired {
                path: PathBuf::from("/usr/lib/libgdal.so"),
            },
        }
    }

    fn missing(name: &str) -> CapabilityOutcome {
        CapabilityOutcome {
            capability: name.to_string(),
            status: CapabilityStatus::Missing {
                hint: Some("Install it".to_string()),
            },
        }
    }

    fn faulted(name: &str) -> CapabilityOutcome {
        CapabilityOutcome {
            capability: name.to_string(),
            status: CapabilityStatus::Faulted {
                message: "cannot read /opt/gdal".to_string(),
            },
        }
    }

    #[test]
    fn success_report_prints_verdict_then_farewell() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::new();
        let report = EnvironmentReport {
            outcomes: vec![acquired("gdal"), acquired("proj")],
        };

        let result = cmd.report(&mut ui, &report).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(
            ui.messages(),
            &[
                "You did it!  You got the right environment".to_string(),
                "Goodbye".to_string(),
            ]
        );
    }

    #[test]
    fn failure_report_prints_only_failure_verdict() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::new();
        let report = EnvironmentReport {
            outcomes: vec![missing("gdal"), missing("proj")],
        };

        let result = cmd.report(&mut ui, &report).unwrap();

        // Failure still exits zero.
        assert!(result.success);
        assert_eq!(result.exit_code, 0);
        assert_eq!(
            ui.messages(),
            &["You probably got the wrong environment".to_string()]
        );
    }

    #[test]
    fn one_gap_is_reported_identically_to_all_gaps() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::new();
        let report = EnvironmentReport {
            outcomes: vec![acquired("gdal"), missing("proj")],
        };

        cmd.report(&mut ui, &report).unwrap();

        assert_eq!(
            ui.messages(),
            &["You probably got the wrong environment".to_string()]
        );
    }

    #[test]
    fn faulted_acquisition_is_a_plain_failure() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::new();
        let report = EnvironmentReport {
            outcomes: vec![faulted("gdal"), acquired("proj")],
        };

        let result = cmd.report(&mut ui, &report).unwrap();

        assert!(result.success);
        assert_eq!(
            ui.messages(),
            &["You probably got the wrong environment".to_string()]
        );
        assert!(ui.errors().is_empty());
    }

    #[test]
    fn verbose_mode_lists_each_capability() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        let report = EnvironmentReport {
            outcomes: vec![acquired("gdal"), missing("proj"), faulted("geos")],
        };

        cmd.report(&mut ui, &report).unwrap();

        assert!(ui.successes().iter().any(|m| m.contains("gdal acquired at")));
        assert!(ui.warnings().iter().any(|m| m.contains("proj not found: Install it")));
        assert!(ui.errors().iter().any(|m| m.contains("geos check faulted")));
    }

    #[test]
    fn json_report_replaces_verdict_lines() {
        let cmd = CheckCommand::new(CheckArgs {
            pause: 0,
            json: true,
        });
        let mut ui = MockUI::new();
        let report = EnvironmentReport {
            outcomes: vec![acquired("gdal"), missing("proj")],
        };

        cmd.report(&mut ui, &report).unwrap();

        assert_eq!(ui.messages().len(), 1);
        let json = &ui.messages()[0];
        assert!(json.contains("\"gdal\""));
        assert!(json.contains("\"missing\""));
        assert!(!json.contains("wrong environment"));
    }

    #[test]
    fn execute_prints_banner_first() {
        let cmd = CheckCommand::new(no_pause());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        // Whatever the host has installed, the banner leads and the
        // command exits zero.
        assert!(result.success);
        assert_eq!(ui.messages()[0], "STARTING YOUR JOB");
    }

    #[test]
    fn args_accessor_returns_args() {
        let cmd = CheckCommand::new(no_pause());
        assert_eq!(cmd.args().pause, 0);
    }
}
