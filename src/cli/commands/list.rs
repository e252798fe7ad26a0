//! List command implementation.
//!
//! The `cairn list` command shows which capabilities the checker probes
//! for, with the platform library file name and the home-override
//! variable for each.

use crate::capability::{platform_library_name, CapabilityRegistry};
use crate::cli::args::ListArgs;
use crate::error::Result;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The list command implementation.
pub struct ListCommand {
    args: ListArgs,
}

impl ListCommand {
    /// Create a new list command.
    pub fn new(args: ListArgs) -> Self {
        Self { args }
    }
}

impl Command for ListCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let registry = CapabilityRegistry::new();

        if self.args.json {
            let defs: Vec<_> = registry.iter().collect();
            let json = serde_json::to_string_pretty(&defs).map_err(anyhow::Error::from)?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        ui.message("Capabilities:");
        for def in registry.iter() {
            let mut line = format!("  {} ({})", def.name, platform_library_name(def.stem));
            if let Some(var) = def.home_var {
                line.push_str(&format!(" [override: {}]", var));
            }
            ui.message(&line);
        }

        Ok(CommandResult::success())
    }
}
