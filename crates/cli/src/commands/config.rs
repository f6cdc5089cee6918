//! Configuration commands.

use anyhow::Result;
use ptzkit_config::PtzkitConfig;

use crate::commands::ConfigCommands;
use crate::error::CliError;
use crate::output;

/// Execute config command. `source` names where the config came from.
pub async fn execute(cmd: &ConfigCommands, config: &PtzkitConfig, source: &str, json: bool) -> Result<()> {
    match cmd {
        ConfigCommands::Show => output::print_config(config, json),
        ConfigCommands::Validate => {
            config.validate().map_err(CliError::from)?;
            output::print_config_valid(source, json);
            Ok(())
        }
    }
}
