//! Target allocation CLI commands

use clap::Subcommand;

use crate::display::format_target;
use crate::error::FireResult;
use crate::models::TargetMix;
use crate::storage::Storage;

/// Target subcommands
#[derive(Subcommand)]
pub enum TargetCommands {
    /// Set the target mix; percentages must sum to 100
    Set {
        /// Stocks percentage
        stocks: f64,
        /// Bonds percentage
        bonds: f64,
        /// Cash percentage
        cash: f64,
    },
    /// Show the target mix
    Show,
}

/// Handle a target command
pub fn handle_target_command(storage: &Storage, cmd: TargetCommands) -> FireResult<()> {
    match cmd {
        TargetCommands::Set {
            stocks,
            bonds,
            cash,
        } => {
            let mix = TargetMix::new(stocks, bonds, cash);
            storage.targets.set(mix)?;
            storage.targets.save()?;
            print!("{}", format_target(Some(&mix)));
        }

        TargetCommands::Show => {
            print!("{}", format_target(storage.targets.get()?.as_ref()));
        }
    }

    Ok(())
}
