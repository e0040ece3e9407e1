//! Shared helpers for the veld benchmark suite.

#![forbid(unsafe_code)]
#![allow(missing_docs)]

use veld_core::{Command, CommandError};
use veld_engine::entity::Player;

/// A command that does nothing, for isolating queue overhead from
/// command bodies.
pub struct NopCommand;

impl Command<Player> for NopCommand {
    fn name(&self) -> &str {
        "nop"
    }

    fn execute(&mut self, _actor: &mut Player) -> Result<(), CommandError> {
        Ok(())
    }
}
