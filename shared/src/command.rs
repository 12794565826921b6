use serde::{Deserialize, Serialize};

/// Input accepted by the simulation between ticks.
///
/// At most one command is handled per tick; a tick without input is normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Place one new animal of the species registered under this trigger
    AddSpecies(char),

    /// Stop the simulation after the current tick
    Quit,
}

impl Command {
    pub fn is_quit(&self) -> bool {
        matches!(self, Command::Quit)
    }
}
