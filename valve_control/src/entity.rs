//! Named entity with a state/command register.

use valve_common::state::{CommandCode, StateCode};

/// Identity plus command/state register shared by all controllable devices.
///
/// `state` and `command` are independent. Anyone may write the command
/// register; only the owning device changes the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedStateEntity {
    name: String,
    state: StateCode,
    command: CommandCode,
}

impl NamedStateEntity {
    /// New entity at rest with an empty command register.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: StateCode::Idle,
            command: CommandCode::Idle,
        }
    }

    /// Entity name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state code.
    #[inline]
    pub fn state(&self) -> StateCode {
        self.state
    }

    /// Current content of the command register.
    #[inline]
    pub fn command(&self) -> CommandCode {
        self.command
    }

    /// Overwrite the command register. Always succeeds: acceptance is into
    /// the register, not execution.
    pub fn set_command(&mut self, command: CommandCode) -> bool {
        self.command = command;
        true
    }

    /// Set the state code. Owner only.
    #[inline]
    pub(crate) fn set_state(&mut self, state: StateCode) {
        self.state = state;
    }
}
