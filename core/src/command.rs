use crate::error::ParseError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Reply sentinel for a poll that found nothing to do
pub const NO_COMMAND: &str = "NONE";

/// Instructions a station device understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StationCommand {
    StartTest,
}

impl StationCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationCommand::StartTest => "START_TEST",
        }
    }
}

impl fmt::Display for StationCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StationCommand {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "START_TEST" => Ok(StationCommand::StartTest),
            other => Err(ParseError::UnknownCommand(other.to_owned())),
        }
    }
}

/// Lifecycle of a queued command.
///
/// `Failed` is part of the persisted enumeration, but nothing transitions
/// into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Pending,
    Completed,
    Failed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Pending => "pending",
            CommandStatus::Completed => "completed",
            CommandStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CommandStatus::Pending),
            "completed" => Ok(CommandStatus::Completed),
            "failed" => Ok(CommandStatus::Failed),
            other => Err(ParseError::UnknownStatus(other.to_owned())),
        }
    }
}

/// The single queue slot of a station
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub station_id: i32,
    pub command: StationCommand,
    pub status: CommandStatus,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

impl CommandRecord {
    pub fn pending(station_id: i32, command: StationCommand, now: DateTime<Utc>) -> Self {
        CommandRecord {
            station_id,
            command,
            status: CommandStatus::Pending,
            created_at: now,
            executed_at: None,
        }
    }

    /// Overwrites the slot with a fresh pending command
    pub fn replace(&mut self, command: StationCommand, now: DateTime<Utc>) {
        self.command = command;
        self.status = CommandStatus::Pending;
        self.created_at = now;
        self.executed_at = None;
    }

    /// Marks a pending command as completed and hands it out.
    /// Any other state yields `None` and leaves the record untouched.
    pub fn claim(&mut self, now: DateTime<Utc>) -> Option<StationCommand> {
        if self.status != CommandStatus::Pending {
            return None;
        }
        self.status = CommandStatus::Completed;
        self.executed_at = Some(now);
        Some(self.command)
    }
}
