//! Maintenance commands for a [`PostureDescriber`].
//!
//! The typed [`PostureCommand`]/[`PostureResponse`] pair is the API; the
//! line-based text protocol ([`send_command`]) is a thin adapter on top of it.

use std::fmt;
use std::str::FromStr;

use crate::describer::PostureDescriber;
use crate::error::{CommandError, PostureError};

/// A request to a describer.
#[derive(Debug, Clone, PartialEq)]
pub enum PostureCommand {
    SetPostureValueThreshold(f64),
    GetPostureValueThreshold,
    GetArmIndices,
}

/// The answer to a [`PostureCommand`].
#[derive(Debug, Clone, PartialEq)]
pub enum PostureResponse {
    Ok,
    Threshold(f64),
    ArmIndices(Vec<usize>),
}

impl PostureDescriber {
    /// Execute a typed command.
    pub fn handle_command(&self, command: &PostureCommand) -> Result<PostureResponse, PostureError> {
        match *command {
            PostureCommand::SetPostureValueThreshold(tol) => {
                self.set_posture_value_threshold(tol)?;
                Ok(PostureResponse::Ok)
            }
            PostureCommand::GetPostureValueThreshold => {
                Ok(PostureResponse::Threshold(self.posture_value_threshold()))
            }
            PostureCommand::GetArmIndices => {
                Ok(PostureResponse::ArmIndices(self.arm_indices().to_vec()))
            }
        }
    }
}

impl FromStr for PostureCommand {
    type Err = CommandError;

    /// Parse `"<Command> [argument]"`; command names are case-insensitive.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::Empty)?;
        let argument = tokens.next();

        let command = match name.to_ascii_lowercase().as_str() {
            "setposturevaluethreshold" => {
                let value = argument.ok_or_else(|| CommandError::MissingArgument {
                    command: name.into(),
                })?;
                let tol = value.parse().map_err(|_| CommandError::InvalidArgument {
                    command: name.into(),
                    value: value.into(),
                })?;
                Self::SetPostureValueThreshold(tol)
            }
            "getposturevaluethreshold" => Self::GetPostureValueThreshold,
            "getarmindices" => Self::GetArmIndices,
            _ => return Err(CommandError::UnknownCommand(name.into())),
        };

        let extra = match command {
            Self::SetPostureValueThreshold(_) => tokens.next(),
            _ => argument,
        };
        if let Some(value) = extra {
            return Err(CommandError::UnexpectedArgument {
                command: name.into(),
                value: value.into(),
            });
        }
        Ok(command)
    }
}

impl fmt::Display for PostureResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => Ok(()),
            Self::Threshold(tol) => write!(f, "{tol}"),
            Self::ArmIndices(indices) => {
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{index}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse `line`, run it against `describer` and render the response.
pub fn send_command(describer: &PostureDescriber, line: &str) -> Result<String, CommandError> {
    let command: PostureCommand = line.parse()?;
    let response = describer.handle_command(&command)?;
    Ok(response.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
