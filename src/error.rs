use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::ResourceType;

/// Failure reported by the identity/mission-protocol collaborator.
///
/// Always recoverable: no simulation state is touched when one of these is
/// returned, and the caller may retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("protocol call `{call}` timed out")]
    Timeout { call: &'static str },
    #[error("protocol call `{call}` rejected: {reason}")]
    Rejected { call: &'static str, reason: String },
    #[error("protocol collaborator unavailable")]
    Unavailable,
}

/// What kind of object an unknown id was supposed to name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Dao,
    Territory,
    Unit,
    Mission,
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RefKind::Dao => "dao",
            RefKind::Territory => "territory",
            RefKind::Unit => "unit",
            RefKind::Mission => "mission",
        };
        f.write_str(name)
    }
}

/// Rejection of a single request. Never fatal to the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("insufficient {resource}: need {required}, have {available}")]
    InsufficientResources {
        resource: ResourceType,
        required: f64,
        available: f64,
    },

    #[error("unknown or unusable {kind} `{id}`")]
    InvalidReference { kind: RefKind, id: String },

    #[error("invalid transition for {subject}: {from} -> {to}")]
    InvalidTransition {
        subject: String,
        from: String,
        to: String,
    },

    #[error("simulation engine has stopped")]
    EngineStopped,
}

impl SimError {
    pub fn invalid_ref(kind: RefKind, id: impl Into<String>) -> Self {
        SimError::InvalidReference {
            kind,
            id: id.into(),
        }
    }
}

pub type SimResult<T> = Result<T, SimError>;

/// Why a simulation could not be built from a state and config.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid game state: {0}")]
    State(String),
    #[error("failed to start simulation thread: {0}")]
    Spawn(#[from] std::io::Error),
}
