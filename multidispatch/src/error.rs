//! Crate-level error type.

use multidispatch_runtime::RuntimeError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::dispatch::DispatchError;
use crate::types::{ConformanceMismatch, TypeError};

/// Any error raised by this crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    Conformance(#[from] ConformanceMismatch),

    #[error(transparent)]
    Type(#[from] TypeError),

    /// Raised by an implementation while it ran
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
