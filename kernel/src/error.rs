use std::fmt::Display;

use error_stack::Context;
use vodca::{AsRefln, Fromln};

#[derive(Debug)]
pub enum KernelError {
    Validation,
    NotFound,
    Conflict,
    Concurrency,
    Timeout,
    Internal,
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Validation => write!(f, "Invalid input"),
            KernelError::NotFound => write!(f, "Entity not found"),
            KernelError::Conflict => write!(f, "Constraint conflict"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

/// Report attachment carrying a message that may be shown to the caller as is.
#[derive(Debug, Clone, Eq, PartialEq, Fromln, AsRefln)]
pub struct PublicMessage(String);

impl PublicMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
