//! Error type for kvdouble commands.
//!
//! Absent keys are never errors; they come back as `None`, `false` or `0`.
//! The only failure a command can report is a read against a key holding a
//! different kind of value.

use thiserror::Error;

use crate::store::Kind;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A read command found a value of another kind under `key`.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value: {key:?} holds a {found}, expected a {expected}")]
    TypeMismatch {
        key: String,
        expected: Kind,
        found: Kind,
    },
}

impl Error {
    pub(crate) fn wrong_type(key: &str, expected: Kind, found: Kind) -> Self {
        Error::TypeMismatch {
            key: key.to_owned(),
            expected,
            found,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
