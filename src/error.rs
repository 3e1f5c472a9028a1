use std::error;
use std::fmt;

use crate::reflect::FieldAccessError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// A required input was absent, or a scalar argument was illegal.
    InvalidArgument(String),
    /// The external type exposes fewer integer fields than the converter needs.
    StructuralMismatch { type_name: String, found: usize },
    /// A field read failed on an accessor that had already been validated.
    Internal {
        type_name: String,
        source: FieldAccessError,
    },
    /// A layout table could not be parsed.
    Table(serde_json::Error),
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Internal { source, .. } => Some(source),
            Self::Table(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(s) => write!(f, "invalid argument: {}", s),
            Self::StructuralMismatch { type_name, found } => write!(
                f,
                "cannot read class {} for its integer fields (found {}, need {})",
                type_name,
                found,
                crate::MIN_INT_FIELDS
            ),
            Self::Internal { type_name, .. } => {
                write!(f, "field access error while reading {}", type_name)
            }
            Self::Table(e) => write!(f, "malformed layout table: {}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Table(e)
    }
}
