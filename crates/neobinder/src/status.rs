//! # Status Codes
//!
//! The outcome of a transaction. Success is `Ok(())`; every failure is a
//! `StatusCode`. Raw numbering follows the binder convention (negated errno
//! values, plus a block of codes based at `i32::MIN`) so statuses can cross a
//! process boundary as a plain `i32` and come back unchanged.

use std::fmt;

/// Raw value of a successful status.
pub const STATUS_OK: i32 = 0;

const UNKNOWN_ERROR: i32 = i32::MIN;

/// Failure statuses reported by this layer, the transport, or a handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    UnknownError,
    NoMemory,
    /// The operation is not valid for this object (e.g. unassociated proxy).
    InvalidOperation,
    BadValue,
    BadType,
    NameNotFound,
    PermissionDenied,
    NoInit,
    AlreadyExists,
    /// The remote object is gone.
    DeadObject,
    FailedTransaction,
    BadIndex,
    NotEnoughData,
    WouldBlock,
    TimedOut,
    /// The code is not a user code, or the object does not understand it.
    UnknownTransaction,
    FdsNotAllowed,
    UnexpectedNull,
    /// A handler-defined status with no named counterpart.
    ///
    /// Build it with `StatusCode::other` so it never holds `STATUS_OK` or a
    /// named code's raw value.
    Other(i32),
}

impl StatusCode {
    /// Normalizes a handler-defined raw value into a failure status.
    ///
    /// Named raw values map to their named variant; `STATUS_OK` maps to
    /// `UnknownError` since a failure must never read back as success.
    pub fn other(raw: i32) -> Self {
        match Self::from_raw(raw) {
            Ok(()) => Self::UnknownError,
            Err(status) => status,
        }
    }

    /// Returns the raw wire value for this status.
    ///
    /// Never returns `STATUS_OK`: an `Other(0)` built by hand encodes as
    /// `UnknownError`.
    pub fn to_raw(self) -> i32 {
        match self {
            Self::UnknownError => UNKNOWN_ERROR,
            Self::NoMemory => -12,
            Self::InvalidOperation => -38,
            Self::BadValue => -22,
            Self::BadType => UNKNOWN_ERROR + 1,
            Self::NameNotFound => -2,
            Self::PermissionDenied => -1,
            Self::NoInit => -19,
            Self::AlreadyExists => -17,
            Self::DeadObject => -32,
            Self::FailedTransaction => UNKNOWN_ERROR + 2,
            Self::BadIndex => -75,
            Self::NotEnoughData => -61,
            Self::WouldBlock => -11,
            Self::TimedOut => -62,
            Self::UnknownTransaction => -74,
            Self::FdsNotAllowed => UNKNOWN_ERROR + 7,
            Self::UnexpectedNull => UNKNOWN_ERROR + 8,
            Self::Other(STATUS_OK) => UNKNOWN_ERROR,
            Self::Other(raw) => raw,
        }
    }

    /// Interprets a raw wire value. `STATUS_OK` becomes `Ok(())`.
    pub fn from_raw(raw: i32) -> Result<()> {
        let status = match raw {
            STATUS_OK => return Ok(()),
            UNKNOWN_ERROR => Self::UnknownError,
            -12 => Self::NoMemory,
            -38 => Self::InvalidOperation,
            -22 => Self::BadValue,
            r if r == UNKNOWN_ERROR + 1 => Self::BadType,
            -2 => Self::NameNotFound,
            -1 => Self::PermissionDenied,
            -19 => Self::NoInit,
            -17 => Self::AlreadyExists,
            -32 => Self::DeadObject,
            r if r == UNKNOWN_ERROR + 2 => Self::FailedTransaction,
            -75 => Self::BadIndex,
            -61 => Self::NotEnoughData,
            -11 => Self::WouldBlock,
            -62 => Self::TimedOut,
            -74 => Self::UnknownTransaction,
            r if r == UNKNOWN_ERROR + 7 => Self::FdsNotAllowed,
            r if r == UNKNOWN_ERROR + 8 => Self::UnexpectedNull,
            other => Self::Other(other),
        };
        Err(status)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownError => write!(f, "unknown error"),
            Self::NoMemory => write!(f, "out of memory"),
            Self::InvalidOperation => write!(f, "invalid operation"),
            Self::BadValue => write!(f, "bad value"),
            Self::BadType => write!(f, "bad type"),
            Self::NameNotFound => write!(f, "name not found"),
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::NoInit => write!(f, "not initialized"),
            Self::AlreadyExists => write!(f, "already exists"),
            Self::DeadObject => write!(f, "dead object"),
            Self::FailedTransaction => write!(f, "failed transaction"),
            Self::BadIndex => write!(f, "bad index"),
            Self::NotEnoughData => write!(f, "not enough data"),
            Self::WouldBlock => write!(f, "would block"),
            Self::TimedOut => write!(f, "timed out"),
            Self::UnknownTransaction => write!(f, "unknown transaction"),
            Self::FdsNotAllowed => write!(f, "file descriptors not allowed"),
            Self::UnexpectedNull => write!(f, "unexpected null"),
            Self::Other(raw) => write!(f, "status {}", raw),
        }
    }
}

impl std::error::Error for StatusCode {}

/// A specialized Result type for transactions.
pub type Result<T> = std::result::Result<T, StatusCode>;
