//! Error types and error handling strategy for Tandem.
//!
//! Error handling follows these principles:
//!
//! - Errors are explicit and typed (no stringly-typed errors)
//! - A closed channel is an expected, designed-for shutdown outcome: it is
//!   always surfaced to the caller, never swallowed inside the crate
//! - Fatal conditions (a lock holder panicked, poisoning the channel state)
//!   indicate the process itself is broken and panic rather than propagate
//!
//! # Recovery Classification
//!
//! All errors can be classified by [`Recoverability`]:
//! - `Transient`: the non-blocking variant could not complete right now;
//!   retrying (or switching to the blocking variant) can succeed
//! - `Permanent`: the channel is closed for good; do not retry

use core::fmt;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Channel is permanently closed.
    ChannelClosed,
    /// Channel is full (non-blocking send would block).
    ChannelFull,
    /// Channel is empty (non-blocking receive would block).
    ChannelEmpty,
}

impl ErrorKind {
    /// Classifies this kind by whether retrying can succeed.
    #[must_use]
    pub const fn recoverability(self) -> Recoverability {
        match self {
            Self::ChannelClosed => Recoverability::Permanent,
            Self::ChannelFull | Self::ChannelEmpty => Recoverability::Transient,
        }
    }
}

/// Whether an error is worth retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recoverability {
    /// Temporary failure, safe to retry.
    Transient,
    /// Unrecoverable, do not retry.
    Permanent,
}

/// A channel error with an optional human-readable message.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
}

impl Error {
    /// Creates an error of the given kind with no message.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Attaches a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the recoverability classification of this error.
    #[must_use]
    pub const fn recoverability(&self) -> Recoverability {
        self.kind.recoverability()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {}

/// Error when sending on a channel.
///
/// Both variants hand the undelivered item back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError<T> {
    /// The channel was closed before the item could be enqueued.
    Closed(T),
    /// Would block (bounded channel is full). Returned only by
    /// [`Channel::try_send`](crate::Channel::try_send).
    Full(T),
}

impl<T> SendError<T> {
    /// Returns the item that could not be sent.
    #[must_use]
    pub fn into_inner(self) -> T {
        match self {
            Self::Closed(item) | Self::Full(item) => item,
        }
    }

    /// Returns true if the channel was closed.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed(_))
    }

    /// Returns true if the channel was full.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        matches!(self, Self::Full(_))
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(_) => write!(f, "sending on a closed channel"),
            Self::Full(_) => write!(f, "sending on a full channel"),
        }
    }
}

impl<T: fmt::Debug> std::error::Error for SendError<T> {}

/// Error when receiving from a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecvError {
    /// The channel is closed and fully drained; no item will ever arrive.
    Closed,
    /// Would block (channel empty). Returned only by
    /// [`Channel::try_recv`](crate::Channel::try_recv).
    Empty,
}

impl RecvError {
    /// Returns true if the channel was closed and drained.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns true if the channel was momentarily empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "receiving on a closed channel"),
            Self::Empty => write!(f, "receiving on an empty channel"),
        }
    }
}

impl std::error::Error for RecvError {}

impl<T> From<SendError<T>> for Error {
    fn from(e: SendError<T>) -> Self {
        match e {
            SendError::Closed(_) => Self::new(ErrorKind::ChannelClosed),
            SendError::Full(_) => Self::new(ErrorKind::ChannelFull),
        }
    }
}

impl From<RecvError> for Error {
    fn from(e: RecvError) -> Self {
        match e {
            RecvError::Closed => Self::new(ErrorKind::ChannelClosed),
            RecvError::Empty => Self::new(ErrorKind::ChannelEmpty),
        }
    }
}

/// A specialized Result type for Tandem operations.
pub type Result<T> = core::result::Result<T, Error>;
