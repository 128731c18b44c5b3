//! IPC and wire-format error types

use thiserror::Error;

/// Malformed bytes encountered while encoding or decoding wire values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    /// Ran out of bytes mid-value
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// String bytes were not valid UTF-8
    #[error("invalid UTF-8 in string value")]
    InvalidUtf8,

    /// A length prefix did not terminate within its maximum width
    #[error("length prefix overflow")]
    LengthOverflow,

    /// A collection count was negative
    #[error("negative collection count: {0}")]
    NegativeCount(i32),

    /// A collection was too large to encode
    #[error("collection of {0} entries exceeds the wire limit")]
    CollectionTooLarge(usize),
}

/// Transport-level IPC errors
#[derive(Debug, Error)]
pub enum IpcError {
    /// IO error
    #[error("IO error: {0}")]
    IoError(String),

    /// Peer closed the stream between frames
    #[error("connection closed")]
    ConnectionClosed,

    /// Frame length prefix exceeds the configured maximum
    #[error("frame of {len} bytes exceeds maximum of {max}")]
    FrameTooLarge { len: usize, max: usize },

    /// Payload failed to encode or decode
    #[error("wire format error: {0}")]
    Wire(#[from] WireError),
}

impl IpcError {
    /// Whether this error indicates an unrecoverable stream state.
    ///
    /// The format is unversioned and has no resynchronization point, so a
    /// malformed frame poisons the connection.
    pub fn is_fatal(&self) -> bool {
        matches!(self, IpcError::Wire(_) | IpcError::FrameTooLarge { .. })
    }
}

impl From<std::io::Error> for IpcError {
    fn from(err: std::io::Error) -> Self {
        IpcError::IoError(err.to_string())
    }
}
