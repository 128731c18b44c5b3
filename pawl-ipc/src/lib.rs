//! Wire protocol for Pawl job execution
//!
//! This crate defines the two value objects that cross the remote-execution
//! boundary, [`JobDescriptor`] and [`JobResult`], together with the binary
//! codec that serializes them and the framed byte-stream transports that
//! carry them. The format is private and unversioned: field order is fixed
//! and both ends must change together.

pub mod codec;
pub mod error;
pub mod job;
pub mod transport;

// Re-export commonly used types
pub use codec::{WireReader, WireWriter};
pub use error::{IpcError, WireError};
pub use job::{JobDescriptor, JobResult};
pub use transport::{
    duplex_pair, ChildProcessTransport, DuplexTransport, FramedTransport, JobTransport,
    StdioTransport, MAX_FRAME_LEN,
};
