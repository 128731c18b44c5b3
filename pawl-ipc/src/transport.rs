//! Framed byte-stream transports
//!
//! Frames are a `u32` little-endian payload length followed by the payload.
//! The transport assumes a reliable, ordered stream; a clean EOF between
//! frames surfaces as [`IpcError::ConnectionClosed`], an EOF inside a frame
//! is an IO error.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadHalf, WriteHalf};

use crate::error::IpcError;

/// Upper bound on a single frame; guards decode against hostile lengths
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

/// Transport carrying whole frames between job executor and worker
#[async_trait]
pub trait JobTransport: Send {
    /// Send one frame
    async fn send(&mut self, frame: &[u8]) -> Result<(), IpcError>;

    /// Receive one frame
    async fn receive(&mut self) -> Result<Bytes, IpcError>;

    /// Close the transport
    async fn close(&mut self) -> Result<(), IpcError>;
}

/// Length-framed transport over any reader/writer pair
pub struct FramedTransport<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> FramedTransport<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }
}

/// Worker-side transport over the process's own stdio
pub type StdioTransport = FramedTransport<tokio::io::Stdin, tokio::io::Stdout>;

impl StdioTransport {
    /// Attach to this process's stdin/stdout.
    ///
    /// Diagnostics must go to stderr; stdout is the wire.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

/// Parent-side transport over a spawned worker's pipes
pub type ChildProcessTransport =
    FramedTransport<tokio::process::ChildStdout, tokio::process::ChildStdin>;

impl ChildProcessTransport {
    pub fn child_process(
        stdout: tokio::process::ChildStdout,
        stdin: tokio::process::ChildStdin,
    ) -> Self {
        Self::new(stdout, stdin)
    }
}

/// In-memory transport for tests and in-process pairs
pub type DuplexTransport =
    FramedTransport<ReadHalf<tokio::io::DuplexStream>, WriteHalf<tokio::io::DuplexStream>>;

/// Connected in-memory transport pair
pub fn duplex_pair(capacity: usize) -> (DuplexTransport, DuplexTransport) {
    let (near, far) = tokio::io::duplex(capacity);
    let (near_read, near_write) = tokio::io::split(near);
    let (far_read, far_write) = tokio::io::split(far);
    (
        FramedTransport::new(near_read, near_write),
        FramedTransport::new(far_read, far_write),
    )
}

#[async_trait]
impl<R, W> JobTransport for FramedTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, frame: &[u8]) -> Result<(), IpcError> {
        if frame.len() > MAX_FRAME_LEN {
            return Err(IpcError::FrameTooLarge {
                len: frame.len(),
                max: MAX_FRAME_LEN,
            });
        }

        log::trace!("sending frame of {} bytes", frame.len());
        self.writer.write_u32_le(frame.len() as u32).await?;
        self.writer.write_all(frame).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<Bytes, IpcError> {
        let mut prefix = [0u8; 4];
        if let Err(err) = self.reader.read_exact(&mut prefix).await {
            // EOF on a frame boundary is a clean shutdown
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                return Err(IpcError::ConnectionClosed);
            }
            return Err(err.into());
        }

        let len = u32::from_le_bytes(prefix) as usize;
        if len > MAX_FRAME_LEN {
            return Err(IpcError::FrameTooLarge {
                len,
                max: MAX_FRAME_LEN,
            });
        }

        let mut frame = vec![0u8; len];
        self.reader.read_exact(&mut frame).await?;
        log::trace!("received frame of {} bytes", len);
        Ok(Bytes::from(frame))
    }

    async fn close(&mut self) -> Result<(), IpcError> {
        self.writer.shutdown().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_frame_round_trip() {
        let (mut near, mut far) = duplex_pair(1024);

        near.send(b"first frame").await.unwrap();
        near.send(b"").await.unwrap();
        near.send(b"third").await.unwrap();

        assert_eq!(&far.receive().await.unwrap()[..], b"first frame");
        assert_eq!(&far.receive().await.unwrap()[..], b"");
        assert_eq!(&far.receive().await.unwrap()[..], b"third");
    }

    #[tokio::test]
    async fn test_clean_close_is_connection_closed() {
        let (mut near, mut far) = duplex_pair(64);

        near.send(b"last").await.unwrap();
        near.close().await.unwrap();

        assert_eq!(&far.receive().await.unwrap()[..], b"last");
        assert!(matches!(
            far.receive().await,
            Err(IpcError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_oversized_send_is_rejected() {
        let (mut near, _far) = duplex_pair(64);
        let huge = vec![0u8; MAX_FRAME_LEN + 1];
        assert!(matches!(
            near.send(&huge).await,
            Err(IpcError::FrameTooLarge { .. })
        ));
    }

    #[tokio::test]
    async fn test_hostile_length_prefix_is_rejected() {
        let (near, mut far) = duplex_pair(64);
        let (_read, mut write) = (near.reader, near.writer);

        // Length prefix far beyond the cap, no payload
        write.write_u32_le(u32::MAX).await.unwrap();
        write.flush().await.unwrap();

        assert!(matches!(
            far.receive().await,
            Err(IpcError::FrameTooLarge { .. })
        ));
    }
}
