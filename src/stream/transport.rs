use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

use super::config::ScreeningRequest;

/// Errors surfaced by an [`EventTransport`].
#[derive(Debug, Error, Diagnostic)]
pub enum TransportError {
    /// The connection dropped; the feed may reconnect.
    #[error("event channel disconnected")]
    #[diagnostic(code(screenflow::stream::disconnected))]
    Disconnected,

    /// Connecting (or re-connecting) failed outright.
    #[error("failed to open event channel: {reason}")]
    #[diagnostic(code(screenflow::stream::connect))]
    Connect { reason: String },
}

impl TransportError {
    pub fn connect(reason: impl Into<String>) -> Self {
        Self::Connect {
            reason: reason.into(),
        }
    }
}

/// Message-oriented source of raw JSON frames from the pipeline.
///
/// Implementations own the socket (or whatever carries the frames); the
/// feed loop only ever sees text frames. `connect` sends the initiating
/// payload, and is called again on every reconnect attempt.
#[async_trait]
pub trait EventTransport: Send {
    async fn connect(&mut self, request: &ScreeningRequest) -> Result<(), TransportError>;

    /// Next frame; `Ok(None)` signals a clean end of stream,
    /// [`TransportError::Disconnected`] an abnormal drop.
    async fn next_frame(&mut self) -> Result<Option<String>, TransportError>;
}

/// Transport backed by an in-process channel.
///
/// Drives the feed in tests and anywhere frames arrive from another task
/// rather than a socket: whoever holds the sender plays the pipeline.
pub struct ChannelTransport {
    frames: flume::Receiver<String>,
}

impl ChannelTransport {
    /// Create the transport plus the sender that feeds it.
    pub fn new() -> (flume::Sender<String>, Self) {
        let (tx, rx) = flume::unbounded();
        (tx, Self { frames: rx })
    }
}

#[async_trait]
impl EventTransport for ChannelTransport {
    async fn connect(&mut self, _request: &ScreeningRequest) -> Result<(), TransportError> {
        Ok(())
    }

    async fn next_frame(&mut self) -> Result<Option<String>, TransportError> {
        match self.frames.recv_async().await {
            Ok(frame) => Ok(Some(frame)),
            // All senders dropped: the in-process pipeline is done.
            Err(flume::RecvError::Disconnected) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channel_transport_yields_frames_then_ends_cleanly() {
        let (tx, mut transport) = ChannelTransport::new();
        tx.send("frame-1".to_string()).unwrap();
        drop(tx);

        let request = ScreeningRequest::for_upload("cv.pdf", b"x");
        transport.connect(&request).await.unwrap();
        assert_eq!(transport.next_frame().await.unwrap().as_deref(), Some("frame-1"));
        assert_eq!(transport.next_frame().await.unwrap(), None);
    }
}
