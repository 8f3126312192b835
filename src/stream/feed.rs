use miette::Diagnostic;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::events::decode_event;
use crate::session::SessionStore;
use crate::tracker::{ProcessNode, ProcessTracker};

use super::config::{ScreeningRequest, StreamConfig};
use super::transport::{EventTransport, TransportError};

/// Errors that terminate a feed run.
#[derive(Debug, Error, Diagnostic)]
pub enum FeedError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Transport(#[from] TransportError),

    /// The transport kept dropping and the reconnect budget ran out.
    #[error("event channel lost after {attempts} reconnect attempts")]
    #[diagnostic(code(screenflow::stream::reconnect_exhausted))]
    ReconnectExhausted { attempts: u32 },
}

/// Final state of a completed feed run.
#[derive(Debug)]
pub struct FeedOutcome {
    pub nodes: Vec<ProcessNode>,
    pub store: SessionStore,
}

/// Receive loop for one screening session.
///
/// Owns the tracker and the session store; every decoded event is folded
/// into the tracker, projections are applied to the store, and the latest
/// node collection is published on a `watch` channel so the display layer
/// can take snapshot reads without touching the loop.
pub struct EventFeed<T> {
    config: StreamConfig,
    transport: T,
    tracker: ProcessTracker,
    store: SessionStore,
    nodes_tx: watch::Sender<Vec<ProcessNode>>,
}

impl<T: EventTransport> EventFeed<T> {
    /// Build a feed and the receiver for node-collection snapshots.
    pub fn new(
        config: StreamConfig,
        transport: T,
        store: SessionStore,
    ) -> (Self, watch::Receiver<Vec<ProcessNode>>) {
        let (nodes_tx, nodes_rx) = watch::channel(Vec::new());
        (
            Self {
                config,
                transport,
                tracker: ProcessTracker::new(),
                store,
                nodes_tx,
            },
            nodes_rx,
        )
    }

    /// Run the feed to completion: connect with the initiating payload,
    /// fold frames until the stream ends cleanly, reconnecting with
    /// exponential backoff while the budget lasts.
    pub async fn run(mut self, request: &ScreeningRequest) -> Result<FeedOutcome, FeedError> {
        self.store.create_session(&request.run_id);
        self.transport.connect(request).await?;
        info!(run_id = %request.run_id, endpoint = %self.config.endpoint, "event feed connected");

        let mut attempt = 0u32;
        loop {
            match self.transport.next_frame().await {
                Ok(Some(frame)) => {
                    attempt = 0;
                    self.handle_frame(&request.run_id, &frame);
                }
                Ok(None) => break,
                Err(TransportError::Disconnected) => {
                    // A failed reconnect burns an attempt too; only a
                    // successful connect resumes the frame loop.
                    loop {
                        attempt += 1;
                        if attempt > self.config.max_reconnect_attempts {
                            return Err(FeedError::ReconnectExhausted {
                                attempts: self.config.max_reconnect_attempts,
                            });
                        }
                        let delay = self.config.reconnect_delay(attempt);
                        info!(attempt, delay_ms = delay.as_millis() as u64, "event channel dropped, reconnecting");
                        tokio::time::sleep(delay).await;
                        match self.transport.connect(request).await {
                            Ok(()) => break,
                            Err(err) => debug!(error = %err, "reconnect attempt failed"),
                        }
                    }
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!(run_id = %request.run_id, nodes = self.tracker.nodes().len(), "event feed finished");
        Ok(FeedOutcome {
            nodes: self.tracker.snapshot(),
            store: self.store,
        })
    }

    fn handle_frame(&mut self, session_id: &str, frame: &str) {
        match decode_event(frame) {
            Ok(event) => {
                if let Some(effect) = self.tracker.apply(event) {
                    self.store.apply_effect(session_id, &effect);
                }
                self.nodes_tx.send_replace(self.tracker.snapshot());
            }
            Err(err) => {
                debug!(error = %err, "skipping undecodable frame");
            }
        }
    }
}
