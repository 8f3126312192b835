//! Connection plumbing between the screening pipeline and the tracker.
//!
//! The pipeline pushes JSON frames over one persistent connection that is
//! opened with an initiating payload ([`ScreeningRequest`]). Transport
//! details live behind [`EventTransport`]; [`EventFeed`] owns the receive
//! loop, the reducer fold, the session projections, and reconnects with
//! exponential backoff when the transport drops.

mod config;
mod feed;
mod transport;

pub use config::{ScreeningPayload, ScreeningRequest, StreamConfig};
pub use feed::{EventFeed, FeedError, FeedOutcome};
pub use transport::{ChannelTransport, EventTransport, TransportError};
