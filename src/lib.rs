//! # Screenflow: Workflow-Event Tracking for Candidate Screening
//!
//! Screenflow is the client-side core of an agentic candidate-screening
//! product. An external pipeline runs the heavy stages (document
//! extraction, scoring, question generation) and pushes lifecycle and
//! token-streaming events over one persistent connection; this crate
//! decodes those events, folds them into a live tree of process nodes for
//! display, and projects two finished runs into durable session data (the
//! extracted candidate profile and the generated interview questions).
//!
//! ## Core Concepts
//!
//! - **Wire events**: typed decoding of the pipeline's JSON records,
//!   including the string-encoded composite keys it uses for routing
//! - **Process tree**: ordered nodes with nested steps and streamed text,
//!   maintained by a pure, single-threaded fold
//! - **Session projections**: candidate-profile merge and interview
//!   question mapping triggered by well-known finished runs
//! - **Event feed**: the receive loop with reconnect/backoff plumbing
//!
//! ## Quick Start
//!
//! ```
//! use screenflow::events::decode_event;
//! use screenflow::tracker::{NodeStatus, ProcessTracker};
//!
//! let mut tracker = ProcessTracker::new();
//!
//! let started = decode_event(
//!     r#"{"type":"RUN_STARTED","runId":"cv_scoring","threadId":"CV Scoring Process"}"#,
//! )
//! .unwrap();
//! tracker.apply(started);
//!
//! let finished = decode_event(
//!     r#"{"type":"RUN_FINISHED","runId":"cv_scoring","threadId":"CV Scoring Process","result":{"score":82}}"#,
//! )
//! .unwrap();
//! tracker.apply(finished);
//!
//! assert_eq!(tracker.nodes()[0].status, NodeStatus::Completed);
//! ```
//!
//! ## Module Guide
//!
//! - [`events`] - Wire contract and composite-key translation
//! - [`tracker`] - Process nodes and the event reducer
//! - [`session`] - Candidate/question projections and the session store
//! - [`stream`] - Connection plumbing: transport, reconnects, feed loop
//! - [`telemetry`] - Tracing subscriber setup

pub mod events;
pub mod session;
pub mod stream;
pub mod telemetry;
pub mod tracker;
