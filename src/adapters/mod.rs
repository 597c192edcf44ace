//! [`VisionNamer`](crate::ports::VisionNamer) implementations.
//!
//! `live` talks to a chat completions endpoint. `recording` wraps any namer
//! and writes each call to a cassette, and `replaying` serves those calls back
//! with their recorded latency.

pub mod live;
pub mod recording;
pub mod replaying;
