//! The outbound boundary of the naming pipeline.
//!
//! The core only knows [`VisionNamer`]; `src/adapters/` decides whether a
//! call goes to the network, to a recorder or to a cassette.

pub mod vision_namer;

pub use vision_namer::{NamingRequest, VisionNamer};
