//! Wire types for the rigup engine protocol.
//!
//! This crate contains the serde-serializable types exchanged with the
//! recognition engine: job status codes, notification payloads, and the
//! argument shapes custom actions receive. These types represent the
//! "protocol layer" - the shapes of data as they cross the engine boundary.
//!
//! # Design Philosophy
//!
//! Types in this crate are:
//! * Pure data: No behavior beyond serialization/deserialization and
//!   code mapping
//! * 1:1 with the engine: Match the engine's numeric codes and JSON
//!   notification schema
//! * Stable: Changes only when the engine's surface changes
//!
//! Higher-level session and action APIs are built on top of these types
//! in `rigup`.

pub mod action;
pub mod notify;
pub mod status;

pub use action::*;
pub use notify::*;
pub use status::*;
