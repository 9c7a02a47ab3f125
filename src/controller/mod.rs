//! # Controller Module
//!
//! Gamepad input handling.
//!
//! This module handles:
//! - Opening the gamepad's evdev node
//! - Streaming raw input events
//! - Classifying events into steering, trim, drive and sound controls

pub mod event;
pub mod gamepad;

use crate::error::Result;
use event::RawEvent;

/// Source of raw controller events
///
/// Blocks (asynchronously) until the next event is available. A returned error
/// ends the stream.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    /// Wait for the next raw event
    async fn next_event(&mut self) -> Result<RawEvent>;
}
