//! # Teleop Drive Library
//!
//! Drive a steered differential-drive rover from a USB gamepad.
//!
//! This library turns raw evdev controller events into motor commands: a
//! proportional steering axis with a runtime trim offset, edge-triggered
//! forward/reverse/brake buttons, and horn buttons.

pub mod actuator;
pub mod audio;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod lifecycle;
pub mod steering;
