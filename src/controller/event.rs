//! # Controller Event Classifier
//!
//! Turns raw evdev `(type, code, value)` samples into the handful of control
//! events the vehicle understands. Everything else is dropped here.
//!
//! ## Axis Codes (EV_ABS)
//!
//! | Axis | evdev Code | Range | Description |
//! |------|------------|-------|-------------|
//! | Left Stick X | ABS_X | 0-255 | Steering |
//! | D-Pad X | ABS_HAT0X | -1/0/1 | Trim left/released/right |
//!
//! ## Button Codes (EV_KEY)
//!
//! | Button | evdev Code | Description |
//! |--------|------------|-------------|
//! | ZR | BTN_TR2 | Forward |
//! | Select | BTN_SELECT | Reverse |
//! | ZL | BTN_TL2 | Brake |
//! | A | BTN_SOUTH | Horn |
//! | B | BTN_EAST | Horn 2 |
//! | X | BTN_WEST | Stop sound |
//!
//! ## Usage
//!
//! ```
//! use teleop_drive::controller::event::{classify, ControlEvent, RawEvent, STEERING_AXIS};
//!
//! let event = RawEvent::absolute(STEERING_AXIS, 200);
//! assert_eq!(classify(&event), Some(ControlEvent::Steering(200)));
//! ```

use evdev::{EventType, InputEvent};

use crate::steering::trim::TrimDirection;

/// Left stick X axis (ABS_X).
pub const STEERING_AXIS: u16 = 0;
/// D-Pad X axis (ABS_HAT0X).
pub const TRIM_AXIS: u16 = 16;

/// ZR (BTN_TR2).
pub const FORWARD_KEY: u16 = 313;
/// Select (BTN_SELECT).
pub const REVERSE_KEY: u16 = 314;
/// ZL (BTN_TL2).
pub const BRAKE_KEY: u16 = 312;
/// A (BTN_SOUTH).
pub const HORN_KEY: u16 = 304;
/// B (BTN_EAST).
pub const HORN2_KEY: u16 = 305;
/// X (BTN_WEST).
pub const STOP_SOUND_KEY: u16 = 308;

/// Event type of a raw sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// EV_ABS
    Absolute,
    /// EV_KEY
    Key,
    /// Sync, misc, and anything else the device reports
    Other,
}

/// One raw sample from the input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    /// Creates an EV_ABS sample.
    #[must_use]
    pub fn absolute(code: u16, value: i32) -> Self {
        Self { kind: EventKind::Absolute, code, value }
    }

    /// Creates an EV_KEY sample.
    #[must_use]
    pub fn key(code: u16, value: i32) -> Self {
        Self { kind: EventKind::Key, code, value }
    }
}

impl From<&InputEvent> for RawEvent {
    fn from(event: &InputEvent) -> Self {
        let event_type = event.event_type();
        let kind = if event_type == EventType::ABSOLUTE {
            EventKind::Absolute
        } else if event_type == EventType::KEY {
            EventKind::Key
        } else {
            EventKind::Other
        };

        Self {
            kind,
            code: event.code(),
            value: event.value(),
        }
    }
}

/// Edge reported by a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
}

impl KeyState {
    /// Maps 0 to released and 1 to pressed. Auto-repeat (2) and other values map to `None`.
    #[must_use]
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Released),
            1 => Some(Self::Pressed),
            _ => None,
        }
    }
}

/// Drive buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveControl {
    Forward,
    Reverse,
    Brake,
}

/// Sound buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundAction {
    /// Play the first horn sample.
    Horn,
    /// Play the second horn sample.
    Horn2,
    /// Stop whatever is playing.
    Stop,
}

/// A classified controller event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Raw steering stick sample (0-255).
    Steering(i32),
    /// D-pad trim press. Releases never produce this.
    Trim(TrimDirection),
    Drive(DriveControl, KeyState),
    Sound(SoundAction, KeyState),
}

/// Classifies a raw sample, or returns `None` when the sample is not a control.
///
/// # Examples
///
/// ```
/// use teleop_drive::controller::event::{classify, RawEvent, TRIM_AXIS};
///
/// // D-pad returning to rest is not a trim event
/// assert_eq!(classify(&RawEvent::absolute(TRIM_AXIS, 0)), None);
/// ```
#[must_use]
pub fn classify(event: &RawEvent) -> Option<ControlEvent> {
    match event.kind {
        EventKind::Absolute => classify_axis(event.code, event.value),
        EventKind::Key => classify_key(event.code, event.value),
        EventKind::Other => None,
    }
}

fn classify_axis(code: u16, value: i32) -> Option<ControlEvent> {
    match code {
        STEERING_AXIS => Some(ControlEvent::Steering(value)),
        TRIM_AXIS => TrimDirection::from_value(value).map(ControlEvent::Trim),
        _ => None,
    }
}

fn classify_key(code: u16, value: i32) -> Option<ControlEvent> {
    let state = KeyState::from_value(value)?;

    let event = match code {
        FORWARD_KEY => ControlEvent::Drive(DriveControl::Forward, state),
        REVERSE_KEY => ControlEvent::Drive(DriveControl::Reverse, state),
        BRAKE_KEY => ControlEvent::Drive(DriveControl::Brake, state),
        HORN_KEY => ControlEvent::Sound(SoundAction::Horn, state),
        HORN2_KEY => ControlEvent::Sound(SoundAction::Horn2, state),
        STOP_SOUND_KEY => ControlEvent::Sound(SoundAction::Stop, state),
        _ => return None,
    };

    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::{AbsoluteAxisType, Key};

    fn make_key_event(key: Key, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), value)
    }

    fn make_axis_event(axis: AbsoluteAxisType, value: i32) -> InputEvent {
        InputEvent::new(EventType::ABSOLUTE, axis.0, value)
    }

    #[test]
    fn test_codes_match_evdev() {
        assert_eq!(STEERING_AXIS, AbsoluteAxisType::ABS_X.0);
        assert_eq!(TRIM_AXIS, AbsoluteAxisType::ABS_HAT0X.0);
        assert_eq!(FORWARD_KEY, Key::BTN_TR2.code());
        assert_eq!(REVERSE_KEY, Key::BTN_SELECT.code());
        assert_eq!(BRAKE_KEY, Key::BTN_TL2.code());
        assert_eq!(HORN_KEY, Key::BTN_SOUTH.code());
        assert_eq!(HORN2_KEY, Key::BTN_EAST.code());
        assert_eq!(STOP_SOUND_KEY, Key::BTN_WEST.code());
    }

    #[test]
    fn test_raw_event_from_input_event() {
        let raw = RawEvent::from(&make_axis_event(AbsoluteAxisType::ABS_X, 42));
        assert_eq!(raw, RawEvent::absolute(STEERING_AXIS, 42));

        let raw = RawEvent::from(&make_key_event(Key::BTN_TL2, 1));
        assert_eq!(raw, RawEvent::key(BRAKE_KEY, 1));

        let raw = RawEvent::from(&InputEvent::new(EventType::SYNCHRONIZATION, 0, 0));
        assert_eq!(raw.kind, EventKind::Other);
    }

    #[test]
    fn test_key_state_from_value() {
        assert_eq!(KeyState::from_value(0), Some(KeyState::Released));
        assert_eq!(KeyState::from_value(1), Some(KeyState::Pressed));
        assert_eq!(KeyState::from_value(2), None);
    }

    #[test]
    fn test_steering_axis() {
        for value in [0, 128, 255] {
            assert_eq!(
                classify(&RawEvent::absolute(STEERING_AXIS, value)),
                Some(ControlEvent::Steering(value))
            );
        }
    }

    #[test]
    fn test_trim_axis() {
        assert_eq!(
            classify(&RawEvent::absolute(TRIM_AXIS, -1)),
            Some(ControlEvent::Trim(TrimDirection::Left))
        );
        assert_eq!(
            classify(&RawEvent::absolute(TRIM_AXIS, 1)),
            Some(ControlEvent::Trim(TrimDirection::Right))
        );
    }

    #[test]
    fn test_trim_release_ignored() {
        assert_eq!(classify(&RawEvent::absolute(TRIM_AXIS, 0)), None);
    }

    #[test]
    fn test_drive_keys() {
        let cases = [
            (FORWARD_KEY, DriveControl::Forward),
            (REVERSE_KEY, DriveControl::Reverse),
            (BRAKE_KEY, DriveControl::Brake),
        ];
        for (code, control) in cases {
            assert_eq!(
                classify(&RawEvent::key(code, 1)),
                Some(ControlEvent::Drive(control, KeyState::Pressed))
            );
            assert_eq!(
                classify(&RawEvent::key(code, 0)),
                Some(ControlEvent::Drive(control, KeyState::Released))
            );
        }
    }

    #[test]
    fn test_sound_keys() {
        let cases = [
            (HORN_KEY, SoundAction::Horn),
            (HORN2_KEY, SoundAction::Horn2),
            (STOP_SOUND_KEY, SoundAction::Stop),
        ];
        for (code, action) in cases {
            assert_eq!(
                classify(&RawEvent::key(code, 1)),
                Some(ControlEvent::Sound(action, KeyState::Pressed))
            );
        }
    }

    #[test]
    fn test_key_autorepeat_ignored() {
        assert_eq!(classify(&RawEvent::key(FORWARD_KEY, 2)), None);
        assert_eq!(classify(&RawEvent::key(HORN_KEY, 2)), None);
    }

    #[test]
    fn test_unknown_codes_ignored() {
        // Left stick Y
        assert_eq!(classify(&RawEvent::absolute(AbsoluteAxisType::ABS_Y.0, 10)), None);
        // D-pad Y
        assert_eq!(classify(&RawEvent::absolute(AbsoluteAxisType::ABS_HAT0Y.0, 1)), None);
        // Triangle / north
        assert_eq!(classify(&RawEvent::key(Key::BTN_NORTH.code(), 1)), None);
    }

    #[test]
    fn test_type_and_code_must_both_match() {
        // Key code 0 is not the steering axis
        assert_eq!(classify(&RawEvent::key(STEERING_AXIS, 1)), None);
        // An axis with a key's code is not a key
        assert_eq!(classify(&RawEvent::absolute(FORWARD_KEY, 1)), None);
    }

    #[test]
    fn test_sync_events_ignored() {
        let raw = RawEvent::from(&InputEvent::new(EventType::SYNCHRONIZATION, 0, 0));
        assert_eq!(classify(&raw), None);
    }
}
