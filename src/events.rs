//! Raw window messages coming in, and normalized pen events going out.

use crate::platform::WindowHandle;

pub const WM_MOUSEMOVE: u32 = 0x0200;
pub const WM_LBUTTONDOWN: u32 = 0x0201;
pub const WM_LBUTTONUP: u32 = 0x0202;
/// `WM_TABLET_FIRST + 12`
pub const WM_TABLET_QUERYSYSTEMGESTURE: u32 = 0x02CC;

/// The three stages of a pen contact, in the order the host sees them.
///
/// The string forms (`"begin"`, `"update"`, `"end"`) are what the host input pipeline expects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::AsRefStr, strum::Display, strum::EnumCount)]
#[strum(serialize_all = "lowercase")]
pub enum EventKind {
    Begin,
    Update,
    End,
}

/// A normalized pen event, as queued by the hook and consumed once by [`HookController::drain`](crate::HookController::drain).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PenEvent {
    pub kind: EventKind,
    /// X, Y in client-area units. `[0, 0]` is the bottom left and `[1, 1]` the top right.
    ///
    /// These are *not* clamped, contact dragged outside of the window reports values outside `0..=1`.
    pub position: [f32; 2],
}
impl PenEvent {
    #[must_use]
    pub fn x(&self) -> f32 {
        self.position[0]
    }
    #[must_use]
    pub fn y(&self) -> f32 {
        self.position[1]
    }
}

/// The subset of messages the translator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    ButtonDown,
    Move,
    ButtonUp,
    Other,
}
impl MessageKind {
    #[must_use]
    pub fn from_id(msg: u32) -> Self {
        match msg {
            WM_LBUTTONDOWN => Self::ButtonDown,
            WM_MOUSEMOVE => Self::Move,
            WM_LBUTTONUP => Self::ButtonUp,
            _ => Self::Other,
        }
    }
}

/// A message as handed to a window procedure. Only valid for the duration of that call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMessage {
    pub window: WindowHandle,
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
}
impl RawMessage {
    #[must_use]
    pub fn kind(&self) -> MessageKind {
        MessageKind::from_id(self.msg)
    }
    /// Client-relative pixel position packed into `lparam` of mouse messages.
    /// Low word is X, high word is Y, both signed (multi-monitor setups can go negative).
    #[must_use]
    // Word extraction, truncation intended.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn packed_coord(&self) -> [i16; 2] {
        let packed = self.lparam as u32;
        [packed as u16 as i16, (packed >> 16) as u16 as i16]
    }
}

/// Size of a window's client area in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ClientRect {
    pub width: u32,
    pub height: u32,
}
impl ClientRect {
    /// Whether the rect can be used to normalize coordinates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(msg: u32, lparam: isize) -> RawMessage {
        RawMessage {
            window: WindowHandle::from_raw(0x10).unwrap(),
            msg,
            wparam: 0,
            lparam,
        }
    }

    #[test]
    fn kind_strings() {
        assert_eq!(EventKind::Begin.as_ref(), "begin");
        assert_eq!(EventKind::Update.as_ref(), "update");
        assert_eq!(EventKind::End.to_string(), "end");
    }

    #[test]
    fn message_kinds() {
        assert_eq!(message(WM_LBUTTONDOWN, 0).kind(), MessageKind::ButtonDown);
        assert_eq!(message(WM_MOUSEMOVE, 0).kind(), MessageKind::Move);
        assert_eq!(message(WM_LBUTTONUP, 0).kind(), MessageKind::ButtonUp);
        assert_eq!(message(0x0204, 0).kind(), MessageKind::Other);
    }

    #[test]
    fn packed_coord_is_signed_words() {
        assert_eq!(message(WM_MOUSEMOVE, 0x0019_0032).packed_coord(), [50, 25]);
        // (-1, -2)
        assert_eq!(
            message(WM_MOUSEMOVE, 0xFFFE_FFFFu32 as isize).packed_coord(),
            [-1, -2]
        );
    }
}
