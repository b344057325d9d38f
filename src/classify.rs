//! Telling pen-synthesized mouse messages apart from real mouse and touch input.
//!
//! Windows synthesizes ordinary `WM_*BUTTON*`/`WM_MOUSEMOVE` messages from pen and touch contact, and
//! stamps a signature into the message's *extra info* (`GetMessageExtraInfo`) so that an application can
//! tell them apart. See [the docs](https://learn.microsoft.com/en-us/windows/win32/tablet/system-events-and-mouse-messages).

/// Masks the extra info down to the signature bits.
pub const PEN_OR_TOUCH_MASK: u32 = 0xFFFF_FF00;
/// `MI_WP_SIGNATURE`: extra info of pen or touch origin, after masking.
pub const PEN_OR_TOUCH_SIGNATURE: u32 = 0xFF51_5700;
/// Set by touch, never by pen.
pub const TOUCH_BIT: u32 = 0x80;

/// Where a mouse message came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
pub enum MessageOrigin {
    Mouse,
    Touch,
    Pen,
}
impl MessageOrigin {
    /// Classify a message from its extra info.
    ///
    /// Only the low 32 bits are meaningful, the value is a `DWORD` widened to `LPARAM`.
    #[must_use]
    // Truncation intended.
    #[allow(clippy::cast_possible_truncation)]
    pub fn classify(extra_info: usize) -> Self {
        let info = extra_info as u32;
        if info & PEN_OR_TOUCH_MASK != PEN_OR_TOUCH_SIGNATURE {
            Self::Mouse
        } else if info & TOUCH_BIT != 0 {
            Self::Touch
        } else {
            Self::Pen
        }
    }
}

/// Whether the message carrying this extra info was produced by a pen. Touch and plain mouse are both `false`.
#[must_use]
pub fn is_pen_message(extra_info: usize) -> bool {
    MessageOrigin::classify(extra_info) == MessageOrigin::Pen
}

bitflags::bitflags! {
    /// Reply bits for `WM_TABLET_QUERYSYSTEMGESTURE`, telling the system which of its pen gestures
    /// to skip for this window.
    #[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
    pub struct GestureFlags: u32 {
        const DISABLE_PRESS_AND_HOLD = 0x0000_0001;
        const DISABLE_PEN_TAP_FEEDBACK = 0x0000_0008;
        const DISABLE_PEN_BARREL_FEEDBACK = 0x0000_0010;
        const DISABLE_FLICKS = 0x0001_0000;
        const DISABLE_SMOOTH_SCROLLING = 0x0008_0000;
        const DISABLE_FLICK_FALLBACK_KEYS = 0x0010_0000;
        const ENABLE_MULTITOUCH_DATA = 0x0100_0000;
    }
}
impl GestureFlags {
    /// What the hook answers to `WM_TABLET_QUERYSYSTEMGESTURE`. Pen strokes must reach us as strokes,
    /// not be turned into right-clicks or flicks.
    pub const HOOK_REPLY: Self = Self::all();
}
