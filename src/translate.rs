use std::sync::atomic::{AtomicBool, Ordering};

use crate::events::{ClientRect, EventKind, MessageKind, PenEvent};

/// Turns pen button/move messages into [`PenEvent`]s.
///
/// Tracks whether the pen is pressed, so that hovering doesn't read as a drag. This is the only state, and it
/// is atomic so the translator can live behind a shared reference inside the window procedure.
#[derive(Debug, Default)]
pub(crate) struct Translator {
    pen_down: AtomicBool,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn is_pen_down(&self) -> bool {
        self.pen_down.load(Ordering::Relaxed)
    }
    pub fn reset(&self) {
        self.pen_down.store(false, Ordering::Relaxed);
    }
    /// Translate one message. `rect` is the client area *right now*, `None` if it couldn't be queried.
    ///
    /// Messages other than button-down, move and button-up produce nothing. An empty or unknown client area
    /// drops the event, but the pressed state still follows the button.
    pub fn translate(
        &self,
        kind: MessageKind,
        coord: [i16; 2],
        rect: Option<ClientRect>,
    ) -> Option<PenEvent> {
        let kind = match kind {
            MessageKind::ButtonDown => {
                self.pen_down.store(true, Ordering::Relaxed);
                EventKind::Begin
            }
            MessageKind::Move if self.is_pen_down() => EventKind::Update,
            MessageKind::ButtonUp => {
                self.pen_down.store(false, Ordering::Relaxed);
                EventKind::End
            }
            MessageKind::Move | MessageKind::Other => return None,
        };
        let position = normalize(coord, rect?)?;
        Some(PenEvent { kind, position })
    }
}

/// Client pixels to `0..=1` client units, flipping Y so that up is positive.
#[allow(clippy::cast_precision_loss)]
fn normalize([x, y]: [i16; 2], rect: ClientRect) -> Option<[f32; 2]> {
    if rect.is_empty() {
        return None;
    }
    let x = f32::from(x) / rect.width as f32;
    let y = f32::from(y) / rect.height as f32;
    Some([x, 1.0 - y])
}
