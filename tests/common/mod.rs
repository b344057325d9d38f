//! A scripted windowing system, for driving the hook without a real window.

#![allow(dead_code)]

use std::sync::{Arc, Barrier, Mutex, MutexGuard, PoisonError};

use wm_pen::classify::{PEN_OR_TOUCH_SIGNATURE, TOUCH_BIT};
use wm_pen::events::{ClientRect, RawMessage};
use wm_pen::platform::{MessageHandler, PlatformError, RawProcedure, WindowHandle, WindowSystem};

pub const PEN: usize = PEN_OR_TOUCH_SIGNATURE as usize;
pub const TOUCH: usize = (PEN_OR_TOUCH_SIGNATURE | TOUCH_BIT) as usize;
pub const MOUSE: usize = 0;

/// What the "original" window procedure answers.
pub const ORIGINAL_RESULT: isize = 42;
pub const ORIGINAL_PROCEDURE: isize = 0x5150;

pub fn window() -> WindowHandle {
    WindowHandle::from_raw(0x1000).unwrap()
}

#[derive(Default)]
struct State {
    active: Option<WindowHandle>,
    rect: ClientRect,
    extra_info: usize,
    handler: Option<Arc<dyn MessageHandler>>,
    /// The handler that was restored away, for messages still in flight.
    detached: Option<Arc<dyn MessageHandler>>,
    installs: Vec<WindowHandle>,
    restores: Vec<(WindowHandle, RawProcedure)>,
    forwarded: Vec<(Option<RawProcedure>, RawMessage)>,
    /// The next restore unhooks, but reports failure.
    fail_restore: bool,
}

/// Holds one client area query until released. Kept apart from `State`, the other side needs that lock.
struct Gate {
    entered: Arc<Barrier>,
    release: Arc<Barrier>,
}

#[derive(Default)]
pub struct MockSystem {
    state: Mutex<State>,
    gate: Mutex<Option<Gate>>,
}

impl MockSystem {
    pub fn new(width: u32, height: u32) -> Arc<Self> {
        let system = Self::default();
        {
            let mut state = system.lock();
            state.active = Some(window());
            state.rect = ClientRect { width, height };
        }
        Arc::new(system)
    }
    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
    pub fn set_active(&self, active: Option<WindowHandle>) {
        self.lock().active = active;
    }
    pub fn resize(&self, width: u32, height: u32) {
        self.lock().rect = ClientRect { width, height };
    }
    pub fn is_hooked(&self) -> bool {
        self.lock().handler.is_some()
    }
    pub fn installs(&self) -> Vec<WindowHandle> {
        self.lock().installs.clone()
    }
    pub fn restores(&self) -> Vec<(WindowHandle, RawProcedure)> {
        self.lock().restores.clone()
    }
    /// Make the next restore fail. The handler is still removed, as the real backend does.
    pub fn fail_next_restore(&self) {
        self.lock().fail_restore = true;
    }
    /// Park the next client area query. The first barrier is passed once a message is inside the
    /// window procedure, the query returns after the second.
    pub fn gate_next_rect_query(&self) -> (Arc<Barrier>, Arc<Barrier>) {
        let entered = Arc::new(Barrier::new(2));
        let release = Arc::new(Barrier::new(2));
        *self.gate.lock().unwrap_or_else(PoisonError::into_inner) = Some(Gate {
            entered: entered.clone(),
            release: release.clone(),
        });
        (entered, release)
    }
    pub fn forwarded(&self) -> Vec<(Option<RawProcedure>, RawMessage)> {
        self.lock().forwarded.clone()
    }
    fn deliver(
        &self,
        handler: Option<Arc<dyn MessageHandler>>,
        msg: u32,
        [x, y]: [i16; 2],
        extra_info: usize,
    ) -> Option<isize> {
        let handler = handler?;
        self.lock().extra_info = extra_info;
        #[allow(clippy::cast_sign_loss)]
        let packed = u32::from(x as u16) | (u32::from(y as u16) << 16);
        // Lock released, the handler calls back in.
        Some(handler.handle_message(RawMessage {
            window: window(),
            msg,
            wparam: 0,
            lparam: packed as isize,
        }))
    }
    /// Send a message through the installed procedure. `None` if nothing is installed.
    pub fn send(&self, msg: u32, coord: [i16; 2], extra_info: usize) -> Option<isize> {
        let handler = self.lock().handler.clone();
        self.deliver(handler, msg, coord, extra_info)
    }
    /// Send a message to a procedure that has since been restored away.
    pub fn send_detached(&self, msg: u32, coord: [i16; 2], extra_info: usize) -> Option<isize> {
        let handler = self.lock().detached.clone();
        self.deliver(handler, msg, coord, extra_info)
    }
}

impl WindowSystem for MockSystem {
    fn active_window(&self) -> Option<WindowHandle> {
        self.lock().active
    }
    fn install_procedure(
        &self,
        window: WindowHandle,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<RawProcedure, PlatformError> {
        let mut state = self.lock();
        if state.handler.is_some() {
            return Err(PlatformError::SlotTaken);
        }
        state.handler = Some(handler);
        state.installs.push(window);
        Ok(RawProcedure::from_raw(ORIGINAL_PROCEDURE))
    }
    fn restore_procedure(
        &self,
        window: WindowHandle,
        original: RawProcedure,
    ) -> Result<(), PlatformError> {
        let mut state = self.lock();
        state.detached = state.handler.take();
        state.restores.push((window, original));
        if std::mem::take(&mut state.fail_restore) {
            return Err(PlatformError::InvalidWindow);
        }
        Ok(())
    }
    fn query_client_rect(&self, _window: WindowHandle) -> Option<ClientRect> {
        let gate = self.gate.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(gate) = gate {
            gate.entered.wait();
            gate.release.wait();
        }
        Some(self.lock().rect)
    }
    fn query_message_aux_info(&self) -> usize {
        self.lock().extra_info
    }
    fn forward_message(&self, original: Option<RawProcedure>, message: RawMessage) -> isize {
        self.lock().forwarded.push((original, message));
        ORIGINAL_RESULT
    }
}

/// One dispatch as the host saw it.
#[derive(Clone, Debug, PartialEq)]
pub struct Dispatched {
    pub kind: &'static str,
    pub id: u64,
    pub position: [f32; 2],
    pub active: bool,
}

pub fn drain_all<W: WindowSystem>(controller: &mut wm_pen::HookController<W>) -> Vec<Dispatched> {
    let mut seen = Vec::new();
    controller.drain(|kind, track| {
        seen.push(Dispatched {
            kind: match kind {
                wm_pen::EventKind::Begin => "begin",
                wm_pen::EventKind::Update => "update",
                wm_pen::EventKind::End => "end",
            },
            id: track.id().get(),
            position: track.position(),
            active: track.is_active(),
        });
    });
    seen
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
