//! Installing the hook, and turning what it collects into pointer tracks.
//!
//! The work is split across two threads of control. The window procedure ([`Hook`]) runs inside the system's
//! message pump and only ever classifies, translates, and queues. [`HookController::drain`] runs on the host's
//! polling tick and owns the [`PointerTrack`]. The [`EventQueue`] is the only thing they share.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::builder::{Builder, OrphanPolicy};
use crate::classify::{is_pen_message, GestureFlags};
use crate::events::{EventKind, MessageKind, PenEvent, RawMessage, WM_TABLET_QUERYSYSTEMGESTURE};
use crate::platform::{MessageHandler, PlatformError, RawProcedure, WindowHandle, WindowSystem};
use crate::queue::EventQueue;
use crate::track::{PointerTrack, TrackId};
use crate::translate::Translator;

/// Returned for pen messages, so the system doesn't also turn them into mouse input.
pub const HANDLED: isize = 1;

#[derive(thiserror::Error, Debug)]
pub enum HookError {
    #[error("hook is already started")]
    AlreadyStarted,
    #[error("hook is not started")]
    NotStarted,
    #[error("no active window to hook")]
    NoActiveWindow,
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

/// State living behind the replaced window procedure.
struct Hook<W> {
    system: Arc<W>,
    window: WindowHandle,
    /// Set once the swap returns. Until then there's nothing to forward to but the default procedure.
    original: OnceCell<RawProcedure>,
    /// Cleared on stop. A message already in flight then goes straight to the original.
    armed: AtomicBool,
    translator: Translator,
    queue: EventQueue,
}

impl<W: WindowSystem> Hook<W> {
    fn new(system: Arc<W>, window: WindowHandle, queue: EventQueue) -> Self {
        Self {
            system,
            window,
            original: OnceCell::new(),
            armed: AtomicBool::new(false),
            translator: Translator::new(),
            queue,
        }
    }
    fn arm(&self, original: RawProcedure) {
        // Only ever armed once per hook, a second `set` can't happen.
        let _ = self.original.set(original);
        self.armed.store(true, Ordering::Release);
    }
    fn disarm(&self) {
        self.armed.store(false, Ordering::Release);
        self.translator.reset();
    }
    fn forward(&self, message: RawMessage) -> isize {
        self.system
            .forward_message(self.original.get().copied(), message)
    }
    fn translate(&self, message: RawMessage) {
        let kind = message.kind();
        if kind == MessageKind::Other {
            return;
        }
        // Queried live, the window may have been resized since the last event.
        let rect = self.system.query_client_rect(self.window);
        if let Some(event) = self.translator.translate(kind, message.packed_coord(), rect) {
            log::trace!("{} at {:?}", event.kind, event.position);
            self.queue.push(event);
        }
    }
}

impl<W: WindowSystem> MessageHandler for Hook<W> {
    fn handle_message(&self, message: RawMessage) -> isize {
        // Before anything else can clobber it.
        let extra_info = self.system.query_message_aux_info();
        if !self.armed.load(Ordering::Acquire) {
            return self.forward(message);
        }
        if message.msg == WM_TABLET_QUERYSYSTEMGESTURE {
            // Bit pattern, sign is irrelevant.
            #[allow(clippy::cast_possible_wrap)]
            return GestureFlags::HOOK_REPLY.bits() as isize;
        }
        if is_pen_message(extra_info) {
            self.translate(message);
            HANDLED
        } else {
            self.forward(message)
        }
    }
}

/// Hooks a window's procedure to collect pen input, and hands it to the host as [`PointerTrack`]s.
///
/// Created through a [`Builder`]. `Uninstalled` until [`start`](Self::start), back to `Uninstalled` on
/// [`stop`](Self::stop) or drop.
pub struct HookController<W: WindowSystem> {
    system: Arc<W>,
    orphan_policy: OrphanPolicy,
    target: Option<WindowHandle>,
    hook: Option<Arc<Hook<W>>>,
    queue: EventQueue,
    track: Option<PointerTrack>,
    /// Last id handed out. Survives restarts so ids are never reused.
    last_id: u64,
}

impl<W: WindowSystem> HookController<W> {
    pub(crate) fn new(builder: Builder, system: Arc<W>) -> Self {
        let Builder {
            orphan_policy,
            target,
            honor_inert_env: _,
        } = builder;
        Self {
            system,
            orphan_policy,
            target,
            hook: None,
            queue: EventQueue::new(),
            track: None,
            last_id: 0,
        }
    }
    #[must_use]
    pub fn system(&self) -> &W {
        &self.system
    }
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.hook.is_some()
    }
    /// The hooked window, while started.
    #[must_use]
    pub fn window(&self) -> Option<WindowHandle> {
        self.hook.as_ref().map(|hook| hook.window)
    }
    /// The track currently in contact, if any.
    #[must_use]
    pub fn active_track(&self) -> Option<&PointerTrack> {
        self.track.as_ref()
    }
    /// Events waiting for the next [`drain`](Self::drain).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
    /// Hook the configured window, or else the currently active one.
    ///
    /// # Errors
    /// * [`HookError::AlreadyStarted`] if called twice without a [`stop`](Self::stop).
    /// * [`HookError::NoActiveWindow`] if there is no window to hook.
    /// * [`HookError::Platform`] if the system refused, including when another controller already holds the hook.
    pub fn start(&mut self) -> Result<(), HookError> {
        if self.hook.is_some() {
            return Err(HookError::AlreadyStarted);
        }
        let window = self
            .target
            .or_else(|| self.system.active_window())
            .ok_or(HookError::NoActiveWindow)?;

        let queue = EventQueue::new();
        let hook = Arc::new(Hook::new(self.system.clone(), window, queue.clone()));
        let original = self.system.install_procedure(window, hook.clone())?;
        hook.arm(original);

        self.queue = queue;
        self.track = None;
        self.hook = Some(hook);
        log::debug!("pen hook started on {window:?}");
        Ok(())
    }
    /// Put the original procedure back. The active track, if any, is dropped without an `end`,
    /// as are events not yet drained.
    ///
    /// # Errors
    /// * [`HookError::NotStarted`] if not started.
    /// * [`HookError::Platform`] if the original procedure couldn't be restored. The controller is stopped regardless.
    pub fn stop(&mut self) -> Result<(), HookError> {
        let hook = self.hook.take().ok_or(HookError::NotStarted)?;
        hook.disarm();
        self.track = None;
        // A message already past the armed check may still push into the hook's queue.
        // That queue stays behind with the hook, nothing drains it again.
        self.queue = EventQueue::new();
        if let Some(original) = hook.original.get() {
            self.system.restore_procedure(hook.window, *original)?;
        }
        log::debug!("pen hook stopped on {:?}", hook.window);
        Ok(())
    }
    /// Dispatch everything queued so far, oldest first, then return. Never waits for more.
    ///
    /// Each event updates the active track, then `dispatch` sees the kind and the track:
    /// * `begin` starts a new track with the next id.
    /// * `update` moves the active track.
    /// * `end` marks the active track ended. This is its last dispatch.
    ///
    /// An `update` or `end` without an active track is dropped. Returns the number of dispatches made.
    /// A stopped controller dispatches nothing.
    pub fn drain(&mut self, mut dispatch: impl FnMut(EventKind, &PointerTrack)) -> usize {
        if self.hook.is_none() {
            return 0;
        }
        let batch = self.queue.take_all();
        batch
            .iter()
            .map(|event| self.apply(*event, &mut dispatch))
            .sum()
    }
    fn next_id(&mut self) -> TrackId {
        self.last_id += 1;
        TrackId(self.last_id)
    }
    fn apply(&mut self, event: PenEvent, dispatch: &mut impl FnMut(EventKind, &PointerTrack)) -> usize {
        match event.kind {
            EventKind::Begin => {
                let mut dispatched = 0;
                if let Some(mut orphan) = self.track.take() {
                    match self.orphan_policy {
                        OrphanPolicy::Overwrite => {
                            log::debug!("track {} replaced before it ended", orphan.id());
                        }
                        OrphanPolicy::CloseOrphan => {
                            orphan.finish();
                            dispatch(EventKind::End, &orphan);
                            dispatched += 1;
                        }
                    }
                }
                let id = self.next_id();
                let track = self.track.insert(PointerTrack::begin(id, event.position));
                dispatch(EventKind::Begin, track);
                dispatched + 1
            }
            EventKind::Update => {
                if let Some(track) = self.track.as_mut() {
                    track.move_to(event.position);
                    dispatch(EventKind::Update, track);
                    1
                } else {
                    log::warn!("pen update with no active track, dropped");
                    0
                }
            }
            EventKind::End => {
                if let Some(mut track) = self.track.take() {
                    track.finish();
                    dispatch(EventKind::End, &track);
                    1
                } else {
                    log::warn!("pen end with no active track, dropped");
                    0
                }
            }
        }
    }
}

impl<W: WindowSystem> Drop for HookController<W> {
    fn drop(&mut self) {
        if self.hook.is_some() {
            if let Err(err) = self.stop() {
                log::warn!("failed to restore window procedure: {err}");
            }
        }
    }
}
