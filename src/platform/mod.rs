//! The seam between the hook logic and the windowing system.
//!
//! Everything the hook needs from the OS goes through [`WindowSystem`], so that the classifier, translator,
//! and dispatch loop can be driven without a real window.

// Conditionally include each backend...
pub(crate) mod inert;
#[cfg(win32_hook)]
pub(crate) mod win32;

use std::num::NonZeroIsize;
use std::sync::Arc;

use crate::events::{ClientRect, RawMessage};

/// A window, as the OS identifies it (`HWND`). Never null.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct WindowHandle(NonZeroIsize);
impl WindowHandle {
    #[must_use]
    pub fn new(raw: NonZeroIsize) -> Self {
        Self(raw)
    }
    /// `None` for the null handle.
    #[must_use]
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }
    #[must_use]
    pub fn get(self) -> isize {
        self.0.get()
    }
}

/// A window procedure that was replaced by the hook, kept to forward to and to restore later.
/// Opaque, only meaningful to the [`WindowSystem`] that returned it.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct RawProcedure(isize);
impl RawProcedure {
    #[must_use]
    pub fn from_raw(raw: isize) -> Self {
        Self(raw)
    }
    #[must_use]
    pub fn as_raw(self) -> isize {
        self.0
    }
}

/// Errors from the windowing system while installing or removing the hook.
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    /// Only one window procedure hook may be live per process.
    #[error("another pen hook is already installed in this process")]
    SlotTaken,
    #[error("window handle is not valid")]
    InvalidWindow,
    #[cfg(win32_hook)]
    #[error(transparent)]
    Windows(#[from] windows::core::Error),
}

/// Receives every message for a hooked window, in place of its original procedure.
pub trait MessageHandler: Send + Sync {
    /// Handle one message and produce the `LRESULT`. Runs on the window's thread, inside the system message pump,
    /// so this must return promptly.
    fn handle_message(&self, message: RawMessage) -> isize;
}

/// Everything needed from the windowing system.
///
/// Implementations are shared between the polling side and the window procedure, hence `Send + Sync`.
#[enum_dispatch::enum_dispatch]
pub trait WindowSystem: Send + Sync + 'static {
    /// The window currently active on this thread, if any.
    fn active_window(&self) -> Option<WindowHandle>;
    /// Route all of `window`'s messages to `handler`, returning the procedure that was replaced.
    ///
    /// Must refuse with [`PlatformError::SlotTaken`] while another handler is installed through this system.
    #[allow(clippy::missing_errors_doc)]
    fn install_procedure(
        &self,
        window: WindowHandle,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<RawProcedure, PlatformError>;
    /// Put `original` back as `window`'s procedure and forget the handler.
    #[allow(clippy::missing_errors_doc)]
    fn restore_procedure(
        &self,
        window: WindowHandle,
        original: RawProcedure,
    ) -> Result<(), PlatformError>;
    /// Live client-area size. `None` if the window can't be queried.
    fn query_client_rect(&self, window: WindowHandle) -> Option<ClientRect>;
    /// Extra info of the message currently being handled on this thread.
    ///
    /// This is per-thread state that any later system call may overwrite, so it is read first thing in the hook.
    fn query_message_aux_info(&self) -> usize;
    /// Hand a message to `original`, or to the default procedure if none is known yet.
    fn forward_message(&self, original: Option<RawProcedure>, message: RawMessage) -> isize;
}

/// Static dispatch between compiled backends.
/// Always has the inert stub, plus the real hook where the platform has one.
#[enum_dispatch::enum_dispatch(WindowSystem)]
pub enum NativeSystem {
    #[cfg(win32_hook)]
    Win32(win32::Win32),
    Inert(inert::Inert),
}
impl NativeSystem {
    /// Whether this is the do-nothing stub.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        matches!(self, Self::Inert(_))
    }
}
