//! Stand-in backend for when native hooks are switched off (docs builds, `WM_PEN_DOC`).
//! Starts and stops fine, and never produces a message.

use std::num::NonZeroIsize;
use std::sync::Arc;

use super::{MessageHandler, PlatformError, RawProcedure, WindowHandle, WindowSystem};
use crate::events::{ClientRect, RawMessage};

#[derive(Clone, Copy, Debug, Default)]
pub struct Inert;

impl WindowSystem for Inert {
    fn active_window(&self) -> Option<WindowHandle> {
        // Nothing is ever dereferenced, any non-null value will do.
        Some(WindowHandle::new(NonZeroIsize::MIN))
    }
    fn install_procedure(
        &self,
        _window: WindowHandle,
        _handler: Arc<dyn MessageHandler>,
    ) -> Result<RawProcedure, PlatformError> {
        log::debug!("inert backend, no hook installed");
        Ok(RawProcedure::from_raw(0))
    }
    fn restore_procedure(
        &self,
        _window: WindowHandle,
        _original: RawProcedure,
    ) -> Result<(), PlatformError> {
        Ok(())
    }
    fn query_client_rect(&self, _window: WindowHandle) -> Option<ClientRect> {
        None
    }
    fn query_message_aux_info(&self) -> usize {
        0
    }
    fn forward_message(&self, _original: Option<RawProcedure>, _message: RawMessage) -> isize {
        0
    }
}
