//! Builder-style configuration for hooking a window.
//!
//! For a default configuration, `Builder::new().build_native()` is all you need!

use std::sync::Arc;

use crate::hook::HookController;
use crate::platform::{inert::Inert, NativeSystem, WindowHandle, WindowSystem};

/// When set (to anything), native hooks are never installed and the provider does nothing.
/// Meant for documentation builds and headless runs.
pub const INERT_ENV_VAR: &str = "WM_PEN_DOC";

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// There is no hook for this platform, or the window handle isn't a Win32 one.
    /// This includes cases where the platform is otherwise supported but the feature was disabled at compile-time.
    #[error("no pen hook is available for this platform or window")]
    Unsupported,
    /// A required system function couldn't be found.
    #[error("missing system entry point `{0}`")]
    MissingEntryPoint(&'static str),
    /// Failed to acquire a window handle
    #[error("{:?}", .0)]
    HandleError(raw_window_handle::HandleError),
}
// #[from] thiserror attribute breaks horribly D:
impl From<raw_window_handle::HandleError> for BuildError {
    fn from(value: raw_window_handle::HandleError) -> Self {
        Self::HandleError(value)
    }
}

/// What to do when the pen goes down again while a track is still active.
///
/// With the message hook this happens when a button-up gets lost, e.g. released over another window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Start the new track, the old one never sees an `end`.
    #[default]
    Overwrite,
    /// Dispatch an `end` for the old track first.
    CloseOrphan,
}

/// Pre-construction configuration for a [`HookController`].
#[derive(Clone, Debug)]
pub struct Builder {
    pub(crate) orphan_policy: OrphanPolicy,
    pub(crate) target: Option<WindowHandle>,
    pub(crate) honor_inert_env: bool,
}
impl Default for Builder {
    fn default() -> Self {
        Self {
            orphan_policy: OrphanPolicy::default(),
            target: None,
            honor_inert_env: true,
        }
    }
}

/// # Configuration
impl Builder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Defaults to [`OrphanPolicy::Overwrite`].
    #[must_use]
    pub fn orphan_policy(self, orphan_policy: OrphanPolicy) -> Self {
        Self {
            orphan_policy,
            ..self
        }
    }
    /// Whether [`INERT_ENV_VAR`] can turn [`Self::build_native`] into a stub. Defaults to `true`.
    #[must_use]
    pub fn honor_inert_env(self, honor_inert_env: bool) -> Self {
        Self {
            honor_inert_env,
            ..self
        }
    }
    /// Hook this window on start, instead of whichever is active at the time.
    /// # Safety
    /// The window must stay valid for as long as the built controller is started.
    #[allow(clippy::missing_errors_doc)]
    pub unsafe fn target_window(
        self,
        rwh: raw_window_handle::RawWindowHandle,
    ) -> Result<Self, BuildError> {
        match rwh {
            raw_window_handle::RawWindowHandle::Win32(handle) => Ok(Self {
                target: Some(WindowHandle::new(handle.hwnd)),
                ..self
            }),
            _ => Err(BuildError::Unsupported),
        }
    }
    /// Same as [`Self::target_window`], from a handle carrier such as a `winit` window.
    /// # Safety
    /// See [`Self::target_window`]. The borrow of `window` ends here, but the window must outlive the started hook.
    #[allow(clippy::missing_errors_doc)]
    pub unsafe fn target(
        self,
        window: &impl raw_window_handle::HasWindowHandle,
    ) -> Result<Self, BuildError> {
        let raw = window.window_handle()?.as_raw();
        // Safety: deferred to this fn's contract
        unsafe { self.target_window(raw) }
    }
}
/// # Finishing
impl Builder {
    /// Build against the platform's own windowing system.
    ///
    /// With [`INERT_ENV_VAR`] set, the result is an inert provider that starts fine but never produces events.
    // Silly clippy, it's a self-describing err type!
    #[allow(clippy::missing_errors_doc)]
    pub fn build_native(self) -> Result<HookController<NativeSystem>, BuildError> {
        if self.honor_inert_env && std::env::var_os(INERT_ENV_VAR).is_some() {
            log::debug!("{INERT_ENV_VAR} is set, pen hook disabled");
            return Ok(self.build_inert());
        }
        let system = native_system()?;
        Ok(self.build_with(Arc::new(system)))
    }
    /// Build a provider that never hooks anything.
    #[must_use]
    pub fn build_inert(self) -> HookController<NativeSystem> {
        self.build_with(Arc::new(NativeSystem::from(Inert)))
    }
    /// Build against any windowing system.
    #[must_use]
    pub fn build_with<W: WindowSystem>(self, system: Arc<W>) -> HookController<W> {
        HookController::new(self, system)
    }
}

#[cfg(win32_hook)]
fn native_system() -> Result<NativeSystem, BuildError> {
    crate::platform::win32::Win32::new().map(NativeSystem::from)
}
#[cfg(not(win32_hook))]
fn native_system() -> Result<NativeSystem, BuildError> {
    Err(BuildError::Unsupported)
}
