//! Implementation details for subclassing a Win32 window procedure.
//!
//! Within this module, it is sound to assume `cfg(win32_hook) == true`
//! (compiling for a windows target + has deps, or is building docs).

use std::sync::{Arc, Mutex, PoisonError};

use windows::core::{s, w};
use windows::Win32::Foundation::{SetLastError, HWND, LPARAM, LRESULT, RECT, WIN32_ERROR, WPARAM};
use windows::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows::Win32::UI::Input::KeyboardAndMouse::GetActiveWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    CallWindowProcW, DefWindowProcW, GetClientRect, GetMessageExtraInfo, GWLP_WNDPROC, WNDPROC,
};

use super::{MessageHandler, PlatformError, RawProcedure, WindowHandle, WindowSystem};
use crate::builder::BuildError;
use crate::events::{ClientRect, RawMessage};

type SetWindowLongPtrFn = unsafe extern "system" fn(HWND, i32, isize) -> isize;
// Only exported name on 32-bit, where `SetWindowLongPtrW` is a header macro. Same width as a pointer there.
#[cfg(target_pointer_width = "32")]
type SetWindowLongFn = unsafe extern "system" fn(HWND, i32, i32) -> i32;

/// Whichever of the `SetWindowLong` family user32 actually exports.
#[derive(Clone, Copy)]
enum SetWindowLong {
    Ptr(SetWindowLongPtrFn),
    #[cfg(target_pointer_width = "32")]
    Legacy(SetWindowLongFn),
}
impl SetWindowLong {
    fn resolve() -> Result<Self, BuildError> {
        // Safety: user32 is always loaded, we link against it. Names are valid nul-terminated strings.
        unsafe {
            let user32 = GetModuleHandleW(w!("user32.dll"))
                .map_err(|_| BuildError::MissingEntryPoint("user32.dll"))?;
            if let Some(entry) = GetProcAddress(user32, s!("SetWindowLongPtrW")) {
                // Safety: signature from winuser.h
                return Ok(Self::Ptr(std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    SetWindowLongPtrFn,
                >(entry)));
            }
            #[cfg(target_pointer_width = "32")]
            if let Some(entry) = GetProcAddress(user32, s!("SetWindowLongW")) {
                log::debug!("SetWindowLongPtrW unavailable, falling back to SetWindowLongW");
                return Ok(Self::Legacy(std::mem::transmute::<
                    unsafe extern "system" fn() -> isize,
                    SetWindowLongFn,
                >(entry)));
            }
        }
        Err(BuildError::MissingEntryPoint("SetWindowLongPtrW"))
    }
    /// Swap the window procedure, returning the old one.
    /// # Safety
    /// `hwnd` must be valid, and `procedure` must be a `WNDPROC` that stays alive while installed.
    unsafe fn swap_wndproc(self, hwnd: HWND, procedure: isize) -> Result<isize, PlatformError> {
        // Zero is both "failed" and a legitimate previous value, only the last error can tell.
        unsafe { SetLastError(WIN32_ERROR(0)) };
        let previous = match self {
            Self::Ptr(set) => unsafe { set(hwnd, GWLP_WNDPROC.0, procedure) },
            #[cfg(target_pointer_width = "32")]
            #[allow(clippy::cast_possible_truncation)]
            Self::Legacy(set) => unsafe { set(hwnd, GWLP_WNDPROC.0, procedure as i32) as isize },
        };
        if previous == 0 {
            let err = windows::core::Error::from_win32();
            if err.code().is_err() {
                return Err(err.into());
            }
        }
        Ok(previous)
    }
}

/// The hook that currently owns a window. There can only be one per process, since the
/// window procedure itself is a plain function with nowhere else to find its state.
struct Installed {
    window: WindowHandle,
    handler: Arc<dyn MessageHandler>,
}
static INSTALLED: Mutex<Option<Installed>> = Mutex::new(None);
/// The procedure last put back, for messages that still reach `pen_wndproc` after a restore.
static RESTORED: Mutex<Option<(WindowHandle, RawProcedure)>> = Mutex::new(None);

fn installed_handler() -> Option<Arc<dyn MessageHandler>> {
    INSTALLED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map(|installed| installed.handler.clone())
}

fn restored_procedure(window: WindowHandle) -> Option<RawProcedure> {
    let restored = *RESTORED.lock().unwrap_or_else(PoisonError::into_inner);
    restored
        .filter(|(restored, _)| *restored == window)
        .map(|(_, original)| original)
}

/// Call `original`, or the default procedure if there is none.
/// # Safety
/// `original` must have been returned by `SetWindowLongPtrW` for `hwnd`.
unsafe fn call_procedure(
    original: Option<RawProcedure>,
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    match original.filter(|original| original.as_raw() != 0) {
        // Safety: `original` is a `WNDPROC` (or a handle `CallWindowProcW` knows how to translate).
        // `None` and `Some` share the pointer's layout.
        Some(original) => unsafe {
            let original = std::mem::transmute::<isize, WNDPROC>(original.as_raw());
            CallWindowProcW(original, hwnd, msg, wparam, lparam)
        },
        None => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
    }
}

/// The replacement window procedure.
unsafe extern "system" fn pen_wndproc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    let Some(window) = WindowHandle::from_raw(hwnd.0) else {
        return unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) };
    };
    // Clone out of the lock before calling, forwarding may re-enter us on this same thread.
    match installed_handler() {
        Some(handler) => LRESULT(handler.handle_message(RawMessage {
            window,
            msg,
            wparam: wparam.0,
            lparam: lparam.0,
        })),
        // Restored while a message was in flight, or the restore itself failed.
        // Safety: `RESTORED` only holds procedures returned by the swap in `install_procedure`.
        None => unsafe { call_procedure(restored_procedure(window), hwnd, msg, wparam, lparam) },
    }
}

pub struct Win32 {
    set_window_long: SetWindowLong,
}

impl Win32 {
    /// Resolve the user32 entry points needed for subclassing.
    pub(crate) fn new() -> Result<Self, BuildError> {
        Ok(Self {
            set_window_long: SetWindowLong::resolve()?,
        })
    }
}

impl WindowSystem for Win32 {
    fn active_window(&self) -> Option<WindowHandle> {
        // Safety: No preconditions.
        WindowHandle::from_raw(unsafe { GetActiveWindow() }.0)
    }
    fn install_procedure(
        &self,
        window: WindowHandle,
        handler: Arc<dyn MessageHandler>,
    ) -> Result<RawProcedure, PlatformError> {
        {
            let mut slot = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.is_some() {
                return Err(PlatformError::SlotTaken);
            }
            // In place before the swap, the very next message may already be ours.
            *slot = Some(Installed { window, handler });
        }
        // Safety: handle validity is deferred to the `Builder`'s contract. `pen_wndproc` is a static fn.
        #[allow(clippy::fn_to_numeric_cast)]
        let swapped = unsafe {
            self.set_window_long
                .swap_wndproc(HWND(window.get()), pen_wndproc as isize)
        };
        match swapped {
            // A failed restore left us in place. Chaining to ourselves would recurse forever.
            #[allow(clippy::fn_to_numeric_cast)]
            Ok(previous) if previous == pen_wndproc as isize => {
                log::debug!("re-hooked window procedure of {window:?}");
                Ok(restored_procedure(window).unwrap_or(RawProcedure::from_raw(0)))
            }
            Ok(previous) => {
                log::debug!("hooked window procedure of {window:?}");
                Ok(RawProcedure::from_raw(previous))
            }
            Err(err) => {
                *INSTALLED.lock().unwrap_or_else(PoisonError::into_inner) = None;
                Err(err)
            }
        }
    }
    fn restore_procedure(
        &self,
        window: WindowHandle,
        original: RawProcedure,
    ) -> Result<(), PlatformError> {
        *RESTORED.lock().unwrap_or_else(PoisonError::into_inner) = Some((window, original));
        // Safety: `original` came from `install_procedure` on this same window.
        let swapped = unsafe {
            self.set_window_long
                .swap_wndproc(HWND(window.get()), original.as_raw())
        };
        // Released even if the swap failed.
        let mut slot = INSTALLED.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|installed| installed.window == window) {
            *slot = None;
        }
        drop(slot);
        swapped?;
        log::debug!("restored window procedure of {window:?}");
        Ok(())
    }
    fn query_client_rect(&self, window: WindowHandle) -> Option<ClientRect> {
        let mut rect = RECT::default();
        // Safety: `rect` is a valid out pointer. A stale handle fails rather than UB.
        unsafe { GetClientRect(HWND(window.get()), &mut rect) }.ok()?;
        Some(ClientRect {
            width: u32::try_from(rect.right - rect.left).unwrap_or(0),
            height: u32::try_from(rect.bottom - rect.top).unwrap_or(0),
        })
    }
    #[allow(clippy::cast_sign_loss)]
    fn query_message_aux_info(&self) -> usize {
        // Safety: No preconditions.
        unsafe { GetMessageExtraInfo() }.0 as usize
    }
    fn forward_message(&self, original: Option<RawProcedure>, message: RawMessage) -> isize {
        // Safety: `original` was returned by `SetWindowLongPtrW` in `install_procedure`.
        let result = unsafe {
            call_procedure(
                original,
                HWND(message.window.get()),
                message.msg,
                WPARAM(message.wparam),
                LPARAM(message.lparam),
            )
        };
        result.0
    }
}
