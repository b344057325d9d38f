//! # Pen input through the Win32 message hook 🖊️
//!
//! Windows delivers pen contact to ordinary windows as synthesized `WM_LBUTTONDOWN`/`WM_MOUSEMOVE`/`WM_LBUTTONUP`,
//! tagged in the message's extra info so they can be told apart from a real mouse. This crate subclasses a window's
//! procedure to catch those messages before the default handling does, and turns them into a simple stream of
//! `begin`/`update`/`end` events on a single pointer track, positioned in normalized client coordinates.
//!
//! To get started, create a [`Builder`], then [`start`](HookController::start) and call
//! [`drain`](HookController::drain) from your polling loop:
//!
//! ```no_run
//! let mut pen = wm_pen::Builder::new().build_native()?;
//! pen.start()?;
//! loop {
//!     pen.drain(|kind, track| println!("{kind}: {track}"));
//!     # break;
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Limitations
//! * One pen, one window, one hook per process.
//! * Position only. For pressure, tilt and friends, reach for a proper tablet API.
//! * Pen messages are swallowed by the hook, the window won't also see them as mouse input.
//!
//! Set the `WM_PEN_DOC` environment variable to get a provider that never installs anything, see
//! [`builder::INERT_ENV_VAR`].

#![warn(clippy::pedantic)]
#![forbid(unsafe_op_in_unsafe_fn)]

pub mod builder;
pub mod classify;
pub mod events;
mod hook;
pub mod platform;
mod queue;
pub mod registry;
pub mod track;
mod translate;

pub use builder::{BuildError, Builder, OrphanPolicy};
pub use events::{EventKind, PenEvent};
pub use hook::{HookController, HookError, HANDLED};
pub use registry::{register, MotionEventProvider, ProviderRegistry};
pub use track::{PointerTrack, TrackId, TrackPhase};

/// Key this provider registers under, see [`registry`].
pub const PROVIDER_NAME: &str = "wm_pen";

/// The provider as built by [`Builder::build_native`].
pub type PenProvider = HookController<platform::NativeSystem>;
