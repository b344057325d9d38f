//! Plugging the hook into a host's input subsystem by name.
//!
//! Hosts keep a table of provider constructors and pick one by key. [`register`] adds this crate's
//! provider under [`PROVIDER_NAME`](crate::PROVIDER_NAME).

use std::collections::BTreeMap;

use crate::builder::{BuildError, Builder};
use crate::events::EventKind;
use crate::hook::{HookController, HookError};
use crate::platform::WindowSystem;
use crate::track::PointerTrack;

/// What a host expects from an input provider.
pub trait MotionEventProvider {
    /// Begin collecting input.
    #[allow(clippy::missing_errors_doc)]
    fn start(&mut self) -> Result<(), HookError>;
    /// Called once per polling tick. Dispatches everything collected since the last call.
    fn update(&mut self, dispatch: &mut dyn FnMut(EventKind, &PointerTrack));
    /// Stop collecting input.
    #[allow(clippy::missing_errors_doc)]
    fn stop(&mut self) -> Result<(), HookError>;
}

impl<W: WindowSystem> MotionEventProvider for HookController<W> {
    fn start(&mut self) -> Result<(), HookError> {
        HookController::start(self)
    }
    fn update(&mut self, dispatch: &mut dyn FnMut(EventKind, &PointerTrack)) {
        self.drain(dispatch);
    }
    fn stop(&mut self) -> Result<(), HookError> {
        HookController::stop(self)
    }
}

/// Makes a ready-to-start provider.
pub type ProviderConstructor = fn() -> Result<Box<dyn MotionEventProvider>, BuildError>;

/// Host-side table of providers.
pub trait ProviderRegistry {
    fn register(&mut self, name: &'static str, constructor: ProviderConstructor);
}

/// A plain [`ProviderRegistry`], for hosts without one of their own.
#[derive(Default, Debug)]
pub struct Factory {
    providers: BTreeMap<&'static str, ProviderConstructor>,
}
impl Factory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.providers.keys().copied()
    }
    #[must_use]
    pub fn get(&self, name: &str) -> Option<ProviderConstructor> {
        self.providers.get(name).copied()
    }
    /// Construct the provider registered as `name`. `None` if there is none.
    #[must_use]
    pub fn create(&self, name: &str) -> Option<Result<Box<dyn MotionEventProvider>, BuildError>> {
        self.get(name).map(|constructor| constructor())
    }
}
impl ProviderRegistry for Factory {
    fn register(&mut self, name: &'static str, constructor: ProviderConstructor) {
        if self.providers.insert(name, constructor).is_some() {
            log::debug!("provider `{name}` re-registered");
        }
    }
}

fn construct_native() -> Result<Box<dyn MotionEventProvider>, BuildError> {
    let controller = Builder::new().build_native()?;
    Ok(Box::new(controller))
}

/// Register the native pen provider with `registry`.
pub fn register(registry: &mut impl ProviderRegistry) {
    registry.register(crate::PROVIDER_NAME, construct_native);
}
