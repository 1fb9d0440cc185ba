//! Registry of pagination backends available to the host process.
//!
//! A backend strategy takes part in auto-detection by registering a
//! [`BackendRegistration`]: its [`BackendId`], a presence check, and an
//! optional activation hook. The selector asks the registry which backends
//! are present and runs the hook of the one it activates.

use std::fmt;
use std::sync::Arc;

use crate::backend::BackendId;

/// Reports whether a backend is available.
pub type PresenceCheck = Arc<dyn Fn() -> bool + Send + Sync>;

/// One-time initialization run when a backend is activated.
pub type ActivationHook = Arc<dyn Fn(BackendId) + Send + Sync>;

/// A backend's entry in the [`BackendRegistry`].
///
/// # Examples
///
/// ```
/// use api_pagination_core::backend::BackendId;
/// use api_pagination_core::registry::BackendRegistration;
///
/// let registration = BackendRegistration::new(BackendId::Scope, || true);
/// assert!(registration.is_present());
/// ```
#[derive(Clone)]
pub struct BackendRegistration {
    id: BackendId,
    detect: PresenceCheck,
    on_activate: Option<ActivationHook>,
}

impl BackendRegistration {
    /// Registers `id` with a presence check.
    pub fn new<F>(id: BackendId, detect: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Self {
            id,
            detect: Arc::new(detect),
            on_activate: None,
        }
    }

    /// Registers `id` as unconditionally present.
    pub fn present(id: BackendId) -> Self {
        Self::new(id, || true)
    }

    /// Sets the hook run each time this backend is activated.
    #[must_use]
    pub fn with_activation_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(BackendId) + Send + Sync + 'static,
    {
        self.on_activate = Some(Arc::new(hook));
        self
    }

    /// The backend this entry describes.
    pub const fn id(&self) -> BackendId {
        self.id
    }

    /// Runs the presence check.
    pub fn is_present(&self) -> bool {
        (self.detect)()
    }

    /// Runs the activation hook, if any.
    pub fn activate(&self) {
        if let Some(hook) = &self.on_activate {
            hook(self.id);
        }
    }
}

impl fmt::Debug for BackendRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistration")
            .field("id", &self.id)
            .field("has_activation_hook", &self.on_activate.is_some())
            .finish_non_exhaustive()
    }
}

/// The set of registered backends.
#[derive(Debug, Clone, Default)]
pub struct BackendRegistry {
    entries: Vec<BackendRegistration>,
}

impl BackendRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a backend, replacing any earlier registration with the same id.
    pub fn register(&mut self, registration: BackendRegistration) {
        self.entries.retain(|entry| entry.id != registration.id);
        self.entries.push(registration);
    }

    /// Returns the registration for `id`.
    pub fn get(&self, id: BackendId) -> Option<&BackendRegistration> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Returns `true` if `id` has been registered.
    pub fn is_registered(&self, id: BackendId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the ids of every registered backend whose presence check reports it
    /// present, in detection priority order regardless of registration order.
    pub fn present(&self) -> Vec<BackendId> {
        BackendId::PRIORITY
            .into_iter()
            .filter(|id| self.get(*id).is_some_and(BackendRegistration::is_present))
            .collect()
    }

    /// Runs the activation hook for `id`, if it is registered.
    pub fn activate(&self, id: BackendId) {
        if let Some(entry) = self.get(id) {
            entry.activate();
        }
    }

    /// Returns the number of registered backends.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
