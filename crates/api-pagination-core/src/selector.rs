//! Backend selection.
//!
//! The [`BackendSelector`] decides which registered backend serves
//! pagination requests. On first use it checks the [`BackendRegistry`]:
//! exactly one present backend is activated; several present backends leave
//! the selector in [`SelectorState::Ambiguous`] with a single warning, and it
//! stays there until a backend is selected explicitly. Nothing present keeps
//! it [`SelectorState::Unresolved`], so a backend registered later is still
//! picked up.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::backend::BackendId;
use crate::error::{PaginationError, PaginationResult};
use crate::registry::BackendRegistry;

/// Where the selector is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorState {
    /// No detection has succeeded yet.
    #[default]
    Unresolved,
    /// A backend is active.
    Resolved(BackendId),
    /// Several backends were detected; only an explicit selection resolves this.
    Ambiguous(Vec<BackendId>),
}

/// Builds the warning logged when detection finds more than one backend.
pub fn ambiguity_warning(candidates: &[BackendId]) -> String {
    let names = candidates
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let example = candidates.first().copied().unwrap_or(BackendId::Scope);

    format!(
        "api-pagination relies on one pagination backend, but more than one is present ({names}). \
         Select the backend yourself, for example with \
         `PAGINATION.configure(|config| config.set_backend(\"{example}\"))` \
         or `backend = \"{example}\"` in the configuration file. \
         Or turn off the cargo features of the backends you don't use, for example \
         `api-pagination = {{ default-features = false, features = [\"{example}\"] }}`, \
         so only one of them reports itself present."
    )
}

/// Chooses the active pagination backend.
#[derive(Debug, Default)]
pub struct BackendSelector {
    state: Mutex<SelectorState>,
}

impl BackendSelector {
    /// Creates a selector that will auto-detect on first use.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&mut self) -> &mut SelectorState {
        self.state.get_mut().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a snapshot of the current state.
    pub fn state(&self) -> SelectorState {
        self.lock().clone()
    }

    /// Returns the active backend, detecting it on first use.
    ///
    /// Returns `None` while no backend is present or while the selector is
    /// ambiguous. Activation hooks run with the selector locked and must not
    /// read the selector back.
    pub fn active_backend(&self, registry: &BackendRegistry) -> Option<BackendId> {
        let mut state = self.lock();
        match &*state {
            SelectorState::Resolved(id) => return Some(*id),
            SelectorState::Ambiguous(_) => return None,
            SelectorState::Unresolved => {}
        }

        let present = registry.present();
        match present.as_slice() {
            [] => {
                tracing::debug!("no pagination backend present");
                None
            }
            [id] => {
                let id = *id;
                registry.activate(id);
                *state = SelectorState::Resolved(id);
                tracing::debug!(backend = %id, "pagination backend detected");
                Some(id)
            }
            _ => {
                tracing::warn!("{}", ambiguity_warning(&present));
                *state = SelectorState::Ambiguous(present);
                None
            }
        }
    }

    /// Like [`active_backend`](Self::active_backend), but reports why no
    /// backend is available.
    pub fn require(&self, registry: &BackendRegistry) -> PaginationResult<BackendId> {
        if let Some(id) = self.active_backend(registry) {
            return Ok(id);
        }
        match self.state() {
            SelectorState::Ambiguous(candidates) => {
                Err(PaginationError::AmbiguousBackend(candidates))
            }
            _ => Err(PaginationError::NoBackend),
        }
    }

    /// Selects a backend by identifier, bypassing detection.
    ///
    /// An unknown identifier fails with [`PaginationError::UnknownBackend`]
    /// and leaves the current state untouched.
    pub fn select(&mut self, id: &str, registry: &BackendRegistry) -> PaginationResult<BackendId> {
        let id = id.parse::<BackendId>()?;
        self.select_id(id, registry);
        Ok(id)
    }

    /// Selects `id`, bypassing detection and running its activation hook.
    pub fn select_id(&mut self, id: BackendId, registry: &BackendRegistry) {
        registry.activate(id);
        *self.state_mut() = SelectorState::Resolved(id);
        tracing::debug!(backend = %id, "pagination backend selected");
    }

    /// Returns to auto-detection.
    pub fn reset(&mut self) {
        *self.state_mut() = SelectorState::Unresolved;
    }
}
