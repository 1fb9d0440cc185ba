//! # api-pagination-backends
//!
//! The pagination strategies behind api-pagination and the adapter that
//! hides their differences.
//!
//! ## Modules
//!
//! - [`collection`] - The [`Collection`] input trait
//! - [`adapter`] - [`PageInfo`], [`NormalizedPageInfo`], and [`adapt`]
//! - [`paginator`] - The `paginator` backend
//! - [`scope`] - The `scope` backend
//! - [`entries`] - The `collection` backend
//!
//! [`paginate`] runs whichever backend is named and returns a [`Paginated`]
//! page; [`register_builtin`] makes the built-in backends available to
//! detection.

pub mod adapter;
pub mod collection;
pub mod entries;
pub mod paginator;
pub mod scope;

use api_pagination_core::{BackendId, BackendRegistration, Configuration};

pub use adapter::{adapt, NormalizedPageInfo, PageInfo};
pub use collection::Collection;
pub use entries::EntryCollection;
pub use paginator::{Page, Paginator};
pub use scope::{Scope, ScopedPage};

/// What a single pagination call asks a backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
    /// Whether totals are wanted; backends that can skip counting do.
    pub include_total: bool,
}

impl PageRequest {
    /// A request for `page` of `per_page`, both raised to at least 1.
    pub fn new(page: u64, per_page: u64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
            include_total: true,
        }
    }

    /// Sets whether totals are wanted.
    #[must_use]
    pub const fn include_total(mut self, include_total: bool) -> Self {
        self.include_total = include_total;
        self
    }
}

/// A page produced by one of the backends.
#[derive(Debug, Clone)]
pub enum Paginated<T> {
    Paginator(Page<T>),
    Scope(ScopedPage<T>),
    Collection(EntryCollection<T>),
}

impl<T> Paginated<T> {
    /// The backend that produced this page.
    pub const fn backend(&self) -> BackendId {
        match self {
            Self::Paginator(_) => BackendId::Paginator,
            Self::Scope(_) => BackendId::Scope,
            Self::Collection(_) => BackendId::Collection,
        }
    }

    /// The records on this page.
    pub fn items(&self) -> &[T] {
        match self {
            Self::Paginator(page) => page.object_list(),
            Self::Scope(page) => page.records(),
            Self::Collection(page) => page.entries(),
        }
    }

    /// Consumes the page, returning its records.
    pub fn into_items(self) -> Vec<T> {
        match self {
            Self::Paginator(page) => page.into_object_list(),
            Self::Scope(page) => page.into_records(),
            Self::Collection(page) => page.into_entries(),
        }
    }

    fn as_page_info(&self) -> &dyn PageInfo {
        match self {
            Self::Paginator(page) => page,
            Self::Scope(page) => page,
            Self::Collection(page) => page,
        }
    }

    /// The normalized page metadata.
    pub fn info(&self) -> NormalizedPageInfo {
        adapt(self.as_page_info())
    }
}

impl<T> PageInfo for Paginated<T> {
    fn current_page(&self) -> u64 {
        self.as_page_info().current_page()
    }

    fn per_page(&self) -> u64 {
        self.as_page_info().per_page()
    }

    fn total_entries(&self) -> Option<u64> {
        self.as_page_info().total_entries()
    }

    fn total_pages(&self) -> Option<u64> {
        self.as_page_info().total_pages()
    }

    fn is_first_page(&self) -> bool {
        self.as_page_info().is_first_page()
    }

    fn is_last_page(&self) -> bool {
        self.as_page_info().is_last_page()
    }
}

/// Paginates `collection` with the backend named by `backend`.
///
/// The `paginator` backend clamps out-of-range pages to the last page; the
/// other two return an empty page past the end.
///
/// # Examples
///
/// ```
/// use api_pagination_backends::{paginate, PageRequest};
/// use api_pagination_core::BackendId;
///
/// let items: Vec<u32> = (1..=50).collect();
/// let page = paginate(BackendId::Scope, &items, PageRequest::new(1, 5));
/// assert_eq!(page.items(), &[1, 2, 3, 4, 5]);
/// assert_eq!(page.info().total_pages, Some(10));
/// ```
pub fn paginate<C>(backend: BackendId, collection: &C, request: PageRequest) -> Paginated<C::Item>
where
    C: Collection + ?Sized,
{
    tracing::debug!(
        backend = %backend,
        page = request.page,
        per_page = request.per_page,
        include_total = request.include_total,
        "paginating collection"
    );

    match backend {
        BackendId::Paginator => Paginated::Paginator(
            Paginator::new(collection, request.per_page).get_page(request.page),
        ),
        BackendId::Scope => {
            let scope = Scope::new(collection)
                .page(request.page)
                .per(request.per_page);
            let scope = if request.include_total {
                scope
            } else {
                scope.without_count()
            };
            Paginated::Scope(scope.load())
        }
        BackendId::Collection => Paginated::Collection(EntryCollection::paginate(
            collection,
            request.page,
            request.per_page,
        )),
    }
}

fn log_activation(id: BackendId) {
    tracing::info!(backend = %id, "pagination backend activated");
}

/// Registrations for the built-in backends.
///
/// A backend reports itself present when its cargo feature is enabled.
pub fn builtin_registrations() -> Vec<BackendRegistration> {
    vec![
        BackendRegistration::new(BackendId::Paginator, || cfg!(feature = "paginator"))
            .with_activation_hook(log_activation),
        BackendRegistration::new(BackendId::Scope, || cfg!(feature = "scope"))
            .with_activation_hook(log_activation),
        BackendRegistration::new(BackendId::Collection, || cfg!(feature = "collection"))
            .with_activation_hook(log_activation),
    ]
}

/// Registers the built-in backends with `config`.
pub fn register_builtin(config: &mut Configuration) {
    for registration in builtin_registrations() {
        config.register_backend(registration);
    }
}
