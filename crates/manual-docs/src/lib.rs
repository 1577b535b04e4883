//! Documents as the reader and admin views see them.
//!
//! Persistence lives elsewhere; this crate decodes what the store exports,
//! projects it for list views, renders document bodies through
//! `manual-render`, and tracks client view state.

pub mod access;
pub mod catalog;
pub mod model;
pub mod state;
pub mod view;

pub use access::{require_admin, require_login, AccessError};
pub use catalog::{Catalog, CatalogError, CategoryFilter};
pub use model::{
    sort_newest_first, AuthStatus, Document, DocumentSummary, Role, SessionUser, User,
    UNCATEGORIZED,
};
pub use state::{ReaderState, View};
pub use view::{
    format_timestamp, format_timestamp_in, view_document, DocumentView, DEFAULT_DATE_FORMAT,
};
