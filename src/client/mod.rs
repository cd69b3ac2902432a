//! Client-side counterpart of the candidate API: an explicit session
//! context, a typed HTTP client, and the pure state machines behind the
//! list and form views.

pub mod api;
pub mod form_state;
pub mod list_state;
pub mod session;
