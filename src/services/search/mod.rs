pub mod indexed;
pub mod inline;

use crate::config::SearchBackend;
use crate::dto::candidate_dto::Page;
use crate::error::Result;
use crate::models::candidate::Candidate;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;

/// Columns a free-text query is OR-matched against, shared by the list
/// filter and the inline search backend.
pub(crate) const SEARCH_COLUMNS: [&str; 5] = [
    "first_name",
    "last_name",
    "email",
    "position_applied",
    "current_company",
];

pub(crate) fn push_candidate_match(qb: &mut QueryBuilder<'_, Sqlite>, pattern: &str) {
    qb.push("(");
    for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
        if i > 0 {
            qb.push(" OR ");
        }
        qb.push(*column);
        qb.push(" LIKE ");
        qb.push_bind(pattern.to_string());
    }
    qb.push(")");
}

/// Resolves text queries to candidate matches, and replays row mutations so
/// whatever backs the query stays in step with the store. Selected once at
/// startup; callers see the same response shape under either variant.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchAdapter: Send + Sync {
    async fn search(&self, term: &str, page: u32, per_page: u32) -> Result<Page<Candidate>>;

    async fn sync_upsert(&self, candidate: &Candidate) -> Result<()>;

    async fn sync_delete(&self, id: i64) -> Result<()>;
}

pub fn build(backend: SearchBackend, pool: SqlitePool) -> Arc<dyn SearchAdapter> {
    match backend {
        SearchBackend::Inline => Arc::new(inline::InlineSearch::new(pool)),
        SearchBackend::Indexed => Arc::new(indexed::IndexedSearch::new(pool)),
    }
}
