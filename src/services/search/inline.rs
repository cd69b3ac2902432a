use super::{push_candidate_match, SearchAdapter};
use crate::dto::candidate_dto::{Page, Pagination};
use crate::error::Result;
use crate::models::candidate::Candidate;
use async_trait::async_trait;
use sqlx::{QueryBuilder, SqlitePool};

/// Default search backend: the same substring match the list filter uses,
/// straight against the candidates table. Nothing to keep in sync.
#[derive(Clone)]
pub struct InlineSearch {
    pool: SqlitePool,
}

impl InlineSearch {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SearchAdapter for InlineSearch {
    async fn search(&self, term: &str, page: u32, per_page: u32) -> Result<Page<Candidate>> {
        let pattern = format!("%{}%", term);

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM candidates WHERE ");
        push_candidate_match(&mut count_query, &pattern);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let offset = (page.max(1) - 1) as i64 * per_page as i64;
        let mut query = QueryBuilder::new("SELECT * FROM candidates WHERE ");
        push_candidate_match(&mut query, &pattern);
        query.push(" ORDER BY created_at DESC, id DESC LIMIT ");
        query.push_bind(per_page as i64);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let items = query
            .build_query_as::<Candidate>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(total as u64, page, per_page),
        })
    }

    async fn sync_upsert(&self, _candidate: &Candidate) -> Result<()> {
        Ok(())
    }

    async fn sync_delete(&self, _id: i64) -> Result<()> {
        Ok(())
    }
}
