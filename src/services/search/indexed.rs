use super::SearchAdapter;
use crate::dto::candidate_dto::{Page, Pagination};
use crate::error::Result;
use crate::models::candidate::{Candidate, SearchDocument};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const INDEX_NAME: &str = "candidates";

/// Fields inside the serialized document a query is matched against. Kept in
/// step with the inline backend's column set so both variants answer alike.
const DOCUMENT_FIELDS: [&str; 5] = [
    "$.first_name",
    "$.last_name",
    "$.email",
    "$.position_applied",
    "$.current_company",
];

/// Index-table search backend: mirrors a denormalized projection of every
/// candidate into `search_index` and answers queries from there, hydrating
/// the matching rows. Eventually consistent, never authoritative.
#[derive(Clone)]
pub struct IndexedSearch {
    pool: SqlitePool,
}

impl IndexedSearch {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn push_document_match(qb: &mut QueryBuilder<'_, Sqlite>, pattern: &str) {
        qb.push("(");
        for (i, field) in DOCUMENT_FIELDS.iter().enumerate() {
            if i > 0 {
                qb.push(" OR ");
            }
            qb.push(format!("json_extract(s.value, '{}') LIKE ", field));
            qb.push_bind(pattern.to_string());
        }
        qb.push(")");
    }

    pub async fn entry_count(&self) -> Result<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM search_index WHERE idx = ?1")
                .bind(INDEX_NAME)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}

#[async_trait]
impl SearchAdapter for IndexedSearch {
    async fn search(&self, term: &str, page: u32, per_page: u32) -> Result<Page<Candidate>> {
        let pattern = format!("%{}%", term);

        let mut count_query = QueryBuilder::new(
            "SELECT COUNT(*) FROM search_index s WHERE s.idx = ",
        );
        count_query.push_bind(INDEX_NAME);
        count_query.push(" AND ");
        Self::push_document_match(&mut count_query, &pattern);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let offset = (page.max(1) - 1) as i64 * per_page as i64;
        let mut query = QueryBuilder::new(
            "SELECT c.* FROM candidates c \
             JOIN search_index s ON s.idx = ",
        );
        query.push_bind(INDEX_NAME);
        query.push(" AND s.key = CAST(c.id AS TEXT) WHERE ");
        Self::push_document_match(&mut query, &pattern);
        query.push(" ORDER BY c.created_at DESC, c.id DESC LIMIT ");
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

    async fn sync_upsert(&self, candidate: &Candidate) -> Result<()> {
        let document = serde_json::to_string(&SearchDocument::from(candidate))?;
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO search_index (idx, key, value, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) \
             ON CONFLICT (idx, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(INDEX_NAME)
        .bind(candidate.id.to_string())
        .bind(document)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn sync_delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM search_index WHERE idx = ?1 AND key = ?2")
            .bind(INDEX_NAME)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
