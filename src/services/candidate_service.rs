use crate::dto::candidate_dto::{
    CandidateForm, ListParams, Page, Pagination, StatisticsData, DEFAULT_LIST_PER_PAGE,
    DEFAULT_SEARCH_PER_PAGE,
};
use crate::error::{Error, Result};
use crate::models::candidate::{Candidate, CandidateStatus, Salary};
use crate::services::search::{push_candidate_match, SearchAdapter};
use crate::services::storage_service::ResumeStorage;
use chrono::Utc;
use sqlx::{QueryBuilder, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

const INSERT_COLUMNS: &str = "first_name, last_name, email, phone, address, city, state, \
     country, postal_code, date_of_birth, position_applied, experience_summary, \
     current_company, current_position, expected_salary, resume_path, status, notes, \
     created_at, updated_at";

#[derive(Clone)]
pub struct CandidateService {
    pool: SqlitePool,
    storage: ResumeStorage,
    search: Arc<dyn SearchAdapter>,
}

impl CandidateService {
    pub fn new(pool: SqlitePool, storage: ResumeStorage, search: Arc<dyn SearchAdapter>) -> Self {
        Self {
            pool,
            storage,
            search,
        }
    }

    pub fn storage(&self) -> &ResumeStorage {
        &self.storage
    }

    pub async fn get(&self, id: i64) -> Result<Option<Candidate>> {
        let candidate = sqlx::query_as::<_, Candidate>("SELECT * FROM candidates WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(candidate)
    }

    pub async fn list(&self, params: &ListParams) -> Result<Page<Candidate>> {
        let per_page = params.per_page.unwrap_or(DEFAULT_LIST_PER_PAGE).max(1);
        let page = params.page.unwrap_or(1).max(1);
        let term = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM candidates WHERE 1 = 1");
        if let Some(term) = term {
            count_query.push(" AND ");
            push_candidate_match(&mut count_query, &format!("%{}%", term));
        }
        if let Some(status) = params.status {
            count_query.push(" AND status = ");
            count_query.push_bind(status);
        }
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let sort_column = sort_column(params.sort_by.as_deref());
        let sort_order = params.sort_order.unwrap_or_default();

        let mut query = QueryBuilder::new("SELECT * FROM candidates WHERE 1 = 1");
        if let Some(term) = term {
            query.push(" AND ");
            push_candidate_match(&mut query, &format!("%{}%", term));
        }
        if let Some(status) = params.status {
            query.push(" AND status = ");
            query.push_bind(status);
        }
        // id keeps the order stable when the sort field has duplicates
        query.push(format!(
            " ORDER BY {} {}, id {} LIMIT ",
            sort_column,
            sort_order.as_sql(),
            sort_order.as_sql()
        ));
        query.push_bind(per_page as i64);
        query.push(" OFFSET ");
        query.push_bind((page as i64 - 1) * per_page as i64);

        let items = query
            .build_query_as::<Candidate>()
            .fetch_all(&self.pool)
            .await?;

        Ok(Page {
            items,
            pagination: Pagination::new(total as u64, page, per_page),
        })
    }

    /// Blank queries short-circuit to an empty single-page envelope before
    /// the adapter is consulted; they never fall back to listing everything.
    pub async fn search(&self, q: &str, page: Option<u32>, per_page: Option<u32>) -> Result<Page<Candidate>> {
        let per_page = per_page.unwrap_or(DEFAULT_SEARCH_PER_PAGE).max(1);
        let page = page.unwrap_or(1).max(1);
        let term = q.trim();
        if term.is_empty() {
            return Ok(Page::empty(per_page));
        }
        self.search.search(term, page, per_page).await
    }

    pub async fn create(&self, form: CandidateForm) -> Result<Candidate> {
        form.validate_create()?;
        let fields = &form.fields;

        let email = fields.email.as_deref().unwrap_or_default().trim().to_string();
        if self.email_taken(&email, None).await? {
            return Err(Error::Conflict("This email is already registered.".to_string()));
        }

        let resume_path = match &form.resume {
            Some(upload) => Some(self.storage.store(&upload.filename, &upload.data).await?),
            None => None,
        };

        let now = Utc::now();
        let status = fields.status.unwrap_or_default();
        let insert = sqlx::query_as::<_, Candidate>(&format!(
            "INSERT INTO candidates ({}) VALUES \
             (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?19) \
             RETURNING *",
            INSERT_COLUMNS
        ))
        .bind(fields.first_name.as_deref().unwrap_or_default().trim())
        .bind(fields.last_name.as_deref().unwrap_or_default().trim())
        .bind(&email)
        .bind(&fields.phone)
        .bind(&fields.address)
        .bind(&fields.city)
        .bind(&fields.state)
        .bind(&fields.country)
        .bind(&fields.postal_code)
        .bind(fields.date_of_birth)
        .bind(&fields.position_applied)
        .bind(&fields.experience_summary)
        .bind(&fields.current_company)
        .bind(&fields.current_position)
        .bind(fields.expected_salary.map(Salary))
        .bind(&resume_path)
        .bind(status)
        .bind(&fields.notes)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        let candidate = match insert {
            Ok(candidate) => candidate,
            Err(e) => {
                // the row never landed; don't leave the file behind
                if let Some(key) = &resume_path {
                    self.storage.delete_quiet(key).await;
                }
                return Err(e.into());
            }
        };

        self.replay_upsert(&candidate).await;
        Ok(candidate)
    }

    pub async fn update(&self, id: i64, form: CandidateForm) -> Result<Candidate> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
        form.validate_update()?;
        let fields = &form.fields;

        let email = match fields.email.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(new_email) => {
                if self.email_taken(new_email, Some(id)).await? {
                    return Err(Error::Conflict("This email is already registered.".to_string()));
                }
                new_email.to_string()
            }
            None => existing.email.clone(),
        };

        // A rejected replacement must leave the stored file alone, so the
        // new upload is checked before the superseded one is removed.
        let resume_path = match &form.resume {
            Some(upload) => {
                ResumeStorage::validate(&upload.filename, &upload.data)?;
                if let Some(old) = &existing.resume_path {
                    self.storage.delete_quiet(old).await;
                }
                Some(self.storage.store(&upload.filename, &upload.data).await?)
            }
            None => existing.resume_path.clone(),
        };

        let merge = |new: &Option<String>, old: &Option<String>| -> Option<String> {
            new.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .or_else(|| old.clone())
        };

        let now = Utc::now();
        let candidate = sqlx::query_as::<_, Candidate>(
            "UPDATE candidates SET \
               first_name = ?1, last_name = ?2, email = ?3, phone = ?4, address = ?5, \
               city = ?6, state = ?7, country = ?8, postal_code = ?9, date_of_birth = ?10, \
               position_applied = ?11, experience_summary = ?12, current_company = ?13, \
               current_position = ?14, expected_salary = ?15, resume_path = ?16, \
               status = ?17, notes = ?18, updated_at = ?19 \
             WHERE id = ?20 RETURNING *",
        )
        .bind(
            fields
                .first_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(&existing.first_name),
        )
        .bind(
            fields
                .last_name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(&existing.last_name),
        )
        .bind(&email)
        .bind(merge(&fields.phone, &existing.phone))
        .bind(merge(&fields.address, &existing.address))
        .bind(merge(&fields.city, &existing.city))
        .bind(merge(&fields.state, &existing.state))
        .bind(merge(&fields.country, &existing.country))
        .bind(merge(&fields.postal_code, &existing.postal_code))
        .bind(fields.date_of_birth.or(existing.date_of_birth))
        .bind(merge(&fields.position_applied, &existing.position_applied))
        .bind(merge(&fields.experience_summary, &existing.experience_summary))
        .bind(merge(&fields.current_company, &existing.current_company))
        .bind(merge(&fields.current_position, &existing.current_position))
        .bind(fields.expected_salary.map(Salary).or(existing.expected_salary))
        .bind(&resume_path)
        .bind(fields.status.unwrap_or(existing.status))
        .bind(merge(&fields.notes, &existing.notes))
        .bind(now)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        self.replay_upsert(&candidate).await;
        Ok(candidate)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let existing = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;

        if let Some(key) = &existing.resume_path {
            self.storage.delete_quiet(key).await;
        }

        sqlx::query("DELETE FROM candidates WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if let Err(e) = self.search.sync_delete(id).await {
            tracing::warn!("Search index delete for candidate {} failed: {}", id, e);
        }
        Ok(())
    }

    pub async fn statistics(&self) -> Result<StatisticsData> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM candidates")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, (CandidateStatus, i64)>(
            "SELECT status, COUNT(*) FROM candidates GROUP BY status",
        )
        .fetch_all(&self.pool)
        .await?;
        let by_status: HashMap<String, i64> = rows
            .into_iter()
            .map(|(status, count)| (status.to_string(), count))
            .collect();

        let recent = sqlx::query_as::<_, Candidate>(
            "SELECT * FROM candidates ORDER BY created_at DESC, id DESC LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(StatisticsData {
            total,
            by_status,
            recent,
        })
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> Result<bool> {
        let mut query =
            QueryBuilder::new("SELECT COUNT(*) FROM candidates WHERE LOWER(email) = LOWER(");
        query.push_bind(email.to_string());
        query.push(")");
        if let Some(id) = exclude_id {
            query.push(" AND id != ");
            query.push_bind(id);
        }
        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    /// Index replay is best-effort; the row is authoritative.
    async fn replay_upsert(&self, candidate: &Candidate) {
        if let Err(e) = self.search.sync_upsert(candidate).await {
            tracing::warn!(
                "Search index upsert for candidate {} failed: {}",
                candidate.id,
                e
            );
        }
    }
}

fn sort_column(requested: Option<&str>) -> &'static str {
    match requested {
        Some("updated_at") => "updated_at",
        Some("first_name") => "first_name",
        Some("last_name") => "last_name",
        Some("email") => "email",
        Some("status") => "status",
        Some("expected_salary") => "expected_salary",
        Some("position_applied") => "position_applied",
        _ => "created_at",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::candidate_dto::CandidateFields;
    use crate::services::search::{inline::InlineSearch, MockSearchAdapter};
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("migrations");
        pool
    }

    fn inline_service(pool: &SqlitePool, dir: &std::path::Path) -> CandidateService {
        CandidateService::new(
            pool.clone(),
            ResumeStorage::new(dir),
            Arc::new(InlineSearch::new(pool.clone())),
        )
    }

    fn form(first: &str, last: &str, email: &str) -> CandidateForm {
        CandidateForm {
            fields: CandidateFields {
                first_name: Some(first.to_string()),
                last_name: Some(last.to_string()),
                email: Some(email.to_string()),
                ..Default::default()
            },
            resume: None,
        }
    }

    #[tokio::test]
    async fn create_defaults_status_to_new() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let candidate = service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();
        assert_eq!(candidate.status, CandidateStatus::New);
        assert_eq!(candidate.email, "ann@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_case_insensitively() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();
        let err = service
            .create(form("Anna", "Leeds", "ANN@X.COM"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn update_keeps_unmentioned_fields() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let mut create = form("Ann", "Lee", "ann@x.com");
        create.fields.current_company = Some("Acme".to_string());
        let candidate = service.create(create).await.unwrap();

        let patch = CandidateForm {
            fields: CandidateFields {
                status: Some(CandidateStatus::Hired),
                ..Default::default()
            },
            resume: None,
        };
        let updated = service.update(candidate.id, patch).await.unwrap();
        assert_eq!(updated.status, CandidateStatus::Hired);
        assert_eq!(updated.first_name, "Ann");
        assert_eq!(updated.current_company.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn update_allows_keeping_own_email() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let candidate = service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();
        let patch = CandidateForm {
            fields: CandidateFields {
                email: Some("ann@x.com".to_string()),
                ..Default::default()
            },
            resume: None,
        };
        assert!(service.update(candidate.id, patch).await.is_ok());
    }

    #[tokio::test]
    async fn update_and_delete_unknown_id_are_not_found() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let err = service.update(999, CandidateForm::default()).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        let err = service.delete(999).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn list_defaults_to_newest_first_with_accurate_total() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        for i in 0..4 {
            service
                .create(form("User", "Test", &format!("user{}@x.com", i)))
                .await
                .unwrap();
        }

        let page = service.list(&ListParams::default()).await.unwrap();
        assert_eq!(page.pagination.total, 4);
        assert_eq!(page.items.len(), 4);
        let ids: Vec<i64> = page.items.iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn list_filters_by_status_and_substring() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let mut ann = form("Ann", "Lee", "ann@x.com");
        ann.fields.current_company = Some("Globex".to_string());
        service.create(ann).await.unwrap();
        let mut bob = form("Bob", "Ray", "bob@x.com");
        bob.fields.status = Some(CandidateStatus::Hired);
        service.create(bob).await.unwrap();

        let by_status = service
            .list(&ListParams {
                status: Some(CandidateStatus::Hired),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_status.pagination.total, 1);
        assert_eq!(by_status.items[0].email, "bob@x.com");

        let by_company = service
            .list(&ListParams {
                search: Some("globex".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_company.pagination.total, 1);
        assert_eq!(by_company.items[0].email, "ann@x.com");
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_valid() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());
        service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();

        let page = service
            .list(&ListParams {
                page: Some(9),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.pagination.current_page, 9);
    }

    #[tokio::test]
    async fn blank_search_returns_empty_envelope_without_listing() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());
        service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();

        for q in ["", "   "] {
            let page = service.search(q, None, None).await.unwrap();
            assert!(page.items.is_empty());
            assert_eq!(page.pagination.total, 0);
            assert_eq!(page.pagination.current_page, 1);
            assert_eq!(page.pagination.last_page, 1);
            assert_eq!(page.pagination.per_page, DEFAULT_SEARCH_PER_PAGE);
        }
    }

    #[tokio::test]
    async fn search_matches_substring_case_insensitively() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let mut ann = form("Ann", "Lee", "ann@x.com");
        ann.fields.position_applied = Some("Backend Engineer".to_string());
        service.create(ann).await.unwrap();
        service.create(form("Bob", "Ray", "bob@x.com")).await.unwrap();

        let page = service.search("backend", None, None).await.unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].email, "ann@x.com");
    }

    #[tokio::test]
    async fn statistics_counts_sum_to_total_and_recent_is_capped() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        for i in 0..7 {
            let mut f = form("User", "Test", &format!("user{}@x.com", i));
            if i % 2 == 0 {
                f.fields.status = Some(CandidateStatus::Reviewed);
            }
            service.create(f).await.unwrap();
        }

        let stats = service.statistics().await.unwrap();
        assert_eq!(stats.total, 7);
        assert_eq!(stats.by_status.values().sum::<i64>(), stats.total);
        assert_eq!(stats.recent.len(), 5);
        let ids: Vec<i64> = stats.recent.iter().map(|c| c.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn mutations_replay_through_the_search_adapter() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();

        let mut adapter = MockSearchAdapter::new();
        adapter.expect_sync_upsert().times(2).returning(|_| Ok(()));
        adapter.expect_sync_delete().times(1).returning(|_| Ok(()));

        let service = CandidateService::new(
            pool.clone(),
            ResumeStorage::new(tmp.path()),
            Arc::new(adapter),
        );

        let candidate = service.create(form("Ann", "Lee", "ann@x.com")).await.unwrap();
        let patch = CandidateForm {
            fields: CandidateFields {
                status: Some(CandidateStatus::Hired),
                ..Default::default()
            },
            resume: None,
        };
        service.update(candidate.id, patch).await.unwrap();
        service.delete(candidate.id).await.unwrap();
    }

    #[tokio::test]
    async fn adapter_failures_do_not_fail_the_row_operation() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();

        let mut adapter = MockSearchAdapter::new();
        adapter
            .expect_sync_upsert()
            .returning(|_| Err(Error::Internal("index offline".to_string())));

        let service = CandidateService::new(
            pool.clone(),
            ResumeStorage::new(tmp.path()),
            Arc::new(adapter),
        );
        assert!(service.create(form("Ann", "Lee", "ann@x.com")).await.is_ok());
    }

    #[tokio::test]
    async fn resume_lifecycle_replaces_and_removes_files() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let upload = crate::dto::candidate_dto::ResumeUpload {
            filename: "cv.pdf".to_string(),
            data: bytes::Bytes::from_static(b"%PDF-1.4 first"),
        };
        let mut create = form("Ann", "Lee", "ann@x.com");
        create.resume = Some(upload);
        let candidate = service.create(create).await.unwrap();
        let first_key = candidate.resume_path.clone().unwrap();
        assert!(service.storage().exists(&first_key).await);

        let patch = CandidateForm {
            fields: CandidateFields::default(),
            resume: Some(crate::dto::candidate_dto::ResumeUpload {
                filename: "cv2.pdf".to_string(),
                data: bytes::Bytes::from_static(b"%PDF-1.4 second"),
            }),
        };
        let updated = service.update(candidate.id, patch).await.unwrap();
        let second_key = updated.resume_path.clone().unwrap();
        assert_ne!(first_key, second_key);
        assert!(!service.storage().exists(&first_key).await);
        assert!(service.storage().exists(&second_key).await);

        service.delete(candidate.id).await.unwrap();
        assert!(!service.storage().exists(&second_key).await);
        assert!(service.get(candidate.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn rejected_replacement_keeps_the_old_resume() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let mut create = form("Ann", "Lee", "ann@x.com");
        create.resume = Some(crate::dto::candidate_dto::ResumeUpload {
            filename: "cv.pdf".to_string(),
            data: bytes::Bytes::from_static(b"%PDF-1.4 original"),
        });
        let candidate = service.create(create).await.unwrap();
        let key = candidate.resume_path.clone().unwrap();

        let patch = CandidateForm {
            fields: CandidateFields::default(),
            resume: Some(crate::dto::candidate_dto::ResumeUpload {
                filename: "cv.exe".to_string(),
                data: bytes::Bytes::from_static(b"MZ"),
            }),
        };
        let err = service.update(candidate.id, patch).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let unchanged = service.get(candidate.id).await.unwrap().unwrap();
        assert_eq!(unchanged.resume_path.as_deref(), Some(key.as_str()));
        assert!(service.storage().exists(&key).await);
    }

    #[tokio::test]
    async fn orphan_sweep_removes_only_unreferenced_files() {
        let pool = test_pool().await;
        let tmp = tempfile::tempdir().unwrap();
        let service = inline_service(&pool, tmp.path());

        let mut create = form("Ann", "Lee", "ann@x.com");
        create.resume = Some(crate::dto::candidate_dto::ResumeUpload {
            filename: "cv.pdf".to_string(),
            data: bytes::Bytes::from_static(b"%PDF-1.4 body"),
        });
        let candidate = service.create(create).await.unwrap();
        let referenced = candidate.resume_path.clone().unwrap();

        tokio::fs::write(tmp.path().join("stray.pdf"), b"%PDF-1.4 stray")
            .await
            .unwrap();

        let removed = service.storage().sweep_orphans(&pool).await.unwrap();
        assert_eq!(removed, 1);
        assert!(service.storage().exists(&referenced).await);
        assert!(!service.storage().exists("stray.pdf").await);
    }
}
