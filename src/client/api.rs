use super::session::Session;
use crate::dto::candidate_dto::{
    CandidateFields, ItemEnvelope, ListEnvelope, ListParams, MessageEnvelope, ResumeUpload,
    StatisticsEnvelope,
};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// Typed client for the candidate endpoints. Every call borrows the session
/// context rather than reaching for ambient state.
#[derive(Debug, Clone)]
pub struct CandidateApi {
    session: Session,
}

impl CandidateApi {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub async fn list(&self, params: &ListParams) -> Result<ListEnvelope> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(search) = &params.search {
            query.push(("search", search.clone()));
        }
        if let Some(status) = params.status {
            query.push(("status", status.to_string()));
        }
        if let Some(sort_by) = &params.sort_by {
            query.push(("sort_by", sort_by.clone()));
        }
        if let Some(order) = params.sort_order {
            query.push(("sort_order", order.as_sql().to_lowercase()));
        }
        if let Some(per_page) = params.per_page {
            query.push(("per_page", per_page.to_string()));
        }
        if let Some(page) = params.page {
            query.push(("page", page.to_string()));
        }

        let response = self
            .session
            .get("/api/candidates")
            .query(&query)
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn search(&self, q: &str, page: Option<u32>, per_page: Option<u32>) -> Result<ListEnvelope> {
        let mut query: Vec<(&str, String)> = vec![("q", q.to_string())];
        if let Some(page) = page {
            query.push(("page", page.to_string()));
        }
        if let Some(per_page) = per_page {
            query.push(("per_page", per_page.to_string()));
        }

        let response = self
            .session
            .get("/api/candidates-search")
            .query(&query)
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn get(&self, id: i64) -> Result<ItemEnvelope> {
        let response = self
            .session
            .get(&format!("/api/candidates/{}", id))
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn create(
        &self,
        fields: &CandidateFields,
        resume: Option<&ResumeUpload>,
    ) -> Result<ItemEnvelope> {
        let form = to_multipart(fields, resume)?;
        let response = self
            .session
            .post("/api/candidates")
            .multipart(form)
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn update(
        &self,
        id: i64,
        fields: &CandidateFields,
        resume: Option<&ResumeUpload>,
    ) -> Result<ItemEnvelope> {
        let form = to_multipart(fields, resume)?;
        let response = self
            .session
            .put(&format!("/api/candidates/{}", id))
            .multipart(form)
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn delete(&self, id: i64) -> Result<MessageEnvelope> {
        let response = self
            .session
            .delete(&format!("/api/candidates/{}", id))
            .send()
            .await?;
        read_envelope(response).await
    }

    pub async fn statistics(&self) -> Result<StatisticsEnvelope> {
        let response = self
            .session
            .get("/api/candidates-statistics")
            .send()
            .await?;
        read_envelope(response).await
    }
}

/// Failure body shape shared by every endpoint: a message plus, for 422,
/// per-field error messages.
#[derive(Debug, Default, serde::Deserialize)]
struct FailureBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: HashMap<String, Vec<String>>,
}

async fn read_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }
    let body = match response.json::<FailureBody>().await {
        Ok(body) => body,
        Err(_) => FailureBody {
            message: status.to_string(),
            ..Default::default()
        },
    };
    Err(failure_error(status.as_u16(), body))
}

fn failure_error(status: u16, body: FailureBody) -> Error {
    match status {
        404 => Error::NotFound(body.message),
        409 => Error::Conflict(body.message),
        422 => Error::Unprocessable {
            message: body.message,
            errors: body.errors,
        },
        400 => Error::BadRequest(body.message),
        _ => Error::Internal(body.message),
    }
}

fn to_multipart(
    fields: &CandidateFields,
    resume: Option<&ResumeUpload>,
) -> Result<reqwest::multipart::Form> {
    let mut form = reqwest::multipart::Form::new();

    let text_fields = [
        ("first_name", fields.first_name.clone()),
        ("last_name", fields.last_name.clone()),
        ("email", fields.email.clone()),
        ("phone", fields.phone.clone()),
        ("address", fields.address.clone()),
        ("city", fields.city.clone()),
        ("state", fields.state.clone()),
        ("country", fields.country.clone()),
        ("postal_code", fields.postal_code.clone()),
        ("position_applied", fields.position_applied.clone()),
        ("experience_summary", fields.experience_summary.clone()),
        ("current_company", fields.current_company.clone()),
        ("current_position", fields.current_position.clone()),
        ("notes", fields.notes.clone()),
    ];
    for (name, value) in text_fields {
        if let Some(value) = value {
            form = form.text(name, value);
        }
    }
    if let Some(date) = fields.date_of_birth {
        form = form.text("date_of_birth", date.format("%Y-%m-%d").to_string());
    }
    if let Some(salary) = fields.expected_salary {
        form = form.text("expected_salary", salary.to_string());
    }
    if let Some(status) = fields.status {
        form = form.text("status", status.to_string());
    }

    if let Some(upload) = resume {
        let part = reqwest::multipart::Part::bytes(upload.data.to_vec())
            .file_name(upload.filename.clone())
            .mime_str(resume_mime(&upload.filename))?;
        form = form.part("resume", part);
    }

    Ok(form)
}

fn resume_mime(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        _ => "application/octet-stream",
    }
}
