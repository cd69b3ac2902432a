use crate::dto::candidate_dto::{
    CandidateForm, ItemEnvelope, ListEnvelope, ListParams, MessageEnvelope, ResumeUpload,
    SearchParams, StatisticsEnvelope,
};
use crate::error::{Error, Result};
use crate::utils::validation::add_error;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::ValidationErrors;

pub async fn list_candidates(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope>> {
    let page = state.candidates.list(&params).await?;
    Ok(Json(page.into()))
}

pub async fn search_candidates(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListEnvelope>> {
    let page = state
        .candidates
        .search(&params.q, params.page, params.per_page)
        .await?;
    Ok(Json(page.into()))
}

pub async fn create_candidate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ItemEnvelope>)> {
    let form = parse_candidate_form(multipart).await?;
    let candidate = state.candidates.create(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(ItemEnvelope {
            success: true,
            data: candidate,
            message: Some("Candidate created successfully.".to_string()),
        }),
    ))
}

pub async fn get_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ItemEnvelope>> {
    let candidate = state
        .candidates
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound("Candidate not found".to_string()))?;
    Ok(Json(ItemEnvelope {
        success: true,
        data: candidate,
        message: None,
    }))
}

pub async fn update_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ItemEnvelope>> {
    let form = parse_candidate_form(multipart).await?;
    let candidate = state.candidates.update(id, form).await?;
    Ok(Json(ItemEnvelope {
        success: true,
        data: candidate,
        message: Some("Candidate updated successfully.".to_string()),
    }))
}

pub async fn delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageEnvelope>> {
    state.candidates.delete(id).await?;
    Ok(Json(MessageEnvelope {
        success: true,
        message: "Candidate deleted successfully.".to_string(),
    }))
}

pub async fn candidate_statistics(
    State(state): State<AppState>,
) -> Result<Json<StatisticsEnvelope>> {
    let data = state.candidates.statistics().await?;
    Ok(Json(StatisticsEnvelope {
        success: true,
        data,
    }))
}

/// Assembles a CandidateForm from a multipart body. Unknown parts are
/// ignored; malformed typed fields are collected as field-level validation
/// errors rather than failing on the first one.
async fn parse_candidate_form(mut multipart: Multipart) -> Result<CandidateForm> {
    let mut form = CandidateForm::default();
    let mut errors = ValidationErrors::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "first_name" => form.fields.first_name = Some(field.text().await?),
            "last_name" => form.fields.last_name = Some(field.text().await?),
            "email" => form.fields.email = Some(field.text().await?),
            "phone" => form.fields.phone = non_empty(field.text().await?),
            "address" => form.fields.address = non_empty(field.text().await?),
            "city" => form.fields.city = non_empty(field.text().await?),
            "state" => form.fields.state = non_empty(field.text().await?),
            "country" => form.fields.country = non_empty(field.text().await?),
            "postal_code" => form.fields.postal_code = non_empty(field.text().await?),
            "position_applied" => form.fields.position_applied = non_empty(field.text().await?),
            "experience_summary" => {
                form.fields.experience_summary = non_empty(field.text().await?)
            }
            "current_company" => form.fields.current_company = non_empty(field.text().await?),
            "current_position" => form.fields.current_position = non_empty(field.text().await?),
            "notes" => form.fields.notes = non_empty(field.text().await?),
            "date_of_birth" => {
                if let Some(raw) = non_empty(field.text().await?) {
                    match chrono::NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
                        Ok(date) => form.fields.date_of_birth = Some(date),
                        Err(_) => add_error(
                            &mut errors,
                            "date_of_birth",
                            "date",
                            "Date of birth must be a valid date (YYYY-MM-DD).",
                        ),
                    }
                }
            }
            "expected_salary" => {
                if let Some(raw) = non_empty(field.text().await?) {
                    match raw.parse::<rust_decimal::Decimal>() {
                        Ok(salary) => form.fields.expected_salary = Some(salary),
                        Err(_) => add_error(
                            &mut errors,
                            "expected_salary",
                            "numeric",
                            "Expected salary must be a number.",
                        ),
                    }
                }
            }
            "status" => {
                if let Some(raw) = non_empty(field.text().await?) {
                    match raw.parse() {
                        Ok(status) => form.fields.status = Some(status),
                        Err(_) => add_error(
                            &mut errors,
                            "status",
                            "in",
                            "Status must be one of: new, reviewed, shortlisted, interviewed, hired, rejected.",
                        ),
                    }
                }
            }
            "resume" => {
                let filename = field.file_name().unwrap_or("resume.bin").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.resume = Some(ResumeUpload { filename, data });
                }
            }
            _ => {}
        }
    }

    if errors.is_empty() {
        Ok(form)
    } else {
        Err(Error::Validation(errors))
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
