use crate::models::candidate::{Candidate, CandidateStatus};
use crate::utils::validation::{add_error, is_valid_email};
use bytes::Bytes;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use validator::{Validate, ValidationErrors};

pub const DEFAULT_LIST_PER_PAGE: u32 = 15;
pub const DEFAULT_SEARCH_PER_PAGE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// The browser client sends empty strings for unset filters; fold those into
/// `None` instead of failing deserialization.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<CandidateStatus>,
    pub sort_by: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sort_order: Option<SortOrder>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = ((total + per_page as u64 - 1) / per_page as u64).max(1) as u32;
        Self {
            current_page: page.max(1),
            last_page,
            per_page,
            total,
        }
    }

    pub fn empty(per_page: u32) -> Self {
        Self::new(0, 1, per_page)
    }
}

/// One page of results plus its envelope metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn empty(per_page: u32) -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::empty(per_page),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope {
    pub success: bool,
    pub data: Vec<Candidate>,
    pub pagination: Pagination,
}

impl From<Page<Candidate>> for ListEnvelope {
    fn from(page: Page<Candidate>) -> Self {
        Self {
            success: true,
            data: page.items,
            pagination: page.pagination,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEnvelope {
    pub success: bool,
    pub data: Candidate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsData {
    pub total: i64,
    pub by_status: HashMap<String, i64>,
    pub recent: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatisticsEnvelope {
    pub success: bool,
    pub data: StatisticsData,
}

/// A resume file as it arrived in the multipart body.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub filename: String,
    pub data: Bytes,
}

/// Textual candidate fields assembled from a multipart request. Absent fields
/// stay `None`; on update that means "keep the stored value".
#[derive(Debug, Clone, Default, Validate)]
pub struct CandidateFields {
    #[validate(length(max = 255, message = "First name must be at most 255 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 255, message = "Last name must be at most 255 characters."))]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters."))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Address must be at most 500 characters."))]
    pub address: Option<String>,
    #[validate(length(max = 100, message = "City must be at most 100 characters."))]
    pub city: Option<String>,
    #[validate(length(max = 100, message = "State must be at most 100 characters."))]
    pub state: Option<String>,
    #[validate(length(max = 100, message = "Country must be at most 100 characters."))]
    pub country: Option<String>,
    #[validate(length(max = 20, message = "Postal code must be at most 20 characters."))]
    pub postal_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(max = 255, message = "Position must be at most 255 characters."))]
    pub position_applied: Option<String>,
    #[validate(length(max = 1000, message = "Experience summary must be at most 1000 characters."))]
    pub experience_summary: Option<String>,
    #[validate(length(max = 255, message = "Company must be at most 255 characters."))]
    pub current_company: Option<String>,
    #[validate(length(max = 255, message = "Position must be at most 255 characters."))]
    pub current_position: Option<String>,
    pub expected_salary: Option<Decimal>,
    pub status: Option<CandidateStatus>,
    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters."))]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CandidateForm {
    pub fields: CandidateFields,
    pub resume: Option<ResumeUpload>,
}

impl CandidateForm {
    fn shape_errors(&self) -> ValidationErrors {
        let mut errors = match self.fields.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(email) = self.fields.email.as_deref() {
            if !email.is_empty() && !is_valid_email(email) {
                add_error(&mut errors, "email", "email", "Please enter a valid email address.");
            }
        }
        if let Some(salary) = self.fields.expected_salary {
            if salary < Decimal::ZERO {
                add_error(
                    &mut errors,
                    "expected_salary",
                    "min",
                    "Expected salary must not be negative.",
                );
            }
        }
        errors
    }

    /// All required fields present plus shape checks. Rejected before any
    /// persistence side effect.
    pub fn validate_create(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.shape_errors();

        if self.fields.first_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            add_error(&mut errors, "first_name", "required", "First name is required.");
        }
        if self.fields.last_name.as_deref().map_or(true, |s| s.trim().is_empty()) {
            add_error(&mut errors, "last_name", "required", "Last name is required.");
        }
        if self.fields.email.as_deref().map_or(true, |s| s.trim().is_empty()) {
            add_error(&mut errors, "email", "required", "Email is required.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Partial update: provided fields must still be well-formed, and the
    /// identity fields may not be blanked out.
    pub fn validate_update(&self) -> Result<(), ValidationErrors> {
        let mut errors = self.shape_errors();

        if self.fields.first_name.as_deref().is_some_and(|s| s.trim().is_empty()) {
            add_error(&mut errors, "first_name", "required", "First name is required.");
        }
        if self.fields.last_name.as_deref().is_some_and(|s| s.trim().is_empty()) {
            add_error(&mut errors, "last_name", "required", "Last name is required.");
        }
        if self.fields.email.as_deref().is_some_and(|s| s.trim().is_empty()) {
            add_error(&mut errors, "email", "required", "Email is required.");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
