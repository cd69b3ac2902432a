use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, FromRow, Sqlite, Type,
};
use std::borrow::Cow;
use std::str::FromStr;

/// Pipeline stage of a candidate. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CandidateStatus {
    New,
    Reviewed,
    Shortlisted,
    Interviewed,
    Hired,
    Rejected,
}

impl CandidateStatus {
    pub const ALL: [CandidateStatus; 6] = [
        CandidateStatus::New,
        CandidateStatus::Reviewed,
        CandidateStatus::Shortlisted,
        CandidateStatus::Interviewed,
        CandidateStatus::Hired,
        CandidateStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateStatus::New => "new",
            CandidateStatus::Reviewed => "reviewed",
            CandidateStatus::Shortlisted => "shortlisted",
            CandidateStatus::Interviewed => "interviewed",
            CandidateStatus::Hired => "hired",
            CandidateStatus::Rejected => "rejected",
        }
    }
}

impl Default for CandidateStatus {
    fn default() -> Self {
        CandidateStatus::New
    }
}

impl std::fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(CandidateStatus::New),
            "reviewed" => Ok(CandidateStatus::Reviewed),
            "shortlisted" => Ok(CandidateStatus::Shortlisted),
            "interviewed" => Ok(CandidateStatus::Interviewed),
            "hired" => Ok(CandidateStatus::Hired),
            "rejected" => Ok(CandidateStatus::Rejected),
            other => Err(format!("invalid status '{}'", other)),
        }
    }
}

/// Expected salary with two-decimal scale. SQLite has no decimal type, so the
/// value travels as text and is parsed on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salary(pub Decimal);

impl Type<Sqlite> for Salary {
    fn type_info() -> SqliteTypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Salary {
    fn encode_by_ref(&self, args: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        args.push(SqliteArgumentValue::Text(Cow::Owned(self.0.to_string())));
        IsNull::No
    }
}

impl<'r> Decode<'r, Sqlite> for Salary {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(Salary(Decimal::from_str(raw)?))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub position_applied: Option<String>,
    pub experience_summary: Option<String>,
    pub current_company: Option<String>,
    pub current_position: Option<String>,
    pub expected_salary: Option<Salary>,
    pub resume_path: Option<String>,
    pub status: CandidateStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Denormalized projection mirrored into the search index by the indexed
/// backend. Not authoritative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDocument {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub position_applied: Option<String>,
    pub current_company: Option<String>,
    pub current_position: Option<String>,
    pub status: CandidateStatus,
}

impl From<&Candidate> for SearchDocument {
    fn from(candidate: &Candidate) -> Self {
        Self {
            id: candidate.id,
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            full_name: candidate.full_name(),
            email: candidate.email.clone(),
            position_applied: candidate.position_applied.clone(),
            current_company: candidate.current_company.clone(),
            current_position: candidate.current_position.clone(),
            status: candidate.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_str() {
        for status in CandidateStatus::ALL {
            assert_eq!(status.as_str().parse::<CandidateStatus>(), Ok(status));
        }
        assert!("archived".parse::<CandidateStatus>().is_err());
    }

    #[test]
    fn search_document_carries_full_name() {
        let candidate = Candidate {
            id: 7,
            first_name: "Ann".into(),
            last_name: "Lee".into(),
            email: "ann@x.com".into(),
            phone: None,
            address: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            date_of_birth: None,
            position_applied: Some("Engineer".into()),
            experience_summary: None,
            current_company: None,
            current_position: None,
            expected_salary: None,
            resume_path: None,
            status: CandidateStatus::New,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let doc = SearchDocument::from(&candidate);
        assert_eq!(doc.full_name, "Ann Lee");
        assert_eq!(doc.status, CandidateStatus::New);
    }
}
