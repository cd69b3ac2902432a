use crate::dto::candidate_dto::{CandidateFields, ResumeUpload};
use crate::services::storage_service::{ALLOWED_RESUME_EXTENSIONS, MAX_RESUME_BYTES};
use crate::utils::validation::is_valid_email;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Submitting,
    Failed,
}

/// State machine behind the candidate form dialog. One instance per open
/// form; editing an existing candidate pre-fills `fields` and keeps the id.
#[derive(Debug, Clone, Default)]
pub struct CandidateFormState {
    pub editing_id: Option<i64>,
    pub fields: CandidateFields,
    pub resume: Option<ResumeUpload>,
    pub phase: FormPhase,
    pub field_errors: HashMap<String, Vec<String>>,
    pub open: bool,
}

impl CandidateFormState {
    pub fn open_create() -> Self {
        Self {
            open: true,
            ..Default::default()
        }
    }

    pub fn open_edit(id: i64, fields: CandidateFields) -> Self {
        Self {
            editing_id: Some(id),
            fields,
            open: true,
            ..Default::default()
        }
    }

    /// Same extension and size gates the server applies, run before the file
    /// is ever sent.
    pub fn attach_resume(&mut self, filename: &str, data: Bytes) -> Result<(), String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_RESUME_EXTENSIONS.contains(&ext.as_str()) {
            return Err("Resume must be a PDF, DOC, or DOCX file.".to_string());
        }
        if data.len() > MAX_RESUME_BYTES {
            return Err("Resume file size must be less than 10MB.".to_string());
        }
        self.resume = Some(ResumeUpload {
            filename: filename.to_string(),
            data,
        });
        Ok(())
    }

    pub fn detach_resume(&mut self) {
        self.resume = None;
    }

    /// Local checks mirroring the server's required-field rules, so the
    /// common failures never cost a round trip.
    pub fn validate(&self) -> HashMap<String, Vec<String>> {
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();
        let mut require = |field: &str, value: &Option<String>, message: &str| {
            if value.as_deref().map_or(true, |s| s.trim().is_empty()) {
                errors.entry(field.to_string()).or_default().push(message.to_string());
            }
        };
        require("first_name", &self.fields.first_name, "First name is required.");
        require("last_name", &self.fields.last_name, "Last name is required.");
        require("email", &self.fields.email, "Email is required.");

        if let Some(email) = self.fields.email.as_deref() {
            if !email.trim().is_empty() && !is_valid_email(email) {
                errors
                    .entry("email".to_string())
                    .or_default()
                    .push("Please enter a valid email address.".to_string());
            }
        }
        errors
    }

    /// Returns false when a submission is already in flight or local
    /// validation fails, so the caller never issues a duplicate request.
    pub fn begin_submit(&mut self) -> bool {
        if self.phase == FormPhase::Submitting {
            return false;
        }
        let errors = self.validate();
        if !errors.is_empty() {
            self.field_errors = errors;
            self.phase = FormPhase::Failed;
            return false;
        }
        self.field_errors.clear();
        self.phase = FormPhase::Submitting;
        true
    }

    pub fn submit_succeeded(&mut self) {
        self.phase = FormPhase::Idle;
        self.open = false;
        self.field_errors.clear();
    }

    /// Server rejection: the form stays open with its input intact so the
    /// user can correct and resubmit.
    pub fn submit_failed(&mut self, field_errors: HashMap<String, Vec<String>>) {
        self.phase = FormPhase::Failed;
        self.field_errors = field_errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CandidateFormState {
        let mut state = CandidateFormState::open_create();
        state.fields.first_name = Some("Ann".into());
        state.fields.last_name = Some("Lee".into());
        state.fields.email = Some("ann@example.com".into());
        state
    }

    #[test]
    fn begin_submit_blocks_on_missing_fields() {
        let mut state = CandidateFormState::open_create();
        assert!(!state.begin_submit());
        assert_eq!(state.phase, FormPhase::Failed);
        assert!(state.field_errors.contains_key("first_name"));
        assert!(state.field_errors.contains_key("email"));
    }

    #[test]
    fn begin_submit_guards_against_double_submit() {
        let mut state = filled();
        assert!(state.begin_submit());
        assert_eq!(state.phase, FormPhase::Submitting);
        assert!(!state.begin_submit());
    }

    #[test]
    fn server_failure_keeps_form_open_with_errors() {
        let mut state = filled();
        assert!(state.begin_submit());
        let mut errors = HashMap::new();
        errors.insert("email".to_string(), vec!["Email already exists".to_string()]);
        state.submit_failed(errors);
        assert!(state.open);
        assert_eq!(state.phase, FormPhase::Failed);
        assert!(state.field_errors.contains_key("email"));

        // corrected input may be resubmitted
        state.fields.email = Some("other@example.com".into());
        assert!(state.begin_submit());
    }

    #[test]
    fn success_closes_the_form() {
        let mut state = filled();
        assert!(state.begin_submit());
        state.submit_succeeded();
        assert!(!state.open);
        assert_eq!(state.phase, FormPhase::Idle);
    }

    #[test]
    fn attach_resume_enforces_extension_and_size() {
        let mut state = filled();
        assert!(state.attach_resume("cv.exe", Bytes::from_static(b"x")).is_err());
        assert!(state
            .attach_resume("cv.pdf", Bytes::from(vec![0u8; MAX_RESUME_BYTES + 1]))
            .is_err());
        assert!(state.attach_resume("cv.pdf", Bytes::from_static(b"%PDF")).is_ok());
        assert!(state.resume.is_some());

        state.detach_resume();
        assert!(state.resume.is_none());
    }

    #[test]
    fn invalid_email_shape_is_caught_locally() {
        let mut state = filled();
        state.fields.email = Some("not-an-email".into());
        assert!(!state.begin_submit());
        assert!(state.field_errors.contains_key("email"));
    }
}
