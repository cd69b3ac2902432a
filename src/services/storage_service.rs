use crate::error::{Error, Result};
use crate::utils::validation::single_error;
use bytes::Bytes;
use sqlx::SqlitePool;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;
pub const ALLOWED_RESUME_EXTENSIONS: [&str; 3] = ["pdf", "doc", "docx"];

/// File store for uploaded resumes. Files are keyed by a generated name,
/// never by the user-supplied filename.
#[derive(Debug, Clone)]
pub struct ResumeStorage {
    dir: PathBuf,
}

impl ResumeStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Checks extension, size and a light magic-byte sniff before anything
    /// touches disk. Failures surface as field-level validation errors.
    pub fn validate(filename: &str, data: &Bytes) -> Result<String> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_RESUME_EXTENSIONS.contains(&ext.as_str()) {
            return Err(Error::Validation(single_error(
                "resume",
                "mimes",
                "Resume must be a PDF, DOC, or DOCX file.",
            )));
        }
        if data.len() > MAX_RESUME_BYTES {
            return Err(Error::Validation(single_error(
                "resume",
                "max",
                "Resume file size must be less than 10MB.",
            )));
        }

        let sniff_ok = match ext.as_str() {
            "pdf" => data.starts_with(b"%PDF"),
            // OLE compound file header
            "doc" => data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0]),
            // zip container
            "docx" => data.starts_with(b"PK\x03\x04"),
            _ => false,
        };
        if !sniff_ok {
            return Err(Error::Validation(single_error(
                "resume",
                "mimes",
                "Please upload a valid file.",
            )));
        }

        Ok(ext)
    }

    /// Writes the file under a generated key and returns that key, to be
    /// recorded as the candidate's resume_path.
    pub async fn store(&self, filename: &str, data: &Bytes) -> Result<String> {
        let ext = Self::validate(filename, data)?;

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| Error::Storage(format!("Failed to create resume directory: {}", e)))?;

        let key = format!("{}.{}", uuid::Uuid::new_v4(), ext);
        let path = self.dir.join(&key);
        fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write resume file {:?}: {}", path, e);
            Error::Storage(format!("Failed to save resume file: {}", e))
        })?;

        Ok(key)
    }

    /// Best-effort removal. A missing file is fine; anything else is logged
    /// and swallowed so the enclosing row operation can proceed.
    pub async fn delete_quiet(&self, key: &str) {
        let path = self.dir.join(key);
        match fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!("Failed to delete resume file {:?}: {}", path, e),
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        fs::try_exists(self.dir.join(key)).await.unwrap_or(false)
    }

    /// Reconciliation pass: a file write and its row update are not atomic,
    /// so stray files can accumulate. Removes every stored file no candidate
    /// row references and returns how many were deleted.
    pub async fn sweep_orphans(&self, pool: &SqlitePool) -> Result<u64> {
        let referenced: HashSet<String> = sqlx::query_scalar::<_, String>(
            "SELECT resume_path FROM candidates WHERE resume_path IS NOT NULL",
        )
        .fetch_all(pool)
        .await?
        .into_iter()
        .collect();

        let mut removed = 0u64;
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(Error::Storage(format!("Failed to read resume directory: {}", e))),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| Error::Storage(format!("Failed to read resume directory: {}", e)))?
        {
            let name = entry.file_name().to_string_lossy().into_owned();
            if referenced.contains(&name) {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => {
                    tracing::info!("Removed orphaned resume file {}", name);
                    removed += 1;
                }
                Err(e) => tracing::warn!("Failed to remove orphaned resume {}: {}", name, e),
            }
        }
        Ok(removed)
    }
}
