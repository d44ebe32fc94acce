use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::AppError;

/// Upload ceiling for notification attachments.
pub const MAX_NOTIFICATION_PDF_BYTES: usize = 100 * 1024 * 1024;
/// Upload ceiling for case-file PDFs.
pub const MAX_CASE_PDF_BYTES: usize = 40 * 1024 * 1024;

static NOTIFICATION_PDF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^notificacion_\d+\.pdf$").expect("valid filename regex"));
static CASE_PDF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^hoja_vida_[A-Za-z0-9]+_\d+\.pdf$").expect("valid filename regex"));
static RECEIVED_PDF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-fA-F0-9]{24}_\d+\.pdf$").expect("valid filename regex"));

/// Upload families. Each one owns a directory under the uploads root
/// and a filename shape; names are validated against the full anchored
/// pattern, which admits no path separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFamily {
    Notification,
    CaseFile,
    Received,
}

impl PdfFamily {
    pub fn dir_name(self) -> &'static str {
        match self {
            PdfFamily::Notification => "notificaciones",
            PdfFamily::CaseFile => "pdf",
            PdfFamily::Received => "recibidos",
        }
    }

    fn pattern(self) -> &'static Regex {
        match self {
            PdfFamily::Notification => &NOTIFICATION_PDF_RE,
            PdfFamily::CaseFile => &CASE_PDF_RE,
            PdfFamily::Received => &RECEIVED_PDF_RE,
        }
    }

    pub fn accepts(self, filename: &str) -> bool {
        self.pattern().is_match(filename)
    }
}

/// A written upload, addressable on disk and through the relative path
/// persisted in records.
#[derive(Debug, Clone)]
pub struct StoredPdf {
    pub filename: String,
    pub relative_path: String,
    pub path: PathBuf,
}

#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Idempotent; runs once before the listener binds.
    pub async fn ensure_directories(&self) -> Result<(), AppError> {
        for family in [
            PdfFamily::Notification,
            PdfFamily::CaseFile,
            PdfFamily::Received,
        ] {
            fs::create_dir_all(self.family_dir(family)).await?;
        }
        Ok(())
    }

    pub fn family_dir(&self, family: PdfFamily) -> PathBuf {
        self.root.join(family.dir_name())
    }

    pub async fn store_notification_pdf(&self, data: &[u8]) -> Result<StoredPdf, AppError> {
        self.write_unique(
            PdfFamily::Notification,
            |ts| format!("notificacion_{ts}.pdf"),
            data,
        )
        .await
    }

    pub async fn store_case_pdf(&self, case_id: &str, data: &[u8]) -> Result<StoredPdf, AppError> {
        self.write_unique(
            PdfFamily::CaseFile,
            |ts| format!("hoja_vida_{case_id}_{ts}.pdf"),
            data,
        )
        .await
    }

    // Create-new semantics: a same-millisecond collision bumps the
    // timestamp instead of overwriting a concurrent upload.
    async fn write_unique(
        &self,
        family: PdfFamily,
        make_name: impl Fn(i64) -> String,
        data: &[u8],
    ) -> Result<StoredPdf, AppError> {
        let dir = self.family_dir(family);
        let mut ts = Utc::now().timestamp_millis();
        loop {
            let filename = make_name(ts);
            let path = dir.join(&filename);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    return Ok(StoredPdf {
                        relative_path: format!("/uploads/{}/{}", family.dir_name(), filename),
                        filename,
                        path,
                    });
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => ts += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Resolves a caller-supplied filename inside its family directory.
    /// The pattern gate runs before any filesystem access;
    /// canonicalization then re-asserts the result stayed under the
    /// family base.
    pub async fn resolve_named(
        &self,
        family: PdfFamily,
        filename: &str,
    ) -> Result<PathBuf, AppError> {
        if !family.accepts(filename) {
            return Err(AppError::BadFilename);
        }
        let base = fs::canonicalize(self.family_dir(family)).await?;
        let path = match fs::canonicalize(base.join(filename)).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound("Archivo PDF no encontrado".to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        if !path.starts_with(&base) {
            return Err(AppError::BadFilename);
        }
        Ok(path)
    }

    /// Resolves a relative path read from a record. The path was
    /// server-generated on upload, so only its final component is
    /// honoured; the canonical result must still live inside the family
    /// directory.
    pub async fn resolve_stored(
        &self,
        family: PdfFamily,
        stored: &str,
    ) -> Result<PathBuf, AppError> {
        let filename = stored.rsplit('/').next().unwrap_or(stored);
        if filename.is_empty() {
            return Err(AppError::NotFound(
                "Archivo no encontrado en el servidor".to_string(),
            ));
        }
        let base = fs::canonicalize(self.family_dir(family)).await?;
        let path = match fs::canonicalize(base.join(filename)).await {
            Ok(path) => path,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(
                    "Archivo no encontrado en el servidor".to_string(),
                ))
            }
            Err(e) => return Err(e.into()),
        };
        if !path.starts_with(&base) {
            return Err(AppError::BadFilename);
        }
        Ok(path)
    }
}
