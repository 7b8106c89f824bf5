use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::config::UploadConfig;
use crate::core::error::{AppError, Result};

/// Media classification by file extension. Each kind maps to a fixed
/// destination subdirectory and a configured size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }

    pub fn subdir(&self) -> &'static str {
        match self {
            MediaKind::Image => "images",
            MediaKind::Video => "videos",
            MediaKind::Document => "documents",
        }
    }
}

pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];

pub const VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".webm", ".mov", ".avi", ".mkv", ".m4v"];

pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx", ".txt", ".csv", ".md", ".odt",
    ".ods", ".odp",
];

/// Extensions never accepted, whatever the declared content type:
/// executables, scripts and archive formats that can smuggle them.
const DANGEROUS_EXTENSIONS: &[&str] = &[
    // Executables
    ".exe", ".bat", ".cmd", ".sh", ".com", ".dll", ".msi", ".bin", ".app", ".dmg",
    // Scripts
    ".php", ".js", ".vbs", ".ps1", ".py", ".rb", ".pl", ".asp", ".aspx", ".jsp", ".cgi",
    // Archives
    ".jar", ".war", ".iso",
    // Macros and other
    ".scr", ".reg", ".inf", ".hta",
];

const SUSPICIOUS_NAME_PATTERNS: &[&str] = &[
    "virus", "malware", "hack", "crack", "keygen", "pirate", "trojan", "exploit", "backdoor",
    "rootkit", "ransom",
];

fn extension_of(filename: &str) -> String {
    match filename.rfind('.') {
        Some(idx) => filename[idx..].to_lowercase(),
        None => String::new(),
    }
}

/// Classify a filename into a media kind, or `None` for unsupported formats.
pub fn classify_media(filename: &str) -> Option<MediaKind> {
    let ext = extension_of(filename);
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else if DOCUMENT_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Document)
    } else {
        None
    }
}

/// Detects filenames that must be rejected outright: denylisted extensions,
/// double-extension smuggling ("invoice.pdf.exe") and hostile name patterns.
pub fn is_suspicious_file(filename: &str) -> bool {
    let lower = filename.to_lowercase();

    // Every dot-separated suffix counts, so "a.jpg.exe" is caught by its
    // final extension and "a.exe.jpg" by the embedded one.
    let parts: Vec<&str> = lower.split('.').collect();
    for part in parts.iter().skip(1) {
        let candidate = format!(".{}", part);
        if DANGEROUS_EXTENSIONS.contains(&candidate.as_str()) {
            warn!("Rejected dangerous extension in upload: {}", filename);
            return true;
        }
    }

    for pattern in SUSPICIOUS_NAME_PATTERNS {
        if lower.contains(pattern) {
            warn!("Rejected suspicious filename: {} (contains '{}')", filename, pattern);
            return true;
        }
    }

    false
}

/// Keep only alphanumerics, '-', '_' and '.'; everything else becomes '_'.
/// A leading dot is replaced so uploads can never become hidden files.
pub fn sanitize_file_name(filename: &str) -> String {
    let mut sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.starts_with('.') {
        sanitized.replace_range(..1, "_");
    }

    sanitized
}

/// Result of a successful upload ingestion.
#[derive(Debug, Clone)]
pub struct SavedUpload {
    /// Relative storage path, recorded as the media URL
    pub path: String,
    /// Sanitized original filename
    pub file_name: String,
    pub size: i64,
    pub kind: MediaKind,
}

/// Filesystem-backed upload store. Files are classified into per-kind
/// subdirectories under the configured root.
pub struct LocalUploadStore {
    config: UploadConfig,
}

impl LocalUploadStore {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn root_dir(&self) -> &Path {
        &self.config.root_dir
    }

    pub fn max_total_bytes(&self) -> i64 {
        self.config.max_total_bytes
    }

    pub fn max_bytes_for(&self, kind: MediaKind) -> i64 {
        match kind {
            MediaKind::Image => self.config.max_image_bytes,
            MediaKind::Video => self.config.max_video_bytes,
            MediaKind::Document => self.config.max_document_bytes,
        }
    }

    fn kind_dir(&self, kind: MediaKind) -> PathBuf {
        self.config.root_dir.join(kind.subdir())
    }

    fn thumbnail_dir(&self) -> PathBuf {
        self.config.root_dir.join("thumbnails")
    }

    /// Create the upload directory tree and verify it is writable.
    pub async fn ensure_directories(&self) -> Result<()> {
        for dir in [
            self.kind_dir(MediaKind::Image),
            self.kind_dir(MediaKind::Video),
            self.kind_dir(MediaKind::Document),
            self.thumbnail_dir(),
        ] {
            tokio::fs::create_dir_all(&dir).await?;
        }

        let probe = self.config.root_dir.join(".write_probe");
        tokio::fs::write(&probe, b"").await?;
        tokio::fs::remove_file(&probe).await?;

        debug!("Upload directories ready under {:?}", self.config.root_dir);
        Ok(())
    }

    /// Validate a pending upload without touching the disk. Returns the
    /// media kind it would be stored under.
    pub fn validate_upload(&self, filename: &str, size: i64) -> Result<MediaKind> {
        if is_suspicious_file(filename) {
            return Err(AppError::Validation(
                "File format not allowed for security reasons".to_string(),
            ));
        }

        let clean = sanitize_file_name(filename);
        let kind = classify_media(&clean).ok_or_else(|| {
            AppError::Validation(format!(
                "Unsupported file type: '{}'",
                extension_of(&clean)
            ))
        })?;

        let max = self.max_bytes_for(kind);
        if size > max {
            return Err(AppError::Validation(format!(
                "{} too large: {:.2} MB (maximum {:.2} MB)",
                kind.as_str(),
                size as f64 / (1024.0 * 1024.0),
                max as f64 / (1024.0 * 1024.0),
            )));
        }

        Ok(kind)
    }

    /// Validate and persist one upload. On a write failure the partial file
    /// is removed before the error propagates, so no orphan artifact is left
    /// behind by a failed ingestion.
    pub async fn save_upload(
        &self,
        user_id: i64,
        original_name: &str,
        data: &[u8],
    ) -> Result<SavedUpload> {
        let kind = self.validate_upload(original_name, data.len() as i64)?;
        let clean = sanitize_file_name(original_name);

        let dir = self.kind_dir(kind);
        tokio::fs::create_dir_all(&dir).await?;

        // timestamp + random token keeps concurrent uploads collision-free
        let millis = Utc::now().timestamp_millis();
        let token = Uuid::new_v4();
        let ext = extension_of(&clean);
        let target = dir.join(format!("user_{}_{}_{}{}", user_id, millis, token, ext));

        if let Err(e) = tokio::fs::write(&target, data).await {
            if let Err(rm) = tokio::fs::remove_file(&target).await {
                if rm.kind() != std::io::ErrorKind::NotFound {
                    warn!("Could not remove partial upload {:?}: {}", target, rm);
                }
            }
            return Err(AppError::Storage(e));
        }

        let path = target.to_string_lossy().into_owned();
        debug!("Upload stored: {} ({} bytes)", path, data.len());

        Ok(SavedUpload {
            path,
            file_name: clean,
            size: data.len() as i64,
            kind,
        })
    }

    /// Best-effort removal of a stored file; missing files are not an error.
    pub async fn remove_file(&self, path: &str) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Could not remove file {}: {}", path, e);
            }
        }
    }

    /// List every stored file (media subdirectories plus thumbnails),
    /// returned as the same relative paths `save_upload` produces.
    pub async fn list_stored_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        for dir in [
            self.kind_dir(MediaKind::Image),
            self.kind_dir(MediaKind::Video),
            self.kind_dir(MediaKind::Document),
            self.thumbnail_dir(),
        ] {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(AppError::Storage(e)),
            };
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    files.push(entry.path().to_string_lossy().into_owned());
                }
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(root: &Path) -> UploadConfig {
        UploadConfig {
            root_dir: root.to_path_buf(),
            max_image_bytes: 1024,
            max_video_bytes: 4096,
            max_document_bytes: 2048,
            max_total_bytes: 8192,
        }
    }

    #[test]
    fn classifies_by_extension_case_insensitive() {
        assert_eq!(classify_media("photo.JPG"), Some(MediaKind::Image));
        assert_eq!(classify_media("clip.mp4"), Some(MediaKind::Video));
        assert_eq!(classify_media("notes.PDF"), Some(MediaKind::Document));
        assert_eq!(classify_media("archive.zip"), None);
        assert_eq!(classify_media("noextension"), None);
    }

    #[test]
    fn rejects_dangerous_and_double_extensions() {
        assert!(is_suspicious_file("setup.exe"));
        assert!(is_suspicious_file("invoice.pdf.exe"));
        assert!(is_suspicious_file("image.exe.jpg"));
        assert!(is_suspicious_file("run.sh"));
        assert!(is_suspicious_file("totally_a_virus.png"));
        assert!(!is_suspicious_file("holiday.jpg"));
        assert!(!is_suspicious_file("report.pdf"));
    }

    #[test]
    fn sanitizes_hostile_characters_and_leading_dot() {
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_file_name(".htaccess"), "_htaccess");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "_._.._etc_passwd");
        assert_eq!(sanitize_file_name("clean-name_1.png"), "clean-name_1.png");
    }

    #[tokio::test]
    async fn saves_upload_into_kind_subdirectory() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(test_config(tmp.path()));

        let saved = store.save_upload(42, "pic.png", b"12345").await.unwrap();
        assert_eq!(saved.kind, MediaKind::Image);
        assert_eq!(saved.file_name, "pic.png");
        assert_eq!(saved.size, 5);
        assert!(saved.path.contains("images"));
        assert!(std::path::Path::new(&saved.path).exists());
    }

    #[tokio::test]
    async fn size_ceiling_is_inclusive() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(test_config(tmp.path()));

        // exactly at the ceiling: accepted
        let at_limit = vec![0u8; 2048];
        assert!(store.save_upload(1, "doc.pdf", &at_limit).await.is_ok());

        // one byte over: rejected with a validation error
        let over = vec![0u8; 2049];
        let err = store.save_upload(1, "doc2.pdf", &over).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_masked_executable_regardless_of_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(test_config(tmp.path()));

        let err = store
            .save_upload(1, "invoice.pdf.exe", b"MZ")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.list_stored_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_stored_files_across_subdirectories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(test_config(tmp.path()));
        store.ensure_directories().await.unwrap();

        store.save_upload(1, "a.png", b"x").await.unwrap();
        store.save_upload(1, "b.mp4", b"y").await.unwrap();

        let files = store.list_stored_files().await.unwrap();
        assert_eq!(files.len(), 2);
    }

    #[tokio::test]
    async fn remove_file_tolerates_missing_target() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalUploadStore::new(test_config(tmp.path()));
        store.remove_file("does/not/exist.png").await;
    }
}
