use sqlx::FromRow;

/// Database model for media attachments. A media row is exclusively owned by
/// its post; deleting the post cascades to its media.
#[derive(Debug, Clone, FromRow)]
pub struct Media {
    pub id: i64,
    pub post_id: i64,
    /// Relative storage path, unique across all media
    pub media_url: String,
    pub media_type: String,
    pub thumbnail_url: String,
    pub metadata: String,
    pub file_size: i64,
    pub file_name: String,
}
