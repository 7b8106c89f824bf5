use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::media::models::Media;

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaItemDto {
    pub id: i64,
    pub post_id: i64,
    pub media_url: String,
    pub media_type: String,
    pub thumbnail_url: String,
    pub metadata: String,
    pub file_size: i64,
    pub file_name: String,
}

impl From<Media> for MediaItemDto {
    fn from(m: Media) -> Self {
        Self {
            id: m.id,
            post_id: m.post_id,
            media_url: m.media_url,
            media_type: m.media_type,
            thumbnail_url: m.thumbnail_url,
            metadata: m.metadata,
            file_size: m.file_size,
            file_name: m.file_name,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMediaMetadataDto {
    #[validate(length(max = 4096, message = "metadata too long"))]
    pub metadata: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CleanupResultDto {
    /// Number of unreferenced files removed from the upload directories
    pub removed: i64,
}
