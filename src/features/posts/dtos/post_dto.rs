use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::media::models::Media;
use crate::features::users::dtos::CreatorInfoDto;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

/// One file carried in the create-post multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Parsed create-post form. Built by the handler from multipart fields,
/// validated and persisted by the service.
#[derive(Debug, Default)]
pub struct CreatePostInput {
    pub content: String,
    pub visibility: Option<String>,
    pub is_paid_only: bool,
    pub document_type: Option<String>,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePostDto {
    #[validate(length(max = 10000, message = "content too long"))]
    pub content: Option<String>,

    pub visibility: Option<String>,

    pub is_paid_only: Option<bool>,

    #[validate(length(max = 50, message = "document_type too long"))]
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaDto {
    pub id: i64,
    pub media_url: String,
    pub media_type: String,
    pub thumbnail_url: String,
    pub file_name: String,
    pub file_size: i64,
}

impl From<Media> for MediaDto {
    fn from(m: Media) -> Self {
        Self {
            id: m.id,
            media_url: m.media_url,
            media_type: m.media_type,
            thumbnail_url: m.thumbnail_url,
            file_name: m.file_name,
            file_size: m.file_size,
        }
    }
}

/// A post as seen by a specific viewer: access-gated content, deduplicated
/// media URLs, engagement counts and the creator's public info.
#[derive(Debug, Serialize, ToSchema)]
pub struct PostViewDto {
    pub id: i64,
    pub creator_id: i64,
    pub content: String,
    pub visibility: String,
    pub is_paid_only: bool,
    pub document_type: String,
    pub media_urls: Vec<String>,
    pub media: Vec<MediaDto>,
    pub like_count: i64,
    pub comment_count: i64,
    pub liked_by_viewer: bool,
    pub has_access: bool,
    pub creator: CreatorInfoDto,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PostListDto {
    pub posts: Vec<PostViewDto>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ScrollDto {
    pub items: Vec<PostViewDto>,
    /// Approximation: a full page is assumed to have a successor
    pub has_more: bool,
    pub next_cursor: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListPostsQuery {
    /// Optional visibility filter (`public` or `private`)
    pub visibility: Option<String>,

    /// Page number (1-indexed, default: 1)
    pub page: Option<i64>,

    /// Number of items per page (default: 20, max: 100)
    pub page_size: Option<i64>,
}

impl ListPostsQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery {
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MediaStatsDto {
    pub image_count: i64,
    pub video_count: i64,
    pub document_count: i64,
    pub total_count: i64,
    pub supported_image_formats: Vec<String>,
    pub supported_video_formats: Vec<String>,
    pub supported_document_formats: Vec<String>,
}
