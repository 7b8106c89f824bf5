//! Post persistence and per-viewer feed assembly.

use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::media::models::Media;
use crate::features::posts::dtos::{
    CreatePostInput, ListPostsQuery, MediaStatsDto, PostListDto, PostViewDto, ScrollDto,
    UpdatePostDto,
};
use crate::features::posts::models::Post;
use crate::features::posts::services::AccessService;
use crate::features::users::dtos::CreatorInfoDto;
use crate::modules::storage::{
    LocalUploadStore, MediaKind, SavedUpload, DOCUMENT_EXTENSIONS, IMAGE_EXTENSIONS,
    VIDEO_EXTENSIONS,
};
use crate::shared::constants::{LOCKED_CONTENT_NOTICE, MAX_IMAGES_PER_POST};
use crate::shared::ownership::ensure_owner;

/// A post may carry several images, or a single video, or documents, but
/// never a mix of those classes in one upload batch.
fn validate_media_batch(kinds: &[MediaKind]) -> Result<()> {
    let images = kinds.iter().filter(|k| **k == MediaKind::Image).count();
    let videos = kinds.iter().filter(|k| **k == MediaKind::Video).count();
    let documents = kinds.iter().filter(|k| **k == MediaKind::Document).count();

    let classes = [images, videos, documents]
        .iter()
        .filter(|n| **n > 0)
        .count();
    if classes > 1 {
        return Err(AppError::Validation(
            "A post cannot mix images, videos and documents in one upload".to_string(),
        ));
    }

    if images > MAX_IMAGES_PER_POST {
        return Err(AppError::Validation(format!(
            "Too many images: {} (maximum {})",
            images, MAX_IMAGES_PER_POST
        )));
    }
    if videos > 1 {
        return Err(AppError::Validation(
            "Only one video per post is allowed".to_string(),
        ));
    }

    Ok(())
}

/// Media URLs in post order, first occurrence wins.
fn dedup_media_urls(media: &[Media]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut urls = Vec::with_capacity(media.len());
    for m in media {
        if seen.insert(m.media_url.as_str()) {
            urls.push(m.media_url.clone());
        }
    }
    urls
}

/// Build the per-viewer projection of a post. When access is denied the
/// content is replaced by the fixed locked notice; media URLs and engagement
/// counts stay visible so locked posts still render as teasers.
#[allow(clippy::too_many_arguments)]
fn assemble_view(
    post: Post,
    media: Vec<Media>,
    creator: CreatorInfoDto,
    like_count: i64,
    comment_count: i64,
    liked_by_viewer: bool,
    has_access: bool,
) -> PostViewDto {
    let media_urls = dedup_media_urls(&media);
    let content = if has_access {
        post.content
    } else {
        LOCKED_CONTENT_NOTICE.to_string()
    };

    PostViewDto {
        id: post.id,
        creator_id: post.creator_id,
        content,
        visibility: post.visibility,
        is_paid_only: post.is_paid_only,
        document_type: post.document_type,
        media_urls,
        media: media.into_iter().map(Into::into).collect(),
        like_count,
        comment_count,
        liked_by_viewer,
        has_access,
        creator,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn validate_visibility(visibility: &str) -> Result<()> {
    match visibility {
        "public" | "private" => Ok(()),
        other => Err(AppError::Validation(format!(
            "visibility must be 'public' or 'private', got '{}'",
            other
        ))),
    }
}

pub struct PostService {
    pool: PgPool,
    store: Arc<LocalUploadStore>,
    access: Arc<AccessService>,
}

impl PostService {
    pub fn new(pool: PgPool, store: Arc<LocalUploadStore>, access: Arc<AccessService>) -> Self {
        Self { pool, store, access }
    }

    /// Create a post together with its media attachments. Files are written
    /// to disk first; if the database transaction then fails, the written
    /// files are removed again.
    pub async fn create_post(&self, user_id: i64, input: CreatePostInput) -> Result<PostViewDto> {
        if input.content.trim().is_empty() && input.files.is_empty() {
            return Err(AppError::Validation(
                "A post needs content or at least one attachment".to_string(),
            ));
        }

        let visibility = input.visibility.unwrap_or_else(|| "public".to_string());
        validate_visibility(&visibility)?;

        // Validate the whole batch before any file touches the disk.
        let mut kinds = Vec::with_capacity(input.files.len());
        let mut total_bytes: i64 = 0;
        for file in &input.files {
            kinds.push(self.store.validate_upload(&file.name, file.data.len() as i64)?);
            total_bytes += file.data.len() as i64;
        }
        validate_media_batch(&kinds)?;
        if total_bytes > self.store.max_total_bytes() {
            return Err(AppError::Validation(format!(
                "Combined attachment size {:.2} MB exceeds the {:.2} MB limit",
                total_bytes as f64 / (1024.0 * 1024.0),
                self.store.max_total_bytes() as f64 / (1024.0 * 1024.0),
            )));
        }

        let mut saved: Vec<SavedUpload> = Vec::with_capacity(input.files.len());
        for file in &input.files {
            match self.store.save_upload(user_id, &file.name, &file.data).await {
                Ok(s) => saved.push(s),
                Err(e) => {
                    self.remove_saved(&saved).await;
                    return Err(e);
                }
            }
        }

        let persisted = self
            .insert_post_with_media(user_id, &input.content, &visibility, input.is_paid_only,
                input.document_type.as_deref().unwrap_or(""), &saved)
            .await;

        let post = match persisted {
            Ok(post) => post,
            Err(e) => {
                self.remove_saved(&saved).await;
                return Err(e);
            }
        };

        tracing::info!(
            "Post created: id={}, creator={}, attachments={}",
            post.id,
            user_id,
            saved.len()
        );

        self.view_for(post, user_id).await
    }

    async fn insert_post_with_media(
        &self,
        user_id: i64,
        content: &str,
        visibility: &str,
        is_paid_only: bool,
        document_type: &str,
        saved: &[SavedUpload],
    ) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (creator_id, content, visibility, is_paid_only, document_type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(visibility)
        .bind(is_paid_only)
        .bind(document_type)
        .fetch_one(&mut *tx)
        .await?;

        for upload in saved {
            sqlx::query(
                r#"
                INSERT INTO media (post_id, media_url, media_type, file_size, file_name)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(post.id)
            .bind(&upload.path)
            .bind(upload.kind.as_str())
            .bind(upload.size)
            .bind(&upload.file_name)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(post)
    }

    async fn remove_saved(&self, saved: &[SavedUpload]) {
        for upload in saved {
            self.store.remove_file(&upload.path).await;
        }
    }

    pub async fn get_post(&self, id: i64, viewer_id: i64) -> Result<PostViewDto> {
        let post = self.fetch_post(id).await?;
        self.view_for(post, viewer_id).await
    }

    /// Offset-paginated feed, newest first.
    pub async fn list_posts(&self, query: &ListPostsQuery, viewer_id: i64) -> Result<PostListDto> {
        if let Some(v) = query.visibility.as_deref() {
            validate_visibility(v)?;
        }
        let pagination = query.pagination();

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM posts WHERE ($1::text IS NULL OR visibility = $1)",
        )
        .bind(query.visibility.as_deref())
        .fetch_one(&self.pool)
        .await?;

        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT * FROM posts
            WHERE ($1::text IS NULL OR visibility = $1)
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(query.visibility.as_deref())
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        let mut views = Vec::with_capacity(posts.len());
        for post in posts {
            views.push(self.view_for(post, viewer_id).await?);
        }

        Ok(PostListDto {
            posts: views,
            total,
            page: pagination.page(),
            page_size: pagination.limit(),
        })
    }

    /// Cursor scroll strictly ordered by id, `id > after`. `has_more` is the
    /// usual full-page approximation: a final page whose size equals the
    /// limit reports one more page that turns out empty.
    pub async fn scroll_posts(
        &self,
        after: i64,
        limit: i64,
        viewer_id: i64,
    ) -> Result<ScrollDto> {
        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE id > $1 ORDER BY id ASC LIMIT $2",
        )
        .bind(after)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let has_more = posts.len() as i64 == limit;
        let next_cursor = posts.last().map(|p| p.id);

        let mut items = Vec::with_capacity(posts.len());
        for post in posts {
            items.push(self.view_for(post, viewer_id).await?);
        }

        Ok(ScrollDto {
            items,
            has_more,
            next_cursor,
        })
    }

    pub async fn update_post(
        &self,
        id: i64,
        actor_id: i64,
        dto: UpdatePostDto,
    ) -> Result<PostViewDto> {
        let post = self.fetch_post(id).await?;
        ensure_owner(&post, actor_id)?;

        if let Some(v) = dto.visibility.as_deref() {
            validate_visibility(v)?;
        }
        if let Some(content) = dto.content.as_deref() {
            if content.trim().is_empty() {
                return Err(AppError::Validation(
                    "content must not be empty".to_string(),
                ));
            }
        }

        let updated = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET content = $2, visibility = $3, is_paid_only = $4, document_type = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(dto.content.unwrap_or(post.content))
        .bind(dto.visibility.unwrap_or(post.visibility))
        .bind(dto.is_paid_only.unwrap_or(post.is_paid_only))
        .bind(dto.document_type.unwrap_or(post.document_type))
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Post updated: id={}, creator={}", updated.id, actor_id);
        self.view_for(updated, actor_id).await
    }

    /// Delete a post: rows go in one transaction, backing files are removed
    /// best-effort afterwards so a failed unlink never resurrects the post.
    pub async fn delete_post(&self, id: i64, actor_id: i64) -> Result<()> {
        let post = self.fetch_post(id).await?;
        ensure_owner(&post, actor_id)?;

        let media = self.fetch_media(id).await?;

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM media WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        for m in &media {
            self.store.remove_file(&m.media_url).await;
            if !m.thumbnail_url.is_empty() {
                self.store.remove_file(&m.thumbnail_url).await;
            }
        }

        tracing::info!("Post deleted: id={}, creator={}", id, actor_id);
        Ok(())
    }

    pub async fn media_statistics(&self) -> Result<MediaStatsDto> {
        let count_for = |media_type: &'static str| {
            let pool = self.pool.clone();
            async move {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM media WHERE media_type = $1")
                    .bind(media_type)
                    .fetch_one(&pool)
                    .await
            }
        };

        let image_count = count_for("image").await?;
        let video_count = count_for("video").await?;
        let document_count = count_for("document").await?;

        Ok(MediaStatsDto {
            image_count,
            video_count,
            document_count,
            total_count: image_count + video_count + document_count,
            supported_image_formats: IMAGE_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            supported_video_formats: VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            supported_document_formats: DOCUMENT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        })
    }

    async fn fetch_post(&self, id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }

    async fn fetch_media(&self, post_id: i64) -> Result<Vec<Media>> {
        Ok(sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE post_id = $1 ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn fetch_creator(&self, creator_id: i64) -> Result<CreatorInfoDto> {
        sqlx::query_as::<_, CreatorInfoDto>(
            "SELECT id, username, full_name, avatar_url, monthly_price FROM users WHERE id = $1",
        )
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Creator not found".to_string()))
    }

    async fn view_for(&self, post: Post, viewer_id: i64) -> Result<PostViewDto> {
        let media = self.fetch_media(post.id).await?;
        let creator = self.fetch_creator(post.creator_id).await?;

        let like_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE post_id = $1")
                .bind(post.id)
                .fetch_one(&self.pool)
                .await?;
        let comment_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE post_id = $1")
                .bind(post.id)
                .fetch_one(&self.pool)
                .await?;
        let liked_by_viewer = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM likes WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post.id)
        .bind(viewer_id)
        .fetch_one(&self.pool)
        .await?;

        let has_access = self
            .access
            .check_access(viewer_id, post.creator_id, post.is_paid_only)
            .await;

        Ok(assemble_view(
            post,
            media,
            creator,
            like_count,
            comment_count,
            liked_by_viewer,
            has_access,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn sample_post(content: &str, is_paid_only: bool) -> Post {
        Post {
            id: 1,
            creator_id: 9,
            content: content.to_string(),
            visibility: "public".to_string(),
            is_paid_only,
            document_type: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn sample_creator() -> CreatorInfoDto {
        CreatorInfoDto {
            id: 9,
            username: "ada".to_string(),
            full_name: "Ada L.".to_string(),
            avatar_url: String::new(),
            monthly_price: Decimal::new(499, 2),
        }
    }

    fn media_row(id: i64, url: &str) -> Media {
        Media {
            id,
            post_id: 1,
            media_url: url.to_string(),
            media_type: "image".to_string(),
            thumbnail_url: String::new(),
            metadata: String::new(),
            file_size: 10,
            file_name: "x.png".to_string(),
        }
    }

    #[test]
    fn media_batch_allows_each_class_alone() {
        assert!(validate_media_batch(&[]).is_ok());
        assert!(validate_media_batch(&[MediaKind::Image; 10]).is_ok());
        assert!(validate_media_batch(&[MediaKind::Video]).is_ok());
        assert!(validate_media_batch(&[MediaKind::Document; 3]).is_ok());
    }

    #[test]
    fn media_batch_rejects_mixes_and_excess() {
        assert!(validate_media_batch(&[MediaKind::Image, MediaKind::Video]).is_err());
        assert!(validate_media_batch(&[MediaKind::Video, MediaKind::Document]).is_err());
        assert!(validate_media_batch(&[MediaKind::Image; 11]).is_err());
        assert!(validate_media_batch(&[MediaKind::Video, MediaKind::Video]).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        let media = vec![
            media_row(1, "a.png"),
            media_row(2, "b.png"),
            media_row(3, "a.png"),
            media_row(4, "c.png"),
            media_row(5, "b.png"),
        ];
        assert_eq!(dedup_media_urls(&media), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn locked_view_replaces_content_but_keeps_teaser() {
        let view = assemble_view(
            sample_post("secret essay", true),
            vec![media_row(1, "a.png")],
            sample_creator(),
            3,
            2,
            false,
            false,
        );
        assert_eq!(view.content, LOCKED_CONTENT_NOTICE);
        assert!(!view.has_access);
        assert_eq!(view.media_urls, vec!["a.png"]);
        assert_eq!(view.like_count, 3);
        assert_eq!(view.comment_count, 2);
    }

    #[test]
    fn redaction_is_idempotent_and_byte_stable() {
        let first = assemble_view(
            sample_post("secret", true),
            vec![],
            sample_creator(),
            0,
            0,
            false,
            false,
        );
        // Feeding the redacted content back through produces the same bytes.
        let second = assemble_view(
            sample_post(&first.content, true),
            vec![],
            sample_creator(),
            0,
            0,
            false,
            false,
        );
        assert_eq!(first.content, second.content);
        assert_eq!(first.content, LOCKED_CONTENT_NOTICE);
    }

    #[test]
    fn unlocked_view_passes_content_through() {
        let view = assemble_view(
            sample_post("hello world", true),
            vec![],
            sample_creator(),
            0,
            0,
            false,
            true,
        );
        assert_eq!(view.content, "hello world");
        assert!(view.has_access);
    }

    #[test]
    fn visibility_values_are_constrained() {
        assert!(validate_visibility("public").is_ok());
        assert!(validate_visibility("private").is_ok());
        assert!(validate_visibility("friends").is_err());
    }
}
