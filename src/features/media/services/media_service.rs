//! Media row management and orphaned-file cleanup.

use std::collections::HashSet;
use std::sync::Arc;

use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::{CleanupResultDto, MediaItemDto, UpdateMediaMetadataDto};
use crate::features::media::models::Media;
use crate::features::posts::models::Post;
use crate::modules::storage::LocalUploadStore;
use crate::shared::ownership::ensure_owner;

pub struct MediaService {
    pool: PgPool,
    store: Arc<LocalUploadStore>,
}

impl MediaService {
    pub fn new(pool: PgPool, store: Arc<LocalUploadStore>) -> Self {
        Self { pool, store }
    }

    pub async fn get_media(&self, id: i64) -> Result<MediaItemDto> {
        Ok(self.fetch_media(id).await?.into())
    }

    pub async fn list_by_post(&self, post_id: i64) -> Result<Vec<MediaItemDto>> {
        let rows = sqlx::query_as::<_, Media>(
            "SELECT * FROM media WHERE post_id = $1 ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Delete one media row and its backing files. Ownership is checked
    /// through the owning post.
    pub async fn delete_media(&self, id: i64, actor_id: i64) -> Result<()> {
        let media = self.fetch_media(id).await?;
        let post = self.fetch_owning_post(media.post_id).await?;
        ensure_owner(&post, actor_id)?;

        sqlx::query("DELETE FROM media WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.store.remove_file(&media.media_url).await;
        if !media.thumbnail_url.is_empty() {
            self.store.remove_file(&media.thumbnail_url).await;
        }

        tracing::info!("Media deleted: id={}, post={}", id, media.post_id);
        Ok(())
    }

    pub async fn update_metadata(
        &self,
        id: i64,
        actor_id: i64,
        dto: UpdateMediaMetadataDto,
    ) -> Result<MediaItemDto> {
        let media = self.fetch_media(id).await?;
        let post = self.fetch_owning_post(media.post_id).await?;
        ensure_owner(&post, actor_id)?;

        let updated = sqlx::query_as::<_, Media>(
            "UPDATE media SET metadata = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&dto.metadata)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated.into())
    }

    /// Remove files in the upload directories that no media row references,
    /// either as media_url or as thumbnail_url. On-demand maintenance, not a
    /// scheduled job.
    pub async fn cleanup_orphaned_media(&self) -> Result<CleanupResultDto> {
        let referenced: HashSet<String> = sqlx::query_as::<_, (String, String)>(
            "SELECT media_url, thumbnail_url FROM media",
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .flat_map(|(url, thumb)| [url, thumb])
        .filter(|s| !s.is_empty())
        .collect();

        let mut removed = 0i64;
        for file in self.store.list_stored_files().await? {
            if !referenced.contains(&file) {
                self.store.remove_file(&file).await;
                removed += 1;
            }
        }

        tracing::info!("Orphaned media cleanup removed {} file(s)", removed);
        Ok(CleanupResultDto { removed })
    }

    async fn fetch_media(&self, id: i64) -> Result<Media> {
        sqlx::query_as::<_, Media>("SELECT * FROM media WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Media not found".to_string()))
    }

    async fn fetch_owning_post(&self, post_id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
    }
}
