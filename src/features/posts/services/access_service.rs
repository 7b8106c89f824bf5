//! Paid-content access decisions.

use sqlx::PgPool;

/// Decides whether a viewer may see a post's full content. Stateless and
/// uncached: every gated check re-queries the subscriptions table.
pub struct AccessService {
    pool: PgPool,
}

impl AccessService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Free content is visible to anyone, creators always see their own
    /// posts, and otherwise access requires an active subscription row.
    /// Subscription type and end_date are not consulted here; activation and
    /// deactivation are driven by the subscription endpoints and billing
    /// webhooks.
    pub async fn check_access(&self, viewer_id: i64, creator_id: i64, is_paid_only: bool) -> bool {
        if !is_paid_only {
            return true;
        }
        if viewer_id == creator_id {
            return true;
        }
        if viewer_id <= 0 {
            return false;
        }

        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM subscriptions
                WHERE subscriber_id = $1 AND creator_id = $2 AND is_active = TRUE
            )
            "#,
        )
        .bind(viewer_id)
        .bind(creator_id)
        .fetch_one(&self.pool)
        .await;

        match exists {
            Ok(active) => active,
            Err(e) => {
                // Treated as "no active subscription" rather than failing the
                // whole feed request.
                tracing::error!(
                    "Subscription lookup failed (viewer={}, creator={}): {:?}",
                    viewer_id,
                    creator_id,
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // connect_lazy never touches the network until a query runs, so the
    // short-circuit branches can be exercised without a database.
    fn detached_service() -> AccessService {
        let pool = PgPool::connect_lazy("postgres://localhost/unused")
            .expect("lazy pool construction should not fail");
        AccessService::new(pool)
    }

    #[tokio::test]
    async fn free_content_is_visible_to_anyone() {
        let access = detached_service();
        assert!(access.check_access(0, 7, false).await);
        assert!(access.check_access(-1, 7, false).await);
        assert!(access.check_access(123, 7, false).await);
    }

    #[tokio::test]
    async fn creator_always_sees_own_paid_content() {
        let access = detached_service();
        assert!(access.check_access(7, 7, true).await);
    }

    #[tokio::test]
    async fn anonymous_viewer_never_unlocks_paid_content() {
        let access = detached_service();
        assert!(!access.check_access(0, 7, true).await);
        assert!(!access.check_access(-5, 7, true).await);
    }
}
