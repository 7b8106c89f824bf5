//! Subscription lifecycle: the free/paid decision table, Stripe Checkout
//! hand-off and webhook-driven activation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::subscriptions::dtos::{
    CheckoutSessionDto, FollowerEntryDto, FollowerIdsDto, FollowingEntryDto, SplitFollowersDto,
    SplitSubscriptionsDto, SubscribeDto, SubscriptionDto,
};
use crate::features::subscriptions::models::Subscription;
use crate::features::subscriptions::services::billing::{BillingClient, SubscriptionCheckout};
use crate::features::subscriptions::services::webhook::{
    CheckoutSessionObject, SubscriptionObject, WebhookEvent,
};
use crate::features::users::models::User;

const PAID_TERM_DAYS: i64 = 30;

/// What `subscribe` should do for a given existing row and requested type.
#[derive(Debug, PartialEq, Eq)]
enum SubscribeAction {
    /// Insert a fresh free subscription
    CreateFree,
    /// The existing row is already a free follow; nothing to change
    FreeNoop,
    /// Switch the row to the requested type and reactivate it
    SwitchType,
    /// Same paid type, but lapsed: restart the term
    RenewPaid,
}

/// The subscribe decision table. Paid rows that are still active and within
/// their term cannot be renewed early; creating a paid row directly is
/// rejected in favor of the checkout endpoint.
fn decide_subscribe(
    existing: Option<&Subscription>,
    requested: &str,
    now: DateTime<Utc>,
) -> Result<SubscribeAction> {
    match requested {
        "free" | "paid" => {}
        other => {
            return Err(AppError::Validation(format!(
                "type must be 'free' or 'paid', got '{}'",
                other
            )))
        }
    }

    let Some(existing) = existing else {
        return if requested == "paid" {
            Err(AppError::BadRequest(
                "Paid subscriptions go through /api/subscribe/paid".to_string(),
            ))
        } else {
            Ok(SubscribeAction::CreateFree)
        };
    };

    let still_running = existing.is_active
        && existing.end_date.map(|end| end > now).unwrap_or(false);
    if existing.kind == "paid" && requested == "paid" && still_running {
        return Err(AppError::BadRequest(
            "Already on a paid subscription; renewal opens after it expires".to_string(),
        ));
    }

    if existing.kind != requested {
        return Ok(SubscribeAction::SwitchType);
    }

    if requested == "free" {
        return Ok(SubscribeAction::FreeNoop);
    }

    // Same paid type and not still running.
    Ok(SubscribeAction::RenewPaid)
}

pub struct SubscriptionService {
    pool: PgPool,
    billing: Arc<dyn BillingClient>,
    success_url: String,
    cancel_url: String,
    currency: String,
}

impl SubscriptionService {
    pub fn new(
        pool: PgPool,
        billing: Arc<dyn BillingClient>,
        success_url: String,
        cancel_url: String,
        currency: String,
    ) -> Self {
        Self {
            pool,
            billing,
            success_url,
            cancel_url,
            currency,
        }
    }

    pub async fn subscribe(&self, subscriber_id: i64, dto: SubscribeDto) -> Result<SubscriptionDto> {
        if dto.creator_id == subscriber_id {
            return Err(AppError::Validation(
                "You cannot subscribe to yourself".to_string(),
            ));
        }
        self.ensure_user_exists(dto.creator_id).await?;

        let existing = self.find_pair(subscriber_id, dto.creator_id).await?;
        let now = Utc::now();
        let action = decide_subscribe(existing.as_ref(), &dto.kind, now)?;

        if action == SubscribeAction::FreeNoop {
            return match existing {
                Some(sub) => Ok(sub.into()),
                None => Err(AppError::Internal(
                    "subscription disappeared mid-request".to_string(),
                )),
            };
        }

        let subscription = match action {
            SubscribeAction::CreateFree => {
                sqlx::query_as::<_, Subscription>(
                    r#"
                    INSERT INTO subscriptions (subscriber_id, creator_id, start_date, is_active, type)
                    VALUES ($1, $2, $3, TRUE, 'free')
                    RETURNING *
                    "#,
                )
                .bind(subscriber_id)
                .bind(dto.creator_id)
                .bind(now)
                .fetch_one(&self.pool)
                .await?
            }
            // FreeNoop returned above
            SubscribeAction::FreeNoop => {
                return Err(AppError::Internal(
                    "unexpected subscribe action".to_string(),
                ))
            }
            SubscribeAction::SwitchType => {
                let (start, end): (DateTime<Utc>, Option<DateTime<Utc>>) = if dto.kind == "paid" {
                    (now, Some(now + Duration::days(PAID_TERM_DAYS)))
                } else {
                    let row = existing.as_ref().map(|e| e.start_date).unwrap_or(now);
                    (row, None)
                };
                sqlx::query_as::<_, Subscription>(
                    r#"
                    UPDATE subscriptions
                    SET type = $3, is_active = TRUE, start_date = $4, end_date = $5
                    WHERE subscriber_id = $1 AND creator_id = $2
                    RETURNING *
                    "#,
                )
                .bind(subscriber_id)
                .bind(dto.creator_id)
                .bind(&dto.kind)
                .bind(start)
                .bind(end)
                .fetch_one(&self.pool)
                .await?
            }
            SubscribeAction::RenewPaid => {
                sqlx::query_as::<_, Subscription>(
                    r#"
                    UPDATE subscriptions
                    SET is_active = TRUE, start_date = $3, end_date = $4
                    WHERE subscriber_id = $1 AND creator_id = $2
                    RETURNING *
                    "#,
                )
                .bind(subscriber_id)
                .bind(dto.creator_id)
                .bind(now)
                .bind(now + Duration::days(PAID_TERM_DAYS))
                .fetch_one(&self.pool)
                .await?
            }
        };

        tracing::info!(
            "Subscription upserted: subscriber={}, creator={}, type={}",
            subscriber_id,
            dto.creator_id,
            subscription.kind
        );
        Ok(subscription.into())
    }

    /// Start a Stripe Checkout session for a monthly paid subscription. The
    /// subscription row itself is created by the webhook once payment lands.
    pub async fn create_paid_checkout(
        &self,
        subscriber_id: i64,
        creator_id: i64,
    ) -> Result<CheckoutSessionDto> {
        if creator_id == subscriber_id {
            return Err(AppError::Validation(
                "You cannot subscribe to yourself".to_string(),
            ));
        }

        let creator = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(creator_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Creator not found".to_string()))?;

        if creator.monthly_price <= Decimal::ZERO {
            return Err(AppError::Validation(
                "This creator has no paid subscription".to_string(),
            ));
        }

        let session = self
            .billing
            .create_subscription_checkout(SubscriptionCheckout {
                amount: creator.monthly_price,
                currency: self.currency.clone(),
                success_url: self.success_url.clone(),
                cancel_url: self.cancel_url.clone(),
                creator_id,
                subscriber_id,
            })
            .await?;

        tracing::info!(
            "Checkout session created: subscriber={}, creator={}, session={}",
            subscriber_id,
            creator_id,
            session.id
        );
        Ok(CheckoutSessionDto {
            session_id: session.id,
            checkout_url: session.url,
        })
    }

    /// Soft delete: the row stays, `is_active` flips off.
    pub async fn unsubscribe(&self, subscriber_id: i64, creator_id: i64) -> Result<()> {
        let updated = sqlx::query(
            "UPDATE subscriptions SET is_active = FALSE WHERE subscriber_id = $1 AND creator_id = $2",
        )
        .bind(subscriber_id)
        .bind(creator_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated == 0 {
            return Err(AppError::NotFound("Subscription not found".to_string()));
        }

        tracing::info!(
            "Unsubscribed: subscriber={}, creator={}",
            subscriber_id,
            creator_id
        );
        Ok(())
    }

    pub async fn follower_ids(&self, creator_id: i64) -> Result<FollowerIdsDto> {
        let followers = sqlx::query_scalar::<_, i64>(
            "SELECT subscriber_id FROM subscriptions WHERE creator_id = $1 AND is_active = TRUE",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(FollowerIdsDto { followers })
    }

    /// Active followers of a creator, split into paid and free. Stripe-backed
    /// rows count as paid.
    pub async fn followers_by_creator(&self, creator_id: i64) -> Result<SplitFollowersDto> {
        let rows = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE creator_id = $1 AND is_active = TRUE",
        )
        .bind(creator_id)
        .fetch_all(&self.pool)
        .await?;

        let mut paid = Vec::new();
        let mut free = Vec::new();
        for sub in rows {
            let entry = FollowerEntryDto {
                subscriber_id: sub.subscriber_id,
                kind: sub.kind.clone(),
            };
            if sub.kind == "free" {
                free.push(entry);
            } else {
                paid.push(entry);
            }
        }

        Ok(SplitFollowersDto { paid, free })
    }

    pub async fn my_subscriptions(&self, subscriber_id: i64) -> Result<SplitSubscriptionsDto> {
        let rows = sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE subscriber_id = $1 AND is_active = TRUE",
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        let mut paid = Vec::new();
        let mut free = Vec::new();
        for sub in rows {
            let entry = FollowingEntryDto {
                creator_id: sub.creator_id,
                kind: sub.kind.clone(),
            };
            if sub.kind == "free" {
                free.push(entry);
            } else {
                paid.push(entry);
            }
        }

        Ok(SplitSubscriptionsDto { paid, free })
    }

    /// Apply one verified webhook event. Unknown event types are ignored;
    /// failures while applying a known event are logged but still answered
    /// with success so Stripe does not retry forever against a poison event.
    pub async fn apply_webhook_event(&self, event: WebhookEvent) {
        match event.event_type.as_str() {
            "checkout.session.completed" => {
                match serde_json::from_value::<CheckoutSessionObject>(event.data.object) {
                    Ok(session) => {
                        if let Err(e) = self.apply_checkout_completed(&session).await {
                            tracing::error!(
                                "Failed to apply checkout.session.completed for {}: {:?}",
                                session.id,
                                e
                            );
                        }
                    }
                    Err(e) => tracing::error!("Malformed checkout session payload: {}", e),
                }
            }
            "customer.subscription.deleted" | "customer.subscription.updated" => {
                match serde_json::from_value::<SubscriptionObject>(event.data.object) {
                    Ok(sub) => {
                        if let Err(e) = self.apply_subscription_status(&sub).await {
                            tracing::error!(
                                "Failed to apply subscription status for {}: {:?}",
                                sub.id,
                                e
                            );
                        }
                    }
                    Err(e) => tracing::error!("Malformed subscription payload: {}", e),
                }
            }
            other => {
                tracing::debug!("Ignoring webhook event type: {}", other);
            }
        }
    }

    async fn apply_checkout_completed(&self, session: &CheckoutSessionObject) -> Result<()> {
        let creator_id = metadata_id(session, "creator_id");
        let subscriber_id = metadata_id(session, "subscriber_id");
        if creator_id == 0 || subscriber_id == 0 {
            return Err(AppError::BadRequest(
                "Checkout session metadata is missing creator_id/subscriber_id".to_string(),
            ));
        }

        let stripe_subscription_id = session.subscription.clone().unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO subscriptions (subscriber_id, creator_id, start_date, is_active, type, stripe_subscription_id)
            VALUES ($1, $2, NOW(), TRUE, 'stripe', $3)
            ON CONFLICT (subscriber_id, creator_id) DO UPDATE
            SET is_active = TRUE,
                type = 'stripe',
                stripe_subscription_id = CASE
                    WHEN EXCLUDED.stripe_subscription_id <> '' THEN EXCLUDED.stripe_subscription_id
                    ELSE subscriptions.stripe_subscription_id
                END
            "#,
        )
        .bind(subscriber_id)
        .bind(creator_id)
        .bind(&stripe_subscription_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Checkout completed: subscriber={}, creator={}, stripe_subscription={}",
            subscriber_id,
            creator_id,
            stripe_subscription_id
        );
        Ok(())
    }

    async fn apply_subscription_status(&self, sub: &SubscriptionObject) -> Result<()> {
        let is_active = match sub.status.as_str() {
            "canceled" | "incomplete_expired" | "unpaid" => false,
            "active" => true,
            other => {
                tracing::debug!("Ignoring subscription status '{}' for {}", other, sub.id);
                return Ok(());
            }
        };

        let updated = sqlx::query(
            "UPDATE subscriptions SET is_active = $2 WHERE stripe_subscription_id = $1",
        )
        .bind(&sub.id)
        .bind(is_active)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated > 0 {
            tracing::info!(
                "Subscription {} set is_active={} via webhook",
                sub.id,
                is_active
            );
        }
        Ok(())
    }

    async fn find_pair(
        &self,
        subscriber_id: i64,
        creator_id: i64,
    ) -> Result<Option<Subscription>> {
        Ok(sqlx::query_as::<_, Subscription>(
            "SELECT * FROM subscriptions WHERE subscriber_id = $1 AND creator_id = $2",
        )
        .bind(subscriber_id)
        .bind(creator_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn ensure_user_exists(&self, id: i64) -> Result<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Creator not found".to_string()));
        }
        Ok(())
    }
}

fn metadata_id(session: &CheckoutSessionObject, key: &str) -> i64 {
    session
        .metadata
        .get(key)
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, is_active: bool, end_date: Option<DateTime<Utc>>) -> Subscription {
        Subscription {
            id: 1,
            subscriber_id: 2,
            creator_id: 3,
            start_date: Utc::now() - Duration::days(10),
            end_date,
            is_active,
            kind: kind.to_string(),
            stripe_subscription_id: String::new(),
        }
    }

    #[test]
    fn first_free_subscribe_creates_a_row() {
        let action = decide_subscribe(None, "free", Utc::now()).unwrap();
        assert_eq!(action, SubscribeAction::CreateFree);
    }

    #[test]
    fn first_paid_subscribe_is_redirected_to_checkout() {
        assert!(decide_subscribe(None, "paid", Utc::now()).is_err());
    }

    #[test]
    fn repeat_free_subscribe_is_a_noop() {
        let now = Utc::now();
        let existing = row("free", true, None);
        let action = decide_subscribe(Some(&existing), "free", now).unwrap();
        assert_eq!(action, SubscribeAction::FreeNoop);
    }

    #[test]
    fn type_switch_reactivates() {
        let now = Utc::now();
        let free = row("free", true, None);
        assert_eq!(
            decide_subscribe(Some(&free), "paid", now).unwrap(),
            SubscribeAction::SwitchType
        );

        let paid = row("paid", true, Some(now + Duration::days(5)));
        assert_eq!(
            decide_subscribe(Some(&paid), "free", now).unwrap(),
            SubscribeAction::SwitchType
        );

        // Stripe-backed rows count as a different type from 'paid'.
        let stripe = row("stripe", false, None);
        assert_eq!(
            decide_subscribe(Some(&stripe), "paid", now).unwrap(),
            SubscribeAction::SwitchType
        );
    }

    #[test]
    fn active_paid_cannot_renew_early() {
        let now = Utc::now();
        let existing = row("paid", true, Some(now + Duration::days(5)));
        assert!(decide_subscribe(Some(&existing), "paid", now).is_err());
    }

    #[test]
    fn lapsed_paid_can_renew() {
        let now = Utc::now();

        let expired = row("paid", true, Some(now - Duration::days(1)));
        assert_eq!(
            decide_subscribe(Some(&expired), "paid", now).unwrap(),
            SubscribeAction::RenewPaid
        );

        let inactive = row("paid", false, Some(now + Duration::days(5)));
        assert_eq!(
            decide_subscribe(Some(&inactive), "paid", now).unwrap(),
            SubscribeAction::RenewPaid
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(decide_subscribe(None, "vip", Utc::now()).is_err());
    }
}
