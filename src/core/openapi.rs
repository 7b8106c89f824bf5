use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::comments::{dtos as comments_dtos, handlers as comments_handlers};
use crate::features::likes::{dtos as likes_dtos, handlers as likes_handlers};
use crate::features::media::{dtos as media_dtos, handlers as media_handlers};
use crate::features::messages::{dtos as messages_dtos, handlers as messages_handlers};
use crate::features::posts::{dtos as posts_dtos, handlers as posts_handlers};
use crate::features::subscriptions::{
    dtos as subscriptions_dtos, handlers as subscriptions_handlers,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::register,
        auth_handlers::login,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::get_creator_info,
        // Posts
        posts_handlers::create_post,
        posts_handlers::list_posts,
        posts_handlers::scroll_posts,
        posts_handlers::get_post,
        posts_handlers::update_post,
        posts_handlers::delete_post,
        posts_handlers::media_statistics,
        // Media
        media_handlers::get_media,
        media_handlers::list_by_post,
        media_handlers::update_metadata,
        media_handlers::delete_media,
        media_handlers::cleanup_orphaned_media,
        // Likes
        likes_handlers::toggle_like,
        likes_handlers::like_stats,
        // Comments
        comments_handlers::create_comment,
        comments_handlers::list_comments,
        comments_handlers::delete_comment,
        // Messages
        messages_handlers::send_message,
        messages_handlers::get_conversation,
        // Subscriptions
        subscriptions_handlers::subscribe,
        subscriptions_handlers::subscribe_paid,
        subscriptions_handlers::unsubscribe,
        subscriptions_handlers::followers,
        subscriptions_handlers::followers_by_creator,
        subscriptions_handlers::my_subscriptions,
        subscriptions_handlers::stripe_webhook,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth_dtos::RegisterDto,
            auth_dtos::LoginDto,
            auth_dtos::TokenResponseDto,
            ApiResponse<auth_dtos::TokenResponseDto>,
            // Users
            users_dtos::ProfileDto,
            users_dtos::CreatorInfoDto,
            users_dtos::UpdateProfileDto,
            ApiResponse<users_dtos::ProfileDto>,
            ApiResponse<users_dtos::CreatorInfoDto>,
            // Posts
            posts_dtos::PostViewDto,
            posts_dtos::PostListDto,
            posts_dtos::ScrollDto,
            posts_dtos::UpdatePostDto,
            posts_dtos::MediaDto,
            posts_dtos::MediaStatsDto,
            ApiResponse<posts_dtos::PostViewDto>,
            ApiResponse<posts_dtos::PostListDto>,
            ApiResponse<posts_dtos::ScrollDto>,
            ApiResponse<posts_dtos::MediaStatsDto>,
            // Media
            media_dtos::MediaItemDto,
            media_dtos::UpdateMediaMetadataDto,
            media_dtos::CleanupResultDto,
            ApiResponse<media_dtos::MediaItemDto>,
            ApiResponse<Vec<media_dtos::MediaItemDto>>,
            ApiResponse<media_dtos::CleanupResultDto>,
            // Likes
            likes_dtos::ToggleLikeDto,
            likes_dtos::LikeStatsDto,
            ApiResponse<likes_dtos::ToggleLikeDto>,
            ApiResponse<likes_dtos::LikeStatsDto>,
            // Comments
            comments_dtos::CreateCommentDto,
            comments_dtos::CommentDto,
            ApiResponse<comments_dtos::CommentDto>,
            ApiResponse<Vec<comments_dtos::CommentDto>>,
            // Messages
            messages_dtos::SendMessageDto,
            messages_dtos::MessageDto,
            ApiResponse<messages_dtos::MessageDto>,
            ApiResponse<Vec<messages_dtos::MessageDto>>,
            // Subscriptions
            subscriptions_dtos::SubscribeDto,
            subscriptions_dtos::PaidSubscribeDto,
            subscriptions_dtos::SubscriptionDto,
            subscriptions_dtos::FollowerIdsDto,
            subscriptions_dtos::FollowerEntryDto,
            subscriptions_dtos::SplitFollowersDto,
            subscriptions_dtos::FollowingEntryDto,
            subscriptions_dtos::SplitSubscriptionsDto,
            subscriptions_dtos::CheckoutSessionDto,
            ApiResponse<subscriptions_dtos::SubscriptionDto>,
            ApiResponse<subscriptions_dtos::FollowerIdsDto>,
            ApiResponse<subscriptions_dtos::SplitFollowersDto>,
            ApiResponse<subscriptions_dtos::SplitSubscriptionsDto>,
            ApiResponse<subscriptions_dtos::CheckoutSessionDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Profiles and public creator info"),
        (name = "posts", description = "Post feed with paid-content gating"),
        (name = "media", description = "Media attachments and cleanup"),
        (name = "likes", description = "Post likes"),
        (name = "comments", description = "Comments on posts"),
        (name = "messages", description = "Direct messages"),
        (name = "subscriptions", description = "Creator subscriptions and billing"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "ThinkShare API",
        version = "0.1.0",
        description = "API documentation for ThinkShare",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
