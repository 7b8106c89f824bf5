use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleLikeDto {
    /// True when the toggle resulted in a like, false when it removed one
    pub liked: bool,
    pub like_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LikeStatsDto {
    pub like_count: i64,
    pub liked_by_viewer: bool,
}
