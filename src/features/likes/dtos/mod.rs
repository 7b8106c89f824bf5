mod like_dto;

pub use like_dto::{LikeStatsDto, ToggleLikeDto};
