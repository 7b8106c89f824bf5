pub mod auth;
pub mod comments;
pub mod likes;
pub mod media;
pub mod messages;
pub mod posts;
pub mod subscriptions;
pub mod users;
