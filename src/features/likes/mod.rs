//! Post likes: toggle semantics under a unique constraint.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::LikeService;
