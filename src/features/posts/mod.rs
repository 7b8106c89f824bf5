//! Post feed: creation with media attachments, paid-content access gating,
//! offset and cursor listing.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | POST | `/api/posts` | Yes | Create post (multipart, media attached) |
//! | GET | `/api/posts` | Yes | Offset-paginated feed |
//! | GET | `/api/posts/scroll` | Yes | Cursor-scrolled feed |
//! | GET | `/api/posts/{id}` | Yes | Single post view |
//! | PUT | `/api/posts/{id}` | Yes | Update own post |
//! | DELETE | `/api/posts/{id}` | Yes | Delete own post and its media |
//! | GET | `/api/posts/media/stats` | Yes | Media counts by type |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::{AccessService, PostService};
