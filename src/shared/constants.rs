/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Fixed notice substituted for post content when the viewer has no access
/// to paid-only material. Must stay byte-stable: clients match on it to
/// render the "subscribe to unlock" affordance inline.
pub const LOCKED_CONTENT_NOTICE: &str =
    "🔒 This content is reserved for subscribers. Subscribe to unlock it!";

/// Maximum number of images attached to a single post
pub const MAX_IMAGES_PER_POST: usize = 10;

/// Maximum accepted Stripe webhook payload
pub const MAX_WEBHOOK_BODY_BYTES: usize = 64 * 1024;
