mod subscription_handler;
mod webhook_handler;

pub use subscription_handler::*;
pub use webhook_handler::*;
