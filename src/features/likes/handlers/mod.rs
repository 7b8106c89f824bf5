mod like_handler;

pub use like_handler::*;
