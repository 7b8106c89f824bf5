pub mod constants;
pub mod ownership;
pub mod types;
pub mod validation;
