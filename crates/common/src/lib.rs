pub mod admin_http;
pub mod types;
pub mod utils;
