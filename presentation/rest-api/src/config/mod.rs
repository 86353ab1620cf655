pub mod app_config;
pub mod clerk_config;
pub mod cors_config;
pub mod gemini_config;
pub mod server_config;
