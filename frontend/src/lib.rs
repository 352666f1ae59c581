pub mod config;
pub mod profile;
pub mod relay_client;
pub mod render;
pub mod session;
