pub mod browse;
pub mod clear;
pub mod config;
pub mod fetch_ui;
pub mod library;
pub mod profile;
pub mod prompts;
pub mod refresh;
pub mod render;
