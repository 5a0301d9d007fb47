pub mod api;
pub mod app;
pub mod config;
pub mod importers;
pub mod models;
pub mod month;
pub mod pipeline;
pub mod render;
pub mod services;
pub mod utils;
