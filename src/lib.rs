pub mod bot;
pub mod clock;
pub mod config;
pub mod engine;
pub mod platform;
pub mod registry;
pub mod watermark;
