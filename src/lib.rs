pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod prompt;
pub mod render;
pub mod session;
