//! バックエンド連携

pub mod client;

pub use client::WebGateway;
