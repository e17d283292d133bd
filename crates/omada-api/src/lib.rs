// omada-api: Async Rust client for the TP-Link Omada controller web API

pub mod auth;
pub mod client;
pub mod clients;
pub mod devices;
pub mod error;
pub mod models;
pub mod sites;
pub mod transport;

pub use client::OmadaClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
