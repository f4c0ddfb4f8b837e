// ABOUTME: Backend communication module
// ABOUTME: reqwest client plus the JSON shapes exchanged with the Django views

pub mod client;
pub mod models;

pub use client::RemoteClient;
pub use models::{AbortResponse, ProgressResponse, StartResponse, StationFetch};
