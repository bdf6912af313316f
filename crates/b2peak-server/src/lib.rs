//! `B2Peak` HTTP server.
//!
//! Serves the landing page, marketplace, gated dashboard and NFT detail
//! pages as server-rendered HTML, plus a JSON API at `/v1/*` over the same
//! per-client sessions.

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod views;
