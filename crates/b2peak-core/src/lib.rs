//! Core library for `B2Peak`.
//!
//! Contains the identity model, the per-client session store, the NFT
//! catalog and marketplace filter, verification, the dashboard route guard,
//! and the navigation shell model. Every external collaborator (identity
//! provider, NFT source, verifier) sits behind an async trait; the fixture
//! implementations here are what the server runs against today. This crate
//! knows nothing about HTTP.

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod identity;
pub mod nav;
pub mod provider;
pub mod retry;
pub mod session;
pub mod verification;
