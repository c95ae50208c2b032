//! Diet Tracker Backend Library
//!
//! This library exposes the backend modules for the server binary, the seed
//! generator binary and the integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
