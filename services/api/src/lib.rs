//! Backend for a personal-trainer profile site
//!
//! Serves the public profile and weekly schedule, accepts visitor inquiries
//! (forwarded by email and Telegram), and exposes a bearer-token protected
//! admin API for the single site owner.

pub mod config;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod repositories;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
