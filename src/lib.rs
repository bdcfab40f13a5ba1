//! Giftroom - Secret Santa Coordination Service
//!
//! This library provides the core functionality for the Giftroom platform,
//! a service that coordinates gift-exchange events: participants join a
//! room via an invitation code, an admin manages membership, and at draw
//! time every participant is assigned another participant as their gift
//! recipient.
//!
//! # Features
//!
//! - Rooms with unguessable invitation and per-participant access codes
//! - Admin-managed membership while a room is open
//! - Randomized recipient draw (a derangement: nobody draws themself)
//! - Irreversible draws and terminal room closing
//! - Optimistic concurrency at the persistence boundary
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Command orchestration over the Room aggregate
//! - **Repositories**: The `RoomStore` contract and its Postgres implementation
//! - **Models**: The Room aggregate and Participant entity

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
