//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod participant;
pub mod room;

pub use participant::*;
pub use room::*;
