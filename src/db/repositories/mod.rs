//! Database repositories
//!
//! Repositories handle all direct database interactions. The `RoomStore`
//! trait is the contract the service layer depends on; `PgRoomStore` is its
//! Postgres implementation.

pub mod room_repo;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Participant, Room},
};

pub use room_repo::PgRoomStore;

/// Load/save contract for the Room aggregate.
///
/// `update` must implement optimistic concurrency: a save against a room
/// whose stored version has advanced past the loaded snapshot is rejected
/// with `Conflict`, never partially applied. This is the only concurrency
/// primitive the aggregate needs; retry policy is left to callers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomStore: Send + Sync {
    /// Find a room by its id
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>>;

    /// Find a room by its invitation code
    async fn find_by_invitation_code(&self, code: &str) -> AppResult<Option<Room>>;

    /// Find the room that owns the participant with this access code
    async fn find_by_access_code(&self, code: &str) -> AppResult<Option<Room>>;

    /// Find a participant by their id
    async fn find_participant_by_id(&self, id: Uuid) -> AppResult<Option<Participant>>;

    /// Find a participant by their access code
    async fn find_participant_by_access_code(&self, code: &str)
    -> AppResult<Option<Participant>>;

    /// Persist a newly created room and its participants
    async fn create(&self, room: &Room) -> AppResult<Room>;

    /// Persist a mutated room, all-or-nothing, guarded by its version
    async fn update(&self, room: &Room) -> AppResult<Room>;
}
