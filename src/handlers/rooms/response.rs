//! Room response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Participant, Room, RoomState};

/// Participant as rendered to room members.
///
/// Access codes and recipient assignments are never listed here; a member
/// only ever learns their own recipient, via `CurrentRoomResponse`.
#[derive(Debug, Serialize)]
pub struct ParticipantResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub delivery_info: Option<String>,
    pub wishlist: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id,
            first_name: p.first_name.clone(),
            last_name: p.last_name.clone(),
            phone: p.phone.clone(),
            email: p.email.clone(),
            delivery_info: p.delivery_info.clone(),
            wishlist: p.wishlist.clone(),
            is_admin: p.is_admin,
            created_at: p.created_at,
        }
    }
}

/// Room snapshot response
#[derive(Debug, Serialize)]
pub struct RoomResponse {
    pub id: Uuid,
    pub invitation_code: String,
    pub name: String,
    pub gift_budget: Option<String>,
    pub gift_exchange_date: Option<DateTime<Utc>>,
    pub state: RoomState,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub participants: Vec<ParticipantResponse>,
}

impl From<&Room> for RoomResponse {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id,
            invitation_code: room.invitation_code.clone(),
            name: room.name.clone(),
            gift_budget: room.gift_budget.clone(),
            gift_exchange_date: room.gift_exchange_date,
            state: room.state,
            created_at: room.created_at,
            closed_at: room.closed_at,
            participants: room.participants.iter().map(Into::into).collect(),
        }
    }
}

/// Response to room creation: the room plus the admin's credentials
#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room: RoomResponse,
    pub admin_id: Uuid,
    /// The admin's personal access code; shown once, at creation
    pub access_code: String,
}

/// Response to joining a room: the room plus the joiner's credentials
#[derive(Debug, Serialize)]
pub struct JoinRoomResponse {
    pub room: RoomResponse,
    pub participant_id: Uuid,
    /// The joiner's personal access code; shown once, at join time
    pub access_code: String,
}

/// A member's view of their room, with their own assignment resolved
#[derive(Debug, Serialize)]
pub struct CurrentRoomResponse {
    pub room: RoomResponse,
    pub you: ParticipantResponse,
    /// Present once names have been drawn
    pub your_recipient: Option<ParticipantResponse>,
}
