//! Room aggregate
//!
//! A room owns its participant set, its lifecycle state, and the draw that
//! assigns every participant a gift recipient. All mutation goes through the
//! operations here; each one validates its preconditions before touching any
//! state, so a failed call always leaves the room exactly as it was.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    constants::{MAX_DRAW_ATTEMPTS, MIN_DRAW_PARTICIPANTS},
    error::{AppError, AppResult},
    models::participant::{Participant, ParticipantProfile},
    utils::codes,
};

/// Room lifecycle state
///
/// Legal transitions: `Open -> Drawn`, `Open -> Closed`, `Drawn -> Closed`.
/// `Closed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomState {
    Open,
    Drawn,
    Closed,
}

impl RoomState {
    /// Database representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Drawn => "drawn",
            Self::Closed => "closed",
        }
    }
}

impl std::str::FromStr for RoomState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "drawn" => Ok(Self::Drawn),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown room state: {other}")),
        }
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A gift-exchange room and its membership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    /// Shared secret permitting joining; immutable for the room's lifetime
    pub invitation_code: String,
    pub name: String,
    pub gift_budget: Option<String>,
    pub gift_exchange_date: Option<DateTime<Utc>>,
    pub state: RoomState,
    /// Optimistic-concurrency token, bumped by every successful save
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
}

/// Room attributes supplied at creation
#[derive(Debug, Clone, Default)]
pub struct RoomDetails {
    pub name: String,
    pub gift_budget: Option<String>,
    pub gift_exchange_date: Option<DateTime<Utc>>,
}

impl Room {
    /// Create a new open room together with its admin participant
    pub fn create(details: RoomDetails, admin_profile: ParticipantProfile) -> AppResult<Self> {
        if details.name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Room name must not be empty.".to_string(),
            ));
        }

        let id = Uuid::new_v4();
        let admin = Participant::new(id, admin_profile, true)?;

        Ok(Self {
            id,
            invitation_code: codes::new_invitation_code(),
            name: details.name,
            gift_budget: details.gift_budget,
            gift_exchange_date: details.gift_exchange_date,
            state: RoomState::Open,
            version: 0,
            created_at: Utc::now(),
            closed_at: None,
            participants: vec![admin],
        })
    }

    /// Look up a member by id
    pub fn participant(&self, id: Uuid) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    /// Look up a member by access code (constant-time per comparison)
    pub fn participant_by_access_code(&self, code: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.access_code_matches(code))
    }

    /// The room's admin participants
    pub fn admins(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_admin)
    }

    /// Check that the room still accepts membership mutations
    fn ensure_open(&self) -> AppResult<()> {
        match self.state {
            RoomState::Open => Ok(()),
            RoomState::Drawn => Err(AppError::BadRequest(
                "Names have already been drawn.".to_string(),
            )),
            RoomState::Closed => Err(AppError::BadRequest(
                "Room is already closed.".to_string(),
            )),
        }
    }

    /// Add a participant to an open room
    pub fn add_participant(
        &mut self,
        profile: ParticipantProfile,
        is_admin: bool,
    ) -> AppResult<Participant> {
        self.ensure_open()?;

        let participant = Participant::new(self.id, profile, is_admin)?;
        if self
            .participants
            .iter()
            .any(|p| p.access_code == participant.access_code)
        {
            return Err(AppError::Conflict(
                "Generated access code collides with an existing one.".to_string(),
            ));
        }

        self.participants.push(participant.clone());
        Ok(participant)
    }

    /// Remove a participant from an open room on behalf of an admin.
    ///
    /// The state check comes first: once names are drawn, removal is refused
    /// no matter who asks, since it would invalidate the assignment.
    pub fn remove_participant(&mut self, acting_id: Uuid, target_id: Uuid) -> AppResult<()> {
        self.ensure_open()?;

        let acting = self.participant(acting_id).ok_or_else(|| {
            AppError::NotFound("Acting participant is not a member of this room.".to_string())
        })?;
        if self.participant(target_id).is_none() {
            return Err(AppError::NotFound(
                "Participant with such id is not a member of this room.".to_string(),
            ));
        }
        if !acting.is_admin {
            return Err(AppError::Forbidden(
                "Only an admin may remove participants.".to_string(),
            ));
        }
        if acting_id == target_id {
            return Err(AppError::BadRequest(
                "An admin may not remove themself.".to_string(),
            ));
        }

        self.participants.retain(|p| p.id != target_id);
        Ok(())
    }

    /// Draw names: assign every participant another participant as recipient.
    ///
    /// The assignment is a uniformly random derangement, found by rejection
    /// sampling: shuffle the member list and resample while any participant
    /// maps to themself. The expected number of attempts is ~e, so the cap
    /// only triggers on a broken random source.
    pub fn draw(&mut self) -> AppResult<()> {
        self.ensure_open()?;
        if self.participants.len() < MIN_DRAW_PARTICIPANTS {
            return Err(AppError::BadRequest(format!(
                "At least {MIN_DRAW_PARTICIPANTS} participants are required to draw names."
            )));
        }

        let givers: Vec<Uuid> = self.participants.iter().map(|p| p.id).collect();
        let mut recipients = givers.clone();
        let mut rng = rand::rng();

        let mut attempts = 0;
        loop {
            if attempts >= MAX_DRAW_ATTEMPTS {
                return Err(AppError::Internal(anyhow::anyhow!(
                    "no derangement found within {MAX_DRAW_ATTEMPTS} attempts"
                )));
            }
            attempts += 1;

            recipients.shuffle(&mut rng);
            if givers.iter().zip(&recipients).all(|(g, r)| g != r) {
                break;
            }
        }

        for (participant, recipient) in self.participants.iter_mut().zip(&recipients) {
            participant.recipient_id = Some(*recipient);
        }
        self.state = RoomState::Drawn;
        Ok(())
    }

    /// Close the room, from `Open` (abandoned) or `Drawn` (finished)
    pub fn close(&mut self) -> AppResult<()> {
        if self.state == RoomState::Closed {
            return Err(AppError::BadRequest(
                "Room is already closed.".to_string(),
            ));
        }

        self.state = RoomState::Closed;
        self.closed_at = Some(Utc::now());
        Ok(())
    }
}
