//! Participant model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    utils::codes,
};

/// A member of a gift-exchange room
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub room_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub delivery_info: Option<String>,
    pub wishlist: Option<String>,
    pub is_admin: bool,
    /// Per-participant secret used for self-identification
    #[serde(skip_serializing)]
    pub access_code: String,
    /// Assigned gift recipient, set only once names have been drawn
    pub recipient_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Contact and delivery details supplied when a participant is created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParticipantProfile {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub delivery_info: Option<String>,
    pub wishlist: Option<String>,
}

impl Participant {
    /// Create a new participant with a fresh identity and access code
    pub fn new(room_id: Uuid, profile: ParticipantProfile, is_admin: bool) -> AppResult<Self> {
        if profile.first_name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Participant name must not be empty.".to_string(),
            ));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            room_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            phone: profile.phone,
            email: profile.email,
            delivery_info: profile.delivery_info,
            wishlist: profile.wishlist,
            is_admin,
            access_code: codes::new_access_code(),
            recipient_id: None,
            created_at: Utc::now(),
        })
    }

    /// Compare a presented code against this participant's access code.
    ///
    /// Access codes are the authentication credential, so the comparison
    /// must not leak where the first mismatching byte sits.
    pub fn access_code_matches(&self, code: &str) -> bool {
        self.access_code.as_bytes().ct_eq(code.as_bytes()).into()
    }

    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
