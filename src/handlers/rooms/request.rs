//! Room request DTOs

use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use crate::models::{ParticipantProfile, RoomDetails};

/// Participant contact and delivery details
#[derive(Debug, Deserialize, Validate)]
pub struct ParticipantProfileRequest {
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,

    #[validate(length(max = 50))]
    pub last_name: String,

    pub phone: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 500))]
    pub delivery_info: Option<String>,

    #[validate(length(max = 1000))]
    pub wishlist: Option<String>,
}

impl From<ParticipantProfileRequest> for ParticipantProfile {
    fn from(req: ParticipantProfileRequest) -> Self {
        Self {
            first_name: req.first_name,
            last_name: req.last_name,
            phone: req.phone,
            email: req.email,
            delivery_info: req.delivery_info,
            wishlist: req.wishlist,
        }
    }
}

/// Create room request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub gift_budget: Option<String>,

    pub gift_exchange_date: Option<DateTime<Utc>>,

    #[validate(nested)]
    pub admin: ParticipantProfileRequest,
}

impl CreateRoomRequest {
    /// Split the request into room details and the admin's profile
    pub fn into_parts(self) -> (RoomDetails, ParticipantProfile) {
        (
            RoomDetails {
                name: self.name,
                gift_budget: self.gift_budget,
                gift_exchange_date: self.gift_exchange_date,
            },
            self.admin.into(),
        )
    }
}

/// Join room request
#[derive(Debug, Deserialize, Validate)]
pub struct JoinRoomRequest {
    #[validate(length(min = 1))]
    pub invitation_code: String,

    #[validate(nested)]
    pub profile: ParticipantProfileRequest,
}

/// Request body carrying the acting participant's access code
#[derive(Debug, Deserialize, Validate)]
pub struct AccessCodeRequest {
    #[validate(length(min = 1))]
    pub access_code: String,
}

/// Query parameter carrying the acting participant's access code
#[derive(Debug, Deserialize)]
pub struct AccessCodeQuery {
    pub access_code: String,
}
