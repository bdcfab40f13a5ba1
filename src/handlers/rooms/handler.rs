//! Room handler implementations

use axum::{
    Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    services::RoomService,
    state::AppState,
};

use super::{
    request::{AccessCodeQuery, AccessCodeRequest, CreateRoomRequest, JoinRoomRequest},
    response::{CreateRoomResponse, CurrentRoomResponse, JoinRoomResponse, RoomResponse},
};

/// Create a new room with its admin participant
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<CreateRoomRequest>,
) -> AppResult<Json<CreateRoomResponse>> {
    payload.validate()?;

    let (details, admin_profile) = payload.into_parts();
    let room = RoomService::create_room(state.store(), details, admin_profile).await?;

    let admin = room
        .admins()
        .next()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("created room has no admin")))?;
    let admin_id = admin.id;
    let access_code = admin.access_code.clone();

    Ok(Json(CreateRoomResponse {
        room: (&room).into(),
        admin_id,
        access_code,
    }))
}

/// Join a room using its invitation code
pub async fn join_room(
    State(state): State<AppState>,
    Json(payload): Json<JoinRoomRequest>,
) -> AppResult<Json<JoinRoomResponse>> {
    payload.validate()?;

    let (room, participant) = RoomService::join_room(
        state.store(),
        &payload.invitation_code,
        payload.profile.into(),
    )
    .await?;

    Ok(Json(JoinRoomResponse {
        room: (&room).into(),
        participant_id: participant.id,
        access_code: participant.access_code,
    }))
}

/// Get the requesting member's view of their room
pub async fn get_current_room(
    State(state): State<AppState>,
    Query(query): Query<AccessCodeQuery>,
) -> AppResult<Json<CurrentRoomResponse>> {
    let room = RoomService::get_room_by_access_code(state.store(), &query.access_code).await?;

    let you = room
        .participant_by_access_code(&query.access_code)
        .ok_or_else(|| {
            AppError::NotFound("Participant with such access code not found.".to_string())
        })?;
    let your_recipient = you
        .recipient_id
        .and_then(|id| room.participant(id))
        .map(Into::into);

    Ok(Json(CurrentRoomResponse {
        you: you.into(),
        your_recipient,
        room: (&room).into(),
    }))
}

/// Draw names (admin only)
pub async fn draw_names(
    State(state): State<AppState>,
    Json(payload): Json<AccessCodeRequest>,
) -> AppResult<Json<RoomResponse>> {
    payload.validate()?;

    let room = RoomService::draw_names(state.store(), &payload.access_code).await?;
    Ok(Json((&room).into()))
}

/// Close the room (admin only)
pub async fn close_room(
    State(state): State<AppState>,
    Json(payload): Json<AccessCodeRequest>,
) -> AppResult<Json<RoomResponse>> {
    payload.validate()?;

    let room = RoomService::close_room(state.store(), &payload.access_code).await?;
    Ok(Json((&room).into()))
}

/// Remove a participant from the room (admin only)
pub async fn delete_participant(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<AccessCodeQuery>,
) -> AppResult<Json<RoomResponse>> {
    let room = RoomService::delete_participant(state.store(), &query.access_code, id).await?;
    Ok(Json((&room).into()))
}
