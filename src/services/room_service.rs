//! Room service
//!
//! Command handlers over the Room aggregate: each command is one
//! load-mutate-save cycle against the store. Business rules live in the
//! aggregate; this layer resolves the acting participant from their access
//! code and translates requests into exactly one aggregate operation.
//! Nothing here retries a `Conflict`: the right retry policy depends on the
//! command, so that decision stays with the caller.

use uuid::Uuid;

use crate::{
    db::repositories::RoomStore,
    error::{AppError, AppResult},
    models::{Participant, ParticipantProfile, Room, RoomDetails},
};

/// Room service for command orchestration
pub struct RoomService;

impl RoomService {
    /// Create a new room together with its admin participant
    pub async fn create_room<S: RoomStore>(
        store: &S,
        details: RoomDetails,
        admin_profile: ParticipantProfile,
    ) -> AppResult<Room> {
        let room = Room::create(details, admin_profile)?;
        let saved = store.create(&room).await?;

        tracing::info!(room_id = %saved.id, "room created");
        Ok(saved)
    }

    /// Fetch the room a participant belongs to, by their access code
    pub async fn get_room_by_access_code<S: RoomStore>(
        store: &S,
        access_code: &str,
    ) -> AppResult<Room> {
        store.find_by_access_code(access_code).await?.ok_or_else(|| {
            AppError::NotFound("Room for such access code not found.".to_string())
        })
    }

    /// Join a room via its invitation code.
    ///
    /// Returns the saved room and the id of the freshly added participant;
    /// the participant (with their access code) can be read back from the
    /// returned room.
    pub async fn join_room<S: RoomStore>(
        store: &S,
        invitation_code: &str,
        profile: ParticipantProfile,
    ) -> AppResult<(Room, Participant)> {
        let mut room = store
            .find_by_invitation_code(invitation_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Room with such invitation code not found.".to_string())
            })?;

        let participant = room.add_participant(profile, false)?;
        let saved = store.update(&room).await?;

        tracing::info!(
            room_id = %saved.id,
            participant_id = %participant.id,
            "participant joined room"
        );
        Ok((saved, participant))
    }

    /// Remove a participant on behalf of the admin holding `access_code`.
    ///
    /// The actor checks are sequenced as independent rules with distinct
    /// messages; the aggregate re-checks membership and lifecycle state
    /// defensively before mutating.
    pub async fn delete_participant<S: RoomStore>(
        store: &S,
        access_code: &str,
        participant_id: Uuid,
    ) -> AppResult<Room> {
        let target = store
            .find_participant_by_id(participant_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Participant with such id not found.".to_string()))?;

        let acting = store
            .find_participant_by_access_code(access_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Participant with such access code not found.".to_string())
            })?;

        if !acting.is_admin {
            return Err(AppError::Forbidden(
                "Participant with such access code is not an admin.".to_string(),
            ));
        }
        if acting.id == target.id {
            return Err(AppError::BadRequest(
                "Participant with such access code and such id is the same participant."
                    .to_string(),
            ));
        }
        if acting.room_id != target.room_id {
            return Err(AppError::BadRequest(
                "Participants with such access code and such id are not in the same room."
                    .to_string(),
            ));
        }

        let mut room = store.find_by_access_code(access_code).await?.ok_or_else(|| {
            AppError::NotFound("Room for such access code not found.".to_string())
        })?;

        room.remove_participant(acting.id, target.id)?;
        let saved = store.update(&room).await?;

        tracing::info!(
            room_id = %saved.id,
            participant_id = %participant_id,
            "participant removed from room"
        );
        Ok(saved)
    }

    /// Draw names in the room of the admin holding `access_code`
    pub async fn draw_names<S: RoomStore>(store: &S, access_code: &str) -> AppResult<Room> {
        let acting = store
            .find_participant_by_access_code(access_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Participant with such access code not found.".to_string())
            })?;

        if !acting.is_admin {
            return Err(AppError::Forbidden(
                "Only an admin may draw names.".to_string(),
            ));
        }

        let mut room = store.find_by_access_code(access_code).await?.ok_or_else(|| {
            AppError::NotFound("Room for such access code not found.".to_string())
        })?;

        room.draw()?;
        let saved = store.update(&room).await?;

        tracing::info!(
            room_id = %saved.id,
            participants = saved.participants.len(),
            "names drawn"
        );
        Ok(saved)
    }

    /// Close the room of the admin holding `access_code`
    pub async fn close_room<S: RoomStore>(store: &S, access_code: &str) -> AppResult<Room> {
        let acting = store
            .find_participant_by_access_code(access_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Participant with such access code not found.".to_string())
            })?;

        if !acting.is_admin {
            return Err(AppError::Forbidden(
                "Only an admin may close the room.".to_string(),
            ));
        }

        let mut room = store.find_by_access_code(access_code).await?.ok_or_else(|| {
            AppError::NotFound("Room for such access code not found.".to_string())
        })?;

        room.close()?;
        let saved = store.update(&room).await?;

        tracing::info!(room_id = %saved.id, "room closed");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::db::repositories::MockRoomStore;
    use crate::models::RoomState;

    fn profile(first: &str) -> ParticipantProfile {
        ParticipantProfile {
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            ..Default::default()
        }
    }

    fn details(name: &str) -> RoomDetails {
        RoomDetails {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// A room with one admin and `extra` regular members
    fn sample_room(extra: usize) -> Room {
        let mut room = Room::create(details("Office Party"), profile("Admin")).unwrap();
        for i in 0..extra {
            room.add_participant(profile(&format!("Member{i}")), false)
                .unwrap();
        }
        room
    }

    #[tokio::test]
    async fn test_create_room_persists_aggregate() {
        let mut store = MockRoomStore::new();
        store
            .expect_create()
            .times(1)
            .returning(|room| Ok(room.clone()));

        let room = RoomService::create_room(&store, details("Office Party"), profile("Admin"))
            .await
            .unwrap();

        assert_eq!(room.state, RoomState::Open);
        assert_eq!(room.participants.len(), 1);
        assert!(room.participants[0].is_admin);
    }

    #[tokio::test]
    async fn test_create_room_rejects_empty_name_without_saving() {
        let mut store = MockRoomStore::new();
        store.expect_create().times(0);

        let result = RoomService::create_room(&store, details(""), profile("Admin")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_join_room_unknown_invitation_code() {
        let mut store = MockRoomStore::new();
        store
            .expect_find_by_invitation_code()
            .returning(|_| Ok(None));
        store.expect_update().times(0);

        let result = RoomService::join_room(&store, "nope", profile("Joiner")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_join_room_adds_regular_member() {
        let room = sample_room(0);
        let invitation_code = room.invitation_code.clone();

        let mut store = MockRoomStore::new();
        {
            let room = room.clone();
            store
                .expect_find_by_invitation_code()
                .withf(move |code| code == invitation_code)
                .returning(move |_| Ok(Some(room.clone())));
        }
        store
            .expect_update()
            .times(1)
            .withf(|room| room.participants.len() == 2)
            .returning(|room| Ok(room.clone()));

        let (saved, participant) = RoomService::join_room(&store, &room.invitation_code, profile("Joiner"))
            .await
            .unwrap();

        assert_eq!(saved.participants.len(), 2);
        assert!(!participant.is_admin);
        assert_eq!(participant.access_code.len(), 32);
    }

    #[tokio::test]
    async fn test_join_room_refused_after_draw() {
        let mut room = sample_room(2);
        room.draw().unwrap();

        let mut store = MockRoomStore::new();
        {
            let room = room.clone();
            store
                .expect_find_by_invitation_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store.expect_update().times(0);

        let result = RoomService::join_room(&store, &room.invitation_code, profile("Late")).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_target_not_found() {
        let mut store = MockRoomStore::new();
        store.expect_find_participant_by_id().returning(|_| Ok(None));

        let result = RoomService::delete_participant(&store, "code", Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_actor_not_found() {
        let room = sample_room(1);
        let target = room.participants[1].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(|_| Ok(None));

        let result = RoomService::delete_participant(&store, "code", room.participants[1].id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_actor_not_admin() {
        let room = sample_room(2);
        let target = room.participants[1].clone();
        let acting = room.participants[2].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(acting.clone())));
        store.expect_update().times(0);

        let result = RoomService::delete_participant(
            &store,
            &room.participants[2].access_code,
            room.participants[1].id,
        )
        .await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_self_target_refused() {
        let room = sample_room(1);
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        {
            let admin = admin.clone();
            store
                .expect_find_participant_by_id()
                .returning(move |_| Ok(Some(admin.clone())));
        }
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        store.expect_update().times(0);

        let result = RoomService::delete_participant(
            &store,
            &room.participants[0].access_code,
            room.participants[0].id,
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_across_rooms_refused() {
        let room = sample_room(0);
        let other_room = sample_room(1);
        let admin = room.participants[0].clone();
        let stranger = other_room.participants[1].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(stranger.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        store.expect_update().times(0);

        let result = RoomService::delete_participant(
            &store,
            &room.participants[0].access_code,
            other_room.participants[1].id,
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_room_already_closed() {
        let mut room = sample_room(1);
        room.close().unwrap();
        let admin = room.participants[0].clone();
        let target = room.participants[1].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store.expect_update().times(0);

        let result = RoomService::delete_participant(
            &store,
            &room.participants[0].access_code,
            room.participants[1].id,
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_after_draw_refused() {
        let mut room = sample_room(3);
        room.draw().unwrap();
        let admin = room.participants[0].clone();
        let target = room.participants[1].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store.expect_update().times(0);

        let result = RoomService::delete_participant(
            &store,
            &room.participants[0].access_code,
            room.participants[1].id,
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_delete_participant_success() {
        let room = sample_room(2);
        let admin = room.participants[0].clone();
        let target = room.participants[1].clone();
        let target_id = target.id;

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_id()
            .returning(move |_| Ok(Some(target.clone())));
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store
            .expect_update()
            .times(1)
            .withf(move |room| room.participants.iter().all(|p| p.id != target_id))
            .returning(|room| Ok(room.clone()));

        let saved = RoomService::delete_participant(
            &store,
            &room.participants[0].access_code,
            target_id,
        )
        .await
        .unwrap();

        assert_eq!(saved.participants.len(), 2);
        assert!(saved.participant(target_id).is_none());
    }

    #[tokio::test]
    async fn test_draw_names_requires_admin() {
        let room = sample_room(2);
        let member = room.participants[1].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(member.clone())));
        store.expect_update().times(0);

        let result =
            RoomService::draw_names(&store, &room.participants[1].access_code).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_draw_names_success() {
        let room = sample_room(3);
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store
            .expect_update()
            .times(1)
            .withf(|room| {
                room.state == RoomState::Drawn
                    && room
                        .participants
                        .iter()
                        .all(|p| p.recipient_id.is_some_and(|r| r != p.id))
            })
            .returning(|room| Ok(room.clone()));

        let saved = RoomService::draw_names(&store, &room.participants[0].access_code)
            .await
            .unwrap();
        assert_eq!(saved.state, RoomState::Drawn);
    }

    #[tokio::test]
    async fn test_draw_names_below_minimum_refused() {
        let room = sample_room(1);
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store.expect_update().times(0);

        let result = RoomService::draw_names(&store, &room.participants[0].access_code).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_draw_names_surfaces_save_conflict() {
        let room = sample_room(3);
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store
            .expect_update()
            .returning(|_| Err(AppError::Conflict("Room was modified concurrently.".to_string())));

        // No auto-retry: the conflict is surfaced to the caller as-is
        let result = RoomService::draw_names(&store, &room.participants[0].access_code).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_close_room_success() {
        let room = sample_room(1);
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store
            .expect_update()
            .times(1)
            .withf(|room| room.state == RoomState::Closed && room.closed_at.is_some())
            .returning(|room| Ok(room.clone()));

        let saved = RoomService::close_room(&store, &room.participants[0].access_code)
            .await
            .unwrap();
        assert_eq!(saved.state, RoomState::Closed);
    }

    #[tokio::test]
    async fn test_close_room_twice_refused() {
        let mut room = sample_room(0);
        room.close().unwrap();
        let admin = room.participants[0].clone();

        let mut store = MockRoomStore::new();
        store
            .expect_find_participant_by_access_code()
            .returning(move |_| Ok(Some(admin.clone())));
        {
            let room = room.clone();
            store
                .expect_find_by_access_code()
                .returning(move |_| Ok(Some(room.clone())));
        }
        store.expect_update().times(0);

        let result = RoomService::close_room(&store, &room.participants[0].access_code).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_room_by_access_code_not_found() {
        let mut store = MockRoomStore::new();
        store.expect_find_by_access_code().returning(|_| Ok(None));

        let result = RoomService::get_room_by_access_code(&store, "nope").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
