//! Room repository (Postgres)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    db::repositories::RoomStore,
    error::{AppError, AppResult},
    models::{Participant, Room, RoomState},
};

/// Postgres-backed implementation of the `RoomStore` contract
#[derive(Clone)]
pub struct PgRoomStore {
    pool: PgPool,
}

/// Row shape of the `rooms` table; participants are loaded separately
#[derive(Debug, sqlx::FromRow)]
struct RoomRow {
    id: Uuid,
    invitation_code: String,
    name: String,
    gift_budget: Option<String>,
    gift_exchange_date: Option<DateTime<Utc>>,
    state: String,
    version: i64,
    created_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
}

impl PgRoomStore {
    /// Create a new store over a connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Assemble the aggregate from its room row and participant rows
    async fn hydrate(&self, row: RoomRow) -> AppResult<Room> {
        let participants = sqlx::query_as::<_, Participant>(
            r#"SELECT * FROM participants WHERE room_id = $1 ORDER BY created_at"#,
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        let state: RoomState = row.state.parse().map_err(AppError::Database)?;

        Ok(Room {
            id: row.id,
            invitation_code: row.invitation_code,
            name: row.name,
            gift_budget: row.gift_budget,
            gift_exchange_date: row.gift_exchange_date,
            state,
            version: row.version,
            created_at: row.created_at,
            closed_at: row.closed_at,
            participants,
        })
    }

    async fn find_room(&self, query: &str, bind: &str) -> AppResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(query)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn upsert_participant(
        tx: &mut Transaction<'_, Postgres>,
        participant: &Participant,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO participants
                (id, room_id, first_name, last_name, phone, email, delivery_info,
                 wishlist, is_admin, access_code, recipient_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                phone = EXCLUDED.phone,
                email = EXCLUDED.email,
                delivery_info = EXCLUDED.delivery_info,
                wishlist = EXCLUDED.wishlist,
                recipient_id = EXCLUDED.recipient_id
            "#,
        )
        .bind(participant.id)
        .bind(participant.room_id)
        .bind(&participant.first_name)
        .bind(&participant.last_name)
        .bind(&participant.phone)
        .bind(&participant.email)
        .bind(&participant.delivery_info)
        .bind(&participant.wishlist)
        .bind(participant.is_admin)
        .bind(&participant.access_code)
        .bind(participant.recipient_id)
        .bind(participant.created_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RoomStore for PgRoomStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Room>> {
        let row = sqlx::query_as::<_, RoomRow>(r#"SELECT * FROM rooms WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_invitation_code(&self, code: &str) -> AppResult<Option<Room>> {
        self.find_room(r#"SELECT * FROM rooms WHERE invitation_code = $1"#, code)
            .await
    }

    async fn find_by_access_code(&self, code: &str) -> AppResult<Option<Room>> {
        self.find_room(
            r#"
            SELECT r.* FROM rooms r
            JOIN participants p ON p.room_id = r.id
            WHERE p.access_code = $1
            "#,
            code,
        )
        .await
    }

    async fn find_participant_by_id(&self, id: Uuid) -> AppResult<Option<Participant>> {
        let participant =
            sqlx::query_as::<_, Participant>(r#"SELECT * FROM participants WHERE id = $1"#)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(participant)
    }

    async fn find_participant_by_access_code(
        &self,
        code: &str,
    ) -> AppResult<Option<Participant>> {
        let participant = sqlx::query_as::<_, Participant>(
            r#"SELECT * FROM participants WHERE access_code = $1"#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(participant)
    }

    async fn create(&self, room: &Room) -> AppResult<Room> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO rooms
                (id, invitation_code, name, gift_budget, gift_exchange_date,
                 state, version, created_at, closed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(room.id)
        .bind(&room.invitation_code)
        .bind(&room.name)
        .bind(&room.gift_budget)
        .bind(room.gift_exchange_date)
        .bind(room.state.as_str())
        .bind(room.version)
        .bind(room.created_at)
        .bind(room.closed_at)
        .execute(&mut *tx)
        .await?;

        for participant in &room.participants {
            Self::upsert_participant(&mut tx, participant).await?;
        }

        tx.commit().await?;

        self.find_by_id(room.id)
            .await?
            .ok_or_else(|| AppError::Database("Room vanished after insert".to_string()))
    }

    async fn update(&self, room: &Room) -> AppResult<Room> {
        let mut tx = self.pool.begin().await?;

        // Version guard: a save against a stale snapshot touches zero rows
        let updated = sqlx::query(
            r#"
            UPDATE rooms
            SET name = $2,
                gift_budget = $3,
                gift_exchange_date = $4,
                state = $5,
                closed_at = $6,
                version = version + 1
            WHERE id = $1 AND version = $7
            "#,
        )
        .bind(room.id)
        .bind(&room.name)
        .bind(&room.gift_budget)
        .bind(room.gift_exchange_date)
        .bind(room.state.as_str())
        .bind(room.closed_at)
        .bind(room.version)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Room was modified concurrently.".to_string(),
            ));
        }

        let kept_ids: Vec<Uuid> = room.participants.iter().map(|p| p.id).collect();
        sqlx::query(r#"DELETE FROM participants WHERE room_id = $1 AND id <> ALL($2)"#)
            .bind(room.id)
            .bind(&kept_ids)
            .execute(&mut *tx)
            .await?;

        for participant in &room.participants {
            Self::upsert_participant(&mut tx, participant).await?;
        }

        tx.commit().await?;

        self.find_by_id(room.id)
            .await?
            .ok_or_else(|| AppError::Database("Room vanished after update".to_string()))
    }
}
