//! SQLite roadmap store implementation.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use entities::{ColorType, LikeToggle, Roadmap, RoadmapCircle, RoadmapLike, User};
use sqlx::{sqlite::SqlitePoolOptions, FromRow, Pool, Sqlite};
use uuid::Uuid;

use crate::{RoadmapStore, RoadmapStoreError, RoadmapStoreResult};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    social_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS roadmaps (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    title TEXT NOT NULL,
    view INTEGER,
    summary TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_roadmaps_view ON roadmaps (view);

CREATE TABLE IF NOT EXISTS roadmap_circles (
    id TEXT PRIMARY KEY,
    roadmap_id TEXT NOT NULL REFERENCES roadmaps(id),
    title TEXT NOT NULL,
    date TEXT NOT NULL,
    content TEXT NOT NULL,
    level INTEGER NOT NULL,
    color_type TEXT NOT NULL,
    position INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_roadmap_circles_roadmap ON roadmap_circles (roadmap_id);

CREATE TABLE IF NOT EXISTS roadmap_likes (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL REFERENCES users(id),
    roadmap_id TEXT NOT NULL REFERENCES roadmaps(id),
    created_at TEXT NOT NULL,
    UNIQUE (user_id, roadmap_id)
);
"#;

fn parse_uuid(table: &'static str, value: &str) -> RoadmapStoreResult<Uuid> {
    value
        .parse()
        .map_err(|_| RoadmapStoreError::corrupt(table, format!("invalid uuid {value}")))
}

// Fixed-width so that lexical order on the column matches chronological order.
fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn unique_or(entity_type: &'static str, id: Uuid, err: sqlx::Error) -> RoadmapStoreError {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => {
            RoadmapStoreError::already_exists(entity_type, id.to_string())
        }
        other => other.into(),
    }
}

/// Database row for User
#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    social_id: String,
    name: String,
    created_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = RoadmapStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_uuid("users", &row.id)?,
            social_id: row.social_id,
            name: row.name,
            created_at: parse_timestamp(&row.created_at),
        })
    }
}

/// Database row for Roadmap
#[derive(Debug, FromRow)]
struct RoadmapRow {
    id: String,
    user_id: String,
    title: String,
    view: Option<i64>,
    summary: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<RoadmapRow> for Roadmap {
    type Error = RoadmapStoreError;

    fn try_from(row: RoadmapRow) -> Result<Self, Self::Error> {
        Ok(Roadmap {
            id: parse_uuid("roadmaps", &row.id)?,
            user_id: parse_uuid("roadmaps", &row.user_id)?,
            title: row.title,
            view: row.view,
            summary: row.summary,
            created_at: parse_timestamp(&row.created_at),
            updated_at: parse_timestamp(&row.updated_at),
        })
    }
}

/// Database row for RoadmapCircle
#[derive(Debug, FromRow)]
struct CircleRow {
    id: String,
    roadmap_id: String,
    title: String,
    date: String,
    content: String,
    level: i64,
    color_type: String,
    position: i64,
}

impl TryFrom<CircleRow> for RoadmapCircle {
    type Error = RoadmapStoreError;

    fn try_from(row: CircleRow) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            RoadmapStoreError::corrupt("roadmap_circles", format!("invalid date: {e}"))
        })?;
        let color_type = ColorType::parse(&row.color_type).ok_or_else(|| {
            RoadmapStoreError::corrupt(
                "roadmap_circles",
                format!("unknown color {}", row.color_type),
            )
        })?;

        Ok(RoadmapCircle {
            id: parse_uuid("roadmap_circles", &row.id)?,
            roadmap_id: parse_uuid("roadmap_circles", &row.roadmap_id)?,
            title: row.title,
            date,
            content: row.content,
            level: row.level.max(0) as u32,
            color_type,
            position: row.position.max(0) as u32,
        })
    }
}

/// Database row for RoadmapLike
#[derive(Debug, FromRow)]
struct LikeRow {
    id: String,
    user_id: String,
    roadmap_id: String,
    created_at: String,
}

impl TryFrom<LikeRow> for RoadmapLike {
    type Error = RoadmapStoreError;

    fn try_from(row: LikeRow) -> Result<Self, Self::Error> {
        Ok(RoadmapLike {
            id: parse_uuid("roadmap_likes", &row.id)?,
            user_id: parse_uuid("roadmap_likes", &row.user_id)?,
            roadmap_id: parse_uuid("roadmap_likes", &row.roadmap_id)?,
            created_at: parse_timestamp(&row.created_at),
        })
    }
}

fn collect_rows<R, T>(rows: Vec<R>) -> RoadmapStoreResult<Vec<T>>
where
    T: TryFrom<R, Error = RoadmapStoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

/// SQLite-backed roadmap store.
#[derive(Debug, Clone)]
pub struct SqliteRoadmapStore {
    pool: Pool<Sqlite>,
}

impl SqliteRoadmapStore {
    /// Connects to `database_url` and runs migrations.
    pub async fn connect(database_url: &str) -> RoadmapStoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Wraps an existing pool. Migrations must be run by the caller.
    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Creates the tables if they do not exist.
    pub async fn run_migrations(&self) -> RoadmapStoreResult<()> {
        sqlx::raw_sql(SCHEMA_SQL).execute(&self.pool).await?;
        tracing::debug!("Roadmap store schema is up to date");
        Ok(())
    }
}

#[async_trait]
impl RoadmapStore for SqliteRoadmapStore {
    async fn create_user(&self, user: User) -> RoadmapStoreResult<User> {
        let result = sqlx::query(
            "INSERT INTO users (id, social_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.social_id)
        .bind(&user.name)
        .bind(format_timestamp(&user.created_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RoadmapStoreError::already_exists("User", user.social_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_user(&self, id: Uuid) -> RoadmapStoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn get_user_by_social_id(&self, social_id: &str) -> RoadmapStoreResult<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE social_id = ?")
            .bind(social_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(User::try_from).transpose()
    }

    async fn create_roadmap_with_circles(
        &self,
        roadmap: Roadmap,
        circles: Vec<RoadmapCircle>,
    ) -> RoadmapStoreResult<(Roadmap, Vec<RoadmapCircle>)> {
        if let Some(stray) = circles.iter().find(|c| c.roadmap_id != roadmap.id) {
            return Err(RoadmapStoreError::not_found(
                "Roadmap",
                stray.roadmap_id.to_string(),
            ));
        }

        // Dropping the transaction on an early return rolls everything back.
        let mut tx = self.pool.begin().await?;

        let owners: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(roadmap.user_id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        if owners == 0 {
            return Err(RoadmapStoreError::not_found(
                "User",
                roadmap.user_id.to_string(),
            ));
        }

        sqlx::query(
            "INSERT INTO roadmaps (id, user_id, title, view, summary, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(roadmap.id.to_string())
        .bind(roadmap.user_id.to_string())
        .bind(&roadmap.title)
        .bind(roadmap.view)
        .bind(&roadmap.summary)
        .bind(format_timestamp(&roadmap.created_at))
        .bind(format_timestamp(&roadmap.updated_at))
        .execute(&mut *tx)
        .await
        .map_err(|e| unique_or("Roadmap", roadmap.id, e))?;

        for circle in &circles {
            sqlx::query(
                "INSERT INTO roadmap_circles \
                 (id, roadmap_id, title, date, content, level, color_type, position) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(circle.id.to_string())
            .bind(circle.roadmap_id.to_string())
            .bind(&circle.title)
            .bind(circle.date.format("%Y-%m-%d").to_string())
            .bind(&circle.content)
            .bind(i64::from(circle.level))
            .bind(circle.color_type.as_str())
            .bind(i64::from(circle.position))
            .execute(&mut *tx)
            .await
            .map_err(|e| unique_or("RoadmapCircle", circle.id, e))?;
        }

        tx.commit().await?;
        Ok((roadmap, circles))
    }

    async fn get_roadmap(&self, id: Uuid) -> RoadmapStoreResult<Option<Roadmap>> {
        let row: Option<RoadmapRow> = sqlx::query_as("SELECT * FROM roadmaps WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(Roadmap::try_from).transpose()
    }

    async fn list_roadmaps_by_view_desc(&self) -> RoadmapStoreResult<Vec<Roadmap>> {
        let rows: Vec<RoadmapRow> = sqlx::query_as(
            "SELECT * FROM roadmaps ORDER BY COALESCE(view, 0) DESC, created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        collect_rows(rows)
    }

    async fn search_roadmaps(&self, keyword: &str) -> RoadmapStoreResult<Vec<Roadmap>> {
        // instr() is case-sensitive, unlike LIKE.
        let rows: Vec<RoadmapRow> = sqlx::query_as(
            "SELECT * FROM roadmaps \
             WHERE instr(title, ?1) > 0 OR instr(COALESCE(summary, ''), ?1) > 0 OR ?1 = ''",
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await?;
        collect_rows(rows)
    }

    async fn increment_view(&self, id: Uuid) -> RoadmapStoreResult<Roadmap> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE roadmaps SET view = COALESCE(view, 0) + 1, updated_at = ? WHERE id = ?",
        )
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RoadmapStoreError::not_found("Roadmap", id.to_string()));
        }

        let row: RoadmapRow = sqlx::query_as("SELECT * FROM roadmaps WHERE id = ?")
            .bind(id.to_string())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Roadmap::try_from(row)
    }

    async fn update_summary_if_absent(&self, id: Uuid, summary: &str) -> RoadmapStoreResult<bool> {
        let result = sqlx::query(
            "UPDATE roadmaps SET summary = ?, updated_at = ? WHERE id = ? AND summary IS NULL",
        )
        .bind(summary)
        .bind(format_timestamp(&Utc::now()))
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_circles_by_roadmap(
        &self,
        roadmap_id: Uuid,
    ) -> RoadmapStoreResult<Vec<RoadmapCircle>> {
        let rows: Vec<CircleRow> = sqlx::query_as(
            "SELECT * FROM roadmap_circles WHERE roadmap_id = ? ORDER BY position ASC",
        )
        .bind(roadmap_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        collect_rows(rows)
    }

    async fn get_like(
        &self,
        roadmap_id: Uuid,
        user_id: Uuid,
    ) -> RoadmapStoreResult<Option<RoadmapLike>> {
        let row: Option<LikeRow> = sqlx::query_as(
            "SELECT * FROM roadmap_likes WHERE roadmap_id = ? AND user_id = ?",
        )
        .bind(roadmap_id.to_string())
        .bind(user_id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(RoadmapLike::try_from).transpose()
    }

    async fn count_likes(&self, roadmap_id: Uuid) -> RoadmapStoreResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM roadmap_likes WHERE roadmap_id = ?")
                .bind(roadmap_id.to_string())
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }

    async fn toggle_like(&self, roadmap_id: Uuid, user_id: Uuid) -> RoadmapStoreResult<LikeToggle> {
        let mut tx = self.pool.begin().await?;

        let deleted = sqlx::query("DELETE FROM roadmap_likes WHERE roadmap_id = ? AND user_id = ?")
            .bind(roadmap_id.to_string())
            .bind(user_id.to_string())
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() > 0 {
            tx.commit().await?;
            return Ok(LikeToggle::Unliked);
        }

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        if users == 0 {
            return Err(RoadmapStoreError::not_found("User", user_id.to_string()));
        }

        let roadmaps: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roadmaps WHERE id = ?")
            .bind(roadmap_id.to_string())
            .fetch_one(&mut *tx)
            .await?;
        if roadmaps == 0 {
            return Err(RoadmapStoreError::not_found(
                "Roadmap",
                roadmap_id.to_string(),
            ));
        }

        let like = RoadmapLike::new(user_id, roadmap_id);
        sqlx::query(
            "INSERT INTO roadmap_likes (id, user_id, roadmap_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(like.id.to_string())
        .bind(like.user_id.to_string())
        .bind(like.roadmap_id.to_string())
        .bind(format_timestamp(&like.created_at))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(LikeToggle::Liked)
    }

    async fn delete_like(&self, id: Uuid) -> RoadmapStoreResult<()> {
        let result = sqlx::query("DELETE FROM roadmap_likes WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RoadmapStoreError::not_found("RoadmapLike", id.to_string()));
        }
        Ok(())
    }
}
