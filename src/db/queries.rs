//! Database queries for the homestay catalog

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::Homestay;

/// Get a published homestay by id
pub async fn get_published_homestay(pool: &PgPool, id: Uuid) -> Result<Homestay> {
    let homestay = sqlx::query_as::<_, Homestay>(
        r#"
        SELECT
            id,
            slug,
            title,
            base_price,
            currency,
            max_guests
        FROM homestays
        WHERE id = $1
          AND status = 'published'
          AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::NotFound("homestay"))?;

    Ok(homestay)
}

/// Get recently updated published homestays (cache warming)
pub async fn list_published_homestays(pool: &PgPool, limit: i64) -> Result<Vec<Homestay>> {
    let homestays = sqlx::query_as::<_, Homestay>(
        r#"
        SELECT
            id,
            slug,
            title,
            base_price,
            currency,
            max_guests
        FROM homestays
        WHERE status = 'published'
          AND deleted_at IS NULL
        ORDER BY updated_at DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(homestays)
}
