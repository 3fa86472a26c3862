//! Document repository for CRUD operations.
//!
//! Bodies are stored as JSON text; identifiers and timestamps live in their own
//! columns so a body never carries stale copies of them.

use chrono::Utc;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Document, Entity};

const SELECT_COLUMNS: &str = "SELECT id, body, created_at, updated_at FROM documents";

/// Database repository for all content collections.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List a collection in creation order.
    pub async fn list<E: Entity>(&self) -> Result<Vec<Document<E>>, AppError> {
        let rows = sqlx::query(&format!(
            "{} WHERE collection = ? ORDER BY seq",
            SELECT_COLUMNS
        ))
        .bind(E::COLLECTION)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(document_from_row).collect()
    }

    /// Get a document by ID.
    pub async fn get<E: Entity>(&self, id: &str) -> Result<Option<Document<E>>, AppError> {
        let row = sqlx::query(&format!(
            "{} WHERE collection = ? AND id = ?",
            SELECT_COLUMNS
        ))
        .bind(E::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    /// First document of a collection, used for singletons.
    pub async fn first<E: Entity>(&self) -> Result<Option<Document<E>>, AppError> {
        let row = sqlx::query(&format!(
            "{} WHERE collection = ? ORDER BY seq LIMIT 1",
            SELECT_COLUMNS
        ))
        .bind(E::COLLECTION)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(document_from_row).transpose()
    }

    /// Insert a new document with a server-assigned ID.
    pub async fn insert<E: Entity>(&self, body: &E) -> Result<Document<E>, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let body_json = serde_json::to_string(body)?;

        sqlx::query(
            "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(E::COLLECTION)
        .bind(&id)
        .bind(&body_json)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::debug!(collection = E::COLLECTION, %id, "document created");

        Ok(Document {
            id,
            body: body.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Replace the body of an existing document.
    pub async fn replace<E: Entity>(&self, id: &str, body: &E) -> Result<Document<E>, AppError> {
        let now = Utc::now().to_rfc3339();
        let body_json = serde_json::to_string(body)?;

        let row = sqlx::query(
            "UPDATE documents SET body = ?, updated_at = ? WHERE collection = ? AND id = ? RETURNING created_at",
        )
        .bind(&body_json)
        .bind(&now)
        .bind(E::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<E>(id))?;

        tracing::debug!(collection = E::COLLECTION, %id, "document replaced");

        Ok(Document {
            id: id.to_string(),
            body: body.clone(),
            created_at: row.get("created_at"),
            updated_at: now,
        })
    }

    /// Delete a document, returning what was removed.
    pub async fn delete<E: Entity>(&self, id: &str) -> Result<Document<E>, AppError> {
        let row = sqlx::query(
            "DELETE FROM documents WHERE collection = ? AND id = ? RETURNING id, body, created_at, updated_at",
        )
        .bind(E::COLLECTION)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found::<E>(id))?;

        tracing::debug!(collection = E::COLLECTION, %id, "document deleted");

        document_from_row(&row)
    }

    /// Update the first document of a collection, or create it.
    pub async fn upsert_first<E: Entity>(&self, body: &E) -> Result<Document<E>, AppError> {
        match self.first::<E>().await? {
            Some(existing) => self.replace(&existing.id, body).await,
            None => self.insert(body).await,
        }
    }

    /// Replace a whole collection in one transaction.
    ///
    /// Items that carry an ID keep it; the others get a fresh one.
    pub async fn replace_all<E: Entity>(
        &self,
        items: &[(Option<String>, E)],
    ) -> Result<Vec<Document<E>>, AppError> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now().to_rfc3339();

        sqlx::query("DELETE FROM documents WHERE collection = ?")
            .bind(E::COLLECTION)
            .execute(&mut *tx)
            .await?;

        let mut results = Vec::with_capacity(items.len());
        for (id, body) in items {
            let id = id
                .clone()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let body_json = serde_json::to_string(body)?;

            sqlx::query(
                "INSERT INTO documents (collection, id, body, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(E::COLLECTION)
            .bind(&id)
            .bind(&body_json)
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await?;

            results.push(Document {
                id,
                body: body.clone(),
                created_at: now.clone(),
                updated_at: now.clone(),
            });
        }

        tx.commit().await?;

        tracing::info!(
            collection = E::COLLECTION,
            count = results.len(),
            "collection replaced"
        );

        Ok(results)
    }
}

pub(crate) fn not_found<E: Entity>(id: &str) -> AppError {
    AppError::NotFound(format!("{} {} not found", E::LABEL, id))
}

fn document_from_row<E: Entity>(row: &SqliteRow) -> Result<Document<E>, AppError> {
    let body: String = row.get("body");
    let body = serde_json::from_str(&body).map_err(|e| {
        tracing::error!(collection = E::COLLECTION, "corrupt document body: {}", e);
        AppError::Database(format!("Stored {} is unreadable", E::LABEL))
    })?;

    Ok(Document {
        id: row.get("id"),
        body,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
