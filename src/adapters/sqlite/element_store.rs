//! SQLite implementation of the ElementStore.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::domain::errors::DomainResult;
use crate::domain::models::Element;
use crate::domain::ports::ElementStore;

#[derive(Clone)]
pub struct SqliteElementStore {
    pool: SqlitePool,
}

impl SqliteElementStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Number of stored rows.
    pub async fn count(&self) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM elements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ElementRow {
    name: String,
    glyph: String,
    is_new: i32,
}

fn row_to_element(row: ElementRow) -> DomainResult<Element> {
    Element::new(row.name, row.glyph, row.is_new != 0)
}

#[async_trait]
impl ElementStore for SqliteElementStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn load(&self) -> DomainResult<Vec<Element>> {
        let rows: Vec<ElementRow> =
            sqlx::query_as("SELECT name, glyph, is_new FROM elements ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        let elements = rows
            .into_iter()
            .map(row_to_element)
            .collect::<DomainResult<Vec<_>>>()?;
        tracing::debug!(count = elements.len(), "loaded elements from sqlite");
        Ok(elements)
    }

    async fn persist(&self, elements: &[Element]) -> DomainResult<()> {
        if elements.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;
        for element in elements {
            sqlx::query(
                r#"INSERT INTO elements (name, glyph, is_new)
                   VALUES (?, ?, ?)
                   ON CONFLICT(name) DO UPDATE SET
                       glyph = excluded.glyph,
                       is_new = excluded.is_new"#,
            )
            .bind(element.name())
            .bind(element.glyph())
            .bind(i32::from(element.is_new()))
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!(count = elements.len(), "persisted elements to sqlite");
        Ok(())
    }
}
