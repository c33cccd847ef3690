//! PostgreSQL implementation of the asset store.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use stockscan_core::{AssetRecord, AssetStore};

use super::StoreError;

/// PostgreSQL-backed asset store.
///
/// Unflagged assets are paged in ascending id order. Flags are written with
/// `ON CONFLICT DO NOTHING`, so concurrent and repeated writes are harmless.
#[derive(Clone)]
pub struct PostgresAssetStore {
    pool: PgPool,
}

/// Row type for asset queries.
#[derive(FromRow)]
struct AssetRow {
    id: i64,
    media_url: String,
    filename: String,
    title: String,
    alt_text: String,
    description: String,
}

impl From<AssetRow> for AssetRecord {
    fn from(row: AssetRow) -> Self {
        Self {
            id: row.id,
            media_url: row.media_url,
            filename: row.filename,
            title: row.title,
            alt_text: row.alt_text,
            description: row.description,
        }
    }
}

impl PostgresAssetStore {
    /// Connect to the database and run migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        tracing::info!(
            max_connections,
            "Asset store connected and migrations applied"
        );

        Ok(Self { pool })
    }

    /// Create an asset store from an existing pool (for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_unflagged_page(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<AssetRecord>, StoreError> {
        let offset = to_sql_bigint(offset, "offset")?;
        let limit = to_sql_bigint(limit, "limit")?;

        let rows: Vec<AssetRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.media_url, a.filename, a.title, a.alt_text, a.description
            FROM media_assets a
            WHERE NOT EXISTS (
                SELECT 1 FROM asset_safe_flags f WHERE f.asset_id = a.id
            )
            ORDER BY a.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_unflagged_rows(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM media_assets a
            WHERE NOT EXISTS (
                SELECT 1 FROM asset_safe_flags f WHERE f.asset_id = a.id
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn insert_flag(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO asset_safe_flags (asset_id)
            SELECT id FROM media_assets WHERE id = $1
            ON CONFLICT (asset_id) DO NOTHING
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn flagged_rows(&self) -> Result<Vec<AssetRecord>, StoreError> {
        let rows: Vec<AssetRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.media_url, a.filename, a.title, a.alt_text, a.description
            FROM media_assets a
            JOIN asset_safe_flags f ON f.asset_id = a.id
            ORDER BY a.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AssetStore for PostgresAssetStore {
    async fn fetch_unflagged(
        &self,
        offset: u64,
        limit: u64,
    ) -> stockscan_core::Result<Vec<AssetRecord>> {
        Ok(self.fetch_unflagged_page(offset, limit).await?)
    }

    async fn count_unflagged(&self) -> stockscan_core::Result<u64> {
        Ok(self.count_unflagged_rows().await?)
    }

    async fn flag_safe(&self, id: i64) -> stockscan_core::Result<bool> {
        Ok(self.insert_flag(id).await?)
    }

    async fn list_flagged(&self) -> stockscan_core::Result<Vec<AssetRecord>> {
        Ok(self.flagged_rows().await?)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn to_sql_bigint(value: u64, name: &str) -> Result<i64, StoreError> {
    i64::try_from(value)
        .map_err(|_| StoreError::InvalidInput(format!("{name} {value} exceeds BIGINT range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_sql_bigint() {
        assert_eq!(to_sql_bigint(20, "limit").unwrap(), 20);
        assert!(matches!(
            to_sql_bigint(u64::MAX, "offset"),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_row_conversion() {
        let record: AssetRecord = AssetRow {
            id: 7,
            media_url: "https://example.com/a.jpg".to_string(),
            filename: "a.jpg".to_string(),
            title: "A".to_string(),
            alt_text: "alt".to_string(),
            description: String::new(),
        }
        .into();

        assert_eq!(record.id, 7);
        assert_eq!(record.alt_text, "alt");
    }

    /// Ids reserved for the database test so it never touches other rows.
    const TEST_IDS: std::ops::RangeInclusive<i64> = 9_000_001..=9_000_005;

    async fn clear_test_rows(pool: &PgPool) {
        sqlx::query("DELETE FROM media_assets WHERE id BETWEEN $1 AND $2")
            .bind(*TEST_IDS.start())
            .bind(*TEST_IDS.end())
            .execute(pool)
            .await
            .unwrap();
    }

    async fn all_unflagged(store: &PostgresAssetStore) -> Vec<i64> {
        let mut ids = Vec::new();
        let mut offset = 0;
        loop {
            let page = store.fetch_unflagged(offset, 100).await.unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len() as u64;
            ids.extend(page.into_iter().map(|a| a.id));
        }
        ids
    }

    /// Runs against a real database: `DATABASE_URL=... cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_postgres_flags_partition_unflagged_assets() {
        let Ok(url) = std::env::var("DATABASE_URL") else {
            return;
        };
        let store = PostgresAssetStore::connect(&url, 2, 1).await.unwrap();
        clear_test_rows(&store.pool).await;

        let before = store.count_unflagged().await.unwrap();
        for id in TEST_IDS {
            sqlx::query("INSERT INTO media_assets (id, filename) VALUES ($1, $2)")
                .bind(id)
                .bind(format!("shutterstock_{id}.jpg"))
                .execute(&store.pool)
                .await
                .unwrap();
        }
        assert_eq!(store.count_unflagged().await.unwrap(), before + 5);

        let flagged_id = *TEST_IDS.start();
        assert!(store.flag_safe(flagged_id).await.unwrap());
        assert!(!store.flag_safe(flagged_id).await.unwrap());
        // Unknown ids are ignored
        assert!(!store.flag_safe(-42).await.unwrap());

        assert_eq!(store.count_unflagged().await.unwrap(), before + 4);

        let flagged: Vec<i64> = store
            .list_flagged()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.id)
            .filter(|id| TEST_IDS.contains(id))
            .collect();
        assert_eq!(flagged, vec![flagged_id]);

        let unflagged = all_unflagged(&store).await;
        assert!(!unflagged.contains(&flagged_id));
        for id in TEST_IDS.skip(1) {
            assert_eq!(unflagged.iter().filter(|&&u| u == id).count(), 1);
        }
        assert!(unflagged.windows(2).all(|w| w[0] < w[1]));

        clear_test_rows(&store.pool).await;
    }
}
