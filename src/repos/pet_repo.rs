/*
 * Responsibility
 * - pets table access behind the PetRepository trait
 * - find_all: optional tag filter (IN list) and optional LIMIT, ordered by id
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub tag: Option<String>,
}

#[async_trait]
pub trait PetRepository: Send + Sync {
    async fn create(&self, name: &str, tag: Option<&str>) -> RepoResult<Pet>;

    async fn find_by_id(&self, id: i64) -> RepoResult<Pet>;

    /// An empty `tags` slice means "no filter".
    async fn find_all(&self, tags: &[String], limit: Option<i32>) -> RepoResult<Vec<Pet>>;

    async fn delete(&self, id: i64) -> RepoResult<()>;
}

#[derive(Clone, Debug)]
pub struct PgPetRepo {
    pool: PgPool,
}

impl PgPetRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn find_all_query(tags: &[String], limit: Option<i32>) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("SELECT id, name, tag FROM pets");

    if !tags.is_empty() {
        query.push(" WHERE tag IN (");
        let mut separated = query.separated(", ");
        for tag in tags {
            separated.push_bind(tag.clone());
        }
        separated.push_unseparated(")");
    }

    query.push(" ORDER BY id");

    if let Some(limit) = limit {
        query.push(" LIMIT ").push_bind(i64::from(limit));
    }

    query
}

#[async_trait]
impl PetRepository for PgPetRepo {
    async fn create(&self, name: &str, tag: Option<&str>) -> RepoResult<Pet> {
        let row = sqlx::query_as::<_, Pet>(
            r#"
            INSERT INTO pets (name, tag)
            VALUES ($1, $2)
            RETURNING id, name, tag
            "#,
        )
        .bind(name)
        .bind(tag)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn find_by_id(&self, id: i64) -> RepoResult<Pet> {
        sqlx::query_as::<_, Pet>(
            r#"
            SELECT id, name, tag
            FROM pets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepoError::NotFound)
    }

    async fn find_all(&self, tags: &[String], limit: Option<i32>) -> RepoResult<Vec<Pet>> {
        let rows = find_all_query(tags, limit)
            .build_query_as::<Pet>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn delete(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM pets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
