use std::marker::PhantomData;

use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::query_builder::QueryBuilder;
use crate::filter::FilterData;
use crate::models::PageRequest;

/// Filtered, ordered reads against a single table.
pub struct Repository<T> {
    table: &'static str,
    pool: PgPool,
    rows: PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table: &'static str, pool: PgPool) -> Self {
        Self { table, pool, rows: PhantomData }
    }

    /// Every matching row, or the first `limit` of them.
    pub async fn list(&self, where_clause: Value, order: &str, limit: Option<u32>) -> Result<Vec<T>, DatabaseError> {
        let data = FilterData {
            where_clause: Some(where_clause),
            order: Some(order.to_string()),
            limit: limit.map(u64::from),
            offset: None,
        };
        QueryBuilder::<T>::new(self.table, data)?.fetch_all(&self.pool).await
    }

    /// One page of matching rows plus the total number of matches.
    pub async fn page(
        &self,
        where_clause: Value,
        order: &str,
        page: PageRequest,
    ) -> Result<(Vec<T>, u64), DatabaseError> {
        let builder = QueryBuilder::<T>::new(
            self.table,
            FilterData {
                where_clause: Some(where_clause),
                order: Some(order.to_string()),
                limit: Some(u64::from(page.limit)),
                offset: Some(page.offset()),
            },
        )?;
        let total = builder.count(&self.pool).await?;
        let rows = builder.fetch_all(&self.pool).await?;
        Ok((rows, total))
    }
}
