use std::marker::PhantomData;

use serde_json::Value;
use sqlx::{postgres::PgRow, FromRow, PgPool, Row};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, FilterData, SqlResult};

/// A where-document operand in the shape it is bound to the statement.
#[derive(Debug, Clone, PartialEq)]
enum SqlParam {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Json(Value),
}

impl From<&Value> for SqlParam {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => SqlParam::Null,
            Value::Bool(b) => SqlParam::Bool(*b),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => SqlParam::Int(i),
                (None, Some(f)) => SqlParam::Float(f),
                (None, None) => SqlParam::Text(n.to_string()),
            },
            Value::String(s) => SqlParam::Text(s.clone()),
            other => SqlParam::Json(other.clone()),
        }
    }
}

// Query and QueryAs share `bind` by name only, so binding goes through a macro
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                SqlParam::Null => query.bind(None::<String>),
                SqlParam::Bool(b) => query.bind(b),
                SqlParam::Int(i) => query.bind(i),
                SqlParam::Float(f) => query.bind(f),
                SqlParam::Text(s) => query.bind(s),
                SqlParam::Json(v) => query.bind(sqlx::types::Json(v)),
            };
        }
        query
    }};
}

/// Executes a [`Filter`] against one table, decoding rows as `T`.
pub struct QueryBuilder<T> {
    filter: Filter,
    rows: PhantomData<T>,
}

impl<T> QueryBuilder<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table: &str, data: FilterData) -> Result<Self, DatabaseError> {
        let mut filter = Filter::new(table)?;
        filter.assign(data)?;
        Ok(Self { filter, rows: PhantomData })
    }

    pub async fn fetch_all(&self, pool: &PgPool) -> Result<Vec<T>, DatabaseError> {
        let SqlResult { query, params } = self.filter.to_sql()?;
        tracing::debug!("select: {}", query);
        let rows = bind_params!(sqlx::query_as::<_, T>(&query), to_params(&params))
            .fetch_all(pool)
            .await?;
        Ok(rows)
    }

    pub async fn count(&self, pool: &PgPool) -> Result<u64, DatabaseError> {
        let SqlResult { query, params } = self.filter.to_count_sql()?;
        tracing::debug!("count: {}", query);
        let row = bind_params!(sqlx::query(&query), to_params(&params))
            .fetch_one(pool)
            .await?;
        let count: i64 = row.try_get("count")?;
        Ok(count.max(0) as u64)
    }
}

fn to_params(values: &[Value]) -> Vec<SqlParam> {
    values.iter().map(SqlParam::from).collect()
}
