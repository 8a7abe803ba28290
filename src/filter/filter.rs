use serde_json::Value;

use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{is_identifier, quote, FilterData, FilterOrderInfo, SqlResult};

/// Parameterized SELECT and COUNT statements over a single table.
pub struct Filter {
    table: String,
    where_data: Value,
    order: Vec<FilterOrderInfo>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Filter {
    pub fn new(table: impl Into<String>) -> Result<Self, FilterError> {
        let table = table.into();
        if !is_identifier(&table) {
            return Err(FilterError::InvalidIdentifier(table));
        }
        Ok(Self { table, where_data: Value::Null, order: Vec::new(), limit: None, offset: None })
    }

    pub fn assign(&mut self, data: FilterData) -> Result<&mut Self, FilterError> {
        if let Some(where_clause) = data.where_clause {
            self.where_clause(where_clause)?;
        }
        if let Some(order) = data.order {
            self.order(&order)?;
        }
        self.limit = data.limit;
        self.offset = data.offset;
        Ok(self)
    }

    pub fn where_clause(&mut self, conditions: Value) -> Result<&mut Self, FilterError> {
        FilterWhere::validate(&conditions)?;
        self.where_data = conditions;
        Ok(self)
    }

    pub fn order(&mut self, terms: &str) -> Result<&mut Self, FilterError> {
        self.order = FilterOrder::parse(terms)?;
        Ok(self)
    }

    pub fn to_sql(&self) -> Result<SqlResult, FilterError> {
        let (predicate, params) = FilterWhere::generate(&self.where_data, 0)?;
        let mut query = format!("SELECT * FROM {} WHERE {}", quote(&self.table), predicate);
        let order = FilterOrder::generate(&self.order);
        if !order.is_empty() {
            query.push(' ');
            query.push_str(&order);
        }
        if let Some(limit) = self.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            query.push_str(&format!(" OFFSET {}", offset));
        }
        Ok(SqlResult { query, params })
    }

    /// Row count for the where-document; ordering and window are ignored.
    pub fn to_count_sql(&self) -> Result<SqlResult, FilterError> {
        let (predicate, params) = FilterWhere::generate(&self.where_data, 0)?;
        Ok(SqlResult {
            query: format!("SELECT COUNT(*) AS count FROM {} WHERE {}", quote(&self.table), predicate),
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_paged_select() {
        let mut filter = Filter::new("blogs").unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({ "status": "published" })),
                order: Some("created_at desc, id desc".into()),
                limit: Some(10),
                offset: Some(20),
            })
            .unwrap();
        let sql = filter.to_sql().unwrap();
        assert_eq!(
            sql.query,
            "SELECT * FROM \"blogs\" WHERE \"status\" = $1 ORDER BY \"created_at\" DESC, \"id\" DESC LIMIT 10 OFFSET 20"
        );
        assert_eq!(sql.params, vec![json!("published")]);
    }

    #[test]
    fn count_ignores_order_and_window() {
        let mut filter = Filter::new("blogs").unwrap();
        filter
            .assign(FilterData {
                where_clause: Some(json!({ "instructor_id": "i1" })),
                order: Some("created_at desc".into()),
                limit: Some(5),
                offset: None,
            })
            .unwrap();
        let sql = filter.to_count_sql().unwrap();
        assert_eq!(sql.query, "SELECT COUNT(*) AS count FROM \"blogs\" WHERE \"instructor_id\" = $1");
    }

    #[test]
    fn unfiltered_select_has_trivial_predicate() {
        let sql = Filter::new("courses").unwrap().to_sql().unwrap();
        assert_eq!(sql.query, "SELECT * FROM \"courses\" WHERE 1=1");
        assert!(Filter::new("blogs; --").is_err());
    }
}
