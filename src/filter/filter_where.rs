use serde_json::Value;

use super::error::FilterError;
use super::types::{is_identifier, quote, FilterOp};

/// Renders a JSON where-document into a parameterized SQL predicate.
///
/// Top-level keys are AND-ed. A plain value means equality, an object maps
/// operators to operands, and `$and`/`$or` take an array of nested documents.
pub struct FilterWhere {
    params: Vec<Value>,
    first_index: usize,
}

impl FilterWhere {
    /// Placeholders are numbered from `starting_param_index + 1`.
    pub fn generate(where_data: &Value, starting_param_index: usize) -> Result<(String, Vec<Value>), FilterError> {
        let mut builder = Self { params: Vec::new(), first_index: starting_param_index };
        let sql = builder.render(where_data)?;
        Ok((sql, builder.params))
    }

    pub fn validate(where_data: &Value) -> Result<(), FilterError> {
        match where_data {
            Value::Null | Value::Object(_) => Ok(()),
            _ => Err(FilterError::InvalidWhereClause),
        }
    }

    fn render(&mut self, document: &Value) -> Result<String, FilterError> {
        let fields = match document {
            Value::Null => return Ok("1=1".to_string()),
            Value::Object(fields) => fields,
            _ => return Err(FilterError::InvalidWhereClause),
        };

        let mut parts = Vec::new();
        for (key, value) in fields {
            match key.as_str() {
                "$and" => parts.push(self.junction("$and", value, " AND ")?),
                "$or" => parts.push(self.junction("$or", value, " OR ")?),
                op if op.starts_with('$') => return Err(FilterError::UnsupportedOperator(op.to_string())),
                column => parts.extend(self.field(column, value)?),
            }
        }
        if parts.is_empty() {
            return Ok("1=1".to_string());
        }
        Ok(parts.join(" AND "))
    }

    fn junction(&mut self, op: &'static str, value: &Value, joiner: &str) -> Result<String, FilterError> {
        let clauses = value
            .as_array()
            .filter(|clauses| !clauses.is_empty())
            .ok_or(FilterError::InvalidOperand { op, reason: "expected a non-empty array" })?;
        let mut rendered = Vec::with_capacity(clauses.len());
        for clause in clauses {
            rendered.push(format!("({})", self.render(clause)?));
        }
        Ok(format!("({})", rendered.join(joiner)))
    }

    fn field(&mut self, column: &str, value: &Value) -> Result<Vec<String>, FilterError> {
        if !is_identifier(column) {
            return Err(FilterError::InvalidIdentifier(column.to_string()));
        }
        let column = quote(column);
        match value {
            Value::Object(ops) => ops
                .iter()
                .map(|(key, operand)| {
                    let op = FilterOp::parse(key).ok_or_else(|| FilterError::UnsupportedOperator(key.clone()))?;
                    self.condition(&column, op, operand)
                })
                .collect(),
            other => Ok(vec![self.condition(&column, FilterOp::Eq, other)?]),
        }
    }

    fn condition(&mut self, column: &str, op: FilterOp, operand: &Value) -> Result<String, FilterError> {
        Ok(match op {
            FilterOp::Eq if operand.is_null() => format!("{} IS NULL", column),
            FilterOp::Eq => format!("{} = {}", column, self.bind(operand)),
            FilterOp::ILike => format!("{} ILIKE {}", column, self.bind(pattern(op, operand)?)),
            FilterOp::In => match self.bind_list(operand) {
                Some(list) => format!("{} IN ({})", column, list),
                None => "1=0".to_string(),
            },
            FilterOp::Any => match self.bind_list(operand) {
                Some(list) => format!("{} && ARRAY[{}]::text[]", column, list),
                None => "1=0".to_string(),
            },
            FilterOp::AnyILike => format!(
                "EXISTS (SELECT 1 FROM unnest({}) AS elem WHERE elem ILIKE {})",
                column,
                self.bind(pattern(op, operand)?)
            ),
        })
    }

    fn bind(&mut self, value: &Value) -> String {
        self.params.push(value.clone());
        format!("${}", self.first_index + self.params.len())
    }

    /// One placeholder per element; a scalar counts as a one-element list.
    /// `None` when the list is empty.
    fn bind_list(&mut self, operand: &Value) -> Option<String> {
        let values = match operand {
            Value::Array(values) => values.as_slice(),
            single => std::slice::from_ref(single),
        };
        if values.is_empty() {
            return None;
        }
        let placeholders: Vec<String> = values.iter().map(|v| self.bind(v)).collect();
        Some(placeholders.join(", "))
    }
}

fn pattern(op: FilterOp, operand: &Value) -> Result<&Value, FilterError> {
    if operand.is_string() {
        Ok(operand)
    } else {
        Err(FilterError::InvalidOperand { op: op.as_str(), reason: "expected a string pattern" })
    }
}
