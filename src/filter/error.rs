use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FilterError {
    #[error("invalid identifier `{0}`")]
    InvalidIdentifier(String),

    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),

    #[error("invalid operand for {op}: {reason}")]
    InvalidOperand { op: &'static str, reason: &'static str },

    #[error("where clause must be an object")]
    InvalidWhereClause,

    #[error("invalid sort direction `{0}`")]
    InvalidSortDirection(String),
}
