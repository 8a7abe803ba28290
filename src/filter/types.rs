use serde_json::Value;

/// Comparison operators accepted inside a field condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    In,
    ILike,
    /// Array column shares at least one element with the operand
    Any,
    /// Some element of an array column matches an ILIKE pattern
    AnyILike,
}

impl FilterOp {
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "$eq" => Some(FilterOp::Eq),
            "$in" => Some(FilterOp::In),
            "$ilike" => Some(FilterOp::ILike),
            "$any" => Some(FilterOp::Any),
            "$anyilike" => Some(FilterOp::AnyILike),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::In => "$in",
            FilterOp::ILike => "$ilike",
            FilterOp::Any => "$any",
            FilterOp::AnyILike => "$anyilike",
        }
    }
}

/// Listing request for one table: a where-document, a `col [asc|desc], ...`
/// ordering and an optional window.
#[derive(Debug, Clone, Default)]
pub struct FilterData {
    pub where_clause: Option<Value>,
    pub order: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn to_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOrderInfo {
    pub column: String,
    pub sort: SortDirection,
}

/// Rendered statement with its positional parameters in `$n` order.
#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// Column and table names must be plain identifiers before they are quoted
/// into SQL.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

pub(crate) fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}
