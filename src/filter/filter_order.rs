use super::error::FilterError;
use super::types::{is_identifier, quote, FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `"view_count desc, created_at desc, id"`. Direction defaults to
    /// ascending; every column must be an identifier.
    pub fn parse(terms: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        terms.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::parse_term)
            .collect()
    }

    fn parse_term(term: &str) -> Result<FilterOrderInfo, FilterError> {
        let mut words = term.split_whitespace();
        let column = words.next().unwrap_or_default();
        if !is_identifier(column) {
            return Err(FilterError::InvalidIdentifier(column.to_string()));
        }
        let sort = match words.next() {
            None => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("asc") => SortDirection::Asc,
            Some(d) if d.eq_ignore_ascii_case("desc") => SortDirection::Desc,
            Some(other) => return Err(FilterError::InvalidSortDirection(other.to_string())),
        };
        if let Some(extra) = words.next() {
            return Err(FilterError::InvalidSortDirection(extra.to_string()));
        }
        Ok(FilterOrderInfo { column: column.to_string(), sort })
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let terms: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", quote(&i.column), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", terms.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_order() {
        let infos = FilterOrder::parse("view_count desc, created_at DESC, id").unwrap();
        assert_eq!(
            FilterOrder::generate(&infos),
            "ORDER BY \"view_count\" DESC, \"created_at\" DESC, \"id\" ASC"
        );
    }

    #[test]
    fn rejects_injected_columns() {
        assert!(matches!(
            FilterOrder::parse("title; DROP TABLE blogs"),
            Err(FilterError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            FilterOrder::parse("title sideways"),
            Err(FilterError::InvalidSortDirection(_))
        ));
    }

    #[test]
    fn empty_order_renders_nothing() {
        assert_eq!(FilterOrder::generate(&FilterOrder::parse(" , ").unwrap()), "");
    }
}
