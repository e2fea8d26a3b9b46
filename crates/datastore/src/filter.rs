//! Filter and query construction.
//!
//! Filters cover exactly the operator set the services need: equality,
//! membership, not-null, greater-or-equal, and an or-combined
//! case-insensitive substring match. [`Query`] adds ordering and limiting.
//! The REST client renders these to the store's query-string operators;
//! [`crate::MemoryStore`] interprets them directly.

/// A single row predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`.
    Eq(String, String),
    /// `column IN (values)`.
    In(String, Vec<String>),
    /// `column >= value` (numeric when both sides parse as numbers).
    Gte(String, String),
    /// `column IS NOT NULL`.
    NotNull(String),
    /// Case-insensitive substring match on any of the columns.
    AnyIlike(Vec<String>, String),
}

impl Filter {
    /// Equality on a column.
    pub fn eq(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Eq(column.into(), value.to_string())
    }

    /// Membership in a value set.
    pub fn is_in<V: ToString>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In(
            column.into(),
            values.into_iter().map(|v| v.to_string()).collect(),
        )
    }

    /// Greater-or-equal on a column.
    pub fn gte(column: impl Into<String>, value: impl ToString) -> Self {
        Self::Gte(column.into(), value.to_string())
    }

    /// Column is not null.
    pub fn not_null(column: impl Into<String>) -> Self {
        Self::NotNull(column.into())
    }

    /// Substring match (case-insensitive) against any of `columns`.
    pub fn any_ilike<C: Into<String>>(
        columns: impl IntoIterator<Item = C>,
        term: impl Into<String>,
    ) -> Self {
        Self::AnyIlike(columns.into_iter().map(Into::into).collect(), term.into())
    }

    /// Render as a query-string pair in the store's operator syntax.
    #[must_use]
    pub fn to_query_pair(&self) -> (String, String) {
        match self {
            Self::Eq(column, value) => (column.clone(), format!("eq.{value}")),
            Self::In(column, values) => (column.clone(), format!("in.({})", values.join(","))),
            Self::Gte(column, value) => (column.clone(), format!("gte.{value}")),
            Self::NotNull(column) => (column.clone(), "not.is.null".to_string()),
            Self::AnyIlike(columns, term) => {
                let alternatives = columns
                    .iter()
                    .map(|c| format!("{c}.ilike.*{term}*"))
                    .collect::<Vec<_>>()
                    .join(",");
                ("or".to_string(), format!("({alternatives})"))
            }
        }
    }
}

/// Sort direction for [`Query`] ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OrderBy {
    pub(crate) column: String,
    pub(crate) direction: Direction,
}

/// A table query: filters plus optional ordering and limiting.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub(crate) filters: Vec<Filter>,
    pub(crate) order: Option<OrderBy>,
    pub(crate) limit: Option<u32>,
}

impl Query {
    /// An unfiltered query over the whole table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter; all filters must match (AND).
    #[must_use]
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Order ascending by `column`.
    #[must_use]
    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            direction: Direction::Asc,
        });
        self
    }

    /// Order descending by `column`.
    #[must_use]
    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            direction: Direction::Desc,
        });
        self
    }

    /// Cap the number of returned rows.
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Render the whole query as query-string pairs.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> =
            self.filters.iter().map(Filter::to_query_pair).collect();

        if let Some(order) = &self.order {
            let direction = match order.direction {
                Direction::Asc => "asc",
                Direction::Desc => "desc",
            };
            pairs.push(("order".to_string(), format!("{}.{direction}", order.column)));
        }

        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_pair() {
        let (k, v) = Filter::eq("category", "men").to_query_pair();
        assert_eq!((k.as_str(), v.as_str()), ("category", "eq.men"));
    }

    #[test]
    fn test_in_pair() {
        let (k, v) = Filter::is_in("id", ["a", "b", "c"]).to_query_pair();
        assert_eq!((k.as_str(), v.as_str()), ("id", "in.(a,b,c)"));
    }

    #[test]
    fn test_gte_pair() {
        let (k, v) = Filter::gte("price", 5000).to_query_pair();
        assert_eq!((k.as_str(), v.as_str()), ("price", "gte.5000"));
    }

    #[test]
    fn test_not_null_pair() {
        let (k, v) = Filter::not_null("discount_price").to_query_pair();
        assert_eq!((k.as_str(), v.as_str()), ("discount_price", "not.is.null"));
    }

    #[test]
    fn test_any_ilike_renders_or_group() {
        let (k, v) = Filter::any_ilike(["name", "brand"], "oud").to_query_pair();
        assert_eq!(k, "or");
        assert_eq!(v, "(name.ilike.*oud*,brand.ilike.*oud*)");
    }

    #[test]
    fn test_query_pairs_include_order_and_limit() {
        let pairs = Query::new()
            .filter(Filter::eq("featured", true))
            .order_desc("created_at")
            .limit(10)
            .to_query_pairs();

        assert_eq!(
            pairs,
            vec![
                ("featured".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }
}
