//! Declarative reads against the hosted table API.
//!
//! A [`TableQuery`] names a table, the columns to return, row filters, an
//! ordering and an offset/limit window. [`TableQuery::to_params`] renders it
//! as PostgREST query parameters; the in-memory store evaluates the same value
//! directly, so both back ends agree on what a query means.

pub mod leaderboard;

pub use leaderboard::{LeaderboardPage, LeaderboardRequest};

/// Profile table holding one row per registered user.
pub const USER_PROFILES: &str = "user_profiles";

/// Columns the leaderboard reads.
pub const LEADERBOARD_COLUMNS: &[&str] = &["username", "num_events_attended", "main_club", "major", "year"];

/// Unique per row; used as the final ordering key so pages never overlap.
pub const TIEBREAK_COLUMN: &str = "user_id";

/// Escape LIKE metacharacters so user text only ever matches literally.
fn like_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Quote a value for a PostgREST `in.(...)` list (`O"Brien` -> `"O\"Brien"`).
fn list_quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

// ─────────────────────────────────────────────────────────────────────────────
// Query Parts
// ─────────────────────────────────────────────────────────────────────────────

/// A row predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: String },
    /// Case-insensitive substring match.
    Contains { column: String, needle: String },
    /// `column IN (values)`
    In { column: String, values: Vec<String> },
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::Contains { column, .. } | Filter::In { column, .. } => column,
        }
    }

    /// PostgREST operator expression for this filter's value side.
    fn param_value(&self) -> String {
        match self {
            Filter::Eq { value, .. } => format!("eq.{value}"),
            Filter::Contains { needle, .. } => format!("ilike.*{}*", like_escape(needle)),
            Filter::In { values, .. } => {
                let quoted: Vec<String> = values.iter().map(|v| list_quote(v)).collect();
                format!("in.({})", quoted.join(","))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

impl Order {
    fn param_value(&self) -> String {
        format!("{}.{}", self.column, if self.ascending { "asc" } else { "desc" })
    }
}

/// Offset/limit row window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Table Query
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub filters: Vec<Filter>,
    pub order: Vec<Order>,
    pub window: Option<Window>,
}

impl TableQuery {
    /// Start a query against `table`.
    pub fn on(table: &str) -> Self {
        Self {
            table: table.to_string(),
            columns: Vec::new(),
            filters: Vec::new(),
            order: Vec::new(),
            window: None,
        }
    }

    pub fn select(mut self, columns: &[&str]) -> Self {
        self.columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append an ordering key. Earlier keys take precedence.
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        self.order.push(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn range(mut self, offset: usize, limit: usize) -> Self {
        self.window = Some(Window { offset, limit });
        self
    }

    pub fn eq(mut self, column: &str, value: impl Into<String>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, column: &str, needle: impl Into<String>) -> Self {
        self.filters.push(Filter::Contains {
            column: column.to_string(),
            needle: needle.into(),
        });
        self
    }

    pub fn in_set<I, S>(mut self, column: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Render as PostgREST query parameters.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if !self.columns.is_empty() {
            params.push(("select".to_string(), self.columns.join(",")));
        }
        for filter in &self.filters {
            params.push((filter.column().to_string(), filter.param_value()));
        }
        if !self.order.is_empty() {
            let order: Vec<String> = self.order.iter().map(Order::param_value).collect();
            params.push(("order".to_string(), order.join(",")));
        }
        if let Some(window) = self.window {
            params.push(("offset".to_string(), window.offset.to_string()));
            params.push(("limit".to_string(), window.limit.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_params() {
        let query = TableQuery::on(USER_PROFILES)
            .select(LEADERBOARD_COLUMNS)
            .contains("username", "ad")
            .in_set("year", ["junior", "senior"])
            .order("num_events_attended", false)
            .order(TIEBREAK_COLUMN, true)
            .range(40, 21);

        assert_eq!(
            query.to_params(),
            vec![
                ("select".into(), "username,num_events_attended,main_club,major,year".into()),
                ("username".into(), "ilike.*ad*".into()),
                ("year".into(), r#"in.("junior","senior")"#.into()),
                ("order".into(), "num_events_attended.desc,user_id.asc".into()),
                ("offset".into(), "40".into()),
                ("limit".into(), "21".into()),
            ]
        );
    }

    #[test]
    fn test_eq_filter() {
        let query = TableQuery::on(USER_PROFILES).select(&["*"]).eq("user_id", "abc-123");
        assert_eq!(
            query.to_params(),
            vec![
                ("select".into(), "*".into()),
                ("user_id".into(), "eq.abc-123".into()),
            ]
        );
    }

    #[test]
    fn test_like_escape() {
        assert_eq!(like_escape("the_one"), r"the\_one");
        assert_eq!(like_escape("100%"), r"100\%");
        assert_eq!(like_escape(r"a\b"), r"a\\b");
        assert_eq!(like_escape("plain"), "plain");
    }

    #[test]
    fn test_list_quote() {
        assert_eq!(list_quote("codeblack"), "\"codeblack\"");
        assert_eq!(list_quote("a,b"), "\"a,b\"");
        assert_eq!(list_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
