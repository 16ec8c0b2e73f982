//! Leaderboard read request and page interpretation.
//!
//! Each page asks for one row more than it shows. If that extra row comes
//! back there is a next page, which saves a separate count query.

use clubboard_types::{FilterState, LabelDomain, LeaderboardEntry, PAGE_SIZE, SortColumn, SortState};

use super::{LEADERBOARD_COLUMNS, TIEBREAK_COLUMN, TableQuery, USER_PROFILES};

/// Everything needed to fetch one leaderboard page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRequest {
    pub filters: FilterState,
    pub sort: SortState,
    pub search: String,
    /// 1-based.
    pub page: u32,
    pub page_size: usize,
}

impl Default for LeaderboardRequest {
    fn default() -> Self {
        Self {
            filters: FilterState::default(),
            sort: SortState::default(),
            search: String::new(),
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl LeaderboardRequest {
    /// Rows shown per page: `page_size` kept within `1..=PAGE_SIZE`.
    pub fn rows_per_page(&self) -> usize {
        self.page_size.clamp(1, PAGE_SIZE)
    }

    /// Zero-based offset of the first row on this page.
    pub fn offset(&self) -> usize {
        (self.page.max(1) as usize - 1) * self.rows_per_page()
    }

    /// Build the table read: page size + 1 rows from the page offset.
    pub fn to_query(&self) -> TableQuery {
        let mut query = TableQuery::on(USER_PROFILES).select(LEADERBOARD_COLUMNS);

        let search = self.search.trim();
        if !search.is_empty() {
            query = query.contains(SortColumn::Username.column_name(), search);
        }

        for domain in LabelDomain::ALL {
            let codes = self.filters.codes(domain);
            if !codes.is_empty() {
                query = query.in_set(domain.column().column_name(), codes.iter().cloned());
            }
        }

        query
            .order(self.sort.column.column_name(), self.sort.ascending)
            .order(TIEBREAK_COLUMN, true)
            .range(self.offset(), self.rows_per_page() + 1)
    }
}

/// Rows to display plus whether a following page exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeaderboardPage {
    pub rows: Vec<LeaderboardEntry>,
    pub has_next_page: bool,
}

impl LeaderboardPage {
    /// Interpret a response fetched with `page_size + 1` as the limit.
    pub fn from_rows(mut rows: Vec<LeaderboardEntry>, page_size: usize) -> Self {
        let has_next_page = rows.len() > page_size;
        rows.truncate(page_size);
        Self { rows, has_next_page }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Filter, Window};

    fn entry(name: &str, events: u32) -> LeaderboardEntry {
        LeaderboardEntry {
            username: name.to_string(),
            num_events_attended: events,
            main_club: "codeblack".to_string(),
            major: "math".to_string(),
            year: "junior".to_string(),
        }
    }

    #[test]
    fn test_junior_filter_first_page() {
        let mut request = LeaderboardRequest::default();
        request.filters.toggle_label(LabelDomain::Year, "Junior");
        let query = request.to_query();

        assert_eq!(query.table, "user_profiles");
        assert_eq!(
            query.filters,
            vec![Filter::In {
                column: "year".to_string(),
                values: vec!["junior".to_string()],
            }]
        );
        assert_eq!(query.order[0].column, "num_events_attended");
        assert!(!query.order[0].ascending);
        assert_eq!(query.window, Some(Window { offset: 0, limit: 21 }));
    }

    #[test]
    fn test_blank_search_adds_no_filter() {
        let request = LeaderboardRequest {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert!(request.to_query().filters.is_empty());
    }

    #[test]
    fn test_search_and_all_domains() {
        let mut request = LeaderboardRequest {
            search: "ada".to_string(),
            page: 3,
            ..Default::default()
        };
        request.filters.toggle_label(LabelDomain::Club, "Black Engineers Society");
        request.filters.toggle_label(LabelDomain::Major, "Fire Protection Engineering");
        request.filters.toggle_label(LabelDomain::Year, "Senior");
        let query = request.to_query();

        let columns: Vec<&str> = query.filters.iter().map(Filter::column).collect();
        assert_eq!(columns, vec!["username", "year", "major", "main_club"]);
        assert!(query.filters.contains(&Filter::In {
            column: "main_club".to_string(),
            values: vec!["black-engineers-society".to_string()],
        }));
        assert_eq!(query.window, Some(Window { offset: 40, limit: 21 }));
    }

    #[test]
    fn test_oversized_page_is_clamped() {
        let request = LeaderboardRequest {
            page: 2,
            page_size: usize::MAX,
            ..Default::default()
        };
        assert_eq!(request.rows_per_page(), PAGE_SIZE);
        assert_eq!(request.offset(), 20);
        assert_eq!(request.to_query().window, Some(Window { offset: 20, limit: 21 }));
    }

    #[test]
    fn test_full_page_has_next() {
        let rows: Vec<_> = (0..21).map(|i| entry(&format!("u{i}"), 50 - i)).collect();
        let page = LeaderboardPage::from_rows(rows, 20);
        assert!(page.has_next_page);
        assert_eq!(page.rows.len(), 20);
        assert_eq!(page.rows[19].username, "u19");
    }

    #[test]
    fn test_short_page_has_no_next() {
        for n in [0, 1, 19, 20] {
            let rows: Vec<_> = (0..n).map(|i| entry(&format!("u{i}"), i)).collect();
            let page = LeaderboardPage::from_rows(rows, 20);
            assert!(!page.has_next_page, "{n} rows");
            assert_eq!(page.rows.len(), n as usize);
        }
    }
}
