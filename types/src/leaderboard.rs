//! Leaderboard view state: filters, sort and paging.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::formatting::LabelDomain;

/// Rows shown per leaderboard page.
pub const PAGE_SIZE: usize = 20;

/// Sortable leaderboard columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    Username,
    Year,
    Major,
    MainClub,
    NumEventsAttended,
}

impl SortColumn {
    /// Columns in header order.
    pub const ALL: [SortColumn; 5] = [
        SortColumn::Username,
        SortColumn::Year,
        SortColumn::Major,
        SortColumn::MainClub,
        SortColumn::NumEventsAttended,
    ];

    /// Column name in `user_profiles`.
    pub fn column_name(self) -> &'static str {
        match self {
            SortColumn::Username => "username",
            SortColumn::Year => "year",
            SortColumn::Major => "major",
            SortColumn::MainClub => "main_club",
            SortColumn::NumEventsAttended => "num_events_attended",
        }
    }

    /// Header text.
    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Username => "Username",
            SortColumn::Year => "Year",
            SortColumn::Major => "Major",
            SortColumn::MainClub => "Main Club",
            SortColumn::NumEventsAttended => "Events Attended",
        }
    }

    /// Direction applied on the first click of this column's header.
    ///
    /// Attendance starts with the highest count; text columns start A-Z.
    pub fn first_click_ascending(self) -> bool {
        !matches!(self, SortColumn::NumEventsAttended)
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortColumn::ALL
            .into_iter()
            .find(|c| c.column_name() == s || c.title().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort column: {s}"))
    }
}

impl LabelDomain {
    /// The `user_profiles` column holding this domain's codes.
    pub fn column(self) -> SortColumn {
        match self {
            LabelDomain::Year => SortColumn::Year,
            LabelDomain::Major => SortColumn::Major,
            LabelDomain::Club => SortColumn::MainClub,
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: SortColumn,
    pub ascending: bool,
}

impl Default for SortState {
    /// Most events attended first.
    fn default() -> Self {
        Self {
            column: SortColumn::NumEventsAttended,
            ascending: false,
        }
    }
}

/// Selected storage codes per domain. Membership only; order is irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub year: BTreeSet<String>,
    pub major: BTreeSet<String>,
    pub club: BTreeSet<String>,
}

impl FilterState {
    pub fn codes(&self, domain: LabelDomain) -> &BTreeSet<String> {
        match domain {
            LabelDomain::Year => &self.year,
            LabelDomain::Major => &self.major,
            LabelDomain::Club => &self.club,
        }
    }

    fn codes_mut(&mut self, domain: LabelDomain) -> &mut BTreeSet<String> {
        match domain {
            LabelDomain::Year => &mut self.year,
            LabelDomain::Major => &mut self.major,
            LabelDomain::Club => &mut self.club,
        }
    }

    /// Toggle a checkbox by its label. Returns whether it is now selected.
    pub fn toggle_label(&mut self, domain: LabelDomain, label: &str) -> bool {
        let code = domain.storage_code(label).into_owned();
        let set = self.codes_mut(domain);
        if set.remove(&code) {
            false
        } else {
            set.insert(code);
            true
        }
    }

    /// Whether the checkbox for `label` is selected.
    pub fn is_selected(&self, domain: LabelDomain, label: &str) -> bool {
        self.codes(domain).contains(domain.storage_code(label).as_ref())
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_empty() && self.major.is_empty() && self.club.is_empty()
    }

    pub fn clear(&mut self) {
        self.year.clear();
        self.major.clear();
        self.club.clear();
    }
}

/// Current page (1-based) and whether another page follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page: u32,
    pub has_next_page: bool,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            has_next_page: false,
        }
    }
}

impl PageState {
    /// Zero-based row offset of this page.
    pub fn offset(&self, page_size: usize) -> usize {
        (self.page.max(1) as usize - 1) * page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_label_stores_code() {
        let mut filters = FilterState::default();
        assert!(filters.toggle_label(LabelDomain::Major, "Computer Science"));
        assert!(filters.major.contains("computer-science"));
        assert!(filters.is_selected(LabelDomain::Major, "Computer Science"));
        assert!(!filters.toggle_label(LabelDomain::Major, "Computer Science"));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_toggle_is_membership_only() {
        let mut a = FilterState::default();
        a.toggle_label(LabelDomain::Year, "Junior");
        a.toggle_label(LabelDomain::Year, "Senior");
        let mut b = FilterState::default();
        b.toggle_label(LabelDomain::Year, "Senior");
        b.toggle_label(LabelDomain::Year, "Junior");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sort_column_parse() {
        assert_eq!("main_club".parse::<SortColumn>(), Ok(SortColumn::MainClub));
        assert_eq!("events attended".parse::<SortColumn>(), Ok(SortColumn::NumEventsAttended));
        assert!("points".parse::<SortColumn>().is_err());
    }

    #[test]
    fn test_first_click_direction() {
        assert!(SortColumn::Username.first_click_ascending());
        assert!(!SortColumn::NumEventsAttended.first_click_ascending());
    }

    #[test]
    fn test_page_offset() {
        let page = PageState {
            page: 3,
            has_next_page: false,
        };
        assert_eq!(page.offset(PAGE_SIZE), 40);
        assert_eq!(PageState::default().offset(PAGE_SIZE), 0);
    }

    #[test]
    fn test_domain_columns() {
        assert_eq!(LabelDomain::Club.column().column_name(), "main_club");
        assert_eq!(LabelDomain::Year.column(), SortColumn::Year);
    }
}
