//! In-process profile store.

use std::cmp::Ordering;
use std::sync::Mutex;

use clubboard_types::{LeaderboardEntry, ProfileUpdate, UserProfile};

use super::ProfileStore;
use crate::error::StoreError;
use crate::query::{Filter, Order, TableQuery};

/// A column value pulled out of a profile row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field<'a> {
    Text(&'a str),
    Count(u32),
}

impl Field<'_> {
    fn matches_text(&self, value: &str) -> bool {
        match self {
            Field::Text(s) => *s == value,
            Field::Count(n) => value.parse::<u32>().is_ok_and(|v| v == *n),
        }
    }
}

impl PartialOrd for Field<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Field<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Field::Count(a), Field::Count(b)) => a.cmp(b),
            (Field::Text(a), Field::Text(b)) => a.cmp(b),
            (Field::Count(_), Field::Text(_)) => Ordering::Less,
            (Field::Text(_), Field::Count(_)) => Ordering::Greater,
        }
    }
}

fn field<'a>(profile: &'a UserProfile, column: &str) -> Option<Field<'a>> {
    Some(match column {
        "user_id" => Field::Text(&profile.user_id),
        "username" => Field::Text(&profile.username),
        "num_events_attended" => Field::Count(profile.num_events_attended),
        "main_club" => Field::Text(&profile.main_club),
        "major" => Field::Text(&profile.major),
        "year" => Field::Text(&profile.year),
        _ => return None,
    })
}

fn matches(profile: &UserProfile, filter: &Filter) -> bool {
    let Some(value) = field(profile, filter.column()) else {
        return false;
    };
    match filter {
        Filter::Eq { value: expected, .. } => value.matches_text(expected),
        Filter::Contains { needle, .. } => match value {
            Field::Text(s) => s.to_lowercase().contains(&needle.to_lowercase()),
            Field::Count(n) => n.to_string().contains(needle.as_str()),
        },
        Filter::In { values, .. } => values.iter().any(|v| value.matches_text(v)),
    }
}

fn compare(a: &UserProfile, b: &UserProfile, order: &[Order]) -> Ordering {
    for key in order {
        let ord = field(a, &key.column).cmp(&field(b, &key.column));
        let ord = if key.ascending { ord } else { ord.reverse() };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Profile rows kept in memory, queried with the same [`TableQuery`] the
/// hosted store receives.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<UserProfile>>,
    /// When set, the next call fails with this message.
    fail_next: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<UserProfile>) -> Self {
        Self {
            rows: Mutex::new(rows),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next store call fail with a 503 carrying `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *lock(&self.fail_next) = Some(message.into());
    }

    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> Result<(), StoreError> {
        match lock(&self.fail_next).take() {
            Some(message) => Err(StoreError::Status { status: 503, message }),
            None => Ok(()),
        }
    }

    /// Rows matching `query`, ordered and windowed.
    pub fn evaluate(&self, query: &TableQuery) -> Vec<UserProfile> {
        let rows = lock(&self.rows);
        let mut selected: Vec<UserProfile> = rows
            .iter()
            .filter(|row| query.filters.iter().all(|f| matches(row, f)))
            .cloned()
            .collect();
        selected.sort_by(|a, b| compare(a, b, &query.order));

        match query.window {
            Some(window) => selected.into_iter().skip(window.offset).take(window.limit).collect(),
            None => selected,
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ProfileStore for MemoryStore {
    async fn select_leaderboard(&self, query: &TableQuery) -> Result<Vec<LeaderboardEntry>, StoreError> {
        self.take_failure()?;
        Ok(self.evaluate(query).iter().map(LeaderboardEntry::from).collect())
    }

    async fn fetch_profile(&self, _access_token: &str, user_id: &str) -> Result<UserProfile, StoreError> {
        self.take_failure()?;
        lock(&self.rows)
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))
    }

    async fn insert_profile(&self, _access_token: &str, profile: &UserProfile) -> Result<(), StoreError> {
        self.take_failure()?;
        let mut rows = lock(&self.rows);
        if rows.iter().any(|p| p.user_id == profile.user_id) {
            return Err(StoreError::Status {
                status: 409,
                message: format!("duplicate key value for user_id {}", profile.user_id),
            });
        }
        rows.push(profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        _access_token: &str,
        user_id: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, StoreError> {
        self.take_failure()?;
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| StoreError::ProfileNotFound(user_id.to_string()))?;
        row.apply(update);
        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{LEADERBOARD_COLUMNS, TIEBREAK_COLUMN, USER_PROFILES};

    fn profile(id: &str, name: &str, events: u32, year: &str) -> UserProfile {
        UserProfile {
            user_id: id.to_string(),
            username: name.to_string(),
            num_events_attended: events,
            main_club: "colorstack".to_string(),
            major: "computer-science".to_string(),
            year: year.to_string(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::with_rows(vec![
            profile("1", "Ada", 12, "senior"),
            profile("2", "grace_h", 30, "junior"),
            profile("3", "Linus", 12, "junior"),
            profile("4", "adalyn", 4, "freshman"),
        ])
    }

    #[tokio::test]
    async fn test_ilike_is_case_insensitive() {
        let query = TableQuery::on(USER_PROFILES)
            .select(LEADERBOARD_COLUMNS)
            .contains("username", "ADA")
            .order("username", true);
        let rows = store().select_leaderboard(&query).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(names, vec!["Ada", "adalyn"]);
    }

    #[tokio::test]
    async fn test_like_metacharacters_are_literal() {
        let query = TableQuery::on(USER_PROFILES).contains("username", "_");
        let rows = store().select_leaderboard(&query).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].username, "grace_h");
    }

    #[tokio::test]
    async fn test_in_set_order_and_window() {
        let query = TableQuery::on(USER_PROFILES)
            .in_set("year", ["junior", "senior"])
            .order("num_events_attended", false)
            .order(TIEBREAK_COLUMN, true)
            .range(1, 2);
        let rows = store().select_leaderboard(&query).await.unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.username.as_str()).collect();
        // 30, then the two 12s broken by user_id
        assert_eq!(names, vec!["Ada", "Linus"]);
    }

    #[tokio::test]
    async fn test_fetch_and_update_profile() {
        let store = store();
        let update = ProfileUpdate {
            username: "ada_l".to_string(),
            year: "senior".to_string(),
            major: "math".to_string(),
            main_club: "codeblack".to_string(),
        };
        let updated = store.update_profile("token", "1", &update).await.unwrap();
        assert_eq!(updated.major, "math");
        assert_eq!(updated.num_events_attended, 12);
        assert_eq!(store.fetch_profile("token", "1").await.unwrap(), updated);

        let missing = store.fetch_profile("token", "99").await;
        assert!(matches!(missing, Err(StoreError::ProfileNotFound(id)) if id == "99"));
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate() {
        let store = store();
        let dup = profile("2", "someone", 0, "junior");
        assert!(matches!(
            store.insert_profile("token", &dup).await,
            Err(StoreError::Status { status: 409, .. })
        ));
        store.insert_profile("token", &profile("5", "new", 0, "senior")).await.unwrap();
        assert_eq!(store.len(), 5);
    }

    #[tokio::test]
    async fn test_injected_failure_is_one_shot() {
        let store = store();
        store.fail_next("connection reset");
        let query = TableQuery::on(USER_PROFILES);
        assert!(store.select_leaderboard(&query).await.is_err());
        assert_eq!(store.select_leaderboard(&query).await.unwrap().len(), 4);
    }
}
