//! Row types for the `user_profiles` table.

use serde::{Deserialize, Deserializer, Serialize};

use crate::formatting::{club_label, major_label, year_label};

/// Attendance count; a missing or null column reads as 0.
fn count_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// One leaderboard row, as selected from `user_profiles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub num_events_attended: u32,
    pub main_club: String,
    pub major: String,
    pub year: String,
}

impl LeaderboardEntry {
    pub fn year_label(&self) -> &str {
        year_label(&self.year)
    }

    pub fn major_label(&self) -> &str {
        major_label(&self.major)
    }

    pub fn club_label(&self) -> &str {
        club_label(&self.main_club)
    }
}

/// Full profile row, keyed by the auth user's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub username: String,
    #[serde(default, deserialize_with = "count_or_zero")]
    pub num_events_attended: u32,
    pub main_club: String,
    pub major: String,
    pub year: String,
}

impl UserProfile {
    /// Fresh profile for a newly registered user.
    pub fn new_member(user_id: impl Into<String>, details: ProfileUpdate) -> Self {
        Self {
            user_id: user_id.into(),
            username: details.username,
            num_events_attended: 0,
            main_club: details.main_club,
            major: details.major,
            year: details.year,
        }
    }

    /// The editable subset of this profile.
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            username: self.username.clone(),
            year: self.year.clone(),
            major: self.major.clone(),
            main_club: self.main_club.clone(),
        }
    }

    /// Overwrite the editable fields.
    pub fn apply(&mut self, update: &ProfileUpdate) {
        self.username = update.username.clone();
        self.year = update.year.clone();
        self.major = update.major.clone();
        self.main_club = update.main_club.clone();
    }
}

impl From<&UserProfile> for LeaderboardEntry {
    fn from(profile: &UserProfile) -> Self {
        Self {
            username: profile.username.clone(),
            num_events_attended: profile.num_events_attended,
            main_club: profile.main_club.clone(),
            major: profile.major.clone(),
            year: profile.year.clone(),
        }
    }
}

/// Editable profile fields. Year, major and club are storage codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub year: String,
    pub major: String,
    pub main_club: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_from_rest_row() {
        let json = r#"[{"username":"ada","num_events_attended":7,"main_club":"colorstack","major":"computer-science","year":"junior"}]"#;
        let rows: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].num_events_attended, 7);
        assert_eq!(rows[0].club_label(), "ColorStack");
        assert_eq!(rows[0].major_label(), "Computer Science");
        assert_eq!(rows[0].year_label(), "Junior");
    }

    #[test]
    fn test_missing_or_null_count_reads_as_zero() {
        let json = r#"[
            {"username":"ada","num_events_attended":null,"main_club":"colorstack","major":"math","year":"junior"},
            {"username":"grace","main_club":"codeblack","major":"math","year":"senior"}
        ]"#;
        let rows: Vec<LeaderboardEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.num_events_attended == 0));

        let profile: UserProfile = serde_json::from_str(
            r#"{"user_id":"u-1","username":"ada","num_events_attended":null,"main_club":"colorstack","major":"math","year":"junior"}"#,
        )
        .unwrap();
        assert_eq!(profile.num_events_attended, 0);
    }

    #[test]
    fn test_update_serializes_column_names() {
        let update = ProfileUpdate {
            username: "ada".into(),
            year: "senior".into(),
            major: "math".into(),
            main_club: "codeblack".into(),
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["main_club"], "codeblack");
        assert_eq!(value["major"], "math");
        assert!(value.get("setMajor").is_none());
    }

    #[test]
    fn test_new_member_starts_at_zero() {
        let update = ProfileUpdate {
            username: "grace".into(),
            year: "freshman".into(),
            major: "other".into(),
            main_club: "colorstack".into(),
        };
        let profile = UserProfile::new_member("u-1", update.clone());
        assert_eq!(profile.num_events_attended, 0);
        assert_eq!(profile.to_update(), update);
        assert_eq!(LeaderboardEntry::from(&profile).username, "grace");
    }
}
