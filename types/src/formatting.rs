//! Label formatting between storage codes and display labels.
//!
//! Profile columns store compact codes (`computer-science`) while every view
//! shows labels (`Computer Science`). Both directions read the same fixed
//! tables below, so a label picked in a filter always maps back to the code
//! that is actually stored.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Class-year codes and their labels.
pub const YEARS: &[(&str, &str)] = &[
    ("freshman", "Freshman"),
    ("sophomore", "Sophomore"),
    ("junior", "Junior"),
    ("senior", "Senior"),
];

/// Major codes and their labels.
pub const MAJORS: &[(&str, &str)] = &[
    ("computer-science", "Computer Science"),
    ("electrical-engineering", "Electrical Engineering"),
    ("computer-engineering", "Computer Engineering"),
    ("information-science", "Information Science"),
    ("math", "Math"),
    ("mechanical-engineering", "Mechanical Engineering"),
    ("civil-engineering", "Civil Engineering"),
    ("fire-protection-engineering", "Fire Protection Engineering"),
    ("aerospace-engineering", "Aerospace Engineering"),
    ("other", "Other"),
];

/// Club codes and their labels.
pub const CLUBS: &[(&str, &str)] = &[
    ("codeblack", "CodeBlack"),
    ("colorstack", "ColorStack"),
    ("black-engineers-society", "Black Engineers Society"),
];

/// One of the three code/label domains stored on a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelDomain {
    Year,
    Major,
    Club,
}

impl LabelDomain {
    /// All domains, in the order the filter sidebar shows them.
    pub const ALL: [LabelDomain; 3] = [LabelDomain::Year, LabelDomain::Major, LabelDomain::Club];

    /// The fixed `(code, label)` table for this domain.
    pub fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            LabelDomain::Year => YEARS,
            LabelDomain::Major => MAJORS,
            LabelDomain::Club => CLUBS,
        }
    }

    /// Heading used for this domain in forms and the filter sidebar.
    pub fn title(self) -> &'static str {
        match self {
            LabelDomain::Year => "Year",
            LabelDomain::Major => "Major",
            LabelDomain::Club => "Main Club",
        }
    }

    /// Map a storage code to its display label.
    ///
    /// Unknown codes are returned unchanged.
    ///
    /// # Examples
    /// ```
    /// use clubboard_types::formatting::LabelDomain;
    /// assert_eq!(LabelDomain::Major.label("computer-science"), "Computer Science");
    /// assert_eq!(LabelDomain::Year.label("grad-student"), "grad-student");
    /// ```
    pub fn label<'a>(self, code: &'a str) -> &'a str {
        self.table()
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
            .unwrap_or(code)
    }

    /// Map a display label back to the storage code in the fixed table.
    ///
    /// # Examples
    /// ```
    /// use clubboard_types::formatting::LabelDomain;
    /// assert_eq!(LabelDomain::Club.code_for_label("Black Engineers Society"), Some("black-engineers-society"));
    /// assert_eq!(LabelDomain::Club.code_for_label("Chess Club"), None);
    /// ```
    pub fn code_for_label(self, label: &str) -> Option<&'static str> {
        self.table()
            .iter()
            .find(|(_, l)| *l == label)
            .map(|(code, _)| *code)
    }

    /// Storage code for a label, falling back to [`to_db_format`] for labels
    /// outside the fixed table.
    ///
    /// Codes passed in are accepted as-is, so callers may hand over either form.
    ///
    /// # Examples
    /// ```
    /// use clubboard_types::formatting::LabelDomain;
    /// assert_eq!(LabelDomain::Year.storage_code("Junior"), "junior");
    /// assert_eq!(LabelDomain::Year.storage_code("junior"), "junior");
    /// assert_eq!(LabelDomain::Major.storage_code("Underwater Basket Weaving"), "underwater-basket-weaving");
    /// ```
    pub fn storage_code(self, label: &str) -> Cow<'static, str> {
        if let Some(code) = self.code_for_label(label) {
            return Cow::Borrowed(code);
        }
        if let Some((code, _)) = self.table().iter().find(|(c, _)| *c == label) {
            return Cow::Borrowed(*code);
        }
        Cow::Owned(to_db_format(label))
    }

    /// Whether `code` is one of this domain's fixed codes.
    pub fn is_code(self, code: &str) -> bool {
        self.table().iter().any(|(c, _)| *c == code)
    }

    /// Fixed codes, in table order.
    pub fn codes(self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(code, _)| *code)
    }

    /// Fixed labels, in table order.
    pub fn labels(self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(_, label)| *label)
    }
}

/// Generic label-to-code transform: lower-case with spaces replaced by hyphens.
///
/// Only used for labels missing from the fixed tables.
///
/// # Examples
/// ```
/// use clubboard_types::formatting::to_db_format;
/// assert_eq!(to_db_format("Computer Science"), "computer-science");
/// ```
pub fn to_db_format(label: &str) -> String {
    label.to_lowercase().replace(' ', "-")
}

/// Display label for a class-year code.
pub fn year_label(code: &str) -> &str {
    LabelDomain::Year.label(code)
}

/// Display label for a major code.
pub fn major_label(code: &str) -> &str {
    LabelDomain::Major.label(code)
}

/// Display label for a club code.
pub fn club_label(code: &str) -> &str {
    LabelDomain::Club.label(code)
}
