//! Notice-board announcements served under `{base}/announcements`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Document id assigned by the API (a Mongo-style `_id` string).
///
/// Same newtype pattern as the role and record types: you can't pass a
/// student id where an announcement id is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnouncementId(pub String);

impl fmt::Display for AnnouncementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnnouncementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A stored announcement, as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(rename = "_id")]
    pub id: AnnouncementId,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Announcement {
    /// Returns `true` if the announcement is switched on and `now` falls
    /// inside its `[start_date, end_date]` window.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now <= self.end_date
    }
}

/// The client-editable part of an announcement, sent on create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementDraft {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl AnnouncementDraft {
    /// Checks the draft before it is sent.
    ///
    /// Returns a human-readable reason when the message is blank or the
    /// window ends before it starts.
    pub fn problem(&self) -> Option<&'static str> {
        if self.message.trim().is_empty() {
            Some("announcement message must not be empty")
        } else if self.end_date < self.start_date {
            Some("announcement end date is before its start date")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    fn announcement(active: bool) -> Announcement {
        Announcement {
            id: "a1".into(),
            message: "Water supply off".into(),
            details: None,
            start_date: at(10),
            end_date: at(12),
            is_active: active,
            created_by: None,
            created_at: None,
        }
    }

    #[test]
    fn test_is_live_at_inside_window() {
        assert!(announcement(true).is_live_at(at(11)));
    }

    #[test]
    fn test_is_live_at_outside_window_or_inactive() {
        assert!(!announcement(true).is_live_at(at(13)));
        assert!(!announcement(false).is_live_at(at(11)));
    }

    #[test]
    fn test_announcement_decodes_underscore_id() {
        let json = r#"{"_id":"65f1","message":"Mess closed","startDate":"2026-03-10T00:00:00Z","endDate":"2026-03-11T00:00:00Z","isActive":true}"#;
        let decoded: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.id, AnnouncementId("65f1".into()));
        assert_eq!(decoded.created_by, None);
    }

    #[test]
    fn test_draft_problem_detects_blank_and_inverted_window() {
        let mut draft = AnnouncementDraft {
            message: "  ".into(),
            details: None,
            start_date: at(10),
            end_date: at(12),
            is_active: true,
        };
        assert!(draft.problem().is_some());

        draft.message = "Fire drill".into();
        assert!(draft.problem().is_none());

        draft.end_date = at(9);
        assert!(draft.problem().is_some());
    }
}
