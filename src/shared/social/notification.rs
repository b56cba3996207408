//! Notification Data Structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::social::user::UserSummary;

/// What triggered a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Like,
    Follow,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Like => "like",
            NotificationKind::Follow => "follow",
        }
    }

    /// Case-insensitive inverse of [`NotificationKind::as_str`]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "like" => Some(NotificationKind::Like),
            "follow" => Some(NotificationKind::Follow),
            _ => None,
        }
    }
}

/// A notification with its sender embedded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: Uuid,
    pub from: UserSummary,
    /// Recipient id
    pub to: Uuid,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in [NotificationKind::Like, NotificationKind::Follow] {
            assert_eq!(NotificationKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(NotificationKind::parse("FOLLOW"), Some(NotificationKind::Follow));
        assert_eq!(NotificationKind::parse("mention"), None);
    }

    #[test]
    fn test_kind_serializes_under_type() {
        let view = NotificationView {
            id: Uuid::new_v4(),
            from: UserSummary {
                id: Uuid::new_v4(),
                username: "ana".into(),
                full_name: "Ana".into(),
                email: "ana@x.com".into(),
                bio: String::new(),
                link: String::new(),
                profile_img: String::new(),
                cover_img: String::new(),
            },
            to: Uuid::new_v4(),
            kind: NotificationKind::Like,
            read: false,
            created_at: Utc::now(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["type"], "like");
        assert_eq!(value["read"], false);
    }
}
