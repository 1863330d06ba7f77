use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Direction, ItemId};

/// A bookmark as the catalog hands it out. Creation and editing live outside
/// the vote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: ItemId,
    pub title: String,
    pub url: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: ItemId,
    pub title: String,
    pub url: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub vote_count: i64,
    #[serde(default)]
    pub user_vote: Option<Direction>,
}

impl FeedItem {
    pub fn new(bookmark: Bookmark, vote_count: i64, user_vote: Option<Direction>) -> Self {
        Self {
            id: bookmark.id,
            title: bookmark.title,
            url: bookmark.url,
            created_by: bookmark.created_by,
            created_at: bookmark.created_at,
            vote_count,
            user_vote,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_item_serializes_null_vote() {
        let bookmark = Bookmark {
            id: 3,
            title: "Rust book".to_string(),
            url: "https://doc.rust-lang.org/book/".to_string(),
            created_by: "ana@example.com".to_string(),
            created_at: "2025-01-02T03:04:05Z".parse().unwrap(),
        };
        let json = serde_json::to_value(FeedItem::new(bookmark, -2, None)).unwrap();

        assert_eq!(json["voteCount"], -2);
        assert_eq!(json["userVote"], serde_json::Value::Null);
        assert_eq!(json["createdBy"], "ana@example.com");
    }

    #[test]
    fn test_missing_user_vote_defaults_to_none() {
        let item: FeedItem = serde_json::from_str(
            r#"{"id":1,"title":"t","url":"https://a.b","createdBy":"c","createdAt":"2025-01-01T00:00:00Z","voteCount":4}"#,
        )
        .unwrap();
        assert_eq!(item.user_vote, None);
    }
}
