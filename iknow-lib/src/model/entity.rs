//! Wire entities returned by the IKnow API.

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// A university, the root level of the materials hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub id: String,
    pub name: String,
}

/// A school within a university.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A department within a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: String,
    pub name: String,
    /// Number of academic years the department teaches.
    #[serde(default)]
    pub years: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An exam or course material file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exam {
    pub id: String,
    pub title: String,
    /// Download URL of the file.
    #[serde(default)]
    pub file: Option<String>,
}

/// Author summary attached to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default, rename = "acedemic_year")]
    pub academic_year: Option<String>,
}

/// A post comment or a reply to one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    #[serde(default)]
    pub user: Option<CommentUser>,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub likes: i64,
    #[serde(default)]
    pub reply_count: u32,
}

impl Comment {
    /// Parses the creation timestamp, if the server sent an RFC 3339 one.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Returns the author's display name, or `"unknown"`.
    pub fn author(&self) -> &str {
        self.user.as_ref().map_or("unknown", |u| u.name.as_str())
    }
}

/// Request body for posting a reply to a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReply {
    /// The post the parent comment belongs to. The server requires it.
    pub post_id: String,
    pub parent_comment_id: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_department_years_optional() {
        let dept: Department =
            serde_json::from_str(r#"{"id":"d1","name":"CS","description":null}"#).unwrap();
        assert_eq!(dept.years, None);
        assert_eq!(dept.description, None);
    }

    #[test]
    fn test_comment_defaults_and_timestamp() {
        let comment: Comment = serde_json::from_str(
            r#"{"id":"c1","content":"hi","created_at":"2024-05-01T10:00:00Z",
                "user":{"id":"u1","name":"Abel","acedemic_year":"3"}}"#,
        )
        .unwrap();
        assert_eq!(comment.likes, 0);
        assert_eq!(comment.reply_count, 0);
        assert_eq!(comment.author(), "Abel");
        assert_eq!(
            comment.user.as_ref().and_then(|u| u.academic_year.as_deref()),
            Some("3")
        );
        assert_eq!(
            comment.created_at().map(|dt| dt.to_rfc3339()),
            Some("2024-05-01T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_new_reply_carries_post_id() {
        let body = NewReply {
            post_id: "p1".into(),
            parent_comment_id: "c1".into(),
            content: "thanks".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"post_id": "p1", "parent_comment_id": "c1", "content": "thanks"})
        );
    }
}
