use chrono::{DateTime, Local};
use serde::Deserialize;

/// A post exactly as the remote service serializes it.
#[derive(Deserialize, Debug, Clone)]
pub struct RawPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "createdBy")]
    pub created_by: Author,
    #[serde(default)]
    pub like: Vec<Like>,
    #[serde(default)]
    pub comment: Vec<RawComment>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawComment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: String,
    #[serde(rename = "createdBy")]
    pub created_by: Author,
    #[serde(rename = "statusId", default)]
    pub status_id: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
}

impl Author {
    pub fn display_name(&self) -> String {
        match (&self.firstname, &self.lastname) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.email.clone(),
        }
    }
}

/// Membership in a post's like list is the only source of "liked" state;
/// the wire carries no boolean flag.
#[derive(Deserialize, Debug, Clone)]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: String,
}

/// A post ready for display: wire fields plus the viewer-derived ones.
#[derive(Debug, Clone)]
pub struct Post {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub created_at: String,
    pub datetime: String,
    pub comments: Vec<Comment>,
    pub like_count: usize,
    pub has_liked: bool,
    pub can_delete: bool,
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub id: String,
    pub author: Author,
    pub content: String,
    pub datetime: String,
    pub can_delete: bool,
}

/// Derive the viewer-relative fields for one raw post.
///
/// `has_liked` is false whenever the viewer is unknown. Every post and
/// comment is deletable by every viewer; that is the remote contract,
/// not a missing check.
pub fn annotate(raw: RawPost, viewer_id: Option<&str>) -> Post {
    let like_count = raw.like.len();
    let has_liked = match viewer_id {
        Some(viewer) => raw.like.iter().any(|l| l.id == viewer),
        None => false,
    };

    let comments = raw
        .comment
        .into_iter()
        .map(|c| Comment {
            datetime: format_datetime(&c.created_at),
            id: c.id,
            author: c.created_by,
            content: c.content,
            can_delete: true,
        })
        .collect();

    Post {
        datetime: format_datetime(&raw.created_at),
        id: raw.id,
        author: raw.created_by,
        content: raw.content,
        created_at: raw.created_at,
        comments,
        like_count,
        has_liked,
        can_delete: true,
    }
}

fn format_datetime(created_at: &str) -> String {
    DateTime::parse_from_rfc3339(created_at)
        .map(|dt| DateTime::<Local>::from(dt).format("%H:%M %h-%d-%Y").to_string())
        .unwrap_or_else(|_| created_at.to_string())
}
