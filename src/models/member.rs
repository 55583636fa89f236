use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecipeId;

/// Identifier of a comment row
pub type CommentId = i64;

/// A member's declared interests as shown on their profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberInterests {
    pub diseases: Vec<String>,
    pub has_diseases: bool,
}

impl From<Vec<String>> for MemberInterests {
    fn from(diseases: Vec<String>) -> Self {
        Self {
            has_diseases: !diseases.is_empty(),
            diseases,
        }
    }
}

/// Whether a member has a recipe bookmarked, and whether the last call changed it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkStatus {
    pub recipe_id: RecipeId,
    pub bookmarked: bool,
    pub changed: bool,
}

/// A comment row joined with its author's first name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: CommentId,
    pub recipe_id: RecipeId,
    pub member_email: String,
    pub author_name: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_written_by(&self, member: &str) -> bool {
        self.member_email.trim().eq_ignore_ascii_case(member.trim())
    }
}

/// Display form of a comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub recipe_id: RecipeId,
    pub body: String,
    pub member_email: String,
    /// First name, or the local part of the email when no name is on file
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        let author_name = comment
            .author_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .unwrap_or_else(|| {
                comment
                    .member_email
                    .split('@')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            });

        Self {
            id: comment.id,
            recipe_id: comment.recipe_id,
            body: comment.body,
            member_email: comment.member_email,
            author_name,
            created_at: comment.created_at,
        }
    }
}

/// One page of comments under a recipe, newest first
#[derive(Debug, Clone, Serialize)]
pub struct CommentPage {
    pub comments: Vec<CommentView>,
    pub page: usize,
    pub limit: usize,
}
