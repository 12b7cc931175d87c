//! Community feed use cases: list and detail views over the data service.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use fitfeed_core::community::{AuthorRef, CommunityRepository, Post, Reply};
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::relative_date::{Locale, format_relative_date_at};
use serde::Serialize;

/// Tags shown on a feed card; the detail view shows all of them.
pub const SUMMARY_TAG_LIMIT: usize = 2;

/// Feed card for one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    /// Tags cut from `tags`, rendered as "+N" on the card.
    pub hidden_tag_count: usize,
    pub likes: u64,
    pub author: AuthorRef,
    pub created_at: DateTime<FixedOffset>,
    /// e.g. "3 hours ago"
    pub created_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyView {
    pub id: Option<String>,
    pub content: String,
    pub author: AuthorRef,
    pub created_label: String,
}

/// A post with every tag and its replies, oldest reply first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub post: PostSummary,
    pub replies: Vec<ReplyView>,
}

pub struct CommunityFeed {
    repository: Arc<dyn CommunityRepository>,
}

impl CommunityFeed {
    pub fn new(repository: Arc<dyn CommunityRepository>) -> Self {
        Self { repository }
    }

    /// Lists posts newest first, labelled for `locale`.
    pub async fn list(&self, locale: Locale) -> Result<Vec<PostSummary>> {
        let posts = self.repository.list_posts().await?;
        let now = Utc::now();
        tracing::debug!("[CommunityFeed] Listing {} posts", posts.len());
        Ok(posts
            .into_iter()
            .map(|post| summarize(post, &now, locale, Some(SUMMARY_TAG_LIMIT)))
            .collect())
    }

    /// Loads one post with its replies.
    ///
    /// # Errors
    ///
    /// `FitfeedError::NotFound` when no post has `post_id`.
    pub async fn detail(&self, post_id: &str, locale: Locale) -> Result<PostDetail> {
        let post = self
            .repository
            .get_post(post_id)
            .await?
            .ok_or_else(|| FitfeedError::not_found("post", post_id))?;
        let replies = self.repository.list_replies(post_id).await?;
        let now = Utc::now();

        Ok(PostDetail {
            post: summarize(post, &now, locale, None),
            replies: replies
                .into_iter()
                .map(|reply| reply_view(reply, &now, locale))
                .collect(),
        })
    }
}

/// Relative label for a row timestamp. Timestamps ahead of the device clock
/// are shown as "just now".
fn relative_label(timestamp: &DateTime<FixedOffset>, now: &DateTime<Utc>, locale: Locale) -> String {
    format_relative_date_at(timestamp, now, locale).unwrap_or_else(|_| {
        tracing::debug!("[CommunityFeed] Timestamp {} is ahead of the clock", timestamp);
        locale.just_now().to_string()
    })
}

fn summarize(
    post: Post,
    now: &DateTime<Utc>,
    locale: Locale,
    tag_limit: Option<usize>,
) -> PostSummary {
    let mut tags = post.tags;
    let total = tags.len();
    if let Some(limit) = tag_limit {
        tags.truncate(limit);
    }
    let hidden_tag_count = total - tags.len();
    PostSummary {
        created_label: relative_label(&post.created_at, now, locale),
        id: post.id,
        title: post.title,
        content: post.content,
        tags,
        hidden_tag_count,
        likes: post.stats.likes,
        author: post.author,
        created_at: post.created_at,
    }
}

fn reply_view(reply: Reply, now: &DateTime<Utc>, locale: Locale) -> ReplyView {
    ReplyView {
        created_label: relative_label(&reply.created_at, now, locale),
        id: reply.id,
        content: reply.content,
        author: reply.author,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Duration;
    use fitfeed_core::community::PostStats;

    fn author(name: &str) -> AuthorRef {
        AuthorRef {
            profile_id: None,
            display_name: name.to_string(),
            avatar_url: None,
        }
    }

    fn ago(delta: Duration) -> DateTime<FixedOffset> {
        (Utc::now() - delta).fixed_offset()
    }

    struct FakeRepository {
        posts: Vec<Post>,
        replies: Vec<Reply>,
    }

    #[async_trait]
    impl CommunityRepository for FakeRepository {
        async fn list_posts(&self) -> Result<Vec<Post>> {
            Ok(self.posts.clone())
        }

        async fn get_post(&self, post_id: &str) -> Result<Option<Post>> {
            Ok(self.posts.iter().find(|p| p.id == post_id).cloned())
        }

        async fn list_replies(&self, post_id: &str) -> Result<Vec<Reply>> {
            Ok(self
                .replies
                .iter()
                .filter(|r| r.post_id == post_id)
                .cloned()
                .collect())
        }
    }

    fn feed() -> CommunityFeed {
        let post = Post {
            id: "1".to_string(),
            title: "Squat form check".to_string(),
            content: "Knees caving in?".to_string(),
            tags: vec!["squat".into(), "form".into(), "beginner".into()],
            stats: PostStats { likes: 4 },
            created_at: ago(Duration::hours(2)),
            author: author("Mina"),
        };
        let replies = vec![
            Reply {
                id: Some("r1".to_string()),
                post_id: "1".to_string(),
                content: "Push knees out".to_string(),
                created_at: ago(Duration::days(3)),
                author: author("Joon"),
            },
            Reply {
                id: Some("r2".to_string()),
                post_id: "1".to_string(),
                content: "From the future".to_string(),
                created_at: ago(-Duration::minutes(10)),
                author: author("Skew"),
            },
        ];
        CommunityFeed::new(Arc::new(FakeRepository {
            posts: vec![post],
            replies,
        }))
    }

    #[tokio::test]
    async fn test_list_labels_and_limits_tags() {
        let summaries = feed().list(Locale::Ko).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].created_label, "2시간 전");
        assert_eq!(summaries[0].tags, vec!["squat", "form"]);
        assert_eq!(summaries[0].hidden_tag_count, 1);
        assert_eq!(summaries[0].likes, 4);
    }

    #[tokio::test]
    async fn test_detail_includes_replies() {
        let detail = feed().detail("1", Locale::En).await.unwrap();
        assert_eq!(detail.post.tags.len(), 3);
        assert_eq!(detail.post.hidden_tag_count, 0);
        assert_eq!(detail.post.created_label, "2 hours ago");
        assert_eq!(detail.replies.len(), 2);
        assert_eq!(detail.replies[0].created_label, "3 days ago");
        assert_eq!(detail.replies[1].created_label, "just now");
    }

    #[tokio::test]
    async fn test_detail_missing_post_is_not_found() {
        let err = feed().detail("404", Locale::En).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
