//! Nested comment threads
//!
//! Replies are fetched the first time a comment's replies are shown, cached,
//! and paged with an explicit `hasMore` flag from the server.

mod render;

pub use render::render_thread;

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;

use crate::IKnowClient;
use crate::api::Page;
use crate::error::Error;
use crate::model::Comment;
use crate::model::NewReply;

/// The reply endpoints a thread needs. [`IKnowClient`] is the production
/// implementation.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn replies(&self, comment_id: &str, page: u32) -> Result<Page<Comment>, Error>;

    /// Returns the created reply if the server echoes it.
    async fn add_reply(&self, reply: &NewReply) -> Result<Option<Comment>, Error>;
}

#[async_trait]
impl ReplySource for IKnowClient {
    async fn replies(&self, comment_id: &str, page: u32) -> Result<Page<Comment>, Error> {
        IKnowClient::replies(self, comment_id, page).await
    }

    async fn add_reply(&self, reply: &NewReply) -> Result<Option<Comment>, Error> {
        IKnowClient::add_reply(self, reply).await
    }
}

/// Local state of one comment.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyState {
    pub visible: bool,
    pub loading: bool,
    /// `None` until the first page has been fetched.
    pub replies: Option<Vec<Comment>>,
    /// Last page fetched.
    pub page: u32,
    pub has_more: bool,
    pub reply_count: u32,
    pub liked: bool,
    pub likes: i64,
}

impl ReplyState {
    fn seeded(comment: &Comment) -> Self {
        Self {
            visible: false,
            loading: false,
            replies: None,
            page: 0,
            has_more: false,
            reply_count: comment.reply_count,
            liked: false,
            likes: comment.likes,
        }
    }
}

/// Controller for the comments under one post.
pub struct CommentThread {
    source: Arc<dyn ReplySource>,
    post_id: String,
    states: DashMap<String, ReplyState>,
}

impl CommentThread {
    /// Creates a thread for the given post.
    pub fn new(source: impl ReplySource + 'static, post_id: impl Into<String>) -> Self {
        Self::with_shared_source(Arc::new(source), post_id)
    }

    pub fn with_shared_source(source: Arc<dyn ReplySource>, post_id: impl Into<String>) -> Self {
        Self {
            source,
            post_id: post_id.into(),
            states: DashMap::new(),
        }
    }

    fn entry(&self, comment: &Comment) -> RefMut<'_, String, ReplyState> {
        self.states
            .entry(comment.id.clone())
            .or_insert_with(|| ReplyState::seeded(comment))
    }

    /// Shows or hides a comment's replies. Returns whether they are visible.
    ///
    /// Comments without replies are left alone. The first show fetches page 1.
    pub async fn toggle_replies(&self, comment: &Comment) -> bool {
        let fetch = {
            let mut state = self.entry(comment);
            if state.reply_count == 0 {
                return false;
            }
            state.visible = !state.visible;
            let fetch = state.visible && state.replies.is_none() && !state.loading;
            if fetch {
                state.loading = true;
            }
            fetch
        };

        if fetch {
            self.fetch_page(&comment.id, 1).await;
        }
        self.state(&comment.id).is_some_and(|s| s.visible)
    }

    /// Fetches the next page of replies when the server said there is one.
    ///
    /// Returns the number of cached replies afterwards.
    pub async fn load_more(&self, comment: &Comment) -> usize {
        let next = {
            let mut state = self.entry(comment);
            if !state.has_more || state.loading {
                None
            } else {
                state.loading = true;
                Some(state.page + 1)
            }
        };

        if let Some(page) = next {
            self.fetch_page(&comment.id, page).await;
        }
        self.replies(&comment.id).len()
    }

    /// Posts a reply to `comment` and makes the replies visible.
    ///
    /// An echoed reply is prepended to the cached replies; otherwise page 1 is
    /// fetched again.
    pub async fn post_reply(&self, comment: &Comment, content: &str) -> Result<(), Error> {
        if content.trim().is_empty() {
            return Err(Error::InvalidOperation("reply content is empty".to_string()));
        }

        let reply = NewReply {
            post_id: self.post_id.clone(),
            parent_comment_id: comment.id.clone(),
            content: content.to_string(),
        };
        let created = self.source.add_reply(&reply).await?;

        let refetch = {
            let mut state = self.entry(comment);
            state.reply_count += 1;
            state.visible = true;
            match (created, state.replies.is_some()) {
                (Some(created), true) => {
                    if let Some(replies) = state.replies.as_mut() {
                        replies.insert(0, created);
                    }
                    false
                }
                _ => {
                    state.loading = true;
                    true
                }
            }
        };

        if refetch {
            self.fetch_page(&comment.id, 1).await;
        }
        Ok(())
    }

    /// Flips the local like flag. Returns `(liked, likes)`.
    pub fn toggle_like(&self, comment: &Comment) -> (bool, i64) {
        let mut state = self.entry(comment);
        if state.liked {
            state.likes -= 1;
        } else {
            state.likes += 1;
        }
        state.liked = !state.liked;
        (state.liked, state.likes)
    }

    /// Returns a copy of a comment's state, if it was ever touched.
    pub fn state(&self, comment_id: &str) -> Option<ReplyState> {
        self.states.get(comment_id).map(|s| s.value().clone())
    }

    /// Returns the cached replies of a comment.
    pub fn replies(&self, comment_id: &str) -> Vec<Comment> {
        self.states
            .get(comment_id)
            .and_then(|s| s.replies.clone())
            .unwrap_or_default()
    }

    async fn fetch_page(&self, comment_id: &str, page: u32) {
        let result = self.source.replies(comment_id, page).await;

        let Some(mut state) = self.states.get_mut(comment_id) else {
            return;
        };
        state.loading = false;
        match result {
            Ok(fetched) => {
                state.has_more = fetched.has_more().unwrap_or(false);
                state.page = fetched.number();
                let items = fetched.into_items();
                if page > 1
                    && let Some(replies) = state.replies.as_mut()
                {
                    replies.extend(items);
                } else {
                    state.replies = Some(items);
                }
            }
            Err(e) => {
                log::warn!("failed to load replies of comment {} page {}: {}", comment_id, page, e);
            }
        }
    }
}
