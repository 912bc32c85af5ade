//! Text rendering of a comment thread.
//!
//! Reads [`CommentThread`] state only and never fetches.

use std::fmt::Write as _;

use super::CommentThread;
use super::ReplyState;
use crate::model::Comment;

const INDENT: usize = 4;

/// Renders `comments` and every visible reply below them as text.
pub fn render_thread(thread: &CommentThread, comments: &[Comment]) -> String {
    let mut out = String::new();
    for comment in comments {
        render_comment(thread, comment, 0, &mut out);
    }
    out
}

fn render_comment(thread: &CommentThread, comment: &Comment, depth: usize, out: &mut String) {
    let pad = " ".repeat(depth * INDENT);
    let state = thread
        .state(&comment.id)
        .unwrap_or_else(|| ReplyState::seeded(comment));

    let _ = write!(out, "{pad}{}: {}", comment.author(), comment.content);
    if let Some(created_at) = comment.created_at() {
        let _ = write!(out, " ({})", created_at.format("%Y-%m-%d %H:%M"));
    }
    out.push('\n');

    let like = if state.liked { "liked" } else { "likes" };
    let _ = write!(out, "{pad}  {} {like}", state.likes);
    if state.reply_count > 0 {
        let arrow = if state.visible { "▾" } else { "▸" };
        let _ = write!(out, " | {arrow} {} replies", state.reply_count);
    }
    out.push('\n');

    if !state.visible {
        return;
    }

    let child_pad = " ".repeat((depth + 1) * INDENT);
    match state.replies.as_deref() {
        None if state.loading => {
            let _ = writeln!(out, "{child_pad}Loading replies...");
        }
        None | Some([]) => {
            let _ = writeln!(out, "{child_pad}No replies yet.");
        }
        Some(replies) => {
            for reply in replies {
                render_comment(thread, reply, depth + 1, out);
            }
            if state.loading {
                let _ = writeln!(out, "{child_pad}Loading replies...");
            } else if state.has_more {
                let _ = writeln!(out, "{child_pad}Load more replies");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::api::Page;
    use crate::error::Error;
    use crate::model::CommentUser;
    use crate::model::NewReply;
    use crate::thread::ReplySource;

    struct TwoReplies;

    #[async_trait]
    impl ReplySource for TwoReplies {
        async fn replies(&self, comment_id: &str, page: u32) -> Result<Page<Comment>, Error> {
            if comment_id == "empty" {
                return Ok(Page::new(page, Vec::new()));
            }
            let items = vec![comment("r1", "first", 0), comment("r2", "second", 1)];
            Ok(Page::new(page, items).with_has_more(true))
        }

        async fn add_reply(&self, _reply: &NewReply) -> Result<Option<Comment>, Error> {
            Ok(None)
        }
    }

    fn comment(id: &str, content: &str, reply_count: u32) -> Comment {
        Comment {
            id: id.into(),
            user: Some(CommentUser {
                id: "u1".into(),
                name: "Abel".into(),
                profile_image_url: None,
                academic_year: None,
            }),
            content: content.into(),
            created_at: Some("2024-05-01T10:00:00Z".into()),
            likes: 2,
            reply_count,
        }
    }

    fn thread() -> CommentThread {
        CommentThread::with_shared_source(Arc::new(TwoReplies), "p1")
    }

    #[test]
    fn test_collapsed_comment() {
        let text = render_thread(&thread(), &[comment("c1", "hello", 2)]);
        assert_eq!(
            text,
            "Abel: hello (2024-05-01 10:00)\n  2 likes | ▸ 2 replies\n"
        );
    }

    #[tokio::test]
    async fn test_visible_replies_are_indented() {
        let thread = thread();
        let root = comment("c1", "hello", 2);
        thread.toggle_replies(&root).await;

        let text = render_thread(&thread, &[root]);
        let lines: Vec<_> = text.lines().collect();
        assert!(lines[1].contains("▾ 2 replies"));
        assert!(lines[2].starts_with("    Abel: first"));
        assert!(lines[4].starts_with("    Abel: second"));
        assert_eq!(lines.last(), Some(&"    Load more replies"));
    }

    #[tokio::test]
    async fn test_empty_reply_page() {
        let thread = thread();
        let root = comment("empty", "anyone?", 1);
        thread.toggle_replies(&root).await;

        let text = render_thread(&thread, &[root]);
        assert!(text.ends_with("    No replies yet.\n"));
    }

    #[test]
    fn test_like_toggle_is_rendered() {
        let thread = thread();
        let root = comment("c1", "hello", 0);
        thread.toggle_like(&root);

        let text = render_thread(&thread, &[root]);
        assert!(text.contains("  3 liked\n"));
        assert!(!text.contains("replies"));
    }
}
