//! Subcommand implementations.

use std::io::Write as _;

use anyhow::Context;
use anyhow::Result;
use iknow_lib::IKnowClient;
use iknow_lib::model::Comment;
use iknow_lib::thread::CommentThread;
use iknow_lib::thread::render_thread;
use iknow_lib::tree::Expansion;
use iknow_lib::tree::FlatNode;
use iknow_lib::tree::RenderOptions;
use iknow_lib::tree::TreeController;
use iknow_lib::tree::flatten;
use iknow_lib::tree::render_tree;
use tokio::io::AsyncBufReadExt;
use tokio::io::BufReader;

const BROWSE_HELP: &str = "commands: x <row> toggle, o <row> open material, r redraw, q quit";

/// `iknow tree`
pub async fn tree(client: IKnowClient, depth: usize) -> Result<()> {
    let tree = TreeController::new(client);
    tree.initialize().await;
    tree.expand_to_depth(depth).await;

    print!("{}", render_tree(&tree.snapshot(), &RenderOptions::default()));
    Ok(())
}

/// One line of input in browse mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BrowseCommand {
    Toggle(usize),
    Open(usize),
    Redraw,
    Quit,
}

fn parse_command(line: &str) -> Option<BrowseCommand> {
    let mut words = line.split_whitespace();
    let command = words.next()?;
    let row = words.next().and_then(|w| w.parse::<usize>().ok());
    if words.next().is_some() {
        return None;
    }

    match (command, row) {
        ("x", Some(row)) => Some(BrowseCommand::Toggle(row)),
        ("o", Some(row)) => Some(BrowseCommand::Open(row)),
        ("r", None) => Some(BrowseCommand::Redraw),
        ("q", None) => Some(BrowseCommand::Quit),
        _ => None,
    }
}

/// Looks up a 1-based row number.
fn row(rows: &[FlatNode], number: usize) -> Option<&FlatNode> {
    number.checked_sub(1).and_then(|index| rows.get(index))
}

fn draw(tree: &TreeController) {
    let options = RenderOptions {
        numbered: true,
        ..Default::default()
    };
    print!("{}", render_tree(&tree.snapshot(), &options));
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("failed to flush stdout")
}

/// `iknow browse`
pub async fn browse(client: IKnowClient) -> Result<()> {
    let tree = TreeController::new(client);
    tree.initialize().await;

    println!("{BROWSE_HELP}");
    draw(&tree);
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let rows = flatten(&tree.snapshot());
        match parse_command(&line) {
            Some(BrowseCommand::Quit) => break,
            Some(BrowseCommand::Redraw) => draw(&tree),
            Some(BrowseCommand::Toggle(number)) => match row(&rows, number) {
                Some(selected) => {
                    if tree.expand(&selected.node).await == Expansion::Ignored {
                        println!("{} is a material; use `o {number}` to open it", selected.node.name);
                    } else {
                        draw(&tree);
                    }
                }
                None => println!("no row {number}"),
            },
            Some(BrowseCommand::Open(number)) => match row(&rows, number).map(|r| r.node.url()) {
                Some(Some(url)) => {
                    log::info!("opening {}", url);
                    if let Err(e) = open::that(url) {
                        println!("could not open {url}: {e}");
                    }
                }
                Some(None) => println!("row {number} has no file"),
                None => println!("no row {number}"),
            },
            None if line.trim().is_empty() => {}
            None => println!("{BROWSE_HELP}"),
        }
        prompt()?;
    }
    Ok(())
}

/// Stands in for a comment known only by its id.
///
/// The reply count is non-zero so the thread fetches its replies.
fn parent(comment_id: &str) -> Comment {
    Comment {
        id: comment_id.to_string(),
        user: None,
        content: String::new(),
        created_at: None,
        likes: 0,
        reply_count: 1,
    }
}

fn print_replies(thread: &CommentThread, comment_id: &str, limit: usize) {
    let replies = thread.replies(comment_id);
    if replies.is_empty() {
        println!("No replies yet.");
    } else {
        print!("{}", render_thread(thread, &replies[..replies.len().min(limit)]));
    }
}

/// `iknow replies`
pub async fn replies(
    client: IKnowClient,
    post_id: &str,
    comment_id: &str,
    count: usize,
) -> Result<()> {
    let thread = CommentThread::new(client, post_id);
    let root = parent(comment_id);

    thread.toggle_replies(&root).await;
    while thread.replies(comment_id).len() < count
        && thread.state(comment_id).is_some_and(|s| s.has_more)
    {
        let before = thread.replies(comment_id).len();
        if thread.load_more(&root).await == before {
            break;
        }
    }

    print_replies(&thread, comment_id, count);
    Ok(())
}

/// `iknow reply`
pub async fn reply(
    client: IKnowClient,
    post_id: &str,
    comment_id: &str,
    text: &str,
) -> Result<()> {
    let thread = CommentThread::new(client, post_id);

    thread
        .post_reply(&parent(comment_id), text)
        .await
        .with_context(|| format!("failed to reply to comment {comment_id}"))?;

    println!("Reply posted.");
    print_replies(&thread, comment_id, usize::MAX);
    Ok(())
}

#[cfg(test)]
mod tests {
    use iknow_lib::model::NodeData;
    use iknow_lib::model::TreeNode;

    use super::*;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("x 3"), Some(BrowseCommand::Toggle(3)));
        assert_eq!(parse_command("  o 12 "), Some(BrowseCommand::Open(12)));
        assert_eq!(parse_command("r"), Some(BrowseCommand::Redraw));
        assert_eq!(parse_command("q"), Some(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_command_rejects_garbage() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("x"), None);
        assert_eq!(parse_command("x two"), None);
        assert_eq!(parse_command("q 1"), None);
        assert_eq!(parse_command("x 1 2"), None);
    }

    #[test]
    fn test_parent_can_fetch_replies() {
        let comment = parent("c1");
        assert_eq!(comment.id, "c1");
        assert!(comment.reply_count > 0);
    }

    #[tokio::test]
    async fn test_blank_reply_is_rejected_before_sending() {
        let client = IKnowClient::builder()
            .url("http://127.0.0.1:9")
            .token_provider(iknow_lib::auth::NoToken)
            .build()
            .unwrap();

        let err = reply(client, "p1", "c1", "   ").await.unwrap_err();
        assert!(format!("{err:#}").contains("reply content is empty"));
    }

    #[test]
    fn test_row_is_one_based() {
        let rows = vec![FlatNode {
            node: TreeNode::new("u1", "Test University", NodeData::University),
            depth: 0,
            expandable: true,
            expanded: false,
            loading: false,
            failed: false,
        }];
        assert!(row(&rows, 0).is_none());
        assert_eq!(row(&rows, 1).map(|r| r.node.id.as_str()), Some("u1"));
        assert!(row(&rows, 2).is_none());
    }
}
