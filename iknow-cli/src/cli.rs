//! Command-line definitions.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use iknow_lib::IKnowClient;
use iknow_lib::api::DEFAULT_PAGE_SIZE;
use iknow_lib::api::PagingPolicy;
use iknow_lib::auth::FileTokenProvider;
use iknow_lib::auth::NoToken;
use iknow_lib::auth::StaticTokenProvider;
use iknow_lib::auth::TokenProvider;
use simplelog::LevelFilter;

use crate::commands;
use crate::paths;

/// Browse IKnow course materials and comment threads from the terminal.
#[derive(Debug, Parser)]
#[command(name = "iknow", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Connection and logging options shared by every subcommand.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Base URL of the IKnow API, e.g. `http://localhost:8080/api`.
    #[arg(long, env = "IKNOW_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Bearer token. Takes precedence over `--token-file`.
    #[arg(long, env = "IKNOW_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// File holding the bearer token, re-read on every request.
    ///
    /// Defaults to `token` in the config directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub token_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Keep requesting school pages while a page comes back full, even
    /// without a `hasMore` flag from the server.
    #[arg(long, global = true)]
    pub full_page_paging: bool,

    /// Items in a full school page, used with `--full-page-paging` when the
    /// server does not report its page size.
    #[arg(long, global = true, value_name = "N", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Log level written to `latest.log` in the cache directory.
    #[arg(long, env = "IKNOW_LOG", global = true, default_value = "info")]
    pub log_level: LevelFilter,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the materials tree.
    Tree {
        /// Number of levels to expand below the universities.
        #[arg(long, default_value_t = 1)]
        depth: usize,
    },

    /// Browse the tree interactively.
    Browse,

    /// Show the replies to a comment.
    Replies {
        comment_id: String,

        /// Post the comment belongs to.
        #[arg(long = "post", value_name = "POST_ID")]
        post_id: String,

        /// Keep loading pages until at least this many replies are shown.
        #[arg(long, default_value_t = 20)]
        count: usize,
    },

    /// Reply to a comment.
    Reply {
        comment_id: String,

        /// Post the comment belongs to.
        #[arg(long = "post", value_name = "POST_ID")]
        post_id: String,

        /// Reply text.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

impl Cli {
    /// Runs the selected subcommand.
    pub async fn execute(self) -> Result<()> {
        let client = self.global.client()?;
        match self.command {
            Command::Tree { depth } => commands::tree(client, depth).await,
            Command::Browse => commands::browse(client).await,
            Command::Replies {
                comment_id,
                post_id,
                count,
            } => commands::replies(client, &post_id, &comment_id, count).await,
            Command::Reply {
                comment_id,
                post_id,
                text,
            } => commands::reply(client, &post_id, &comment_id, &text.join(" ")).await,
        }
    }
}

impl GlobalArgs {
    /// Picks the token source: `--token`, then the token file.
    pub fn token_provider(&self) -> Arc<dyn TokenProvider> {
        if let Some(token) = self.token.as_deref().filter(|t| !t.trim().is_empty()) {
            return Arc::new(StaticTokenProvider::new(token.trim()));
        }
        match self.token_file.clone().or_else(paths::token_file) {
            Some(path) => {
                log::debug!("reading token from {}", path.display());
                Arc::new(FileTokenProvider::new(path))
            }
            None => Arc::new(NoToken),
        }
    }

    pub fn paging_policy(&self) -> PagingPolicy {
        if self.full_page_paging {
            PagingPolicy::FullPageHeuristic {
                page_size: self.page_size,
            }
        } else {
            PagingPolicy::ExplicitOnly
        }
    }

    /// Builds the API client from the flags.
    pub fn client(&self) -> Result<IKnowClient> {
        let base_url = self
            .base_url
            .clone()
            .context("no API base URL; pass --base-url or set IKNOW_BASE_URL")?;

        let mut builder = IKnowClient::builder()
            .url(base_url)
            .shared_token_provider(self.token_provider())
            .paging_policy(self.paging_policy());
        if let Some(secs) = self.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(builder.build()?)
    }
}
