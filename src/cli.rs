//! Command-line arguments.

use std::path::PathBuf;

use chanline_rest::{GetChannelMessagesParams, Snowflake};
use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "chanline")]
#[command(about = "Send, read and delete channel messages over the Discord REST API")]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, env = "CHANLINE_CONFIG", default_value = "config.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Post a message, optionally with file attachments
    Send {
        channel: Snowflake,
        content: String,

        /// Wrap the content and every attachment in spoiler tags
        #[arg(long, default_value_t = false)]
        spoiler: bool,

        /// Read the message aloud
        #[arg(long, default_value_t = false)]
        tts: bool,

        /// File to attach (repeatable)
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
    /// Fetch a single message
    Fetch {
        channel: Snowflake,
        message: Snowflake,
    },
    /// List messages in a channel, newest first
    List {
        channel: Snowflake,

        #[command(flatten)]
        filter: ListFilter,
    },
    /// Replace the content of a message
    Edit {
        channel: Snowflake,
        message: Snowflake,
        content: String,
    },
    /// Delete a single message
    Delete {
        channel: Snowflake,
        message: Snowflake,
    },
    /// Delete 2 to 100 messages at once
    BulkDelete {
        channel: Snowflake,

        #[arg(required = true)]
        messages: Vec<Snowflake>,
    },
}

/// Options for `list`.
#[derive(ClapArgs, Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    /// Maximum number of messages (1-100)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Messages around this ID
    #[arg(long, conflicts_with_all = ["before", "after"])]
    pub around: Option<Snowflake>,

    /// Messages before this ID
    #[arg(long, conflicts_with = "after")]
    pub before: Option<Snowflake>,

    /// Messages after this ID
    #[arg(long)]
    pub after: Option<Snowflake>,
}

impl From<ListFilter> for GetChannelMessagesParams {
    fn from(filter: ListFilter) -> Self {
        Self {
            around: filter.around,
            before: filter.before,
            after: filter.after,
            limit: filter.limit,
        }
    }
}

impl Command {
    /// Name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Send { .. } => "send",
            Command::Fetch { .. } => "fetch",
            Command::List { .. } => "list",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::BulkDelete { .. } => "bulk-delete",
        }
    }
}
