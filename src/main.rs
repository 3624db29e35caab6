//! chanline - channel message client for the Discord REST API.
//!
//! Loads a TOML config, builds the HTTP transport and runs one resource
//! operation, printing the resulting message objects as JSON.

mod cli;
mod config;
mod http;
mod telemetry;

use std::fs::File;

use anyhow::Context;
use chanline_rest::{
    BulkDeleteMessagesParams, CreateChannelMessageFileParams, CreateChannelMessageParams,
    EditMessageParams, GetChannelMessagesParams, Message,
};
use clap::Parser;
use tracing::{error, info};

use crate::cli::{Args, Command};
use crate::config::{Config, LoggingConfig};
use crate::http::HttpTransport;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            telemetry::init(&LoggingConfig::default());
            error!(path = %args.config.display(), error = %e, "Failed to load config");
            return Err(e.into());
        }
    };
    telemetry::init(&config.logging);

    info!(
        command = args.command.name(),
        base_url = %config.api.base_url,
        "Starting chanline"
    );

    let http = HttpTransport::new(&config.api)?;
    if let Err(e) = run(&http, args.command).await {
        if let Some(err) = e.downcast_ref::<chanline_rest::Error>() {
            error!(code = err.error_code(), error = %err, "Request failed");
        }
        return Err(e);
    }
    Ok(())
}

async fn run(http: &HttpTransport, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Send {
            channel,
            content,
            spoiler,
            tts,
            files,
        } => {
            let mut draft = CreateChannelMessageParams::from_content(content);
            draft.tts = tts;
            draft.spoiler_tag_content = spoiler;
            draft.spoiler_tag_all_attachments = spoiler;
            for path in files {
                let file = File::open(&path)
                    .with_context(|| format!("failed to open {}", path.display()))?;
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string());
                draft = draft.with_file(CreateChannelMessageFileParams::new(file, name));
            }
            let msg = chanline_rest::create_channel_message(http, channel, draft).await?;
            print_message(&msg)?;
        }
        Command::Fetch { channel, message } => {
            let msg = chanline_rest::get_channel_message(http, channel, message).await?;
            print_message(&msg)?;
        }
        Command::List { channel, filter } => {
            let filter = GetChannelMessagesParams::from(filter);
            let messages = chanline_rest::get_channel_messages(http, channel, Some(&filter)).await?;
            info!(count = messages.len(), "Listed messages");
            println!("{}", serde_json::to_string_pretty(&messages)?);
        }
        Command::Edit {
            channel,
            message,
            content,
        } => {
            let params = EditMessageParams {
                content: Some(content),
                embed: None,
            };
            let msg = chanline_rest::edit_message(http, channel, message, &params).await?;
            print_message(&msg)?;
        }
        Command::Delete { channel, message } => {
            chanline_rest::delete_message(http, channel, message).await?;
            info!(channel = %channel, message = %message, "Deleted message");
        }
        Command::BulkDelete { channel, messages } => {
            let params = BulkDeleteMessagesParams::from_ids(messages);
            chanline_rest::bulk_delete_messages(http, channel, &params).await?;
            info!(channel = %channel, count = params.len(), "Bulk deleted messages");
        }
    }
    Ok(())
}

fn print_message(msg: &Message) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(msg)?);
    Ok(())
}
