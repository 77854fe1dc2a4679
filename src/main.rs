// src/main.rs

use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use ryver::config::{Command, CommandLineInput, SessionConfig, StdinPrompt};
use ryver::{Chat, GroupChat, Message, Notification, Object, ObjectId, ObjectType, Session};

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries command output
    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .build(Root::builder().appender("stderr").build(log_level))?;

    log4rs::init_config(config)?;
    Ok(())
}

/// Runs one subcommand against an open session.
async fn execute(session: &Session, config: &SessionConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Chats {
            token,
            top,
            skip,
            refresh,
        } => {
            let chats = config
                .cache()
                .load_or_fetch(session, token, refresh, top, skip)
                .await
                .with_context(|| format!("listing {}", token))?;
            for chat in &chats {
                let nickname = chat
                    .as_group()
                    .and_then(|group| group.nickname().ok())
                    .unwrap_or("");
                println!("{}\t{}\t{}", chat.id(), chat.display_label()?, nickname);
            }
        }

        Command::Notifications { unread, top, skip } => {
            let notifications = session
                .get_notifications(unread, top, skip)
                .await
                .context("listing notifications")?;
            for notification in &notifications {
                println!("{}", notification_row(notification));
            }
        }

        Command::MarkRead => {
            let count = session.mark_all_notifications_read().await?;
            println!("Marked {} notifications read", count);
        }

        Command::MarkSeen => {
            let count = session.mark_all_notifications_seen().await?;
            println!("Marked {} notifications seen", count);
        }

        Command::Send {
            token,
            id,
            text,
            creator,
        } => {
            let chat = open_chat(session, token, id).await?;
            let message_id = chat.send_message(&text, creator.creator().as_ref()).await?;
            println!("Sent message {}", message_id);
        }

        Command::Topic {
            token,
            id,
            subject,
            body,
            creator,
        } => {
            let chat = open_chat(session, token, id).await?;
            let topic = chat
                .create_topic(&subject, &body, creator.creator().as_ref())
                .await?;
            println!("Created topic {}: {}", topic.id(), topic.subject()?);
            log::debug!("Topic body: {}", topic.body()?);
        }
    }

    Ok(())
}

/// One tab-separated listing line. Fields the record lacks render as `-`.
fn notification_row(notification: &Notification) -> String {
    let modified = notification
        .modified_at()
        .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| "-".to_string());
    let unread = if notification.is_unread().unwrap_or(false) {
        "*"
    } else {
        " "
    };
    let location = match (
        notification.source_location_type(),
        notification.source_location_id(),
    ) {
        (Ok(kind), Ok(id)) => format!("{}({})", kind, id),
        _ => "-".to_string(),
    };
    format!(
        "{}\t{}\t{}\t{}\t{}",
        modified,
        unread,
        notification.predicate().unwrap_or("-"),
        location,
        notification.message().unwrap_or(""),
    )
}

async fn open_chat(
    session: &Session,
    token: ObjectType,
    id: ObjectId,
) -> anyhow::Result<ryver::AnyChat> {
    session
        .get_chat(token, id.clone())
        .await
        .with_context(|| format!("opening {}({})", token, id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = SessionConfig::resolve(&cli, &mut StdinPrompt)?;
    let session = Session::new(&config.credentials.organization, &config.credentials.basic)?;

    execute(&session, &config, cli.command).await
}
