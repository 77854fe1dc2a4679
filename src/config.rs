// src/config.rs
use crate::api::ChatCache;
use crate::error::AppError;
use crate::types::{BasicCredentials, Creator, ObjectId, ObjectType, Organization};
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Organization name, as in https://<org>.ryver.com
    #[arg(long, global = true, env = "RYVER_ORG")]
    pub org: Option<String>,

    /// Username to log in as
    #[arg(short, long, global = true, env = "RYVER_USER")]
    pub user: Option<String>,

    /// Password (prompted for when not given)
    #[arg(long, global = true, env = "RYVER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Directory for cached chat listings (defaults to ~/.cache/ryver)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// List chats of one kind: users, forums or workrooms
    Chats {
        token: ObjectType,

        /// Fetch at most this many
        #[arg(long)]
        top: Option<usize>,

        /// Skip this many first
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Ignore the cached listing and fetch it again
        #[arg(long, default_value_t = false)]
        refresh: bool,
    },

    /// List notifications, newest first
    Notifications {
        /// Only unread notifications
        #[arg(long, default_value_t = false)]
        unread: bool,

        #[arg(long)]
        top: Option<usize>,

        #[arg(long, default_value_t = 0)]
        skip: usize,
    },

    /// Mark every notification as read
    MarkRead,

    /// Mark every notification as seen
    MarkSeen,

    /// Send a message to a chat
    Send {
        token: ObjectType,
        id: ObjectId,
        text: String,

        #[command(flatten)]
        creator: CreatorArgs,
    },

    /// Create a topic in a chat
    Topic {
        token: ObjectType,
        id: ObjectId,
        subject: String,
        body: String,

        #[command(flatten)]
        creator: CreatorArgs,
    },
}

/// Post under another display name and avatar.
#[derive(clap::Args, Debug, Clone, PartialEq, Default)]
pub struct CreatorArgs {
    #[arg(long, requires = "as_avatar")]
    pub as_name: Option<String>,

    #[arg(long, requires = "as_name")]
    pub as_avatar: Option<String>,
}

impl CreatorArgs {
    pub fn creator(&self) -> Option<Creator> {
        match (&self.as_name, &self.as_avatar) {
            (Some(name), Some(avatar)) => Some(Creator::new(name, avatar)),
            _ => None,
        }
    }
}

/// Asks the person at the terminal for a missing credential.
pub trait CredentialPrompt {
    fn ask(&mut self, label: &str) -> Result<String, AppError>;

    /// Like [`ask`](Self::ask), but the answer is not echoed.
    fn ask_secret(&mut self, label: &str) -> Result<String, AppError>;
}

/// Reads answers line by line from stdin; secrets are read from the
/// terminal in raw mode so nothing is echoed.
pub struct StdinPrompt;

impl CredentialPrompt for StdinPrompt {
    fn ask(&mut self, label: &str) -> Result<String, AppError> {
        eprint!("{}: ", label);
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask_secret(&mut self, label: &str) -> Result<String, AppError> {
        eprint!("{}: ", label);
        std::io::stderr().flush()?;
        enable_raw_mode()?;
        let secret = read_secret(event::read);
        // restore the terminal even when reading failed
        disable_raw_mode()?;
        eprintln!();
        secret
    }
}

/// Collects key presses up to Enter. Backspace deletes; Ctrl-C cancels.
fn read_secret(
    mut next_event: impl FnMut() -> std::io::Result<Event>,
) -> Result<String, AppError> {
    let mut secret = String::new();
    loop {
        let Event::Key(key) = next_event()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Backspace => {
                secret.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(AppError::MissingConfiguration(
                    "password entry cancelled".to_string(),
                ))
            }
            KeyCode::Char(c) => secret.push(c),
            _ => {}
        }
    }
}

/// Organization, user and password, complete.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub organization: Organization,
    pub basic: BasicCredentials,
}

impl Credentials {
    /// Uses what was given and asks `prompt` for the rest.
    pub fn resolve(
        org: Option<String>,
        user: Option<String>,
        password: Option<String>,
        prompt: &mut dyn CredentialPrompt,
    ) -> Result<Self, AppError> {
        let org = match org {
            Some(org) => org,
            None => prompt.ask("Organization")?,
        };
        let user = match user {
            Some(user) => user,
            None => prompt.ask("Username")?,
        };
        let password = match password {
            Some(password) => password,
            None => prompt.ask_secret("Password")?,
        };

        let organization = Organization::new(org)?;
        let basic = BasicCredentials::new(user, password)?;
        Ok(Self {
            organization,
            basic,
        })
    }
}

/// Resolved configuration: everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub credentials: Credentials,
    pub cache_dir: PathBuf,
    pub verbose: bool,
}

impl SessionConfig {
    pub fn resolve(
        cli: &CommandLineInput,
        prompt: &mut dyn CredentialPrompt,
    ) -> Result<Self, AppError> {
        let credentials = Credentials::resolve(
            cli.org.clone(),
            cli.user.clone(),
            cli.password.clone(),
            prompt,
        )?;
        let cache_dir = cli
            .cache_dir
            .clone()
            .unwrap_or_else(ChatCache::default_cache_dir);

        Ok(Self {
            credentials,
            cache_dir,
            verbose: cli.verbose,
        })
    }

    pub fn cache(&self) -> ChatCache {
        ChatCache::new(&self.cache_dir)
    }
}
