// src/lib.rs
//! ryver library: a typed client for Ryver's OData REST API.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Session**: `Session`, the entry point to one organization
//! - **Domain model**: `User`, `Forum`, `Team`, `Topic`, `TopicReply`,
//!   `ChatMessage`, `Notification`, and the `Object`/`Message`/`Chat` traits
//! - **Domain types**: `ObjectType`, `ObjectId`, `Organization`, `Creator`
//! - **API plumbing**: `Transport`, `RyverHttpClient`, `fetch_all_records`,
//!   `ChatCache`

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod model;
pub mod session;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, Result, RyverErrorCode};
pub use crate::types::ValidationError;

// --- Session ---
pub use crate::session::Session;

// --- Domain Model ---
pub use crate::model::{
    find_by_field, AnyChat, Chat, ChatMessage, Forum, GroupChat, Message, Notification, Object,
    Record, RyverObject, Team, Topic, TopicReply, User,
};

// --- Domain Types ---
pub use crate::types::{BasicCredentials, Creator, ObjectId, ObjectType, Organization};

// --- API ---
pub use crate::api::{fetch_all_records, ChatCache, QueryJoin, RyverHttpClient, Transport};
