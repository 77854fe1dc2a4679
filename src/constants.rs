// src/constants.rs
//! Domain constants that define the operational boundaries of the client.
//!
//! Reading these constants should tell you how the client talks to
//! Ryver: how many records a page holds and which record fields and
//! notification predicates it knows by name.

// ---------------------------------------------------------------------------
// Ryver API boundaries
// ---------------------------------------------------------------------------

/// How many records the Ryver OData service returns per request at most.
///
/// The service silently truncates larger `$top` values to this cap, so the
/// paginator never asks for more.
pub const RYVER_API_PAGE_SIZE: usize = 50;

/// Host suffix appended to the organization name.
pub const RYVER_HOST_SUFFIX: &str = "ryver.com";

/// Path of the OData service below the organization host.
pub const RYVER_API_PATH: &str = "/api/1/odata.svc/";

// ---------------------------------------------------------------------------
// Record field names
// ---------------------------------------------------------------------------

pub const FIELD_USER_USERNAME: &str = "username";
pub const FIELD_USER_EMAIL_ADDR: &str = "emailAddress";
pub const FIELD_USER_DISPLAY_NAME: &str = "displayName";

pub const FIELD_NAME: &str = "name";
pub const FIELD_NICKNAME: &str = "nickname";
pub const FIELD_ID: &str = "id";

// ---------------------------------------------------------------------------
// Notification predicates
// ---------------------------------------------------------------------------

/// The user was @mentioned directly.
pub const NOTIF_PREDICATE_MENTION: &str = "chat_mention";

/// The user was mentioned through @team or @here.
pub const NOTIF_PREDICATE_GROUP_MENTION: &str = "group_mention";

/// A topic the user follows was commented on.
pub const NOTIF_PREDICATE_COMMENT: &str = "commented_on";

/// A task was completed.
pub const NOTIF_PREDICATE_TASK_COMPLETED: &str = "completed";
