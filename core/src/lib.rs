//! Client core for the list item API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern), and keeps a client-side copy
//! of the list that is updated optimistically and rolled back when the
//! server disagrees.
//!
//! # Design
//! - `ListItemClient` is stateless; it holds only the base URL.
//! - Each operation is split into `build_*` and `parse_*` so the I/O
//!   boundary is explicit.
//! - `ItemList` never performs I/O either: intents return `Call`s for the
//!   host to run, and outcomes come back through `ItemList::complete`.
//! - Wire types are defined independently from the server crate; the
//!   integration test catches schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod list;
pub mod types;

pub use client::ListItemClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{Call, ItemList, ListError, Notice, Row, RowKey, Ticket};
pub use types::{ItemId, ListItem, UNSAVED_ID};
