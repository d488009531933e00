//! Wire types for the list item API.
//!
//! # Design
//! Defined independently from the server crate so the client never links
//! axum; the integration test against a live server catches schema drift.

use serde::{Deserialize, Serialize};

pub type ItemId = i64;

/// Id carried by an item the server has not acknowledged yet.
pub const UNSAVED_ID: ItemId = 0;

/// A single list item as it travels over the wire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

impl ListItem {
    /// A fresh, not yet persisted item.
    pub fn unsaved(title: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            is_completed: false,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.id != UNSAVED_ID
    }
}
