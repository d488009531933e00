use serde::{Deserialize, Serialize};

pub type ItemId = i64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: ItemId,
    pub title: String,
    pub is_completed: bool,
}

/// Request body for create and update.
///
/// Every field is optional on the wire so that a missing title reaches
/// validation instead of failing deserialization. A client-supplied `id` is
/// accepted and ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemPayload {
    pub id: Option<ItemId>,
    pub title: Option<String>,
    pub is_completed: bool,
}

impl ItemPayload {
    /// The trimmed title, or `None` when it is missing or blank.
    pub fn trimmed_title(&self) -> Option<&str> {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|title| !title.is_empty())
    }
}
