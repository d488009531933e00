//! Client-side copy of the list, kept in step with the server.
//!
//! # Design
//! `ItemList` applies every user intent to its rows immediately and hands
//! back the `Call`s needed to tell the server. The host runs each call
//! however it likes (concurrently, in any order) and feeds the outcome to
//! [`ItemList::complete`], which either reconciles the row with the server's
//! record or rolls the change back and returns a [`Notice`].
//!
//! Rows are identified by [`RowKey`], never by position. Each row also
//! remembers the last record the server confirmed and a revision counter
//! bumped on every local edit; an outcome only touches a row whose revision
//! still matches the one it was issued for, so late responses cannot undo
//! newer edits. A late success still moves the confirmed record forward if
//! it is newer than the one the row holds.
//!
//! A load merges the server's list into the rows by id. Rows keep their
//! local identity across a load, so in-flight outcomes still find them, and
//! rows the server acknowledged after the load was sent survive it.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use crate::client::ListItemClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{ItemId, ListItem};

/// Client-local identity, stable across the unsaved → saved transition.
pub type LocalId = u64;

/// Identity used for rendering and for addressing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowKey {
    Saved(ItemId),
    Pending(LocalId),
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Saved(id) => write!(f, "#{id}"),
            RowKey::Pending(local) => write!(f, "pending-{local}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    local: LocalId,
    revision: u64,
    item: ListItem,
    confirmed: ListItem,
    /// Revision of the edit `confirmed` came from.
    confirmed_revision: u64,
    /// False while `item` shows an edit the server has not answered.
    settled: bool,
    /// Acknowledgement stamp of the create that saved this row; 0 if the
    /// row came from a load.
    saved_at: u64,
}

impl Row {
    fn new(local: LocalId, item: ListItem) -> Self {
        Self {
            local,
            revision: 0,
            confirmed: item.clone(),
            item,
            confirmed_revision: 0,
            settled: true,
            saved_at: 0,
        }
    }

    pub fn key(&self) -> RowKey {
        if self.item.is_saved() {
            RowKey::Saved(self.item.id)
        } else {
            RowKey::Pending(self.local)
        }
    }

    pub fn item(&self) -> &ListItem {
        &self.item
    }

    /// True until the server has acknowledged the row's creation.
    pub fn is_pending(&self) -> bool {
        !self.item.is_saved()
    }

    fn reconcile(&mut self, item: ListItem) {
        self.confirmed = item.clone();
        self.confirmed_revision = self.revision;
        self.item = item;
        self.settled = true;
    }

    fn roll_back(&mut self) {
        self.item = self.confirmed.clone();
        self.settled = true;
    }

    /// Take a server record that may be older than local edits.
    fn confirm(&mut self, item: ListItem) {
        if self.settled {
            self.item = item.clone();
        }
        self.confirmed = item;
    }
}

/// What an in-flight call was for, and what is needed to undo it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ticket {
    /// `since` is the acknowledgement count when the load was sent.
    Load { since: u64 },
    Create { local: LocalId },
    Update { local: LocalId, revision: u64 },
    Delete { row: Row },
}

/// One request the host must run, tagged with its ticket.
#[derive(Debug, Clone)]
pub struct Call {
    pub ticket: Ticket,
    pub request: HttpRequest,
}

/// A failure the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice(pub String);

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Intents rejected before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("title must not be blank")]
    BlankTitle,

    #[error("no item {0}")]
    UnknownRow(RowKey),

    #[error("\"{0}\" is still being saved")]
    Pending(String),

    #[error(transparent)]
    Request(#[from] ApiError),
}

#[derive(Debug, Clone)]
pub struct ItemList {
    client: ListItemClient,
    rows: Vec<Row>,
    next_local: LocalId,
    acks: u64,
    deleting: HashSet<ItemId>,
}

impl ItemList {
    pub fn new(client: ListItemClient) -> Self {
        Self {
            client,
            rows: Vec::new(),
            next_local: 1,
            acks: 0,
            deleting: HashSet::new(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn get(&self, key: RowKey) -> Option<&Row> {
        self.rows.iter().find(|row| row.key() == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.rows.iter().filter(|row| row.item.is_completed).count()
    }

    pub fn active_count(&self) -> usize {
        self.rows.iter().filter(|row| !row.item.is_completed).count()
    }

    fn alloc_local(&mut self) -> LocalId {
        let local = self.next_local;
        self.next_local += 1;
        local
    }

    fn position(&self, key: RowKey) -> Result<usize, ListError> {
        self.rows
            .iter()
            .position(|row| row.key() == key)
            .ok_or(ListError::UnknownRow(key))
    }

    fn position_of_local(&self, local: LocalId) -> Option<usize> {
        self.rows.iter().position(|row| row.local == local)
    }

    /// Position of a saved row that does not need an in-flight ack.
    fn saved_position(&self, key: RowKey) -> Result<usize, ListError> {
        let index = self.position(key)?;
        let row = &self.rows[index];
        if row.is_pending() {
            return Err(ListError::Pending(row.item.title.clone()));
        }
        Ok(index)
    }

    /// Fetch the full list from the server.
    pub fn load(&self) -> Call {
        Call {
            ticket: Ticket::Load { since: self.acks },
            request: self.client.build_list_items(),
        }
    }

    /// Show a new item right away and ask the server to create it.
    pub fn add(&mut self, title: &str) -> Result<Call, ListError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ListError::BlankTitle);
        }
        let item = ListItem::unsaved(title);
        let request = self.client.build_create_item(&item)?;
        let local = self.alloc_local();
        self.rows.push(Row::new(local, item));
        Ok(Call {
            ticket: Ticket::Create { local },
            request,
        })
    }

    /// Confirmation text for deleting one row.
    pub fn delete_prompt(&self, key: RowKey) -> Result<String, ListError> {
        let row = &self.rows[self.position(key)?];
        Ok(format!(
            "Are you sure you want to delete \"{}\"?",
            row.item.title
        ))
    }

    /// Drop a row right away and ask the server to delete it.
    pub fn delete(&mut self, key: RowKey) -> Result<Call, ListError> {
        let index = self.saved_position(key)?;
        let request = self.client.build_delete_item(self.rows[index].item.id);
        let row = self.rows.remove(index);
        self.deleting.insert(row.item.id);
        Ok(Call {
            ticket: Ticket::Delete { row },
            request,
        })
    }

    /// Flip completion right away and send the whole record.
    pub fn toggle_complete(&mut self, key: RowKey) -> Result<Call, ListError> {
        let index = self.saved_position(key)?;
        let mut item = self.rows[index].item.clone();
        item.is_completed = !item.is_completed;
        self.edit(index, item)
    }

    pub fn rename(&mut self, key: RowKey, title: &str) -> Result<Call, ListError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ListError::BlankTitle);
        }
        let index = self.saved_position(key)?;
        let mut item = self.rows[index].item.clone();
        item.title = title.to_string();
        self.edit(index, item)
    }

    fn edit(&mut self, index: usize, item: ListItem) -> Result<Call, ListError> {
        let request = self.client.build_update_item(&item)?;
        let row = &mut self.rows[index];
        row.item = item;
        row.revision += 1;
        row.settled = false;
        Ok(Call {
            ticket: Ticket::Update {
                local: row.local,
                revision: row.revision,
            },
            request,
        })
    }

    /// Confirmation text for clearing completed rows, or `None` if there
    /// is nothing to clear.
    pub fn clear_completed_prompt(&self) -> Option<String> {
        match self.completed_count() {
            0 => None,
            n => Some(format!("Delete {n} completed item(s)?")),
        }
    }

    /// Drop every completed row, issuing one independent delete per row.
    pub fn clear_completed(&mut self) -> Vec<Call> {
        let (done, keep): (Vec<Row>, Vec<Row>) = std::mem::take(&mut self.rows)
            .into_iter()
            .partition(|row| row.item.is_completed && !row.is_pending());
        self.rows = keep;
        self.deleting.extend(done.iter().map(|row| row.item.id));
        done.into_iter()
            .map(|row| Call {
                request: self.client.build_delete_item(row.item.id),
                ticket: Ticket::Delete { row },
            })
            .collect()
    }

    /// Apply the outcome of a call issued earlier by this list.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Option<Notice> {
        let notice = match ticket {
            Ticket::Load { since } => self.finish_load(since, outcome),
            Ticket::Create { local } => self.finish_create(local, outcome),
            Ticket::Update { local, revision } => self.finish_update(local, revision, outcome),
            Ticket::Delete { row } => self.finish_delete(row, outcome),
        };
        if let Some(notice) = &notice {
            warn!(%notice, "server call failed");
        }
        notice
    }

    fn finish_load(
        &mut self,
        since: u64,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Option<Notice> {
        let items = match outcome.and_then(|resp| self.client.parse_list_items(resp)) {
            Ok(items) => items,
            Err(err) => {
                return Some(Notice(format!(
                    "Could not load items: {}",
                    err.user_message()
                )));
            }
        };

        let (pending, mut saved): (Vec<Row>, Vec<Row>) =
            std::mem::take(&mut self.rows).into_iter().partition(Row::is_pending);
        let mut rows = Vec::with_capacity(items.len() + saved.len() + pending.len());
        for item in items {
            if self.deleting.contains(&item.id) {
                continue;
            }
            match saved.iter().position(|row| row.item.id == item.id) {
                Some(index) => {
                    let mut row = saved.swap_remove(index);
                    row.confirm(item);
                    rows.push(row);
                }
                None => {
                    let local = self.alloc_local();
                    rows.push(Row::new(local, item));
                }
            }
        }
        for row in saved {
            if row.saved_at > since {
                rows.push(row);
            } else {
                debug!(id = row.item.id, "item is no longer on the server");
            }
        }
        rows.sort_by_key(|row| row.item.id);
        rows.extend(pending);
        self.rows = rows;
        None
    }

    fn finish_create(
        &mut self,
        local: LocalId,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Option<Notice> {
        let index = match self.position_of_local(local) {
            Some(index) => index,
            None => {
                debug!(local, "create finished for a row that is gone");
                return None;
            }
        };
        match outcome.and_then(|resp| self.client.parse_create_item(resp)) {
            Ok(item) => {
                self.acks += 1;
                let row = &mut self.rows[index];
                row.reconcile(item);
                row.saved_at = self.acks;
                None
            }
            Err(err) => {
                let row = self.rows.remove(index);
                Some(Notice(format!(
                    "Could not add \"{}\": {}",
                    row.item.title,
                    err.user_message()
                )))
            }
        }
    }

    fn finish_update(
        &mut self,
        local: LocalId,
        revision: u64,
        outcome: Result<HttpResponse, ApiError>,
    ) -> Option<Notice> {
        let parsed = outcome.and_then(|resp| self.client.parse_update_item(resp));
        let index = match self.position_of_local(local) {
            Some(index) => index,
            None => {
                debug!(local, "update finished for a row that is gone");
                return None;
            }
        };
        if matches!(parsed, Err(ApiError::NotFound)) {
            let row = self.rows.remove(index);
            return Some(Notice(format!(
                "\"{}\" no longer exists and was removed",
                row.confirmed.title
            )));
        }
        let row = &mut self.rows[index];
        let current = row.revision == revision;
        match parsed {
            Ok(item) if current => {
                row.reconcile(item);
                None
            }
            Ok(item) => {
                if revision > row.confirmed_revision {
                    row.confirm(item);
                    row.confirmed_revision = revision;
                } else {
                    debug!(local, revision, "older update confirmed late");
                }
                None
            }
            Err(err) if current => {
                row.roll_back();
                Some(Notice(format!(
                    "Could not update \"{}\": {}",
                    row.item.title,
                    err.user_message()
                )))
            }
            Err(err) => {
                debug!(local, error = %err, "superseded update failed");
                None
            }
        }
    }

    fn finish_delete(&mut self, row: Row, outcome: Result<HttpResponse, ApiError>) -> Option<Notice> {
        self.deleting.remove(&row.item.id);
        match outcome.and_then(|resp| self.client.parse_delete_item(resp)) {
            Ok(()) => None,
            Err(ApiError::NotFound) => {
                debug!(id = row.item.id, "item was already deleted");
                None
            }
            Err(err) => {
                let title = row.confirmed.title.clone();
                self.restore(row);
                Some(Notice(format!(
                    "Could not delete \"{title}\": {}",
                    err.user_message()
                )))
            }
        }
    }

    /// Put a row back where the server orders it: ids ascend, unsaved rows
    /// trail.
    fn restore(&mut self, mut row: Row) {
        let id = row.confirmed.id;
        if self.rows.iter().any(|r| r.item.id == id) {
            return;
        }
        row.roll_back();
        let at = self
            .rows
            .iter()
            .position(|r| r.is_pending() || r.item.id > id)
            .unwrap_or(self.rows.len());
        self.rows.insert(at, row);
    }
}
