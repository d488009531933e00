//! Stateless request builder and response parser for `/api/listitems`.
//!
//! # Design
//! `ListItemClient` holds only a base URL. Each operation is split into a
//! `build_*` method producing an `HttpRequest` and a `parse_*` method
//! consuming an `HttpResponse`; the caller runs the round-trip in between.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ItemId, ListItem};

const ITEMS_PATH: &str = "/api/listitems";

#[derive(Debug, Clone)]
pub struct ListItemClient {
    base_url: String,
}

impl ListItemClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{ITEMS_PATH}", self.base_url)
    }

    fn item_url(&self, id: ItemId) -> String {
        format!("{}{ITEMS_PATH}/{id}", self.base_url)
    }

    pub fn build_list_items(&self) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.collection_url())
    }

    pub fn build_get_item(&self, id: ItemId) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Get, self.item_url(id))
    }

    /// The server ignores `item.id`; unsaved items send the `0` sentinel.
    pub fn build_create_item(&self, item: &ListItem) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(item).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Post, self.collection_url(), body))
    }

    /// Sends the whole record to `/api/listitems/{item.id}`.
    pub fn build_update_item(&self, item: &ListItem) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(item).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest::json(HttpMethod::Put, self.item_url(item.id), body))
    }

    pub fn build_delete_item(&self, id: ItemId) -> HttpRequest {
        HttpRequest::bodiless(HttpMethod::Delete, self.item_url(id))
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<ListItem>, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_get_item(&self, response: HttpResponse) -> Result<ListItem, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<ListItem, ApiError> {
        check_status(&response, 201)?;
        parse_body(&response)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<ListItem, ApiError> {
        check_status(&response, 200)?;
        parse_body(&response)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
