//! Executes core `HttpRequest`s with ureq.

use listitems_core::{ApiError, HttpMethod, HttpRequest, HttpResponse};

pub fn agent() -> ureq::Agent {
    // Status codes are data for the core to interpret, not transport errors.
    ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent()
}

/// Run one request to completion. Blocking; call from a blocking task.
pub fn execute(agent: &ureq::Agent, req: HttpRequest) -> Result<HttpResponse, ApiError> {
    tracing::debug!(method = req.method.as_str(), path = %req.path, "sending");
    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .map_err(|e| ApiError::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    tracing::debug!(status, "received");
    Ok(HttpResponse::new(status, body))
}
