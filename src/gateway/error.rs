//! Gateway error taxonomy

use thiserror::Error;

use crate::models::ExpenseId;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Bad input rejected by the store (or an inverted date range)
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("expense {0} not found")]
    NotFound(ExpenseId),

    /// Transport failure or a status the gateway does not interpret
    #[error("request failed: {0}")]
    Request(#[from] RequestFailure),
}

#[derive(Debug, Error)]
pub enum RequestFailure {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Request(RequestFailure::Transport(err))
    }
}

/// Map a non-2xx response to the taxonomy.
///
/// `target` is the expense id the call addressed, if any; a 404 on any other
/// path is a routing problem and stays a request error.
pub fn classify_status(status: u16, body: &str, target: Option<ExpenseId>) -> GatewayError {
    match (status, target) {
        (404, Some(id)) => GatewayError::NotFound(id),
        (400 | 422, _) => GatewayError::Validation(extract_detail(body)),
        _ => GatewayError::Request(RequestFailure::Status {
            status,
            body: body.trim().to_string(),
        }),
    }
}

/// Pull a human readable message out of a `{"detail": ...}` error body.
/// `detail` is either a string or a list of `{"msg": ...}` objects.
fn extract_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };
    match value.get("detail") {
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(|loc| loc.as_array())
                        .and_then(|loc| loc.last())
                        .and_then(|f| f.as_str());
                    Some(match field {
                        Some(field) => format!("{}: {}", field, msg),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                body.trim().to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => body.trim().to_string(),
    }
}
