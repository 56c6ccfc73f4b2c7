pub mod auth;
pub mod tasks;

use crate::error::ApiError;
use crate::gate::Decision;

/// Map a gate decision into the boundary-layer error taxonomy. Deny and
/// NotFound must surface as different status codes (403 vs 404) so a denial
/// never confirms that someone else's resource exists.
pub fn ensure_allowed(decision: Decision) -> Result<(), ApiError> {
    match decision {
        Decision::Allow => Ok(()),
        Decision::Deny => Err(ApiError::forbidden("You do not have access to this task")),
        Decision::NotFound => Err(ApiError::not_found("Task not found")),
    }
}
