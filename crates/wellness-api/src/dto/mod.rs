//! Data transfer objects for API requests and responses.

pub mod request;
pub mod response;

use validator::Validate;

use wellness_core::error::AppError;

/// Run `validator` rules on a request body and map failures to a 400.
pub fn validate<T: Validate>(req: &T) -> Result<(), AppError> {
    req.validate()
        .map_err(|e| AppError::validation(format!("Invalid request: {e}")))
}
