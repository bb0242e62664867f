use serde::Serialize;

/// Standardized API response wrapper for all outgoing JSON responses.
///
/// Every endpoint answers with the same envelope, so callers always receive a
/// discriminated result:
/// ```json
/// {
///   "success": true,
///   "data": { "id": 7, "attemptNumber": 2, "status": "late" },
///   "message": "Submission received"
/// }
/// ```
///
/// Failures carry empty `data` and the human-readable reason:
/// ```json
/// {
///   "success": false,
///   "data": null,
///   "message": "Maximum number of attempts (3) reached"
/// }
/// ```
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Constructs an error response with a message and default `data`.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}
