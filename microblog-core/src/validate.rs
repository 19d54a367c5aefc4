//! Body validation with a single user-visible error slot

/// Message shown when the body is missing or blank
pub const REQUIRED_MESSAGE: &str = "Value is required!";

/// Tracks the current inline error for the post body.
///
/// Holds nothing but the one message, so it can be re-run on every edit.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyValidator {
    error: Option<String>,
}

impl BodyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `body`, setting or clearing the error. Returns `true` when valid.
    pub fn validate(&mut self, body: Option<&str>) -> bool {
        match body {
            Some(text) if !text.trim().is_empty() => {
                self.clear_if_set();
                true
            }
            _ => {
                self.error = Some(REQUIRED_MESSAGE.to_string());
                false
            }
        }
    }

    /// Drop a stale error once the user starts editing again
    pub fn clear_if_set(&mut self) {
        if self.error.as_ref().is_some_and(|e| !e.is_empty()) {
            self.error = None;
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Stateless check for callers that only need the verdict
pub fn is_valid_body(body: Option<&str>) -> bool {
    BodyValidator::new().validate(body)
}
