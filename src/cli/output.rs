//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::ApiError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::ContextNotFound(selector) => format!(
            "No context matches '{}'. Run `flitro list` to see available contexts.",
            selector
        ),
        ApiError::AmbiguousContext(_) => {
            format!("{} (see `flitro list` for ids)", e)
        }
        _ => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_points_to_list() {
        let message = map_error(&ApiError::ContextNotFound("Wrok".to_string()));
        assert!(message.contains("'Wrok'"));
        assert!(message.contains("flitro list"));
    }
}
