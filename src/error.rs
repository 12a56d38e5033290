//! Engine error surface.
//!
//! The reflow engine has a single external failure: the input contains
//! a state no automated repair can fix. Richer classification lives in
//! the [`Violation`] list returned by [`crate::checker::verify`].

use thiserror::Error;

use crate::models::Violation;

/// Errors produced by the reflow engine.
#[derive(Debug, Clone, Error)]
pub enum ReflowError {
    /// The schedule contains fatal violations (a dependency cycle or
    /// overlapping fixed orders) and is refused before any mutation.
    /// The carried violations' messages are surfaced verbatim.
    #[error("schedule is not fixable: {}", fatal_summary(.violations))]
    NotFixable {
        /// The fatal violations that caused the refusal.
        violations: Vec<Violation>,
    },
}

fn fatal_summary(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_fixable_lists_messages_verbatim() {
        let err = ReflowError::NotFixable {
            violations: vec![
                Violation::dependency_error("wo-a", "Circular dependency detected: wo-a -> wo-b -> wo-a")
                    .fatal(),
                Violation::maintenance_collision("m-2", "Fixed orders M-1 and M-2 overlap on work center wc-1")
                    .fatal(),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("not fixable"));
        assert!(text.contains("Circular dependency detected: wo-a -> wo-b -> wo-a"));
        assert!(text.contains("Fixed orders M-1 and M-2 overlap"));
    }
}
