use anyhow::{anyhow, Context, Error, Result};

pub trait ErrorPrefix {
    fn with_prefix(self, f: impl FnOnce() -> String) -> Self;
}

impl<T> ErrorPrefix for Result<T> {
    fn with_prefix(self, f: impl FnOnce() -> String) -> Self {
        self.with_context(f)
    }
}

pub trait ErrorCombine {
    /// Merges independent errors into a single one, listing all of them.
    fn combine(self) -> Error;
}

impl ErrorCombine for Vec<Error> {
    fn combine(mut self) -> Error {
        if self.len() == 1 {
            if let Some(error) = self.pop() {
                return error;
            }
        }
        let count = self.len();
        let messages: Vec<String> = self.iter().map(|error| format!("{error:#}")).collect();
        anyhow!("{count} errors:\n\n{}", messages.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_shown_before_cause() {
        let result: Result<()> = Err(anyhow!("inner")).with_prefix(|| "outer".into());
        let error = result.unwrap_err();
        assert_eq!(format!("{error:#}"), "outer: inner");
    }

    #[test]
    fn single_error_is_kept() {
        let error = vec![anyhow!("only")].combine();
        assert_eq!(error.to_string(), "only");
    }

    #[test]
    fn multiple_errors_are_listed() {
        let error = vec![anyhow!("first"), anyhow!("second")].combine();
        assert_eq!(error.to_string(), "2 errors:\n\nfirst\n\nsecond");
    }
}
