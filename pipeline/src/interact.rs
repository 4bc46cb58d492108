//! Operator interaction capability.
//!
//! The pipeline has two deliberate manual gates: resolving an unusable
//! display name and confirming an unauthenticated registry push. Both go
//! through this trait so automated runs and tests can supply canned
//! responses instead of blocking on real input.

use std::io::Write;

use vmship_core::error::Result;

/// Questions the pipeline may put to the operator.
pub trait OperatorPrompt {
    /// Ask an open question and return the operator's answer.
    fn ask(&self, prompt: &str) -> Result<String>;

    /// Ask a yes/no question; only an affirmative reply returns true.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Interactive prompt on stdin/stdout.
pub struct StdioPrompt;

impl OperatorPrompt for StdioPrompt {
    fn ask(&self, prompt: &str) -> Result<String> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Ok(is_affirmative(&self.ask(prompt)?))
    }
}

/// A reply counts as affirmative only when it starts with "yes".
pub(crate) fn is_affirmative(reply: &str) -> bool {
    reply.to_lowercase().starts_with("yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("yes"));
        assert!(is_affirmative("Yes"));
        assert!(is_affirmative("YES, go ahead"));
        assert!(!is_affirmative("y"));
        assert!(!is_affirmative("no"));
        assert!(!is_affirmative(""));
        assert!(!is_affirmative("maybe yes"));
    }
}
