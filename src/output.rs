/// How a filter session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The user submitted; holds the chosen texts, possibly none
    Submitted(Vec<String>),
    /// The user quit without choosing
    QuitEmpty,
    /// The session was interrupted
    Aborted,
}

impl Outcome {
    /// Exit code the command line tool reports for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Submitted(items) if !items.is_empty() => 0,
            Outcome::Submitted(_) | Outcome::QuitEmpty => 1,
            Outcome::Aborted => 130,
        }
    }

    /// Whether the session was interrupted
    pub fn is_abort(&self) -> bool {
        matches!(self, Outcome::Aborted)
    }

    /// The submitted texts, empty for any other outcome
    pub fn selected(&self) -> &[String] {
        match self {
            Outcome::Submitted(items) => items,
            _ => &[],
        }
    }
}

/// Sift's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOutput {
    /// How the session ended
    pub outcome: Outcome,
    /// The query when the session ended
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(Outcome::Submitted(vec![String::from("a")]).exit_code(), 0);
        assert_eq!(Outcome::Submitted(vec![]).exit_code(), 1);
        assert_eq!(Outcome::QuitEmpty.exit_code(), 1);
        assert_eq!(Outcome::Aborted.exit_code(), 130);
    }

    #[test]
    fn selected_only_on_submit() {
        assert!(Outcome::QuitEmpty.selected().is_empty());
        assert_eq!(Outcome::Submitted(vec![String::from("x")]).selected(), ["x"]);
    }
}
