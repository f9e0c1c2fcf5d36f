use std::fmt;

/// User-facing outcome of an action that did not produce a result.
///
/// Silent notices correspond to a disabled trigger: the action is a no-op
/// and nothing needs to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    InvalidSmiles,
    EmptyInput,
    Busy,
    AnalysisFailed(String),
    ImageUnavailable,
    NoSmiles,
    BatchFailed(String),
}

impl Notice {
    pub fn is_silent(&self) -> bool {
        matches!(self, Notice::EmptyInput | Notice::Busy)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Notice::InvalidSmiles => "Invalid SMILES detected",
            Notice::EmptyInput => "Nothing to analyze",
            Notice::Busy => "Analysis in progress",
            Notice::AnalysisFailed(_) => "Analysis failed",
            Notice::ImageUnavailable => "Molecule image not available in API.",
            Notice::NoSmiles => "No SMILES found",
            Notice::BatchFailed(_) => "Batch prediction failed",
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Notice::InvalidSmiles => Some("Please enter a valid molecular structure."),
            Notice::AnalysisFailed(_) => Some("Could not connect to the API. Please try again."),
            Notice::NoSmiles => Some("The uploaded file contains no SMILES strings."),
            Notice::BatchFailed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.description() {
            Some(description) => write!(f, "{}: {}", self.title(), description),
            None => f.write_str(self.title()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_description() {
        assert_eq!(
            Notice::InvalidSmiles.to_string(),
            "Invalid SMILES detected: Please enter a valid molecular structure."
        );
        assert_eq!(
            Notice::ImageUnavailable.to_string(),
            "Molecule image not available in API."
        );
    }

    #[test]
    fn disabled_triggers_are_silent() {
        assert!(Notice::Busy.is_silent());
        assert!(Notice::EmptyInput.is_silent());
        assert!(!Notice::InvalidSmiles.is_silent());
    }
}
