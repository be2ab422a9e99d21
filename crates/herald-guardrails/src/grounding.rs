// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Term-overlap heuristic relating a response to its reference material.
//!
//! Advisory only: a low score is logged, never rejected.

/// Terms whose joint presence in the grounding text and the response counts
/// as overlap.
pub const KEY_TERMS: &[&str] = &[
    "tesla", "software", "engineer", "ai", "factory", "invoice", "hris",
];

/// Responses at or below this many characters are never flagged.
pub const UNGROUNDED_MIN_CHARS: usize = 100;

/// Result of [`grounding_overlap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingReport {
    /// Key terms present in both texts.
    pub matched_terms: Vec<&'static str>,
    /// Length of the response in characters.
    pub response_chars: usize,
}

impl GroundingReport {
    /// True when a substantial response shares no key term with the grounding.
    pub fn looks_ungrounded(&self) -> bool {
        self.response_chars > UNGROUNDED_MIN_CHARS && self.matched_terms.is_empty()
    }
}

/// Counts the key terms that occur, case-insensitively, in both texts.
pub fn grounding_overlap(response: &str, grounding: &str) -> GroundingReport {
    let response_lower = response.to_lowercase();
    let grounding_lower = grounding.to_lowercase();
    let matched_terms = KEY_TERMS
        .iter()
        .copied()
        .filter(|term| grounding_lower.contains(term) && response_lower.contains(term))
        .collect();

    GroundingReport {
        matched_terms,
        response_chars: response.chars().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_terms_present_in_both() {
        let report = grounding_overlap(
            "Jai worked as a Software Engineer at Tesla.",
            "Jai: software engineer, Tesla factory automation.",
        );
        // "ai" is a plain substring check, so "Jai" counts.
        assert_eq!(report.matched_terms, ["tesla", "software", "engineer", "ai"]);
        assert!(!report.looks_ungrounded());
    }

    #[test]
    fn term_only_in_response_does_not_count() {
        let report = grounding_overlap("He visited the factory.", "Jai likes hiking.");
        assert!(report.matched_terms.is_empty());
    }

    #[test]
    fn long_response_without_overlap_is_flagged() {
        let response = "x".repeat(UNGROUNDED_MIN_CHARS + 1);
        assert!(grounding_overlap(&response, "tesla").looks_ungrounded());
        let short = "x".repeat(UNGROUNDED_MIN_CHARS);
        assert!(!grounding_overlap(&short, "tesla").looks_ungrounded());
    }
}
