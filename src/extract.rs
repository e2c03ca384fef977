//! Issue-key extraction from branch names and commit text
//!
//! Pure text scanning. The extractor is built once per run from the
//! configured project prefixes and applied to the source branch name and to
//! every commit subject and body; results union into one deduplicated set.

use crate::error::{Error, Result};
use crate::types::{Commit, IssueKey};
use regex::Regex;
use std::collections::BTreeSet;

/// Scans free text for `PREFIX-NUMBER` issue keys
#[derive(Debug, Clone)]
pub struct KeyExtractor {
    pattern: Option<Regex>,
}

impl KeyExtractor {
    /// Build an extractor for the given prefix set
    ///
    /// Prefixes are matched case-insensitively and escaped literally, so a
    /// prefix containing regex metacharacters is taken verbatim. Blank
    /// prefixes are discarded; an empty set matches nothing.
    pub fn new(prefixes: &[String]) -> Result<Self> {
        let alternatives: Vec<String> = prefixes
            .iter()
            .map(|prefix| prefix.trim())
            .filter(|prefix| !prefix.is_empty())
            .map(regex::escape)
            .collect();

        if alternatives.is_empty() {
            return Ok(Self { pattern: None });
        }

        let source = format!("(?i)({})-\\d+", alternatives.join("|"));
        let pattern = Regex::new(&source)
            .map_err(|e| Error::Config(format!("invalid project key pattern: {e}")))?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    /// Extract the set of normalized keys appearing in `text`
    pub fn extract(&self, text: &str) -> BTreeSet<IssueKey> {
        let mut keys = BTreeSet::new();
        if let Some(pattern) = &self.pattern {
            for found in pattern.find_iter(text) {
                keys.insert(IssueKey::new(found.as_str()));
            }
        }
        keys
    }

    /// Union of keys from the branch name and every commit subject and body
    pub fn extract_all(&self, branch: &str, commits: &[Commit]) -> BTreeSet<IssueKey> {
        let mut keys = self.extract(branch);
        for commit in commits {
            keys.extend(self.extract(&commit.subject));
            keys.extend(self.extract(&commit.body));
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(prefixes: &[&str]) -> KeyExtractor {
        let owned: Vec<String> = prefixes.iter().map(ToString::to_string).collect();
        KeyExtractor::new(&owned).unwrap()
    }

    fn keys(set: &BTreeSet<IssueKey>) -> Vec<&str> {
        set.iter().map(IssueKey::as_str).collect()
    }

    #[test]
    fn test_extracts_and_uppercases_matches() {
        let found = extractor(&["PROJ", "TEST"]).extract("Fix proj-42 and TEST-7 regressions");
        assert_eq!(keys(&found), ["PROJ-42", "TEST-7"]);
    }

    #[test]
    fn test_case_variants_collapse_to_one_key() {
        let found = extractor(&["PROJ"]).extract("proj-1 PROJ-1 Proj-1");
        assert_eq!(keys(&found), ["PROJ-1"]);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let ex = extractor(&["PROJ"]);
        let text = "PROJ-3 then PROJ-5";
        assert_eq!(ex.extract(text), ex.extract(text));
    }

    #[test]
    fn test_empty_prefix_set_matches_nothing() {
        assert!(extractor(&[]).extract("PROJ-1 TEST-2").is_empty());
        assert!(extractor(&["", "  "]).extract("PROJ-1").is_empty());
    }

    #[test]
    fn test_no_matches_yields_empty_set() {
        assert!(extractor(&["PROJ"]).extract("nothing to see here").is_empty());
        assert!(extractor(&["PROJ"]).extract("").is_empty());
    }

    #[test]
    fn test_matches_embedded_occurrences() {
        // No word-boundary anchor: the pattern matches inside larger tokens.
        let found = extractor(&["PROJ"]).extract("branch REPROJ-5-hotfix");
        assert_eq!(keys(&found), ["PROJ-5"]);
    }

    #[test]
    fn test_prefix_with_metacharacters_is_literal() {
        let found = extractor(&["A.B"]).extract("A.B-9 AXB-9");
        assert_eq!(keys(&found), ["A.B-9"]);
    }

    #[test]
    fn test_union_across_branch_and_commits() {
        let commits = vec![
            Commit {
                hash: "a".to_string(),
                subject: "Fix PROJ-42 and TEST-7".to_string(),
                body: String::new(),
            },
            Commit {
                hash: "b".to_string(),
                subject: "Cleanup".to_string(),
                body: "Relates to proj-42 and TEST-9".to_string(),
            },
        ];
        let found = extractor(&["PROJ", "TEST"]).extract_all("feature/PROJ-42", &commits);
        assert_eq!(keys(&found), ["PROJ-42", "TEST-7", "TEST-9"]);
    }
}
