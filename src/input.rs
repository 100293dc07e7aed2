//! Snapshot loading.
//!
//! Responses and answers are read from JSON arrays exported by the
//! persistence layer. Data-quality problems are reported through logging
//! but never corrected; the analysis sees exactly what was loaded.

use crate::catalog::Catalog;
use crate::models::{Answer, Response};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info, warn};

/// Responses and answers read together as one consistent snapshot.
#[derive(Debug, Clone, Default)]
pub struct SurveySnapshot {
    pub responses: Vec<Response>,
    pub answers: Vec<Answer>,
}

/// Counts of suspicious records in a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiagnostics {
    /// Answers whose rating is outside `1..=5`.
    pub out_of_range_ratings: usize,
    /// Answers pointing at a response not in the snapshot.
    pub orphaned_answers: usize,
    /// Answers for questions missing from the catalog.
    pub unknown_questions: usize,
}

impl SnapshotDiagnostics {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl SurveySnapshot {
    /// Load a snapshot from two JSON files.
    pub fn load(responses_path: &Path, answers_path: &Path) -> Result<Self> {
        let responses: Vec<Response> = read_json_array(responses_path)?;
        let answers: Vec<Answer> = read_json_array(answers_path)?;

        info!(
            "Loaded {} responses and {} answers",
            responses.len(),
            answers.len()
        );

        Ok(Self { responses, answers })
    }

    /// Inspect the snapshot against a catalog.
    pub fn diagnose(&self, catalog: &Catalog) -> SnapshotDiagnostics {
        let response_ids: HashSet<i64> = self.responses.iter().map(|r| r.id).collect();
        let mut diagnostics = SnapshotDiagnostics::default();

        for answer in &self.answers {
            if !answer.has_valid_rating() {
                diagnostics.out_of_range_ratings += 1;
            }
            if !response_ids.contains(&answer.response_id) {
                diagnostics.orphaned_answers += 1;
            }
            if !catalog.contains(answer.question_id) {
                diagnostics.unknown_questions += 1;
            }
        }

        diagnostics
    }

    /// Log any data-quality problems found by [`diagnose`](Self::diagnose).
    pub fn log_diagnostics(&self, catalog: &Catalog) -> SnapshotDiagnostics {
        let diagnostics = self.diagnose(catalog);

        if diagnostics.is_clean() {
            debug!("Snapshot passed data-quality checks");
            return diagnostics;
        }

        if diagnostics.out_of_range_ratings > 0 {
            warn!(
                "{} answers have ratings outside 1-5; they are excluded from star buckets",
                diagnostics.out_of_range_ratings
            );
        }
        if diagnostics.orphaned_answers > 0 {
            warn!(
                "{} answers reference responses missing from the snapshot",
                diagnostics.orphaned_answers
            );
        }
        if diagnostics.unknown_questions > 0 {
            warn!(
                "{} answers reference questions missing from the catalog",
                diagnostics.unknown_questions
            );
        }

        diagnostics
    }
}

fn read_json_array<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn make_catalog() -> Catalog {
        Catalog::new(vec![Question {
            id: 1,
            text: "Audio clarity".to_string(),
            section: "Audio".to_string(),
        }])
        .unwrap()
    }

    const RESPONSES: &str = r#"[
        {
            "id": 1,
            "fullName": "Student One",
            "college": "Nursing",
            "specialization": "Nursing",
            "academicLevel": "First",
            "submittedAt": "2025-02-10T09:00:00Z"
        }
    ]"#;

    const ANSWERS: &str = r#"[
        {"id": 1, "responseId": 1, "questionId": 1, "rating": 5},
        {"id": 2, "responseId": 9, "questionId": 1, "rating": 7},
        {"id": 3, "responseId": 1, "questionId": 42, "rating": 3}
    ]"#;

    #[test]
    fn test_load_snapshot() {
        let responses = write_temp(RESPONSES);
        let answers = write_temp(ANSWERS);

        let snapshot = SurveySnapshot::load(responses.path(), answers.path()).unwrap();

        assert_eq!(snapshot.responses.len(), 1);
        assert_eq!(snapshot.answers.len(), 3);
        assert!(snapshot.responses[0].suggestions.is_none());
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let responses = write_temp("{ not json");
        let answers = write_temp("[]");

        let err = SurveySnapshot::load(responses.path(), answers.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse input file"));
    }

    #[test]
    fn test_load_missing_file() {
        let answers = write_temp("[]");
        let result = SurveySnapshot::load(Path::new("/nonexistent/responses.json"), answers.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_diagnose() {
        let responses = write_temp(RESPONSES);
        let answers = write_temp(ANSWERS);
        let snapshot = SurveySnapshot::load(responses.path(), answers.path()).unwrap();

        let diagnostics = snapshot.diagnose(&make_catalog());

        assert_eq!(
            diagnostics,
            SnapshotDiagnostics {
                out_of_range_ratings: 1,
                orphaned_answers: 1,
                unknown_questions: 1,
            }
        );
        assert!(!diagnostics.is_clean());
        assert_eq!(snapshot.answers.len(), 3);
    }

    #[test]
    fn test_empty_snapshot_is_clean() {
        let snapshot = SurveySnapshot::default();
        assert!(snapshot.log_diagnostics(&make_catalog()).is_clean());
    }
}
