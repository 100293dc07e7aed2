//! Reference catalog of survey questions.
//!
//! The catalog is the authoritative list and order of questions and the
//! sections they belong to. It is read-only once constructed.

mod builtin;

use crate::error::SurveyError;
use crate::models::Question;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

pub use builtin::builtin_questions;

/// Ordered, validated list of catalog questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    questions: Vec<Question>,
}

/// On-disk catalog layout for TOML files (`[[questions]]` tables).
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

impl Catalog {
    /// Build a catalog, requiring at least one question and unique ids.
    pub fn new(questions: Vec<Question>) -> Result<Self, SurveyError> {
        if questions.is_empty() {
            return Err(SurveyError::InvalidInput(
                "catalog must contain at least one question".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for question in &questions {
            if !seen.insert(question.id) {
                return Err(SurveyError::InvalidInput(format!(
                    "duplicate question id {} in catalog",
                    question.id
                )));
            }
        }

        Ok(Self { questions })
    }

    /// The built-in survey catalog.
    pub fn builtin() -> Self {
        Self {
            questions: builtin_questions(),
        }
    }

    /// Load a catalog from a JSON array or a TOML `[[questions]]` file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

        let questions = if is_toml {
            let file: CatalogFile = toml::from_str(&content)
                .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?;
            file.questions
        } else {
            serde_json::from_str::<Vec<Question>>(&content)
                .with_context(|| format!("Failed to parse catalog file: {}", path.display()))?
        };

        Self::new(questions).with_context(|| format!("Invalid catalog: {}", path.display()))
    }

    /// Questions in catalog order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Find a question by id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    /// Distinct section labels in order of first appearance.
    pub fn sections(&self) -> Vec<&str> {
        let mut sections: Vec<&str> = Vec::new();

        for question in &self.questions {
            if !sections.contains(&question.section.as_str()) {
                sections.push(&question.section);
            }
        }

        sections
    }

    /// Questions belonging to one section, in catalog order.
    pub fn questions_in_section<'a>(
        &'a self,
        section: &'a str,
    ) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions.iter().filter(move |q| q.section == section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn question(id: u32, section: &str) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            section: section.to_string(),
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 15);
        assert_eq!(catalog.sections().len(), 4);
        assert_eq!(catalog.questions_in_section(catalog.sections()[3]).count(), 3);
        assert!(Catalog::new(builtin_questions()).is_ok());
    }

    #[test]
    fn test_rejects_empty_catalog() {
        let err = Catalog::new(Vec::new()).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = Catalog::new(vec![question(1, "A"), question(1, "B")]).unwrap_err();
        assert!(err.to_string().contains("duplicate question id 1"));
    }

    #[test]
    fn test_sections_first_appearance_order() {
        let catalog = Catalog::new(vec![
            question(1, "Zeta"),
            question(2, "Alpha"),
            question(3, "Zeta"),
            question(4, "Mid"),
        ])
        .unwrap();

        assert_eq!(catalog.sections(), vec!["Zeta", "Alpha", "Mid"]);

        let zeta: Vec<u32> = catalog.questions_in_section("Zeta").map(|q| q.id).collect();
        assert_eq!(zeta, vec![1, 3]);
    }

    #[test]
    fn test_lookup() {
        let catalog = Catalog::new(vec![question(10, "A"), question(20, "B")]).unwrap();
        assert_eq!(catalog.get(20).map(|q| q.section.as_str()), Some("B"));
        assert!(catalog.contains(10));
        assert!(!catalog.contains(30));
    }

    #[test]
    fn test_load_json_catalog() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "text": "Audio clarity", "section": "Audio"}},
                {{"id": 2, "text": "Summary accuracy", "section": "Summaries"}}]"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.sections(), vec!["Audio", "Summaries"]);
    }

    #[test]
    fn test_load_toml_catalog() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[[questions]]
id = 1
text = "Audio clarity"
section = "Audio"

[[questions]]
id = 2
text = "Noise free"
section = "Audio"
"#
        )
        .unwrap();

        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.sections(), vec!["Audio"]);
    }

    #[test]
    fn test_load_invalid_catalog() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "[]").unwrap();
        assert!(Catalog::load(file.path()).is_err());
    }
}
