//! Data models for survey analytics.
//!
//! This module contains the persisted records (responses and answers),
//! the catalog entry type, and the derived aggregates produced by the
//! analysis engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest valid star rating.
pub const MIN_RATING: u8 = 1;

/// Highest valid star rating.
pub const MAX_RATING: u8 = 5;

/// One submitted survey instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Unique identifier assigned at creation.
    pub id: i64,
    /// Student's full name.
    pub full_name: String,
    /// College the student belongs to.
    pub college: String,
    /// Specialization within the college.
    pub specialization: String,
    /// Academic level (year of study).
    pub academic_level: String,
    /// Optional free-text suggestions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<String>,
    /// Submission timestamp.
    pub submitted_at: DateTime<Utc>,
}

impl Response {
    /// Suggestions text, or an empty string when none were given.
    pub fn suggestions_or_empty(&self) -> &str {
        self.suggestions.as_deref().unwrap_or("")
    }
}

/// One rating for one question within one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    /// Unique identifier.
    pub id: i64,
    /// Owning response.
    pub response_id: i64,
    /// Catalog question this answer rates.
    pub question_id: u32,
    /// Star rating, expected in `1..=5`. Negative values are rejected on load.
    pub rating: u8,
}

impl Answer {
    /// Whether the rating falls inside the star scale.
    pub fn has_valid_rating(&self) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&self.rating)
    }
}

/// A catalog question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    /// Free-text grouping label shared by several questions.
    pub section: String,
}

/// Response field used to build a categorical distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
    College,
    AcademicLevel,
}

impl Classifier {
    /// Extract the classifier value from a response.
    pub fn value_of<'a>(&self, response: &'a Response) -> &'a str {
        match self {
            Classifier::College => &response.college,
            Classifier::AcademicLevel => &response.academic_level,
        }
    }
}

impl fmt::Display for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classifier::College => write!(f, "College"),
            Classifier::AcademicLevel => write!(f, "Academic Level"),
        }
    }
}

/// Average rating and answer count for one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStat {
    pub question_id: u32,
    /// Mean rating rounded to 2 decimals, 0 when `count` is 0.
    pub average: f64,
    pub count: usize,
}

/// Average rating over every answer in a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStat {
    pub section: String,
    /// Mean of all ratings in the section rounded to 2 decimals.
    pub average: f64,
}

/// Number of responses sharing one classifier value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDistribution {
    pub key: String,
    pub count: usize,
}

/// Everything the dashboard needs, computed from one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    /// One entry per catalog question, in catalog order.
    pub question_stats: Vec<QuestionStat>,
    /// One entry per section, in first-appearance order.
    pub section_stats: Vec<SectionStat>,
    /// Responses per college, in first-seen order.
    pub college_distribution: Vec<CategoryDistribution>,
    /// Responses per academic level, in first-seen order.
    pub level_distribution: Vec<CategoryDistribution>,
    /// Mean of every rating given to a catalog question, 0 when none.
    pub overall_average: f64,
    pub total_responses: usize,
    pub total_answers: usize,
}

#[cfg(test)]
impl AnalyticsResult {
    pub fn question_stat(&self, question_id: u32) -> Option<&QuestionStat> {
        self.question_stats
            .iter()
            .find(|s| s.question_id == question_id)
    }

    pub fn section_stat(&self, section: &str) -> Option<&SectionStat> {
        self.section_stats.iter().find(|s| s.section == section)
    }
}

/// Metadata about a dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Where the snapshot came from (file names or a label).
    pub source: String,
    /// Number of questions in the catalog.
    pub catalog_questions: usize,
    /// Number of distinct sections in the catalog.
    pub catalog_sections: usize,
}

/// Analytics plus the catalog needed to label them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub analytics: AnalyticsResult,
    /// Catalog questions, in catalog order.
    pub questions: Vec<Question>,
    /// Every submitted response, in snapshot order.
    pub responses: Vec<Response>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_response() -> Response {
        Response {
            id: 1,
            full_name: "Sara Ali Hassan Omar".to_string(),
            college: "Dentistry".to_string(),
            specialization: "Dental Surgery".to_string(),
            academic_level: "Second".to_string(),
            suggestions: None,
            submitted_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_classifier_value() {
        let response = make_response();
        assert_eq!(Classifier::College.value_of(&response), "Dentistry");
        assert_eq!(Classifier::AcademicLevel.value_of(&response), "Second");
    }

    #[test]
    fn test_suggestions_or_empty() {
        let mut response = make_response();
        assert_eq!(response.suggestions_or_empty(), "");

        response.suggestions = Some("More practice exams".to_string());
        assert_eq!(response.suggestions_or_empty(), "More practice exams");
    }

    #[test]
    fn test_answer_rating_validity() {
        let mut answer = Answer {
            id: 1,
            response_id: 1,
            question_id: 3,
            rating: 5,
        };
        assert!(answer.has_valid_rating());

        answer.rating = 0;
        assert!(!answer.has_valid_rating());

        answer.rating = 6;
        assert!(!answer.has_valid_rating());
    }

    #[test]
    fn test_response_deserializes_camel_case() {
        let json = r#"{
            "id": 7,
            "fullName": "Omar Khaled Saleh Ahmed",
            "college": "Nursing",
            "specialization": "Nursing",
            "academicLevel": "First",
            "suggestions": null,
            "submittedAt": "2025-01-02T10:00:00Z"
        }"#;

        let response: Response = serde_json::from_str(json).unwrap();
        assert_eq!(response.id, 7);
        assert_eq!(response.academic_level, "First");
        assert!(response.suggestions.is_none());
    }

    #[test]
    fn test_answer_rejects_negative_rating() {
        let json = r#"{"id": 1, "responseId": 1, "questionId": 1, "rating": -5}"#;
        assert!(serde_json::from_str::<Answer>(json).is_err());

        let json = r#"{"id": 1, "responseId": 1, "questionId": 1, "rating": 7}"#;
        let answer: Answer = serde_json::from_str(json).unwrap();
        assert_eq!(answer.rating, 7);
        assert!(!answer.has_valid_rating());
    }

    #[test]
    fn test_analytics_result_serializes_camel_case() {
        let result = AnalyticsResult {
            total_responses: 2,
            ..Default::default()
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"questionStats\""));
        assert!(json.contains("\"totalResponses\":2"));
    }
}
