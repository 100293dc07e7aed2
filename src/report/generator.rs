//! Dashboard report generation.
//!
//! This module renders a [`DashboardReport`] as Markdown for people or as
//! JSON for chart-drawing front ends.

use crate::models::{
    AnalyticsResult, CategoryDistribution, Classifier, DashboardReport, Question, QuestionStat,
    ReportMetadata, Response, SectionStat,
};
use anyhow::Result;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(report: &DashboardReport) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Survey Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str(&generate_summary_section(&report.analytics));

    output.push_str(&generate_sections_section(&report.analytics.section_stats));

    output.push_str(&generate_questions_section(
        &report.questions,
        &report.analytics.question_stats,
    ));

    output.push_str(&generate_distribution_section(
        Classifier::College,
        &report.analytics.college_distribution,
        report.analytics.total_responses,
    ));
    output.push_str(&generate_distribution_section(
        Classifier::AcademicLevel,
        &report.analytics.level_distribution,
        report.analytics.total_responses,
    ));

    output.push_str(&generate_responses_section(&report.responses));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if !metadata.source.is_empty() {
        section.push_str(&format!("- **Source:** {}\n", metadata.source));
    }
    section.push_str(&format!(
        "- **Catalog:** {} questions in {} sections\n",
        metadata.catalog_questions, metadata.catalog_sections
    ));
    section.push('\n');

    section
}

/// Generate the summary section.
fn generate_summary_section(analytics: &AnalyticsResult) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Responses | Answers | Overall Average |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {:.2} {} |\n\n",
        analytics.total_responses,
        analytics.total_answers,
        analytics.overall_average,
        star_bar(analytics.overall_average)
    ));

    section
}

/// Generate the per-section averages table.
fn generate_sections_section(stats: &[SectionStat]) -> String {
    let mut section = String::new();

    section.push_str("## Section Averages\n\n");
    section.push_str("| Section | Average | |\n");
    section.push_str("|:---|:---:|:---|\n");

    for stat in stats {
        section.push_str(&format!(
            "| {} | {:.2} | {} |\n",
            escape_cell(&stat.section),
            stat.average,
            star_bar(stat.average)
        ));
    }
    section.push('\n');

    section
}

/// Generate the per-question averages table.
fn generate_questions_section(questions: &[Question], stats: &[QuestionStat]) -> String {
    let mut section = String::new();

    section.push_str("## Question Averages\n\n");

    if stats.iter().all(|s| s.count == 0) {
        section.push_str("No ratings have been submitted yet.\n\n");
        return section;
    }

    section.push_str("| # | Question | Section | Average | Answers |\n");
    section.push_str("|:---:|:---|:---|:---:|:---:|\n");

    for (question, stat) in questions.iter().zip(stats) {
        section.push_str(&format!(
            "| Q{} | {} | {} | {:.2} | {} |\n",
            question.id,
            escape_cell(&question.text),
            escape_cell(&question.section),
            stat.average,
            stat.count
        ));
    }
    section.push('\n');

    section
}

/// Generate a distribution table for one classifier.
fn generate_distribution_section(
    classifier: Classifier,
    dist: &[CategoryDistribution],
    total: usize,
) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Responses by {}\n\n", classifier));

    if dist.is_empty() {
        section.push_str("No responses recorded.\n\n");
        return section;
    }

    section.push_str(&format!("| {} | Responses | Share |\n", classifier));
    section.push_str("|:---|:---:|:---:|\n");

    for entry in dist {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            escape_cell(&entry.key),
            entry.count,
            share_percent(entry.count, total)
        ));
    }
    section.push('\n');

    section
}

/// Generate the table of submitted responses.
fn generate_responses_section(responses: &[Response]) -> String {
    let mut section = String::new();

    section.push_str("## Submitted Responses\n\n");

    if responses.is_empty() {
        section.push_str("No responses recorded.\n\n");
        return section;
    }

    section.push_str("| Name | College | Specialization | Level | Submitted |\n");
    section.push_str("|:---|:---|:---|:---|:---:|\n");

    for response in responses {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            escape_cell(&response.full_name),
            escape_cell(&response.college),
            escape_cell(&response.specialization),
            escape_cell(&response.academic_level),
            response.submitted_at.format("%Y-%m-%d")
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by SurveyLens*\n");

    footer
}

/// Five-star bar for an average, e.g. `★★★★☆` for 4.2.
fn star_bar(average: f64) -> String {
    let filled = average.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Make free text safe inside a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn share_percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// Generate a JSON report.
pub fn generate_json_report(report: &DashboardReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_analytics;
    use crate::catalog::Catalog;
    use crate::models::{Answer, Response};
    use chrono::{TimeZone, Utc};

    fn create_test_report() -> DashboardReport {
        let catalog = Catalog::new(vec![
            Question {
                id: 1,
                text: "Audio clarity".to_string(),
                section: "Audio".to_string(),
            },
            Question {
                id: 2,
                text: "Summary accuracy".to_string(),
                section: "Summaries".to_string(),
            },
        ])
        .unwrap();

        let submitted_at = Utc.with_ymd_and_hms(2025, 2, 10, 9, 0, 0).unwrap();
        let responses = vec![
            Response {
                id: 1,
                full_name: "Student One".to_string(),
                college: "Nursing".to_string(),
                specialization: "Nursing".to_string(),
                academic_level: "First".to_string(),
                suggestions: None,
                submitted_at,
            },
            Response {
                id: 2,
                full_name: "Student Two".to_string(),
                college: "Dentistry".to_string(),
                specialization: "Dental Surgery".to_string(),
                academic_level: "First".to_string(),
                suggestions: Some("More sessions".to_string()),
                submitted_at,
            },
        ];
        let answers = vec![
            Answer {
                id: 1,
                response_id: 1,
                question_id: 1,
                rating: 5,
            },
            Answer {
                id: 2,
                response_id: 2,
                question_id: 1,
                rating: 4,
            },
        ];

        DashboardReport {
            metadata: ReportMetadata {
                generated_at: Utc.with_ymd_and_hms(2025, 2, 11, 8, 0, 0).unwrap(),
                source: "responses.json + answers.json".to_string(),
                catalog_questions: catalog.len(),
                catalog_sections: catalog.sections().len(),
            },
            analytics: compute_analytics(&responses, &answers, &catalog),
            questions: catalog.questions().to_vec(),
            responses,
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("# Survey Dashboard"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Section Averages"));
        assert!(markdown.contains("| Q1 | Audio clarity | Audio | 4.50 | 2 |"));
        assert!(markdown.contains("| Q2 | Summary accuracy | Summaries | 0.00 | 0 |"));
        assert!(markdown.contains("## Responses by College"));
        assert!(markdown.contains("| Nursing | 1 | 50.0% |"));
        assert!(markdown.contains("## Responses by Academic Level"));
        assert!(markdown.contains("| First | 2 | 100.0% |"));
        assert!(markdown.contains("| 2 | 2 | 4.50 ★★★★★ |"));
        assert!(markdown.contains("## Submitted Responses"));
        assert!(markdown.contains("| Student Two | Dentistry | Dental Surgery | First | 2025-02-10 |"));
    }

    #[test]
    fn test_empty_responses_section() {
        let section = generate_responses_section(&[]);
        assert!(section.contains("No responses recorded."));
    }

    #[test]
    fn test_table_cells_escape_pipes() {
        let mut report = create_test_report();
        report.analytics.college_distribution[0].key = "Arts | Humanities".to_string();
        report.responses[0].college = "Arts | Humanities".to_string();
        report.questions[0].text = "Audio | video clarity".to_string();

        let markdown = generate_markdown_report(&report);

        assert!(markdown.contains("| Arts \\| Humanities | 1 | 50.0% |"));
        assert!(markdown.contains("| Student One | Arts \\| Humanities |"));
        assert!(markdown.contains("| Q1 | Audio \\| video clarity | Audio |"));
        assert_eq!(escape_cell("a|b\nc"), "a\\|b c");
    }

    #[test]
    fn test_generate_metadata_section() {
        let report = create_test_report();
        let section = generate_metadata_section(&report.metadata);

        assert!(section.contains("2025-02-11 08:00:00 UTC"));
        assert!(section.contains("responses.json + answers.json"));
        assert!(section.contains("2 questions in 2 sections"));
    }

    #[test]
    fn test_empty_distribution_section() {
        let section = generate_distribution_section(Classifier::College, &[], 0);
        assert!(section.contains("No responses recorded."));
    }

    #[test]
    fn test_star_bar() {
        assert_eq!(star_bar(0.0), "☆☆☆☆☆");
        assert_eq!(star_bar(4.2), "★★★★☆");
        assert_eq!(star_bar(4.6), "★★★★★");
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"analytics\""));
        assert!(json.contains("\"sectionStats\""));
        assert!(json.contains("\"collegeDistribution\""));
        assert!(json.contains("\"overallAverage\": 4.5"));
        assert!(json.contains("\"fullName\": \"Student One\""));
    }
}
