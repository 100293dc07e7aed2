//! Spreadsheet export.
//!
//! The export is built in two steps. [`build_export_document`] lays the
//! snapshot out as four named sheets of typed cells and cannot fail;
//! [`ExportDocument::encode`] turns that layout into `.xlsx` bytes and is
//! the only step that reports an error.

use crate::analysis::{tally_by_question, tally_for, RATING_BUCKETS};
use crate::catalog::Catalog;
use crate::error::SurveyError;
use crate::models::{Answer, Response};
use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, XlsxError};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Language of sheet names, titles and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ExportLocale {
    /// English labels (default)
    #[default]
    #[serde(rename = "en")]
    #[value(name = "en")]
    English,
    /// Arabic labels, right-to-left sheets
    #[serde(rename = "ar")]
    #[value(name = "ar")]
    Arabic,
}

impl ExportLocale {
    pub fn labels(&self) -> &'static ExportLabels {
        match self {
            ExportLocale::English => &ENGLISH_LABELS,
            ExportLocale::Arabic => &ARABIC_LABELS,
        }
    }
}

/// Fixed text used in the exported workbook.
#[derive(Debug)]
pub struct ExportLabels {
    pub summary_sheet: &'static str,
    pub summary_title: &'static str,
    pub total_responses: &'static str,
    pub total_answers: &'static str,
    pub report_date: &'static str,

    pub responses_sheet: &'static str,
    pub response_headers: [&'static str; 6],

    pub ratings_sheet: &'static str,
    pub question_id: &'static str,
    pub question_text: &'static str,
    pub section: &'static str,
    pub star_buckets: [&'static str; RATING_BUCKETS],

    pub statistics_sheet: &'static str,
    pub statistics_title: &'static str,
    pub statistics_headers: [&'static str; 3],

    pub right_to_left: bool,
}

static ENGLISH_LABELS: ExportLabels = ExportLabels {
    summary_sheet: "Summary",
    summary_title: "Survey Summary",
    total_responses: "Total responses submitted",
    total_answers: "Total answers",
    report_date: "Report date",
    responses_sheet: "Responses",
    response_headers: [
        "Full Name",
        "College",
        "Specialization",
        "Academic Level",
        "Suggestions",
        "Submitted At",
    ],
    ratings_sheet: "Ratings",
    question_id: "Question ID",
    question_text: "Question Text",
    section: "Section",
    star_buckets: ["1 star", "2 stars", "3 stars", "4 stars", "5 stars"],
    statistics_sheet: "Statistics",
    statistics_title: "Rating Statistics",
    statistics_headers: ["Question", "Average Rating", "Answer Count"],
    right_to_left: false,
};

static ARABIC_LABELS: ExportLabels = ExportLabels {
    summary_sheet: "ملخص",
    summary_title: "ملخص الاستبيان",
    total_responses: "إجمالي الاستبيانات المرسلة",
    total_answers: "إجمالي الإجابات",
    report_date: "تاريخ التقرير",
    responses_sheet: "الاستبيانات",
    response_headers: [
        "الاسم الرباعي",
        "الكلية",
        "التخصص",
        "المستوى الدراسي",
        "المقترحات",
        "تاريخ الإرسال",
    ],
    ratings_sheet: "التقييمات",
    question_id: "رقم السؤال",
    question_text: "نص السؤال",
    section: "القسم",
    star_buckets: ["1 نجوم", "2 نجوم", "3 نجوم", "4 نجوم", "5 نجوم"],
    statistics_sheet: "الإحصائيات",
    statistics_title: "إحصائيات التقييمات",
    statistics_headers: ["السؤال", "متوسط التقييم", "عدد الإجابات"],
    right_to_left: true,
};

/// Options controlling document layout.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Timestamp written on the summary sheet.
    pub generated_at: DateTime<Utc>,
    /// chrono format string for dates (no time component).
    pub date_format: String,
    pub locale: ExportLocale,
}

impl ExportOptions {
    #[cfg(test)]
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            date_format: default_date_format(),
            locale: ExportLocale::default(),
        }
    }

    /// Format the date part of a timestamp, falling back to ISO dates
    /// when the configured format is unusable.
    fn format_date(&self, timestamp: &DateTime<Utc>) -> String {
        let date = timestamp.date_naive();
        let mut out = String::new();

        if !self.date_format.trim().is_empty()
            && write!(out, "{}", date.format(&self.date_format)).is_ok()
        {
            return out;
        }
        date.format("%Y-%m-%d").to_string()
    }
}

/// Whether a chrono format string can render a calendar date.
///
/// Time and offset specifiers are rejected since exported dates carry
/// neither.
pub fn is_valid_date_format(format: &str) -> bool {
    if format.trim().is_empty() {
        return false;
    }

    NaiveDate::from_ymd_opt(2025, 1, 31).is_some_and(|sample| {
        let mut out = String::new();
        write!(out, "{}", sample.format(format)).is_ok()
    })
}

/// Default date format for exported dates.
pub fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    fn count(value: usize) -> Self {
        Cell::Number(value as f64)
    }

    /// Cell content as text, numbers without a trailing `.0`.
    #[cfg(test)]
    pub fn as_text(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// One named sheet of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
    /// Column widths in character units.
    pub column_widths: Vec<f64>,
    /// Row indexes rendered in bold (titles and headers).
    pub emphasized_rows: Vec<usize>,
}

/// The full export, ready to be encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDocument {
    pub sheets: Vec<Sheet>,
    pub right_to_left: bool,
}

/// Lay out the four export sheets for a snapshot.
///
/// Sheet order is fixed: summary, responses, ratings matrix, statistics.
pub fn build_export_document(
    responses: &[Response],
    answers: &[Answer],
    catalog: &Catalog,
    options: &ExportOptions,
) -> ExportDocument {
    let labels = options.locale.labels();

    ExportDocument {
        sheets: vec![
            summary_sheet(responses, answers, options, labels),
            responses_sheet(responses, options, labels),
            ratings_sheet(answers, catalog, labels),
            statistics_sheet(answers, catalog, labels),
        ],
        right_to_left: labels.right_to_left,
    }
}

fn summary_sheet(
    responses: &[Response],
    answers: &[Answer],
    options: &ExportOptions,
    labels: &ExportLabels,
) -> Sheet {
    Sheet {
        name: labels.summary_sheet.to_string(),
        rows: vec![
            vec![Cell::text(labels.summary_title)],
            vec![],
            vec![Cell::text(labels.total_responses), Cell::count(responses.len())],
            vec![Cell::text(labels.total_answers), Cell::count(answers.len())],
            vec![],
            vec![
                Cell::text(labels.report_date),
                Cell::text(options.format_date(&options.generated_at)),
            ],
        ],
        column_widths: vec![30.0, 20.0],
        emphasized_rows: vec![0],
    }
}

fn responses_sheet(responses: &[Response], options: &ExportOptions, labels: &ExportLabels) -> Sheet {
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(responses.len() + 1);
    rows.push(labels.response_headers.iter().map(|h| Cell::text(*h)).collect());

    for response in responses {
        rows.push(vec![
            Cell::text(&response.full_name),
            Cell::text(&response.college),
            Cell::text(&response.specialization),
            Cell::text(&response.academic_level),
            Cell::text(response.suggestions_or_empty()),
            Cell::text(options.format_date(&response.submitted_at)),
        ]);
    }

    Sheet {
        name: labels.responses_sheet.to_string(),
        rows,
        column_widths: vec![25.0, 20.0, 20.0, 15.0, 40.0, 15.0],
        emphasized_rows: vec![0],
    }
}

fn ratings_sheet(answers: &[Answer], catalog: &Catalog, labels: &ExportLabels) -> Sheet {
    let tallies = tally_by_question(answers);

    let mut header = vec![
        Cell::text(labels.question_id),
        Cell::text(labels.question_text),
        Cell::text(labels.section),
    ];
    header.extend(labels.star_buckets.iter().map(|l| Cell::text(*l)));

    let mut rows = vec![header];
    for question in catalog.questions() {
        let tally = tally_for(&tallies, question.id);

        let mut row = vec![
            Cell::text(question.id.to_string()),
            Cell::text(&question.text),
            Cell::text(&question.section),
        ];
        row.extend(tally.buckets.iter().map(|&n| Cell::count(n)));
        rows.push(row);
    }

    let mut column_widths = vec![12.0, 40.0, 25.0];
    column_widths.extend([12.0; RATING_BUCKETS]);

    Sheet {
        name: labels.ratings_sheet.to_string(),
        rows,
        column_widths,
        emphasized_rows: vec![0],
    }
}

fn statistics_sheet(answers: &[Answer], catalog: &Catalog, labels: &ExportLabels) -> Sheet {
    let tallies = tally_by_question(answers);

    let mut rows = vec![
        vec![Cell::text(labels.statistics_title)],
        vec![],
        labels
            .statistics_headers
            .iter()
            .map(|h| Cell::text(*h))
            .collect(),
    ];

    for question in catalog.questions() {
        let tally = tally_for(&tallies, question.id);
        rows.push(vec![
            Cell::text(&question.text),
            Cell::text(tally.average_label()),
            Cell::count(tally.count),
        ]);
    }

    Sheet {
        name: labels.statistics_sheet.to_string(),
        rows,
        column_widths: vec![40.0, 15.0, 15.0],
        emphasized_rows: vec![0, 2],
    }
}

impl ExportDocument {
    #[cfg(test)]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Encode the document as `.xlsx` bytes.
    pub fn encode(&self) -> Result<Vec<u8>, SurveyError> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name)?;
            worksheet.set_right_to_left(self.right_to_left);

            for (col, width) in sheet.column_widths.iter().enumerate() {
                worksheet.set_column_width(column_number(col)?, *width)?;
            }

            for (row_index, row) in sheet.rows.iter().enumerate() {
                let row_num = row_number(row_index)?;
                let emphasized = sheet.emphasized_rows.contains(&row_index);

                for (col_index, cell) in row.iter().enumerate() {
                    let col_num = column_number(col_index)?;
                    match cell {
                        Cell::Text(text) if emphasized => {
                            worksheet.write_string_with_format(row_num, col_num, text, &bold)?;
                        }
                        Cell::Text(text) => {
                            worksheet.write_string(row_num, col_num, text)?;
                        }
                        Cell::Number(value) => {
                            worksheet.write_number(row_num, col_num, *value)?;
                        }
                    }
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

fn row_number(index: usize) -> Result<RowNum, XlsxError> {
    RowNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

fn column_number(index: usize) -> Result<ColNum, XlsxError> {
    ColNum::try_from(index).map_err(|_| XlsxError::RowColumnLimitError)
}

/// Suggested download name, e.g. `survey_report_2025-03-14.xlsx`.
pub fn suggested_filename(date: NaiveDate) -> String {
    format!("survey_report_{}.xlsx", date.format("%Y-%m-%d"))
}
