//! Rating aggregation and statistics.
//!
//! This module turns a flat snapshot of responses and answers into
//! per-question, per-section and categorical statistics. The same
//! [`RatingTally`] feeds both the dashboard and the spreadsheet export,
//! so the two can never disagree on an average.

use crate::catalog::Catalog;
use crate::models::{
    AnalyticsResult, Answer, CategoryDistribution, Classifier, QuestionStat, Response,
    SectionStat, MAX_RATING, MIN_RATING,
};
use std::collections::HashMap;

/// Number of star buckets on the rating scale.
pub const RATING_BUCKETS: usize = (MAX_RATING - MIN_RATING + 1) as usize;

/// Running totals of the ratings given to one question (or section).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RatingTally {
    /// Sum of every rating recorded.
    pub sum: u64,
    /// Number of ratings recorded.
    pub count: usize,
    /// Per-star counts; out-of-scale ratings are not bucketed.
    pub buckets: [usize; RATING_BUCKETS],
}

impl RatingTally {
    /// Record a single rating.
    pub fn record(&mut self, rating: u8) {
        self.sum += u64::from(rating);
        self.count += 1;

        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            self.buckets[(rating - MIN_RATING) as usize] += 1;
        }
    }

    /// Fold another tally's raw totals into this one.
    pub fn merge(&mut self, other: &RatingTally) {
        self.sum += other.sum;
        self.count += other.count;
        for (mine, theirs) in self.buckets.iter_mut().zip(other.buckets.iter()) {
            *mine += theirs;
        }
    }

    /// Mean rating rounded to 2 decimals, 0 when nothing was recorded.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        round_to_hundredths(self.sum as f64 / self.count as f64)
    }

    /// Mean rating as fixed 2-decimal text, `"0"` when nothing was recorded.
    pub fn average_label(&self) -> String {
        if self.count == 0 {
            return "0".to_string();
        }
        format!("{:.2}", self.average())
    }
}

/// Round to 2 decimal places, ties away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Tally answers by question id.
///
/// Answers are not joined against responses; orphaned answers still count
/// towards their question.
pub fn tally_by_question(answers: &[Answer]) -> HashMap<u32, RatingTally> {
    let mut tallies: HashMap<u32, RatingTally> = HashMap::new();

    for answer in answers {
        tallies
            .entry(answer.question_id)
            .or_default()
            .record(answer.rating);
    }

    tallies
}

/// Tally for one catalog question, empty if it received no answers.
pub fn tally_for(tallies: &HashMap<u32, RatingTally>, question_id: u32) -> RatingTally {
    tallies.get(&question_id).copied().unwrap_or_default()
}

/// One statistic per catalog question, in catalog order.
pub fn question_stats(catalog: &Catalog, tallies: &HashMap<u32, RatingTally>) -> Vec<QuestionStat> {
    catalog
        .questions()
        .iter()
        .map(|q| {
            let tally = tally_for(tallies, q.id);
            QuestionStat {
                question_id: q.id,
                average: tally.average(),
                count: tally.count,
            }
        })
        .collect()
}

/// One statistic per section, in first-appearance order.
///
/// Section averages are computed from the raw sums and counts of their
/// questions, never from the rounded per-question averages.
pub fn section_stats(catalog: &Catalog, tallies: &HashMap<u32, RatingTally>) -> Vec<SectionStat> {
    catalog
        .sections()
        .into_iter()
        .map(|section| {
            let mut combined = RatingTally::default();
            for question in catalog.questions_in_section(section) {
                combined.merge(&tally_for(tallies, question.id));
            }

            SectionStat {
                section: section.to_string(),
                average: combined.average(),
            }
        })
        .collect()
}

/// Combined tally over every catalog question.
///
/// Answers to questions outside the catalog are left out, matching the
/// per-section figures.
pub fn overall_tally(catalog: &Catalog, tallies: &HashMap<u32, RatingTally>) -> RatingTally {
    let mut overall = RatingTally::default();
    for question in catalog.questions() {
        overall.merge(&tally_for(tallies, question.id));
    }
    overall
}

/// Count responses per classifier value, keeping first-seen order.
pub fn distribution(responses: &[Response], classifier: Classifier) -> Vec<CategoryDistribution> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut dist: Vec<CategoryDistribution> = Vec::new();

    for response in responses {
        let key = classifier.value_of(response);

        match positions.get(key) {
            Some(&index) => dist[index].count += 1,
            None => {
                positions.insert(key, dist.len());
                dist.push(CategoryDistribution {
                    key: key.to_string(),
                    count: 1,
                });
            }
        }
    }

    dist
}

/// Compute every dashboard statistic from one snapshot.
///
/// Pure and deterministic: no I/O, no hidden state, and never fails,
/// including on empty input.
pub fn compute_analytics(
    responses: &[Response],
    answers: &[Answer],
    catalog: &Catalog,
) -> AnalyticsResult {
    let tallies = tally_by_question(answers);

    AnalyticsResult {
        question_stats: question_stats(catalog, &tallies),
        section_stats: section_stats(catalog, &tallies),
        college_distribution: distribution(responses, Classifier::College),
        level_distribution: distribution(responses, Classifier::AcademicLevel),
        overall_average: overall_tally(catalog, &tallies).average(),
        total_responses: responses.len(),
        total_answers: answers.len(),
    }
}
