//! Best-template selection.

use std::sync::Arc;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use super::record::{ParsedRecord, parse};
use super::repository::TemplateRepository;
use super::score::{ScoreBreakdown, score};

/// Result of a best-template search. A search with no winner is not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    /// Id of the winning template, `None` if nothing scored above zero.
    pub template_id: Option<String>,

    /// Context label of the winning template.
    pub context_label: Option<String>,

    /// Records produced by the winning template.
    pub records: Vec<ParsedRecord>,

    /// Winning score, 0 to 100.
    pub score: f64,

    /// How the winning score was made up.
    pub breakdown: ScoreBreakdown,
}

impl MatchOutcome {
    /// Whether any template won.
    pub fn is_match(&self) -> bool {
        self.template_id.is_some()
    }
}

/// Runs candidate templates over raw output and keeps the best-scoring one.
#[derive(Debug, Clone)]
pub struct TemplateMatcher {
    repository: Arc<TemplateRepository>,
}

impl TemplateMatcher {
    /// Create a matcher over a shared repository.
    pub fn new(repository: Arc<TemplateRepository>) -> Self {
        Self { repository }
    }

    /// The repository this matcher searches.
    pub fn repository(&self) -> &Arc<TemplateRepository> {
        &self.repository
    }

    /// Find the template that parses `raw_text` best.
    ///
    /// Candidates are the templates selected by `hint` (see
    /// [`TemplateRepository::filtered_templates`]). Templates that fail to
    /// compile or parse are skipped. A candidate replaces the current best
    /// only with a strictly higher score, so ties go to the earlier template
    /// and a zero score never wins.
    pub fn find_best_template(&self, raw_text: &str, hint: Option<&str>) -> MatchOutcome {
        let candidates = self.repository.filtered_templates(hint);
        debug!("{} candidate templates for hint {:?}", candidates.len(), hint);

        let mut best = MatchOutcome::default();
        for template in candidates {
            let records = match parse(template, raw_text) {
                Ok(records) => records,
                Err(e) => {
                    trace!("skipping template: {}", e);
                    continue;
                }
            };

            let breakdown = score(&records, template.category);
            let total = breakdown.total();
            trace!(
                "{} -> {:.2} ({} records, {:?})",
                template.id,
                total,
                records.len(),
                breakdown
            );

            if total > best.score {
                best = MatchOutcome {
                    template_id: Some(template.id.clone()),
                    context_label: Some(template.context_label.clone()),
                    records,
                    score: total,
                    breakdown,
                };
            }
        }

        if let Some(id) = &best.template_id {
            debug!("best template {} with score {:.2}", id, best.score);
        }
        best
    }
}
