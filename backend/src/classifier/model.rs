use std::collections::HashMap;

use super::extract::tokens;
use super::profiles::CategoryProfiles;

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("no category profiles loaded")]
    NoProfiles,
    #[error("document has no words to score")]
    NoWords,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub category: String,
    pub score: f32,
}

/// Keyword-profile classifier. A category scores the sum of its keyword
/// weights over every occurrence in the document; the best score wins and
/// ties go to the category listed first.
#[derive(Debug, Clone)]
pub struct Classifier {
    profiles: CategoryProfiles,
}

impl Classifier {
    pub fn new(profiles: CategoryProfiles) -> Self {
        Self { profiles }
    }

    pub fn category_count(&self) -> usize {
        self.profiles.categories.len()
    }

    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifyError> {
        if self.profiles.categories.is_empty() {
            return Err(ClassifyError::NoProfiles);
        }

        let mut counts: HashMap<String, usize> = HashMap::new();
        for word in tokens(text) {
            *counts.entry(word).or_insert(0) += 1;
        }
        if counts.is_empty() {
            return Err(ClassifyError::NoWords);
        }

        let mut best: Option<Prediction> = None;
        for profile in &self.profiles.categories {
            let score: f32 = profile
                .keywords
                .iter()
                .filter_map(|(keyword, weight)| counts.get(keyword).map(|n| *n as f32 * weight))
                .sum();

            if score > best.as_ref().map_or(0.0, |b| b.score) {
                best = Some(Prediction {
                    category: profile.name.clone(),
                    score,
                });
            }
        }

        Ok(best.unwrap_or_else(|| {
            log::debug!("No profile keyword matched, using the default category");
            Prediction {
                category: self.profiles.default_category.clone(),
                score: 0.0,
            }
        }))
    }
}
