use std::fmt::Write;
use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::ports::GenerationClient;
use crate::domain::CategoryKeywordTable;

use super::generation_policy::{generate_with_retry, RetryPolicy};
use super::text_scan;

pub struct CategoryClassifier<G>
where
    G: GenerationClient,
{
    table: CategoryKeywordTable,
    generation: Arc<G>,
    policy: RetryPolicy,
}

impl<G> CategoryClassifier<G>
where
    G: GenerationClient,
{
    pub fn new(table: CategoryKeywordTable, generation: Arc<G>, policy: RetryPolicy) -> Self {
        Self {
            table,
            generation,
            policy,
        }
    }

    /// Maps a free-text request to one catalog category. The keyword pass
    /// is authoritative; the generation fallback only runs when every
    /// category scores zero. `None` means no relevant category.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn classify(&self, text: &str) -> Option<String> {
        if let Some(category) = self.classify_by_keywords(text) {
            debug!(category, "classified by keyword table");
            return Some(category.to_string());
        }
        self.classify_by_generation(text).await
    }

    /// Deterministic pass: the category with the strictly largest number of
    /// keyword hits wins; ties keep the category listed first in the table.
    pub fn classify_by_keywords(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for (category, keywords) in self.table.entries() {
            let hits = keywords
                .iter()
                .filter(|keyword| lowered.contains(keyword.as_str()))
                .count();
            if hits == 0 {
                continue;
            }
            match best {
                Some((_, best_hits)) if hits <= best_hits => {}
                _ => best = Some((category, hits)),
            }
        }

        best.map(|(category, _)| category)
    }

    async fn classify_by_generation(&self, text: &str) -> Option<String> {
        if self.table.is_empty() {
            return None;
        }

        let mut prompt = String::from(
            "Pick the single catalog category that best matches the buyer request below.\n\
             Categories:\n",
        );
        for category in self.table.categories() {
            let _ = writeln!(prompt, "- {category}");
        }
        let _ = write!(
            prompt,
            "\nRequest: {text}\n\nAnswer with exactly one category name from the list, \
             or \"none\" if no category fits."
        );

        let answer = match generate_with_retry(self.generation.as_ref(), &prompt, &self.policy).await
        {
            Ok(answer) => answer,
            Err(err) => {
                warn!(error = %err, "category fallback generation failed");
                return None;
            }
        };

        for word in text_scan::words(&answer) {
            if word == "none" {
                return None;
            }
            if let Some(category) = self
                .table
                .categories()
                .find(|category| category.to_lowercase() == word)
            {
                debug!(category, "classified by generation fallback");
                return Some(category.to_string());
            }
        }

        debug!("generation fallback produced no known category");
        None
    }
}
