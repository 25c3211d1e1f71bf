use std::fmt::Write;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{instrument, warn};

use crate::application::ports::{GenerationClient, GenerationError};
use crate::domain::{CatalogItem, ItemRef, Message, Sender};

use super::generation_policy::{generate_with_retry, RetryPolicy};
use super::text_scan;

/// Narrative wording that signals the model endorsed something even when no
/// candidate title survived extraction.
const POSITIVE_PHRASES: &[&str] = &[
    "recommend",
    "suitable",
    "good fit",
    "great option",
    "worth a look",
    "perfect for",
];

/// Title words longer than this count as significant for fuzzy matching.
const SIGNIFICANT_WORD_LEN: usize = 3;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposerSettings {
    /// Target human language for the narrative.
    pub language: String,
    /// Length bound passed to the model, in words.
    pub max_narrative_words: usize,
    /// Prompt size is bounded by how many candidates are described.
    pub max_prompt_candidates: usize,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            max_narrative_words: 60,
            max_prompt_candidates: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Composition {
    pub narrative: String,
    /// Ordered subset of the candidates passed in; never fabricated.
    pub recommended: Vec<ItemRef>,
}

pub struct RecommendationComposer<G>
where
    G: GenerationClient,
{
    generation: Arc<G>,
    policy: RetryPolicy,
    settings: ComposerSettings,
}

impl<G> RecommendationComposer<G>
where
    G: GenerationClient,
{
    pub fn new(generation: Arc<G>, policy: RetryPolicy, settings: ComposerSettings) -> Self {
        Self {
            generation,
            policy,
            settings,
        }
    }

    /// Produces a natural-language recommendation over the ranked
    /// candidates and decides which of them to surface as cards. Generation
    /// failures degrade to a templated narrative around the top candidate.
    #[instrument(skip(self, request, candidates), fields(candidate_count = candidates.len()))]
    pub async fn compose(&self, request: &str, candidates: &[CatalogItem]) -> Composition {
        let Some(top) = candidates.first() else {
            warn!("compose called without candidates");
            return Composition {
                narrative: String::new(),
                recommended: Vec::new(),
            };
        };

        let prompt = self.build_prompt(request, candidates);
        match generate_with_retry(self.generation.as_ref(), &prompt, &self.policy).await {
            Ok(narrative) => {
                let mentioned = extract_mentions(&narrative, candidates);
                let recommended = if mentioned.is_empty() && contains_positive_phrase(&narrative)
                {
                    // the model endorsed something without naming it; back
                    // the narrative with the strongest candidate
                    vec![ItemRef::from(top)]
                } else {
                    mentioned.into_iter().map(ItemRef::from).collect()
                };
                Composition {
                    narrative,
                    recommended,
                }
            }
            Err(err) => {
                warn!(error = %err, "narrative generation failed, using template");
                Composition {
                    narrative: templated_narrative(top, &err),
                    recommended: vec![ItemRef::from(top)],
                }
            }
        }
    }

    /// Direct conversational reply for turns without catalog candidates.
    #[instrument(skip(self, request, context), fields(context_len = context.len()))]
    pub async fn conversational_reply(
        &self,
        request: &str,
        context: &[Message],
    ) -> Result<String, GenerationError> {
        let prompt = self.build_chat_prompt(request, context);
        generate_with_retry(self.generation.as_ref(), &prompt, &self.policy).await
    }

    /// The prompt carries only id-free display fields, keeping it compact
    /// and leaving the model nothing to leak.
    fn build_prompt(&self, request: &str, candidates: &[CatalogItem]) -> String {
        let mut prompt = format!(
            "You are a marketplace shopping assistant. A buyer asked: \"{}\"\n\nAvailable services:\n",
            request.trim()
        );
        for item in candidates.iter().take(self.settings.max_prompt_candidates) {
            let _ = writeln!(
                prompt,
                "- \"{}\": from ${:.0}, delivered in about {} days",
                item.title, item.basic_price, item.basic_delivery_days
            );
        }
        let _ = write!(
            prompt,
            "\nRecommend 1-2 of these services, naming them by their exact title. \
             Reply in {}, in at most {} words, friendly and concrete.",
            self.settings.language, self.settings.max_narrative_words
        );
        prompt
    }

    fn build_chat_prompt(&self, request: &str, context: &[Message]) -> String {
        let mut prompt = String::from(
            "You are a marketplace shopping assistant helping a buyer find services.\n",
        );
        if !context.is_empty() {
            prompt.push_str("\nConversation so far:\n");
            for message in context {
                let speaker = match message.sender {
                    Sender::User => "buyer",
                    Sender::Agent => "assistant",
                };
                let _ = writeln!(prompt, "{speaker}: {}", message.content);
            }
        }
        let _ = write!(
            prompt,
            "\nbuyer: {}\n\nReply in {}, in at most {} words. If it is not yet clear \
             what the buyer needs, ask them: what do you need?",
            request.trim(),
            self.settings.language,
            self.settings.max_narrative_words
        );
        prompt
    }
}

/// Candidates actually referenced by the generated text, in candidate
/// order. A title counts as mentioned when it occurs verbatim
/// (case-insensitive), or when at least two of its significant words exist
/// and at least 60% of them occur in the text.
pub fn extract_mentions<'a>(
    narrative: &str,
    candidates: &'a [CatalogItem],
) -> Vec<&'a CatalogItem> {
    let narrative_lower = narrative.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| title_mentioned(&narrative_lower, &candidate.title))
        .collect()
}

fn title_mentioned(narrative_lower: &str, title: &str) -> bool {
    let title_lower = title.to_lowercase();
    if narrative_lower.contains(&title_lower) {
        return true;
    }

    let significant: Vec<String> = text_scan::words(&title_lower)
        .into_iter()
        .filter(|word| word.chars().count() > SIGNIFICANT_WORD_LEN)
        .collect();
    if significant.len() < 2 {
        return false;
    }

    let matched = significant
        .iter()
        .filter(|word| narrative_lower.contains(word.as_str()))
        .count();
    matched * 10 >= significant.len() * 6
}

pub fn contains_positive_phrase(narrative: &str) -> bool {
    let lowered = narrative.to_lowercase();
    POSITIVE_PHRASES.iter().any(|phrase| lowered.contains(phrase))
}

fn templated_narrative(top: &CatalogItem, err: &GenerationError) -> String {
    match err {
        GenerationError::ContentBlocked => format!(
            "Sorry, I could not phrase that one. A safe pick instead: \"{}\", from ${:.0}, \
             delivered in about {} days.",
            top.title, top.basic_price, top.basic_delivery_days
        ),
        _ => format!(
            "Take a look at \"{}\": rated {:.1}, from ${:.0}, delivered in about {} days.",
            top.title, top.rating, top.basic_price, top.basic_delivery_days
        ),
    }
}
