use std::sync::Arc;
use std::time::Duration;

use melaka::application::ports::GenerationError;
use melaka::application::services::{
    extract_mentions, ComposerSettings, RecommendationComposer, RetryPolicy,
};
use melaka::domain::{CatalogItem, ItemId};
use melaka::infrastructure::llm::MockGenerationClient;

fn item(title: &str) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(),
        title: title.to_string(),
        category: "design".to_string(),
        subcategory: "logo design".to_string(),
        tags: Vec::new(),
        basic_price: 80.0,
        basic_delivery_days: 4,
        rating: 4.8,
        review_count: 12,
        total_orders: 20,
        is_active: true,
    }
}

fn composer(
    generation: Arc<MockGenerationClient>,
) -> RecommendationComposer<MockGenerationClient> {
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        attempt_timeout: Duration::from_secs(5),
    };
    RecommendationComposer::new(generation, policy, ComposerSettings::default())
}

#[test]
fn given_exact_title_in_narrative_when_extracting_then_item_is_mentioned() {
    let candidates = vec![item("Minimalist Logo Design"), item("Backend API Development")];

    let mentioned = extract_mentions(
        "For your bakery I would go with Minimalist Logo Design.",
        &candidates,
    );

    assert_eq!(mentioned.len(), 1);
    assert_eq!(mentioned[0].id, candidates[0].id);
}

#[test]
fn given_most_significant_words_in_narrative_when_extracting_then_fuzzy_match_applies() {
    let candidates = vec![item("Minimalist Logo Design")];

    // "minimalist" and "design" are two of the three significant words
    let mentioned = extract_mentions(
        "A minimalist design would suit a bakery well.",
        &candidates,
    );

    assert_eq!(mentioned.len(), 1);
}

#[test]
fn given_too_few_significant_words_when_extracting_then_no_fuzzy_match() {
    // only one significant word ("logo" is the single word longer than 3)
    let candidates = vec![item("Logo Fix")];

    let mentioned = extract_mentions("I would fix the logo colors first.", &candidates);

    assert!(mentioned.is_empty());
}

#[test]
fn given_unrelated_narrative_when_extracting_then_nothing_is_fabricated() {
    let candidates = vec![item("Minimalist Logo Design")];

    let mentioned = extract_mentions("The weather is lovely today.", &candidates);

    assert!(mentioned.is_empty());
}

#[tokio::test]
async fn given_positive_narrative_without_titles_when_composing_then_top_candidate_backs_it() {
    let generation = Arc::new(MockGenerationClient::replying(
        "The first option is a good fit for what you described.",
    ));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design"), item("Brand Style Guide")];

    let composition = composer.compose("logo for my bakery", &candidates).await;

    assert_eq!(composition.recommended.len(), 1);
    assert_eq!(composition.recommended[0].id, candidates[0].id);
}

#[tokio::test]
async fn given_neutral_narrative_without_titles_when_composing_then_no_cards_are_attached() {
    let generation = Arc::new(MockGenerationClient::replying(
        "Could you tell me more about your project?",
    ));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design")];

    let composition = composer.compose("logo for my bakery", &candidates).await;

    assert!(composition.recommended.is_empty());
    assert!(!composition.narrative.is_empty());
}

#[tokio::test]
async fn given_quota_failure_when_composing_then_template_is_used_without_retry() {
    let generation = Arc::new(MockGenerationClient::failing(GenerationError::QuotaExceeded));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design"), item("Brand Style Guide")];

    let composition = composer.compose("logo for my bakery", &candidates).await;

    assert_eq!(generation.call_count(), 1);
    assert!(composition.narrative.contains("Minimalist Logo Design"));
    assert_eq!(composition.recommended.len(), 1);
    assert_eq!(composition.recommended[0].id, candidates[0].id);
}

#[tokio::test]
async fn given_transient_failure_when_composing_then_retry_recovers() {
    let generation = Arc::new(MockGenerationClient::with_outcomes(vec![
        Err(GenerationError::TransientNetwork("connection reset".to_string())),
        Ok("I recommend Minimalist Logo Design for this.".to_string()),
    ]));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design")];

    let composition = composer.compose("logo for my bakery", &candidates).await;

    assert_eq!(generation.call_count(), 2);
    assert_eq!(composition.recommended.len(), 1);
}

#[tokio::test]
async fn given_content_blocked_when_composing_then_apology_still_carries_a_pick() {
    let generation = Arc::new(MockGenerationClient::failing(GenerationError::ContentBlocked));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design")];

    let composition = composer.compose("logo for my bakery", &candidates).await;

    assert_eq!(generation.call_count(), 1);
    assert!(composition.narrative.contains("Sorry"));
    assert_eq!(composition.recommended.len(), 1);
}

#[tokio::test]
async fn given_prompt_built_when_composing_then_only_display_fields_are_included() {
    let generation = Arc::new(MockGenerationClient::replying("ok"));
    let composer = composer(Arc::clone(&generation));
    let candidates = vec![item("Minimalist Logo Design")];

    composer.compose("logo for my bakery", &candidates).await;

    let prompts = generation.prompts();
    assert!(prompts[0].contains("Minimalist Logo Design"));
    assert!(prompts[0].contains("$80"));
    assert!(!prompts[0].contains(&candidates[0].id.as_uuid().to_string()));
}
