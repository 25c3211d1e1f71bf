mod category_classifier;
mod chat_service;
mod generation_policy;
mod log_size;
mod recommendation_composer;
mod relevance_ranker;
mod text_scan;

pub use category_classifier::CategoryClassifier;
pub use chat_service::{
    detect_intent, ChatConfig, ChatError, ChatService, RequestIntent, SendOutcome, NEEDS_QUESTION,
};
pub use generation_policy::{generate_with_retry, RetryPolicy};
pub use log_size::estimate_log_size;
pub use recommendation_composer::{
    contains_positive_phrase, extract_mentions, Composition, ComposerSettings,
    RecommendationComposer,
};
pub use relevance_ranker::{rank, score};
