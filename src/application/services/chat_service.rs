use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::{
    CatalogQuery, ConversationStore, ConversationUpdates, GenerationClient, GenerationError,
    NotificationCounter, StoreError,
};
use crate::domain::{CatalogItem, Conversation, ConversationKey, Message, Sender};

use super::category_classifier::CategoryClassifier;
use super::log_size::estimate_log_size;
use super::recommendation_composer::RecommendationComposer;
use super::relevance_ranker;

const WELCOME_TEXT: &str =
    "Hi! I can help you find the right service. Tell me what you are working on.";

const FALLBACK_REPLY: &str =
    "Sorry, I am having trouble answering right now. Please try again in a moment.";

/// The follow-up marker: a prior agent turn asking this question makes the
/// next free-text message a catalog request even without keyword hits.
pub const NEEDS_QUESTION: &str = "what do you need";

/// Wording the buyer uses when describing work to commission.
const PROJECT_KEYWORDS: &[&str] = &[
    "i need",
    "i want",
    "looking for",
    "help me find",
    "order",
    "hire",
    "project",
];

/// All thresholds here are empirically chosen operating points, not
/// invariants; deployments tune them through configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub agent_id: String,
    /// Estimated log size that triggers trimming before a new turn.
    pub soft_limit_bytes: usize,
    /// Estimated log size that triggers aggressive trimming after a turn.
    pub hard_limit_bytes: usize,
    pub soft_keep_messages: usize,
    pub aggressive_keep_messages: usize,
    /// How many trailing messages are offered to the model as context.
    pub prompt_window: usize,
    pub catalog_fetch_limit: usize,
    /// Ranked candidates forwarded to the composer.
    pub max_candidates: usize,
    /// Extra whole-send attempts allowed after a storage rejection.
    pub send_retry_budget: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            agent_id: "assistant".to_string(),
            soft_limit_bytes: 300 * 1024,
            hard_limit_bytes: 400 * 1024,
            soft_keep_messages: 10,
            aggressive_keep_messages: 5,
            prompt_window: 20,
            catalog_fetch_limit: 30,
            max_candidates: 3,
            send_retry_budget: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub user_message: Message,
    pub agent_message: Message,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("conversation storage failed: {0}")]
    Storage(#[from] StoreError),
    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),
    #[error("send gave up after {attempts} attempts")]
    RetryExhausted { attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestIntent {
    /// The text reads like work to commission.
    CatalogSearch,
    /// The text answers a prior "what do you need" question.
    FollowUp,
    ChitChat,
}

/// Reads a request against its conversation context. Catalog retrieval can
/// run even when the keyword table scored zero, as long as the intent is
/// catalog-shaped.
pub fn detect_intent(text: &str, context: &[Message]) -> RequestIntent {
    let lowered = text.to_lowercase();
    if PROJECT_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return RequestIntent::CatalogSearch;
    }

    let last_agent = context
        .iter()
        .rev()
        .find(|message| message.sender == Sender::Agent);
    if let Some(message) = last_agent {
        if message.content.to_lowercase().contains(NEEDS_QUESTION) {
            return RequestIntent::FollowUp;
        }
    }

    RequestIntent::ChitChat
}

/// Owns the conversation lifecycle: lazy creation, the compaction ladder,
/// reply orchestration and bounded recovery from storage rejections.
pub struct ChatService<G>
where
    G: GenerationClient,
{
    store: Arc<dyn ConversationStore>,
    counters: Arc<dyn NotificationCounter>,
    catalog: Arc<dyn CatalogQuery>,
    classifier: CategoryClassifier<G>,
    composer: RecommendationComposer<G>,
    config: ChatConfig,
}

impl<G> ChatService<G>
where
    G: GenerationClient,
{
    pub fn new(
        store: Arc<dyn ConversationStore>,
        counters: Arc<dyn NotificationCounter>,
        catalog: Arc<dyn CatalogQuery>,
        classifier: CategoryClassifier<G>,
        composer: RecommendationComposer<G>,
        config: ChatConfig,
    ) -> Self {
        Self {
            store,
            counters,
            catalog,
            classifier,
            composer,
            config,
        }
    }

    /// Runs one user turn to completion. A storage-size rejection
    /// force-compacts the log and re-runs the whole turn; the retry budget
    /// is fixed up front, never a mutable counter captured in a closure.
    #[instrument(skip(self, text), fields(user_id = %user_id, text_len = text.len()))]
    pub async fn send(&self, user_id: &str, text: &str) -> Result<SendOutcome, ChatError> {
        let key = self.key_for(user_id);
        let max_attempts = self.config.send_retry_budget + 1;
        let mut force_compact = false;

        for attempt in 1..=max_attempts {
            match self.run_turn(&key, text, force_compact).await {
                Ok(outcome) => {
                    self.update_counters(&key).await;
                    return Ok(outcome);
                }
                Err(ChatError::Storage(StoreError::LimitExceeded { size, limit })) => {
                    warn!(
                        attempt,
                        size, limit, "store rejected the document, compacting and retrying"
                    );
                    force_compact = true;
                }
                Err(other) => return Err(other),
            }
        }

        Err(ChatError::RetryExhausted {
            attempts: max_attempts,
        })
    }

    /// Deletes the conversation document and its companion counter record.
    /// The next send recreates both with a fresh welcome message.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn reset(&self, user_id: &str) -> Result<(), ChatError> {
        let key = self.key_for(user_id);
        self.store.delete(&key).await?;
        if let Err(err) = self.counters.clear(&key).await {
            warn!(error = %err, "counter record cleanup failed");
        }
        info!("conversation reset");
        Ok(())
    }

    /// Live view for an open chat screen; the caller owns the handle.
    pub async fn subscribe(&self, user_id: &str) -> Result<ConversationUpdates, ChatError> {
        let key = self.key_for(user_id);
        Ok(self.store.subscribe(&key).await?)
    }

    fn key_for(&self, user_id: &str) -> ConversationKey {
        ConversationKey::new(user_id, self.config.agent_id.clone())
    }

    async fn run_turn(
        &self,
        key: &ConversationKey,
        text: &str,
        force_compact: bool,
    ) -> Result<SendOutcome, ChatError> {
        let mut conversation = match self.store.get(key).await? {
            Some(conversation) => conversation,
            None => Conversation::new(key.clone(), WELCOME_TEXT),
        };

        if force_compact {
            self.compact(&mut conversation, self.config.aggressive_keep_messages);
        }

        // context for the model is captured before any trimming
        let context: Vec<Message> = conversation.recent(self.config.prompt_window).to_vec();

        let size = estimate_log_size(&conversation.messages);
        if size > self.config.soft_limit_bytes {
            debug!(size, "soft threshold crossed before the new turn");
            self.compact(&mut conversation, self.config.soft_keep_messages);
        }

        let user_message = Message::user(text);
        let agent_message = self.compute_reply(text, &context).await;

        conversation.push(user_message.clone());
        conversation.push(agent_message.clone());
        conversation.is_active = true;

        let size = estimate_log_size(&conversation.messages);
        if size > self.config.hard_limit_bytes {
            debug!(size, "hard threshold crossed after the new turn");
            self.compact(&mut conversation, self.config.aggressive_keep_messages);
        }

        self.store.set(&conversation).await?;

        Ok(SendOutcome {
            user_message,
            agent_message,
        })
    }

    async fn compute_reply(&self, text: &str, context: &[Message]) -> Message {
        let category = self.classifier.classify(text).await;
        let intent = detect_intent(text, context);

        let wants_catalog = category.is_some() || intent != RequestIntent::ChitChat;
        if wants_catalog {
            match self
                .catalog
                .query(category.as_deref(), self.config.catalog_fetch_limit)
                .await
            {
                Ok(items) if !items.is_empty() => {
                    let ranked = relevance_ranker::rank(items, text);
                    let shortlist: Vec<CatalogItem> = ranked
                        .into_iter()
                        .take(self.config.max_candidates)
                        .collect();
                    let composition = self.composer.compose(text, &shortlist).await;
                    // an empty card list downgrades to a plain response
                    return Message::recommendation(
                        composition.narrative,
                        composition.recommended,
                    );
                }
                Ok(_) => debug!("no catalog candidates for this request"),
                Err(err) => {
                    warn!(error = %err, "catalog query failed, replying without candidates")
                }
            }
        }

        match self.composer.conversational_reply(text, context).await {
            Ok(reply) => Message::response(reply),
            Err(err) => {
                warn!(error = %err, "direct reply generation failed");
                Message::error(FALLBACK_REPLY)
            }
        }
    }

    /// Trims the log to its last `keep` messages behind a single synthetic
    /// notice. A log already within the window is left untouched.
    fn compact(&self, conversation: &mut Conversation, keep: usize) {
        if conversation.messages.len() <= keep {
            return;
        }

        let size_before = estimate_log_size(&conversation.messages);
        let dropped = conversation.messages.len() - keep;
        let kept = conversation.messages.split_off(dropped);
        let notice = Message::trim_notice(
            format!(
                "{dropped} earlier messages were removed to keep this conversation \
                 within its storage limit."
            ),
            dropped,
        );

        conversation.messages = std::iter::once(notice).chain(kept).collect();
        conversation.trimmed_count += dropped;
        conversation.last_trim_size_before = Some(size_before);
        conversation.last_trim_size_after = Some(estimate_log_size(&conversation.messages));

        info!(
            dropped,
            size_before,
            size_after = conversation.last_trim_size_after,
            "conversation log trimmed"
        );
    }

    /// Counter updates are best-effort; a failed badge never fails a send.
    async fn update_counters(&self, key: &ConversationKey) {
        if let Err(err) = self.counters.increment_unread(key).await {
            warn!(error = %err, "unread increment failed");
        }
        if let Err(err) = self.counters.reset_unread(key).await {
            warn!(error = %err, "unread reset failed");
        }
    }
}
