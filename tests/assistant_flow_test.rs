use std::sync::Arc;
use std::time::Duration;

use melaka::application::ports::{ConversationStore, GenerationError};
use melaka::application::services::{
    detect_intent, CategoryClassifier, ChatConfig, ChatService, ComposerSettings,
    RecommendationComposer, RequestIntent, RetryPolicy,
};
use melaka::domain::{
    CatalogItem, CategoryKeywordTable, Conversation, ConversationKey, ItemId, Message,
    MessageKind,
};
use melaka::infrastructure::catalog::StaticCatalog;
use melaka::infrastructure::llm::MockGenerationClient;
use melaka::infrastructure::persistence::{InMemoryConversationStore, InMemoryNotificationCounter};

fn catalog_item(title: &str, category: &str, rating: f32, total_orders: u32) -> CatalogItem {
    CatalogItem {
        id: ItemId::new(),
        title: title.to_string(),
        category: category.to_string(),
        subcategory: String::new(),
        tags: Vec::new(),
        basic_price: 80.0,
        basic_delivery_days: 4,
        rating,
        review_count: 12,
        total_orders,
        is_active: true,
    }
}

fn service(
    outcomes: Vec<Result<String, GenerationError>>,
    store: Arc<InMemoryConversationStore>,
    items: Vec<CatalogItem>,
) -> ChatService<MockGenerationClient> {
    let generation = Arc::new(MockGenerationClient::with_outcomes(outcomes));
    let policy = RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(1),
        attempt_timeout: Duration::from_secs(5),
    };

    ChatService::new(
        store as Arc<dyn ConversationStore>,
        Arc::new(InMemoryNotificationCounter::new()) as _,
        Arc::new(StaticCatalog::new(items)) as _,
        CategoryClassifier::new(
            CategoryKeywordTable::builtin(),
            Arc::clone(&generation),
            policy.clone(),
        ),
        RecommendationComposer::new(generation, policy, ComposerSettings::default()),
        ChatConfig::default(),
    )
}

#[tokio::test]
async fn given_catalog_request_when_sending_then_the_best_item_is_recommended_live() {
    let logo = catalog_item("Minimalist Logo Design", "design", 4.8, 20);
    let backend = catalog_item("Backend API Development", "development", 4.9, 80);

    let store = Arc::new(InMemoryConversationStore::new());
    let service = service(
        vec![Ok(
            "For your bakery I recommend Minimalist Logo Design, clean and memorable."
                .to_string(),
        )],
        Arc::clone(&store),
        vec![logo.clone(), backend],
    );

    let mut updates = service.subscribe("user-1").await.unwrap();

    let outcome = service
        .send("user-1", "I need a logo for my bakery")
        .await
        .unwrap();

    // the reply is a recommendation backed only by the logo item
    let cards = outcome.agent_message.recommended_items();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, logo.id);
    assert_eq!(cards[0].title, "Minimalist Logo Design");
    assert!(!outcome.agent_message.content.is_empty());

    // an open chat view observes the full, consistent log
    let snapshot = updates.next_change().await.unwrap();
    assert_eq!(snapshot.messages.len(), 3);
    assert_eq!(snapshot.messages[2].recommended_items().len(), 1);
}

#[tokio::test]
async fn given_follow_up_to_a_needs_question_when_sending_then_candidates_are_still_retrieved() {
    let logo = catalog_item("Minimalist Logo Design", "design", 4.8, 20);

    let key = ConversationKey::new("user-1", "assistant");
    let store = Arc::new(InMemoryConversationStore::new());
    let mut seeded = Conversation::new(key, "Hi!");
    seeded.push(Message::user("hi"));
    seeded.push(Message::response("Happy to help, what do you need?"));
    store.set(&seeded).await.unwrap();

    let service = service(
        vec![
            // no keyword scores, so classification falls back and declines
            Ok("none".to_string()),
            Ok("Then Minimalist Logo Design would suit your shop well.".to_string()),
        ],
        Arc::clone(&store),
        vec![logo.clone()],
    );

    let outcome = service
        .send("user-1", "something stylish for my shop")
        .await
        .unwrap();

    let cards = outcome.agent_message.recommended_items();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, logo.id);
}

#[tokio::test]
async fn given_small_talk_when_sending_then_no_cards_are_attached() {
    let logo = catalog_item("Minimalist Logo Design", "design", 4.8, 20);

    let store = Arc::new(InMemoryConversationStore::new());
    let service = service(
        vec![Ok("none".to_string()), Ok("Hey! How can I help?".to_string())],
        Arc::clone(&store),
        vec![logo],
    );

    let outcome = service.send("user-1", "good morning").await.unwrap();

    assert_eq!(outcome.agent_message.kind, MessageKind::Response);
    assert!(outcome.agent_message.recommended_items().is_empty());
}

#[test]
fn given_project_wording_then_intent_reads_as_catalog_search() {
    assert_eq!(
        detect_intent("I am looking for a designer", &[]),
        RequestIntent::CatalogSearch
    );
    assert_eq!(
        detect_intent("good morning", &[]),
        RequestIntent::ChitChat
    );
}

#[test]
fn given_prior_needs_question_then_intent_reads_as_follow_up() {
    let context = vec![
        Message::user("hi"),
        Message::response("Happy to help, what do you need?"),
    ];

    assert_eq!(
        detect_intent("something stylish", &context),
        RequestIntent::FollowUp
    );
}
