use melaka::application::services::estimate_log_size;
use melaka::domain::{
    CatalogItem, Conversation, ConversationKey, ItemId, ItemRef, Message, MessageKind, Sender,
};

fn key() -> ConversationKey {
    ConversationKey::new("user-1", "assistant")
}

#[test]
fn given_conversation_key_then_the_document_id_joins_user_and_agent() {
    let key = ConversationKey::new("user-1", "assistant");

    assert_eq!(key.document_id(), "user-1_assistant");
    assert_eq!(key.to_string(), "user-1_assistant");
}

#[test]
fn given_new_conversation_then_it_opens_with_a_single_welcome_message() {
    let conversation = Conversation::new(key(), "Hi!");

    assert_eq!(conversation.messages.len(), 1);
    assert_eq!(conversation.messages[0].kind, MessageKind::Welcome);
    assert_eq!(conversation.messages[0].sender, Sender::Agent);
    assert!(conversation.is_active);
    assert_eq!(conversation.trimmed_count, 0);
}

#[test]
fn given_duplicate_message_id_when_pushing_then_it_is_refused() {
    let mut conversation = Conversation::new(key(), "Hi!");
    let message = Message::user("hello");

    conversation.push(message.clone());
    conversation.push(message);

    assert_eq!(conversation.messages.len(), 2);
}

#[test]
fn given_long_log_when_taking_recent_then_only_the_tail_is_returned() {
    let mut conversation = Conversation::new(key(), "Hi!");
    for i in 0..10 {
        conversation.push(Message::user(format!("message {i}")));
    }

    let recent = conversation.recent(3);

    assert_eq!(recent.len(), 3);
    assert_eq!(recent[2].content, "message 9");

    // a window larger than the log returns everything
    assert_eq!(conversation.recent(100).len(), 11);
}

#[test]
fn given_empty_card_list_when_building_recommendation_then_it_becomes_a_response() {
    let message = Message::recommendation("narrative", Vec::new());

    assert_eq!(message.kind, MessageKind::Response);
    assert!(message.recommended_items().is_empty());
}

#[test]
fn given_cards_when_building_recommendation_then_they_are_carried_in_order() {
    let item = CatalogItem {
        id: ItemId::new(),
        title: "Minimalist Logo Design".to_string(),
        category: "design".to_string(),
        subcategory: String::new(),
        tags: Vec::new(),
        basic_price: 80.0,
        basic_delivery_days: 4,
        rating: 4.8,
        review_count: 12,
        total_orders: 20,
        is_active: true,
    };
    let message = Message::recommendation("narrative", vec![ItemRef::from(&item)]);

    assert_eq!(message.recommended_items().len(), 1);
    assert_eq!(message.recommended_items()[0].id, item.id);
}

#[test]
fn given_trim_notice_then_it_is_recognizable_and_carries_the_dropped_count() {
    let notice = Message::trim_notice("5 earlier messages were removed.", 5);

    assert!(notice.is_system_notice());
    assert_eq!(notice.kind, MessageKind::SystemNotice { dropped_count: 5 });
}

#[test]
fn given_messages_when_estimating_size_then_larger_logs_estimate_larger() {
    let small = vec![Message::user("hi")];
    let large = vec![Message::user("hi".repeat(1000)), Message::user("more")];

    assert!(estimate_log_size(&small) > 0);
    assert!(estimate_log_size(&large) > estimate_log_size(&small));
}

#[test]
fn given_message_log_when_round_tripping_json_then_kinds_survive() {
    let messages = vec![
        Message::welcome("Hi!"),
        Message::user("hello"),
        Message::trim_notice("2 earlier messages were removed.", 2),
    ];

    let encoded = serde_json::to_string(&messages).unwrap();
    let decoded: Vec<Message> = serde_json::from_str(&encoded).unwrap();

    assert_eq!(messages, decoded);
}
