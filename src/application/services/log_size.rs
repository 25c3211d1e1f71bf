use crate::domain::Message;

/// Byte length of the canonical (JSON) encoding of a message log. The same
/// encoding is what the store measures against the platform ceiling, so the
/// estimate tracks the persisted size exactly. An unserializable log
/// saturates to `usize::MAX` and is treated as oversized.
pub fn estimate_log_size(messages: &[Message]) -> usize {
    serde_json::to_vec(messages).map_or(usize::MAX, |encoded| encoded.len())
}
