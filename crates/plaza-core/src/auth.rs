//! Ownership check for message mutation.

use plaza_types::message::Message;

/// Whether `requester` authored `message`.
///
/// This is the entire authorization model: identity is the self-asserted
/// participant name, and only the author may edit or delete a message.
pub fn is_owner(message: &Message, requester: &str) -> bool {
    message.from == requester
}
