mod next_message_id;
pub use next_message_id::next_message_id;
