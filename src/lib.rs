//! Wire protocol for `microrpc`.
//!
//! A request frame is laid out as:
//!
//! ```text
//! [head_length:4][body_length:4][message_id:4][version:1][compress:1][serializer:1]
//! [service_name]\n[method_name]\n{[meta_key]\r[meta_value]\n}*
//! [data: body_length bytes]
//! ```
//!
//! and a response frame as:
//!
//! ```text
//! [head_length:4][body_length:4][message_id:4][version:1][compress:1][serializer:1]
//! [error: head_length - 15 bytes][data: body_length bytes]
//! ```
//!
//! Integers are big-endian. The codec is pure; transports live in the
//! `microrpc-tokio-*` crates.

pub mod constants;
pub mod protocol;
pub mod utils;
