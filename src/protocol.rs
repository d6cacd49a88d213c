mod fixed_header;
mod protocol_error;
mod request;
mod response;

#[cfg(feature = "tokio_support")]
mod frame_reader;

pub use fixed_header::{frame_lengths, frame_message_id};
pub use protocol_error::ProtocolError;
pub use request::{MIN_REQUEST_HEAD_LENGTH, Request};
pub use response::Response;

#[cfg(feature = "tokio_support")]
pub use frame_reader::read_frame;
