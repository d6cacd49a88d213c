use crate::constants::{COMPRESS_NONE, FIXED_HEADER_LENGTH, PROTOCOL_VERSION};
use crate::protocol::fixed_header::FixedHeader;
use crate::protocol::{ProtocolError, Request};

/// The reply to a single [`Request`].
///
/// `error` holds UTF-8 error text and is empty on success. A response may
/// carry both an error and a non-empty `data` payload when the remote method
/// failed after producing a result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// `FIXED_HEADER_LENGTH + error.len()`.
    pub head_length: u32,

    /// Byte length of `data`.
    pub body_length: u32,

    pub message_id: u32,

    pub version: u8,

    pub compress: u8,

    pub serializer: u8,

    pub error: Vec<u8>,

    /// Serialized return value; empty when the call produced none.
    pub data: Vec<u8>,
}

impl Response {
    /// Creates an empty response echoing the request's message id and codecs.
    pub fn reply_to(request: &Request) -> Self {
        Response {
            message_id: request.message_id,
            version: request.version,
            compress: request.compress,
            serializer: request.serializer,
            ..Self::new()
        }
    }

    pub fn new() -> Self {
        Response {
            head_length: FIXED_HEADER_LENGTH as u32,
            version: PROTOCOL_VERSION,
            compress: COMPRESS_NONE,
            ..Default::default()
        }
    }

    pub fn calculate_head_length(&mut self) {
        self.head_length = (FIXED_HEADER_LENGTH + self.error.len()) as u32;
    }

    pub fn calculate_body_length(&mut self) {
        self.body_length = self.data.len() as u32;
    }

    pub fn calculate_lengths(&mut self) {
        self.calculate_head_length();
        self.calculate_body_length();
    }

    /// Replaces the error text.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = message.into().into_bytes();
    }

    pub fn has_error(&self) -> bool {
        !self.error.is_empty()
    }

    /// The error text, if any. Invalid UTF-8 is replaced rather than rejected.
    pub fn error_message(&self) -> Option<String> {
        if self.error.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.error).into_owned())
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        debug_assert_eq!(self.head_length as usize, FIXED_HEADER_LENGTH + self.error.len());
        debug_assert_eq!(self.body_length as usize, self.data.len());

        let mut buf = Vec::with_capacity(self.head_length as usize + self.body_length as usize);

        FixedHeader {
            head_length: self.head_length,
            body_length: self.body_length,
            message_id: self.message_id,
            version: self.version,
            compress: self.compress,
            serializer: self.serializer,
        }
        .write(&mut buf);

        buf.extend_from_slice(&self.error);
        buf.extend_from_slice(&self.data);

        buf
    }

    /// Parses a complete response frame. Any header bytes past the fixed
    /// header are the error text.
    pub fn decode(buf: &[u8]) -> Result<Response, ProtocolError> {
        let header = FixedHeader::read(buf, FIXED_HEADER_LENGTH)?;
        let head_end = header.head_length as usize;

        Ok(Response {
            head_length: header.head_length,
            body_length: header.body_length,
            message_id: header.message_id,
            version: header.version,
            compress: header.compress,
            serializer: header.serializer,
            error: buf[FIXED_HEADER_LENGTH..head_end].to_vec(),
            data: buf[head_end..].to_vec(),
        })
    }
}
