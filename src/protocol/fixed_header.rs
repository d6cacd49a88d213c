use crate::constants::{
    BODY_LENGTH_OFFSET, COMPRESS_OFFSET, FIXED_HEADER_LENGTH, FRAME_PREFIX_LENGTH,
    HEAD_LENGTH_OFFSET, MESSAGE_ID_OFFSET, SERIALIZER_OFFSET, VERSION_OFFSET,
};
use crate::protocol::ProtocolError;

/// The 15-byte prefix shared by requests and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FixedHeader {
    pub head_length: u32,
    pub body_length: u32,
    pub message_id: u32,
    pub version: u8,
    pub compress: u8,
    pub serializer: u8,
}

impl FixedHeader {
    pub fn write(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.head_length.to_be_bytes());
        buf.extend_from_slice(&self.body_length.to_be_bytes());
        buf.extend_from_slice(&self.message_id.to_be_bytes());
        buf.push(self.version);
        buf.push(self.compress);
        buf.push(self.serializer);
    }

    /// Parses the fixed header and checks that `buf` holds exactly
    /// `head_length + body_length` bytes, with `head_length >= min_head_length`.
    pub fn read(buf: &[u8], min_head_length: usize) -> Result<Self, ProtocolError> {
        if buf.len() < FIXED_HEADER_LENGTH {
            return Err(ProtocolError::Truncated {
                expected: FIXED_HEADER_LENGTH,
                actual: buf.len(),
            });
        }

        let header = FixedHeader {
            head_length: read_u32(buf, HEAD_LENGTH_OFFSET),
            body_length: read_u32(buf, BODY_LENGTH_OFFSET),
            message_id: read_u32(buf, MESSAGE_ID_OFFSET),
            version: buf[VERSION_OFFSET],
            compress: buf[COMPRESS_OFFSET],
            serializer: buf[SERIALIZER_OFFSET],
        };

        if (header.head_length as usize) < min_head_length {
            return Err(ProtocolError::HeadLengthTooShort {
                head_length: header.head_length,
                minimum: min_head_length,
            });
        }

        let declared = header.frame_length();
        if buf.len() < declared {
            return Err(ProtocolError::Truncated {
                expected: declared,
                actual: buf.len(),
            });
        }
        if buf.len() > declared {
            return Err(ProtocolError::LengthMismatch {
                declared,
                actual: buf.len(),
            });
        }

        Ok(header)
    }

    pub fn frame_length(&self) -> usize {
        self.head_length as usize + self.body_length as usize
    }
}

/// Extracts `(head_length, body_length)` from the first eight bytes of a frame.
pub fn frame_lengths(prefix: &[u8; FRAME_PREFIX_LENGTH]) -> (u32, u32) {
    (
        read_u32(prefix, HEAD_LENGTH_OFFSET),
        read_u32(prefix, BODY_LENGTH_OFFSET),
    )
}

/// Reads the message id of an encoded frame without decoding the rest.
pub fn frame_message_id(frame: &[u8]) -> Result<u32, ProtocolError> {
    if frame.len() < FIXED_HEADER_LENGTH {
        return Err(ProtocolError::Truncated {
            expected: FIXED_HEADER_LENGTH,
            actual: frame.len(),
        });
    }
    Ok(read_u32(frame, MESSAGE_ID_OFFSET))
}

// Callers guarantee `offset + 4 <= buf.len()`.
fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_be_bytes(bytes)
}
