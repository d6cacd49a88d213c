use crate::constants::{
    COMPRESS_NONE, FIELD_SEPARATOR, FIXED_HEADER_LENGTH, PAIR_SEPARATOR, PROTOCOL_VERSION,
};
use crate::protocol::ProtocolError;
use crate::protocol::fixed_header::FixedHeader;
use std::collections::HashMap;

/// Smallest legal request header: the fixed header plus two empty names.
pub const MIN_REQUEST_HEAD_LENGTH: usize = FIXED_HEADER_LENGTH + 2;

/// A single RPC call as it travels over the wire.
///
/// `head_length` and `body_length` are not derived during encoding; they must
/// be computed beforehand (see [`Request::calculate_lengths`]) because the
/// decoder relies on them to locate every field boundary.
///
/// Neither [`FIELD_SEPARATOR`] nor [`PAIR_SEPARATOR`] may appear inside the
/// service name, the method name, or any meta key or value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    /// Byte length of everything except `data`.
    pub head_length: u32,

    /// Byte length of `data`.
    pub body_length: u32,

    /// Correlates a request with its response on one connection.
    pub message_id: u32,

    pub version: u8,

    /// Compression codec id. Carried, never interpreted.
    pub compress: u8,

    /// Serializer codec id used for `data` and for the response payload.
    pub serializer: u8,

    pub service_name: String,

    pub method_name: String,

    /// Out-of-band string pairs, e.g. tracing identifiers. Order is irrelevant.
    pub meta: HashMap<String, String>,

    /// Serialized call argument.
    pub data: Vec<u8>,
}

impl Request {
    /// Creates a request addressed to `service_name.method_name` with the
    /// current protocol version and no compression. Lengths are left at zero.
    pub fn new(service_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Request {
            version: PROTOCOL_VERSION,
            compress: COMPRESS_NONE,
            service_name: service_name.into(),
            method_name: method_name.into(),
            ..Default::default()
        }
    }

    /// The header length implied by the current names and meta.
    pub fn expected_head_length(&self) -> usize {
        let meta_length: usize = self
            .meta
            .iter()
            .map(|(key, value)| key.len() + 1 + value.len() + 1)
            .sum();

        FIXED_HEADER_LENGTH + self.service_name.len() + 1 + self.method_name.len() + 1 + meta_length
    }

    pub fn calculate_head_length(&mut self) {
        self.head_length = self.expected_head_length() as u32;
    }

    pub fn calculate_body_length(&mut self) {
        self.body_length = self.data.len() as u32;
    }

    /// Computes both length fields. Must be called after the last change to
    /// names, meta or data and before [`Request::encode`].
    pub fn calculate_lengths(&mut self) {
        self.calculate_head_length();
        self.calculate_body_length();
    }

    /// Serializes the request in wire order.
    pub fn encode(&self) -> Vec<u8> {
        debug_assert_eq!(self.head_length as usize, self.expected_head_length());
        debug_assert_eq!(self.body_length as usize, self.data.len());

        let mut buf = Vec::with_capacity(self.head_length as usize + self.body_length as usize);

        self.fixed_header().write(&mut buf);

        buf.extend_from_slice(self.service_name.as_bytes());
        buf.push(FIELD_SEPARATOR);
        buf.extend_from_slice(self.method_name.as_bytes());
        buf.push(FIELD_SEPARATOR);

        for (key, value) in &self.meta {
            buf.extend_from_slice(key.as_bytes());
            buf.push(PAIR_SEPARATOR);
            buf.extend_from_slice(value.as_bytes());
            buf.push(FIELD_SEPARATOR);
        }

        buf.extend_from_slice(&self.data);

        buf
    }

    /// Parses a complete request frame.
    ///
    /// Separators are only searched for inside the header region, so payload
    /// bytes can never be mistaken for names or meta.
    pub fn decode(buf: &[u8]) -> Result<Request, ProtocolError> {
        let header = FixedHeader::read(buf, MIN_REQUEST_HEAD_LENGTH)?;
        let head_end = header.head_length as usize;

        let mut region = &buf[FIXED_HEADER_LENGTH..head_end];

        let service_name = take_field(&mut region, "service name")?;
        let method_name = take_field(&mut region, "method name")?;

        let mut meta = HashMap::new();
        while !region.is_empty() {
            let entry_end = region
                .iter()
                .position(|&b| b == FIELD_SEPARATOR)
                .ok_or(ProtocolError::MalformedMeta)?;
            let entry = &region[..entry_end];
            let pair_at = entry
                .iter()
                .position(|&b| b == PAIR_SEPARATOR)
                .ok_or(ProtocolError::MalformedMeta)?;

            let key = to_string(&entry[..pair_at], "meta key")?;
            let value = to_string(&entry[pair_at + 1..], "meta value")?;
            meta.insert(key, value);

            region = &region[entry_end + 1..];
        }

        Ok(Request {
            head_length: header.head_length,
            body_length: header.body_length,
            message_id: header.message_id,
            version: header.version,
            compress: header.compress,
            serializer: header.serializer,
            service_name,
            method_name,
            meta,
            data: buf[head_end..].to_vec(),
        })
    }

    fn fixed_header(&self) -> FixedHeader {
        FixedHeader {
            head_length: self.head_length,
            body_length: self.body_length,
            message_id: self.message_id,
            version: self.version,
            compress: self.compress,
            serializer: self.serializer,
        }
    }
}

/// Splits off everything up to the next field separator and advances `region`
/// past it.
fn take_field(region: &mut &[u8], field: &'static str) -> Result<String, ProtocolError> {
    let end = region
        .iter()
        .position(|&b| b == FIELD_SEPARATOR)
        .ok_or(ProtocolError::MissingSeparator(field))?;
    let value = to_string(&region[..end], field)?;
    *region = &region[end + 1..];
    Ok(value)
}

fn to_string(bytes: &[u8], field: &'static str) -> Result<String, ProtocolError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::InvalidUtf8(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_field_advances_past_separator() {
        let mut region: &[u8] = b"user\nget\n";
        assert_eq!(take_field(&mut region, "service name").unwrap(), "user");
        assert_eq!(region, b"get\n");
        assert_eq!(take_field(&mut region, "method name").unwrap(), "get");
        assert!(region.is_empty());
    }

    #[test]
    fn take_field_without_separator_fails() {
        let mut region: &[u8] = b"user";
        assert!(matches!(
            take_field(&mut region, "service name"),
            Err(ProtocolError::MissingSeparator("service name"))
        ));
    }
}
