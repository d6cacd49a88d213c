// Wire protocol constants. All multi-byte integers are big-endian.

/// Size in bytes of the `head_length` field (u32).
pub const HEAD_LENGTH_SIZE: usize = 4;

/// Size in bytes of the `body_length` field (u32).
pub const BODY_LENGTH_SIZE: usize = 4;

/// Size in bytes of the `message_id` field (u32).
pub const MESSAGE_ID_SIZE: usize = 4;

/// Byte offset of the `head_length` field.
pub const HEAD_LENGTH_OFFSET: usize = 0;

/// Byte offset of the `body_length` field.
pub const BODY_LENGTH_OFFSET: usize = HEAD_LENGTH_OFFSET + HEAD_LENGTH_SIZE;

/// Byte offset of the `message_id` field.
pub const MESSAGE_ID_OFFSET: usize = BODY_LENGTH_OFFSET + BODY_LENGTH_SIZE;

/// Byte offset of the 1-byte protocol version.
pub const VERSION_OFFSET: usize = MESSAGE_ID_OFFSET + MESSAGE_ID_SIZE;

/// Byte offset of the 1-byte compression codec id.
pub const COMPRESS_OFFSET: usize = VERSION_OFFSET + 1;

/// Byte offset of the 1-byte serializer codec id.
pub const SERIALIZER_OFFSET: usize = COMPRESS_OFFSET + 1;

/// Length of the fixed header shared by requests and responses.
/// Computed as: 4 (head) + 4 (body) + 4 (message id) + 3 single-byte fields.
pub const FIXED_HEADER_LENGTH: usize = SERIALIZER_OFFSET + 1; // 15

/// Number of leading bytes a reader needs before it knows the full frame size.
pub const FRAME_PREFIX_LENGTH: usize = HEAD_LENGTH_SIZE + BODY_LENGTH_SIZE;

/// Terminates the service name, the method name and each meta entry.
pub const FIELD_SEPARATOR: u8 = b'\n';

/// Separates a meta key from its value.
pub const PAIR_SEPARATOR: u8 = b'\r';

/// Protocol version stamped on every outgoing message.
pub const PROTOCOL_VERSION: u8 = 1;

/// Compression codec id meaning "payload is not compressed".
pub const COMPRESS_NONE: u8 = 0;

/// Upper bound accepted for `head_length + body_length` of a single frame.
pub const MAX_FRAME_LENGTH: usize = 64 * 1024 * 1024;
