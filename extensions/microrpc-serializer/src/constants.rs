/// Wire code of [`crate::JsonSerializer`].
pub const JSON_SERIALIZER_CODE: u8 = 1;

/// Wire code of [`crate::BitcodeSerializer`].
pub const BITCODE_SERIALIZER_CODE: u8 = 2;
