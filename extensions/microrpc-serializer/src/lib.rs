mod bitcode_serializer;
pub use bitcode_serializer::*;

pub mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod json_serializer;
pub use json_serializer::*;

mod registry;
pub use registry::*;

mod serializer;
pub use serializer::*;
