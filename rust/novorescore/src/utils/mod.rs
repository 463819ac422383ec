pub mod compression;
pub mod formatting;

pub use compression::{
    TextCompression,
    open_text,
};
pub use formatting::{
    format_float,
    format_optional_float,
};
