pub mod error_translation;

pub use error_translation::translate_errors;
