//! Utility modules for evaluator implementations.

pub mod case;

#[doc(inline)]
pub use case::split_words;
