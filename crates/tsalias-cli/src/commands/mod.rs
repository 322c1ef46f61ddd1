//! Command implementations.
//!
//! - [`replace`] - rewrite path aliases under the output directory

pub mod replace;

pub use replace::execute as replace_execute;
