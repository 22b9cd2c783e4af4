//! Human-readable HIR dumps.
//!
//! The text form looks like source with type annotations and mangled names
//! in brackets. It is meant for reading, not for loading back:
//! [`HirTextReader`] only reports that text input is unsupported.

mod reader;
mod writer;

pub use reader::HirTextReader;
pub use writer::HirTextWriter;

#[cfg(test)]
mod tests;
