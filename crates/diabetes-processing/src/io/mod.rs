//! CSV input and output.

mod loader;
mod writer;

pub use loader::DatasetLoader;
pub use writer::DatasetWriter;
