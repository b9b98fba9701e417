//! Upload intake: decode the request, stage the bytes in a temp file and register them
//! with the asset store.

pub mod decoder;
pub mod pipeline;
pub mod temp_file;

pub use decoder::{decode, DecodeOutcome};
pub use pipeline::IngestionPipeline;
pub use temp_file::TempFileHandle;
