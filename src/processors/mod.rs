// pixie/src/processors/mod.rs
mod batch;
mod compressor;
mod loader;
mod resizer;
mod scanner;

pub use batch::{run_batch, BatchProcessor};
pub use compressor::{flatten_onto, reconcile, Compressor};
pub use loader::Loader;
pub use resizer::{ResizeMode, Resizer};
pub use scanner::list_images;
