pub mod fs;

// Re-export commonly used functions
pub use fs::{dedup_paths, find_libraries, library_candidates, looks_like_path};
