//! Processing stages of the categorizer.

pub mod batch;
pub mod classify;
pub mod paths;

// Re-export key types for convenience
pub use batch::{
    list_input_files, process_directory, process_file, BatchError, BatchOptions, BatchOutcome,
    FailedFile,
};
pub use classify::{classify, ClassifiedReading, UNMATCHED_CATEGORY};
pub use paths::{
    normalize_dir, resolve_paths, AutoConfirm, Confirmer, PathError, PromptConfirmer,
    ResolvedPaths,
};
