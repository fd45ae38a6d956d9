//! Integration tests: the pipeline against a vault on disk, and the compiled binary.
//!
//! Everything lives in one test binary so the vault helpers in `common` are compiled once.

mod block_pipeline;
mod cli;
mod common;
mod selection;
