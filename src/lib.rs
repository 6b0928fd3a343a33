//! Quillgate - quality gates for multi-stage AI content pipelines.
//!
//! The [`quality`] module is the core: citation validation against a
//! reference corpus, five-dimension content scoring, and TF-IDF based
//! variation differentiation. All of it is synchronous and infallible on
//! string input. [`pipeline`] holds the async generation boundary that
//! produces variations and regenerates the ones that read too alike.

pub mod error;
pub mod logging;
pub mod pipeline;
pub mod quality;
pub mod ui;
