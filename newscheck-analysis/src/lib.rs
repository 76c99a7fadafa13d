//! Local, side-effect free analysis building blocks.
//!
//! - [`scorer`]: the heuristic content scorer used whenever the remote model
//!   is unavailable or returns something unusable
//! - [`validate`]: decoding and shape-checking of remote model verdicts
//! - [`domains`]: static credibility table for URL hostnames
//!
//! Nothing in this crate performs I/O; the model clients and the orchestrator
//! live in `newscheck-llm`.

pub mod domains;
pub mod scorer;
pub mod validate;

pub use domains::{host_of, DomainCredibility, DomainTable};
pub use scorer::{HeuristicScorer, ScorerError, Signals};
pub use validate::{decode_remote_verdict, is_valid_shape, validate_shape, ShapeError, VerdictError};
