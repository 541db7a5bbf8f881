//! # connectfour-term
//!
//! Terminal client for networked two-player Connect Four.
//!
//! - [`connectfour`]: board grid, the shared board model and the line protocol
//! - [`core`]: connection handling, ui dispatch, config, logging, errors
//! - [`view`]: console renderer and input loop

pub mod connectfour;
pub mod core;
pub mod view;
