//! Common utilities for the Wombat selector engine.
//!
//! This crate provides shared infrastructure used by all Wombat components:
//! - **Warning System** - colored, deduplicated terminal output for
//!   selector features that are accepted but never match

pub mod warning;
