// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Test code may unwrap
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Animation core for a metaball "thought bubble" chat indicator.
//!
//! A bubble is a rounded rectangle whose outline is traced by a train of
//! circles. Blurred and alpha-thresholded by the renderer, the circles fuse
//! into a cloud. This crate computes everything that moves: exact-sum
//! diameter packing along the outline, spring-driven resizing, per-circle
//! size transitions and oscillation, the thinking indicator's disc cluster,
//! and the thinking/talking/read mode machine.
//!
//! # Key entry points
//!
//! - [`bubble::ThoughtBubble`] - one bubble instance, ticked once per frame
//! - [`bubble::BubbleFrame`] - the derived values handed to a renderer
//! - [`options::BubbleOptions`] - timings, geometry, springs and motion,
//!   loadable from TOML presets
//! - [`geometry`] - the rounded-rectangle track and both packers
//! - [`animation`] - springs, tweens, circle transitions and follow-ups
//!
//! # Architecture
//!
//! Everything is single-threaded and driven by the owner's frame loop.
//! Below [`bubble`], every computation is a pure function of seconds since
//! the bubble's epoch plus the immutable options; mutation is confined to
//! transition bookkeeping. Deferred follow-ups are entries in a
//! cancelable queue drained on each tick, never timers or threads.

pub mod animation;
pub mod bubble;
pub mod error;
pub mod geometry;
pub mod options;
pub mod util;
