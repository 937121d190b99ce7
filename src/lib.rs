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
// Complexity limits (thresholds in clippy.toml)
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

//! Input interpretation for molecular viewers.
//!
//! Turns a linear stream of pointer and keyboard events into high-level
//! viewer operations: camera moves, picks, selections, measurements, atom
//! drags and swipe-to-spin throws. Nothing here renders or owns model data;
//! every effect goes through the [`viewer::Viewer`] port.
//!
//! # Key entry points
//!
//! - [`dispatch::ActionDispatcher`] - feed it [`input::InputEvent`]s
//! - [`binding::BindingSet`] - the four preset binding tables plus user
//!   bindings
//! - [`picking::PickingController`] - atom/bond picking modes and styles
//! - [`options::InteractOptions`] - runtime configuration (drag and wheel
//!   sensitivity, click timing, gestures, hover)
//!
//! # Architecture
//!
//! A raw event is packed into an [`action::ActionCode`] (click count,
//! buttons and modifiers, event kind). The active binding table says which
//! canonical [`action::ActionId`]s or user scripts that code fires, and the
//! picking mode decides what a qualifying click means. Multi-event
//! interactions live in [`session`]: a measurement collects picks across
//! clicks, a drag lives from press to release.
//!
//! All state is owned by the dispatcher and mutated on the caller's thread.
//! The optional hover watcher runs on its own thread, reading immutable
//! pointer snapshots through a lock-free triple buffer and sending hover
//! requests back over a channel.

pub mod action;
pub mod binding;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod options;
pub mod picking;
pub mod session;
pub mod viewer;

pub use dispatch::ActionDispatcher;
pub use error::InteractError;
