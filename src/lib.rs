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

//! Hierarchical procedural coloring and level-of-detail selection for
//! mesoscale molecular scenes.
//!
//! Scenes are organized as several independent group hierarchies (by
//! compartment, by function, ...) over one shared set of renderable
//! entities. This crate decides what color each entity gets when a user
//! edits a group's color scheme, and which level-of-detail table and clip
//! geometry each group uses.
//!
//! # Key entry points
//!
//! - [`cascade::ColorCascade`] - applies a color scheme edit to a subtree
//! - [`color::ColorSampler`] - distinct colors and hue variants in HCL
//! - [`hierarchy::HierarchyStore`] - adapter over the host's scene graph
//! - [`lod::GraphicsMode`] - quality tiers and their distance bands
//! - [`clip`] - bounding-sphere-relative clip geometry
//! - [`options::Options`] - sampler tuning and defaults, with TOML presets
//!
//! # Architecture
//!
//! Everything is synchronous and pure apart from the final
//! [`hierarchy::HierarchyStore::commit_batch`] call. Reads go through a
//! host-owned [`hierarchy::HierarchyCache`] that the host invalidates on
//! structural edits; writes are collected into one
//! [`hierarchy::UpdateBatch`] per operation, so a failed operation never
//! leaves the scene half-colored.

pub mod cascade;
pub mod clip;
pub mod color;
pub mod error;
pub mod hierarchy;
pub mod lod;
pub mod options;

pub use error::MesoError;
