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
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
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
// Tests unwrap freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

//! Interactive 3D viewer that folds flat image layers into pop-up pages.
//!
//! Each loaded image becomes a [`fold::Fold`]: two textured planes (the
//! upper and lower halves of the image) hinged at a right angle, with a
//! panel folder to show, flip, and offset them. A [`stage::Stage`] sets up
//! the camera framing, two hemispheric lights, and a world-axis gizmo;
//! [`FoldEngine`] draws it with wgpu.
//!
//! # Key entry points
//!
//! - [`FoldEngine`] - rendering plus [`FoldCommand`] dispatch
//! - [`stage::Stage`] - scene bootstrap, root controls, fold collection
//! - [`panel::Panel`] - the plain-data control panel model
//! - [`options::Options`] - TOML-backed runtime configuration
//! - `Viewer` (feature `viewer`) - a ready-made winit window
//!
//! # Architecture
//!
//! All scene and panel mutation happens on the calling thread. Images are
//! decoded on a background [`scene::loader::TextureLoader`] thread and
//! uploaded by the engine at the start of the next frame.

pub mod camera;
pub mod engine;
pub mod error;
pub mod fold;
pub mod gpu;
#[cfg(feature = "gui")]
pub mod gui;
pub mod input;
pub mod options;
pub mod panel;
pub mod renderer;
pub mod scene;
pub mod stage;
pub mod util;
#[cfg(feature = "viewer")]
mod viewer;

pub use engine::{FoldCommand, FoldEngine};
pub use error::FoldviewError;
pub use input::{InputEvent, InputProcessor, KeyBindings, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::{Viewer, ViewerBuilder};
