//! Native-side GUI layer: wry webview hosting the foldview-ui WASM bundle.
//!
//! The webview is created as a child of the winit window and talks to the
//! engine through a small JSON IPC bridge.

pub(crate) mod panel;
/// Wry webview creation, IPC messages, and state push helpers.
pub mod webview;
