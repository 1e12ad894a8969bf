// Library surface for headless/integration tests and reuse.
// Rendering and key bindings live in the binary (main.rs, ui.rs).
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod history;
pub mod logging;
pub mod runtime;
pub mod session;
pub mod timer;

pub use error::{NbackError, Result};
pub use game::Game;
