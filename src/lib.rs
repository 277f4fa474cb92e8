// Library surface for the binary, headless/integration tests and reuse.
// Rendering and terminal handling stay in the binary.
pub mod answers;
pub mod app_dirs;
pub mod bank;
pub mod config;
pub mod error;
pub mod exam;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod util;
