pub mod diagnostics;
pub mod viewer;

pub use diagnostics::show_diagnostics;
pub use viewer::{PageView, handle_keys, show_viewer};
