pub mod action;
pub mod effects;
pub mod error;
pub mod metric;
pub mod preload;
pub mod preprocess;
pub mod presenter;
pub mod selection;
pub mod session;
pub mod speech;

#[cfg(test)]
mod tests;

pub use effects::{ClipboardWriter, Renderer, Scheduler};
pub use error::{ClipboardError, LifecycleError};
pub use session::{Session, SessionContext};
