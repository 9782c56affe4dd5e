pub mod protocol;
pub mod types;

pub use protocol::*;
pub use types::*;
