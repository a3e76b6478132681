pub mod event;
pub(crate) mod lenient;
pub mod payload;

pub use event::*;
pub use payload::*;
