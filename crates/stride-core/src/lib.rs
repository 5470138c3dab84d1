pub mod checklist;
pub mod error;
pub mod guidance;
pub mod io;
pub mod model;
pub mod topics;
pub mod types;

pub use error::{Result, StrideError};
