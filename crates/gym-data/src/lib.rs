// Operations
mod operations;
pub use operations::*;

mod errors;
pub use errors::*;

pub mod datetime;

// Models
mod status;
pub use status::*;

mod members;
pub use members::*;
