mod members;
pub use members::*;

mod export;
pub use export::*;
