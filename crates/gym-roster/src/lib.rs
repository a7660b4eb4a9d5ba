mod session;
pub use session::*;

mod snapshot;
pub use snapshot::*;

pub mod projection;
pub use projection::{Row, ViewQuery};

mod roster;
pub use roster::*;

pub mod memory;
