pub mod connection;
pub use connection::{Connection, ConnectionConfig};

pub mod members;
