//! Connect Four session state and the wire protocol.

pub mod board;
pub mod model;
pub mod protocol;

pub use board::Board;
pub use model::{BoardModel, Observer, Redispatch, Snapshot};
pub use protocol::{ClientMessage, ServerMessage};
