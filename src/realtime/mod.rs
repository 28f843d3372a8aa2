//! The real-time collaboration substrate: per-room connection fan-out and
//! the per-socket session state machine.

pub mod connection;
pub mod session;

pub use connection::{ConnectionManager, RoomSocket, SocketSendError};
pub use session::room_ws;
