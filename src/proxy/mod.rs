//! Bot-facing side of the referee: the wire protocol and the process-backed
//! [`Seat`](crate::rules::Seat).

pub mod bot;
pub mod protocol;

pub use bot::BotPlayer;
pub use protocol::{ServerLine, Status, END, READY};
