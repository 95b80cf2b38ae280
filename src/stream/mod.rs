//! Single-slot stream plumbing between stages
//!
//! A transfer only happens when the producer has a value and the consumer has room for it, so a
//! stalled consumer holds back everything upstream and nothing is ever dropped.

pub mod port;
pub mod channel;
pub mod fanout;

pub use self::port::Port;
pub use self::channel::{channel, Sender, Receiver};
pub use self::fanout::FanOut;
