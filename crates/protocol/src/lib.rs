//! Wire protocol for ScrimSync detector-control communication.
//!
//! The detector/transfer process and the control process exchange JSON
//! envelopes over an asynchronous channel. The message set is closed:
//! unrecognized message types fail deserialization instead of being
//! silently ignored.

pub mod constants;
pub mod envelope;
pub mod messages;
pub mod types;

pub use constants::MessageType;
pub use envelope::Message;
