//! JSON signaling envelope: typed messages, parsing/serialization and the
//! outbound sink.
//!
//! Wire shape, by `type`:
//!
//! | type             | fields                                   |
//! |------------------|------------------------------------------|
//! | `candidate`      | `id` (string), `label` (int), `candidate` |
//! | `offer`/`answer` | `sdp` (string)                           |
//! | `bye`            | none                                     |

pub mod codec;
pub mod decode_error;
mod envelope;
pub mod signal_sink;
pub mod signaling_message;

pub use codec::{encode, parse};
pub use decode_error::{DecodeError, EncodeError};
pub use signal_sink::SignalSink;
pub use signaling_message::{IceCandidate, SdpKind, SessionDescription, SignalingMessage};
