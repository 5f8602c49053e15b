//! Line-level SDP helpers: a document view and the codec-preference rewrite.
//!
//! Nothing here parses SDP into a full object model; the rewrite only needs
//! ordered lines and must leave every line it does not touch byte-for-byte
//! intact.

pub mod codec_preference;
pub mod rtp_map;
pub mod sdp_document;
pub mod sdp_error;

pub use codec_preference::{CodecPreference, PreferOutcome, prefer_codec};
pub use rtp_map::RtpMap;
pub use sdp_document::SdpDocument;
pub use sdp_error::SdpError;
