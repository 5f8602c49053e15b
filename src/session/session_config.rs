use crate::{
    config::{Config, ConfigError},
    sdp::{
        CodecPreference,
        codec_preference::{DEFAULT_PREFERRED_CLOCK_RATE, DEFAULT_PREFERRED_CODEC},
    },
    transport::{
        LocalMediaStream, MediaConstraints, SESSION_CONSTRAINTS,
        local_media_stream::{DEFAULT_AUDIO_TRACK_ID, DEFAULT_STREAM_LABEL},
    },
};

const SECTION: &str = "Session";

/// Immutable per-call settings, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// The initiator creates the offer; the responder answers one.
    pub is_initiator: bool,
    /// Codec moved to the front of every remote description's audio formats.
    pub codec_preference: CodecPreference,
    /// Stream attached to the transport at start.
    pub local_stream: LocalMediaStream,
}

impl SessionConfig {
    #[must_use]
    pub fn initiator() -> Self {
        Self::new(true)
    }

    #[must_use]
    pub fn responder() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub fn new(is_initiator: bool) -> Self {
        Self {
            is_initiator,
            codec_preference: CodecPreference::default(),
            local_stream: LocalMediaStream::default(),
        }
    }

    /// Builds the configuration from the `[Session]` section:
    ///
    /// ```ini
    /// [Session]
    /// initiator = true
    /// preferred_codec = ISAC
    /// preferred_clock_rate = 16000
    /// stream_label = ARDAMS
    /// audio_track_id = ARDAMSa0
    /// ```
    ///
    /// Absent keys take the defaults shown above, except `initiator` which
    /// defaults to `false`.
    ///
    /// # Errors
    /// [`ConfigError::InvalidValue`] for a non-boolean `initiator` or a
    /// non-numeric `preferred_clock_rate`.
    pub fn from_config(cfg: &Config) -> Result<Self, ConfigError> {
        let is_initiator = cfg.get_bool(SECTION, "initiator")?.unwrap_or(false);
        let clock_rate = cfg
            .get_u32(SECTION, "preferred_clock_rate")?
            .unwrap_or(DEFAULT_PREFERRED_CLOCK_RATE);
        let codec = cfg.get_non_empty_or_default(SECTION, "preferred_codec", DEFAULT_PREFERRED_CODEC);
        let label = cfg.get_non_empty_or_default(SECTION, "stream_label", DEFAULT_STREAM_LABEL);
        let track = cfg.get_non_empty_or_default(SECTION, "audio_track_id", DEFAULT_AUDIO_TRACK_ID);

        Ok(Self {
            is_initiator,
            codec_preference: CodecPreference::new(codec, clock_rate),
            local_stream: LocalMediaStream::single_audio(label, track),
        })
    }

    /// Constraints the transport is created with. The same for every session.
    #[must_use]
    pub const fn constraints(&self) -> MediaConstraints {
        SESSION_CONSTRAINTS
    }
}
