pub const DEFAULT_STREAM_LABEL: &str = "ARDAMS";
pub const DEFAULT_AUDIO_TRACK_ID: &str = "ARDAMSa0";

/// Local stream attached to the transport at start: a label and its audio tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMediaStream {
    pub label: String,
    pub audio_track_ids: Vec<String>,
}

impl LocalMediaStream {
    /// A stream carrying a single audio track.
    pub fn single_audio(label: impl Into<String>, track_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            audio_track_ids: vec![track_id.into()],
        }
    }
}

impl Default for LocalMediaStream {
    fn default() -> Self {
        Self::single_audio(DEFAULT_STREAM_LABEL, DEFAULT_AUDIO_TRACK_ID)
    }
}
