use crate::sdp::{
    rtp_map::{RTPMAP_PREFIX, RtpMap},
    sdp_document::SdpDocument,
};

pub const DEFAULT_PREFERRED_CODEC: &str = "ISAC";
pub const DEFAULT_PREFERRED_CLOCK_RATE: u32 = 16_000;

const AUDIO_MLINE_PREFIX: &str = "m=audio ";

/// Codec to move to the front of the `m=audio` format list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecPreference {
    pub codec_name: String,
    pub clock_rate: u32,
}

/// Result of [`CodecPreference::apply`]. Everything but `Rewritten` means the
/// document was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferOutcome {
    Rewritten(String),
    NoAudioLine,
    CodecNotOffered,
    /// The `m=audio` line has fewer than the three fixed tokens.
    MalformedAudioLine,
}

impl Default for CodecPreference {
    fn default() -> Self {
        Self::new(DEFAULT_PREFERRED_CODEC, DEFAULT_PREFERRED_CLOCK_RATE)
    }
}

impl CodecPreference {
    pub fn new(codec_name: impl Into<String>, clock_rate: u32) -> Self {
        Self {
            codec_name: codec_name.into(),
            clock_rate,
        }
    }

    /// Rewrites `sdp` so this codec's payload type is the first audio format.
    ///
    /// The first `m=audio` line and the first matching rtpmap line are
    /// located independently. Tokens 0..=2 of the m-line (`m=audio <port>
    /// <proto>`) stay in place, the payload goes to position 3, and the other
    /// formats follow in their original order with the payload removed.
    #[must_use]
    pub fn apply(&self, sdp: &str) -> PreferOutcome {
        let mut doc = SdpDocument::parse(sdp);

        let Some(m_index) = doc.find_first(|l| l.starts_with(AUDIO_MLINE_PREFIX)) else {
            return PreferOutcome::NoAudioLine;
        };
        let Some(payload) = doc.find_map_first(|l| self.payload_of(l)) else {
            return PreferOutcome::CodecNotOffered;
        };
        let payload = payload.to_owned();

        let Some(new_mline) = doc
            .line(m_index)
            .and_then(|mline| reorder_formats(mline, &payload))
        else {
            return PreferOutcome::MalformedAudioLine;
        };

        match doc.replace_line(m_index, new_mline) {
            Ok(()) => PreferOutcome::Rewritten(doc.encode()),
            Err(_) => PreferOutcome::MalformedAudioLine,
        }
    }

    /// Payload token of an rtpmap line for exactly this codec, as written.
    fn payload_of<'a>(&self, line: &'a str) -> Option<&'a str> {
        let rtpmap = RtpMap::from_line(line)?;
        if !rtpmap.is_codec(&self.codec_name, self.clock_rate) {
            return None;
        }
        line.strip_prefix(RTPMAP_PREFIX)?
            .split_once(' ')
            .map(|(payload, _)| payload)
    }
}

fn reorder_formats(mline: &str, payload: &str) -> Option<String> {
    let tokens: Vec<&str> = mline.split(' ').collect();
    if tokens.len() < 3 {
        return None;
    }

    let mut out: Vec<&str> = Vec::with_capacity(tokens.len() + 1);
    out.extend_from_slice(&tokens[..3]);
    out.push(payload);
    out.extend(tokens[3..].iter().copied().filter(|t| *t != payload));
    Some(out.join(" "))
}

/// Moves `codec_name/clock_rate` to the front of the audio formats.
///
/// Returns `sdp` unchanged when there is no `m=audio` line or the codec is
/// not offered; otherwise the rewritten document with `\r\n` line endings.
#[must_use]
pub fn prefer_codec(sdp: &str, codec_name: &str, clock_rate: u32) -> String {
    match CodecPreference::new(codec_name, clock_rate).apply(sdp) {
        PreferOutcome::Rewritten(out) => out,
        PreferOutcome::NoAudioLine
        | PreferOutcome::CodecNotOffered
        | PreferOutcome::MalformedAudioLine => sdp.to_owned(),
    }
}
