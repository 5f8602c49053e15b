use std::str::FromStr;

/// Attribute prefix of an rtpmap line.
pub const RTPMAP_PREFIX: &str = "a=rtpmap:";

/// Value of an `a=rtpmap:` attribute: `<pt> <encoding>/<clock>[/<params>]`.
///
/// Parsing is strict about layout: exactly one space after the payload type
/// and nothing after the encoding. The payload type is any run of digits;
/// values outside the RTP dynamic range are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpMap {
    pub payload_type: u32,
    pub encoding_name: String,
    pub clock_rate: u32,
    /// Usually the channel count for audio.
    pub encoding_params: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RtpMapParseError {
    MissingParts,
    InvalidPayloadType,
    InvalidClockRate,
    InvalidParams,
    PayloadTypeOutOfRange,
    TrailingGarbage,
}

impl std::fmt::Display for RtpMapParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParts => write!(f, "missing required parts in rtpmap"),
            Self::InvalidPayloadType => write!(f, "invalid payload type"),
            Self::InvalidClockRate => write!(f, "invalid clock rate"),
            Self::InvalidParams => write!(f, "invalid encoding parameters"),
            Self::PayloadTypeOutOfRange => write!(f, "payload type too large"),
            Self::TrailingGarbage => write!(f, "unexpected trailing tokens after rtpmap"),
        }
    }
}

impl std::error::Error for RtpMapParseError {}

impl RtpMap {
    /// Parses a full SDP line (`a=rtpmap:111 opus/48000/2`), tolerating one
    /// trailing `\r`. Lines that are not rtpmap attributes or do not parse
    /// yield `None`.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        line.strip_prefix(RTPMAP_PREFIX)?.parse().ok()
    }

    /// True for exactly `<codec>/<clock_rate>` with no encoding parameters.
    /// The codec name comparison is case-sensitive.
    #[must_use]
    pub fn is_codec(&self, codec_name: &str, clock_rate: u32) -> bool {
        self.encoding_name == codec_name
            && self.clock_rate == clock_rate
            && self.encoding_params.is_none()
    }
}

impl FromStr for RtpMap {
    type Err = RtpMapParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use RtpMapParseError::*;

        let (pt_str, rhs) = s.split_once(' ').ok_or(MissingParts)?;
        if rhs.is_empty() {
            return Err(MissingParts);
        }
        if rhs.contains(char::is_whitespace) {
            return Err(TrailingGarbage);
        }

        if pt_str.is_empty() || !pt_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPayloadType);
        }
        let payload_type: u32 = pt_str.parse().map_err(|_| PayloadTypeOutOfRange)?;

        let mut parts = rhs.splitn(3, '/');
        let encoding_name = parts.next().ok_or(MissingParts)?.to_string();
        if encoding_name.is_empty() {
            return Err(MissingParts);
        }
        let clock_rate: u32 = parts
            .next()
            .ok_or(MissingParts)?
            .parse()
            .map_err(|_| InvalidClockRate)?;
        let encoding_params = parts
            .next()
            .map(|p| p.parse::<u16>().map_err(|_| InvalidParams))
            .transpose()?;

        Ok(Self {
            payload_type,
            encoding_name,
            clock_rate,
            encoding_params,
        })
    }
}
