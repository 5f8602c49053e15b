use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdpError {
    LineOutOfRange { index: usize, len: usize },
}

impl fmt::Display for SdpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LineOutOfRange { index, len } => {
                write!(f, "line {index} out of range (document has {len} lines)")
            }
        }
    }
}

impl std::error::Error for SdpError {}
