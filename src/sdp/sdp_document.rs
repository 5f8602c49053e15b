use crate::sdp::sdp_error::SdpError;

/// Separator used when a document is reassembled.
pub const LINE_SEPARATOR: &str = "\r\n";

/// Ordered, line-oriented view of an SDP text.
///
/// `\r\n` is normalised to `\n` before splitting, so lines never carry the
/// carriage return. A trailing separator shows up as a final empty line and
/// survives [`encode`](Self::encode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpDocument {
    lines: Vec<String>,
}

impl SdpDocument {
    #[must_use]
    pub fn parse(sdp: &str) -> Self {
        let lines = sdp
            .replace("\r\n", "\n")
            .split('\n')
            .map(str::to_owned)
            .collect();
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Index of the first line satisfying `predicate`.
    pub fn find_first<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&str) -> bool,
    {
        self.lines.iter().position(|l| predicate(l))
    }

    /// First `Some` produced by `f`, scanning lines in order.
    pub fn find_map_first<'a, T, F>(&'a self, f: F) -> Option<T>
    where
        F: FnMut(&'a str) -> Option<T>,
    {
        self.lines.iter().map(String::as_str).find_map(f)
    }

    /// Replaces the line at `index` in place.
    ///
    /// # Errors
    /// [`SdpError::LineOutOfRange`] if `index` is past the last line.
    pub fn replace_line(&mut self, index: usize, value: impl Into<String>) -> Result<(), SdpError> {
        let len = self.lines.len();
        let slot = self
            .lines
            .get_mut(index)
            .ok_or(SdpError::LineOutOfRange { index, len })?;
        *slot = value.into();
        Ok(())
    }

    /// Joins the lines with `\r\n`.
    #[must_use]
    pub fn encode(&self) -> String {
        self.lines.join(LINE_SEPARATOR)
    }
}
