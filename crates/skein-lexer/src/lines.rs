// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Logical-line splitting.

/// One logical line of a script.
#[derive(Debug, Clone)]
pub struct Line {
    /// Statement text with the comment stripped and whitespace trimmed.
    /// Empty for blank and comment-only lines.
    pub text: String,
    /// 1-based source line number for diagnostics.
    pub number: usize,
}

impl Line {
    /// Blank and comment-only lines are no-ops for the execution loop.
    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split a script into logical lines.
///
/// Everything from the first `;;` on a line to its end is a comment and
/// discarded, quoted or not. Leading and trailing whitespace is trimmed
/// after the comment is removed.
pub fn logical_lines(source: &str) -> Vec<Line> {
    source
        .lines()
        .enumerate()
        .map(|(i, raw)| {
            let code = match raw.find(";;") {
                Some(pos) => &raw[..pos],
                None => raw,
            };
            Line {
                text: code.trim().to_string(),
                number: i + 1,
            }
        })
        .collect()
}
