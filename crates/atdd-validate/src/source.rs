//! Source text with comments and string literals masked out
//!
//! Masking replaces every byte of a comment or single-quoted literal with a
//! space, keeping newlines. Byte offsets and line numbers are therefore the
//! same in the raw and masked views, and structural regexes run on the masked
//! view never match inside comments or strings.

use std::ops::RangeInclusive;

/// A comment found while masking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// 1-based line the comment starts on
    pub line: usize,
    /// Text after `//`, or between `/*` and `*/`
    pub text: String,
}

impl Comment {
    /// Comment text with leading whitespace removed
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        self.text.trim_start()
    }
}

/// Raw and masked views of one AL source file
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    raw: &'a str,
    masked: String,
    line_starts: Vec<usize>,
    comments: Vec<Comment>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Literal,
    Identifier,
}

impl<'a> SourceText<'a> {
    /// Scan `raw` once, masking comments and literals
    #[must_use]
    pub fn new(raw: &'a str) -> Self {
        let bytes = raw.as_bytes();
        let mut masked = bytes.to_vec();
        let mut comments = Vec::new();
        let mut line_starts = vec![0];

        let mut state = State::Code;
        let mut comment_start = 0;
        let mut comment_line = 1;
        let mut i = 0;

        while i < bytes.len() {
            let b = bytes[i];
            let next = bytes.get(i + 1).copied();
            if b == b'\n' {
                line_starts.push(i + 1);
            }

            match state {
                State::Code => match (b, next) {
                    (b'/', Some(b'/')) => {
                        state = State::LineComment;
                        comment_start = i + 2;
                        comment_line = line_starts.len();
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        i += 1;
                    }
                    (b'/', Some(b'*')) => {
                        state = State::BlockComment;
                        comment_start = i + 2;
                        comment_line = line_starts.len();
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        i += 1;
                    }
                    (b'\'', _) => {
                        state = State::Literal;
                        masked[i] = b' ';
                    }
                    (b'"', _) => state = State::Identifier,
                    _ => {}
                },
                State::LineComment => {
                    if b == b'\n' {
                        comments.push(Comment {
                            line: comment_line,
                            text: raw[comment_start..i].trim_end_matches('\r').to_string(),
                        });
                        state = State::Code;
                    } else {
                        masked[i] = b' ';
                    }
                }
                State::BlockComment => {
                    if b == b'*' && next == Some(b'/') {
                        comments.push(Comment {
                            line: comment_line,
                            text: raw[comment_start..i].to_string(),
                        });
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        state = State::Code;
                        i += 1;
                    } else if b != b'\n' {
                        masked[i] = b' ';
                    }
                }
                State::Literal => {
                    if b == b'\'' && next == Some(b'\'') {
                        masked[i] = b' ';
                        masked[i + 1] = b' ';
                        i += 1;
                    } else if b == b'\'' {
                        masked[i] = b' ';
                        state = State::Code;
                    } else if b != b'\n' {
                        masked[i] = b' ';
                    }
                }
                State::Identifier => {
                    if b == b'"' || b == b'\n' {
                        state = State::Code;
                    }
                }
            }
            i += 1;
        }

        match state {
            State::LineComment => comments.push(Comment {
                line: comment_line,
                text: raw[comment_start..].trim_end_matches('\r').to_string(),
            }),
            State::BlockComment => comments.push(Comment {
                line: comment_line,
                text: raw[comment_start..].to_string(),
            }),
            _ => {}
        }

        // Only whole characters inside comments or literals were replaced.
        let masked = String::from_utf8_lossy(&masked).into_owned();

        Self {
            raw,
            masked,
            line_starts,
            comments,
        }
    }

    /// Original text
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Text with comments and literals blanked
    #[inline]
    #[must_use]
    pub fn masked(&self) -> &str {
        &self.masked
    }

    /// Comments in source order
    #[inline]
    #[must_use]
    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    /// Comments starting within a line range
    pub fn comments_in(&self, lines: RangeInclusive<usize>) -> impl Iterator<Item = &Comment> {
        self.comments
            .iter()
            .filter(move |comment| lines.contains(&comment.line))
    }

    /// 1-based line containing byte `offset`
    #[must_use]
    pub fn line_of(&self, offset: usize) -> usize {
        self.line_starts.partition_point(|&start| start <= offset)
    }

    /// `(line number, raw line, masked line)` for every line
    pub fn lines(&self) -> impl Iterator<Item = (usize, &'a str, &str)> + '_ {
        self.raw
            .lines()
            .zip(self.masked.lines())
            .enumerate()
            .map(|(idx, (raw, masked))| (idx + 1, raw, masked))
    }
}
