//! Path tokenising
//!
//! Patterns are tokenised once at registration time into [`Segment`]s.
//! Request paths are split at dispatch time into [`Span`]s, byte ranges
//! into the caller's own path text, so the split buffer never owns any
//! captured value.

use crate::InsertError;

/// Byte range of one segment inside the path it was split from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Resolve the span against the path it was produced from
    #[inline]
    pub fn slice<'p>(&self, path: &'p str) -> &'p str {
        &path[self.start..self.end]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One token of a route pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Matched verbatim
    Literal(&'a str),
    /// `:name` - captures any single segment
    Param(&'a str),
}

/// Split a request path into segment spans
///
/// A single leading `/` is skipped. `"/"` and `""` produce no segments.
/// Every other `/` is a separator, so `"/users/"` yields `["users", ""]`.
///
/// Spans are appended to `spans`; the buffer is not cleared first.
pub fn split(path: &str, spans: &mut Vec<Span>) {
    let offset = usize::from(path.starts_with('/'));
    if path.len() == offset {
        return;
    }

    let mut start = offset;
    for (i, byte) in path.bytes().enumerate().skip(offset) {
        if byte == b'/' {
            spans.push(Span::new(start, i));
            start = i + 1;
        }
    }
    spans.push(Span::new(start, path.len()));
}

/// Tokenise a route pattern
///
/// One leading `/` is stripped and a single trailing `/` is ignored.
/// Any other empty token is rejected.
pub fn parse_pattern(pattern: &str) -> Result<Vec<Segment<'_>>, InsertError> {
    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    let mut tokens: Vec<&str> = body.split('/').collect();
    if tokens.len() > 1 && tokens.last() == Some(&"") {
        tokens.pop();
    }

    tokens
        .into_iter()
        .map(|token| {
            if token.is_empty() {
                Err(InsertError::MalformedPath {
                    pattern: pattern.to_string(),
                })
            } else if let Some(name) = token.strip_prefix(':') {
                Ok(Segment::Param(name))
            } else {
                Ok(Segment::Literal(token))
            }
        })
        .collect()
}
