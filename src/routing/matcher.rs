//! URI template matching.
//!
//! # Responsibilities
//! - Find parameter tokens in a URI template (`:name`, `:name?`, `*`, `**`)
//! - Produce the canonical matcher form used as a lookup key
//! - Keep the parsed pieces so the URL builder can substitute positionally
//!
//! # Design Decisions
//! - Single linear scan, no regex
//! - No escaping: `:` and `*` always start a parameter
//! - Parsing never fails; anything that is not a token is literal text

use std::fmt;

/// Placeholder every parameter token collapses to in a matcher URI.
pub const PLACEHOLDER: &str = ":arg";

/// A parameter token as written in the source template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamToken {
    raw: String,
}

impl ParamToken {
    fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The token exactly as it appears in the template (e.g. `:owner_name`).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Token name with the `:` and `?` syntax characters stripped.
    pub fn name(&self) -> String {
        self.raw.chars().filter(|c| *c != ':' && *c != '?').collect()
    }

    pub fn is_wildcard(&self) -> bool {
        self.raw.starts_with('*')
    }

    /// Wildcards and `?`-suffixed names may be left without a value.
    pub fn is_optional(&self) -> bool {
        self.is_wildcard() || self.raw.ends_with('?')
    }
}

impl fmt::Display for ParamToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// One piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    Param(ParamToken),
}

/// A parsed URI template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTemplate {
    source: String,
    pieces: Vec<Piece>,
}

impl UriTemplate {
    /// Parse a template. Every input is accepted.
    pub fn parse(source: &str) -> Self {
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            let end = match ch {
                // `:` needs at least one character before the next `/`
                ':' if chars.peek().is_some_and(|(_, next)| *next != '/') => {
                    let mut end = start + 1;
                    while let Some((i, c)) = chars.peek().copied() {
                        if c == '/' {
                            break;
                        }
                        end = i + c.len_utf8();
                        chars.next();
                    }
                    end
                }
                '*' => {
                    let mut end = start + 1;
                    while let Some((i, '*')) = chars.peek().copied() {
                        end = i + 1;
                        chars.next();
                    }
                    end
                }
                _ => {
                    literal.push(ch);
                    continue;
                }
            };

            if !literal.is_empty() {
                pieces.push(Piece::Literal(std::mem::take(&mut literal)));
            }
            pieces.push(Piece::Param(ParamToken::new(&source[start..end])));
        }

        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }

        Self {
            source: source.to_string(),
            pieces,
        }
    }

    /// The template as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Parameter tokens in template order.
    pub fn params(&self) -> impl Iterator<Item = &ParamToken> {
        self.pieces.iter().filter_map(|piece| match piece {
            Piece::Param(token) => Some(token),
            Piece::Literal(_) => None,
        })
    }

    /// Canonical form with every parameter replaced by [`PLACEHOLDER`].
    pub fn matcher_uri(&self) -> String {
        self.pieces
            .iter()
            .map(|piece| match piece {
                Piece::Literal(text) => text.as_str(),
                Piece::Param(_) => PLACEHOLDER,
            })
            .collect()
    }
}

impl fmt::Display for UriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Shorthand for `UriTemplate::parse(template).matcher_uri()`.
pub fn matcher_uri(template: &str) -> String {
    UriTemplate::parse(template).matcher_uri()
}
