//! Input sanitising and tokenising.
//!
//! Raw input is reduced to uppercase `A`–`Z` and the ASCII space, split into
//! [CharToken]s, and finally expanded into the [Glyph] sequence that is
//! actually drawn. The expansion inserts an inter-letter space between every
//! two consecutive letters; spaces never receive one.

/// One element of the sanitized input, in reading order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CharToken {
    /// An uppercase ASCII letter
    Letter(char),
    /// A literal space in the input
    WordSpace,
}

/// One drawable glyph of a run
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Glyph {
    Letter(char),
    WordSpace,
    /// The gap inserted between two consecutive letters
    LetterSpace,
}

/// Uppercase the input and strip everything that is not `A`–`Z` or a space.
/// Idempotent: sanitizing an already-sanitized string returns it unchanged.
pub fn sanitize(raw: &str) -> String {
    raw.chars()
        .flat_map(char::to_uppercase)
        .filter(|ch| ch.is_ascii_uppercase() || *ch == ' ')
        .collect()
}

/// Split sanitized text into tokens. Characters outside the sanitized
/// alphabet are skipped, so this is safe to call on raw input too.
pub fn tokenize(text: &str) -> Vec<CharToken> {
    text.chars()
        .filter_map(|ch| match ch {
            ' ' => Some(CharToken::WordSpace),
            'A'..='Z' => Some(CharToken::Letter(ch)),
            _ => None,
        })
        .collect()
}

/// Expand tokens into the glyphs to draw, inserting a [Glyph::LetterSpace]
/// between every pair of adjacent letters. Consecutive spaces are kept as
/// individual word spaces and leading / trailing spaces are not trimmed.
pub fn glyph_sequence(tokens: &[CharToken]) -> Vec<Glyph> {
    let mut glyphs = Vec::with_capacity(tokens.len() * 2);
    let mut previous: Option<CharToken> = None;

    for token in tokens.iter().copied() {
        if let (Some(CharToken::Letter(_)), CharToken::Letter(_)) = (previous, token) {
            glyphs.push(Glyph::LetterSpace);
        }
        glyphs.push(match token {
            CharToken::Letter(ch) => Glyph::Letter(ch),
            CharToken::WordSpace => Glyph::WordSpace,
        });
        previous = Some(token);
    }

    glyphs
}
