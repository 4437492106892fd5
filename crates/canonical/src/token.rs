use serde::{Deserialize, Serialize};

/// Interned handle for a normalized word.
///
/// Tokens are assigned by [`InternerBuilder`](crate::InternerBuilder) and stay
/// valid for the lifetime of the [`Interner`](crate::Interner) frozen from it.
/// `Token::EMPTY` (id 0) always resolves to the empty string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Reserved token for the empty string.
    pub const EMPTY: Token = Token(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// An ordered sequence of tokens derived from a single raw text field.
///
/// Order and duplicates are preserved. A field is produced once by
/// [`normalize`](crate::normalize) and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NormalizedField(Box<[Token]>);

impl NormalizedField {
    pub fn as_slice(&self) -> &[Token] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.0.iter()
    }
}

impl From<Vec<Token>> for NormalizedField {
    fn from(tokens: Vec<Token>) -> Self {
        Self(tokens.into_boxed_slice())
    }
}

impl AsRef<[Token]> for NormalizedField {
    fn as_ref(&self) -> &[Token] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a NormalizedField {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
