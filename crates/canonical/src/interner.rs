//! Two-phase string interner.
//!
//! Interning happens on an [`InternerBuilder`], which needs `&mut self` and is
//! only ever driven from the single-threaded ingestion phase. Calling
//! [`InternerBuilder::freeze`] consumes the builder and yields an [`Interner`]
//! that can resolve tokens but has no way to add new ones. The frozen table is
//! `Send + Sync` and is shared by plain reference across the matching workers.

use fxhash::FxHashMap;

use crate::token::{NormalizedField, Token};

/// Mutable interner used while records are being normalized.
#[derive(Debug, Clone)]
pub struct InternerBuilder {
    strings: Vec<Box<str>>,
    ids: FxHashMap<Box<str>, Token>,
}

impl InternerBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-sizes the table for roughly `capacity` distinct words.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut strings = Vec::with_capacity(capacity + 1);
        strings.push(Box::<str>::from(""));
        let mut ids = FxHashMap::default();
        ids.reserve(capacity + 1);
        ids.insert(Box::<str>::from(""), Token::EMPTY);
        Self { strings, ids }
    }

    /// Returns the token for `word`, assigning the next free id on first sight.
    pub fn intern(&mut self, word: &str) -> Token {
        if let Some(token) = self.ids.get(word) {
            return *token;
        }

        let token = Token(self.strings.len() as u32);
        let owned: Box<str> = Box::from(word);
        self.strings.push(owned.clone());
        self.ids.insert(owned, token);
        token
    }

    /// Looks a word up without interning it.
    pub fn get(&self, word: &str) -> Option<Token> {
        self.ids.get(word).copied()
    }

    /// Number of entries, including the reserved empty string.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }

    /// Ends the build phase.
    pub fn freeze(self) -> Interner {
        Interner {
            strings: self.strings.into_boxed_slice(),
            ids: self.ids,
        }
    }
}

impl Default for InternerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only interner produced by [`InternerBuilder::freeze`].
#[derive(Debug, Clone)]
pub struct Interner {
    strings: Box<[Box<str>]>,
    ids: FxHashMap<Box<str>, Token>,
}

impl Interner {
    /// Resolves a token. Unknown tokens resolve to the empty string.
    pub fn resolve(&self, token: Token) -> &str {
        self.strings
            .get(token.index())
            .map(|s| &**s)
            .unwrap_or("")
    }

    /// Looks a word up. Never assigns a new token.
    pub fn get(&self, word: &str) -> Option<Token> {
        self.ids.get(word).copied()
    }

    /// The words of a field, in order.
    pub fn render<'a>(&'a self, field: &NormalizedField) -> Vec<&'a str> {
        field.iter().map(|t| self.resolve(*t)).collect()
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.len() <= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_reserved() {
        let mut builder = InternerBuilder::new();
        assert_eq!(builder.intern(""), Token::EMPTY);
        assert!(builder.is_empty());

        let interner = builder.freeze();
        assert_eq!(interner.resolve(Token::EMPTY), "");
    }

    #[test]
    fn ids_are_sequential_and_stable() {
        let mut builder = InternerBuilder::new();
        let sony = builder.intern("sony");
        let canon = builder.intern("canon");
        assert_eq!(sony, Token(1));
        assert_eq!(canon, Token(2));
        assert_eq!(builder.intern("sony"), sony);
        assert_eq!(builder.len(), 3);

        let interner = builder.freeze();
        assert_eq!(interner.resolve(sony), "sony");
        assert_eq!(interner.resolve(canon), "canon");
        assert_eq!(interner.get("canon"), Some(canon));
        assert_eq!(interner.get("nikon"), None);
    }

    #[test]
    fn unknown_token_resolves_to_empty() {
        let interner = InternerBuilder::new().freeze();
        assert_eq!(interner.resolve(Token(42)), "");
    }

    #[test]
    fn frozen_interner_is_shareable() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Interner>();

        let mut builder = InternerBuilder::new();
        let token = builder.intern("dscp1");
        let interner = builder.freeze();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(interner.resolve(token), "dscp1"));
            }
        });
    }
}
