/// A word found in a text stream together with its 0-based position among
/// the other words of that same stream.
///
/// Positions are what the inverted index stores per posting and what phrase
/// queries walk to check adjacency; they are independent of byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub word: &'a str,
    pub position: usize,
}

/// Splits raw text into a stream of whitespace/punctuation-delimited words,
/// tracking each word's position.
///
/// Unlike a full word-breaking algorithm this does not attempt to weigh
/// punctuation separators more heavily than whitespace: word positions are
/// simply incremented by one per word, which is all the phrase/proximity
/// join in the posting list needs.
pub struct Tokenizer<'a> {
    position: usize,
    inner: &'a str,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Tokenizer<'a> {
        Tokenizer { position: 0, inner: text }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.inner.find(is_word_char)?;
        let rest = &self.inner[start..];
        let end = rest.find(|c| !is_word_char(c)).unwrap_or(rest.len());

        let word = &rest[..end];
        let token = Token { word, position: self.position };

        self.position += 1;
        self.inner = &rest[end..];

        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_punctuation_and_whitespace() {
        let mut tokenizer = Tokenizer::new(" .? yo lolo. aie (ouch)");

        assert_eq!(tokenizer.next(), Some(Token { word: "yo", position: 0 }));
        assert_eq!(tokenizer.next(), Some(Token { word: "lolo", position: 1 }));
        assert_eq!(tokenizer.next(), Some(Token { word: "aie", position: 2 }));
        assert_eq!(tokenizer.next(), Some(Token { word: "ouch", position: 3 }));
        assert_eq!(tokenizer.next(), None);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(Tokenizer::new("   ...  ").next(), None);
    }

    #[test]
    fn unicode_words_count_as_one_token() {
        let mut tokenizer = Tokenizer::new("café noir");
        assert_eq!(tokenizer.next(), Some(Token { word: "café", position: 0 }));
        assert_eq!(tokenizer.next(), Some(Token { word: "noir", position: 1 }));
    }
}
