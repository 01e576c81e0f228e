//! Bounded delimiter tokenizer
//!
//! Splits a message into at most [`TOKEN_CAPACITY`] borrowed substrings.
//! Nothing is allocated; tokens point into the input.

use heapless::Vec;

/// Maximum number of tokens a message is split into
pub const TOKEN_CAPACITY: usize = 4;

/// What happens to the text after the last token when the input holds more
/// delimiters than the token capacity allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowPolicy {
    /// The last token stops at the next delimiter; everything after it is
    /// dropped
    Truncate,
    /// The last token is the whole remainder of the input, delimiters
    /// included
    #[default]
    MergeRemainder,
}

/// Ordered, fixed-capacity set of tokens
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TokenSet<'a> {
    tokens: Vec<&'a str, TOKEN_CAPACITY>,
}

impl<'a> TokenSet<'a> {
    /// Number of valid tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when no token was produced
    ///
    /// [`tokenize`] always yields at least one token, so this only holds for
    /// a default-constructed set.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`, if within the valid range
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    /// All valid tokens
    pub fn as_slice(&self) -> &[&'a str] {
        &self.tokens
    }

    /// Iterate over the valid tokens in order
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.tokens.iter().copied()
    }
}

/// Split `input` on `delimiter` using the default overflow policy
pub fn tokenize(input: &str, delimiter: char) -> TokenSet<'_> {
    tokenize_with(input, delimiter, OverflowPolicy::default())
}

/// Split `input` on `delimiter`
///
/// With `n` delimiter occurrences exactly `1 + min(TOKEN_CAPACITY - 1, n)`
/// tokens are produced, each by scanning from the cursor to the next
/// delimiter (or the end of input).
pub fn tokenize_with(input: &str, delimiter: char, policy: OverflowPolicy) -> TokenSet<'_> {
    let occurrences = input.matches(delimiter).count();
    let split_count = 1 + occurrences.min(TOKEN_CAPACITY - 1);

    let mut tokens = Vec::new();
    let mut rest = input;

    for index in 0..split_count {
        let is_last = index + 1 == split_count;

        let token = if is_last && policy == OverflowPolicy::MergeRemainder {
            rest
        } else {
            match rest.find(delimiter) {
                Some(end) => {
                    let token = &rest[..end];
                    rest = &rest[end + delimiter.len_utf8()..];
                    token
                }
                None => {
                    let token = rest;
                    rest = "";
                    token
                }
            }
        };

        // split_count never exceeds the capacity
        let _ = tokens.push(token);
    }

    TokenSet { tokens }
}
