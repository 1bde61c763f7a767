//! Identifier masking for log output

use std::fmt;

/// Redacts the middle of an identifier, keeping a short prefix and suffix
///
/// | length | kept |
/// |--------|------|
/// | 0-2    | nothing |
/// | 3-5    | first and last character |
/// | 6-10   | first two and last two |
/// | 11+    | first three and last three |
///
/// Length is counted in characters and the output always has the same
/// number of characters as the input.
pub fn mask_identity(identifier: &str) -> String {
    let chars: Vec<char> = identifier.chars().collect();
    let len = chars.len();

    let keep = match len {
        0..=2 => return "*".repeat(len),
        3..=5 => 1,
        6..=10 => 2,
        _ => 3,
    };

    let mut masked = String::with_capacity(identifier.len());
    masked.extend(&chars[..keep]);
    masked.extend(std::iter::repeat('*').take(len - 2 * keep));
    masked.extend(&chars[len - keep..]);
    masked
}

/// An account identifier in its loggable form
///
/// Only ever used for display; never compare or look up by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedIdentity(String);

impl MaskedIdentity {
    pub fn new(identifier: &str) -> Self {
        Self(mask_identity(identifier))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaskedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
