//! Splits an argument string into prefixed values.
//!
//! `" 3 n/John Doe t/friend t/colleague"` tokenized with `n/` and `t/`
//! yields the preamble `"3"`, `n/ -> ["John Doe"]` and
//! `t/ -> ["friend", "colleague"]`. A prefix only counts when it starts the
//! string or follows whitespace, so `a/Blk 30/2` keeps its inner slash.

use std::collections::HashMap;
use std::fmt;

/// A field marker such as `n/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix(&'static str);

impl Prefix {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PREFIX_NAME: Prefix = Prefix("n/");
pub const PREFIX_PHONE: Prefix = Prefix("p/");
pub const PREFIX_EMAIL: Prefix = Prefix("e/");
pub const PREFIX_ADDRESS: Prefix = Prefix("a/");
pub const PREFIX_TAG: Prefix = Prefix("t/");
pub const PREFIX_COURSE: Prefix = Prefix("c/");
pub const PREFIX_BIRTHDAY: Prefix = Prefix("b/");

/// Values collected per prefix, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentMultimap {
    preamble: String,
    values: HashMap<Prefix, Vec<String>>,
}

impl ArgumentMultimap {
    /// Text before the first recognised prefix, trimmed.
    #[must_use]
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Last value given for `prefix`.
    #[must_use]
    pub fn value(&self, prefix: Prefix) -> Option<&str> {
        self.values
            .get(&prefix)
            .and_then(|values| values.last())
            .map(String::as_str)
    }

    /// Every value given for `prefix`.
    #[must_use]
    pub fn all_values(&self, prefix: Prefix) -> &[String] {
        self.values.get(&prefix).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains(&self, prefix: Prefix) -> bool {
        self.values.contains_key(&prefix)
    }

    /// Prefixes among `prefixes` that were given more than once.
    #[must_use]
    pub fn repeated(&self, prefixes: &[Prefix]) -> Vec<Prefix> {
        prefixes
            .iter()
            .copied()
            .filter(|prefix| self.all_values(*prefix).len() > 1)
            .collect()
    }
}

/// Split `args` on the given prefixes.
#[must_use]
pub fn tokenize(args: &str, prefixes: &[Prefix]) -> ArgumentMultimap {
    let mut found: Vec<(usize, Prefix)> = Vec::new();
    let mut previous_is_space = true;
    for (pos, ch) in args.char_indices() {
        if previous_is_space {
            if let Some(prefix) = prefixes.iter().find(|p| args[pos..].starts_with(p.as_str())) {
                found.push((pos, *prefix));
            }
        }
        previous_is_space = ch.is_whitespace();
    }

    let preamble_end = found.first().map_or(args.len(), |(pos, _)| *pos);
    let mut map = ArgumentMultimap {
        preamble: args[..preamble_end].trim().to_string(),
        values: HashMap::new(),
    };
    for (i, (pos, prefix)) in found.iter().enumerate() {
        let start = pos + prefix.as_str().len();
        let end = found.get(i + 1).map_or(args.len(), |(next, _)| *next);
        map.values
            .entry(*prefix)
            .or_default()
            .push(args[start..end].trim().to_string());
    }
    map
}

/// First whitespace-separated token that looks like a field prefix
/// (`letters/`) but is not one of `known`.
#[must_use]
pub fn unknown_prefix(args: &str, known: &[Prefix]) -> Option<String> {
    args.split_whitespace().find_map(|token| {
        let (head, _) = token.split_once('/')?;
        let looks_like_prefix = !head.is_empty() && head.chars().all(|c| c.is_ascii_alphabetic());
        let candidate = format!("{head}/");
        (looks_like_prefix && !known.iter().any(|p| p.as_str() == candidate)).then_some(candidate)
    })
}
