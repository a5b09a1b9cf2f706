//! View-model derivations.
//!
//! Every function here is pure: it takes decoded model types and produces the exact
//! rows, cards and labels a page renders. Nothing in this module touches the network
//! or the cache.

pub mod articles;
pub mod clusters;
pub mod dates;
pub mod domains;
pub mod network;
pub mod problems;
pub mod sentiment;
pub mod stats;

pub use self::articles::*;
pub use self::clusters::*;
pub use self::dates::*;
pub use self::domains::*;
pub use self::network::*;
pub use self::problems::*;
pub use self::sentiment::*;
pub use self::stats::*;

/// Text truncated to `max` characters, with `...` appended when something was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// "and N more" footer for a list of `total` items of which `shown` are listed.
pub fn remainder_note(total: usize, shown: usize) -> Option<String> {
    (total > shown).then(|| format!("and {} more", total - shown))
}
