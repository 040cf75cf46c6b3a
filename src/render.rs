//! Plain-text view of a list collection.

use std::fmt::Write as _;

use crate::lists::{ListCollection, WATCHLIST};

/// Render every list with its films, watchlist last.
pub fn text_view(lists: &ListCollection) -> String {
    let mut out = String::new();
    if lists.is_empty() {
        out.push_str("No lists yet. Use `add-list` to create one.\n");
        return out;
    }

    let ordered = lists
        .iter()
        .filter(|(name, _)| name.as_str() != WATCHLIST)
        .chain(lists.get_key_value(WATCHLIST));

    for (name, films) in ordered {
        let _ = writeln!(out, "{name} ({})", films.len());
        if films.is_empty() {
            out.push_str("    (empty)\n");
        }
        for film in films {
            let _ = writeln!(out, "    - {} [{}]", film.label(), film.id);
        }
    }
    out
}
