// Deck construction: CSV rows → accepted quotes → shuffled placement order.

pub mod quote;
pub mod shuffle;

pub use quote::{parse_deck, Quote};
pub use shuffle::{DeckShuffler, KeepOrder, RandomShuffler};

/// Builds a quote for tests without going through CSV.
#[cfg(test)]
pub fn test_quote(contents: &str, attribution: Option<&str>) -> Quote {
    use quote::RawRow;

    let row = match attribution {
        Some(who) => RawRow::Attributed {
            contents: contents.to_string(),
            attribution: who.to_string(),
            marker: String::new(),
        },
        None => RawRow::Marked {
            contents: contents.to_string(),
            marker: String::new(),
        },
    };
    Quote::from_row(row).expect("test quote must have contents")
}
