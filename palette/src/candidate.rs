//! Prepared search entry with precomputed normalized fields.
//!
//! Module isolation ensures no code outside this module can mutate the item
//! after construction, so the normalized copies can never go stale. Rebuilding
//! the index is the only way to pick up changed items.

use crate::interface::SearchableItem;
use crate::matcher::NormalizedText;

/// A searchable item plus trimmed, lower-cased copies of its text fields,
/// each able to map match positions back onto the displayed text.
#[derive(Debug, Clone)]
pub struct PreparedItem<A> {
    item: SearchableItem<A>,
    label: NormalizedText,
    description: NormalizedText,
    keywords: Vec<NormalizedText>,
}

impl<A> PreparedItem<A> {
    pub fn new(item: SearchableItem<A>) -> Self {
        let label = NormalizedText::new(&item.label);
        let description = NormalizedText::new(&item.description);
        let keywords = item.keywords.iter().map(|k| NormalizedText::new(k)).collect();
        Self {
            item,
            label,
            description,
            keywords,
        }
    }

    pub fn item(&self) -> &SearchableItem<A> {
        &self.item
    }

    pub fn label(&self) -> &NormalizedText {
        &self.label
    }

    pub fn description(&self) -> &NormalizedText {
        &self.description
    }

    pub fn keywords(&self) -> &[NormalizedText] {
        &self.keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::{Category, HighlightRange, PaletteAction};

    #[test]
    fn test_fields_are_normalized_once() {
        let item = SearchableItem::new(
            "command:help",
            "  /Help ",
            Category::Command,
            PaletteAction::Command { name: "help".into() },
        )
        .with_description("Show HELP")
        .with_keywords(["Docs", " Manual "]);

        let prepared = PreparedItem::new(item);
        assert_eq!(prepared.label().as_str(), "/help");
        assert_eq!(prepared.description().as_str(), "show help");
        let keywords: Vec<&str> = prepared.keywords().iter().map(NormalizedText::as_str).collect();
        assert_eq!(keywords, vec!["docs", "manual"]);
        // Display text stays untouched
        assert_eq!(prepared.item().label, "  /Help ");
    }

    #[test]
    fn test_label_positions_map_to_display() {
        let item = SearchableItem::new("note:1", " Über", Category::Note, PaletteAction::Note { id: "1".into() });
        let prepared = PreparedItem::new(item);
        assert_eq!(prepared.label().as_str(), "über");
        assert_eq!(
            prepared.label().display_ranges(&[HighlightRange::new(0, 2)]),
            vec![HighlightRange::new(1, 3)]
        );
    }
}
