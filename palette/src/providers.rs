//! Adapters from the palette's data sources into searchable items.
//!
//! Each provider hands over plain records; these are turned into
//! [`SearchableItem`]s with namespaced ids (`command:help`, `note:42`, ...) so
//! ids stay unique across sources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::interface::{Category, PaletteAction, SearchableItem};
use crate::matcher::COMMAND_SIGIL;

const UNTITLED_CONVERSATION: &str = "Untitled conversation";
const UNTITLED_NOTE: &str = "Untitled note";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CommandRecord> for SearchableItem {
    fn from(record: CommandRecord) -> Self {
        let name = record.name.trim().trim_start_matches(COMMAND_SIGIL).to_string();
        let mut item = SearchableItem::new(
            format!("command:{name}"),
            format!("{COMMAND_SIGIL}{name}"),
            Category::Command,
            PaletteAction::Command { name },
        )
        .with_description(record.description)
        .with_keywords(record.aliases);
        item.popularity = record.popularity;
        item
    }
}

impl From<ActionRecord> for SearchableItem {
    fn from(record: ActionRecord) -> Self {
        let mut item = SearchableItem::new(
            format!("action:{}", record.id),
            record.title,
            Category::Action,
            PaletteAction::Action { id: record.id },
        )
        .with_description(record.description.unwrap_or_default())
        .with_keywords(record.keywords);
        item.popularity = record.popularity;
        item
    }
}

impl From<ConversationRecord> for SearchableItem {
    fn from(record: ConversationRecord) -> Self {
        let title = non_blank_or(record.title, UNTITLED_CONVERSATION);
        let last_used_at = record.last_message_at.or(record.updated_at).map(|t| t.timestamp_millis());
        let model = record.model.filter(|m| !m.trim().is_empty());

        let mut item = SearchableItem::new(
            format!("conversation:{}", record.id),
            title,
            Category::Conversation,
            PaletteAction::Conversation { id: record.id },
        );
        if let Some(model) = model {
            item.description = model.clone();
            item.keywords = vec![model];
        }
        item.last_used_at = last_used_at;
        item
    }
}

impl From<NoteRecord> for SearchableItem {
    fn from(record: NoteRecord) -> Self {
        let mut item = SearchableItem::new(
            format!("note:{}", record.id),
            non_blank_or(record.title, UNTITLED_NOTE),
            Category::Note,
            PaletteAction::Note { id: record.id },
        )
        .with_description(record.excerpt.unwrap_or_default())
        .with_keywords(record.tags);
        item.last_used_at = record.updated_at.map(|t| t.timestamp_millis());
        item
    }
}

fn non_blank_or(text: String, fallback: &str) -> String {
    if text.trim().is_empty() {
        fallback.to_string()
    } else {
        text
    }
}

/// Every data source the palette searches, as loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub commands: Vec<CommandRecord>,
    pub actions: Vec<ActionRecord>,
    pub conversations: Vec<ConversationRecord>,
    pub notes: Vec<NoteRecord>,
}

impl Catalog {
    pub fn from_json_str(raw: &str) -> Result<Self, crate::interface::PaletteError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn len(&self) -> usize {
        self.commands.len() + self.actions.len() + self.conversations.len() + self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Commands, then actions, conversations and notes.
    pub fn into_items(self) -> Vec<SearchableItem> {
        let mut items = Vec::with_capacity(self.len());
        items.extend(self.commands.into_iter().map(SearchableItem::from));
        items.extend(self.actions.into_iter().map(SearchableItem::from));
        items.extend(self.conversations.into_iter().map(SearchableItem::from));
        items.extend(self.notes.into_iter().map(SearchableItem::from));
        items
    }
}
