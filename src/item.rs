//! Context items
//!
//! One addressable thing a context can open: an application, a document, a browser
//! tab, or a terminal session. Items are value types; mutating one means replacing it
//! inside its context. The JSON form carries the variant explicitly as
//! `{"type": ..., "value": {...}}` so the four payloads round-trip unambiguously.

use crate::types::ItemId;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// A single item of a context
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum ContextItem {
    Application(AppItem),
    Document(DocumentItem),
    BrowserTab(BrowserTab),
    TerminalSession(TerminalSession),
}

/// Discriminant of [`ContextItem`], used for display and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Application,
    Document,
    BrowserTab,
    TerminalSession,
}

impl ItemKind {
    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::Application => "app",
            ItemKind::Document => "document",
            ItemKind::BrowserTab => "tab",
            ItemKind::TerminalSession => "terminal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    pub name: String,
    pub bundle_identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentItem {
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    pub name: String,
    pub file_path: String,
    /// Bundle identifier of the application that should open the file.
    /// Empty in older files; normalized to `None`.
    #[serde(
        default,
        rename = "application",
        deserialize_with = "empty_string_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub owning_application: Option<String>,
    /// Security-scoped bookmark bytes (base64 in JSON)
    #[serde(default, with = "base64_bytes", skip_serializing_if = "Option::is_none")]
    pub bookmark: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserTab {
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    pub title: String,
    pub url: String,
    /// Browser family name as entered: chrome, safari, firefox, default, or empty.
    /// Kept raw; it is resolved at activation time.
    #[serde(default)]
    pub browser: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminalSession {
    #[serde(default = "Uuid::new_v4")]
    pub id: ItemId,
    pub working_directory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    pub title: String,
}

impl AppItem {
    pub fn new(name: impl Into<String>, bundle_identifier: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            bundle_identifier: bundle_identifier.into(),
            window_title: None,
        }
    }
}

impl DocumentItem {
    pub fn new(name: impl Into<String>, file_path: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            file_path: file_path.into(),
            owning_application: None,
            bookmark: None,
        }
    }

    pub fn with_application(mut self, bundle_identifier: impl Into<String>) -> Self {
        let id = bundle_identifier.into();
        self.owning_application = if id.trim().is_empty() { None } else { Some(id) };
        self
    }
}

impl BrowserTab {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        browser: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            url: url.into(),
            browser: browser.into(),
        }
    }
}

impl TerminalSession {
    pub fn new(
        title: impl Into<String>,
        working_directory: impl Into<String>,
        command: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            working_directory: working_directory.into(),
            command,
            title: title.into(),
        }
    }

    /// The command to run, if one is set and not blank.
    pub fn runnable_command(&self) -> Option<&str> {
        self.command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl ContextItem {
    pub fn id(&self) -> ItemId {
        match self {
            ContextItem::Application(app) => app.id,
            ContextItem::Document(doc) => doc.id,
            ContextItem::BrowserTab(tab) => tab.id,
            ContextItem::TerminalSession(session) => session.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ContextItem::Application(_) => ItemKind::Application,
            ContextItem::Document(_) => ItemKind::Document,
            ContextItem::BrowserTab(_) => ItemKind::BrowserTab,
            ContextItem::TerminalSession(_) => ItemKind::TerminalSession,
        }
    }

    /// Human readable name of the item.
    pub fn display_name(&self) -> &str {
        match self {
            ContextItem::Application(app) => &app.name,
            ContextItem::Document(doc) => &doc.name,
            ContextItem::BrowserTab(tab) if !tab.title.is_empty() => &tab.title,
            ContextItem::BrowserTab(tab) => &tab.url,
            ContextItem::TerminalSession(session) => &session.title,
        }
    }

    /// The item's target: bundle id, path, URL, or working directory.
    pub fn target(&self) -> &str {
        match self {
            ContextItem::Application(app) => &app.bundle_identifier,
            ContextItem::Document(doc) => &doc.file_path,
            ContextItem::BrowserTab(tab) => &tab.url,
            ContextItem::TerminalSession(session) => &session.working_directory,
        }
    }

    pub fn as_browser_tab(&self) -> Option<&BrowserTab> {
        match self {
            ContextItem::BrowserTab(tab) => Some(tab),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&DocumentItem> {
        match self {
            ContextItem::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_terminal_session(&self) -> Option<&TerminalSession> {
        match self {
            ContextItem::TerminalSession(session) => Some(session),
            _ => None,
        }
    }
}

impl From<AppItem> for ContextItem {
    fn from(item: AppItem) -> Self {
        ContextItem::Application(item)
    }
}

impl From<DocumentItem> for ContextItem {
    fn from(item: DocumentItem) -> Self {
        ContextItem::Document(item)
    }
}

impl From<BrowserTab> for ContextItem {
    fn from(item: BrowserTab) -> Self {
        ContextItem::BrowserTab(item)
    }
}

impl From<TerminalSession> for ContextItem {
    fn from(item: TerminalSession) -> Self {
        ContextItem::TerminalSession(item)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match bytes {
            Some(b) => serializer.serialize_str(&STANDARD.encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Option::<String>::deserialize(deserializer)?;
        match encoded {
            Some(s) if !s.is_empty() => STANDARD
                .decode(s.as_bytes())
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
