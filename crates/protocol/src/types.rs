use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SEPARATOR_TITLE;

/// Internal identity of a menu item, carried on the wire as `__id`.
///
/// Identities are handed out by the host, never by the tray binary, and are
/// only used to correlate click events with the item that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single entry of the tray menu, possibly holding a submenu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub title: String,
    #[serde(default)]
    pub tooltip: String,
    /// `None` renders a plain item, `Some(_)` a checkbox.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
    /// File path before resolution, base64 payload (or opaque string) after.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "__id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

fn default_true() -> bool {
    true
}

impl Default for MenuItem {
    fn default() -> Self {
        Self {
            title: String::new(),
            tooltip: String::new(),
            checked: None,
            enabled: true,
            hidden: false,
            items: Vec::new(),
            icon: None,
            id: None,
        }
    }
}

impl MenuItem {
    /// Creates an enabled, visible item with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Creates an item the tray renders as a separator line.
    pub fn separator() -> Self {
        Self::new(SEPARATOR_TITLE)
    }

    /// Returns whether this item is a separator.
    pub fn is_separator(&self) -> bool {
        self.title == SEPARATOR_TITLE
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = tooltip.into();
        self
    }

    /// Turns the item into a checkbox with the given state.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_items(mut self, items: Vec<MenuItem>) -> Self {
        self.items = items;
        self
    }

    /// Whether the item is rendered as a checked checkbox.
    pub fn is_checked(&self) -> bool {
        self.checked == Some(true)
    }

    /// Visits this item and then all of its descendants, depth first.
    pub fn visit_mut<F: FnMut(&mut MenuItem)>(&mut self, f: &mut F) {
        f(self);
        for child in &mut self.items {
            child.visit_mut(f);
        }
    }

    /// Visits this item and then all of its descendants, depth first.
    pub fn visit<F: FnMut(&MenuItem)>(&self, f: &mut F) {
        f(self);
        for child in &self.items {
            child.visit(f);
        }
    }

    /// Finds the item (this one or a descendant) carrying `id`.
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut MenuItem> {
        if self.id == Some(id) {
            return Some(self);
        }
        self.items.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Overwrites the fields reported in `patch`, keeping the rest.
    pub fn apply(&mut self, patch: &ItemPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(tooltip) = &patch.tooltip {
            self.tooltip.clone_from(tooltip);
        }
        if patch.checked.is_some() {
            self.checked = patch.checked;
        }
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
        if patch.icon.is_some() {
            self.icon.clone_from(&patch.icon);
        }
    }
}

/// Item fields as reported back by the tray in a click event.
///
/// Every field is optional: only the ones present in the event override
/// the host's copy of the item. Submenus are never taken from events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// The whole tray: icon, title, tooltip and the root menu items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Menu {
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tooltip: String,
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Visits every item of the menu, each root followed by its descendants.
    pub fn visit_items_mut<F: FnMut(&mut MenuItem)>(&mut self, f: &mut F) {
        for item in &mut self.items {
            item.visit_mut(f);
        }
    }

    /// Visits every item of the menu, each root followed by its descendants.
    pub fn visit_items<F: FnMut(&MenuItem)>(&self, f: &mut F) {
        for item in &self.items {
            item.visit(f);
        }
    }

    /// Finds the item carrying `id` anywhere in the tree.
    pub fn find_mut(&mut self, id: ItemId) -> Option<&mut MenuItem> {
        self.items.iter_mut().find_map(|item| item.find_mut(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_menu() -> Menu {
        Menu {
            icon: "icon.png".into(),
            title: "Tray".into(),
            tooltip: "Tips".into(),
            items: vec![
                MenuItem::new("a"),
                MenuItem::new("b").with_items(vec![MenuItem::new("b1"), MenuItem::new("b2")]),
                MenuItem::new("c"),
            ],
        }
    }

    #[test]
    fn default_item_is_enabled_and_visible() {
        let item = MenuItem::default();
        assert!(item.enabled);
        assert!(!item.hidden);
        assert!(item.checked.is_none());
        assert!(item.id.is_none());
    }

    #[test]
    fn separator_is_recognised() {
        assert!(MenuItem::separator().is_separator());
        assert!(MenuItem::separator().enabled);
        assert!(!MenuItem::new("Quit").is_separator());
    }

    #[test]
    fn visit_is_pre_order() {
        let menu = sample_menu();
        let mut titles = Vec::new();
        menu.visit_items(&mut |item| titles.push(item.title.clone()));
        assert_eq!(titles, ["a", "b", "b1", "b2", "c"]);
    }

    #[test]
    fn find_mut_reaches_nested_items() {
        let mut menu = sample_menu();
        menu.items[1].items[1].id = Some(ItemId(7));
        let found = menu.find_mut(ItemId(7)).unwrap();
        assert_eq!(found.title, "b2");
        assert!(menu.find_mut(ItemId(8)).is_none());
    }

    #[test]
    fn apply_overrides_only_reported_fields() {
        let mut item = MenuItem::new("Sound")
            .with_tooltip("toggle sound")
            .with_checked(false)
            .with_items(vec![MenuItem::new("child")]);
        let patch = ItemPatch {
            checked: Some(true),
            ..ItemPatch::default()
        };
        item.apply(&patch);
        assert_eq!(item.checked, Some(true));
        assert_eq!(item.title, "Sound");
        assert_eq!(item.tooltip, "toggle sound");
        assert_eq!(item.items.len(), 1);
    }

    #[test]
    fn item_serialization_uses_wire_names() {
        let mut item = MenuItem::new("a").with_checked(true);
        item.id = Some(ItemId(3));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["__id"], 3);
        assert_eq!(json["enabled"], true);
        assert_eq!(json["checked"], true);
        assert!(json.get("items").is_none());
        assert!(json.get("icon").is_none());
    }

    #[test]
    fn item_deserialization_defaults_enabled() {
        let item: MenuItem = serde_json::from_str(r#"{"title":"x","tooltip":"y"}"#).unwrap();
        assert!(item.enabled);
        assert!(!item.hidden);
        assert!(item.items.is_empty());
    }

    #[test]
    fn patch_ignores_submenus_and_identity() {
        let patch: ItemPatch = serde_json::from_str(
            r#"{"title":"x","checked":true,"items":[{"title":"y"}],"__id":4}"#,
        )
        .unwrap();
        assert_eq!(patch.title.as_deref(), Some("x"));
        assert_eq!(patch.checked, Some(true));
        assert!(patch.tooltip.is_none());
    }
}
