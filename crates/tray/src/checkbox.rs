//! Checkbox rendering for trays without a native checkbox.

use systray_protocol::{Menu, MenuItem};

/// Suffix appended to the title of a checked item when rendered as text.
pub const CHECK_MARKER: &str = " (√)";

/// How the tray renders an item's checked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckboxStyle {
    /// The tray draws a real checkbox; titles are sent untouched.
    Native,
    /// The checked state is spelled out by [`CHECK_MARKER`] at the end of
    /// the title.
    TextSuffix,
}

impl CheckboxStyle {
    /// Style used by the tray binary on the current platform.
    pub fn for_host() -> Self {
        if cfg!(target_os = "linux") {
            Self::TextSuffix
        } else {
            Self::Native
        }
    }

    /// Normalizes the title of `item` and all of its descendants.
    pub fn apply_item(self, item: &mut MenuItem) {
        if self == Self::Native {
            return;
        }
        item.visit_mut(&mut |i| i.title = render_title(&i.title, i.is_checked()));
    }

    /// Normalizes the titles of every item in `menu`.
    pub fn apply_menu(self, menu: &mut Menu) {
        for item in &mut menu.items {
            self.apply_item(item);
        }
    }
}

impl Default for CheckboxStyle {
    fn default() -> Self {
        Self::for_host()
    }
}

/// Title without any trailing check markers.
pub fn base_title(title: &str) -> &str {
    let mut base = title;
    while let Some(stripped) = base.strip_suffix(CHECK_MARKER) {
        base = stripped;
    }
    base
}

/// Renders `title` for the given state, carrying at most one marker.
pub fn render_title(title: &str, checked: bool) -> String {
    let base = base_title(title);
    if checked {
        format!("{base}{CHECK_MARKER}")
    } else {
        base.to_string()
    }
}
