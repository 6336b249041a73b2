use serde::{Deserialize, Serialize};

use crate::constants::UNATTRIBUTED_SEQ_ID;
use crate::types::{ItemId, ItemPatch, Menu, MenuItem};

// ---------------------------------------------------------------------------
// Outbound (host -> tray)
// ---------------------------------------------------------------------------

/// A request written to the tray binary's standard input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    /// Re-renders a single item.
    UpdateItem {
        item: MenuItem,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seq_id: Option<i64>,
    },
    /// Re-renders the whole menu.
    UpdateMenu { menu: Menu },
    /// Re-renders the whole menu and then a single item.
    UpdateMenuAndItem {
        menu: Menu,
        item: MenuItem,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        seq_id: Option<i64>,
    },
    /// Asks the tray to remove its icon and exit.
    Exit,
}

impl Action {
    pub fn update_item(item: MenuItem, seq_id: Option<i64>) -> Self {
        Self::UpdateItem { item, seq_id }
    }

    pub fn update_menu(menu: Menu) -> Self {
        Self::UpdateMenu { menu }
    }

    pub fn update_menu_and_item(menu: Menu, item: MenuItem, seq_id: Option<i64>) -> Self {
        Self::UpdateMenuAndItem { menu, item, seq_id }
    }

    /// Wire tag of this action.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UpdateItem { .. } => "update-item",
            Self::UpdateMenu { .. } => "update-menu",
            Self::UpdateMenuAndItem { .. } => "update-menu-and-item",
            Self::Exit => "exit",
        }
    }

    /// Substitutes [`UNATTRIBUTED_SEQ_ID`] for a missing sequence id on
    /// actions that carry one.
    pub fn fill_seq_id(&mut self) {
        match self {
            Self::UpdateItem { seq_id, .. } | Self::UpdateMenuAndItem { seq_id, .. } => {
                seq_id.get_or_insert(UNATTRIBUTED_SEQ_ID);
            }
            Self::UpdateMenu { .. } | Self::Exit => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound (tray -> host)
// ---------------------------------------------------------------------------

/// A notification read from the tray binary's standard output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Event {
    /// The tray is up and waiting for its initial menu.
    Ready,
    /// The user clicked an item.
    Clicked {
        item: ItemPatch,
        seq_id: i64,
        #[serde(rename = "__id")]
        id: ItemId,
    },
}
