//! Internal identities for menu items.
//!
//! Click events from the tray only name the item by its `__id`. The map
//! hands those identities out and keeps, for each one, the host's
//! authoritative copy of the item so a click can be resolved back to it.

use std::collections::{HashMap, HashSet};

use systray_protocol::constants::FIRST_ITEM_ID;
use systray_protocol::{ItemId, ItemPatch, Menu, MenuItem};

/// Identity counter plus the authoritative item for every identity.
///
/// Entries are never removed: an item dropped from the menu keeps its
/// identity and its last known state.
#[derive(Debug)]
pub struct IdentityMap {
    next: u32,
    items: HashMap<ItemId, MenuItem>,
}

impl Default for IdentityMap {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityMap {
    pub fn new() -> Self {
        Self {
            next: FIRST_ITEM_ID,
            items: HashMap::new(),
        }
    }

    /// Number of identities handed out so far.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn allocate(&mut self) -> ItemId {
        let id = ItemId(self.next);
        self.next += 1;
        id
    }

    /// Gives every item of `menu` a fresh identity, roots first and each
    /// item before its children, and records them all.
    pub fn assign_all(&mut self, menu: &mut Menu) {
        menu.visit_items_mut(&mut |item| item.id = Some(self.allocate()));
        self.record_menu(menu);
    }

    /// Gives an identity to every item under `item` that lacks one, or
    /// whose identity already appeared earlier in the same tree.
    ///
    /// Does not record anything; call [`IdentityMap::record_item`] once the
    /// item is in its final (transmitted) form.
    pub fn assign_missing(&mut self, item: &mut MenuItem) {
        item.visit(&mut |i| self.reserve(i));
        let mut seen = HashSet::new();
        self.assign_unique(item, &mut seen);
    }

    /// Like [`IdentityMap::assign_missing`], across every root of `menu`.
    ///
    /// An identity may appear only once in the whole menu: later
    /// occurrences (a cloned item, say) get fresh identities.
    pub fn assign_menu_missing(&mut self, menu: &mut Menu) {
        menu.visit_items(&mut |i| self.reserve(i));
        let mut seen = HashSet::new();
        for item in &mut menu.items {
            self.assign_unique(item, &mut seen);
        }
    }

    /// Moves the counter past an identity the caller supplied.
    fn reserve(&mut self, item: &MenuItem) {
        if let Some(id) = item.id {
            self.next = self.next.max(id.0.saturating_add(1));
        }
    }

    fn assign_unique(&mut self, item: &mut MenuItem, seen: &mut HashSet<ItemId>) {
        item.visit_mut(&mut |i| match i.id {
            Some(id) if seen.insert(id) => {}
            _ => {
                let id = self.allocate();
                seen.insert(id);
                i.id = Some(id);
            }
        });
    }

    /// Stores a copy of `item` and each of its descendants under their
    /// identities. Items without an identity are skipped.
    pub fn record_item(&mut self, item: &MenuItem) {
        item.visit(&mut |i| {
            if let Some(id) = i.id {
                // Never hand out an identity a caller already used.
                self.next = self.next.max(id.0.saturating_add(1));
                self.items.insert(id, i.clone());
            }
        });
    }

    /// Stores a copy of every item in `menu`.
    pub fn record_menu(&mut self, menu: &Menu) {
        for item in &menu.items {
            self.record_item(item);
        }
    }

    /// Authoritative item for `id`.
    pub fn get(&self, id: ItemId) -> Option<&MenuItem> {
        self.items.get(&id)
    }

    /// Applies the fields reported by a click to the stored item.
    ///
    /// Returns `None` when `id` was never handed out.
    pub fn merge(&mut self, id: ItemId, patch: &ItemPatch) -> Option<&MenuItem> {
        let item = self.items.get_mut(&id)?;
        item.apply(patch);
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nested_menu() -> Menu {
        Menu {
            items: vec![
                MenuItem::new("a"),
                MenuItem::new("b").with_items(vec![
                    MenuItem::new("b1").with_items(vec![MenuItem::new("b1x")]),
                    MenuItem::new("b2"),
                ]),
                MenuItem::new("c"),
            ],
            ..Menu::default()
        }
    }

    #[test]
    fn identities_are_pre_order_and_unique() {
        let mut menu = nested_menu();
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);

        let mut seen = Vec::new();
        menu.visit_items(&mut |i| seen.push((i.title.clone(), i.id.unwrap().0)));
        assert_eq!(
            seen,
            [
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("b1".to_string(), 3),
                ("b1x".to_string(), 4),
                ("b2".to_string(), 5),
                ("c".to_string(), 6),
            ]
        );
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn every_identity_resolves_to_its_item() {
        let mut menu = nested_menu();
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);

        menu.visit_items(&mut |i| {
            let stored = map.get(i.id.unwrap()).unwrap();
            assert_eq!(stored, i);
        });
    }

    #[test]
    fn assign_all_overrides_caller_identities() {
        let mut menu = nested_menu();
        menu.items[0].id = Some(ItemId(40));
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);
        assert_eq!(menu.items[0].id, Some(ItemId(1)));
    }

    #[test]
    fn late_items_continue_the_counter() {
        let mut menu = nested_menu();
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);

        let mut extra = MenuItem::new("d").with_items(vec![MenuItem::new("d1")]);
        map.assign_missing(&mut extra);
        map.record_item(&extra);

        assert_eq!(extra.id, Some(ItemId(7)));
        assert_eq!(extra.items[0].id, Some(ItemId(8)));
        assert_eq!(map.len(), 8);
    }

    #[test]
    fn assign_missing_keeps_existing_identities() {
        let mut map = IdentityMap::new();
        let mut item = MenuItem::new("x");
        item.id = Some(ItemId(3));
        map.assign_missing(&mut item);
        assert_eq!(item.id, Some(ItemId(3)));
    }

    #[test]
    fn repeated_identity_in_menu_is_reassigned() {
        let mut menu = nested_menu();
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);

        let copy = menu.items[0].clone();
        menu.items.push(copy);
        map.assign_menu_missing(&mut menu);
        map.record_menu(&menu);

        assert_eq!(menu.items[0].id, Some(ItemId(1)));
        assert_eq!(menu.items[3].id, Some(ItemId(7)));
        let mut all = Vec::new();
        menu.visit_items(&mut |i| all.push(i.id.unwrap()));
        let unique: HashSet<_> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn repeated_identity_inside_item_is_reassigned() {
        let mut map = IdentityMap::new();
        let mut child = MenuItem::new("child");
        child.id = Some(ItemId(2));
        let mut item = MenuItem::new("parent").with_items(vec![child.clone(), child]);
        item.id = Some(ItemId(1));

        map.assign_missing(&mut item);

        assert_eq!(item.id, Some(ItemId(1)));
        assert_eq!(item.items[0].id, Some(ItemId(2)));
        assert_eq!(item.items[1].id, Some(ItemId(3)));
    }

    #[test]
    fn fresh_identities_skip_caller_identities_in_the_same_menu() {
        let mut map = IdentityMap::new();
        let mut known = MenuItem::new("known");
        known.id = Some(ItemId(1));
        let mut menu = Menu {
            items: vec![MenuItem::new("new"), known],
            ..Menu::default()
        };

        map.assign_menu_missing(&mut menu);

        assert_eq!(menu.items[0].id, Some(ItemId(2)));
        assert_eq!(menu.items[1].id, Some(ItemId(1)));
    }

    #[test]
    fn recorded_identity_is_never_reused() {
        let mut map = IdentityMap::new();
        let mut item = MenuItem::new("x");
        item.id = Some(ItemId(10));
        map.record_item(&item);

        let mut fresh = MenuItem::new("y");
        map.assign_missing(&mut fresh);
        assert_eq!(fresh.id, Some(ItemId(11)));
    }

    #[test]
    fn merge_updates_stored_item() {
        let mut menu = Menu {
            items: vec![MenuItem::new("Item A").with_checked(false)],
            ..Menu::default()
        };
        let mut map = IdentityMap::new();
        map.assign_all(&mut menu);

        let patch = ItemPatch {
            checked: Some(true),
            ..ItemPatch::default()
        };
        let merged = map.merge(ItemId(1), &patch).unwrap();
        assert_eq!(merged.checked, Some(true));
        assert_eq!(merged.title, "Item A");
        assert_eq!(map.get(ItemId(1)).unwrap().checked, Some(true));
    }

    #[test]
    fn merge_unknown_identity_is_none() {
        let mut map = IdentityMap::new();
        assert!(map.merge(ItemId(99), &ItemPatch::default()).is_none());
    }
}
