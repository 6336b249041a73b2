//! Preparing menus and items before they are sent to the tray.
//!
//! Whatever goes on the wire has normalized checkbox titles, resolved
//! icons and internal identities; the helpers here apply those steps in
//! place so the caller's copy matches what was transmitted.

use systray_protocol::{Menu, MenuItem};

use crate::checkbox::CheckboxStyle;
use crate::error::TrayError;
use crate::icon;
use crate::identity::IdentityMap;

/// Prepares the menu a tray starts with.
///
/// Titles are normalized, then every item gets a fresh identity (depth
/// first), then icons are resolved. The map records the final items.
pub(crate) async fn prepare_initial(
    menu: &mut Menu,
    ids: &mut IdentityMap,
    style: CheckboxStyle,
) -> Result<(), TrayError> {
    style.apply_menu(menu);
    ids.assign_all(menu);
    icon::resolve_menu(menu).await?;
    ids.record_menu(menu);
    Ok(())
}

/// Prepares a menu sent as part of an update.
///
/// Items that already have an identity keep it; new ones, and repeats of
/// an identity used earlier in the menu, continue the counter.
pub(crate) async fn prepare_menu(
    menu: &mut Menu,
    ids: &mut IdentityMap,
    style: CheckboxStyle,
) -> Result<(), TrayError> {
    style.apply_menu(menu);
    ids.assign_menu_missing(menu);
    icon::resolve_menu(menu).await
}

/// Prepares a single item sent as part of an update.
///
/// The item itself must already carry an identity; descendants without
/// one are given fresh identities.
pub(crate) async fn prepare_item(
    item: &mut MenuItem,
    ids: &mut IdentityMap,
    style: CheckboxStyle,
) -> Result<(), TrayError> {
    if item.id.is_none() {
        return Err(TrayError::UnassignedItem);
    }
    style.apply_item(item);
    ids.assign_missing(item);
    icon::resolve_item(item).await
}
