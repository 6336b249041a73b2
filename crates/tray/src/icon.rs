//! Inlining icon files as base64 before they go on the wire.
//!
//! An icon field naming an existing file is replaced by the file's bytes,
//! base64 encoded. Anything else (already encoded data, names the tray
//! understands on its own) is passed through untouched.

use std::collections::{BTreeSet, HashMap};

use base64::{Engine, engine::general_purpose::STANDARD};
use systray_protocol::{Menu, MenuItem};

use crate::error::TrayError;

/// Loads `icon` if it names a regular file.
///
/// Returns `Ok(None)` when there is nothing to load.
pub async fn load_icon(icon: &str) -> Result<Option<String>, TrayError> {
    if icon.is_empty() {
        return Ok(None);
    }
    let is_file = tokio::fs::metadata(icon)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Ok(None);
    }

    let bytes = tokio::fs::read(icon).await.map_err(|source| TrayError::Icon {
        path: icon.to_string(),
        source,
    })?;
    tracing::debug!(path = icon, bytes = bytes.len(), "icon loaded");
    Ok(Some(STANDARD.encode(bytes)))
}

/// Resolves the icons of `item` and all of its descendants.
pub async fn resolve_item(item: &mut MenuItem) -> Result<(), TrayError> {
    let mut paths = BTreeSet::new();
    item.visit(&mut |i| collect(i, &mut paths));
    let loaded = load_all(paths).await?;
    item.visit_mut(&mut |i| substitute(i, &loaded));
    Ok(())
}

/// Resolves the tray icon and the icons of every item in `menu`.
pub async fn resolve_menu(menu: &mut Menu) -> Result<(), TrayError> {
    let mut paths = BTreeSet::new();
    paths.insert(menu.icon.clone());
    menu.visit_items(&mut |i| collect(i, &mut paths));

    let loaded = load_all(paths).await?;
    if let Some(encoded) = loaded.get(&menu.icon) {
        menu.icon.clone_from(encoded);
    }
    menu.visit_items_mut(&mut |i| substitute(i, &loaded));
    Ok(())
}

fn collect(item: &MenuItem, paths: &mut BTreeSet<String>) {
    if let Some(icon) = &item.icon {
        paths.insert(icon.clone());
    }
}

fn substitute(item: &mut MenuItem, loaded: &HashMap<String, String>) {
    if let Some(icon) = item.icon.as_mut()
        && let Some(encoded) = loaded.get(icon.as_str())
    {
        icon.clone_from(encoded);
    }
}

async fn load_all(paths: BTreeSet<String>) -> Result<HashMap<String, String>, TrayError> {
    let mut loaded = HashMap::new();
    for path in paths {
        if let Some(encoded) = load_icon(&path).await? {
            loaded.insert(path, encoded);
        }
    }
    Ok(loaded)
}
