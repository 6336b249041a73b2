//! Demo menu and click handling.

use systray::{Action, ClickEvent, ItemId, Menu, MenuItem, SysTray, TrayConfig};
use tokio::sync::mpsc;

use crate::config::Config;

/// Identities of the items the demo reacts to.
struct Ids {
    toggle: ItemId,
    submenu: ItemId,
    exit: ItemId,
}

fn build_menu(config: &Config) -> Menu {
    Menu {
        icon: config.icon.clone(),
        title: config.title.clone(),
        tooltip: config.tooltip.clone(),
        items: vec![
            MenuItem::new("Toggle")
                .with_tooltip("toggles itself and the exit item")
                .with_checked(false),
            MenuItem::separator(),
            MenuItem::new("More")
                .with_tooltip("has a submenu")
                .with_checked(false)
                .with_items(vec![
                    MenuItem::new("Submenu")
                        .with_tooltip("this is a submenu item")
                        .with_checked(false),
                ]),
            MenuItem::new("Exit").with_tooltip("quit the demo"),
        ],
    }
}

/// Runs the demo until the exit item is clicked, the tray exits or
/// Ctrl-C is pressed.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let tray = SysTray::new(TrayConfig::new(config.bin_path.clone(), build_menu(&config))).await?;

    let (click_tx, mut clicks) = mpsc::unbounded_channel();
    tray.on_click(move |event: &ClickEvent| {
        let _ = click_tx.send(event.clone());
    });
    tray.on_stderr(|line| tracing::info!(target: "systray_demo::tray", "{line}"));
    tray.on_error(|e| tracing::error!("tray error: {e}"));
    tray.on_exit(|info| tracing::info!(%info, "tray exited"));

    tray.ready().await?;
    tracing::info!(pid = ?tray.pid(), "tray started");

    let ids = {
        let menu = tray.menu().await;
        let id = |i: usize| {
            menu.items[i]
                .id
                .ok_or_else(|| anyhow::anyhow!("menu item {i} has no identity"))
        };
        Ids {
            toggle: id(0)?,
            submenu: menu.items[2]
                .items
                .first()
                .and_then(|item| item.id)
                .ok_or_else(|| anyhow::anyhow!("submenu item has no identity"))?,
            exit: id(3)?,
        }
    };

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("SIGINT received, shutting down");
                break;
            }
            _ = tray.wait_for_exit() => {
                tracing::warn!("tray exited on its own");
                return Ok(());
            }
            event = clicks.recv() => {
                let Some(event) = event else { break };
                if !handle_click(&tray, &ids, event).await? {
                    break;
                }
            }
        }
    }

    tray.kill(false).await?;
    Ok(())
}

/// Reacts to one click. Returns `false` once the demo should stop.
async fn handle_click(tray: &SysTray, ids: &Ids, event: ClickEvent) -> anyhow::Result<bool> {
    tracing::info!(id = %event.id, title = %event.item.title, "clicked");

    if event.id == ids.toggle {
        let checked = !event.item.is_checked();
        let item = event.item.with_checked(checked);
        let mut action = Action::update_item(item, Some(event.seq_id));
        tray.send_action(&mut action).await?;

        if let Some(exit) = tray.item(ids.exit).await {
            let hidden = !exit.hidden;
            let mut action = Action::update_item(exit.with_hidden(hidden), None);
            tray.send_action(&mut action).await?;
        }
    } else if event.id == ids.submenu {
        tracing::info!("open the url");
    } else if event.id == ids.exit {
        return Ok(false);
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_menu_layout() {
        let menu = build_menu(&Config::default());
        assert_eq!(menu.items.len(), 4);
        assert!(menu.items[1].is_separator());
        assert_eq!(menu.items[2].items[0].title, "Submenu");
        assert_eq!(menu.items[3].title, "Exit");
        assert!(menu.items.iter().all(|item| item.id.is_none()));
    }
}
