//! The tray controller.
//!
//! [`SysTray`] composes the process bridge, the identity map and the menu
//! preparation steps into one lifecycle:
//! construct -> ready -> send actions / receive clicks -> kill.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use systray_protocol::{
    Action, Event, ItemId, ItemPatch, Menu, MenuItem, encode_action, encode_line, redact,
};
use tokio::sync::{Mutex, mpsc, watch};
use tracing::{debug, error, info};

use crate::bridge::{Bridge, BridgeEvent};
use crate::checkbox::CheckboxStyle;
use crate::config::TrayConfig;
use crate::error::TrayError;
use crate::identity::IdentityMap;
use crate::listeners::Listeners;
use crate::menu;
use crate::types::{ClickEvent, ExitInfo, TrayState};

/// Controller for one tray process.
///
/// The menu handed over in [`TrayConfig`] is owned by the controller from
/// then on. [`SysTray::send_action`] updates both the caller's payload and
/// the controller's copy, and click events are resolved against that copy.
///
/// Dropping the controller kills the tray process.
pub struct SysTray {
    shared: Arc<Shared>,
}

struct Shared {
    bridge: Bridge,
    style: CheckboxStyle,
    model: Mutex<Model>,
    listeners: Listeners,
    state: watch::Sender<TrayState>,
    /// Set once the initial menu has been written.
    became_ready: AtomicBool,
}

/// The authoritative menu tree and the identity map over it.
struct Model {
    menu: Menu,
    ids: IdentityMap,
}

impl Model {
    fn store_item(&mut self, item: &MenuItem) {
        let Some(id) = item.id else { return };
        match self.menu.find_mut(id) {
            Some(node) => {
                *node = item.clone();
                self.ids.record_menu(&self.menu);
            }
            None => self.ids.record_item(item),
        }
    }

    fn store_menu(&mut self, menu: &Menu) {
        self.menu = menu.clone();
        self.ids.record_menu(&self.menu);
    }

    fn merge_click(&mut self, id: ItemId, patch: &ItemPatch) -> Option<MenuItem> {
        self.ids.merge(id, patch)?;
        if let Some(node) = self.menu.find_mut(id) {
            node.apply(patch);
            self.ids.record_menu(&self.menu);
        }
        self.ids.get(id).cloned()
    }
}

impl SysTray {
    /// Prepares the menu and starts the tray process.
    ///
    /// Returns once the process is running; use [`SysTray::ready`] to wait
    /// for the tray to accept the menu.
    pub async fn new(config: TrayConfig) -> Result<Self, TrayError> {
        let TrayConfig {
            bin_path,
            args,
            mut menu,
            checkbox_style,
        } = config;

        let mut ids = IdentityMap::new();
        menu::prepare_initial(&mut menu, &mut ids, checkbox_style).await?;
        debug!(items = ids.len(), "initial menu prepared");

        let (bridge, events) = Bridge::spawn(bin_path, &args).await?;
        let (state, _) = watch::channel(TrayState::Initializing);

        let shared = Arc::new(Shared {
            bridge,
            style: checkbox_style,
            model: Mutex::new(Model { menu, ids }),
            listeners: Listeners::default(),
            state,
            became_ready: AtomicBool::new(false),
        });

        tokio::spawn(dispatch(Arc::clone(&shared), events));

        Ok(Self { shared })
    }

    /// Waits until the tray has reported ready and received its menu.
    ///
    /// Every caller observes the same single transition. Fails if the
    /// process exits first.
    pub async fn ready(&self) -> Result<(), TrayError> {
        let shared = &self.shared;
        let mut rx = shared.state.subscribe();
        let state = *rx
            .wait_for(|s| shared.became_ready.load(Ordering::SeqCst) || s.is_exited())
            .await
            .map_err(|_| TrayError::Closed)?;

        if shared.became_ready.load(Ordering::SeqCst) {
            return Ok(());
        }
        match state {
            TrayState::Exited(info) => Err(TrayError::ExitedBeforeReady(info)),
            _ => Ok(()),
        }
    }

    /// Registers a listener for item clicks.
    pub fn on_click<F>(&self, listener: F)
    where
        F: Fn(&ClickEvent) + Send + Sync + 'static,
    {
        self.shared.listeners.add_click(Arc::new(listener));
    }

    /// Registers a listener for the exit of the tray process.
    pub fn on_exit<F>(&self, listener: F)
    where
        F: Fn(ExitInfo) + Send + Sync + 'static,
    {
        self.shared.listeners.add_exit(Arc::new(listener));
    }

    /// Registers a listener for I/O failures while observing the process.
    pub fn on_error<F>(&self, listener: F)
    where
        F: Fn(&TrayError) + Send + Sync + 'static,
    {
        self.shared.listeners.add_error(Arc::new(listener));
    }

    /// Registers a listener for lines the tray writes to stderr.
    pub fn on_stderr<F>(&self, listener: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared.listeners.add_stderr(Arc::new(listener));
    }

    /// Sends an action to the tray.
    ///
    /// The payload is updated in place before it is written: titles are
    /// normalized for the checkbox style, icon paths are replaced by their
    /// encoded contents, new items get identities and a missing `seq_id`
    /// becomes `-1`.
    ///
    /// Resolves once the line has been written to the tray. Only then is
    /// the controller's own copy updated to match; after a failed write
    /// [`SysTray::menu`] and [`SysTray::item`] still show what was last sent.
    pub async fn send_action(&self, action: &mut Action) -> Result<(), TrayError> {
        let style = self.shared.style;

        // Held until the write is acknowledged so the model changes in
        // exactly the order lines reach the tray.
        let mut model = self.shared.model.lock().await;
        match action {
            Action::UpdateItem { item, .. } => {
                menu::prepare_item(item, &mut model.ids, style).await?;
            }
            Action::UpdateMenu { menu } => {
                menu::prepare_menu(menu, &mut model.ids, style).await?;
            }
            Action::UpdateMenuAndItem { menu, item, .. } => {
                menu::prepare_menu(menu, &mut model.ids, style).await?;
                menu::prepare_item(item, &mut model.ids, style).await?;
            }
            Action::Exit => {}
        }
        action.fill_seq_id();

        let line = encode_action(action)?;
        debug!(action = action.kind(), line = %redact(&line), "sending action");
        self.shared.bridge.queue_line(line).await?.wait().await?;

        match action {
            Action::UpdateItem { item, .. } => model.store_item(item),
            Action::UpdateMenu { menu } => model.store_menu(menu),
            Action::UpdateMenuAndItem { menu, item, .. } => {
                model.store_menu(menu);
                model.store_item(item);
            }
            Action::Exit => {}
        }
        Ok(())
    }

    /// Asks the tray to exit and waits until the process has exited.
    ///
    /// With `terminate_host` the current process then exits with code 0
    /// and this never returns. Calling it again after exit just returns the
    /// recorded exit info.
    pub async fn kill(&self, terminate_host: bool) -> Result<ExitInfo, TrayError> {
        if self.shared.bridge.is_alive() {
            self.shared.transition(TrayState::Exiting);
            let mut exit = Action::Exit;
            if let Err(e) = self.send_action(&mut exit).await {
                if self.shared.bridge.is_alive() {
                    return Err(e);
                }
                debug!("tray exited while sending exit: {e}");
            }
        }

        let info = self.wait_for_exit().await;
        info!(%info, terminate_host, "tray stopped");

        if terminate_host {
            std::process::exit(0);
        }
        Ok(info)
    }

    /// Kills the tray process without asking it to exit.
    pub fn force_kill(&self) {
        self.shared.transition(TrayState::Exiting);
        self.shared.bridge.force_kill();
    }

    /// Waits until the tray process has exited and exit listeners have run.
    pub async fn wait_for_exit(&self) -> ExitInfo {
        let mut rx = self.shared.state.subscribe();
        let state = rx.wait_for(TrayState::is_exited).await.map(|s| *s);
        match state {
            Ok(TrayState::Exited(info)) => info,
            _ => self.shared.bridge.exit_info().unwrap_or_default(),
        }
    }

    /// Path of the tray binary.
    pub fn bin_path(&self) -> &Path {
        self.shared.bridge.bin_path()
    }

    /// OS process id of the tray, if it was still known at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.shared.bridge.pid()
    }

    /// Whether the tray process is still running.
    pub fn is_alive(&self) -> bool {
        self.shared.bridge.is_alive()
    }

    /// Exit code and signal, once the process has exited.
    pub fn exit_info(&self) -> Option<ExitInfo> {
        self.shared.bridge.exit_info()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrayState {
        *self.shared.state.borrow()
    }

    /// Snapshot of the menu as last transmitted.
    pub async fn menu(&self) -> Menu {
        self.shared.model.lock().await.menu.clone()
    }

    /// Authoritative copy of the item with the given identity.
    pub async fn item(&self, id: ItemId) -> Option<MenuItem> {
        self.shared.model.lock().await.ids.get(id).cloned()
    }
}

impl Drop for SysTray {
    fn drop(&mut self) {
        if self.shared.bridge.is_alive() {
            debug!("controller dropped, killing tray");
            self.shared.bridge.force_kill();
        }
    }
}

impl Shared {
    /// Moves to `next` if that is a valid transition.
    fn transition(&self, next: TrayState) -> bool {
        self.state.send_if_modified(|state| {
            if state.can_become(&next) {
                *state = next;
                true
            } else {
                false
            }
        })
    }

    /// Sends the initial menu on the first ready event.
    async fn handle_ready(&self) {
        if *self.state.borrow() != TrayState::Initializing {
            debug!("ignoring repeated ready event");
            return;
        }

        let queued = {
            let model = self.model.lock().await;
            match encode_line(&model.menu) {
                Ok(line) => {
                    debug!(line = %redact(&line), "sending initial menu");
                    self.bridge.queue_line(line).await
                }
                Err(e) => Err(e.into()),
            }
        };
        let written = match queued {
            Ok(pending) => pending.wait().await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            error!("failed to send initial menu: {e}");
            self.listeners.emit_error(&e);
            return;
        }

        self.became_ready.store(true, Ordering::SeqCst);
        self.transition(TrayState::Ready);
        info!("tray ready");
    }

    /// Resolves a click against the identity map and notifies listeners.
    async fn handle_click(&self, id: ItemId, patch: &ItemPatch, seq_id: i64) {
        let item = self.model.lock().await.merge_click(id, patch);
        let Some(item) = item else {
            debug!(%id, seq_id, "dropping click for unknown item");
            return;
        };
        debug!(%id, seq_id, title = %item.title, "item clicked");
        self.listeners.emit_click(&ClickEvent { item, seq_id, id });
    }
}

/// Routes bridge notifications until every pump has stopped.
async fn dispatch(shared: Arc<Shared>, mut events: mpsc::Receiver<BridgeEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            BridgeEvent::Event(Event::Ready) => shared.handle_ready().await,
            BridgeEvent::Event(Event::Clicked { item, seq_id, id }) => {
                shared.handle_click(id, &item, seq_id).await;
            }
            BridgeEvent::Stderr(line) => shared.listeners.emit_stderr(&line),
            BridgeEvent::Error(e) => shared.listeners.emit_error(&e),
            BridgeEvent::Exited(info) => {
                shared.listeners.emit_exit(info);
                shared.transition(TrayState::Exited(info));
            }
        }
    }
    debug!("tray dispatch finished");
}
