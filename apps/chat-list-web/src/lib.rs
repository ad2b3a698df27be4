#![allow(clippy::needless_pass_by_value)]

#[cfg(any(target_arch = "wasm32", test))]
mod payload;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use chat_list_core::{
        ChannelError, ChannelEvent, ChatListConfig, ChatListPorts, ChatListView, DirectoryError,
        FriendDirectory, LoadOutcome, Navigator, Notifier, PresenceConnector, Profile, UserId,
    };
    use futures_util::stream::SplitSink;
    use futures_util::{SinkExt, StreamExt};
    use gloo_net::http::Request;
    use gloo_net::websocket::{Message as WsMessage, WebSocketError, futures::WebSocket};
    use gloo_timers::callback::Timeout;
    use tracing::{debug, error, info, warn};
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Element, HtmlElement};

    use crate::payload::{decode_friend_ids, decode_profile, state_json};
    use crate::wasm_constants::*;

    mod dom;
    mod network;
    mod presence;
    mod routing;

    use dom::*;
    use network::*;
    use presence::*;
    use routing::*;

    thread_local! {
        static CONFIG: RefCell<ChatListConfig> = RefCell::new(ChatListConfig::default());
        static VIEW: RefCell<Option<Rc<ChatListView>>> = const { RefCell::new(None) };
        static LOGGER_READY: Cell<bool> = const { Cell::new(false) };
        static PRESENCE_SOCKET: RefCell<Option<PresenceSocket>> = const { RefCell::new(None) };
        static PRESENCE_GENERATION: Cell<u64> = const { Cell::new(0) };
        static CHAT_BUTTON_CLICK_HANDLERS: RefCell<Vec<(Element, Closure<dyn FnMut(web_sys::Event)>)>> = RefCell::new(Vec::new());
        static TOAST_TIMEOUT: RefCell<Option<Timeout>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        init_console_logging();
        debug!("chat list module started");
    }

    /// Installs a partial JSON config override. Applies to the next mount.
    #[wasm_bindgen]
    pub fn configure_chat_list(config_json: String) -> Result<(), JsValue> {
        let config = ChatListConfig::from_json(&config_json)
            .map_err(|error| JsValue::from_str(&error.to_string()))?;
        CONFIG.with(|slot| *slot.borrow_mut() = config);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn mount_chat_list() -> Result<(), JsValue> {
        mounted_view().map(|_| ())
    }

    /// Loads the friend list into the container and opens the presence
    /// channel. Directory failures reject the returned promise.
    #[wasm_bindgen]
    pub async fn load_chat_list() -> Result<(), JsValue> {
        let view = mounted_view()?;
        let directory = HttpFriendDirectory::new(view.config().clone());
        match view.load(&directory).await {
            Ok(LoadOutcome::Rendered { rows }) => {
                debug!(rows, "chat list rendered");
                Ok(())
            }
            Ok(outcome) => {
                debug!(?outcome, "chat list load finished");
                Ok(())
            }
            Err(error) => {
                error!(%error, "chat list load failed");
                Err(JsValue::from_str(&error.to_string()))
            }
        }
    }

    #[wasm_bindgen]
    pub fn unmount_chat_list() {
        let view = VIEW.with(|slot| slot.borrow_mut().take());
        if let Some(view) = view {
            view.teardown();
        }
        release_chat_button_handlers();
    }

    #[wasm_bindgen]
    pub fn chat_list_state_json() -> String {
        state_json(current_view().map(|view| view.snapshot()).as_ref())
    }

    fn init_console_logging() {
        if LOGGER_READY.with(Cell::get) {
            return;
        }
        if console_log::init_with_level(log::Level::Debug).is_ok() {
            LOGGER_READY.with(|ready| ready.set(true));
        }
    }

    fn mounted_view() -> Result<Rc<ChatListView>, JsValue> {
        if let Some(view) = current_view() {
            return Ok(view);
        }

        let host = current_host().ok_or_else(|| JsValue::from_str("browser host is unavailable"))?;
        let config = CONFIG.with(|slot| slot.borrow().clone());
        let ports = ChatListPorts {
            surface: Rc::new(DomChatListSurface::new(config.container_id.clone())),
            navigator: Rc::new(HistoryNavigator),
            notifier: Rc::new(ToastNotifier::new(config.toast_duration_ms)),
            connector: Rc::new(WebSocketConnector),
        };
        let view = Rc::new(ChatListView::new(config, host, ports));
        VIEW.with(|slot| *slot.borrow_mut() = Some(view.clone()));
        info!("chat list mounted");
        Ok(view)
    }

    pub(super) fn current_view() -> Option<Rc<ChatListView>> {
        VIEW.with(|slot| slot.borrow().clone())
    }

    fn current_host() -> Option<String> {
        let host = web_sys::window()?.location().host().ok()?;
        if host.trim().is_empty() { None } else { Some(host) }
    }
}
