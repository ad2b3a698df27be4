use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::channel::{ChannelError, ChannelEvent, ChannelOutcome, ChannelState, PresenceChannel};
use crate::config::ChatListConfig;
use crate::directory::{DirectoryError, FriendDirectory, FriendList, load_friend_list};
use crate::presence::PresenceLookup;
use crate::profile::{LadderTitles, Profile, ProfileTitles, UserId};
use crate::render::{parse_chat_id, render_chat_list, render_empty_state, rendered_row_ids};

/// The container the list is painted into.
pub trait ChatListSurface {
    fn has_container(&self) -> bool;
    /// Replaces the container contents and rebinds the row buttons.
    fn replace_markup(&self, markup: &str);
}

pub trait Navigator {
    fn navigate_to(&self, path: &str);
}

/// Shows a transient failure notice to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Opens the presence socket. Inbound traffic is fed back through
/// [`ChatListView::handle_channel_event`].
pub trait PresenceConnector {
    fn connect(&self, url: &str) -> Result<(), ChannelError>;
    fn disconnect(&self);
}

#[derive(Clone)]
pub struct ChatListPorts {
    pub surface: Rc<dyn ChatListSurface>,
    pub navigator: Rc<dyn Navigator>,
    pub notifier: Rc<dyn Notifier>,
    pub connector: Rc<dyn PresenceConnector>,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("friend directory request failed: {0}")]
    Directory(#[from] DirectoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    NoContainer,
    Empty,
    Rendered { rows: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatListSnapshot {
    pub channel: ChannelState,
    pub connections_opened: u32,
    pub rows: Vec<UserId>,
    pub online_ids: Vec<UserId>,
    pub showing_empty_state: bool,
    pub loads_completed: u32,
    pub notifications: u32,
}

#[derive(Debug, Default)]
struct ViewState {
    profiles: Vec<Option<Profile>>,
    lookup: PresenceLookup,
    channel: PresenceChannel,
    showing_empty_state: bool,
    loads_completed: u32,
    notifications: u32,
}

/// Owns the presence lookup, the current profile set and the channel handle
/// for one mounted chat list.
pub struct ChatListView {
    config: ChatListConfig,
    host: String,
    titles: Box<dyn ProfileTitles>,
    ports: ChatListPorts,
    state: RefCell<ViewState>,
}

impl ChatListView {
    pub fn new(config: ChatListConfig, host: impl Into<String>, ports: ChatListPorts) -> Self {
        Self {
            config,
            host: host.into(),
            titles: Box::new(LadderTitles),
            ports,
            state: RefCell::new(ViewState::default()),
        }
    }

    /// Replaces the default rank ladder used for name prefixes and subtitles.
    pub fn with_titles(mut self, titles: Box<dyn ProfileTitles>) -> Self {
        self.titles = titles;
        self
    }

    pub fn config(&self) -> &ChatListConfig {
        &self.config
    }

    pub async fn load(&self, directory: &dyn FriendDirectory) -> Result<LoadOutcome, LoadError> {
        if !self.ports.surface.has_container() {
            debug!(container_id = %self.config.container_id, "chat list container missing; skipping load");
            return Ok(LoadOutcome::NoContainer);
        }

        let profiles = match load_friend_list(directory).await? {
            FriendList::Empty => {
                {
                    let mut state = self.state.borrow_mut();
                    state.profiles.clear();
                    state.showing_empty_state = true;
                    state.loads_completed = state.loads_completed.saturating_add(1);
                }
                self.repaint();
                return Ok(LoadOutcome::Empty);
            }
            FriendList::Profiles(profiles) => profiles,
        };

        let rows = rendered_row_ids(&profiles).len();
        {
            let mut state = self.state.borrow_mut();
            state.profiles = profiles;
            state.showing_empty_state = false;
            state.loads_completed = state.loads_completed.saturating_add(1);
        }
        self.repaint();
        self.ensure_channel();
        Ok(LoadOutcome::Rendered { rows })
    }

    /// Paints the current profile set against the current lookup.
    pub fn repaint(&self) {
        if !self.ports.surface.has_container() {
            return;
        }
        let markup = {
            let state = self.state.borrow();
            if state.showing_empty_state {
                render_empty_state(&self.config.empty_state_message)
            } else {
                render_chat_list(&state.profiles, &state.lookup, self.titles.as_ref())
            }
        };
        self.ports.surface.replace_markup(&markup);
    }

    pub fn handle_channel_event(&self, event: ChannelEvent) {
        if let ChannelEvent::Closed { code, reason } = &event {
            info!(?code, %reason, "presence channel closed");
        }

        let outcome = self.state.borrow_mut().channel.handle(event);
        match outcome {
            ChannelOutcome::Snapshot(statuses) => {
                debug!(statuses = statuses.len(), "presence snapshot received");
                self.state.borrow_mut().lookup.replace(&statuses);
                self.repaint();
            }
            ChannelOutcome::Ignored => {
                debug!("presence frame without userStatuses ignored");
            }
            ChannelOutcome::Failed(error) => self.report_failure(&error),
            ChannelOutcome::Closed => {}
        }
    }

    /// Handles a click on a row button carrying `raw_chat_id`.
    pub fn activate_chat(&self, raw_chat_id: Option<&str>) -> Option<String> {
        let chat_id = raw_chat_id.and_then(parse_chat_id)?;
        let route = self.config.chat_route(chat_id);
        self.ports.navigator.navigate_to(&route);
        Some(route)
    }

    pub fn teardown(&self) {
        let was_open = self.state.borrow().channel.is_open();
        if was_open {
            self.ports.connector.disconnect();
        }
        self.state.borrow_mut().channel.mark_absent();
        info!(was_open, "chat list torn down");
    }

    pub fn snapshot(&self) -> ChatListSnapshot {
        let state = self.state.borrow();
        ChatListSnapshot {
            channel: state.channel.state(),
            connections_opened: state.channel.connections_opened(),
            rows: if state.showing_empty_state {
                Vec::new()
            } else {
                rendered_row_ids(&state.profiles)
            },
            online_ids: state.lookup.online_ids(),
            showing_empty_state: state.showing_empty_state,
            loads_completed: state.loads_completed,
            notifications: state.notifications,
        }
    }

    fn ensure_channel(&self) {
        if self.state.borrow().channel.is_open() {
            return;
        }

        let connected = self
            .config
            .presence_url(&self.host)
            .map_err(ChannelError::from)
            .and_then(|url| {
                info!(%url, "opening presence channel");
                self.ports.connector.connect(&url)
            });

        match connected {
            Ok(()) => self.state.borrow_mut().channel.mark_open(),
            Err(error) => self.report_failure(&error),
        }
    }

    fn report_failure(&self, error: &ChannelError) {
        warn!(kind = ?error.failure_kind(), %error, "presence channel failure");
        {
            let mut state = self.state.borrow_mut();
            state.notifications = state.notifications.saturating_add(1);
        }
        self.ports.notifier.notify(&self.config.failure_message);
    }
}
