//! Friends chat list with a live presence indicator.
//!
//! Everything here is target independent; the browser bindings live in the
//! `chat-list-web` app and plug into the traits in [`view`].

pub mod channel;
pub mod config;
pub mod directory;
pub mod presence;
pub mod profile;
pub mod render;
pub mod view;

pub use channel::{ChannelError, ChannelEvent, ChannelFailureKind, ChannelState, PresenceChannel};
pub use config::{ChatListConfig, ConfigError};
pub use directory::{DirectoryError, FriendDirectory, FriendList, load_friend_list};
pub use presence::{
    PresenceDecodeError, PresenceLookup, PresenceMessage, UserStatus, decode_presence_frame,
    decode_presence_message,
};
pub use profile::{LadderTitles, Profile, ProfileTitles, UserId};
pub use view::{
    ChatListPorts, ChatListSnapshot, ChatListSurface, ChatListView, LoadError, LoadOutcome,
    Navigator, Notifier, PresenceConnector,
};
