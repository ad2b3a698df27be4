use maud::{Markup, html};

use crate::presence::PresenceLookup;
use crate::profile::{Profile, ProfileTitles, UserId};

pub const CHAT_ID_ATTRIBUTE: &str = "data-chat-id";
pub const CHAT_BUTTON_SELECTOR: &str = "button[data-chat-id]";

const LIST_ITEM_CLASS: &str =
    "flex items-center justify-between gap-4 p-3 rounded-xl bg-pong-dark-custom/60";
const AVATAR_CLASS: &str = "w-10 h-10 md:w-12 md:h-12 rounded-full object-cover";
const PRESENCE_DOT_CLASS: &str =
    "absolute bottom-0 right-0 block w-3 h-3 rounded-full ring-2 ring-[#1c1d22]";
pub const ONLINE_DOT_CLASS: &str = "bg-pong-success";
pub const OFFLINE_DOT_CLASS: &str = "bg-gray-500";
const NAME_CLASS: &str = "text-sm md:text-base font-semibold text-white normal-case";
const SUBTITLE_CLASS: &str = "text-xs md:text-sm text-pong-dark-secondary";
const MESSAGE_BUTTON_CLASS: &str = "p-2 rounded-full hover:bg-pong-dark-highlight/20 \
     transition-all duration-200 text-pong-dark-primary hover:text-pong-accent";
const MESSAGE_ICON_CLASS: &str = "fa-solid fa-message text-lg md:text-2xl";
const EMPTY_STATE_CLASS: &str = "text-pong-dark-secondary text-center py-4 text-sm md:text-lg";

/// Renders one list item per present profile; empty slots produce nothing.
pub fn render_chat_list(
    profiles: &[Option<Profile>],
    lookup: &PresenceLookup,
    titles: &dyn ProfileTitles,
) -> String {
    let markup = html! {
        @for profile in profiles.iter().flatten() {
            (chat_row(profile, lookup.is_online(profile.id), titles))
        }
    };
    markup.into_string()
}

pub fn render_empty_state(message: &str) -> String {
    html! {
        li class=(EMPTY_STATE_CLASS) { (message) }
    }
    .into_string()
}

/// Rows rendered for a profile set, in order.
pub fn rendered_row_ids(profiles: &[Option<Profile>]) -> Vec<UserId> {
    profiles.iter().flatten().map(|profile| profile.id).collect()
}

pub fn parse_chat_id(raw: &str) -> Option<UserId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

fn chat_row(profile: &Profile, is_online: bool, titles: &dyn ProfileTitles) -> Markup {
    let (dot_class, dot_title) = if is_online {
        (ONLINE_DOT_CLASS, "Online")
    } else {
        (OFFLINE_DOT_CLASS, "Offline")
    };

    html! {
        li class=(LIST_ITEM_CLASS) {
            div class="flex items-center gap-4" {
                div class="relative" {
                    img src=(profile.avatar_url)
                        alt=(format!("{}'s avatar", profile.username))
                        class=(AVATAR_CLASS);
                    span class=(format!("{PRESENCE_DOT_CLASS} {dot_class}")) title=(dot_title) {}
                }
                div class="flex flex-col" {
                    span class=(NAME_CLASS) {
                        (titles.welcome_title(profile)) " " (profile.username)
                    }
                    span class=(SUBTITLE_CLASS) { (titles.rank_title(profile.rank)) }
                }
            }
            button type="button" class=(MESSAGE_BUTTON_CLASS) data-chat-id=(profile.id) {
                i class=(MESSAGE_ICON_CLASS) {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::UserStatus;
    use crate::profile::LadderTitles;

    fn profile(id: UserId, username: &str) -> Profile {
        Profile {
            id,
            username: username.to_string(),
            avatar_url: format!("/avatars/{id}.png"),
            rank: 7,
            title: None,
        }
    }

    #[test]
    fn renders_one_row_per_present_profile_in_order() {
        let profiles = vec![Some(profile(3, "ada")), None, Some(profile(1, "grace"))];
        let html = render_chat_list(&profiles, &PresenceLookup::default(), &LadderTitles);

        assert_eq!(html.matches("<li").count(), 2);
        let first = html.find("data-chat-id=\"3\"").expect("row 3");
        let second = html.find("data-chat-id=\"1\"").expect("row 1");
        assert!(first < second);
        assert_eq!(rendered_row_ids(&profiles), vec![3, 1]);
    }

    #[test]
    fn presence_dot_reflects_lookup() {
        let mut lookup = PresenceLookup::default();
        lookup.replace(&[UserStatus {
            user_id: 3,
            is_online: true,
        }]);

        let online = render_chat_list(&[Some(profile(3, "ada"))], &lookup, &LadderTitles);
        assert!(online.contains(ONLINE_DOT_CLASS));
        assert!(online.contains("title=\"Online\""));

        let offline = render_chat_list(&[Some(profile(4, "bob"))], &lookup, &LadderTitles);
        assert!(offline.contains(OFFLINE_DOT_CLASS));
        assert!(offline.contains("title=\"Offline\""));
    }

    #[test]
    fn name_is_prefixed_and_subtitle_uses_rank() {
        let html = render_chat_list(
            &[Some(profile(3, "ada"))],
            &PresenceLookup::default(),
            &LadderTitles,
        );
        assert!(html.contains("Regular ada"));
        assert!(html.contains(">Regular</span>"));
    }

    #[test]
    fn user_supplied_text_is_escaped() {
        let html = render_chat_list(
            &[Some(profile(3, "<script>alert(1)</script>"))],
            &PresenceLookup::default(),
            &LadderTitles,
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn attribute_and_title_text_is_escaped() {
        let hostile = Profile {
            avatar_url: "/a.png\" onerror=\"alert(1)".to_string(),
            title: Some("<b>Boss</b>".to_string()),
            ..profile(3, "ada")
        };
        let html = render_chat_list(&[Some(hostile)], &PresenceLookup::default(), &LadderTitles);

        assert!(!html.contains("onerror=\"alert(1)\""));
        assert!(html.contains("src=\"/a.png&quot; onerror=&quot;alert(1)\""));
        assert!(!html.contains("<b>"));
        assert!(html.contains("&lt;b&gt;Boss&lt;/b&gt; ada"));
    }

    #[test]
    fn empty_state_is_a_single_item() {
        let html = render_empty_state("No friends found.");
        assert_eq!(html.matches("<li").count(), 1);
        assert!(html.contains(">No friends found.</li>"));
    }

    #[test]
    fn parse_chat_id_accepts_numeric_ids_only() {
        assert_eq!(parse_chat_id("42"), Some(42));
        assert_eq!(parse_chat_id(" 7 "), Some(7));
        assert_eq!(parse_chat_id(""), None);
        assert_eq!(parse_chat_id("abc"), None);
    }
}
