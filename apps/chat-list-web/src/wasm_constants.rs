pub(crate) const TOAST_ELEMENT_ID: &str = "chat-list-toast";
pub(crate) const TOAST_BACKGROUND: &str = "#7f1d1d";
pub(crate) const POPSTATE_EVENT: &str = "popstate";
pub(crate) const CLICK_EVENT: &str = "click";
