use super::*;

/// Pushes the route onto browser history and lets the page router pick it up
/// through a synthetic `popstate`.
pub(super) struct HistoryNavigator;

impl Navigator for HistoryNavigator {
    fn navigate_to(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if current_pathname().as_deref() == Some(path) {
            return;
        }
        let Ok(history) = window.history() else {
            return;
        };
        if history
            .push_state_with_url(&JsValue::NULL, "", Some(path))
            .is_err()
        {
            warn!(%path, "failed to push chat route");
            return;
        }
        if let Ok(event) = web_sys::PopStateEvent::new(POPSTATE_EVENT) {
            let _ = window.dispatch_event(&event);
        }
        debug!(%path, "navigated to chat");
    }
}

fn current_pathname() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}
