use super::*;

use chat_list_core::ChatListSurface;
use chat_list_core::render::{CHAT_BUTTON_SELECTOR, CHAT_ID_ATTRIBUTE};

pub(super) struct DomChatListSurface {
    container_id: String,
}

impl DomChatListSurface {
    pub(super) fn new(container_id: String) -> Self {
        Self { container_id }
    }

    fn container(&self) -> Option<Element> {
        web_sys::window()?
            .document()?
            .get_element_by_id(&self.container_id)
    }
}

impl ChatListSurface for DomChatListSurface {
    fn has_container(&self) -> bool {
        self.container().is_some()
    }

    fn replace_markup(&self, markup: &str) {
        let Some(container) = self.container() else {
            return;
        };
        container.set_inner_html(markup);
        release_chat_button_handlers();
        bind_chat_button_handlers(&container);
    }
}

fn bind_chat_button_handlers(container: &Element) {
    let Ok(buttons) = container.query_selector_all(CHAT_BUTTON_SELECTOR) else {
        return;
    };

    CHAT_BUTTON_CLICK_HANDLERS.with(|slot| {
        let mut handlers = slot.borrow_mut();
        for index in 0..buttons.length() {
            let Some(button) = buttons
                .item(index)
                .and_then(|node| node.dyn_into::<Element>().ok())
            else {
                continue;
            };
            let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(
                move |event: web_sys::Event| {
                    let chat_id = event
                        .current_target()
                        .and_then(|target| target.dyn_into::<Element>().ok())
                        .and_then(|button| button.get_attribute(CHAT_ID_ATTRIBUTE));
                    // Navigation may repaint the list and drop this closure.
                    spawn_local(async move {
                        if let Some(view) = current_view() {
                            view.activate_chat(chat_id.as_deref());
                        }
                    });
                },
            ));
            let _ = button
                .add_event_listener_with_callback(CLICK_EVENT, callback.as_ref().unchecked_ref());
            handlers.push((button, callback));
        }
    });
}

pub(super) fn release_chat_button_handlers() {
    let handlers = CHAT_BUTTON_CLICK_HANDLERS.with(|slot| std::mem::take(&mut *slot.borrow_mut()));
    for (button, callback) in handlers {
        let _ = button
            .remove_event_listener_with_callback(CLICK_EVENT, callback.as_ref().unchecked_ref());
    }
}

pub(super) struct ToastNotifier {
    duration_ms: u32,
}

impl ToastNotifier {
    pub(super) fn new(duration_ms: u32) -> Self {
        Self { duration_ms }
    }
}

impl Notifier for ToastNotifier {
    fn notify(&self, message: &str) {
        let toast = match ensure_toast_element() {
            Ok(toast) => toast,
            Err(error) => {
                warn!(%error, %message, "toast unavailable");
                return;
            }
        };

        toast.set_inner_text(message);
        let _ = toast.style().set_property("background", TOAST_BACKGROUND);
        let _ = toast.style().set_property("display", "block");

        let hide = Timeout::new(self.duration_ms, move || {
            let _ = toast.style().set_property("display", "none");
        });
        // Replacing the pending timeout cancels it.
        TOAST_TIMEOUT.with(|slot| *slot.borrow_mut() = Some(hide));
    }
}

fn ensure_toast_element() -> Result<HtmlElement, String> {
    let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
    let document = window
        .document()
        .ok_or_else(|| "document is unavailable".to_string())?;

    if let Some(existing) = document.get_element_by_id(TOAST_ELEMENT_ID) {
        return existing
            .dyn_into::<HtmlElement>()
            .map_err(|_| "toast element exists but is not HtmlElement".to_string());
    }

    let body = document
        .body()
        .ok_or_else(|| "document body is unavailable".to_string())?;
    let toast = document
        .create_element("div")
        .map_err(|_| "failed to create toast element".to_string())?
        .dyn_into::<HtmlElement>()
        .map_err(|_| "toast element is not HtmlElement".to_string())?;
    toast.set_id(TOAST_ELEMENT_ID);
    let _ = toast.set_attribute("role", "status");
    let style = toast.style();
    for (property, value) in [
        ("position", "fixed"),
        ("bottom", "24px"),
        ("right", "24px"),
        ("max-width", "360px"),
        ("padding", "12px 16px"),
        ("border-radius", "12px"),
        ("color", "#f8fafc"),
        ("font-size", "14px"),
        ("z-index", "50"),
        ("display", "none"),
    ] {
        style
            .set_property(property, value)
            .map_err(|_| "failed to style toast element".to_string())?;
    }
    body.append_child(&toast)
        .map_err(|_| "failed to append toast element".to_string())?;
    Ok(toast)
}
