use crate::config::{ANCHOR_EXTRA_OFFSET, CONSENT_EVENT, HEADER_SCROLL_THRESHOLD, REVEAL_VIEWPORT_FRACTION};
use crate::consent::state::ConsentState;
use serde::Serialize;
use wasm_bindgen::JsCast;
use web_sys::{window, CustomEvent, CustomEventInit, HtmlElement, Node, ScrollBehavior, ScrollToOptions};
use yew::prelude::{MouseEvent, NodeRef, TargetCast};

#[derive(Serialize)]
struct ConsentDetail<'a> {
    preferences: &'a ConsentState,
}

/// Broadcasts `cookieConsentUpdated` on `document` so scripts outside the
/// app can react. `event.detail.preferences` holds every category.
pub fn dispatch_consent_updated(state: &ConsentState) {
    let Some(document) = window().and_then(|w| w.document()) else {
        return;
    };

    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    let detail = match (ConsentDetail { preferences: state }).serialize(&serializer) {
        Ok(detail) => detail,
        Err(e) => {
            log::error!("Failed to serialize consent event detail: {}", e);
            return;
        }
    };

    let init = CustomEventInit::new();
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(CONSENT_EVENT, &init) {
        Ok(event) => {
            if let Err(e) = document.dispatch_event(&event) {
                gloo_console::error!("Failed to dispatch consent event:", e);
            }
        }
        Err(e) => gloo_console::error!("Failed to create consent event:", e),
    }
}

/// Stops the page behind an open modal from scrolling.
pub fn lock_body_scroll(locked: bool) {
    let Some(body) = window().and_then(|w| w.document()).and_then(|d| d.body()) else {
        return;
    };
    let style = body.style();
    let result = if locked {
        style.set_property("overflow", "hidden")
    } else {
        style.remove_property("overflow").map(|_| ())
    };
    if let Err(e) = result {
        gloo_console::error!("Failed to update body overflow:", e);
    }
}

/// True when the click landed on the backdrop itself rather than inside
/// the dialog. Yew delegates listeners to the app root, so `current_target`
/// is never the backdrop and the node has to come from its `NodeRef`.
pub fn is_backdrop_click(e: &MouseEvent, backdrop: &NodeRef) -> bool {
    match (e.target_dyn_into::<Node>(), backdrop.get()) {
        (Some(target), Some(backdrop)) => target == backdrop,
        _ => false,
    }
}

/// Smooth-scrolls to the element `href` points at, leaving room for the
/// fixed header. `#` alone and unknown targets do nothing.
pub fn scroll_to_anchor(href: &str) {
    if !is_in_page_anchor(href) {
        return;
    }
    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };
    let Ok(Some(target)) = document.query_selector(href) else {
        return;
    };

    let header_height = document
        .query_selector(".header")
        .ok()
        .flatten()
        .and_then(|h| h.dyn_into::<HtmlElement>().ok())
        .map(|h| h.offset_height() as f64)
        .unwrap_or(0.0);
    let page_offset = window.page_y_offset().unwrap_or(0.0);
    let top = anchor_scroll_top(target.get_bounding_client_rect().top(), page_offset, header_height);

    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}

pub fn is_in_page_anchor(href: &str) -> bool {
    href.starts_with('#') && href != "#"
}

pub fn anchor_scroll_top(target_top: f64, page_offset: f64, header_height: f64) -> f64 {
    target_top + page_offset - header_height - ANCHOR_EXTRA_OFFSET
}

pub fn header_is_scrolled(scroll_y: f64) -> bool {
    scroll_y > HEADER_SCROLL_THRESHOLD
}

pub fn is_in_reveal_zone(element_top: f64, viewport_height: f64) -> bool {
    element_top < viewport_height * REVEAL_VIEWPORT_FRACTION
}

pub fn viewport_height() -> f64 {
    window()
        .and_then(|w| w.inner_height().ok())
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0)
}
