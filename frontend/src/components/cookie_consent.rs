use crate::consent::category::CategoryId;
use crate::consent::store::{ConsentStore, ControlState};
use crate::dom;
use crate::storage::LocalStorage;
use gloo_timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CookieConsentProps {
    /// Pages without the settings modal still get accept and reject.
    #[prop_or(true)]
    pub with_settings: bool,
}

pub enum CookieConsentMsg {
    RevealBanner,
    AcceptAll,
    RejectAll,
    OpenSettings,
    CloseSettings,
    Toggle(CategoryId, bool),
    Save,
}

pub struct CookieConsent {
    store: ConsentStore<LocalStorage>,
    banner_visible: bool,
    modal_visible: bool,
    controls: Vec<ControlState>,
    reveal_timer: Option<Timeout>,
    backdrop: NodeRef,
}

impl Component for CookieConsent {
    type Message = CookieConsentMsg;
    type Properties = CookieConsentProps;

    fn create(ctx: &Context<Self>) -> Self {
        let mut store = ConsentStore::new(LocalStorage::new());
        store.subscribe(dom::dispatch_consent_updated);
        store.init();

        let reveal_timer = if store.should_show_banner() {
            let link = ctx.link().clone();
            let delay = store.config().banner_delay_ms;
            Some(Timeout::new(delay, move || {
                link.send_message(CookieConsentMsg::RevealBanner);
            }))
        } else {
            None
        };
        let controls = store.control_states();

        Self {
            store,
            banner_visible: false,
            modal_visible: false,
            controls,
            reveal_timer,
            backdrop: NodeRef::default(),
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            CookieConsentMsg::RevealBanner => {
                self.reveal_timer = None;
                self.banner_visible = self.store.should_show_banner();
                true
            }
            CookieConsentMsg::AcceptAll => {
                self.store.accept_all();
                self.close_all();
                true
            }
            CookieConsentMsg::RejectAll => {
                self.store.reject_all();
                self.close_all();
                true
            }
            CookieConsentMsg::OpenSettings => {
                if !ctx.props().with_settings {
                    return false;
                }
                self.controls = self.store.reconcile();
                self.modal_visible = true;
                dom::lock_body_scroll(true);
                true
            }
            CookieConsentMsg::CloseSettings => {
                self.hide_modal();
                true
            }
            CookieConsentMsg::Toggle(id, checked) => {
                self.store.set_category_from_control(id, checked);
                if let Some(control) = self.controls.iter_mut().find(|c| c.id == id && !c.disabled) {
                    control.checked = checked;
                }
                true
            }
            CookieConsentMsg::Save => {
                let controls: Vec<(CategoryId, bool)> =
                    self.controls.iter().map(|c| (c.id, c.checked)).collect();
                self.store.save_from_controls(controls);
                self.controls = self.store.control_states();
                self.close_all();
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let with_settings = ctx.props().with_settings;

        html! {
            <>
                <div class={classes!("cookie-consent", self.banner_visible.then(|| "show"))}
                    role="dialog" aria-live="polite">
                    <div class="cookie-consent-content">
                        <h3>{"Wir verwenden Cookies"}</h3>
                        <p>
                            {"Wir nutzen Cookies, um unsere Website für Sie optimal zu gestalten. \
                              Notwendige Cookies sind immer aktiv, alle anderen nur mit Ihrer Zustimmung."}
                        </p>
                        <div class="cookie-consent-buttons">
                            <button class="btn btn-accept-all" onclick={link.callback(|_| CookieConsentMsg::AcceptAll)}>
                                {"Alle akzeptieren"}
                            </button>
                            <button class="btn btn-reject-all" onclick={link.callback(|_| CookieConsentMsg::RejectAll)}>
                                {"Nur notwendige"}
                            </button>
                            if with_settings {
                                <button class="btn btn-cookie-settings" onclick={link.callback(|_| CookieConsentMsg::OpenSettings)}>
                                    {"Einstellungen"}
                                </button>
                            }
                        </div>
                    </div>
                </div>
                if with_settings {
                    <>
                        { self.view_settings_modal(ctx) }
                        <button class="btn-cookie-settings cookie-settings-link"
                            onclick={link.callback(|_| CookieConsentMsg::OpenSettings)}>
                            {"Cookie-Einstellungen"}
                        </button>
                    </>
                }
            </>
        }
    }

    fn destroy(&mut self, _ctx: &Context<Self>) {
        // Dropping the timeout cancels it
        self.reveal_timer = None;
        self.store.teardown();
        if self.modal_visible {
            dom::lock_body_scroll(false);
        }
    }
}

impl CookieConsent {
    fn close_all(&mut self) {
        self.reveal_timer = None;
        self.banner_visible = false;
        self.hide_modal();
    }

    fn hide_modal(&mut self) {
        if self.modal_visible {
            self.modal_visible = false;
            dom::lock_body_scroll(false);
        }
    }

    fn view_settings_modal(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        // Only a click on the backdrop itself closes, not one inside the dialog
        let backdrop = self.backdrop.clone();
        let on_backdrop = link.batch_callback(move |e: MouseEvent| {
            dom::is_backdrop_click(&e, &backdrop).then_some(CookieConsentMsg::CloseSettings)
        });

        html! {
            <div ref={self.backdrop.clone()}
                class={classes!("cookie-settings-modal", self.modal_visible.then(|| "show"))}
                onclick={on_backdrop}>
                <div class="cookie-settings-content">
                    <div class="cookie-settings-header">
                        <h3>{"Cookie-Einstellungen"}</h3>
                        <button class="cookie-settings-close" aria-label="Schließen"
                            onclick={link.callback(|_| CookieConsentMsg::CloseSettings)}>
                            {"✕"}
                        </button>
                    </div>
                    if self.store.needs_retry() {
                        <p class="cookie-settings-warning">
                            {"Ihre Auswahl gilt für diesen Besuch, konnte aber nicht dauerhaft gespeichert werden."}
                        </p>
                    }
                    <div class="cookie-categories">
                        { for self.controls.iter().map(|control| self.view_category(ctx, control)) }
                    </div>
                    <div class="cookie-settings-footer">
                        <button class="btn btn-reject-all" onclick={link.callback(|_| CookieConsentMsg::RejectAll)}>
                            {"Alle ablehnen"}
                        </button>
                        <button class="btn btn-save-preferences" onclick={link.callback(|_| CookieConsentMsg::Save)}>
                            {"Auswahl speichern"}
                        </button>
                        <button class="btn btn-accept-all" onclick={link.callback(|_| CookieConsentMsg::AcceptAll)}>
                            {"Alle akzeptieren"}
                        </button>
                    </div>
                </div>
            </div>
        }
    }

    fn view_category(&self, ctx: &Context<Self>, control: &ControlState) -> Html {
        let Some(category) = self.store.state().get(control.id) else {
            return html! {};
        };
        let id = control.id;

        html! {
            <div class="cookie-category" key={id.as_str()}>
                <div class="cookie-category-header">
                    <span class="cookie-category-name">{category.name}</span>
                    <label class="switch">
                        <input
                            type="checkbox"
                            class="cookie-category-toggle"
                            data-category={id.as_str()}
                            checked={control.checked}
                            disabled={control.disabled}
                            onchange={ctx.link().callback(move |e: Event| {
                                let input: HtmlInputElement = e.target_unchecked_into();
                                CookieConsentMsg::Toggle(id, input.checked())
                            })}
                        />
                        <span class="slider round"></span>
                    </label>
                </div>
                <p class="cookie-category-description">{category.description}</p>
            </div>
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use crate::config::{CONSENT_KEY, PREFERENCES_KEY};
    use crate::consent::snapshot::Snapshot;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;
    use web_sys::{window, Element, HtmlElement, Storage};

    wasm_bindgen_test_configure!(run_in_browser);

    fn storage() -> Storage {
        window().unwrap().local_storage().unwrap().unwrap()
    }

    fn fresh_root() -> Element {
        let storage = storage();
        storage.remove_item(CONSENT_KEY).unwrap();
        storage.remove_item(PREFERENCES_KEY).unwrap();

        let document = window().unwrap().document().unwrap();
        let root = document.create_element("div").unwrap();
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    // Yew renders and handles messages on the microtask queue
    async fn settle() {
        TimeoutFuture::new(0).await;
    }

    fn find(root: &Element, selector: &str) -> Option<HtmlElement> {
        root.query_selector(selector)
            .unwrap()
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn has_class(element: &Element, class: &str) -> bool {
        element.class_name().split_whitespace().any(|c| c == class)
    }

    fn body_overflow() -> String {
        let body = window().unwrap().document().unwrap().body().unwrap();
        body.style().get_property_value("overflow").unwrap()
    }

    #[wasm_bindgen_test]
    async fn page_without_settings_can_still_accept() {
        let root = fresh_root();
        let app = yew::Renderer::<CookieConsent>::with_root_and_props(
            root.clone(),
            CookieConsentProps { with_settings: false },
        )
        .render();
        settle().await;

        assert!(find(&root, ".cookie-settings-modal").is_none());
        assert!(find(&root, ".btn-cookie-settings").is_none());

        find(&root, ".btn-accept-all").unwrap().click();
        settle().await;

        assert_eq!(storage().get_item(CONSENT_KEY).unwrap().as_deref(), Some("true"));
        let saved = Snapshot::parse(&storage().get_item(PREFERENCES_KEY).unwrap().unwrap()).unwrap();
        assert!(saved.enabled_values().all(|(_, enabled)| enabled));

        app.destroy();
        root.remove();
    }

    #[wasm_bindgen_test]
    async fn backdrop_click_closes_settings() {
        let root = fresh_root();
        let app = yew::Renderer::<CookieConsent>::with_root(root.clone()).render();
        settle().await;

        find(&root, ".cookie-settings-link").unwrap().click();
        settle().await;
        let modal = find(&root, ".cookie-settings-modal").unwrap();
        assert!(has_class(&modal, "show"));
        assert_eq!(body_overflow(), "hidden");

        find(&root, ".cookie-settings-content").unwrap().click();
        settle().await;
        assert!(has_class(&modal, "show"), "a click inside the dialog must not close it");

        modal.click();
        settle().await;
        assert!(!has_class(&modal, "show"));
        assert_eq!(body_overflow(), "");

        app.destroy();
        root.remove();
    }
}
