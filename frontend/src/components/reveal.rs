use crate::dom;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct RevealProps {
    #[prop_or_default]
    pub class: Classes,
    #[prop_or_default]
    pub id: Option<AttrValue>,
    #[prop_or_default]
    pub children: Children,
}

/// Section that fades in once it scrolls into the lower viewport edge.
/// Stays visible afterwards.
#[function_component(RevealOnScroll)]
pub fn reveal_on_scroll(props: &RevealProps) -> Html {
    let node = use_node_ref();
    let visible = use_state(|| false);

    {
        let node = node.clone();
        let visible = visible.clone();
        use_effect_with_deps(
            move |_| {
                let window = web_sys::window();

                let mut revealed = false;
                let check = Closure::wrap(Box::new(move || {
                    if revealed {
                        return;
                    }
                    if let Some(element) = node.cast::<web_sys::Element>() {
                        let top = element.get_bounding_client_rect().top();
                        if dom::is_in_reveal_zone(top, dom::viewport_height()) {
                            revealed = true;
                            visible.set(true);
                        }
                    }
                }) as Box<dyn FnMut()>);

                if let Some(window) = &window {
                    for event in ["scroll", "resize"] {
                        let _ = window.add_event_listener_with_callback(event, check.as_ref().unchecked_ref());
                    }
                }
                // Initial check, content above the fold shows right away
                let _ = check
                    .as_ref()
                    .unchecked_ref::<web_sys::js_sys::Function>()
                    .call0(&wasm_bindgen::JsValue::NULL);

                move || {
                    if let Some(window) = window {
                        for event in ["scroll", "resize"] {
                            let _ = window.remove_event_listener_with_callback(event, check.as_ref().unchecked_ref());
                        }
                    }
                }
            },
            (),
        );
    }

    html! {
        <section
            ref={node}
            id={props.id.clone()}
            class={classes!("animate-on-scroll", props.class.clone(), (*visible).then(|| "visible"))}
        >
            { for props.children.iter() }
        </section>
    }
}
