use crate::dom;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ModalProps {
    pub id: AttrValue,
    pub open: bool,
    pub on_close: Callback<()>,
    #[prop_or_default]
    pub children: Children,
}

#[function_component(Modal)]
pub fn modal(props: &ModalProps) -> Html {
    let backdrop = use_node_ref();

    use_effect_with_deps(
        |open| {
            let open = *open;
            if open {
                dom::lock_body_scroll(true);
            }
            move || {
                if open {
                    dom::lock_body_scroll(false);
                }
            }
        },
        props.open,
    );

    let on_backdrop = {
        let on_close = props.on_close.clone();
        let backdrop = backdrop.clone();
        Callback::from(move |e: MouseEvent| {
            if dom::is_backdrop_click(&e, &backdrop) {
                on_close.emit(());
            }
        })
    };
    let on_close_button = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div ref={backdrop} id={props.id.clone()} class={classes!("modal", props.open.then(|| "show"))} onclick={on_backdrop}>
            <div class="modal-content">
                <button class="modal-close" data-close-modal="" aria-label="Schließen" onclick={on_close_button}>
                    {"✕"}
                </button>
                { for props.children.iter() }
            </div>
        </div>
    }
}
