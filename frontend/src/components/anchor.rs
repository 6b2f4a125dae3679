use crate::dom;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct AnchorLinkProps {
    pub href: AttrValue,
    #[prop_or_default]
    pub class: Classes,
    /// Fired before scrolling, e.g. to fold the mobile menu.
    #[prop_or_default]
    pub on_follow: Callback<()>,
    #[prop_or_default]
    pub children: Children,
}

/// In-page link that smooth-scrolls past the fixed header instead of
/// jumping. Plain `#` links keep the browser default.
#[function_component(AnchorLink)]
pub fn anchor_link(props: &AnchorLinkProps) -> Html {
    let onclick = {
        let href = props.href.clone();
        let on_follow = props.on_follow.clone();
        Callback::from(move |e: MouseEvent| {
            if dom::is_in_page_anchor(&href) {
                e.prevent_default();
                on_follow.emit(());
                dom::scroll_to_anchor(&href);
            }
        })
    };

    html! {
        <a href={props.href.clone()} class={props.class.clone()} {onclick}>
            { for props.children.iter() }
        </a>
    }
}
