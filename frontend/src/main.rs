use yew::prelude::*;
use yew_hooks::prelude::use_window_scroll;
use yew_router::prelude::*;
use log::info;

mod config;
mod dom;
mod error;
mod storage;
mod consent {
    pub mod category;
    pub mod hook;
    pub mod snapshot;
    pub mod state;
    pub mod store;
}
mod components {
    pub mod anchor;
    pub mod cookie_consent;
    pub mod floating;
    pub mod modal;
    pub mod reveal;
}
mod pages {
    pub mod home;
    pub mod thanks;
}

use components::{anchor::AnchorLink, cookie_consent::CookieConsent};
use pages::{home::Home, thanks::Thanks};



#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/thanks")]
    Thanks,
    #[not_found]
    #[at("/404")]
    NotFound,
}


fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => {
            info!("Rendering Home page");
            html! { <Home /> }
        },
        Route::Thanks => {
            info!("Rendering Thanks page");
            html! { <Thanks /> }
        },
        Route::NotFound => {
            info!("Unknown route, showing Home page");
            html! { <Home /> }
        },
    }
}


const NAV_LINKS: &[(&str, &str)] = &[
    ("#leistungen", "Leistungen"),
    ("#ueber-uns", "Über uns"),
    ("#kontakt", "Kontakt"),
];

#[function_component(Nav)]
pub fn nav() -> Html {
    let menu_open = use_state(|| false);
    let (_, scroll_y) = use_window_scroll();

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: ()| {
            menu_open.set(false);
        })
    };

    let expanded = if *menu_open { "true" } else { "false" };

    html! {
        <header class={classes!("header", dom::header_is_scrolled(scroll_y).then(|| "scrolled"))}>
            <div class="nav-content">
                <Link<Route> to={Route::Home} classes="nav-logo">
                    {"Studio"}
                </Link<Route>>

                <button class="nav-toggle" aria-label="Menü" aria-expanded={expanded} onclick={toggle_menu}>
                    <span></span>
                    <span></span>
                    <span></span>
                </button>
                <nav class={classes!("nav", (*menu_open).then(|| "show"))}>
                    { for NAV_LINKS.iter().map(|(href, label)| html! {
                        <AnchorLink href={*href} class="nav-link" on_follow={close_menu.clone()}>
                            {*label}
                        </AnchorLink>
                    }) }
                </nav>
            </div>
        </header>
    }
}


#[function_component]
fn App() -> Html {
    html! {
        <BrowserRouter>
            <Nav />
            <Switch<Route> render={switch} />
            <CookieConsent />
        </BrowserRouter>
    }
}


fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting application");
    yew::Renderer::<App>::new().render();
}
