use crate::components::anchor::AnchorLink;
use crate::components::floating::FloatingElements;
use crate::components::modal::Modal;
use crate::components::reveal::RevealOnScroll;
use crate::config::CONTACT_REDIRECT_DELAY_MS;
use crate::Route;
use gloo_timers::callback::Timeout;
use log::info;
use yew::prelude::*;
use yew_router::prelude::*;

const SERVICES: &[(&str, &str)] = &[
    ("Beratung", "Wir analysieren Ihre Ausgangslage und entwickeln eine klare Strategie."),
    ("Umsetzung", "Von der Konzeption bis zum Livegang aus einer Hand."),
    ("Betreuung", "Wartung, Weiterentwicklung und schnelle Hilfe, wenn es darauf ankommt."),
];

#[function_component(Home)]
pub fn home() -> Html {
    let open_modal = use_state(|| None::<&'static str>);
    let sending = use_state(|| false);
    let navigator = use_navigator();
    // Held so the redirect is cancelled if the page unmounts first
    let redirect = use_mut_ref(|| None::<Timeout>);

    let open = |id: &'static str| {
        let open_modal = open_modal.clone();
        Callback::from(move |_: MouseEvent| open_modal.set(Some(id)))
    };
    let close = {
        let open_modal = open_modal.clone();
        Callback::from(move |_: ()| open_modal.set(None))
    };

    let on_contact_submit = {
        let sending = sending.clone();
        let navigator = navigator.clone();
        let redirect = redirect.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *sending {
                return;
            }
            sending.set(true);
            info!("Contact form submitted, redirecting to thanks page");
            let navigator = navigator.clone();
            *redirect.borrow_mut() = Some(Timeout::new(CONTACT_REDIRECT_DELAY_MS, move || {
                if let Some(navigator) = navigator {
                    navigator.push(&Route::Thanks);
                }
            }));
        })
    };

    let on_newsletter_submit = {
        let navigator = navigator.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if let Some(navigator) = &navigator {
                navigator.push(&Route::Thanks);
            }
        })
    };

    html! {
        <div class="home-page">
            <section class="hero" id="start">
                <FloatingElements />
                <div class="hero-content">
                    <h1>{"Digitale Lösungen, die wirken"}</h1>
                    <p>{"Wir begleiten Unternehmen von der ersten Idee bis zum fertigen Produkt."}</p>
                    <AnchorLink href="#kontakt" class="btn btn-primary">{"Jetzt anfragen"}</AnchorLink>
                </div>
            </section>

            <RevealOnScroll id="leistungen" class="services">
                <h2>{"Leistungen"}</h2>
                <div class="service-grid">
                    { for SERVICES.iter().map(|(title, text)| html! {
                        <div class="service-card">
                            <h3>{*title}</h3>
                            <p>{*text}</p>
                        </div>
                    }) }
                </div>
            </RevealOnScroll>

            <RevealOnScroll id="ueber-uns" class="about">
                <h2>{"Über uns"}</h2>
                <p>{"Ein kleines Team mit viel Erfahrung in Design, Entwicklung und Betrieb."}</p>
                <button class="btn btn-secondary" data-open-modal="team-modal" onclick={open("team-modal")}>
                    {"Team kennenlernen"}
                </button>
            </RevealOnScroll>

            <RevealOnScroll id="kontakt" class="contact">
                <h2>{"Kontakt"}</h2>
                <form class="contact-form" onsubmit={on_contact_submit}>
                    <input type="text" name="name" placeholder="Name" required=true />
                    <input type="email" name="email" placeholder="E-Mail" required=true />
                    <textarea name="message" placeholder="Ihre Nachricht" required=true />
                    <button type="submit" class="btn btn-primary" disabled={*sending}>
                        if *sending {
                            <><i class="fas fa-spinner fa-spin"></i>{" Wird gesendet..."}</>
                        } else {
                            {"Nachricht senden"}
                        }
                    </button>
                </form>
            </RevealOnScroll>

            <footer class="footer">
                <form class="newsletter-form" onsubmit={on_newsletter_submit}>
                    <input type="email" name="email" placeholder="Newsletter abonnieren" required=true />
                    <button type="submit" class="btn">{"Anmelden"}</button>
                </form>
                <button class="link-button" data-open-modal="imprint-modal" onclick={open("imprint-modal")}>
                    {"Impressum"}
                </button>
            </footer>

            <Modal id="team-modal" open={*open_modal == Some("team-modal")} on_close={close.clone()}>
                <h3>{"Unser Team"}</h3>
                <p>{"Entwicklung, Gestaltung und Projektleitung unter einem Dach."}</p>
            </Modal>
            <Modal id="imprint-modal" open={*open_modal == Some("imprint-modal")} on_close={close}>
                <h3>{"Impressum"}</h3>
                <p>{"Angaben gemäß § 5 TMG folgen hier."}</p>
            </Modal>
        </div>
    }
}
