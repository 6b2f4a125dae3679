use crate::Route;
use yew::prelude::*;
use yew_router::prelude::*;

#[function_component(Thanks)]
pub fn thanks() -> Html {
    html! {
        <div class="thanks-page">
            <h1>{"Vielen Dank!"}</h1>
            <p>{"Wir haben Ihre Nachricht erhalten und melden uns in Kürze bei Ihnen."}</p>
            <Link<Route> to={Route::Home} classes="btn btn-primary">
                {"Zurück zur Startseite"}
            </Link<Route>>
        </div>
    }
}
