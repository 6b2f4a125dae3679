use crate::config::FLOATING_ELEMENT_COUNT;
use web_sys::js_sys::Math;
use yew::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct FloatSpec {
    pub size_px: f64,
    pub left_pct: f64,
    pub top_pct: f64,
    pub delay_s: f64,
    pub duration_s: f64,
}

impl FloatSpec {
    /// Maps five uniform samples in `[0, 1)` onto a blob: 50-250px wide,
    /// anywhere in the container, 0-5s delay, 10-20s loop.
    pub fn from_samples(r: [f64; 5]) -> Self {
        Self {
            size_px: r[0] * 200.0 + 50.0,
            left_pct: r[1] * 100.0,
            top_pct: r[2] * 100.0,
            delay_s: r[3] * 5.0,
            duration_s: r[4] * 10.0 + 10.0,
        }
    }

    pub fn style(&self) -> String {
        format!(
            "width: {size}px; height: {size}px; left: {}%; top: {}%; animation-delay: {}s; animation-duration: {}s;",
            self.left_pct,
            self.top_pct,
            self.delay_s,
            self.duration_s,
            size = self.size_px,
        )
    }
}

fn random_specs() -> Vec<FloatSpec> {
    (0..FLOATING_ELEMENT_COUNT)
        .map(|_| FloatSpec::from_samples([(); 5].map(|_| Math::random())))
        .collect()
}

#[function_component(FloatingElements)]
pub fn floating_elements() -> Html {
    // Rolled once per mount so re-renders don't make the blobs jump
    let specs = use_state(random_specs);

    html! {
        <div class="floating-elements" aria-hidden="true">
            { for specs.iter().map(|spec| html! {
                <div class="float-el" style={spec.style()}></div>
            }) }
        </div>
    }
}
