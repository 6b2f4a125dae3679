use super::state::ConsentState;

/// Runs after every successful save. This is where real cookies or
/// third-party scripts would be switched on and off per category.
pub trait CookieHook {
    fn apply(&self, state: &ConsentState);
}

/// Default hook. Doesn't touch any cookies, only records the decision.
pub struct LogHook;

impl CookieHook for LogHook {
    fn apply(&self, state: &ConsentState) {
        let summary: Vec<String> = state
            .iter()
            .map(|c| format!("{}={}", c.id, c.enabled))
            .collect();
        log::info!("Cookie preferences saved: {}", summary.join(", "));
    }
}
