use log::Level;

pub const CONSENT_KEY: &str = "cookieConsent";
pub const PREFERENCES_KEY: &str = "cookiePreferences";
/// The only flag value that counts as recorded consent.
pub const CONSENT_TRUE: &str = "true";
pub const CONSENT_EVENT: &str = "cookieConsentUpdated";

/// Delay before the banner slides in, so it doesn't fight the first paint.
pub const BANNER_DELAY_MS: u32 = 1000;

pub const HEADER_SCROLL_THRESHOLD: f64 = 50.0;
pub const REVEAL_VIEWPORT_FRACTION: f64 = 0.85;
pub const ANCHOR_EXTRA_OFFSET: f64 = 20.0;
pub const CONTACT_REDIRECT_DELAY_MS: u32 = 1500;
pub const FLOATING_ELEMENT_COUNT: usize = 5;

/// Storage keys and timing used by a `ConsentStore`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsentConfig {
    pub consent_key: String,
    pub preferences_key: String,
    pub banner_delay_ms: u32,
}

impl Default for ConsentConfig {
    fn default() -> Self {
        Self {
            consent_key: CONSENT_KEY.to_string(),
            preferences_key: PREFERENCES_KEY.to_string(),
            banner_delay_ms: BANNER_DELAY_MS,
        }
    }
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
