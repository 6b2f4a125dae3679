use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Necessary,
    Analytics,
    Marketing,
    Preferences,
}

impl CategoryId {
    pub const ALL: [CategoryId; 4] = [
        CategoryId::Necessary,
        CategoryId::Analytics,
        CategoryId::Marketing,
        CategoryId::Preferences,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryId::Necessary => "necessary",
            CategoryId::Analytics => "analytics",
            CategoryId::Marketing => "marketing",
            CategoryId::Preferences => "preferences",
        }
    }

    /// Parses a `data-category` tag. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == tag)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieCategory {
    #[serde(skip)]
    pub id: CategoryId,
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
    pub enabled: bool,
}

impl CookieCategory {
    /// Built-in definition for `id`. Only `necessary` is required, and only
    /// it starts enabled.
    pub fn default_for(id: CategoryId) -> Self {
        let (name, description) = match id {
            CategoryId::Necessary => (
                "Notwendige Cookies",
                "Diese Cookies sind für das Funktionieren der Website unbedingt erforderlich und können nicht deaktiviert werden.",
            ),
            CategoryId::Analytics => (
                "Analytische Cookies",
                "Diese Cookies ermöglichen es uns, die Nutzung der Website zu analysieren und das Benutzererlebnis zu verbessern.",
            ),
            CategoryId::Marketing => (
                "Marketing Cookies",
                "Diese Cookies werden verwendet, um Ihnen relevantere Werbung zu zeigen, basierend auf Ihren Interessen und Ihrem Browsing-Verhalten.",
            ),
            CategoryId::Preferences => (
                "Präferenz-Cookies",
                "Diese Cookies speichern Ihre Einstellungen und Präferenzen, um Ihren Besuch angenehmer zu gestalten.",
            ),
        };
        let required = id == CategoryId::Necessary;

        Self {
            id,
            name,
            description,
            required,
            enabled: required,
        }
    }

    /// Sets `enabled` unless the category is required, in which case it
    /// stays on. Returns whether the value changed.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        let next = self.required || enabled;
        let changed = self.enabled != next;
        self.enabled = next;
        changed
    }
}
