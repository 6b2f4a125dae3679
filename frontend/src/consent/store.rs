use super::category::CategoryId;
use super::hook::{CookieHook, LogHook};
use super::snapshot::Snapshot;
use super::state::ConsentState;
use crate::config::{ConsentConfig, CONSENT_TRUE};
use crate::error::ConsentError;
use crate::storage::KeyValueStore;
use log::{debug, error, info, warn};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Initialized { banner_visible: bool },
    ConsentRecorded,
    TornDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// What a toggle control should display for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub id: CategoryId,
    pub checked: bool,
    pub disabled: bool,
}

type Listener = Rc<dyn Fn(&ConsentState)>;

/// Owns the page's cookie consent and keeps it in sync with storage.
///
/// One instance per page load. Every decision (accept all, reject all,
/// save from the toggles) persists the state and then notifies all
/// subscribers with the state as it was written.
pub struct ConsentStore<S: KeyValueStore> {
    storage: S,
    config: ConsentConfig,
    state: ConsentState,
    phase: Phase,
    hook: Box<dyn CookieHook>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    last_error: Option<ConsentError>,
    needs_retry: bool,
}

impl<S: KeyValueStore> ConsentStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, ConsentConfig::default())
    }

    pub fn with_config(storage: S, config: ConsentConfig) -> Self {
        Self {
            storage,
            config,
            state: ConsentState::new(),
            phase: Phase::Uninitialized,
            hook: Box::new(LogHook),
            listeners: Vec::new(),
            next_listener: 0,
            last_error: None,
            needs_retry: false,
        }
    }

    pub fn with_hook<H: CookieHook + 'static>(mut self, hook: H) -> Self {
        self.hook = Box::new(hook);
        self
    }

    /// Decides whether the banner is needed. Calling it again after the
    /// first time changes nothing.
    pub fn init(&mut self) -> Phase {
        if self.phase == Phase::Uninitialized {
            let banner_visible = !self.has_consent();
            if banner_visible {
                info!("No cookie consent recorded yet, banner will be shown");
            } else {
                debug!("Cookie consent already recorded");
            }
            self.phase = Phase::Initialized { banner_visible };
        }
        self.phase
    }

    pub fn has_consent(&self) -> bool {
        self.storage.get(&self.config.consent_key).as_deref() == Some(CONSENT_TRUE)
    }

    pub fn should_show_banner(&self) -> bool {
        match self.phase {
            Phase::Uninitialized => !self.has_consent(),
            Phase::Initialized { banner_visible } => banner_visible,
            Phase::ConsentRecorded | Phase::TornDown => false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &ConsentState {
        &self.state
    }

    pub fn config(&self) -> &ConsentConfig {
        &self.config
    }

    pub fn last_error(&self) -> Option<&ConsentError> {
        self.last_error.as_ref()
    }

    /// True while the latest state hasn't made it into storage.
    pub fn needs_retry(&self) -> bool {
        self.needs_retry
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: Fn(&ConsentState) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn accept_all(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.state.accept_all();
        self.record_decision();
    }

    pub fn reject_all(&mut self) {
        if self.is_torn_down() {
            return;
        }
        self.state.reject_all();
        self.record_decision();
    }

    /// Reads `(category, checked)` from the toggles and saves. Required
    /// categories ignore their control.
    pub fn save_from_controls<I>(&mut self, controls: I)
    where
        I: IntoIterator<Item = (CategoryId, bool)>,
    {
        if self.is_torn_down() {
            return;
        }
        self.state.apply_controls(controls);
        self.record_decision();
    }

    /// Like `save_from_controls`, for controls tagged with a raw
    /// `data-category` string. Unknown tags are skipped.
    pub fn save_from_tagged_controls<'a, I>(&mut self, controls: I)
    where
        I: IntoIterator<Item = (&'a str, bool)>,
    {
        let parsed: Vec<(CategoryId, bool)> = controls
            .into_iter()
            .filter_map(|(tag, checked)| CategoryId::parse(tag).map(|id| (id, checked)))
            .collect();
        self.save_from_controls(parsed);
    }

    /// Live update from a single toggle's `change` event. Nothing is
    /// written until the user saves.
    pub fn set_category_from_control(&mut self, id: CategoryId, checked: bool) -> bool {
        if self.is_torn_down() {
            return false;
        }
        self.state.set_enabled(id, checked)
    }

    /// Overlays the stored snapshot onto the in-memory state. Returns
    /// `Ok(false)` when there's nothing stored. A consent flag without a
    /// snapshot means the defaults were chosen, so unsaved toggles are
    /// dropped.
    pub fn load_saved_preferences(&mut self) -> Result<bool, ConsentError> {
        let Some(text) = self.storage.get(&self.config.preferences_key) else {
            if self.has_consent() {
                self.state = ConsentState::new();
            }
            return Ok(false);
        };
        let snapshot = Snapshot::parse(&text)?;
        self.state.merge(&snapshot);
        Ok(!snapshot.is_empty())
    }

    /// Run when the settings modal opens: refresh from storage, then
    /// report what every toggle should show.
    pub fn reconcile(&mut self) -> Vec<ControlState> {
        if self.is_torn_down() {
            return self.control_states();
        }

        if self.needs_retry {
            // Storage holds an older decision than memory, don't load it back
            info!("Retrying write of cookie preferences");
            if let Err(e) = self.write_snapshot() {
                warn!("Cookie preferences still not saved: {}", e);
                self.last_error = Some(e);
                return self.control_states();
            }
            self.needs_retry = false;
            self.last_error = None;
        }

        match self.load_saved_preferences() {
            Ok(_) => self.last_error = None,
            Err(e) => {
                if e.is_malformed_snapshot() {
                    error!("Error loading cookie preferences: {}", e);
                } else {
                    warn!("Could not load cookie preferences: {}", e);
                }
                self.last_error = Some(e);
            }
        }
        self.control_states()
    }

    pub fn control_states(&self) -> Vec<ControlState> {
        self.state
            .iter()
            .map(|c| ControlState {
                id: c.id,
                checked: c.enabled || c.required,
                disabled: c.required,
            })
            .collect()
    }

    /// Drops every subscriber. Later operations do nothing.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        self.phase = Phase::TornDown;
    }

    fn is_torn_down(&self) -> bool {
        self.phase == Phase::TornDown
    }

    fn record_decision(&mut self) {
        self.persist();
        self.phase = Phase::ConsentRecorded;
    }

    fn persist(&mut self) {
        match self.write_snapshot() {
            Ok(()) => {
                self.needs_retry = false;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Could not save cookie preferences, keeping them for this session: {}", e);
                self.needs_retry = true;
                self.last_error = Some(e);
            }
        }

        self.hook.apply(&self.state);
        self.notify();
    }

    // Snapshot goes first so the flag never points at a missing or stale one.
    fn write_snapshot(&self) -> Result<(), ConsentError> {
        let json = self.state.snapshot().to_json();
        self.storage
            .set(&self.config.preferences_key, &json)
            .map_err(|source| ConsentError::Storage {
                key: self.config.preferences_key.clone(),
                source,
            })?;
        self.storage
            .set(&self.config.consent_key, CONSENT_TRUE)
            .map_err(|source| ConsentError::Storage {
                key: self.config.consent_key.clone(),
                source,
            })
    }

    fn notify(&self) {
        let listeners: Vec<Listener> = self.listeners.iter().map(|(_, l)| l.clone()).collect();
        for listener in listeners {
            listener(&self.state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CONSENT_KEY, PREFERENCES_KEY};
    use crate::error::StorageError;
    use crate::storage::memory::MemoryStore;
    use std::cell::RefCell;

    const OPTIONAL: [CategoryId; 3] = [
        CategoryId::Analytics,
        CategoryId::Marketing,
        CategoryId::Preferences,
    ];

    fn recorder(store: &mut ConsentStore<MemoryStore>) -> Rc<RefCell<Vec<ConsentState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state| sink.borrow_mut().push(state.clone()));
        seen
    }

    #[test]
    fn banner_shows_without_consent_flag() {
        let mut store = ConsentStore::new(MemoryStore::new());
        assert_eq!(store.init(), Phase::Initialized { banner_visible: true });
        assert!(store.should_show_banner());
    }

    #[test]
    fn banner_hidden_when_flag_is_true() {
        let mut store = ConsentStore::new(MemoryStore::with_entries(&[(CONSENT_KEY, "true")]));
        assert_eq!(store.init(), Phase::Initialized { banner_visible: false });
        assert!(!store.should_show_banner());
    }

    #[test]
    fn any_other_flag_value_counts_as_no_consent() {
        for value in ["false", "TRUE", "1", ""] {
            let mut store = ConsentStore::new(MemoryStore::with_entries(&[(CONSENT_KEY, value)]));
            store.init();
            assert!(store.should_show_banner(), "flag {:?}", value);
        }
    }

    #[test]
    fn init_is_idempotent() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        storage.set(CONSENT_KEY, "true").unwrap();
        assert_eq!(store.init(), Phase::Initialized { banner_visible: true });
    }

    #[test]
    fn flag_without_snapshot_leaves_defaults() {
        let mut store = ConsentStore::new(MemoryStore::with_entries(&[(CONSENT_KEY, "true")]));
        store.init();
        let controls = store.reconcile();
        assert_eq!(store.state(), &ConsentState::new());
        assert!(controls.iter().all(|c| c.checked == (c.id == CategoryId::Necessary)));
    }

    #[test]
    fn accept_all_enables_everything_and_persists() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        store.accept_all();

        assert!(store.state().iter().all(|c| c.enabled));
        assert_eq!(store.phase(), Phase::ConsentRecorded);
        assert!(!store.should_show_banner());
        assert_eq!(storage.raw(CONSENT_KEY).as_deref(), Some("true"));
        let saved = Snapshot::parse(&storage.raw(PREFERENCES_KEY).unwrap()).unwrap();
        assert!(saved.enabled_values().all(|(_, enabled)| enabled));
    }

    #[test]
    fn reject_all_only_keeps_necessary() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        store.accept_all();
        store.reject_all();

        assert!(store.state().is_enabled(CategoryId::Necessary));
        for id in OPTIONAL {
            assert!(!store.state().is_enabled(id));
        }
    }

    #[test]
    fn necessary_stays_on_for_every_sequence_of_decisions() {
        fn apply(store: &mut ConsentStore<MemoryStore>, op: usize, round: usize) {
            match op {
                0 => store.accept_all(),
                1 => store.reject_all(),
                _ => store.save_from_controls([
                    (CategoryId::Necessary, false),
                    (CategoryId::Analytics, round % 2 == 0),
                    (CategoryId::Marketing, round % 3 == 0),
                ]),
            }
        }

        for seq in 0..81 {
            let mut store = ConsentStore::new(MemoryStore::new());
            store.init();
            let mut code = seq;
            for round in 0..4 {
                apply(&mut store, code % 3, round);
                code /= 3;
                assert!(store.state().is_enabled(CategoryId::Necessary), "sequence {}", seq);
            }
        }
    }

    #[test]
    fn save_from_controls_follows_toggles() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        store.save_from_controls([
            (CategoryId::Necessary, false),
            (CategoryId::Analytics, true),
            (CategoryId::Marketing, false),
        ]);

        let state = store.state();
        assert!(state.is_enabled(CategoryId::Analytics));
        assert!(!state.is_enabled(CategoryId::Marketing));
        assert!(state.is_enabled(CategoryId::Necessary));
        assert!(!state.is_enabled(CategoryId::Preferences));
    }

    #[test]
    fn tagged_controls_skip_unknown_tags() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        store.save_from_tagged_controls([("analytics", true), ("social", true), ("preferences", true)]);
        assert!(store.state().is_enabled(CategoryId::Analytics));
        assert!(store.state().is_enabled(CategoryId::Preferences));
        assert!(!store.state().is_enabled(CategoryId::Marketing));
    }

    #[test]
    fn live_toggle_changes_memory_but_not_storage() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();

        assert!(store.set_category_from_control(CategoryId::Marketing, true));
        assert!(!store.set_category_from_control(CategoryId::Necessary, false));
        assert!(store.state().is_enabled(CategoryId::Marketing));
        assert!(store.state().is_enabled(CategoryId::Necessary));
        assert_eq!(storage.raw(PREFERENCES_KEY), None);
    }

    #[test]
    fn reload_reproduces_persisted_state() {
        let storage = MemoryStore::new();
        let mut first = ConsentStore::new(storage.clone());
        first.init();
        first.save_from_controls([
            (CategoryId::Analytics, false),
            (CategoryId::Marketing, true),
            (CategoryId::Preferences, true),
        ]);
        let persisted = first.state().clone();

        let mut reloaded = ConsentStore::new(storage);
        reloaded.init();
        assert!(!reloaded.should_show_banner());
        reloaded.reconcile();
        assert_eq!(reloaded.state(), &persisted);
    }

    #[test]
    fn malformed_snapshot_keeps_defaults() {
        let storage = MemoryStore::with_entries(&[(CONSENT_KEY, "true"), (PREFERENCES_KEY, "{not json")]);
        let mut store = ConsentStore::new(storage);
        store.init();
        let controls = store.reconcile();

        assert_eq!(store.state(), &ConsentState::new());
        assert!(store.last_error().map(|e| e.is_malformed_snapshot()).unwrap_or(false));
        assert_eq!(controls.len(), 4);
    }

    #[test]
    fn repaired_snapshot_clears_the_load_error() {
        let storage = MemoryStore::with_entries(&[(CONSENT_KEY, "true"), (PREFERENCES_KEY, "{not json")]);
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        store.reconcile();
        assert!(store.last_error().is_some());

        storage
            .set(PREFERENCES_KEY, r#"{"analytics": {"required": false, "enabled": true}}"#)
            .unwrap();
        store.reconcile();

        assert!(store.last_error().is_none());
        assert!(store.state().is_enabled(CategoryId::Analytics));
    }

    #[test]
    fn flag_without_snapshot_drops_unsaved_toggles() {
        let mut store = ConsentStore::new(MemoryStore::with_entries(&[(CONSENT_KEY, "true")]));
        store.init();
        store.reconcile();

        assert!(store.set_category_from_control(CategoryId::Analytics, true));
        assert!(store.state().is_enabled(CategoryId::Analytics));

        let controls = store.reconcile();
        assert_eq!(store.state(), &ConsentState::new());
        let analytics = controls.iter().find(|c| c.id == CategoryId::Analytics).unwrap();
        assert!(!analytics.checked);
    }

    #[test]
    fn wrongly_typed_snapshot_is_not_partially_merged() {
        let storage = MemoryStore::with_entries(&[
            (CONSENT_KEY, "true"),
            (PREFERENCES_KEY, r#"{"analytics": {"enabled": true}, "marketing": {"enabled": "yes"}}"#),
        ]);
        let mut store = ConsentStore::new(storage);
        store.init();
        store.reconcile();
        assert!(!store.state().is_enabled(CategoryId::Analytics));
    }

    #[test]
    fn snapshot_cannot_switch_off_necessary() {
        let storage = MemoryStore::with_entries(&[
            (CONSENT_KEY, "true"),
            (PREFERENCES_KEY, r#"{"necessary": {"required": false, "enabled": false}}"#),
        ]);
        let mut store = ConsentStore::new(storage);
        store.init();
        let controls = store.reconcile();

        assert!(store.state().is_enabled(CategoryId::Necessary));
        let necessary = controls.iter().find(|c| c.id == CategoryId::Necessary).unwrap();
        assert!(necessary.checked && necessary.disabled);
    }

    #[test]
    fn reconcile_disables_only_required_toggles() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        store.accept_all();
        for control in store.reconcile() {
            assert!(control.checked);
            assert_eq!(control.disabled, control.id == CategoryId::Necessary);
        }
    }

    #[test]
    fn notification_carries_the_saved_state() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        let seen = recorder(&mut store);

        store.accept_all();
        store.reject_all();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].iter().all(|c| c.enabled));
        assert_eq!(&seen[1], store.state());
    }

    #[test]
    fn unsubscribed_listener_is_not_called() {
        let mut store = ConsentStore::new(MemoryStore::new());
        store.init();
        let count = Rc::new(RefCell::new(0));
        let counter = count.clone();
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);
        let other = recorder(&mut store);

        store.accept_all();
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.reject_all();

        assert_eq!(*count.borrow(), 1);
        assert_eq!(other.borrow().len(), 2);
    }

    #[test]
    fn hook_runs_on_every_save() {
        struct Counting(Rc<RefCell<Vec<bool>>>);
        impl CookieHook for Counting {
            fn apply(&self, state: &ConsentState) {
                self.0.borrow_mut().push(state.is_enabled(CategoryId::Analytics));
            }
        }

        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut store = ConsentStore::new(MemoryStore::new()).with_hook(Counting(calls.clone()));
        store.init();
        store.accept_all();
        store.save_from_controls([(CategoryId::Analytics, false)]);

        assert_eq!(*calls.borrow(), vec![true, false]);
    }

    #[test]
    fn failed_write_still_updates_session_and_notifies() {
        let storage = MemoryStore::new();
        storage.fail_writes(Some(StorageError::QuotaExceeded("full".into())));
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        let seen = recorder(&mut store);

        store.accept_all();

        assert!(store.state().iter().all(|c| c.enabled));
        assert_eq!(seen.borrow().len(), 1);
        assert!(store.needs_retry());
        assert!(matches!(store.last_error(), Some(ConsentError::Storage { .. })));
        assert_eq!(storage.raw(CONSENT_KEY), None);
        assert_eq!(storage.raw(PREFERENCES_KEY), None);
        assert!(!store.should_show_banner());
    }

    #[test]
    fn reconcile_retries_instead_of_loading_stale_data() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        store.reject_all();

        storage.fail_writes(Some(StorageError::Unavailable));
        store.accept_all();
        assert!(store.needs_retry());

        // Still failing: memory wins over the older snapshot
        store.reconcile();
        assert!(store.state().iter().all(|c| c.enabled));

        storage.fail_writes(None);
        store.reconcile();
        assert!(!store.needs_retry());
        assert!(store.last_error().is_none());
        let saved = Snapshot::parse(&storage.raw(PREFERENCES_KEY).unwrap()).unwrap();
        assert!(saved.enabled_values().all(|(_, enabled)| enabled));
    }

    #[test]
    fn next_save_clears_pending_retry() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        storage.fail_writes(Some(StorageError::Unavailable));
        store.accept_all();
        storage.fail_writes(None);
        store.reject_all();

        assert!(!store.needs_retry());
        assert_eq!(storage.raw(CONSENT_KEY).as_deref(), Some("true"));
    }

    #[test]
    fn custom_keys_are_respected() {
        let storage = MemoryStore::new();
        let config = ConsentConfig {
            consent_key: "consentA".into(),
            preferences_key: "prefsA".into(),
            ..ConsentConfig::default()
        };
        let mut store = ConsentStore::with_config(storage.clone(), config);
        store.init();
        store.accept_all();

        assert_eq!(storage.raw("consentA").as_deref(), Some("true"));
        assert!(storage.raw("prefsA").is_some());
        assert_eq!(storage.raw(CONSENT_KEY), None);
    }

    #[test]
    fn torn_down_store_ignores_operations() {
        let storage = MemoryStore::new();
        let mut store = ConsentStore::new(storage.clone());
        store.init();
        let seen = recorder(&mut store);
        store.teardown();

        store.accept_all();
        store.save_from_controls([(CategoryId::Marketing, true)]);

        assert_eq!(store.phase(), Phase::TornDown);
        assert!(seen.borrow().is_empty());
        assert_eq!(storage.raw(CONSENT_KEY), None);
        assert!(!store.state().is_enabled(CategoryId::Marketing));
    }
}
