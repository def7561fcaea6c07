//! The tag search widget store
//!
//! `TagSearch` composes the search controller, the selection model, the
//! keyboard navigator, the focus watcher and the validation bridge. Every
//! public operation is a transition: it updates the store and returns the
//! [`Effect`]s the host has to perform (arm a timer, call the loader, move
//! focus, notify the form). Nothing here sleeps or awaits; see
//! [`runtime`](crate::runtime) for a tokio driver.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tagsearch::focus::{GlobalListeners, RecordingListeners};
//! use tagsearch::item::{ItemAdapter, TagItem};
//! use tagsearch::widget::{Effect, TagSearch};
//! use tagsearch::config::WidgetConfig;
//!
//! let listeners: Arc<dyn GlobalListeners> = Arc::new(RecordingListeners::new());
//! let mut widget = TagSearch::new(WidgetConfig::default(), ItemAdapter::<TagItem>::default(), listeners);
//!
//! let effects = widget.on_query_changed("rus");
//! assert!(matches!(effects[0], Effect::StartDebounce { .. }));
//! ```

pub mod effect;
pub mod view;

pub use effect::Effect;
pub use view::{Chip, ResultRow, ViewModel};

use crate::config::{Translations, WidgetConfig};
use crate::focus::{FocusWatcher, GlobalEvent, GlobalListeners};
use crate::item::ItemAdapter;
use crate::keyboard::{KeyAction, KeyContext, KeyInput, KeyboardNavigator};
use crate::search::{LoadError, SearchController, SearchState, Settlement};
use crate::selection::{Rejection, SelectionModel};
use crate::validation::ValidationBridge;
use std::sync::Arc;

/// Multi-select tag search input
#[derive(Debug)]
pub struct TagSearch<T> {
    search: SearchController<T>,
    selection: SelectionModel<T>,
    navigator: KeyboardNavigator,
    watcher: FocusWatcher,
    bridge: ValidationBridge,
    translations: Translations,
    clear_on_add: bool,
    disabled: bool,
    disposed: bool,
}

impl<T: Clone> TagSearch<T> {
    /// Create a widget with an empty selection
    #[must_use]
    pub fn new(
        config: WidgetConfig,
        adapter: ItemAdapter<T>,
        listeners: Arc<dyn GlobalListeners>,
    ) -> Self {
        let WidgetConfig {
            search,
            required,
            disabled,
            translations,
        } = config;

        Self {
            selection: SelectionModel::new(adapter, search.max_items),
            clear_on_add: search.clear_on_add,
            search: SearchController::new(search),
            navigator: KeyboardNavigator::new(),
            watcher: FocusWatcher::new(listeners),
            bridge: ValidationBridge::new(required),
            translations,
            disabled,
            disposed: false,
        }
    }

    // ---- queries -------------------------------------------------------

    /// Current query text
    #[must_use]
    pub fn query(&self) -> &str {
        self.search.query()
    }

    /// Current search state
    #[must_use]
    pub const fn state(&self) -> SearchState {
        self.search.state()
    }

    /// Results of the last accepted search
    #[must_use]
    pub fn results(&self) -> &[T] {
        self.search.results()
    }

    /// Selected items in insertion order
    #[must_use]
    pub fn selected(&self) -> &[T] {
        self.selection.items()
    }

    /// Whether the result panel is open
    #[must_use]
    pub const fn panel_open(&self) -> bool {
        self.watcher.panel_open()
    }

    /// Whether the selection is at its maximum size
    #[must_use]
    pub fn maximum_reached(&self) -> bool {
        self.selection.maximum_reached()
    }

    /// Whether a debounce timer is armed
    #[must_use]
    pub const fn debounce_pending(&self) -> bool {
        self.search.debounce_pending()
    }

    /// Whether the widget ignores user interaction
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether `dispose` has been called
    #[must_use]
    pub const fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Form-side state
    #[must_use]
    pub const fn validation(&self) -> &ValidationBridge {
        &self.bridge
    }

    /// Focus watcher state
    #[must_use]
    pub const fn focus_watcher(&self) -> &FocusWatcher {
        &self.watcher
    }

    /// Key-based membership test
    #[must_use]
    pub fn is_selected(&self, item: &T) -> bool {
        self.selection.is_selected(item)
    }

    /// First result that is not selected yet
    #[must_use]
    pub fn first_selectable_result(&self) -> Option<&T> {
        self.selection.first_selectable(self.search.results())
    }

    /// Width hint for the query input, in characters
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn input_size(&self) -> f64 {
        if self.maximum_reached() {
            self.translations.maximum_reached().chars().count() as f64 * 1.2
        } else if self.query().is_empty() {
            10.0
        } else {
            self.query().chars().count() as f64 * 1.2
        }
    }

    /// Status line for the current state, if the host supplied one
    #[must_use]
    pub fn status_message(&self) -> Option<&str> {
        if self.maximum_reached() {
            return Some(self.translations.maximum_reached());
        }
        self.state()
            .message_key()
            .and_then(|key| self.translations.get(key))
    }

    /// Snapshot for rendering
    #[must_use]
    pub fn view(&self) -> ViewModel {
        let adapter = self.selection.adapter();
        let chips = self
            .selected()
            .iter()
            .map(|item| Chip {
                key: adapter.key_of(item),
                label: adapter.label_of(item),
            })
            .collect();

        let mut next_selectable = 0;
        let rows = self
            .results()
            .iter()
            .map(|item| {
                let selectable_index = (!self.is_selected(item)).then(|| {
                    next_selectable += 1;
                    next_selectable - 1
                });
                ResultRow {
                    key: adapter.key_of(item),
                    label: adapter.label_of(item),
                    selectable_index,
                }
            })
            .collect();

        ViewModel {
            query: self.query().to_string(),
            state: self.state(),
            panel_open: self.panel_open(),
            maximum_reached: self.maximum_reached(),
            disabled: self.disabled,
            chips,
            rows,
            focus: self.navigator.focus(),
            input_size: self.input_size(),
            status: self.status_message().map(str::to_string),
        }
    }

    // ---- search ----------------------------------------------------------

    /// The user edited the query text
    pub fn on_query_changed(&mut self, text: &str) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }

        if self.maximum_reached() {
            let mut effects = vec![Effect::from(self.search.reset())];
            if !text.is_empty() {
                effects.push(Effect::SetQuery(String::new()));
            }
            return effects;
        }

        self.watcher.close_panel();
        vec![self.search.query_changed(text).into()]
    }

    /// The debounce timer armed for `generation` expired
    pub fn on_debounce_elapsed(&mut self, generation: u64) -> Vec<Effect<T>> {
        if self.disposed {
            return Vec::new();
        }
        self.search
            .debounce_elapsed(generation)
            .map(|query| Effect::Load { query, generation })
            .into_iter()
            .collect()
    }

    /// The loader call dispatched under `generation` settled
    pub fn on_load_settled(&mut self, generation: u64, outcome: Result<Vec<T>, LoadError>) {
        if self.disposed {
            return;
        }
        if self.search.load_settled(generation, outcome) == Settlement::Results {
            self.open_panel();
        }
    }

    // ---- selection -------------------------------------------------------

    /// Add `item` to the selection
    ///
    /// # Errors
    ///
    /// Returns a `Rejection` when the widget is disabled, the item is
    /// already selected, or the maximum has been reached.
    pub fn select(&mut self, item: T) -> Result<Vec<Effect<T>>, Rejection> {
        if self.disposed || self.disabled {
            return Err(Rejection::Disabled);
        }
        self.selection.select(item)?;

        self.watcher.close_panel();
        let mut effects = Vec::new();
        if self.clear_on_add {
            effects.extend(self.clear_query());
        }
        effects.extend(self.activate_input());
        effects.extend(self.selection_changed());
        Ok(effects)
    }

    /// Remove the selected item matching `item`'s key
    pub fn remove(&mut self, item: &T) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }
        match self.selection.remove(item) {
            Some(_) => self.selection_changed(),
            None => Vec::new(),
        }
    }

    /// Remove the most recently selected item
    pub fn pop_last(&mut self) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }
        match self.selection.pop_last() {
            Some(_) => self.selection_changed(),
            None => Vec::new(),
        }
    }

    /// Empty the selection and the query
    pub fn clear(&mut self) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }
        let changed = self.selection.clear();
        let mut effects = self.clear_query();
        effects.extend(self.activate_input());
        if changed {
            effects.extend(self.selection_changed());
        }
        effects
    }

    /// The host form pushed a new bound value
    ///
    /// Duplicates are dropped. When the de-duplicated keys differ from the
    /// current selection the value and validity are reported back; an
    /// identical value reports nothing.
    pub fn set_external_value(&mut self, items: Vec<T>) -> Vec<Effect<T>> {
        if self.disposed || !self.selection.replace(items) {
            return Vec::new();
        }
        self.selection_changed()
    }

    /// Initialize the selection from the host's bound value
    ///
    /// Always reports the initial value and validity.
    pub fn mount(&mut self, initial: Vec<T>) -> Vec<Effect<T>> {
        if self.disposed {
            return Vec::new();
        }
        self.selection.replace(initial);
        self.selection_changed()
    }

    // ---- keyboard, focus, touched ---------------------------------------

    /// A recognized key was pressed on the input or a result row
    pub fn handle_key(&mut self, input: KeyInput) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }
        let selectable = self.selection.selectable_indices(self.search.results());
        let ctx = KeyContext {
            panel_open: self.panel_open(),
            selectable_rows: selectable.len(),
        };

        let mut effects = Vec::new();
        for action in self.navigator.handle(input, ctx) {
            match action {
                KeyAction::OpenPanel => self.open_panel(),
                KeyAction::ClosePanel => self.close_panel(),
                KeyAction::FocusInput => effects.extend(self.activate_input()),
                KeyAction::FocusRow(row) => effects.push(Effect::FocusRow(row)),
                KeyAction::PopLast => effects.extend(self.pop_last()),
                KeyAction::SelectFirst => {
                    if let Some(item) = self.first_selectable_result().cloned() {
                        effects.extend(self.select(item).unwrap_or_default());
                    }
                }
                KeyAction::SelectRow(row) => {
                    let item = selectable
                        .get(row)
                        .and_then(|&index| self.search.results().get(index))
                        .cloned();
                    if let Some(item) = item {
                        effects.extend(self.select(item).unwrap_or_default());
                    }
                }
                KeyAction::PreventDefault => effects.push(Effect::PreventDefault),
            }
        }
        effects
    }

    /// A window-level click or focus event was delivered
    pub fn on_global_event(&mut self, event: GlobalEvent) -> Vec<Effect<T>> {
        if !self.watcher.on_global_event(event) {
            return Vec::new();
        }
        match self.bridge.finalize_touched() {
            Some(signal) => {
                self.watcher.disarm_touch_watch();
                vec![signal.into()]
            }
            None => Vec::new(),
        }
    }

    /// Focus the query input
    ///
    /// While the control is untouched this also starts watching for the
    /// first outside interaction.
    pub fn activate_input(&mut self) -> Vec<Effect<T>> {
        if self.disposed || self.disabled {
            return Vec::new();
        }
        if !self.bridge.is_touched() {
            self.watcher.arm_touch_watch();
        }
        self.navigator.focus_input();
        vec![Effect::FocusInput]
    }

    /// Ask for the touched signal on the next outside interaction
    pub const fn request_touched(&mut self) {
        self.bridge.request_touched();
    }

    /// The host reset the control to untouched
    pub fn mark_untouched(&mut self) {
        self.bridge.mark_untouched();
    }

    /// Open the result panel
    ///
    /// Has no effect once the maximum has been reached.
    pub fn open_panel(&mut self) {
        if self.disposed || self.maximum_reached() {
            return;
        }
        self.watcher.open_panel();
    }

    /// Close the result panel
    pub fn close_panel(&mut self) {
        self.watcher.close_panel();
    }

    /// Tear the widget down
    ///
    /// Releases every global listener and invalidates any armed timer or
    /// in-flight search. Later calls are ignored.
    pub fn dispose(&mut self) -> Vec<Effect<T>> {
        if self.disposed {
            return Vec::new();
        }
        self.disposed = true;
        self.watcher.release_all();
        vec![self.search.reset().into()]
    }

    // ---- internals -------------------------------------------------------

    /// Clear the query text and results
    fn clear_query(&mut self) -> Vec<Effect<T>> {
        let had_text = !self.search.query().is_empty();
        let mut effects = vec![Effect::from(self.search.reset())];
        if had_text {
            effects.push(Effect::SetQuery(String::new()));
        }
        self.watcher.close_panel();
        effects
    }

    /// Report a widget-side selection change and apply the maximum
    fn selection_changed(&mut self) -> Vec<Effect<T>> {
        let mut effects: Vec<Effect<T>> = self
            .bridge
            .selection_changed(self.selection.items())
            .into_iter()
            .map(Effect::from)
            .collect();
        effects.extend(self.enforce_maximum());
        effects
    }

    fn enforce_maximum(&mut self) -> Vec<Effect<T>> {
        if self.maximum_reached() {
            self.clear_query()
        } else {
            Vec::new()
        }
    }
}
