//! Tokio driver for a [`TagSearch`] widget
//!
//! The widget store is synchronous; [`Session`] gives it a clock and a
//! backend. It owns the single debounce timer, keeps every dispatched
//! loader call in a `FuturesUnordered` until it settles, and forwards the
//! remaining effects and a fresh [`ViewModel`] to a [`WidgetHost`].
//!
//! Host events arrive on an unbounded channel. The loop ends on
//! [`WidgetEvent::Dispose`] or when every sender is dropped; either way the
//! widget is disposed and its global listeners released.

pub mod mock;

pub use mock::RecordingHost;

use crate::focus::GlobalEvent;
use crate::keyboard::KeyInput;
use crate::search::{LoadError, SearchLoader};
use crate::widget::{Effect, TagSearch, ViewModel};
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Sleep;

/// Input delivered by the host
#[derive(Debug, Clone)]
pub enum WidgetEvent<T> {
    /// The query text was edited
    QueryChanged(String),
    /// A recognized key was pressed
    Key(KeyInput),
    /// A result row was clicked
    Select(T),
    /// A chip's remove button was clicked
    Remove(T),
    PopLast,
    Clear,
    /// The host form pushed a new bound value
    ExternalValue(Vec<T>),
    /// A window-level click or focus event
    Global(GlobalEvent),
    ActivateInput,
    RequestTouched,
    MarkUntouched,
    OpenPanel,
    ClosePanel,
    Dispose,
}

/// Receives the effects the runtime does not handle itself
pub trait WidgetHost<T>: Send {
    /// Perform a host-facing effect (focus, query text, form signals)
    fn apply(&mut self, effect: Effect<T>);

    /// Redraw after the widget changed
    fn render(&mut self, _view: &ViewModel) {}
}

type PendingLoad<T> = BoxFuture<'static, (u64, Result<Vec<T>, LoadError>)>;

/// A running widget
pub struct Session<T, H> {
    widget: TagSearch<T>,
    loader: Arc<dyn SearchLoader<T>>,
    host: H,
    debounce: Option<(u64, Pin<Box<Sleep>>)>,
    loads: FuturesUnordered<PendingLoad<T>>,
}

impl<T, H> Session<T, H>
where
    T: Clone + Send + 'static,
    H: WidgetHost<T>,
{
    /// Drive `widget` with `loader` as backend and `host` as sink
    pub fn new(widget: TagSearch<T>, loader: Arc<dyn SearchLoader<T>>, host: H) -> Self {
        Self {
            widget,
            loader,
            host,
            debounce: None,
            loads: FuturesUnordered::new(),
        }
    }

    /// The driven widget
    #[must_use]
    pub const fn widget(&self) -> &TagSearch<T> {
        &self.widget
    }

    /// The host sink
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Consume the session, returning the host sink
    pub fn into_host(self) -> H {
        self.host
    }

    /// Number of loader calls that have not settled yet
    #[must_use]
    pub fn loads_in_flight(&self) -> usize {
        self.loads.len()
    }

    /// Process events until disposal
    ///
    /// Host events take priority over timers and loader responses.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<WidgetEvent<T>>) -> Self {
        loop {
            tokio::select! {
                biased;

                event = events.recv() => match event {
                    Some(WidgetEvent::Dispose) | None => break,
                    Some(event) => self.dispatch(event),
                },

                generation = debounce_expiry(&mut self.debounce) => {
                    self.debounce = None;
                    let effects = self.widget.on_debounce_elapsed(generation);
                    self.apply(effects);
                    self.render();
                }

                Some((generation, outcome)) = self.loads.next(), if !self.loads.is_empty() => {
                    self.widget.on_load_settled(generation, outcome);
                    self.render();
                }
            }
        }

        tracing::debug!(in_flight = self.loads.len(), "disposing tag search session");
        let effects = self.widget.dispose();
        self.apply(effects);
        self
    }

    /// Apply one host event to the widget
    pub fn dispatch(&mut self, event: WidgetEvent<T>) {
        let effects = match event {
            WidgetEvent::QueryChanged(text) => self.widget.on_query_changed(&text),
            WidgetEvent::Key(input) => self.widget.handle_key(input),
            WidgetEvent::Select(item) => self.widget.select(item).unwrap_or_else(|rejection| {
                tracing::debug!(?rejection, "selection rejected");
                Vec::new()
            }),
            WidgetEvent::Remove(item) => self.widget.remove(&item),
            WidgetEvent::PopLast => self.widget.pop_last(),
            WidgetEvent::Clear => self.widget.clear(),
            WidgetEvent::ExternalValue(items) => self.widget.set_external_value(items),
            WidgetEvent::Global(event) => self.widget.on_global_event(event),
            WidgetEvent::ActivateInput => self.widget.activate_input(),
            WidgetEvent::RequestTouched => {
                self.widget.request_touched();
                Vec::new()
            }
            WidgetEvent::MarkUntouched => {
                self.widget.mark_untouched();
                Vec::new()
            }
            WidgetEvent::OpenPanel => {
                self.widget.open_panel();
                Vec::new()
            }
            WidgetEvent::ClosePanel => {
                self.widget.close_panel();
                Vec::new()
            }
            WidgetEvent::Dispose => self.widget.dispose(),
        };
        self.apply(effects);
        self.render();
    }

    fn apply(&mut self, effects: Vec<Effect<T>>) {
        for effect in effects {
            match effect {
                Effect::StartDebounce {
                    delay, generation, ..
                } => {
                    self.debounce = Some((generation, Box::pin(tokio::time::sleep(delay))));
                }
                Effect::CancelDebounce => self.debounce = None,
                Effect::Load { query, generation } => {
                    tracing::debug!(%query, generation, "dispatching search");
                    let loader = Arc::clone(&self.loader);
                    self.loads.push(Box::pin(async move {
                        let outcome = loader.load(&query).await;
                        (generation, outcome)
                    }));
                }
                other => self.host.apply(other),
            }
        }
    }

    fn render(&mut self) {
        if !self.widget.is_disposed() {
            let view = self.widget.view();
            self.host.render(&view);
        }
    }
}

/// Resolves with the armed generation once the debounce sleep expires
async fn debounce_expiry(debounce: &mut Option<(u64, Pin<Box<Sleep>>)>) -> u64 {
    match debounce {
        Some((generation, sleep)) => {
            sleep.as_mut().await;
            *generation
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WidgetConfig;
    use crate::focus::{GlobalListeners, RecordingListeners};
    use crate::item::{ItemAdapter, TagItem};
    use crate::search::{FnLoader, SearchState};
    use std::sync::Mutex;
    use std::time::Duration;

    type Calls = Arc<Mutex<Vec<String>>>;

    fn session(
        loader: Arc<dyn SearchLoader<TagItem>>,
    ) -> (Arc<RecordingListeners>, Session<TagItem, RecordingHost<TagItem>>) {
        let listeners = Arc::new(RecordingListeners::new());
        let registry: Arc<dyn GlobalListeners> = listeners.clone();
        let widget = TagSearch::new(WidgetConfig::default(), ItemAdapter::default(), registry);
        (listeners, Session::new(widget, loader, RecordingHost::new()))
    }

    /// Loader that echoes the query back as a single tag, sleeping first
    /// for queries starting with "slow"
    fn echo_loader(calls: Calls) -> Arc<dyn SearchLoader<TagItem>> {
        Arc::new(FnLoader::new(move |query: String| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(query.clone());
                if query.starts_with("slow") {
                    tokio::time::sleep(Duration::from_millis(1000)).await;
                }
                Ok::<_, LoadError>(vec![TagItem::new(query.as_str(), query.as_str())])
            }
        }))
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_make_one_call() {
        let calls = Calls::default();
        let (listeners, session) = session(echo_loader(Arc::clone(&calls)));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(rx));

        for text in ["r", "ru", "rus", "rust"] {
            tx.send(WidgetEvent::QueryChanged(text.to_string())).unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        tx.send(WidgetEvent::Dispose).unwrap();
        let session = task.await.unwrap();

        assert_eq!(*calls.lock().unwrap(), vec!["rust".to_string()]);
        let view = session.host().last_view().unwrap();
        assert_eq!(view.state, SearchState::HasResults);
        assert_eq!(view.rows.len(), 1);
        assert!(view.panel_open);
        assert_eq!(listeners.active_total(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_is_discarded() {
        let calls = Calls::default();
        let (_, session) = session(echo_loader(Arc::clone(&calls)));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(rx));

        tx.send(WidgetEvent::QueryChanged("slow".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(450)).await;
        tx.send(WidgetEvent::QueryChanged("fast".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(2000)).await;
        tx.send(WidgetEvent::Dispose).unwrap();
        let session = task.await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec!["slow".to_string(), "fast".to_string()]
        );
        let view = session.host().last_view().unwrap();
        assert_eq!(view.query, "fast");
        assert_eq!(view.rows[0].label, "fast");
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_query_never_loads() {
        let calls = Calls::default();
        let (_, session) = session(echo_loader(Arc::clone(&calls)));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(session.run(rx));

        tx.send(WidgetEvent::QueryChanged("ab".into())).unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;
        drop(tx);
        let session = task.await.unwrap();

        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(
            session.host().last_view().unwrap().state,
            SearchState::TooShort
        );
        assert!(session.widget().is_disposed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_host_effects_are_forwarded() {
        let calls = Calls::default();
        let (_, session) = session(echo_loader(calls));
        let (tx, rx) = mpsc::unbounded_channel();

        tx.send(WidgetEvent::Select(TagItem::new("a", "A"))).unwrap();
        tx.send(WidgetEvent::Select(TagItem::new("a", "A"))).unwrap();
        tx.send(WidgetEvent::Dispose).unwrap();
        let host = session.run(rx).await.into_host();

        let values: Vec<_> = host
            .effects
            .iter()
            .filter(|effect| matches!(effect, Effect::Form(_)))
            .collect();
        assert_eq!(values.len(), 1);
        assert!(host.effects.contains(&Effect::FocusInput));
        assert!(
            !host
                .effects
                .iter()
                .any(|effect| matches!(effect, Effect::StartDebounce { .. }))
        );
    }
}
