//! View state and lifecycle of the character screen.
//!
//! # Design
//! `CharacterScreen` is an explicit state container for what a UI framework
//! would otherwise keep in hooks. The host drives it:
//!
//! 1. `mount` moves `Idle -> Loading` and hands out a `LoadTicket`.
//! 2. The host runs the fetch (any thread, any runtime).
//! 3. `complete_load` applies the result if the ticket is still current.
//!
//! `unmount` bumps a generation counter, so a fetch that settles after the
//! screen went away is dropped instead of writing into dead state.
//!
//! Failures are logged and otherwise rendered exactly like an empty list.
//! `LoadOutcome` is where a host can still tell the two apart.

use rand::Rng;
use tracing::{error, info, warn};

use crate::client::CharacterClient;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::Character;

/// Observable lifecycle phase of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenPhase {
    /// Created, mount effect not run yet.
    #[default]
    Idle,
    /// Fetch in flight.
    Loading,
    /// Fetch settled, successfully or not.
    Ready,
}

/// Proof that a fetch was started by a particular mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }

    /// Rebuild a ticket from a generation handed across the FFI boundary.
    pub fn from_generation(generation: u64) -> Self {
        Self { generation }
    }
}

/// What a settled fetch did to the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { count: usize },
    Empty,
    /// Rendered like `Empty`; the error was only logged.
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct CharacterScreen {
    phase: ScreenPhase,
    generation: u64,
    characters: Vec<Character>,
    /// Index into `characters`, so the featured entry is always a member.
    featured: Option<usize>,
}

impl CharacterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ScreenPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == ScreenPhase::Loading
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn featured(&self) -> Option<&Character> {
        self.featured.and_then(|i| self.characters.get(i))
    }

    pub fn featured_index(&self) -> Option<usize> {
        self.featured
    }

    /// Run the mount effect. Returns `None` unless the screen is `Idle`.
    pub fn mount(&mut self) -> Option<LoadTicket> {
        if self.phase != ScreenPhase::Idle {
            return None;
        }
        self.phase = ScreenPhase::Loading;
        Some(LoadTicket {
            generation: self.generation,
        })
    }

    /// Apply a settled fetch. Returns `None` when the result was discarded
    /// because the ticket is stale or no fetch is in flight.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Character>, ApiError>,
    ) -> Option<LoadOutcome> {
        if ticket.generation != self.generation || self.phase != ScreenPhase::Loading {
            warn!(
                ticket = ticket.generation,
                current = self.generation,
                phase = ?self.phase,
                "discarding stale character load"
            );
            return None;
        }

        self.phase = ScreenPhase::Ready;
        let outcome = match result {
            Ok(characters) if characters.is_empty() => {
                self.characters = characters;
                self.featured = None;
                LoadOutcome::Empty
            }
            Ok(characters) => {
                let count = characters.len();
                self.characters = characters;
                self.featured = Some(0);
                info!(count, "characters loaded");
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                error!(error = %err, "Error fetching characters");
                self.characters.clear();
                self.featured = None;
                LoadOutcome::Failed(err)
            }
        };
        Some(outcome)
    }

    /// Mount, fetch through `transport`, and apply the result in one call.
    /// Returns `None` if the screen was already mounted.
    pub fn load_with<T: Transport + ?Sized>(
        &mut self,
        client: &CharacterClient,
        transport: &T,
    ) -> Option<LoadOutcome> {
        let ticket = self.mount()?;
        let result = client.fetch_characters(transport);
        self.complete_load(ticket, result)
    }

    /// Invalidate any in-flight fetch and drop all view state.
    pub fn unmount(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.phase = ScreenPhase::Idle;
        self.characters.clear();
        self.featured = None;
    }

    /// Feature a uniformly random loaded character. Repeats are allowed,
    /// including the one already featured. No-op on an empty list.
    pub fn randomize_featured<R: Rng>(&mut self, rng: &mut R) -> Option<&Character> {
        if self.characters.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.characters.len());
        self.featured = Some(index);
        self.characters.get(index)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tracing::field::{Field, Visit};
    use tracing::Level;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;
    use crate::http::{HttpRequest, HttpResponse};

    /// Records level and formatted fields of every event.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<(Level, String)>>>);

    impl Captured {
        fn at(&self, level: Level) -> Vec<String> {
            let events = self.0.lock().unwrap();
            events.iter().filter(|(l, _)| *l == level).map(|(_, f)| f.clone()).collect()
        }
    }

    struct Fields(String);

    impl Visit for Fields {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            self.0.push_str(&format!("{}={:?} ", field.name(), value));
        }
    }

    impl<S: tracing::Subscriber> Layer<S> for Captured {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = Fields(String::new());
            event.record(&mut fields);
            self.0.lock().unwrap().push((*event.metadata().level(), fields.0));
        }
    }

    fn complete_capturing(result: Result<Vec<Character>, ApiError>) -> (Option<LoadOutcome>, Captured) {
        let events = Captured::default();
        let subscriber = tracing_subscriber::registry().with(events.clone());
        let outcome = tracing::subscriber::with_default(subscriber, || {
            let mut screen = CharacterScreen::new();
            let ticket = screen.mount().unwrap();
            screen.complete_load(ticket, result)
        });
        (outcome, events)
    }

    fn character(id: u64, name: &str) -> Character {
        Character {
            id,
            name: name.to_string(),
            image_url: None,
            films: Vec::new(),
        }
    }

    fn loaded(characters: Vec<Character>) -> CharacterScreen {
        let mut screen = CharacterScreen::new();
        let ticket = screen.mount().unwrap();
        screen.complete_load(ticket, Ok(characters)).unwrap();
        screen
    }

    #[test]
    fn starts_idle_and_empty() {
        let screen = CharacterScreen::new();
        assert_eq!(screen.phase(), ScreenPhase::Idle);
        assert!(!screen.is_loading());
        assert!(screen.characters().is_empty());
        assert!(screen.featured().is_none());
    }

    #[test]
    fn mount_enters_loading_once() {
        let mut screen = CharacterScreen::new();
        assert!(screen.mount().is_some());
        assert!(screen.is_loading());
        assert!(screen.mount().is_none());
    }

    #[test]
    fn non_empty_load_features_first() {
        let screen = loaded(vec![character(1, "Mickey"), character(2, "Minnie")]);
        assert_eq!(screen.phase(), ScreenPhase::Ready);
        assert_eq!(screen.featured().unwrap().name, "Mickey");
        assert_eq!(screen.characters().len(), 2);
    }

    #[test]
    fn empty_load_has_no_featured() {
        let mut screen = CharacterScreen::new();
        let ticket = screen.mount().unwrap();
        let outcome = screen.complete_load(ticket, Ok(Vec::new()));
        assert_eq!(outcome, Some(LoadOutcome::Empty));
        assert_eq!(screen.phase(), ScreenPhase::Ready);
        assert!(screen.featured().is_none());
    }

    #[test]
    fn failed_load_settles_ready_and_empty() {
        let mut screen = CharacterScreen::new();
        let ticket = screen.mount().unwrap();
        let err = ApiError::Network { status: 500 };
        let outcome = screen.complete_load(ticket, Err(err.clone()));
        assert_eq!(outcome, Some(LoadOutcome::Failed(err)));
        assert_eq!(screen.phase(), ScreenPhase::Ready);
        assert!(!screen.is_loading());
        assert!(screen.characters().is_empty());
        assert!(screen.featured().is_none());
    }

    #[test]
    fn failed_load_logs_one_error() {
        let (outcome, events) = complete_capturing(Err(ApiError::Network { status: 500 }));
        assert!(matches!(outcome, Some(LoadOutcome::Failed(_))));
        let errors = events.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("Error fetching characters"));
        assert!(errors[0].contains("error=HTTP error! status: 500"));
    }

    #[test]
    fn decode_failure_log_carries_cause() {
        let (_, events) = complete_capturing(Err(ApiError::Decode("expected value".to_string())));
        let errors = events.at(Level::ERROR);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("decode failed: expected value"));
    }

    #[test]
    fn empty_and_loaded_results_log_no_error() {
        let (outcome, events) = complete_capturing(Ok(Vec::new()));
        assert_eq!(outcome, Some(LoadOutcome::Empty));
        assert!(events.at(Level::ERROR).is_empty());

        let (outcome, events) = complete_capturing(Ok(vec![character(1, "Mickey")]));
        assert_eq!(outcome, Some(LoadOutcome::Loaded { count: 1 }));
        assert!(events.at(Level::ERROR).is_empty());
        assert_eq!(events.at(Level::INFO).len(), 1);
    }

    #[test]
    fn result_after_unmount_is_discarded() {
        let mut screen = CharacterScreen::new();
        let ticket = screen.mount().unwrap();
        screen.unmount();
        let outcome = screen.complete_load(ticket, Ok(vec![character(1, "Mickey")]));
        assert!(outcome.is_none());
        assert_eq!(screen.phase(), ScreenPhase::Idle);
        assert!(screen.characters().is_empty());
    }

    #[test]
    fn old_ticket_cannot_complete_a_remount() {
        let mut screen = CharacterScreen::new();
        let stale = screen.mount().unwrap();
        screen.unmount();
        let fresh = screen.mount().unwrap();
        assert_ne!(stale, fresh);

        assert!(screen.complete_load(stale, Ok(vec![character(1, "Stale")])).is_none());
        assert!(screen.is_loading());

        let outcome = screen.complete_load(fresh, Ok(vec![character(2, "Fresh")]));
        assert_eq!(outcome, Some(LoadOutcome::Loaded { count: 1 }));
        assert_eq!(screen.featured().unwrap().name, "Fresh");
    }

    #[test]
    fn second_completion_is_discarded() {
        let mut screen = CharacterScreen::new();
        let ticket = screen.mount().unwrap();
        screen.complete_load(ticket, Ok(vec![character(1, "A")])).unwrap();
        assert!(screen.complete_load(ticket, Ok(Vec::new())).is_none());
        assert_eq!(screen.characters().len(), 1);
    }

    #[test]
    fn randomize_on_empty_is_noop() {
        let mut screen = loaded(Vec::new());
        let mut rng = StdRng::seed_from_u64(7);
        assert!(screen.randomize_featured(&mut rng).is_none());
        assert!(screen.featured().is_none());
    }

    #[test]
    fn randomize_before_load_is_noop() {
        let mut screen = CharacterScreen::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(screen.randomize_featured(&mut rng).is_none());
    }

    #[test]
    fn randomize_always_picks_a_member() {
        let characters: Vec<_> = (0..10).map(|i| character(i, &format!("C{i}"))).collect();
        let mut screen = loaded(characters.clone());
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let picked = screen.randomize_featured(&mut rng).unwrap().clone();
            assert!(characters.contains(&picked));
            assert_eq!(screen.featured(), Some(&picked));
            seen.insert(picked.id);
        }
        assert_eq!(seen.len(), 10, "every index should come up in 500 draws");
    }

    #[test]
    fn randomize_single_entry_reselects_it() {
        let mut screen = loaded(vec![character(1, "Only")]);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..5 {
            assert_eq!(screen.randomize_featured(&mut rng).unwrap().name, "Only");
        }
    }

    #[test]
    fn duplicate_ids_load_fine() {
        let screen = loaded(vec![character(1, "A"), character(1, "B")]);
        assert_eq!(screen.characters().len(), 2);
        assert_eq!(screen.featured_index(), Some(0));
    }

    #[test]
    fn load_with_runs_the_whole_lifecycle() {
        let client = CharacterClient::new("http://mock");
        let transport = |req: HttpRequest| -> Result<HttpResponse, ApiError> {
            assert_eq!(req.path, "http://mock/character");
            Ok(HttpResponse::new(200, r#"{"data":[{"_id":1,"name":"Mickey Mouse"}]}"#))
        };
        let mut screen = CharacterScreen::new();
        let outcome = screen.load_with(&client, &transport);
        assert_eq!(outcome, Some(LoadOutcome::Loaded { count: 1 }));
        assert!(screen.load_with(&client, &transport).is_none());
    }
}
