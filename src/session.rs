//! The page controller: owns the normalized records and the load state, and
//! exposes the two user actions, `search` and `reset`.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::catalog::{DestinationRecord, normalize};
use crate::dataset::{LoadError, RawDataset, Retrieve};
use crate::query::{EmptyQueryPolicy, QueryEngine, QueryKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unloaded,
    Loading,
    Loaded,
    Displaying,
    LoadFailed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Unloaded => "loading has not started",
            Phase::Loading => "still loading, try again in a moment",
            Phase::Loaded => "loaded",
            Phase::Displaying => "displaying results",
            Phase::LoadFailed => "the dataset failed to load",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("data not ready: {0}")]
    NotReady(Phase),
    #[error("no load in progress: {0}")]
    NotLoading(Phase),
    #[error(transparent)]
    Load(#[from] LoadError),
}

/// What the renderer is asked to show.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    #[serde(flatten)]
    pub kind: ViewKind,
    pub records: Vec<DestinationRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ViewKind {
    /// The full list, as shown after loading or a reset.
    Everything,
    Results { query: String },
    /// Nothing to show until the user enters a query.
    Prompt,
}

impl View {
    fn everything(records: Vec<DestinationRecord>) -> Self {
        Self {
            kind: ViewKind::Everything,
            records,
        }
    }

    fn prompt() -> Self {
        Self {
            kind: ViewKind::Prompt,
            records: Vec::new(),
        }
    }
}

enum State {
    Unloaded,
    Loading,
    Ready {
        records: Vec<DestinationRecord>,
        displaying: bool,
    },
    LoadFailed,
}

/// One page view. The record list is written once by [`Session::finish_load`]
/// and only read afterwards.
pub struct Session {
    engine: QueryEngine,
    state: State,
}

impl Session {
    pub fn new(engine: QueryEngine) -> Self {
        Self {
            engine,
            state: State::Unloaded,
        }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            State::Unloaded => Phase::Unloaded,
            State::Loading => Phase::Loading,
            State::Ready {
                displaying: false, ..
            } => Phase::Loaded,
            State::Ready {
                displaying: true, ..
            } => Phase::Displaying,
            State::LoadFailed => Phase::LoadFailed,
        }
    }

    pub fn begin_load(&mut self) {
        if matches!(self.state, State::Unloaded) {
            self.state = State::Loading;
        } else {
            warn!(phase = %self.phase(), "load already started");
        }
    }

    /// Record the outcome of the retrieval. On success the initial view shows
    /// every record; on failure the session stays failed for good. Outcomes
    /// arriving outside `Loading` are rejected and leave the state untouched.
    pub fn finish_load(
        &mut self,
        outcome: Result<RawDataset, LoadError>,
    ) -> Result<View, SessionError> {
        if !matches!(self.state, State::Loading) {
            let phase = self.phase();
            warn!(phase = %phase, "load outcome ignored");
            return Err(SessionError::NotLoading(phase));
        }
        match outcome {
            Ok(raw) => {
                let records = normalize(&raw);
                info!(records = records.len(), "dataset loaded");
                let view = View::everything(records.clone());
                self.state = State::Ready {
                    records,
                    displaying: false,
                };
                Ok(view)
            }
            Err(e) => {
                warn!(error = %e, "dataset failed to load");
                self.state = State::LoadFailed;
                Err(e.into())
            }
        }
    }

    pub async fn load(&mut self, source: &impl Retrieve) -> Result<View, SessionError> {
        self.begin_load();
        if !matches!(self.state, State::Loading) {
            return Err(SessionError::NotLoading(self.phase()));
        }
        let outcome = source.retrieve().await;
        self.finish_load(outcome)
    }

    pub fn search(&mut self, text: &str) -> Result<View, SessionError> {
        let phase = self.phase();
        let State::Ready {
            records,
            displaying,
        } = &mut self.state
        else {
            return Err(SessionError::NotReady(phase));
        };

        let kind = match self.engine.classify(text) {
            QueryKind::Blank if self.engine.empty_query() == EmptyQueryPolicy::ShowNone => {
                ViewKind::Prompt
            }
            _ => ViewKind::Results {
                query: text.trim().to_string(),
            },
        };
        let matches = self.engine.filter(records, text);
        info!(query = %text.trim(), matches = matches.len(), "search");

        *displaying = true;
        Ok(View {
            kind,
            records: matches,
        })
    }

    pub fn reset(&mut self) -> Result<View, SessionError> {
        let phase = self.phase();
        let State::Ready {
            records,
            displaying,
        } = &mut self.state
        else {
            return Err(SessionError::NotReady(phase));
        };

        *displaying = false;
        Ok(match self.engine.empty_query() {
            EmptyQueryPolicy::ShowAll => View::everything(records.clone()),
            EmptyQueryPolicy::ShowNone => View::prompt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use crate::catalog::fixtures::sample_raw;
    use crate::query::AliasTable;
    use serde_json::json;

    struct FixedSource(fn() -> Result<RawDataset, LoadError>);

    impl Retrieve for FixedSource {
        async fn retrieve(&self) -> Result<RawDataset, LoadError> {
            (self.0)()
        }
    }

    fn engine(policy: EmptyQueryPolicy) -> QueryEngine {
        QueryEngine::new(policy, AliasTable::standard())
    }

    async fn loaded(policy: EmptyQueryPolicy) -> Session {
        let mut session = Session::new(engine(policy));
        session
            .load(&FixedSource(|| Ok(sample_raw())))
            .await
            .unwrap();
        session
    }

    #[test]
    fn new_session_is_unloaded_and_rejects_actions() {
        let mut session = Session::new(QueryEngine::default());
        assert_eq!(session.phase(), Phase::Unloaded);
        assert!(matches!(
            session.search("rome"),
            Err(SessionError::NotReady(Phase::Unloaded))
        ));
        assert!(matches!(
            session.reset(),
            Err(SessionError::NotReady(Phase::Unloaded))
        ));
    }

    #[test]
    fn actions_while_loading_are_not_ready() {
        let mut session = Session::new(QueryEngine::default());
        session.begin_load();
        assert_eq!(session.phase(), Phase::Loading);
        let err = session.search("rome").unwrap_err();
        assert!(matches!(err, SessionError::NotReady(Phase::Loading)));
        assert!(err.to_string().contains("try again"), "got: {err}");
    }

    #[tokio::test]
    async fn load_shows_every_record() {
        let mut session = Session::new(QueryEngine::default());
        let view = session
            .load(&FixedSource(|| Ok(sample_raw())))
            .await
            .unwrap();
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(view.kind, ViewKind::Everything);
        assert_eq!(view.records.len(), 7);
    }

    #[tokio::test]
    async fn search_moves_to_displaying_and_reset_back_to_loaded() {
        let mut session = loaded(EmptyQueryPolicy::ShowAll).await;

        let view = session.search("  Rome ").unwrap();
        assert_eq!(session.phase(), Phase::Displaying);
        assert_eq!(
            view.kind,
            ViewKind::Results {
                query: "Rome".into()
            }
        );
        assert_eq!(view.records.len(), 1);

        let view = session.reset().unwrap();
        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(view.kind, ViewKind::Everything);
        assert_eq!(view.records.len(), 7);
    }

    #[tokio::test]
    async fn reset_under_show_none_prompts() {
        let mut session = loaded(EmptyQueryPolicy::ShowNone).await;
        session.search("beach").unwrap();
        let view = session.reset().unwrap();
        assert_eq!(view, View::prompt());
        assert_eq!(session.phase(), Phase::Loaded);
    }

    #[tokio::test]
    async fn blank_search_follows_policy() {
        let mut session = loaded(EmptyQueryPolicy::ShowAll).await;
        let view = session.search("").unwrap();
        assert_eq!(view.records.len(), 7);

        let mut session = loaded(EmptyQueryPolicy::ShowNone).await;
        let view = session.search("   ").unwrap();
        assert_eq!(view.kind, ViewKind::Prompt);
        assert!(view.records.is_empty());
    }

    #[tokio::test]
    async fn searches_never_shrink_the_loaded_list() {
        let mut session = loaded(EmptyQueryPolicy::ShowAll).await;
        session.search("rome").unwrap();
        session.search("atlantis").unwrap();
        assert_eq!(session.search("").unwrap().records.len(), 7);
    }

    #[tokio::test]
    async fn end_to_end_tokyo_and_temple() {
        let mut session = Session::new(QueryEngine::default());
        let view = session
            .load(&FixedSource(|| {
                Ok(RawDataset::from_value(json!({
                    "countries": [{"name": "Japan", "cities": [
                        {"name": "Tokyo", "imageUrl": "t.jpg", "description": "Capital"}
                    ]}],
                    "temples": [{"name": "Temple A", "imageUrl": "a.jpg", "description": "Ancient"}],
                    "beaches": []
                })))
            }))
            .await
            .unwrap();

        assert_eq!(view.records.len(), 2);
        assert_eq!(view.records[0].name, "Tokyo");
        assert_eq!(view.records[0].category, Category::City);
        assert_eq!(view.records[0].parent_name, "Japan");
        assert_eq!(view.records[1].name, "Temple A");
        assert_eq!(view.records[1].category, Category::Temple);
        assert_eq!(view.records[1].parent_name, "");

        let result = session.search("temple").unwrap();
        assert_eq!(result.records, [view.records[1].clone()]);
    }

    #[tokio::test]
    async fn failed_load_is_terminal_and_searches_are_not_ready() {
        let mut session = Session::new(QueryEngine::default());
        let err = session
            .load(&FixedSource(|| Err(LoadError::Status(404))))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Load(LoadError::Status(404))));
        assert_eq!(err.to_string(), "fetch failed: status 404");
        assert_eq!(session.phase(), Phase::LoadFailed);

        for _ in 0..2 {
            assert!(matches!(
                session.search("rome"),
                Err(SessionError::NotReady(Phase::LoadFailed))
            ));
        }
        assert!(matches!(
            session.reset(),
            Err(SessionError::NotReady(Phase::LoadFailed))
        ));
    }

    #[test]
    fn finish_load_after_failure_stays_failed() {
        let mut session = Session::new(QueryEngine::default());
        session.begin_load();
        session.finish_load(Err(LoadError::Status(404))).unwrap_err();

        session.begin_load();
        let err = session.finish_load(Ok(sample_raw())).unwrap_err();
        assert!(matches!(err, SessionError::NotLoading(Phase::LoadFailed)));
        assert_eq!(session.phase(), Phase::LoadFailed);
        assert!(matches!(
            session.search("rome"),
            Err(SessionError::NotReady(Phase::LoadFailed))
        ));
    }

    #[test]
    fn finish_load_without_begin_is_rejected() {
        let mut session = Session::new(QueryEngine::default());
        let err = session.finish_load(Ok(sample_raw())).unwrap_err();
        assert!(matches!(err, SessionError::NotLoading(Phase::Unloaded)));
        assert_eq!(session.phase(), Phase::Unloaded);
    }

    #[tokio::test]
    async fn second_load_keeps_the_loaded_list() {
        let mut session = loaded(EmptyQueryPolicy::ShowAll).await;

        session.begin_load();
        let err = session
            .finish_load(Err(LoadError::Status(500)))
            .unwrap_err();
        assert!(matches!(err, SessionError::NotLoading(Phase::Loaded)));

        let err = session
            .load(&FixedSource(|| Ok(RawDataset::default())))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NotLoading(Phase::Loaded)));

        assert_eq!(session.phase(), Phase::Loaded);
        assert_eq!(session.search("").unwrap().records.len(), 7);
    }

    #[test]
    fn view_serializes_kind_inline() {
        let view = View {
            kind: ViewKind::Results {
                query: "rome".into(),
            },
            records: Vec::new(),
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value, json!({"kind": "results", "query": "rome", "records": []}));

        let value = serde_json::to_value(View::prompt()).unwrap();
        assert_eq!(value, json!({"kind": "prompt", "records": []}));
    }
}
