//! Inbound interface of the trainer: one method per user action.
//!
//! Every method that touches a session runs inside that user's slot lock,
//! so duplicate deliveries for one user serialize while other users proceed.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chess_core::notation::translate_input;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::catalog::{trace_solution, PuzzleCatalog};
use crate::error::ServiceError;
use crate::profile::{Profile, ProfileStore, UserId};
use crate::puzzle::DifficultyTier;
use crate::reporter::OutcomeReporter;
use crate::session::engine::{self, TransitionKind, TransitionResult};
use crate::session::store::{SessionStore, Slot};
use crate::session::{Session, SessionSummary};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TierSelection {
    Started(SessionSummary),
    NoPuzzlesForTier { tier: DifficultyTier },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetAck {
    pub had_session: bool,
    /// `None` for users without a profile.
    pub solved_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardAck {
    pub board_visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board_text: Option<String>,
}

pub struct PuzzleService {
    catalog: Arc<PuzzleCatalog>,
    sessions: SessionStore,
    reporter: OutcomeReporter,
    rng: Mutex<StdRng>,
}

impl PuzzleService {
    pub fn new(catalog: Arc<PuzzleCatalog>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self::with_rng(catalog, profiles, StdRng::from_entropy())
    }

    pub fn with_rng(
        catalog: Arc<PuzzleCatalog>,
        profiles: Arc<dyn ProfileStore>,
        rng: StdRng,
    ) -> Self {
        Self {
            catalog,
            sessions: SessionStore::new(),
            reporter: OutcomeReporter::new(profiles),
            rng: Mutex::new(rng),
        }
    }

    pub fn catalog(&self) -> &PuzzleCatalog {
        &self.catalog
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn register(&self, user_id: &UserId) -> Result<(Profile, bool), ServiceError> {
        let (profile, created) = self.reporter.store().create_if_absent(user_id).await?;
        if created {
            tracing::info!(user_id = %user_id, "Registered new user");
        }
        Ok((profile, created))
    }

    pub async fn get_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ServiceError> {
        Ok(self.reporter.store().get(user_id).await?)
    }

    /// Start a random puzzle of `tier`, replacing any session the user had.
    pub async fn select_tier(
        &self,
        user_id: &UserId,
        tier: DifficultyTier,
    ) -> Result<TierSelection, ServiceError> {
        let mut slot = self.sessions.lock(user_id).await;
        slot.touch();
        self.flush_pending(user_id, &mut slot).await;

        let picked = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            self.catalog.pick_random(tier, &mut *rng)
        };
        let Some(puzzle) = picked else {
            tracing::info!(user_id = %user_id, tier = %tier, "No puzzles for tier");
            return Ok(TierSelection::NoPuzzlesForTier { tier });
        };

        let session = Session::start(&puzzle)?;
        let summary = session.summary();
        slot.replace(session);

        tracing::info!(
            user_id = %user_id,
            tier = %tier,
            puzzle_id = puzzle.id.as_deref().unwrap_or("-"),
            rating = puzzle.tier_rating(),
            plies = puzzle.solution.len(),
            "Puzzle session started"
        );
        match trace_solution(&puzzle) {
            Ok(trace) => tracing::debug!(
                plies = ?trace.plies,
                broken_at = ?trace.broken_at,
                "Solution trace"
            ),
            Err(e) => tracing::debug!(error = %e, "Solution trace unavailable"),
        }

        if let Err(e) = self.reporter.record_tier_selected(user_id, tier).await {
            tracing::warn!(user_id = %user_id, tier = %tier, error = %e, "Failed to record tier");
        }

        Ok(TierSelection::Started(summary))
    }

    /// Submit a coordinate token straight to the engine.
    pub async fn submit_move(
        &self,
        user_id: &UserId,
        token: &str,
    ) -> Result<TransitionResult, ServiceError> {
        self.submit(user_id, token, false).await
    }

    /// Submit human input (`e2 e4`, `O-O`, ...), translated for the side to
    /// move before it reaches the engine.
    pub async fn submit_input(
        &self,
        user_id: &UserId,
        input: &str,
    ) -> Result<TransitionResult, ServiceError> {
        self.submit(user_id, input, true).await
    }

    async fn submit(
        &self,
        user_id: &UserId,
        raw: &str,
        translate: bool,
    ) -> Result<TransitionResult, ServiceError> {
        let mut slot = self.sessions.lock(user_id).await;
        slot.touch();
        self.flush_pending(user_id, &mut slot).await;

        let Some(session) = slot.session_mut() else {
            return Ok(TransitionResult::no_active_session());
        };

        let token = if translate && session.is_active() {
            match translate_input(raw, session.position().side_to_move()) {
                Ok(token) => token,
                Err(_) => return Ok(TransitionResult::malformed(raw).with_board(session)),
            }
        } else {
            raw.to_string()
        };

        let result = engine::submit_move(session, &token);
        tracing::debug!(
            user_id = %user_id,
            token = %token,
            cursor = session.cursor(),
            kind = ?result.kind,
            "Move submitted"
        );

        match result.kind {
            TransitionKind::Solved => {
                let credit = session.credit_rating();
                if let Err(e) = self.reporter.report_solved(user_id, credit).await {
                    tracing::error!(user_id = %user_id, credit, error = %e, "Failed to record solve");
                    slot.push_pending_credit(credit);
                    return Err(e.into());
                }
            }
            TransitionKind::EngineDataError => {
                slot.clear();
            }
            _ => {}
        }

        Ok(result)
    }

    pub async fn reset(&self, user_id: &UserId) -> Result<ResetAck, ServiceError> {
        let mut slot = self.sessions.lock(user_id).await;
        slot.touch();
        self.flush_pending(user_id, &mut slot).await;

        if let Some(session) = slot.session_mut() {
            engine::reset(session);
        }
        let had_session = slot.clear().is_some();
        drop(slot);

        let solved_count = self
            .reporter
            .store()
            .get(user_id)
            .await?
            .map(|profile| profile.solved_count);

        Ok(ResetAck {
            had_session,
            solved_count,
        })
    }

    /// Flip board visibility. `None` when the user has no session.
    pub async fn toggle_board(&self, user_id: &UserId) -> Option<BoardAck> {
        let mut slot = self.sessions.lock(user_id).await;
        slot.touch();
        let session = slot.session_mut()?;
        let board_visible = engine::toggle_board_visibility(session);
        Some(BoardAck {
            board_visible,
            board_text: session.visible_board(),
        })
    }

    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted = self.sessions.evict_idle(max_idle).await;
        tracing::debug!(evicted, "Idle session sweep");
        evicted
    }

    /// Retry solve credits a previous action could not write.
    async fn flush_pending(&self, user_id: &UserId, slot: &mut Slot) {
        let mut credits = slot.take_pending_credits().into_iter();
        while let Some(credit) = credits.next() {
            if let Err(e) = self.reporter.report_solved(user_id, credit).await {
                tracing::error!(user_id = %user_id, credit, error = %e, "Pending solve still not recorded");
                let mut rest = vec![credit];
                rest.extend(credits);
                slot.restore_pending_credits(rest);
                return;
            }
        }
    }
}
