#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chess_puzzler::catalog::PuzzleCatalog;
use chess_puzzler::error::ProfileError;
use chess_puzzler::profile::{InMemoryProfileStore, Profile, ProfileMutator, ProfileStore};
use chess_puzzler::puzzle::classify::classify;
use chess_puzzler::puzzle::{Puzzle, RawPuzzleRecord};
use chess_puzzler::service::PuzzleService;
use chess_puzzler::session::Session;
use chess_puzzler::UserId;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
pub const ITALIAN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 0 1";
pub const FOOLS_MATE: &str = "rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2";
pub const PROMOTION: &str = "8/4P3/8/8/8/8/k7/4K3 w - - 0 1";

pub fn corpus_path() -> String {
    format!("{}/data/puzzles_data.json", env!("CARGO_MANIFEST_DIR"))
}

/// Classify a puzzle the way the catalog would.
pub fn puzzle(fen: &str, moves: &str, rating: Option<i32>, themes: &str) -> Puzzle {
    classify(RawPuzzleRecord {
        id: None,
        fen: Some(fen.to_string()),
        moves: Some(moves.to_string()),
        rating,
        themes: Some(themes.to_string()),
    })
    .expect("fixture puzzle must classify")
}

pub fn session(fen: &str, moves: &str) -> Session {
    Session::start(&puzzle(fen, moves, Some(1800), "")).expect("fixture FEN must load")
}

pub fn service(puzzles: Vec<Puzzle>, profiles: Arc<dyn ProfileStore>) -> PuzzleService {
    PuzzleService::with_rng(
        Arc::new(PuzzleCatalog::from_puzzles(puzzles)),
        profiles,
        StdRng::seed_from_u64(42),
    )
}

pub fn memory_store() -> Arc<InMemoryProfileStore> {
    Arc::new(InMemoryProfileStore::new())
}

pub fn user(id: &str) -> UserId {
    UserId::from(id)
}

/// In-memory store whose writes can be switched to fail.
#[derive(Default)]
pub struct FlakyStore {
    inner: InMemoryProfileStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ProfileError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(ProfileError::Storage("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ProfileStore for FlakyStore {
    async fn get(&self, user_id: &UserId) -> Result<Option<Profile>, ProfileError> {
        self.inner.get(user_id).await
    }

    async fn create_if_absent(&self, user_id: &UserId) -> Result<(Profile, bool), ProfileError> {
        self.inner.create_if_absent(user_id).await
    }

    async fn update(
        &self,
        user_id: &UserId,
        mutator: ProfileMutator,
    ) -> Result<Option<Profile>, ProfileError> {
        self.check()?;
        self.inner.update(user_id, mutator).await
    }
}
