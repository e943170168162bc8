//! Session player pool - the simulated opponents of one quiz session
//!
//! Players are stored as entities in a small `hecs` world: a reference to
//! the static catalog profile plus the mutable [`PlayerStats`]. Seat order
//! is kept separately so rounds are always simulated in the same order.

use hecs::{Entity, World};
use rand::Rng;

use crate::components::{
    PlayerProfile, PlayerStatistics, PlayerStats, Question, QuizMode, SessionPlayer,
    SimulatedAnswer,
};
use crate::error::QuizError;
use crate::generation::list_profiles;
use crate::systems::simulate_answer;

/// Component pointing at the catalog entry a seat was drawn from
#[derive(Clone, Copy)]
struct Seat(&'static PlayerProfile);

/// Owns the simulated players of exactly one session
pub struct SessionPlayerPool {
    world: World,
    /// Entities in seat order
    order: Vec<Entity>,
    catalog: &'static [PlayerProfile],
    mode: Option<QuizMode>,
    category: Option<String>,
}

impl SessionPlayerPool {
    /// Empty pool drawing from the built-in profile catalog
    pub fn new() -> Self {
        Self::with_catalog(list_profiles())
    }

    /// Empty pool drawing from a custom catalog
    pub fn with_catalog(catalog: &'static [PlayerProfile]) -> Self {
        Self {
            world: World::new(),
            order: Vec::new(),
            catalog,
            mode: None,
            category: None,
        }
    }

    /// Seat `count` distinct profiles drawn uniformly without replacement,
    /// replacing any previous players.
    pub fn initialize(
        &mut self,
        mode: QuizMode,
        category: &str,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<SessionPlayer>, QuizError> {
        if count == 0 || count > self.catalog.len() {
            return Err(QuizError::InvalidPoolSize {
                requested: count,
                available: self.catalog.len(),
            });
        }

        self.reset();
        self.mode = Some(mode);
        self.category = Some(category.to_string());

        for index in rand::seq::index::sample(rng, self.catalog.len(), count) {
            let profile = &self.catalog[index];
            let entity = self.world.spawn((Seat(profile), PlayerStats::new()));
            self.order.push(entity);
        }

        log::debug!(
            "Seated {} simulated players for {} / {}",
            count,
            mode,
            category
        );

        Ok(self.players())
    }

    /// Simulate every active player's answer to `question`, in seat order
    pub fn simulate_round(
        &mut self,
        question: &Question,
        question_index: usize,
        timestamp: f64,
        rng: &mut impl Rng,
    ) -> Vec<SimulatedAnswer> {
        let Some(mode) = self.mode else {
            return Vec::new();
        };

        let mut answers = Vec::with_capacity(self.order.len());
        for &entity in &self.order {
            let Ok((seat, stats)) = self
                .world
                .query_one_mut::<(&Seat, &mut PlayerStats)>(entity)
            else {
                continue;
            };
            if !stats.is_active {
                continue;
            }
            answers.push(simulate_answer(
                seat.0,
                stats,
                question,
                question_index,
                mode,
                timestamp,
                rng,
            ));
        }

        answers
    }

    /// Snapshot of every player's counters and derived ratings
    pub fn statistics(&self) -> Vec<PlayerStatistics> {
        self.players()
            .iter()
            .map(|p| PlayerStatistics::new(&p.profile, &p.stats))
            .collect()
    }

    /// Drop all players and the mode/category context
    pub fn reset(&mut self) {
        self.world.clear();
        self.order.clear();
        self.mode = None;
        self.category = None;
    }

    /// All players in seat order
    pub fn players(&self) -> Vec<SessionPlayer> {
        self.order
            .iter()
            .filter_map(|&entity| self.session_player(entity))
            .collect()
    }

    pub fn player(&self, id: u32) -> Option<SessionPlayer> {
        self.entity_of(id).and_then(|e| self.session_player(e))
    }

    pub fn profile(&self, id: u32) -> Option<&'static PlayerProfile> {
        let entity = self.entity_of(id)?;
        self.world.get::<&Seat>(entity).ok().map(|seat| seat.0)
    }

    pub fn stats(&self, id: u32) -> Option<PlayerStats> {
        let entity = self.entity_of(id)?;
        self.world.get::<&PlayerStats>(entity).ok().map(|s| *s)
    }

    /// Active players' profiles in seat order
    pub fn active_profiles(&self) -> Vec<&'static PlayerProfile> {
        self.order
            .iter()
            .filter_map(|&entity| {
                let active = self.world.get::<&PlayerStats>(entity).ok()?.is_active;
                if !active {
                    return None;
                }
                self.world.get::<&Seat>(entity).ok().map(|seat| seat.0)
            })
            .collect()
    }

    /// Mark a player as (in)active. Returns false for unknown ids.
    pub fn set_active(&mut self, id: u32, active: bool) -> bool {
        let Some(entity) = self.entity_of(id) else {
            return false;
        };
        match self.world.get::<&mut PlayerStats>(entity) {
            Ok(mut stats) => {
                stats.is_active = active;
                true
            }
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn mode(&self) -> Option<QuizMode> {
        self.mode
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn entity_of(&self, id: u32) -> Option<Entity> {
        self.order.iter().copied().find(|&entity| {
            self.world
                .get::<&Seat>(entity)
                .map(|seat| seat.0.id == id)
                .unwrap_or(false)
        })
    }

    fn session_player(&self, entity: Entity) -> Option<SessionPlayer> {
        let seat = self.world.get::<&Seat>(entity).ok()?;
        let stats = self.world.get::<&PlayerStats>(entity).ok()?;
        Some(SessionPlayer {
            profile: seat.0.clone(),
            stats: *stats,
        })
    }
}

impl Default for SessionPlayerPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn question() -> Question {
        Question::new(
            1,
            "Frage?",
            vec!["A".into(), "B".into(), "C".into()],
            0,
            "Informatik",
            Difficulty::Medium,
        )
        .unwrap()
    }

    #[test]
    fn test_initialize_distinct_players() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = SessionPlayerPool::new();

        let players = pool
            .initialize(QuizMode::Competitive, "Informatik", 3, &mut rng)
            .unwrap();

        assert_eq!(players.len(), 3);
        let ids: HashSet<u32> = players.iter().map(|p| p.profile.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(players.iter().all(|p| p.stats == PlayerStats::new()));
        assert_eq!(pool.mode(), Some(QuizMode::Competitive));
        assert_eq!(pool.category(), Some("Informatik"));
    }

    #[test]
    fn test_initialize_rejects_bad_sizes() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = SessionPlayerPool::new();

        assert!(matches!(
            pool.initialize(QuizMode::Cooperative, "x", 0, &mut rng),
            Err(QuizError::InvalidPoolSize { requested: 0, .. })
        ));
        let too_many = list_profiles().len() + 1;
        assert!(pool
            .initialize(QuizMode::Cooperative, "x", too_many, &mut rng)
            .is_err());
        assert!(pool.is_empty());

        let all = list_profiles().len();
        assert_eq!(
            pool.initialize(QuizMode::Cooperative, "x", all, &mut rng).unwrap().len(),
            all
        );
    }

    #[test]
    fn test_initialize_replaces_previous_pool() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Competitive, "A", 3, &mut rng).unwrap();
        pool.simulate_round(&question(), 0, 0.0, &mut rng);

        pool.initialize(QuizMode::Cooperative, "B", 2, &mut rng).unwrap();
        assert_eq!(pool.len(), 2);
        assert!(pool.players().iter().all(|p| p.stats.answered_questions == 0));
    }

    #[test]
    fn test_simulate_round_in_seat_order() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pool = SessionPlayerPool::new();
        let players = pool
            .initialize(QuizMode::Competitive, "Informatik", 3, &mut rng)
            .unwrap();

        let answers = pool.simulate_round(&question(), 0, 12.0, &mut rng);
        let answer_ids: Vec<u32> = answers.iter().map(|a| a.player_id).collect();
        let seat_ids: Vec<u32> = players.iter().map(|p| p.profile.id).collect();
        assert_eq!(answer_ids, seat_ids);

        for answer in &answers {
            let stats = pool.stats(answer.player_id).unwrap();
            assert_eq!(stats.answered_questions, 1);
            assert_eq!(stats.total_time, answer.time_taken);
            assert_eq!(answer.timestamp, 12.0);
        }
    }

    #[test]
    fn test_inactive_players_skip_rounds() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pool = SessionPlayerPool::new();
        let players = pool
            .initialize(QuizMode::Cooperative, "Informatik", 3, &mut rng)
            .unwrap();
        let benched = players[1].profile.id;

        assert!(pool.set_active(benched, false));
        assert!(!pool.set_active(999, false));

        let answers = pool.simulate_round(&question(), 0, 0.0, &mut rng);
        assert_eq!(answers.len(), 2);
        assert!(answers.iter().all(|a| a.player_id != benched));
        assert_eq!(pool.active_profiles().len(), 2);
    }

    #[test]
    fn test_statistics_snapshot() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Competitive, "Informatik", 3, &mut rng).unwrap();
        pool.simulate_round(&question(), 0, 0.0, &mut rng);
        pool.simulate_round(&question(), 1, 0.0, &mut rng);

        for row in pool.statistics() {
            assert_eq!(row.total_answers, 2);
            assert!(row.correct_answers <= 2);
            assert!((0.0..=1.0).contains(&row.accuracy));
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Competitive, "Informatik", 3, &mut rng).unwrap();

        pool.reset();
        let once = (pool.len(), pool.mode(), pool.category().map(str::to_string));
        pool.reset();
        let twice = (pool.len(), pool.mode(), pool.category().map(str::to_string));

        assert_eq!(once, (0, None, None));
        assert_eq!(once, twice);
        assert!(pool.simulate_round(&question(), 0, 0.0, &mut rng).is_empty());
    }
}
