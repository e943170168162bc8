//! Answer simulation - how a simulated player answers one question
//!
//! The only side effect is the update of the player's [`PlayerStats`].
//! All randomness is drawn from the caller's `Rng`, so a seeded generator
//! reproduces a round exactly.

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::components::{
    Difficulty, PlayerProfile, PlayerStats, Question, QuizMode, SimulatedAnswer,
};

/// Lower clamp of the success probability
pub const MIN_SUCCESS_PROBABILITY: f32 = 0.10;
/// Upper clamp of the success probability
pub const MAX_SUCCESS_PROBABILITY: f32 = 0.95;

const SPECIALTY_BONUS: f32 = 0.15;
const WEAKNESS_PENALTY: f32 = 0.10;
const HARD_PENALTY: f32 = 0.20;
const EASY_BONUS: f32 = 0.10;

/// Points for any correct answer
pub const BASE_POINTS: u32 = 100;
/// Answers faster than this many seconds earn one bonus point per second saved
pub const SPEED_BONUS_WINDOW: u32 = 30;

/// Success probability before clamping
pub fn raw_success_probability(profile: &PlayerProfile, question: &Question) -> f32 {
    let mut probability = profile.skill_level;

    if profile.is_specialty(&question.category) {
        probability += SPECIALTY_BONUS;
    }
    if profile.is_weakness(&question.category) {
        probability -= WEAKNESS_PENALTY;
    }

    match question.difficulty {
        Difficulty::Hard => probability -= HARD_PENALTY,
        Difficulty::Easy => probability += EASY_BONUS,
        Difficulty::Medium => {}
    }

    probability
}

/// Probability that `profile` answers `question` correctly
pub fn success_probability(profile: &PlayerProfile, question: &Question) -> f32 {
    raw_success_probability(profile, question)
        .clamp(MIN_SUCCESS_PROBABILITY, MAX_SUCCESS_PROBABILITY)
}

/// Uniform thinking-time range (seconds) before the speed factor applies
pub fn base_latency_range(mode: QuizMode) -> std::ops::Range<f32> {
    match mode {
        QuizMode::Competitive => 5.0..20.0,
        _ => 10.0..35.0,
    }
}

/// Draw the effective answer latency in whole seconds
pub fn draw_latency(profile: &PlayerProfile, mode: QuizMode, rng: &mut impl Rng) -> u32 {
    let base = rng.gen_range(base_latency_range(mode));
    (base / profile.speed_factor).round() as u32
}

/// Points for a correct answer given in `time_taken` seconds
pub fn score_for_answer(time_taken: u32) -> u32 {
    BASE_POINTS + SPEED_BONUS_WINDOW.saturating_sub(time_taken)
}

/// Pick a wrong option uniformly, `None` if the question offers none
fn pick_wrong_answer(question: &Question, rng: &mut impl Rng) -> Option<usize> {
    (0..question.answers.len())
        .filter(|&index| index != question.correct_answer)
        .choose(rng)
}

/// Simulate `profile` answering `question` and record it in `stats`
pub fn simulate_answer(
    profile: &PlayerProfile,
    stats: &mut PlayerStats,
    question: &Question,
    question_index: usize,
    mode: QuizMode,
    timestamp: f64,
    rng: &mut impl Rng,
) -> SimulatedAnswer {
    let time_taken = draw_latency(profile, mode, rng);

    let probability = success_probability(profile, question);
    let wrong = if rng.gen::<f32>() < probability {
        None
    } else {
        pick_wrong_answer(question, rng)
    };
    let selected_answer = wrong.unwrap_or(question.correct_answer);
    let is_correct = wrong.is_none();

    let score_delta = is_correct.then(|| score_for_answer(time_taken));
    stats.record(time_taken, score_delta);

    SimulatedAnswer {
        player_id: profile.id,
        player_name: profile.name.clone(),
        selected_answer,
        is_correct,
        time_taken,
        question_index,
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{ExperienceLevel, Personality};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn profile(skill: f32, speed: f32) -> PlayerProfile {
        PlayerProfile::new(
            1,
            "Test",
            "Uni",
            ExperienceLevel::Intermediate,
            skill,
            speed,
            Personality::Balanced,
        )
        .unwrap()
        .with_specialties(&["Informatik"])
        .with_weaknesses(&["Geschichte"])
    }

    fn question(category: &str, difficulty: Difficulty) -> Question {
        Question::new(
            10,
            "Frage?",
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            2,
            category,
            difficulty,
        )
        .unwrap()
    }

    #[test]
    fn test_hard_question_penalty() {
        let p = profile(0.9, 1.0);
        let q = question("Physik", Difficulty::Hard);
        assert!((raw_success_probability(&p, &q) - 0.70).abs() < 1e-5);
        assert!((success_probability(&p, &q) - 0.70).abs() < 1e-5);
    }

    #[test]
    fn test_modifiers_stack() {
        let p = profile(0.5, 1.0);
        assert!((raw_success_probability(&p, &question("Informatik", Difficulty::Easy)) - 0.75).abs() < 1e-5);
        assert!((raw_success_probability(&p, &question("Geschichte", Difficulty::Hard)) - 0.20).abs() < 1e-5);
        assert!((raw_success_probability(&p, &question("Physik", Difficulty::Medium)) - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_probability_clamped() {
        let strong = profile(1.0, 1.0);
        let weak = profile(0.0, 1.0);
        assert_eq!(
            success_probability(&strong, &question("Informatik", Difficulty::Easy)),
            MAX_SUCCESS_PROBABILITY
        );
        assert_eq!(
            success_probability(&weak, &question("Geschichte", Difficulty::Hard)),
            MIN_SUCCESS_PROBABILITY
        );
    }

    #[test]
    fn test_latency_respects_speed_factor() {
        let mut rng = StdRng::seed_from_u64(7);
        let fast = profile(0.5, 2.0);
        let slow = profile(0.5, 0.5);

        for _ in 0..200 {
            let t = draw_latency(&fast, QuizMode::Competitive, &mut rng);
            assert!((3..=10).contains(&t), "fast latency {}", t);
            let t = draw_latency(&slow, QuizMode::Cooperative, &mut rng);
            assert!((20..=70).contains(&t), "slow latency {}", t);
        }
    }

    #[test]
    fn test_score_speed_bonus() {
        assert_eq!(score_for_answer(0), 130);
        assert_eq!(score_for_answer(12), 118);
        assert_eq!(score_for_answer(30), 100);
        assert_eq!(score_for_answer(45), 100);
    }

    #[test]
    fn test_simulated_answer_consistency() {
        let mut rng = StdRng::seed_from_u64(42);
        let p = profile(0.6, 1.0);
        let q = question("Physik", Difficulty::Medium);
        let mut stats = PlayerStats::new();

        for i in 0..100 {
            let answer = simulate_answer(&p, &mut stats, &q, i, QuizMode::Competitive, 0.0, &mut rng);
            assert!(answer.selected_answer < q.answers.len());
            assert_eq!(answer.is_correct, answer.selected_answer == q.correct_answer);
            assert_eq!(answer.question_index, i);
            assert_eq!(answer.player_id, 1);
        }

        assert_eq!(stats.answered_questions, 100);
        assert!(stats.correct_answers > 30 && stats.correct_answers < 90);
        assert!(stats.score >= stats.correct_answers * BASE_POINTS);
    }

    #[test]
    fn test_stats_follow_answer() {
        let mut rng = StdRng::seed_from_u64(3);
        let p = profile(0.5, 1.0);
        let q = question("Physik", Difficulty::Medium);
        let mut stats = PlayerStats::new();

        let answer = simulate_answer(&p, &mut stats, &q, 0, QuizMode::Cooperative, 1.5, &mut rng);
        assert_eq!(stats.total_time, answer.time_taken);
        assert_eq!(stats.average_time, answer.time_taken);
        if answer.is_correct {
            assert_eq!(stats.score, score_for_answer(answer.time_taken));
        } else {
            assert_eq!(stats.score, 0);
        }
    }

    #[test]
    fn test_wrong_answers_spread_over_other_options() {
        let mut rng = StdRng::seed_from_u64(11);
        let q = question("Physik", Difficulty::Medium);
        let mut seen = [0u32; 4];
        for _ in 0..600 {
            let index = pick_wrong_answer(&q, &mut rng).unwrap();
            seen[index] += 1;
        }
        assert_eq!(seen[q.correct_answer], 0);
        assert!(seen.iter().enumerate().all(|(i, n)| i == q.correct_answer || *n > 120));
    }

    #[test]
    fn test_single_option_question_terminates() {
        let mut rng = StdRng::seed_from_u64(12);
        let p = profile(0.0, 1.0);
        let q = Question {
            answers: vec!["Nur diese".into()],
            correct_answer: 0,
            ..question("Physik", Difficulty::Hard)
        };
        assert_eq!(pick_wrong_answer(&q, &mut rng), None);

        let mut stats = PlayerStats::new();
        for i in 0..20 {
            let answer = simulate_answer(&p, &mut stats, &q, i, QuizMode::Competitive, 0.0, &mut rng);
            assert_eq!(answer.selected_answer, 0);
            assert!(answer.is_correct);
        }
    }

    #[test]
    fn test_seeded_rounds_reproduce() {
        let p = profile(0.7, 1.1);
        let q = question("Informatik", Difficulty::Hard);

        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut stats = PlayerStats::new();
            (0..10)
                .map(|i| simulate_answer(&p, &mut stats, &q, i, QuizMode::Competitive, 0.0, &mut rng))
                .collect::<Vec<_>>()
        };

        assert_eq!(run(99), run(99));
    }
}
