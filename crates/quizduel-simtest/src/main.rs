//! QuizDuel Headless Session Harness
//!
//! Plays complete quizzes in every mode on the session clock and validates
//! the bundled catalogs, the answer simulation and content persistence.
//! Runs entirely in-process: no UI, no storage backend, no real waiting.
//!
//! Usage:
//!   cargo run -p quizduel-simtest
//!   cargo run -p quizduel-simtest -- --verbose
//!   cargo run -p quizduel-simtest -- --json     (print final snapshots)
//!   cargo run -p quizduel-simtest -- --seed 7

use quizduel_core::content::Card;
use quizduel_core::generation::{list_profiles, seed_content};
use quizduel_core::persistence::{load_store, save_store};
use quizduel_core::prelude::*;
use quizduel_core::systems::{simulate_answer, success_probability, Grade};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: String) -> Self {
        Self {
            name: name.into(),
            passed,
            detail,
        }
    }
}

struct Options {
    verbose: bool,
    json: bool,
    seed: u64,
}

fn parse_options() -> Options {
    let args: Vec<String> = std::env::args().collect();
    let seed = args
        .iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    Options {
        verbose: args.iter().any(|a| a == "--verbose"),
        json: args.iter().any(|a| a == "--json"),
        seed,
    }
}

fn main() {
    let options = parse_options();
    println!("=== QuizDuel Session Harness (seed {}) ===\n", options.seed);

    let mut results = Vec::new();

    // 1. Bundled content
    results.extend(validate_seed_content(options.verbose));

    // 2. Player profile catalog
    results.extend(validate_profiles(options.verbose));

    // 3. Answer simulation calibration
    results.extend(validate_simulation(&options));

    // 4. Full sessions, one per mode
    for mode in QuizMode::ALL {
        results.extend(validate_session(mode, &options));
    }

    // 5. Content store persistence
    results.extend(validate_persistence(options.verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || options.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Seed Content ─────────────────────────────────────────────────────

fn validate_seed_content(verbose: bool) -> Vec<TestResult> {
    println!("--- Seed Content ---");
    let mut results = Vec::new();

    let seed = match seed_content() {
        Ok(seed) => seed,
        Err(e) => {
            results.push(TestResult::check(
                "seed_parse",
                false,
                format!("seed content error: {}", e),
            ));
            return results;
        }
    };

    results.push(TestResult::check(
        "seed_has_categories",
        seed.categories.len() >= 5,
        format!("{} categories", seed.categories.len()),
    ));

    let invalid: Vec<u32> = seed
        .cards
        .iter()
        .filter(|c| c.validate().is_err())
        .map(|c| c.id)
        .collect();
    results.push(TestResult::check(
        "seed_cards_valid",
        invalid.is_empty(),
        format!("{} cards, invalid: {:?}", seed.cards.len(), invalid),
    ));

    if verbose {
        for category in &seed.categories {
            let count = seed
                .cards
                .iter()
                .filter(|c| c.category_id == category.id)
                .count();
            println!("  {:<12} {:>2} questions", category.name, count);
        }
    }

    results
}

// ── 2. Profiles ─────────────────────────────────────────────────────────

fn validate_profiles(verbose: bool) -> Vec<TestResult> {
    println!("--- Player Profiles ---");
    let profiles = list_profiles();
    let mut ids: Vec<u32> = profiles.iter().map(|p| p.id).collect();
    ids.sort_unstable();
    ids.dedup();

    if verbose {
        for p in profiles {
            println!(
                "  #{} {:<14} skill {:.2} speed {:.1} {:?}",
                p.id, p.name, p.skill_level, p.speed_factor, p.personality
            );
        }
    }

    vec![
        TestResult::check(
            "profiles_count",
            profiles.len() == 8,
            format!("{} profiles", profiles.len()),
        ),
        TestResult::check(
            "profiles_unique_ids",
            ids.len() == profiles.len(),
            format!("{} distinct ids", ids.len()),
        ),
        TestResult::check(
            "profiles_all_personalities",
            [
                Personality::Competitive,
                Personality::Cooperative,
                Personality::Balanced,
            ]
            .iter()
            .all(|kind| profiles.iter().any(|p| p.personality == *kind)),
            "every personality represented".into(),
        ),
    ]
}

// ── 3. Simulation ───────────────────────────────────────────────────────

fn validate_simulation(options: &Options) -> Vec<TestResult> {
    println!("--- Answer Simulation ---");
    const TRIALS: u32 = 4000;
    let mut results = Vec::new();
    let mut rng = StdRng::seed_from_u64(options.seed);

    for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let question = match Question::new(
            1,
            "Kalibrierung",
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            0,
            "Physik",
            difficulty,
        ) {
            Ok(q) => q,
            Err(e) => {
                results.push(TestResult::check("calibration_question", false, e.to_string()));
                return results;
            }
        };

        for profile in list_profiles() {
            let expected = success_probability(profile, &question);
            let mut stats = PlayerStats::new();
            let mut bad_answers = 0;
            for i in 0..TRIALS {
                let answer = simulate_answer(
                    profile,
                    &mut stats,
                    &question,
                    i as usize,
                    QuizMode::Competitive,
                    0.0,
                    &mut rng,
                );
                if answer.is_correct != (answer.selected_answer == question.correct_answer) {
                    bad_answers += 1;
                }
            }
            let observed = stats.correct_answers as f32 / TRIALS as f32;
            let name = format!("calibration_{}_{}", difficulty.label(), profile.id);
            results.push(TestResult::check(
                &name,
                bad_answers == 0 && (observed - expected).abs() < 0.04,
                format!(
                    "{}: expected {:.2}, observed {:.3}, avg {}s",
                    profile.name, expected, observed, stats.average_time
                ),
            ));
        }
    }

    results
}

// ── 4. Sessions ─────────────────────────────────────────────────────────

fn validate_session(mode: QuizMode, options: &Options) -> Vec<TestResult> {
    println!("--- Session: {} ---", mode);
    let mut results = Vec::new();
    let prefix = format!("{:?}", mode).to_lowercase();

    let store = match LocalContentStore::seeded() {
        Ok(store) => store,
        Err(e) => {
            results.push(TestResult::check(&prefix, false, e.to_string()));
            return results;
        }
    };
    let mut session = match QuizSession::with_rng(
        Box::new(store),
        QuizConfig::default(),
        StdRng::seed_from_u64(options.seed),
    ) {
        Ok(session) => session,
        Err(e) => {
            results.push(TestResult::check(&format!("{}_config", prefix), false, e.to_string()));
            return results;
        }
    };

    let setup = session
        .start_mode(mode)
        .and_then(|_| session.set_question_count(6))
        .and_then(|_| session.select_category("Informatik"));
    if let Err(e) = setup {
        results.push(TestResult::check(&format!("{}_setup", prefix), false, e.to_string()));
        return results;
    }

    results.push(TestResult::check(
        &format!("{}_pool_size", prefix),
        session.pool().len() == if mode.is_multiplayer() { 3 } else { 0 },
        format!("{} simulated players", session.pool().len()),
    ));

    // Answer each question after four seconds: right, wrong, and in
    // competitive mode every third question is left to the countdown
    let mut ticks = 0u32;
    let mut index_ok = true;
    while !session.is_completed() && ticks < 100_000 {
        if let SessionState::InQuestion { index } = session.state() {
            index_ok &= index < session.questions().len();
            let wait_for_timeout = mode.has_countdown() && index % 3 == 2;
            if !session.is_answered() && !wait_for_timeout && session.question_elapsed() >= 4.0 {
                let pick = session.current_question().map(|q| {
                    if index % 3 == 0 {
                        q.correct_answer
                    } else {
                        (q.correct_answer + 1) % q.answers.len()
                    }
                });
                if let Some(pick) = pick {
                    let _ = session.submit_answer(pick);
                }
            }
        }
        if mode.has_chat() && ticks == 20 {
            let _ = session.send_chat_message("Hat jemand eine Idee?");
        }
        session.update(0.25);
        ticks += 1;
    }

    results.push(TestResult::check(
        &format!("{}_completed", prefix),
        session.is_completed(),
        format!("{} ticks, clock {:.1}s", ticks, session.now()),
    ));
    results.push(TestResult::check(
        &format!("{}_index_in_bounds", prefix),
        index_ok,
        "current index < question count".into(),
    ));

    let answers = session.answers();
    let timeouts = answers.iter().filter(|a| a.timed_out).count();
    results.push(TestResult::check(
        &format!("{}_one_answer_per_question", prefix),
        answers.len() == session.questions().len(),
        format!("{} answers, {} timed out", answers.len(), timeouts),
    ));
    results.push(TestResult::check(
        &format!("{}_timeouts_only_with_countdown", prefix),
        mode.has_countdown() || timeouts == 0,
        format!("{} timeouts", timeouts),
    ));

    match (session.summary(), session.ranking()) {
        (Ok(summary), Ok(ranking)) => {
            results.push(TestResult::check(
                &format!("{}_summary", prefix),
                summary.grade == Grade::from_percentage(summary.percentage)
                    && summary.average_time.is_some() == (mode == QuizMode::Competitive),
                format!(
                    "{}/{} correct, {}%, {} ({}), {} points",
                    summary.correct,
                    summary.total,
                    summary.percentage,
                    summary.grade.label(),
                    format!("{:?}", summary.grade.tone()).to_lowercase(),
                    summary.score
                ),
            ));
            let sorted = ranking.windows(2).all(|w| {
                w[0].score > w[1].score
                    || (w[0].score == w[1].score && w[0].average_time <= w[1].average_time)
            });
            results.push(TestResult::check(
                &format!("{}_ranking_sorted", prefix),
                sorted && ranking.len() == session.pool().len() + 1,
                ranking
                    .iter()
                    .map(|r| format!("{} {}", r.name, r.score))
                    .collect::<Vec<_>>()
                    .join(", "),
            ));
        }
        (Err(e), _) | (_, Err(e)) => {
            results.push(TestResult::check(&format!("{}_summary", prefix), false, e.to_string()));
        }
    }

    if mode.has_chat() {
        results.push(TestResult::check(
            &format!("{}_chat", prefix),
            session.chat().len() > session.pool().len(),
            format!("{} chat messages", session.chat().len()),
        ));
    }

    if options.json {
        match serde_json::to_string_pretty(&session.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("  snapshot serialization failed: {}", e),
        }
    }

    results
}

// ── 5. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(verbose: bool) -> Vec<TestResult> {
    println!("--- Content Persistence ---");
    let mut results = Vec::new();

    let mut store = match LocalContentStore::seeded() {
        Ok(store) => store,
        Err(e) => {
            results.push(TestResult::check("persist_seed", false, e.to_string()));
            return results;
        }
    };
    let created = store
        .create_category("Harness", "Temporäre Kategorie", "🧪", "#888888")
        .and_then(|id| {
            store.create_card(Card::new(
                id,
                "Wie viele Tests laufen hier?",
                vec!["Einige".into(), "Keine".into()],
                0,
            ))
        });
    if let Err(e) = created {
        results.push(TestResult::check("persist_create", false, e.to_string()));
        return results;
    }

    let mut buffer = Vec::new();
    let saved = save_store(&mut buffer, &store);
    let loaded = saved.and_then(|_| load_store(buffer.as_slice()));
    match loaded {
        Ok(restored) => {
            results.push(TestResult::check(
                "persist_roundtrip",
                restored.card_count() == store.card_count()
                    && restored.category_by_name("harness").is_some(),
                format!("{} bytes, {} cards", buffer.len(), restored.card_count()),
            ));
        }
        Err(e) => {
            results.push(TestResult::check("persist_roundtrip", false, e.to_string()));
        }
    }

    if verbose {
        println!("  store serialized to {} bytes", buffer.len());
    }

    results
}
