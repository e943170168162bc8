//! Commentary generation - chat hints, greetings and competitive status lines
//! derived from simulated answers and the players' personalities

use rand::Rng;

use crate::components::{
    ChatMessage, ChatSender, Personality, PlayerProfile, Question, SimulatedAnswer, StatusUpdate,
};
use crate::pool::SessionPlayerPool;

/// Welcome line posted by the system when a cooperative session opens
pub const COOPERATIVE_WELCOME: &str =
    "Willkommen im kooperativen Modus! Arbeitet zusammen und tauscht euch im Chat aus.";

/// Answer hints from cooperative players, each with probability `probability`.
///
/// A player only ever hints at the answer it picked itself, so a hint is
/// helpful exactly when that player answered correctly.
pub fn cooperative_messages(
    pool: &SessionPlayerPool,
    question: &Question,
    answers: &[SimulatedAnswer],
    timestamp: f64,
    probability: f64,
    rng: &mut impl Rng,
) -> Vec<ChatMessage> {
    let mut messages = Vec::new();

    for answer in answers {
        let Some(profile) = pool.profile(answer.player_id) else {
            continue;
        };
        let active = pool.stats(answer.player_id).map(|s| s.is_active).unwrap_or(false);
        if !active || profile.personality != Personality::Cooperative {
            continue;
        }
        if !rng.gen_bool(probability) {
            continue;
        }

        let Some(answer_text) = question.answer_text(answer.selected_answer) else {
            continue;
        };
        let templates = hint_templates(answer.is_correct);
        let template = templates[rng.gen_range(0..templates.len())];

        messages.push(
            ChatMessage::new(
                sender_for(profile),
                template.replace("{answer}", answer_text),
                timestamp,
            )
            .with_helpful(answer.is_correct),
        );
    }

    messages
}

/// Live status lines for a competitive round, highest score first
pub fn competitive_updates(
    pool: &SessionPlayerPool,
    answers: &[SimulatedAnswer],
) -> Vec<StatusUpdate> {
    let mut updates: Vec<StatusUpdate> = answers
        .iter()
        .filter_map(|answer| {
            let stats = pool.stats(answer.player_id)?;
            Some(StatusUpdate {
                player_id: answer.player_id,
                player_name: answer.player_name.clone(),
                is_correct: answer.is_correct,
                time_taken: answer.time_taken,
                current_score: stats.score,
                average_time: stats.average_time,
                accuracy: stats.accuracy(),
                status_message: status_message(answer.is_correct, answer.time_taken),
                performance_rating: stats.performance_rating(),
            })
        })
        .collect();

    updates.sort_by(|a, b| b.current_score.cmp(&a.current_score));
    updates
}

/// Fixed status phrase for one answer
pub fn status_message(is_correct: bool, time_taken: u32) -> String {
    if is_correct {
        format!("Richtig beantwortet in {}s", time_taken)
    } else {
        format!("Falsch beantwortet nach {}s", time_taken)
    }
}

/// System welcome followed by one greeting per active player, staggered by
/// `interval` seconds starting at `start`
pub fn greeting_messages(
    pool: &SessionPlayerPool,
    start: f64,
    interval: f64,
    rng: &mut impl Rng,
) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(COOPERATIVE_WELCOME, start)];

    for (i, profile) in pool.active_profiles().into_iter().enumerate() {
        let template = GREETINGS[rng.gen_range(0..GREETINGS.len())];
        let text = template
            .replace("{name}", first_name(profile))
            .replace("{affiliation}", &profile.affiliation);
        let timestamp = start + interval * (i + 1) as f64;
        messages.push(ChatMessage::new(sender_for(profile), text, timestamp));
    }

    messages
}

/// Short scripted reply to a human chat message
pub fn chat_reply(profile: &PlayerProfile, rng: &mut impl Rng) -> String {
    let replies = match profile.personality {
        Personality::Cooperative => COOPERATIVE_REPLIES,
        Personality::Competitive => COMPETITIVE_REPLIES,
        Personality::Balanced => BALANCED_REPLIES,
    };
    replies[rng.gen_range(0..replies.len())].to_string()
}

pub fn sender_for(profile: &PlayerProfile) -> ChatSender {
    ChatSender::Player {
        id: profile.id,
        name: profile.name.clone(),
    }
}

fn first_name(profile: &PlayerProfile) -> &str {
    profile.name.split_whitespace().next().unwrap_or(&profile.name)
}

fn hint_templates(is_correct: bool) -> &'static [&'static str] {
    if is_correct {
        &[
            "Ich bin mir ziemlich sicher, es ist \"{answer}\".",
            "Das hatten wir in der Vorlesung: \"{answer}\".",
            "Eindeutig \"{answer}\", vertraut mir!",
            "Ich würde \"{answer}\" nehmen.",
        ]
    } else {
        &[
            "Hmm, ich tippe auf \"{answer}\", bin mir aber nicht sicher.",
            "Vielleicht \"{answer}\"? Nur geraten...",
            "Könnte \"{answer}\" sein, oder?",
            "Ich schwanke noch, eventuell \"{answer}\".",
        ]
    }
}

static GREETINGS: &[&str] = &[
    "Hallo zusammen! Ich bin {name}.",
    "Hi! {name} hier, von der {affiliation}.",
    "Servus! Lasst uns das gemeinsam schaffen.",
    "Moin! Bin gespannt auf die Fragen.",
    "Hey, {name} ist dabei. Viel Erfolg uns allen!",
];

static COOPERATIVE_REPLIES: &[&str] = &[
    "Gute Idee, das sehe ich genauso!",
    "Danke für den Hinweis!",
    "Lass uns die Optionen nochmal durchgehen.",
    "Wir schaffen das zusammen!",
];

static COMPETITIVE_REPLIES: &[&str] = &[
    "Mal sehen, wer am Ende vorne liegt.",
    "Konzentrier dich lieber auf die Frage!",
    "Nicht schlecht, aber ich bin schneller.",
];

static BALANCED_REPLIES: &[&str] = &[
    "Interessanter Gedanke.",
    "Hmm, könnte stimmen.",
    "Da bin ich mir nicht ganz sicher.",
    "Gute Frage!",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Difficulty, QuizMode};
    use crate::generation::list_profiles;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question() -> Question {
        Question::new(
            1,
            "Welche Farbe hat der Himmel?",
            vec!["Blau".into(), "Grün".into(), "Rot".into()],
            0,
            "Physik",
            Difficulty::Easy,
        )
        .unwrap()
    }

    fn full_pool(rng: &mut StdRng) -> SessionPlayerPool {
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Cooperative, "Physik", list_profiles().len(), rng)
            .unwrap();
        pool
    }

    #[test]
    fn test_hints_only_from_cooperative_players() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut pool = full_pool(&mut rng);
        let q = question();
        let answers = pool.simulate_round(&q, 0, 5.0, &mut rng);

        let messages = cooperative_messages(&pool, &q, &answers, 5.0, 1.0, &mut rng);
        let cooperative = list_profiles()
            .iter()
            .filter(|p| p.personality == Personality::Cooperative)
            .count();
        assert_eq!(messages.len(), cooperative);

        for message in &messages {
            let ChatSender::Player { id, .. } = &message.sender else {
                panic!("hint from non-player sender");
            };
            let answer = answers.iter().find(|a| a.player_id == *id).unwrap();
            assert_eq!(message.is_helpful, Some(answer.is_correct));
            assert!(message.text.contains(&q.answers[answer.selected_answer]));
        }
    }

    #[test]
    fn test_no_hints_at_zero_probability() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pool = full_pool(&mut rng);
        let q = question();
        let answers = pool.simulate_round(&q, 0, 0.0, &mut rng);
        assert!(cooperative_messages(&pool, &q, &answers, 0.0, 0.0, &mut rng).is_empty());
    }

    #[test]
    fn test_default_hint_rate() {
        let mut rng = StdRng::seed_from_u64(30);
        let mut pool = full_pool(&mut rng);
        let q = question();
        let answers = pool.simulate_round(&q, 0, 0.0, &mut rng);
        let probability = crate::config::QuizConfig::default().hint_probability;
        let cooperative = list_profiles()
            .iter()
            .filter(|p| p.personality == Personality::Cooperative)
            .count();

        const DRAWS: usize = 2000;
        let hints: usize = (0..DRAWS)
            .map(|_| cooperative_messages(&pool, &q, &answers, 0.0, probability, &mut rng).len())
            .sum();
        let rate = hints as f64 / (DRAWS * cooperative) as f64;
        assert!((0.25..=0.35).contains(&rate), "hint rate {:.3}", rate);
    }

    #[test]
    fn test_empty_inputs_give_empty_outputs() {
        let mut rng = StdRng::seed_from_u64(1);
        let pool = SessionPlayerPool::new();
        assert!(cooperative_messages(&pool, &question(), &[], 0.0, 1.0, &mut rng).is_empty());
        assert!(competitive_updates(&pool, &[]).is_empty());
    }

    #[test]
    fn test_competitive_updates_sorted_by_score() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Competitive, "Physik", 3, &mut rng).unwrap();
        let q = question();
        for i in 0..4 {
            pool.simulate_round(&q, i, 0.0, &mut rng);
        }
        let answers = pool.simulate_round(&q, 4, 0.0, &mut rng);

        let updates = competitive_updates(&pool, &answers);
        assert_eq!(updates.len(), 3);
        assert!(updates
            .windows(2)
            .all(|w| w[0].current_score >= w[1].current_score));
        for update in &updates {
            let stats = pool.stats(update.player_id).unwrap();
            assert_eq!(update.current_score, stats.score);
            assert_eq!(update.status_message, status_message(update.is_correct, update.time_taken));
        }
    }

    #[test]
    fn test_greetings_are_staggered() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pool = SessionPlayerPool::new();
        pool.initialize(QuizMode::Cooperative, "Physik", 3, &mut rng).unwrap();

        let messages = greeting_messages(&pool, 10.0, 1.5, &mut rng);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].sender, ChatSender::System);
        assert_eq!(messages[0].timestamp, 10.0);
        assert_eq!(messages[3].timestamp, 14.5);
        assert!(messages.iter().all(|m| !m.text.contains('{')));
    }

    #[test]
    fn test_chat_reply_matches_personality() {
        let mut rng = StdRng::seed_from_u64(3);
        for profile in list_profiles() {
            let reply = chat_reply(profile, &mut rng);
            let pool = match profile.personality {
                Personality::Cooperative => COOPERATIVE_REPLIES,
                Personality::Competitive => COMPETITIVE_REPLIES,
                Personality::Balanced => BALANCED_REPLIES,
            };
            assert!(pool.contains(&reply.as_str()));
        }
    }
}
