//! Results - score summary, grade and final ranking of a finished quiz

use serde::{Deserialize, Serialize};

use crate::components::{HumanAnswer, Question, QuizMode, SessionPlayer, HUMAN_PLAYER_ID};
use crate::systems::score_for_answer;

/// German school-style grade for the final percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Excellent,
    VeryGood,
    Good,
    Satisfactory,
    Sufficient,
    Insufficient,
}

/// Display severity of a grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeTone {
    Success,
    Info,
    Warning,
    Danger,
}

impl Grade {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Grade::Excellent,
            80..=89 => Grade::VeryGood,
            70..=79 => Grade::Good,
            60..=69 => Grade::Satisfactory,
            50..=59 => Grade::Sufficient,
            _ => Grade::Insufficient,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::Excellent => "Exzellent",
            Grade::VeryGood => "Sehr gut",
            Grade::Good => "Gut",
            Grade::Satisfactory => "Befriedigend",
            Grade::Sufficient => "Ausreichend",
            Grade::Insufficient => "Ungenügend",
        }
    }

    pub fn tone(&self) -> GradeTone {
        match self {
            Grade::Excellent | Grade::VeryGood => GradeTone::Success,
            Grade::Good => GradeTone::Info,
            Grade::Satisfactory | Grade::Sufficient => GradeTone::Warning,
            Grade::Insufficient => GradeTone::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub correct: u32,
    pub total: u32,
    pub percentage: u32,
}

/// The human participant's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: u32,
    pub correct: u32,
    pub percentage: u32,
    pub score: u32,
    /// Mean answer time, only tracked in competitive mode
    pub average_time: Option<f32>,
    pub categories: Vec<CategoryBreakdown>,
    pub grade: Grade,
}

/// One line of the final leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub player_id: u32,
    pub name: String,
    pub is_human: bool,
    pub score: u32,
    pub correct_answers: u32,
    pub average_time: f32,
}

fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        0
    } else {
        (100.0 * correct as f32 / total as f32).round() as u32
    }
}

/// Mean `time_taken` over the log, `None` when empty
pub fn mean_answer_time(answers: &[HumanAnswer]) -> Option<f32> {
    if answers.is_empty() {
        return None;
    }
    let total: u32 = answers.iter().map(|a| a.time_taken).sum();
    Some(total as f32 / answers.len() as f32)
}

/// Summarize the human's answers. `answers[i]` belongs to `questions[i]`;
/// a question without an answer counts as wrong.
pub fn summarize(questions: &[Question], answers: &[HumanAnswer], mode: QuizMode) -> Summary {
    let mut categories: Vec<CategoryBreakdown> = Vec::new();
    let mut correct = 0;
    let mut score = 0;

    for (i, question) in questions.iter().enumerate() {
        let answer = answers.get(i);
        let is_correct = answer.map(|a| a.is_correct).unwrap_or(false);
        if let (true, Some(answer)) = (is_correct, answer) {
            correct += 1;
            score += score_for_answer(answer.time_taken);
        }

        let index = match categories.iter().position(|c| c.category == question.category) {
            Some(index) => index,
            None => {
                categories.push(CategoryBreakdown {
                    category: question.category.clone(),
                    correct: 0,
                    total: 0,
                    percentage: 0,
                });
                categories.len() - 1
            }
        };
        let group = &mut categories[index];
        group.total += 1;
        if is_correct {
            group.correct += 1;
        }
    }

    for group in &mut categories {
        group.percentage = percentage(group.correct, group.total);
    }

    let total = questions.len() as u32;
    let pct = percentage(correct, total);

    Summary {
        total,
        correct,
        percentage: pct,
        score,
        average_time: if mode == QuizMode::Competitive {
            mean_answer_time(answers)
        } else {
            None
        },
        categories,
        grade: Grade::from_percentage(pct),
    }
}

/// Merge the human result with every session player into one leaderboard:
/// score descending, then average time ascending. Full ties keep the human
/// first and players in seat order.
pub fn final_ranking(
    summary: &Summary,
    human_name: &str,
    human_average_time: f32,
    players: &[SessionPlayer],
) -> Vec<RankingEntry> {
    let mut ranking = Vec::with_capacity(players.len() + 1);
    ranking.push(RankingEntry {
        player_id: HUMAN_PLAYER_ID,
        name: human_name.to_string(),
        is_human: true,
        score: summary.score,
        correct_answers: summary.correct,
        average_time: human_average_time,
    });

    ranking.extend(players.iter().map(|p| RankingEntry {
        player_id: p.profile.id,
        name: p.profile.name.clone(),
        is_human: false,
        score: p.stats.score,
        correct_answers: p.stats.correct_answers,
        average_time: p.stats.average_time as f32,
    }));

    sort_ranking(&mut ranking);
    ranking
}

/// Stable sort: score descending, average time ascending
pub fn sort_ranking(ranking: &mut [RankingEntry]) {
    ranking.sort_by(|a, b| {
        b.score.cmp(&a.score).then(
            a.average_time
                .partial_cmp(&b.average_time)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });
}
