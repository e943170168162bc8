//! Quiz session - the state machine driving one quiz from mode selection to
//! the results screen
//!
//! The session owns its clock. Callers advance it with [`QuizSession::update`];
//! countdowns, the pause after each answer and delayed chat messages are
//! scheduled tasks that fire while the clock moves.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::components::*;
use crate::config::QuizConfig;
use crate::content::ContentRepository;
use crate::error::QuizError;
use crate::pool::SessionPlayerPool;
use crate::systems::*;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    ModeSelect,
    QuestionCountSelect,
    CategorySelect,
    InQuestion { index: usize },
    Results,
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::ModeSelect => "ModeSelect",
            SessionState::QuestionCountSelect => "QuestionCountSelect",
            SessionState::CategorySelect => "CategorySelect",
            SessionState::InQuestion { .. } => "InQuestion",
            SessionState::Results => "Results",
        }
    }
}

/// Work the session schedules on its own clock
#[derive(Debug, Clone)]
enum SessionTask {
    /// Competitive countdown ran out
    Countdown,
    /// Leave the answer reveal
    Advance,
    /// Post a message that was composed earlier
    DeliverChat(ChatMessage),
}

/// Serializable view of the session for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub mode: Option<QuizMode>,
    pub is_multiplayer: bool,
    pub category: Option<String>,
    pub question_count: Option<usize>,
    pub current_question: Option<Question>,
    /// 1-based number of the current question
    pub question_number: Option<usize>,
    pub total_questions: usize,
    /// Percentage of the quiz reached
    pub progress: u32,
    /// Whole seconds left on the competitive countdown
    pub countdown_remaining: Option<u32>,
    pub answered: bool,
    pub last_answer: Option<HumanAnswer>,
    pub chat: Vec<ChatMessage>,
    pub players: Vec<PlayerStatistics>,
    pub last_round: Vec<SimulatedAnswer>,
    pub status_updates: Vec<StatusUpdate>,
    /// Session clock in seconds
    pub clock: f64,
}

/// One quiz session over a content repository
pub struct QuizSession<R: Rng = StdRng> {
    repository: Box<dyn ContentRepository>,
    config: QuizConfig,
    rng: R,

    state: SessionState,
    mode: Option<QuizMode>,
    question_count: Option<usize>,
    category: Option<String>,
    questions: Vec<Question>,
    answers: Vec<HumanAnswer>,

    pool: SessionPlayerPool,
    chat: ChatLog,
    last_round: Vec<SimulatedAnswer>,
    status_updates: Vec<StatusUpdate>,

    scheduler: Scheduler<SessionTask>,
    now: f64,
    question_started_at: f64,
    answered: bool,
}

impl QuizSession<StdRng> {
    /// Session seeded from OS entropy
    pub fn new(
        repository: Box<dyn ContentRepository>,
        config: QuizConfig,
    ) -> Result<Self, QuizError> {
        Self::with_rng(repository, config, StdRng::from_entropy())
    }
}

impl<R: Rng> QuizSession<R> {
    /// Session drawing all randomness from `rng`. Fails if `config` does
    /// not validate.
    pub fn with_rng(
        repository: Box<dyn ContentRepository>,
        config: QuizConfig,
        rng: R,
    ) -> Result<Self, QuizError> {
        config.validate()?;
        Ok(Self {
            repository,
            config,
            rng,
            state: SessionState::ModeSelect,
            mode: None,
            question_count: None,
            category: None,
            questions: Vec::new(),
            answers: Vec::new(),
            pool: SessionPlayerPool::new(),
            chat: ChatLog::new(),
            last_round: Vec::new(),
            status_updates: Vec::new(),
            scheduler: Scheduler::new(),
            now: 0.0,
            question_started_at: 0.0,
            answered: false,
        })
    }

    /// Pick the game mode
    pub fn start_mode(&mut self, mode: QuizMode) -> Result<(), QuizError> {
        self.expect_state("start a mode", |s| *s == SessionState::ModeSelect)?;
        self.mode = Some(mode);
        self.transition(SessionState::QuestionCountSelect);
        Ok(())
    }

    /// Pick how many questions to play
    pub fn set_question_count(&mut self, count: usize) -> Result<(), QuizError> {
        self.expect_state("set the question count", |s| {
            *s == SessionState::QuestionCountSelect
        })?;
        if !self.config.question_range().contains(&count) {
            return Err(QuizError::InvalidQuestionCount {
                requested: count,
                min: self.config.min_questions,
                max: self.config.max_questions,
            });
        }
        self.question_count = Some(count);
        self.transition(SessionState::CategorySelect);
        Ok(())
    }

    /// Categories offered by the repository
    pub fn categories(&self) -> Vec<Category> {
        self.repository.list_categories()
    }

    /// Pick a category and start the first question
    pub fn select_category(&mut self, category: &str) -> Result<(), QuizError> {
        self.expect_state("select a category", |s| *s == SessionState::CategorySelect)?;
        let (Some(mode), Some(count)) = (self.mode, self.question_count) else {
            return Err(self.invalid("select a category"));
        };

        let mut questions: Vec<Question> = self
            .repository
            .list_questions_for_quiz()
            .into_iter()
            .filter(|q| q.category == category)
            .filter(|q| match q.validate() {
                Ok(()) => true,
                Err(e) => {
                    log::warn!("Skipping question {}: {}", q.id, e);
                    false
                }
            })
            .collect();
        if questions.is_empty() {
            log::warn!("Refusing to start: category '{}' has no questions", category);
            return Err(QuizError::EmptyCategory(category.to_string()));
        }
        questions.shuffle(&mut self.rng);
        questions.truncate(count);

        if mode.is_multiplayer() {
            self.pool
                .initialize(mode, category, self.config.pool_size, &mut self.rng)?;
        }

        log::info!(
            "Starting {} quiz: {} question(s) from '{}' ({} requested)",
            mode,
            questions.len(),
            category,
            count
        );

        self.category = Some(category.to_string());
        self.questions = questions;
        self.answers.clear();

        if mode.has_chat() {
            let greetings = greeting_messages(
                &self.pool,
                self.now,
                self.config.greeting_interval_secs,
                &mut self.rng,
            );
            for message in greetings {
                self.post_at(message);
            }
        }

        self.begin_question(0);
        Ok(())
    }

    /// Answer the current question with option `index`
    pub fn submit_answer(&mut self, index: usize) -> Result<(), QuizError> {
        let SessionState::InQuestion { index: current } = self.state else {
            return Err(self.invalid("submit an answer"));
        };
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        let Some(question) = self.questions.get(current) else {
            return Err(self.invalid("submit an answer"));
        };
        let options = question.answers.len();
        if index >= options {
            return Err(QuizError::InvalidAnswerIndex { index, options });
        }

        self.resolve_question(current, Some(index));
        Ok(())
    }

    /// Post a human chat message. Cooperative sessions only.
    pub fn send_chat_message(&mut self, text: &str) -> Result<(), QuizError> {
        if self.mode != Some(QuizMode::Cooperative) || self.pool.is_empty() {
            return Err(QuizError::ChatUnavailable);
        }

        let text = sanitize_message(text, self.config.max_chat_length);
        if text.is_empty() {
            return Err(QuizError::EmptyMessage);
        }
        self.chat
            .push(ChatMessage::new(ChatSender::Human, text, self.now));

        let responders = self.pool.active_profiles();
        if responders.is_empty() || !self.rng.gen_bool(self.config.reply_probability) {
            return Ok(());
        }
        let profile = responders[self.rng.gen_range(0..responders.len())];
        let delay = self.reply_delay();
        let reply = ChatMessage::new(
            sender_for(profile),
            chat_reply(profile, &mut self.rng),
            self.now + delay,
        );
        log::debug!("{} replies in {:.1}s", profile.name, delay);
        self.scheduler
            .schedule(reply.timestamp, TaskScope::Session, SessionTask::DeliverChat(reply));
        Ok(())
    }

    /// Back to mode selection, discarding everything
    pub fn restart(&mut self) {
        self.clear_quiz();
        self.mode = None;
        self.question_count = None;
        self.transition(SessionState::ModeSelect);
    }

    /// Play the same category again with fresh questions and players
    pub fn restart_same_category(&mut self) -> Result<(), QuizError> {
        self.expect_state("restart the category", |s| {
            matches!(s, SessionState::InQuestion { .. } | SessionState::Results)
        })?;
        let Some(category) = self.category.clone() else {
            return Err(self.invalid("restart the category"));
        };
        self.clear_quiz();
        self.transition(SessionState::CategorySelect);
        self.select_category(&category)
    }

    /// Leave the quiz and pick another category
    pub fn back_to_category_selection(&mut self) -> Result<(), QuizError> {
        self.expect_state("return to category selection", |s| {
            matches!(
                s,
                SessionState::CategorySelect | SessionState::InQuestion { .. } | SessionState::Results
            )
        })?;
        self.clear_quiz();
        self.transition(SessionState::CategorySelect);
        Ok(())
    }

    /// Step one screen back
    pub fn back(&mut self) -> Result<(), QuizError> {
        match self.state {
            SessionState::ModeSelect => Err(self.invalid("go back")),
            SessionState::QuestionCountSelect => {
                self.mode = None;
                self.transition(SessionState::ModeSelect);
                Ok(())
            }
            SessionState::CategorySelect => {
                self.question_count = None;
                self.transition(SessionState::QuestionCountSelect);
                Ok(())
            }
            SessionState::InQuestion { .. } | SessionState::Results => {
                self.back_to_category_selection()
            }
        }
    }

    /// Advance the session clock by `delta_secs` and run every task that
    /// falls due, each at its own due time
    pub fn update(&mut self, delta_secs: f64) {
        let target = self.now + delta_secs.max(0.0);

        while let Some((due_at, task)) = self.scheduler.pop_due(target) {
            self.now = self.now.max(due_at);
            self.run_task(task);
        }

        self.now = target;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let (current_question, question_number, progress) = match self.state {
            SessionState::InQuestion { index } => (
                self.questions.get(index).cloned(),
                Some(index + 1),
                percent(index + 1, self.questions.len()),
            ),
            SessionState::Results => (None, None, 100),
            _ => (None, None, 0),
        };

        SessionSnapshot {
            state: self.state,
            mode: self.mode,
            is_multiplayer: self.is_multiplayer(),
            category: self.category.clone(),
            question_count: self.question_count,
            current_question,
            question_number,
            total_questions: self.questions.len(),
            progress,
            countdown_remaining: self.countdown_remaining(),
            answered: self.answered,
            last_answer: self.answers.last().cloned(),
            chat: self.chat.messages().to_vec(),
            players: self.pool.statistics(),
            last_round: self.last_round.clone(),
            status_updates: self.status_updates.clone(),
            clock: self.now,
        }
    }

    /// Result of the finished quiz
    pub fn summary(&self) -> Result<Summary, QuizError> {
        self.expect_state("summarize", |s| *s == SessionState::Results)?;
        Ok(self.build_summary())
    }

    /// Leaderboard of the human and every simulated player
    pub fn ranking(&self) -> Result<Vec<RankingEntry>, QuizError> {
        self.expect_state("rank players", |s| *s == SessionState::Results)?;
        let summary = self.build_summary();
        Ok(final_ranking(
            &summary,
            &self.config.player_name,
            mean_answer_time(&self.answers).unwrap_or(0.0),
            &self.pool.players(),
        ))
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Results
    }

    /// Whether the current question already has a (possibly timed-out) answer
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// Seconds since the current question was shown
    pub fn question_elapsed(&self) -> f64 {
        (self.now - self.question_started_at).max(0.0)
    }

    pub fn is_multiplayer(&self) -> bool {
        self.mode.map(|m| m.is_multiplayer()).unwrap_or(false)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Option<QuizMode> {
        self.mode
    }

    pub fn question_count(&self) -> Option<usize> {
        self.question_count
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[HumanAnswer] {
        &self.answers
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::InQuestion { index } => self.questions.get(index),
            _ => None,
        }
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }

    pub fn pool(&self) -> &SessionPlayerPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut SessionPlayerPool {
        &mut self.pool
    }

    pub fn last_round(&self) -> &[SimulatedAnswer] {
        &self.last_round
    }

    pub fn status_updates(&self) -> &[StatusUpdate] {
        &self.status_updates
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Session clock in seconds
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Pending scheduled tasks
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    fn run_task(&mut self, task: SessionTask) {
        match task {
            SessionTask::Countdown => {
                if let SessionState::InQuestion { index } = self.state {
                    if !self.answered {
                        log::debug!("Countdown expired on question {}", index + 1);
                        self.resolve_question(index, None);
                    }
                }
            }
            SessionTask::Advance => self.advance(),
            SessionTask::DeliverChat(message) => {
                self.chat.push(message);
            }
        }
    }

    /// Record the human's answer (`None` = timed out) and everything that
    /// follows from it
    fn resolve_question(&mut self, index: usize, selected: Option<usize>) {
        let Some(question) = self.questions.get(index).cloned() else {
            log::warn!("No question at index {}, nothing to resolve", index);
            return;
        };
        let time_taken = self.question_elapsed().round() as u32;

        let answer = match selected {
            Some(choice) => HumanAnswer::answered(&question, choice, time_taken),
            None => HumanAnswer::timed_out(&question, time_taken),
        };
        log::debug!(
            "Question {} answered: correct={} timed_out={} in {}s",
            index + 1,
            answer.is_correct,
            answer.timed_out,
            time_taken
        );
        self.answers.push(answer);
        self.answered = true;
        self.scheduler.cancel_slot(TaskSlot::Countdown);

        if let Some(mode) = self.mode.filter(QuizMode::is_multiplayer) {
            let round = self
                .pool
                .simulate_round(&question, index, self.now, &mut self.rng);
            match mode {
                QuizMode::Cooperative => {
                    let hints = cooperative_messages(
                        &self.pool,
                        &question,
                        &round,
                        self.now,
                        self.config.hint_probability,
                        &mut self.rng,
                    );
                    for hint in hints {
                        self.chat.push(hint);
                    }
                }
                QuizMode::Competitive => {
                    self.status_updates = competitive_updates(&self.pool, &round);
                }
                QuizMode::SinglePlayer => {}
            }
            self.last_round = round;
        }

        self.scheduler.schedule_exclusive(
            TaskSlot::Advance,
            self.now + self.config.advance_delay_secs,
            SessionTask::Advance,
        );
    }

    fn advance(&mut self) {
        let SessionState::InQuestion { index } = self.state else {
            return;
        };
        if index + 1 < self.questions.len() {
            self.begin_question(index + 1);
        } else {
            self.scheduler.next_question();
            self.transition(SessionState::Results);
            let summary = self.build_summary();
            log::info!(
                "Quiz finished: {}/{} correct ({}%, {}), {} points",
                summary.correct,
                summary.total,
                summary.percentage,
                summary.grade.label(),
                summary.score
            );
        }
    }

    fn begin_question(&mut self, index: usize) {
        self.scheduler.next_question();
        self.answered = false;
        self.question_started_at = self.now;
        self.last_round.clear();
        self.status_updates.clear();

        if self.mode.map(|m| m.has_countdown()).unwrap_or(false) {
            self.scheduler.schedule_exclusive(
                TaskSlot::Countdown,
                self.now + self.config.countdown_secs,
                SessionTask::Countdown,
            );
        }
        self.transition(SessionState::InQuestion { index });
    }

    /// Drop questions, answers, players, chat and every pending task
    fn clear_quiz(&mut self) {
        self.scheduler.reset();
        self.pool.reset();
        self.chat.clear();
        self.category = None;
        self.questions.clear();
        self.answers.clear();
        self.last_round.clear();
        self.status_updates.clear();
        self.answered = false;
    }

    /// Post now, or schedule for later if the message is timestamped ahead
    fn post_at(&mut self, message: ChatMessage) {
        if message.timestamp <= self.now {
            self.chat.push(message);
        } else {
            self.scheduler.schedule(
                message.timestamp,
                TaskScope::Session,
                SessionTask::DeliverChat(message),
            );
        }
    }

    fn build_summary(&self) -> Summary {
        summarize(
            &self.questions,
            &self.answers,
            self.mode.unwrap_or(QuizMode::SinglePlayer),
        )
    }

    fn countdown_remaining(&self) -> Option<u32> {
        self.scheduler
            .deadline(TaskSlot::Countdown)
            .map(|deadline| (deadline - self.now).max(0.0).ceil() as u32)
    }

    fn reply_delay(&mut self) -> f64 {
        let (min, max) = (
            self.config.reply_delay_min_secs,
            self.config.reply_delay_max_secs,
        );
        if max > min {
            self.rng.gen_range(min..=max)
        } else {
            min.max(0.0)
        }
    }

    fn transition(&mut self, next: SessionState) {
        log::info!("Session {} -> {}", self.state.name(), next.name());
        self.state = next;
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: impl Fn(&SessionState) -> bool,
    ) -> Result<(), QuizError> {
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(self.invalid(operation))
        }
    }

    fn invalid(&self, operation: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }
}

/// Trim, drop control characters and cap the length
fn sanitize_message(text: &str, max_chars: usize) -> String {
    text.trim()
        .chars()
        .filter(|c| !c.is_control())
        .take(max_chars)
        .collect::<String>()
        .trim()
        .to_string()
}

fn percent(part: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        (100.0 * part as f64 / total as f64).round() as u32
    }
}
