//! Top-level application state.
//!
//! One explicit struct owns the user stats, the correction history and
//! the onboarding flags, with the persistence port injected. Every
//! mutation is mirrored to the store immediately (write-through, best
//! effort); a failed gateway call leaves the state exactly as it was so
//! the user can resubmit.

use chrono::{NaiveDate, Utc};

use crate::error::{CoreError, ValidationError};
use crate::gateway::TutorGateway;
use crate::model::{SavedCorrection, SimulationQuestion, UNTITLED_ESSAY};
use crate::progression::{SubjectAccuracy, UserStats};
use crate::storage::{keys, StateStore};

/// Which surface a fresh launch lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchScreen {
    /// Terms not accepted yet.
    Onboarding,
    /// Terms accepted, guide not seen.
    Guide,
    Home,
}

pub struct App {
    store: StateStore,
    stats: UserStats,
    history: Vec<SavedCorrection>,
    terms_accepted: bool,
    guide_seen: bool,
}

impl App {
    /// Load persisted state, falling back to first-launch defaults for
    /// any key that is absent or unreadable.
    pub fn load(store: StateStore) -> Self {
        let stats = match store.load_stats() {
            Ok(Some(stats)) => stats,
            Ok(None) => UserStats::default(),
            Err(e) => {
                tracing::warn!(error = %e, "stored stats unreadable, starting fresh");
                UserStats::default()
            }
        };
        let history = match store.load_history() {
            Ok(Some(history)) => history,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "stored history unreadable, starting fresh");
                Vec::new()
            }
        };
        let terms_accepted = store.flag(keys::TERMS_ACCEPTED);
        let guide_seen = store.flag(keys::GUIDE_SEEN);
        Self {
            store,
            stats,
            history,
            terms_accepted,
            guide_seen,
        }
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    /// Correction history, most-recent-first.
    pub fn history(&self) -> &[SavedCorrection] {
        &self.history
    }

    pub fn launch_screen(&self) -> LaunchScreen {
        if !self.terms_accepted {
            LaunchScreen::Onboarding
        } else if !self.guide_seen {
            LaunchScreen::Guide
        } else {
            LaunchScreen::Home
        }
    }

    pub fn accept_terms(&mut self) {
        self.terms_accepted = true;
        if let Err(e) = self.store.set_flag(keys::TERMS_ACCEPTED) {
            tracing::warn!(error = %e, "flag write failed");
        }
    }

    pub fn mark_guide_seen(&mut self) {
        self.guide_seen = true;
        if let Err(e) = self.store.set_flag(keys::GUIDE_SEEN) {
            tracing::warn!(error = %e, "flag write failed");
        }
    }

    pub fn set_exam_date(&mut self, date: Option<NaiveDate>) {
        self.stats.exam_date = date;
        self.persist_stats();
    }

    /// Submit an essay for correction.
    ///
    /// Essays under `min_length` chars are rejected locally before any
    /// network call. On success the record is prepended to the history
    /// and the progression engine is applied; on failure nothing
    /// changes.
    pub async fn submit_essay(
        &mut self,
        gateway: &dyn TutorGateway,
        title: &str,
        text: &str,
        rigorous: bool,
        min_length: usize,
    ) -> Result<&SavedCorrection, CoreError> {
        let len = text.chars().count();
        if len < min_length {
            return Err(ValidationError::EssayTooShort {
                len,
                min: min_length,
            }
            .into());
        }

        let correction = gateway.correct_essay(text, rigorous).await?;
        let title = if title.trim().is_empty() {
            UNTITLED_ESSAY.to_string()
        } else {
            title.trim().to_string()
        };
        let now = Utc::now();
        let saved = SavedCorrection {
            id: now.timestamp_millis().to_string(),
            date: now,
            title,
            score: correction.total_score,
            correction,
        };

        self.history.insert(0, saved);
        self.stats = self.stats.apply_essay_correction();
        self.persist_history();
        self.persist_stats();
        Ok(&self.history[0])
    }

    /// Validate simulation parameters before any network call.
    pub async fn generate_simulation(
        &self,
        gateway: &dyn TutorGateway,
        count: u32,
        subjects: &[String],
    ) -> Result<Vec<SimulationQuestion>, CoreError> {
        if count == 0 {
            return Err(ValidationError::ZeroQuestions.into());
        }
        if subjects.is_empty() {
            return Err(ValidationError::NoSubjects.into());
        }
        Ok(gateway.generate_simulation(count, subjects).await?)
    }

    /// Record a finished simulation. `answers` must cover every
    /// question; each entry is the chosen option index.
    pub fn complete_simulation(
        &mut self,
        questions: &[SimulationQuestion],
        answers: &[usize],
    ) -> Result<(), CoreError> {
        if answers.len() != questions.len() {
            return Err(ValidationError::AnswerCountMismatch {
                expected: questions.len(),
                got: answers.len(),
            }
            .into());
        }
        self.stats = self.stats.apply_quiz_completion(questions, answers);
        self.persist_stats();
        Ok(())
    }

    /// Per-subject accuracy, weakest first.
    pub fn weakness_report(&self) -> Vec<SubjectAccuracy> {
        self.stats.weakness_report()
    }

    fn persist_stats(&self) {
        if let Err(e) = self.store.save_stats(&self.stats) {
            tracing::warn!(error = %e, "stats write failed");
        }
    }

    fn persist_history(&self) {
        if let Err(e) = self.store.save_history(&self.history) {
            tracing::warn!(error = %e, "history write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatMessage, ChatMode};
    use crate::error::GatewayError;
    use crate::gateway::ChatStream;
    use crate::model::{
        Competencies, CompetencyScore, Difficulty, EssayCorrection, ProbableTheme,
        RepertoryAnalysis,
    };
    use crate::storage::{MemoryStore, StateStore};

    fn correction(total_score: u32) -> EssayCorrection {
        let competency = CompetencyScore {
            score: total_score / 5,
            feedback: "ok".to_string(),
        };
        EssayCorrection {
            total_score,
            competencies: Competencies {
                c1: competency.clone(),
                c2: competency.clone(),
                c3: competency.clone(),
                c4: competency.clone(),
                c5: competency,
            },
            repertory_analysis: RepertoryAnalysis {
                quality: "ok".to_string(),
                connection_feedback: "ok".to_string(),
                suggestions: vec![],
            },
            general_feedback: "ok".to_string(),
            suggestions: vec![],
        }
    }

    struct StubGateway {
        score: u32,
        fail: bool,
    }

    #[async_trait::async_trait]
    impl TutorGateway for StubGateway {
        async fn correct_essay(
            &self,
            _essay: &str,
            _rigorous: bool,
        ) -> Result<EssayCorrection, GatewayError> {
            if self.fail {
                Err(GatewayError::Http("down".to_string()))
            } else {
                Ok(correction(self.score))
            }
        }

        async fn generate_simulation(
            &self,
            count: u32,
            subjects: &[String],
        ) -> Result<Vec<SimulationQuestion>, GatewayError> {
            Ok((0..count)
                .map(|i| SimulationQuestion {
                    id: i,
                    question: format!("q{i}"),
                    options: vec!["a".into(), "b".into()],
                    correct_answer: 0,
                    explanation: String::new(),
                    subject: subjects[0].clone(),
                    difficulty: Difficulty::Medium,
                })
                .collect())
        }

        async fn probable_themes(&self) -> Result<Vec<ProbableTheme>, GatewayError> {
            Ok(vec![])
        }

        async fn stream_chat(
            &self,
            _mode: ChatMode,
            _history: &[ChatMessage],
            _message: &str,
        ) -> Result<ChatStream, GatewayError> {
            Err(GatewayError::EmptyResponse)
        }
    }

    fn app() -> App {
        App::load(StateStore::new(MemoryStore::new()))
    }

    fn long_essay() -> String {
        "a".repeat(600)
    }

    #[tokio::test]
    async fn short_essay_is_rejected_locally() {
        let mut app = app();
        let err = app
            .submit_essay(&StubGateway { score: 900, fail: false }, "t", "curta", false, 500)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::EssayTooShort { len: 5, min: 500 })
        ));
        assert!(app.history().is_empty());
        assert_eq!(app.stats().corrected_essays, 0);
    }

    #[tokio::test]
    async fn gateway_failure_leaves_state_unchanged() {
        let mut app = app();
        let before = app.stats().clone();
        let err = app
            .submit_essay(&StubGateway { score: 0, fail: true }, "t", &long_essay(), false, 500)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Gateway(_)));
        assert!(app.history().is_empty());
        assert_eq!(app.stats(), &before);
    }

    #[tokio::test]
    async fn history_is_most_recent_first() {
        let mut app = app();
        app.submit_essay(&StubGateway { score: 700, fail: false }, "C1", &long_essay(), false, 500)
            .await
            .unwrap();
        app.submit_essay(&StubGateway { score: 800, fail: false }, "C2", &long_essay(), true, 500)
            .await
            .unwrap();

        let titles: Vec<&str> = app.history().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["C2", "C1"]);
        assert_eq!(app.stats().corrected_essays, 2);
    }

    #[tokio::test]
    async fn untitled_essays_get_the_placeholder_title() {
        let mut app = app();
        app.submit_essay(&StubGateway { score: 640, fail: false }, "  ", &long_essay(), false, 500)
            .await
            .unwrap();
        assert_eq!(app.history()[0].title, UNTITLED_ESSAY);
        assert_eq!(app.history()[0].score, 640);
    }

    #[tokio::test]
    async fn simulation_parameters_are_validated_locally() {
        let app = app();
        let gateway = StubGateway { score: 0, fail: false };
        assert!(matches!(
            app.generate_simulation(&gateway, 0, &["X".to_string()]).await,
            Err(CoreError::Validation(ValidationError::ZeroQuestions))
        ));
        assert!(matches!(
            app.generate_simulation(&gateway, 5, &[]).await,
            Err(CoreError::Validation(ValidationError::NoSubjects))
        ));
        let questions = app
            .generate_simulation(&gateway, 3, &["Física".to_string()])
            .await
            .unwrap();
        assert_eq!(questions.len(), 3);
    }

    #[tokio::test]
    async fn state_round_trips_through_the_store() {
        let store = StateStore::new(MemoryStore::new());
        {
            let mut app = App::load(store.clone());
            app.accept_terms();
            app.mark_guide_seen();
            app.set_exam_date(NaiveDate::from_ymd_opt(2026, 11, 8));
            app.submit_essay(&StubGateway { score: 720, fail: false }, "T", &long_essay(), false, 500)
                .await
                .unwrap();
        }
        let app = App::load(store);
        assert_eq!(app.launch_screen(), LaunchScreen::Home);
        assert_eq!(app.history().len(), 1);
        assert_eq!(app.stats().corrected_essays, 1);
        assert_eq!(app.stats().exam_date, NaiveDate::from_ymd_opt(2026, 11, 8));
    }

    #[test]
    fn launch_screen_gating() {
        let store = StateStore::new(MemoryStore::new());
        let mut app = App::load(store);
        assert_eq!(app.launch_screen(), LaunchScreen::Onboarding);
        app.accept_terms();
        assert_eq!(app.launch_screen(), LaunchScreen::Guide);
        app.mark_guide_seen();
        assert_eq!(app.launch_screen(), LaunchScreen::Home);
    }

    #[test]
    fn complete_simulation_checks_answer_count() {
        let mut app = app();
        let questions = vec![SimulationQuestion {
            id: 0,
            question: "q".into(),
            options: vec!["a".into(), "b".into()],
            correct_answer: 0,
            explanation: String::new(),
            subject: "Química".into(),
            difficulty: Difficulty::Easy,
        }];
        assert!(matches!(
            app.complete_simulation(&questions, &[]),
            Err(CoreError::Validation(ValidationError::AnswerCountMismatch { expected: 1, got: 0 }))
        ));
        app.complete_simulation(&questions, &[0]).unwrap();
        assert_eq!(app.stats().completed_simulations, 1);
        assert_eq!(app.stats().subject_stats.get("Química").unwrap().correct, 1);
    }
}
