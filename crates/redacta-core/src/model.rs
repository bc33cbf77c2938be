//! Domain types shared across the gateway, progression engine and storage.
//!
//! The wire-facing types use camelCase field names because they double as
//! the declared response schema for the structured-output gateway calls;
//! the same encoding is mirrored verbatim into the persistent store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Score and feedback for one of the five official essay competencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub score: u32,
    pub feedback: String,
}

/// The five scored competencies (C1..C5) of an ENEM essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competencies {
    #[serde(rename = "C1")]
    pub c1: CompetencyScore,
    #[serde(rename = "C2")]
    pub c2: CompetencyScore,
    #[serde(rename = "C3")]
    pub c3: CompetencyScore,
    #[serde(rename = "C4")]
    pub c4: CompetencyScore,
    #[serde(rename = "C5")]
    pub c5: CompetencyScore,
}

impl Competencies {
    /// Iterate competencies in official order, paired with their label.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CompetencyScore)> {
        [
            ("C1", &self.c1),
            ("C2", &self.c2),
            ("C3", &self.c3),
            ("C4", &self.c4),
            ("C5", &self.c5),
        ]
        .into_iter()
    }
}

/// Evaluation of the sociocultural repertory used in the essay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepertoryAnalysis {
    pub quality: String,
    pub connection_feedback: String,
    pub suggestions: Vec<String>,
}

/// Full structured correction payload returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayCorrection {
    pub total_score: u32,
    pub competencies: Competencies,
    pub repertory_analysis: RepertoryAnalysis,
    pub general_feedback: String,
    pub suggestions: Vec<String>,
}

/// One essay-evaluation record. Immutable once created; history keeps
/// these most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCorrection {
    /// Time-derived unique id (epoch milliseconds at save time).
    pub id: String,
    pub date: DateTime<Utc>,
    pub title: String,
    pub score: u32,
    pub correction: EssayCorrection,
}

/// Difficulty tag attached to every generated question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

/// A generated multiple-choice question. Produced in batches by the
/// gateway; consumed read-only by the quiz flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
    pub explanation: String,
    pub subject: String,
    pub difficulty: Difficulty,
}

/// A web source cited by the theme-discovery call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeSource {
    pub title: String,
    pub uri: String,
}

/// A probable exam theme surfaced from recent events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbableTheme {
    pub title: String,
    pub description: String,
    pub reasons: String,
    #[serde(default)]
    pub sources: Vec<ThemeSource>,
}

/// Placeholder title for essays submitted without one.
pub const UNTITLED_ESSAY: &str = "Redação sem título";

#[cfg(test)]
mod tests {
    use super::*;

    fn competency(score: u32) -> CompetencyScore {
        CompetencyScore {
            score,
            feedback: "ok".to_string(),
        }
    }

    #[test]
    fn correction_round_trips_with_wire_field_names() {
        let correction = EssayCorrection {
            total_score: 920,
            competencies: Competencies {
                c1: competency(200),
                c2: competency(200),
                c3: competency(160),
                c4: competency(200),
                c5: competency(160),
            },
            repertory_analysis: RepertoryAnalysis {
                quality: "legitimado".to_string(),
                connection_feedback: "bem conectado".to_string(),
                suggestions: vec!["citar fonte".to_string()],
            },
            general_feedback: "bom texto".to_string(),
            suggestions: vec![],
        };

        let json = serde_json::to_value(&correction).unwrap();
        assert_eq!(json["totalScore"], 920);
        assert!(json["competencies"]["C3"].is_object());
        assert_eq!(json["repertoryAnalysis"]["connectionFeedback"], "bem conectado");

        let back: EssayCorrection = serde_json::from_value(json).unwrap();
        assert_eq!(back, correction);
    }

    #[test]
    fn question_decodes_from_schema_shape() {
        let json = serde_json::json!({
            "id": 1,
            "question": "Qual é a capital do Brasil?",
            "options": ["Rio", "Brasília", "Salvador", "Recife"],
            "correctAnswer": 1,
            "explanation": "Brasília desde 1960.",
            "subject": "Geografia",
            "difficulty": "easy"
        });
        let q: SimulationQuestion = serde_json::from_value(json).unwrap();
        assert_eq!(q.correct_answer, 1);
        assert_eq!(q.difficulty, Difficulty::Easy);
    }

    #[test]
    fn theme_sources_default_to_empty() {
        let json = serde_json::json!({
            "title": "Tema",
            "description": "desc",
            "reasons": "eventos recentes"
        });
        let theme: ProbableTheme = serde_json::from_value(json).unwrap();
        assert!(theme.sources.is_empty());
    }
}
