//! Prompt templates and structured-output schemas for the gateway calls.
//!
//! The schemas mirror the domain types in [`crate::model`] field by
//! field; the gateway decodes responses through those types, so a drift
//! between schema and struct shows up as a malformed-response error.

use serde_json::{json, Value};

use crate::chat::ChatMode;

pub(super) fn correction_prompt(essay: &str, rigorous: bool) -> String {
    let persona = if rigorous {
        "Aja como um corretor extremamente RIGOROSO e sem pena. Se houver falha de \
         conexão no repertório ou erros gramaticais mínimos, penalize ao máximo \
         permitido pelo manual do INEP."
    } else {
        "Aja como um corretor oficial do ENEM seguindo o manual padrão."
    };
    format!(
        "{persona} Analise a redação abaixo. Dê atenção especial à ANÁLISE DE \
         REPERTÓRIO SOCIOCULTURAL (verifique se é legitimado, pertinente e \
         produtivo). Redação: {essay}"
    )
}

pub(super) fn simulation_prompt(count: u32, subjects: &[String]) -> String {
    format!(
        "Gere {count} questões inéditas no estilo ENEM focando nestas matérias: {}. \
         Garanta uma distribuição equilibrada de dificuldades (fácil, médio, difícil).",
        subjects.join(", ")
    )
}

pub(super) const THEMES_PROMPT: &str =
    "Identifique 3 temas prováveis para o ENEM baseando-se em eventos dos últimos \
     6 meses no Brasil.";

/// Shared tutor preamble plus the mode specialty.
pub(super) fn system_instruction(mode: ChatMode) -> String {
    let base = "Você é um tutor educacional avançado focado no ENEM. ";
    let specialty = match mode {
        ChatMode::MindMap => {
            "Sua especialidade é criar MAPAS MENTAIS. Quando o usuário pedir um \
             assunto, estruture a resposta como um mapa mental hierárquico usando \
             markdown, emojis e tópicos claros. Ajude-o a visualizar as conexões \
             entre os temas."
        }
        ChatMode::Summary => {
            "Sua especialidade é criar RESUMOS ESTRUTURADOS. Sintetize conteúdos \
             complexos em tópicos diretos, definições-chave e uma seção final de \
             'O que cai no ENEM'."
        }
        ChatMode::General => {
            "Você é um tutor geral. Tire dúvidas de qualquer matéria do ENEM. Use o \
             método socrático: não dê a resposta de bandeja, faça perguntas que \
             guiem o aluno ao raciocínio correto."
        }
    };
    format!("{base}{specialty}")
}

fn competency_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER" },
            "feedback": { "type": "STRING" }
        },
        "required": ["score", "feedback"]
    })
}

pub(super) fn correction_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "totalScore": { "type": "INTEGER" },
            "competencies": {
                "type": "OBJECT",
                "properties": {
                    "C1": competency_schema(),
                    "C2": competency_schema(),
                    "C3": competency_schema(),
                    "C4": competency_schema(),
                    "C5": competency_schema()
                },
                "required": ["C1", "C2", "C3", "C4", "C5"]
            },
            "repertoryAnalysis": {
                "type": "OBJECT",
                "properties": {
                    "quality": { "type": "STRING" },
                    "connectionFeedback": { "type": "STRING" },
                    "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["quality", "connectionFeedback", "suggestions"]
            },
            "generalFeedback": { "type": "STRING" },
            "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["totalScore", "competencies", "repertoryAnalysis", "generalFeedback", "suggestions"]
    })
}

pub(super) fn simulation_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "id": { "type": "INTEGER" },
                "question": { "type": "STRING" },
                "options": { "type": "ARRAY", "items": { "type": "STRING" } },
                "correctAnswer": { "type": "INTEGER" },
                "explanation": { "type": "STRING" },
                "subject": { "type": "STRING" },
                "difficulty": { "type": "STRING", "description": "easy, medium or hard" }
            },
            "required": ["id", "question", "options", "correctAnswer", "explanation", "subject", "difficulty"]
        }
    })
}

pub(super) fn themes_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "description": { "type": "STRING" },
                "reasons": { "type": "STRING" },
                "sources": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "title": { "type": "STRING" },
                            "uri": { "type": "STRING" }
                        }
                    }
                }
            },
            "required": ["title", "description", "reasons"]
        }
    })
}
