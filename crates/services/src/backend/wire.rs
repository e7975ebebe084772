//! JSON shapes exchanged with the quiz backend and their domain mapping.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use quiz_core::model::{
    HistoryEntry, Question, QuestionId, QuizId, QuizResult, QuizSummary, ResultId, SessionId,
    TimerWindow,
};
use quiz_core::time::parse_timestamp;

use crate::error::BackendError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionDto {
    question_id: String,
    question: String,
    #[serde(default)]
    options: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimerDto {
    start_time: String,
    duration: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StartDto {
    session_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResultDto {
    #[serde(default)]
    name: String,
    #[serde(default)]
    quiz_name: String,
    #[serde(deserialize_with = "count")]
    total_questions: u32,
    score: f64,
    questions: Vec<String>,
    submitted_answers: Vec<String>,
    correct_answers: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryDto {
    session_id: String,
    result_id: String,
    #[serde(default)]
    quiz_title: String,
    #[serde(default)]
    quiz_description: String,
    score: f64,
    #[serde(deserialize_with = "count")]
    total_questions: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuizDto {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    start_time: String,
    end_time: String,
    #[serde(deserialize_with = "count")]
    total_marks: u32,
    #[serde(deserialize_with = "count")]
    total_questions: u32,
}

// Counts arrive as JSON numbers or as numeric strings ("10").
fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Text(String),
    }

    let value = match Repr::deserialize(deserializer)? {
        Repr::Int(n) => n,
        Repr::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("expected a count, got {s:?}")))?,
    };
    u32::try_from(value).map_err(|_| de::Error::custom(format!("count {value} out of range")))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, BackendError> {
    serde_json::from_str(body).map_err(|err| BackendError::Decode(err.to_string()))
}

pub(crate) fn decode_questions(body: &str) -> Result<Vec<Question>, BackendError> {
    let dtos: Vec<QuestionDto> = decode(body)?;
    dtos.into_iter()
        .map(|dto| -> Result<Question, BackendError> {
            let id = QuestionId::new(dto.question_id).map_err(quiz_core::Error::from)?;
            Ok(Question::new(id, dto.question, dto.options))
        })
        .collect()
}

pub(crate) fn decode_timer(body: &str) -> Result<TimerWindow, BackendError> {
    let dto: TimerDto = decode(body)?;
    let started_at = parse_timestamp(&dto.start_time).map_err(quiz_core::Error::from)?;
    let window = TimerWindow::new(started_at, dto.duration).map_err(quiz_core::Error::from)?;
    Ok(window)
}

pub(crate) fn decode_session_id(body: &str) -> Result<SessionId, BackendError> {
    let dto: StartDto = decode(body)?;
    Ok(SessionId::new(dto.session_id).map_err(quiz_core::Error::from)?)
}

pub(crate) fn decode_result(body: &str) -> Result<QuizResult, BackendError> {
    let dto: ResultDto = decode(body)?;
    Ok(QuizResult {
        name: dto.name,
        quiz_name: dto.quiz_name,
        total_questions: dto.total_questions,
        score: dto.score,
        questions: dto.questions,
        submitted_answers: dto.submitted_answers,
        correct_answers: dto.correct_answers,
    })
}

pub(crate) fn decode_history(body: &str) -> Result<Vec<HistoryEntry>, BackendError> {
    let dtos: Vec<HistoryDto> = decode(body)?;
    dtos.into_iter()
        .map(|dto| -> Result<HistoryEntry, BackendError> {
            Ok(HistoryEntry {
                session_id: SessionId::new(dto.session_id).map_err(quiz_core::Error::from)?,
                result_id: ResultId::new(dto.result_id).map_err(quiz_core::Error::from)?,
                quiz_title: dto.quiz_title,
                quiz_description: dto.quiz_description,
                score: dto.score,
                total_questions: dto.total_questions,
            })
        })
        .collect()
}

pub(crate) fn decode_quizzes(body: &str) -> Result<Vec<QuizSummary>, BackendError> {
    let dtos: Vec<QuizDto> = decode(body)?;
    dtos.into_iter()
        .map(|dto| -> Result<QuizSummary, BackendError> {
            Ok(QuizSummary {
                id: QuizId::new(dto.id).map_err(quiz_core::Error::from)?,
                title: dto.title,
                description: dto.description,
                start_time: parse_timestamp(&dto.start_time).map_err(quiz_core::Error::from)?,
                end_time: parse_timestamp(&dto.end_time).map_err(quiz_core::Error::from)?,
                total_marks: dto.total_marks,
                total_questions: dto.total_questions,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    #[test]
    fn decodes_questions_in_order() {
        let body = r#"[
            {"questionId": "q1", "question": "2 + 2?", "options": ["3", "4"]},
            {"questionId": "q2", "question": "Capital of France?", "options": ["Paris"]}
        ]"#;
        let questions = decode_questions(body).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id().as_str(), "q1");
        assert_eq!(questions[0].options(), ["3", "4"]);
        assert_eq!(questions[1].prompt(), "Capital of France?");
    }

    #[test]
    fn unparsable_questions_body_is_decode_error() {
        assert!(matches!(
            decode_questions("<html>oops</html>"),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn blank_question_id_is_rejected() {
        let body = r#"[{"questionId": " ", "question": "?", "options": []}]"#;
        assert!(matches!(decode_questions(body), Err(BackendError::Invalid(_))));
    }

    #[test]
    fn decodes_timer_window() {
        let body = r#"{"startTime": "2023-11-14T22:13:20Z", "duration": 10}"#;
        let window = decode_timer(body).unwrap();
        assert_eq!(window.started_at(), fixed_now());
        assert_eq!(window.total_secs(), 600);
    }

    #[test]
    fn timer_with_bad_timestamp_is_rejected() {
        let body = r#"{"startTime": "soon", "duration": 10}"#;
        assert!(matches!(decode_timer(body), Err(BackendError::Invalid(_))));
    }

    #[test]
    fn decodes_session_id() {
        let id = decode_session_id(r#"{"sessionId": "abc"}"#).unwrap();
        assert_eq!(id.as_str(), "abc");
    }

    #[test]
    fn result_accepts_string_counts() {
        let body = r#"{
            "name": "Ada", "quizName": "Basics", "totalQuestions": "3", "score": 4,
            "questions": ["a", "b", "c"],
            "submittedAnswers": ["x", "y", "z"],
            "correctAnswers": ["x", "n", "z"]
        }"#;
        let result = decode_result(body).unwrap();
        assert_eq!(result.total_questions, 3);
        assert_eq!(result.max_marks(), 6);
    }

    #[test]
    fn result_without_answers_is_invalid() {
        let body = r#"{"name": "Ada", "quizName": "Basics", "totalQuestions": 3, "score": 4,
            "questions": ["a"]}"#;
        assert!(matches!(decode_result(body), Err(BackendError::Decode(_))));
    }

    #[test]
    fn history_must_be_an_array() {
        assert!(matches!(
            decode_history(r#"{"error": "nope"}"#),
            Err(BackendError::Decode(_))
        ));
        let body = r#"[{"sessionId": "s1", "resultId": "r1", "quizTitle": "T",
            "quizDescription": "D", "score": 6, "totalQuestions": "5"}]"#;
        let history = decode_history(body).unwrap();
        assert_eq!(history[0].result_id.as_str(), "r1");
        assert_eq!(history[0].total_questions, 5);
    }

    #[test]
    fn decodes_catalog_with_offsetless_times() {
        // Local wall-clock times: a day of slack on either side of `fixed_now`.
        let body = r#"[{"id": "q1", "title": "Rust", "description": "",
            "startTime": "2023-11-13T00:00:00", "endTime": "2023-11-16T00:00:00",
            "totalMarks": "20", "totalQuestions": 10}]"#;
        let quizzes = decode_quizzes(body).unwrap();
        assert_eq!(quizzes[0].total_marks, 20);
        assert_eq!(
            quizzes[0].end_time,
            parse_timestamp("2023-11-16T00:00:00").unwrap()
        );
        assert!(quizzes[0].is_active(fixed_now()));
    }
}
