/*!
 * Comprehension quizzes for finished videos.
 *
 * After a render is archived as `posted/NNN.mp4`, a multiple-choice quiz about
 * its script is generated and saved as `quizzes/NNN.json`. Model output is
 * validated and retried a bounded number of times.
 */

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::QuizError;
use crate::file_utils::FileManager;
use crate::providers::{strip_code_fences, TextGenerator};
use crate::script::VoicedScript;

/// Number of answer choices per question
pub const CHOICES_PER_QUESTION: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub choices: Vec<String>,
    /// Position of the correct answer in `choices`
    pub correct_index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default)]
    pub topic: String,
    /// File name of the video the quiz belongs to
    #[serde(default)]
    pub video: String,
    pub questions: Vec<QuizQuestion>,
}

impl Quiz {
    /// Check the structure the frontend relies on
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.questions.is_empty() {
            return Err("quiz has no questions".to_string());
        }
        for (i, q) in self.questions.iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(format!("question {} is empty", i));
            }
            if q.choices.len() != CHOICES_PER_QUESTION {
                return Err(format!(
                    "question {} has {} choices, expected {}",
                    i,
                    q.choices.len(),
                    CHOICES_PER_QUESTION
                ));
            }
            if q.correct_index >= q.choices.len() {
                return Err(format!("question {} has correct_index {} out of range", i, q.correct_index));
            }
        }
        Ok(())
    }

    /// Write the quiz as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize quiz")?;
        FileManager::write_to_file(path, &json)
    }
}

/// Build the quiz prompt for a voiced script
pub fn build_quiz_prompt(script: &VoicedScript, video_filename: &str, question_count: usize) -> String {
    let topic = &script.topic;
    let transcript = script.transcript();

    format!(
        r#"Create exactly {question_count} multiple choice questions based on this educational script.

Topic: {topic}

Script:
{transcript}

Requirements:
- Each question must have 4 choices
- Only one correct answer
- The correct answer must be randomly positioned among the 4 choices
- DO NOT always put the correct answer at index 0
- Return correct_index matching the correct choice position
- Return ONLY valid JSON

Format:
{{
  "topic": "{topic}",
  "video": "{video_filename}",
  "questions": [
    {{
      "question": "text",
      "choices": ["A", "B", "C", "D"],
      "correct_index": 2
    }}
  ]
}}
"#
    )
}

/// Ask `generator` for a quiz until a valid one comes back
///
/// Provider failures, empty answers and invalid JSON each use up one attempt.
pub async fn generate_quiz_with_retry(
    generator: &dyn TextGenerator,
    prompt: &str,
    temperature: f32,
    max_attempts: u32,
) -> std::result::Result<Quiz, QuizError> {
    if max_attempts == 0 {
        return Err(QuizError::NoAttempts);
    }

    for attempt in 1..=max_attempts {
        info!("Generating quiz (attempt {}/{})", attempt, max_attempts);

        let raw = match generator.generate(prompt, temperature).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Quiz request failed: {}", e);
                continue;
            }
        };

        let text = strip_code_fences(&raw);
        if text.is_empty() {
            warn!("No text returned, retrying");
            continue;
        }

        let quiz: Quiz = match serde_json::from_str(text) {
            Ok(quiz) => quiz,
            Err(e) => {
                warn!("Invalid quiz JSON returned: {}", e);
                continue;
            }
        };

        match quiz.validate() {
            Ok(()) => return Ok(quiz),
            Err(reason) => warn!("Quiz rejected: {}", reason),
        }
    }

    Err(QuizError::AttemptsExhausted {
        attempts: max_attempts,
    })
}

/// Quiz file matching an archived video: `posted/002.mp4` -> `quizzes/002.json`
pub fn quiz_path_for<P1: AsRef<Path>, P2: AsRef<Path>>(video: P1, quizzes_dir: P2) -> PathBuf {
    let stem = video
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "quiz".to_string());
    quizzes_dir.as_ref().join(format!("{}.json", stem))
}

/// Generate and save the quiz for an archived video
pub async fn write_quiz_for_video(
    generator: &dyn TextGenerator,
    script: &VoicedScript,
    video: &Path,
    quizzes_dir: &Path,
    question_count: usize,
    temperature: f32,
    max_attempts: u32,
) -> Result<PathBuf> {
    let video_filename = video
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prompt = build_quiz_prompt(script, &video_filename, question_count);
    let mut quiz = generate_quiz_with_retry(generator, &prompt, temperature, max_attempts).await?;
    if quiz.video.is_empty() {
        quiz.video = video_filename;
    }

    let path = quiz_path_for(video, quizzes_dir);
    quiz.save(&path)?;
    info!("Quiz saved to {:?}", path);
    Ok(path)
}
