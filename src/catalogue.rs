use crate::error::{QuizError, Result};
use crate::models::{Answer, QuestionRecord};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Catalogue entry as published: `{ "texte": ..., "reponses": [{ "correct": .. }] }`.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    texte: String,
    #[serde(default)]
    reponses: Vec<Answer>,
}

/// Every question available for the session, indexed by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    questions: Vec<QuestionRecord>,
}

impl Catalogue {
    pub fn new(questions: Vec<QuestionRecord>) -> Self {
        Self { questions }
    }

    /// Parses the catalogue JSON array. Identifiers are array positions.
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: Vec<RawQuestion> = serde_json::from_str(content)?;
        let questions = raw
            .into_iter()
            .enumerate()
            .map(|(identifier, q)| QuestionRecord {
                identifier,
                text: q.texte,
                answers: q.reponses,
            })
            .collect();
        Ok(Self { questions })
    }

    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let catalogue = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), count = catalogue.len(), "catalogue loaded from file");
        Ok(catalogue)
    }

    pub fn get(&self, identifier: usize) -> Option<&QuestionRecord> {
        self.questions.get(identifier)
    }

    pub fn require(&self, identifier: usize) -> Result<&QuestionRecord> {
        self.get(identifier)
            .ok_or(QuizError::UnknownQuestion(identifier))
    }

    pub fn contains(&self, identifier: usize) -> bool {
        identifier < self.questions.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionRecord> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Downloads a plain text document (catalogue or preamble).
pub async fn fetch_text(url: &str, timeout: Duration) -> Result<String> {
    let http_err = |source| QuizError::Http {
        url: url.to_string(),
        source,
    };

    let client = reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(http_err)?;

    client
        .get(url)
        .send()
        .await
        .and_then(|resp| resp.error_for_status())
        .map_err(http_err)?
        .text()
        .await
        .map_err(http_err)
}

pub async fn fetch_catalogue(url: &str, timeout: Duration) -> Result<Catalogue> {
    let body = fetch_text(url, timeout).await?;
    let catalogue = Catalogue::from_json(&body)?;
    tracing::info!(url, count = catalogue.len(), "catalogue downloaded");
    Ok(catalogue)
}
