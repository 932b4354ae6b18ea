//! Entity detection result types.
//!
//! These mirror the JSON Lines documents the detection job writes into its
//! output archive, so field names stay in the service's PascalCase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A detected named-entity span within a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Entity {
    /// Character offset where the span starts.
    pub begin_offset: usize,
    /// Character offset one past the end of the span.
    pub end_offset: usize,
    /// Detection confidence in `0.0..=1.0`.
    pub score: f64,
    /// The matched text.
    pub text: String,
    /// Entity type label (e.g. "LOCATION", "PERSON").
    #[serde(rename = "Type")]
    pub kind: String,
}

impl Entity {
    pub fn new(text: impl Into<String>, kind: impl Into<String>, score: f64) -> Self {
        Self {
            begin_offset: 0,
            end_offset: 0,
            score,
            text: text.into(),
            kind: kind.into(),
        }
    }

    /// Set the character span.
    pub fn with_span(mut self, begin: usize, end: usize) -> Self {
        self.begin_offset = begin;
        self.end_offset = end;
        self
    }
}

/// Renders as `Text (Type): 0.990000`.
impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {:.6}", self.text, self.kind, self.score)
    }
}

/// All entities found in one input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DocumentResult {
    /// Source file name as recorded by the job.
    pub file: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl DocumentResult {
    pub fn new(file: impl Into<String>, entities: Vec<Entity>) -> Self {
        Self {
            file: file.into(),
            entities,
        }
    }

    /// Sort entities by descending score.
    ///
    /// The sort is stable, so equal scores keep their input order.
    pub fn rank(&mut self) {
        self.entities.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    /// Rank entities and return at most `limit` of the highest scoring.
    pub fn top(&mut self, limit: usize) -> &[Entity] {
        self.rank();
        let n = limit.min(self.entities.len());
        &self.entities[..n]
    }
}
