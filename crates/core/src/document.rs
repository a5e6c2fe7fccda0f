//! Document and DocumentSet — the evidence model.
//!
//! A `Document` is one transcript excerpt returned by the index, immutable
//! once constructed. A `DocumentSet` is the ordered evidence for one query:
//! deduplicated by id (keeping the best score), sorted by descending score at
//! creation, and only ever shrunk afterward by the relevance grader.

use serde::{Deserialize, Serialize};

/// One retrieved transcript excerpt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Point id in the index
    pub id: String,

    /// Episode title
    #[serde(default)]
    pub title: String,

    /// Subtopic within the episode
    #[serde(default)]
    pub subtopic: String,

    /// Speakers heard in this excerpt
    #[serde(default)]
    pub speakers: Vec<String>,

    /// Position in the episode, e.g. "02:16:41"
    #[serde(default)]
    pub timestamp: String,

    /// Source URL (timestamped video link)
    #[serde(default)]
    pub url: String,

    /// The transcript text
    pub content: String,

    /// Relevance score assigned by the index. Used only for ordering and
    /// deduplication at retrieval time, never reconsulted afterward.
    pub score: f32,
}

impl Document {
    /// Render this document as a markdown excerpt for prompts.
    pub fn to_markdown(&self) -> String {
        format!(
            "**Document**:\n\
             - **Title**: {}\n\
             - **Subtopic**: {}\n\
             - **Speakers**: {}\n\
             - **Timestamp**: {}\n\
             - **URL**: [{}]\n\n\
             **Content**:\n{}",
            self.title,
            self.subtopic,
            self.speakers.join(", "),
            self.timestamp,
            self.url,
            self.content,
        )
    }
}

/// The ordered evidence set for one query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    /// Build a set from raw index hits: deduplicate by id keeping the highest
    /// score, sort by descending score, truncate to `limit`.
    pub fn from_hits(hits: Vec<Document>, limit: usize) -> Self {
        use std::collections::HashMap;

        let mut best: HashMap<String, Document> = HashMap::new();
        for doc in hits {
            match best.get(&doc.id) {
                Some(existing) if existing.score >= doc.score => {}
                _ => {
                    best.insert(doc.id.clone(), doc);
                }
            }
        }

        let mut documents: Vec<Document> = best.into_values().collect();
        documents.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        documents.truncate(limit);

        Self { documents }
    }

    /// Build a set from documents that already passed grading.
    ///
    /// Keeps the given order (a graded set is a subset of a `from_hits` set,
    /// so it is already sorted).
    pub fn from_graded(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn as_slice(&self) -> &[Document] {
        &self.documents
    }

    /// Render the whole set as prompt evidence, one markdown excerpt per
    /// document separated by blank lines.
    pub fn render_evidence(&self) -> String {
        self.documents
            .iter()
            .map(Document::to_markdown)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
