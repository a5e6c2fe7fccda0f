//! Qdrant-compatible vector index over HTTP.
//!
//! Speaks the REST `points/search` API. Payload fields follow the transcript
//! ingestion schema: `title`, `subtopic`, `speakers`, `content`, `url`,
//! `timestamp`.

use async_trait::async_trait;
use podchat_core::document::Document;
use podchat_core::error::RetrievalError;
use podchat_core::retrieval::{FieldFilter, SearchIndex, SearchRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A Qdrant collection reachable over HTTP.
pub struct QdrantIndex {
    base_url: String,
    api_key: Option<String>,
    collection: String,
    client: reqwest::Client,
}

impl QdrantIndex {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        collection: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            collection: collection.into(),
            client,
        }
    }

    fn to_api_condition(filter: &FieldFilter) -> ApiCondition {
        match filter {
            FieldFilter::Match { key, value } => ApiCondition {
                key: key.clone(),
                r#match: ApiMatch::Value {
                    value: value.clone(),
                },
            },
            FieldFilter::MatchAny { key, values } => ApiCondition {
                key: key.clone(),
                r#match: ApiMatch::Any {
                    any: values.clone(),
                },
            },
            FieldFilter::Text { key, text } => ApiCondition {
                key: key.clone(),
                r#match: ApiMatch::Text { text: text.clone() },
            },
        }
    }

    fn to_api_body(request: &SearchRequest) -> ApiSearchBody {
        ApiSearchBody {
            vector: request.vector.clone(),
            limit: request.limit,
            with_payload: true,
            score_threshold: request.score_threshold,
            filter: ApiFilter {
                must: request.must.iter().map(Self::to_api_condition).collect(),
                should: request.should.iter().map(Self::to_api_condition).collect(),
            },
        }
    }

    fn to_document(hit: ApiHit) -> Document {
        let payload = hit.payload.unwrap_or_default();
        Document {
            id: hit.id.to_string_value(),
            title: payload.title.unwrap_or_default(),
            subtopic: payload.subtopic.unwrap_or_default(),
            speakers: payload.speakers.unwrap_or_default(),
            timestamp: payload.timestamp.unwrap_or_default(),
            url: payload.url.unwrap_or_default(),
            content: payload.content.unwrap_or_default(),
            score: hit.score,
        }
    }
}

#[async_trait]
impl SearchIndex for QdrantIndex {
    fn name(&self) -> &str {
        "qdrant"
    }

    async fn search(&self, request: SearchRequest) -> Result<Vec<Document>, RetrievalError> {
        let url = format!(
            "{}/collections/{}/points/search",
            self.base_url, self.collection
        );
        let body = Self::to_api_body(&request);

        debug!(
            collection = %self.collection,
            limit = request.limit,
            must = request.must.len(),
            should = request.should.len(),
            "Searching index"
        );

        let mut http_request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);

        if let Some(key) = &self.api_key {
            http_request = http_request.header("api-key", key.clone());
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| RetrievalError::Search(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Index returned error");
            return Err(RetrievalError::Search(format!(
                "index returned status {status}: {error_body}"
            )));
        }

        let api_response: ApiSearchResponse = response
            .json()
            .await
            .map_err(|e| RetrievalError::InvalidResponse(e.to_string()))?;

        Ok(api_response
            .result
            .into_iter()
            .map(Self::to_document)
            .collect())
    }
}

// --- Qdrant REST types (internal) ---

#[derive(Debug, Serialize)]
struct ApiSearchBody {
    vector: Vec<f32>,
    limit: usize,
    with_payload: bool,
    score_threshold: f32,
    filter: ApiFilter,
}

#[derive(Debug, Serialize)]
struct ApiFilter {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    must: Vec<ApiCondition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    should: Vec<ApiCondition>,
}

#[derive(Debug, Serialize)]
struct ApiCondition {
    key: String,
    r#match: ApiMatch,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiMatch {
    Value { value: String },
    Any { any: Vec<String> },
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct ApiSearchResponse {
    #[serde(default)]
    result: Vec<ApiHit>,
}

#[derive(Debug, Deserialize)]
struct ApiHit {
    id: ApiPointId,
    score: f32,
    #[serde(default)]
    payload: Option<ApiPayload>,
}

/// Qdrant point ids are either integers or UUID strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ApiPointId {
    Num(u64),
    Str(String),
}

impl ApiPointId {
    fn to_string_value(&self) -> String {
        match self {
            ApiPointId::Num(n) => n.to_string(),
            ApiPointId::Str(s) => s.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiPayload {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    subtopic: Option<String>,
    #[serde(default)]
    speakers: Option<Vec<String>>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}
