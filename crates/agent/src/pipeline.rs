//! The RAG control loop — retrieve, grade, generate, verify, requery.
//!
//! # State machine
//!
//! ```text
//! RETRIEVE → GRADE_DOCS → {REQUERY_EMPTY | GENERATE}
//! GENERATE → SCORE_GROUNDEDNESS → {REQUERY_UNGROUNDED | SCORE_RELEVANCE}
//! SCORE_RELEVANCE → {REQUERY_IRRELEVANT | DONE}
//! ```
//!
//! Three independent retry budgets drive the requery paths:
//! - empty graded set → rewrite the query, restart the outer cycle
//! - ungrounded answer → rewrite the caller's query, regenerate with the
//!   same evidence (no re-retrieve)
//! - off-topic answer → rewrite the query, restart the outer cycle
//!   (the one path that re-retrieves)
//!
//! The loop is iterative, never recursive: the outer `for` is capped at the
//! worst-case number of restarts the budgets allow, so termination does not
//! depend on the counters being reset correctly. Budget exhaustion degrades
//! to the best current answer instead of erroring; transport errors from any
//! collaborator surface only at `execute`, which converts them to a
//! diagnostic answer string.

use crate::generate::AnswerGenerator;
use crate::grading::Grader;
use crate::rewrite::QueryRewriter;
use podchat_core::document::DocumentSet;
use podchat_core::error::{Error, Result};
use podchat_core::retrieval::Retriever;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One top-level pipeline invocation.
#[derive(Debug, Clone)]
pub struct RagRequest {
    /// The user's question.
    pub query: String,

    /// Classified intent, forwarded to the generator.
    pub intent: String,

    /// Target emotion for the reply.
    pub emotion: String,

    /// Summarized conversation facts.
    pub history: String,
}

/// Per-call retry counters, one per failure class.
///
/// Constructed fresh inside every `execute` call: budgets are never shared
/// between invocations, so concurrent sessions cannot drain each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    pub retrieval: u32,
    pub groundedness: u32,
    pub answer_relevance: u32,
}

impl RetryBudget {
    pub fn new(retries: u32) -> Self {
        Self {
            retrieval: retries,
            groundedness: retries,
            answer_relevance: retries,
        }
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(3)
    }
}

/// The retrieval-grading-generation-verification cycle.
pub struct RagPipeline {
    retriever: Arc<dyn Retriever>,
    grader: Grader,
    rewriter: QueryRewriter,
    generator: AnswerGenerator,
    retrieve_limit: usize,
    max_retries: u32,
}

impl RagPipeline {
    pub fn new(
        retriever: Arc<dyn Retriever>,
        grader: Grader,
        rewriter: QueryRewriter,
        generator: AnswerGenerator,
    ) -> Self {
        Self {
            retriever,
            grader,
            rewriter,
            generator,
            retrieve_limit: 5,
            max_retries: 3,
        }
    }

    /// Documents fetched per retrieval round.
    pub fn with_retrieve_limit(mut self, limit: usize) -> Self {
        self.retrieve_limit = limit;
        self
    }

    /// Retry budget per failure class.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Run the full cycle. Never returns an error: any component failure is
    /// converted to a diagnostic answer string.
    pub async fn execute(&self, request: RagRequest) -> String {
        info!(query_len = request.query.len(), "RAG: starting cycle");
        match self.run(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "RAG cycle failed");
                format!("An error occurred: {e}")
            }
        }
    }

    async fn run(&self, request: &RagRequest) -> Result<String> {
        // Scoped to this call alone.
        let mut budget = RetryBudget::new(self.max_retries);
        let mut query = request.query.clone();

        // Worst case: every retrieval retry plus every relevance retry
        // restarts the outer cycle once.
        let max_rounds = 2 * self.max_retries as usize + 1;
        let mut last_answer: Option<String> = None;

        for round in 0..max_rounds {
            // RETRIEVE
            let retrieved = self.retriever.retrieve(&query, self.retrieve_limit).await?;
            debug!(round, retrieved = retrieved.len(), "Retrieved documents");

            // GRADE_DOCS — every document judged independently
            let mut kept = Vec::with_capacity(retrieved.len());
            for document in retrieved.iter() {
                if self.grader.grade_document(&query, document).await?.is_yes() {
                    kept.push(document.clone());
                }
            }

            if kept.is_empty() && budget.retrieval > 0 {
                budget.retrieval -= 1;
                query = self.rewriter.rewrite(&query).await?;
                info!(
                    remaining = budget.retrieval,
                    "No relevant documents, requerying"
                );
                continue;
            }

            // One value serves both generation and the groundedness check,
            // so the scored evidence and the generation evidence are always
            // identical. Empty when the retrieval budget ran dry: degraded,
            // best-effort generation.
            let evidence = DocumentSet::from_graded(kept);
            debug!(round, evidence = evidence.len(), "Graded documents");

            // GENERATE → SCORE_GROUNDEDNESS sub-cycle (no re-retrieve)
            let mut answer = self
                .generator
                .generate(
                    &query,
                    &request.intent,
                    &request.emotion,
                    &evidence,
                    &request.history,
                )
                .await?;

            while !self
                .grader
                .grade_groundedness(&evidence, &answer)
                .await?
                .is_yes()
                && budget.groundedness > 0
            {
                budget.groundedness -= 1;
                // The caller's query is rewritten, not the already-rewritten
                // one: the sub-cycle discards the work so far and starts the
                // generation over.
                query = self.rewriter.rewrite(&request.query).await?;
                info!(
                    remaining = budget.groundedness,
                    "Answer not grounded, regenerating"
                );
                answer = self
                    .generator
                    .generate(
                        &query,
                        &request.intent,
                        &request.emotion,
                        &evidence,
                        &request.history,
                    )
                    .await?;
            }

            // SCORE_RELEVANCE — judged against the caller's original query
            if !self
                .grader
                .grade_answer(&answer, &request.query)
                .await?
                .is_yes()
                && budget.answer_relevance > 0
            {
                budget.answer_relevance -= 1;
                query = self.rewriter.rewrite(&query).await?;
                last_answer = Some(answer);
                info!(
                    remaining = budget.answer_relevance,
                    "Answer off-topic, restarting cycle"
                );
                continue;
            }

            return Ok(answer);
        }

        // Only reachable if the budget accounting is broken; prefer the best
        // answer seen over an error.
        warn!("RAG cycle hit the iteration cap");
        last_answer.ok_or_else(|| Error::Internal("retry cap exceeded with no answer".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    const YES: &str = r#"{"binary_score": "yes"}"#;
    const NO: &str = r#"{"binary_score": "no"}"#;

    struct Mocks {
        grader: Arc<SequentialMockProvider>,
        rewriter: Arc<SequentialMockProvider>,
        generator: Arc<SequentialMockProvider>,
    }

    fn pipeline(retriever: Arc<dyn Retriever>, mocks: &Mocks) -> RagPipeline {
        RagPipeline::new(
            retriever,
            Grader::new(mocks.grader.clone(), "grader-model"),
            QueryRewriter::new(mocks.rewriter.clone(), "rewriter-model"),
            AnswerGenerator::new(mocks.generator.clone(), "generator-model"),
        )
    }

    fn request(query: &str) -> RagRequest {
        RagRequest {
            query: query.into(),
            intent: "Information Request".into(),
            emotion: "Neutral".into(),
            history: "No facts available".into(),
        }
    }

    fn five_docs() -> Vec<podchat_core::document::Document> {
        vec![
            make_doc("d1", "the host covered inflation at minute twelve", 0.9),
            make_doc("d2", "sports recap", 0.8),
            make_doc("d3", "sponsor read", 0.7),
            make_doc("d4", "listener mail", 0.6),
            make_doc("d5", "weather chat", 0.5),
        ]
    }

    #[tokio::test]
    async fn happy_path_single_generation() {
        let retriever = Arc::new(FixedRetriever::new(five_docs()));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, NO, NO, NO, NO, // document grades
                YES, // groundedness
                YES, // answer relevance
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec![])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec![
                "Alice got into that at [(00:12:03)](https://youtube.com/watch?v=abc&t=723).",
            ])),
        };

        let answer = pipeline(retriever.clone(), &mocks)
            .execute(request(
                "What did the host say about inflation at minute 12?",
            ))
            .await;

        assert!(answer.contains("00:12:03"));
        assert_eq!(retriever.call_count(), 1);
        assert_eq!(mocks.generator.call_count(), 1);
        assert_eq!(mocks.rewriter.call_count(), 0);
    }

    #[tokio::test]
    async fn graded_evidence_is_a_subset_of_retrieved() {
        let retriever = Arc::new(FixedRetriever::new(five_docs()));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, NO, NO, NO, NO, YES, YES,
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec![])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec!["answer"])),
        };

        pipeline(retriever, &mocks).execute(request("inflation?")).await;

        // The generator saw only the surviving document
        let generation = &mocks.generator.requests()[0].messages[1].content;
        assert!(generation.contains("inflation at minute twelve"));
        assert!(!generation.contains("sports recap"));

        // The groundedness grader saw exactly the same evidence
        let groundedness = &mocks.grader.requests()[5].messages[1].content;
        assert!(groundedness.contains("inflation at minute twelve"));
        assert!(!groundedness.contains("sports recap"));
    }

    #[tokio::test]
    async fn empty_graded_set_requeries_then_degrades() {
        let retriever = Arc::new(FixedRetriever::new(vec![
            make_doc("d1", "content one", 0.9),
            make_doc("d2", "content two", 0.8),
        ]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                NO, NO, // round 1 document grades
                NO, NO, // round 2
                NO, NO, // round 3
                NO, NO, // round 4 (budget exhausted, proceeds anyway)
                YES, // groundedness of the degraded answer
                YES, // answer relevance
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec!["q2", "q3", "q4"])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec![
                "I couldn't find that in the show, sorry!",
            ])),
        };

        let answer = pipeline(retriever.clone(), &mocks)
            .execute(request("original query"))
            .await;

        // Exactly 3 rewrite+re-retrieve cycles, then a 4th degraded round
        assert_eq!(retriever.call_count(), 4);
        assert_eq!(
            retriever.queries(),
            vec!["original query", "q2", "q3", "q4"]
        );
        assert_eq!(mocks.rewriter.call_count(), 3);
        assert_eq!(mocks.generator.call_count(), 1);

        // The requery chain feeds each rewritten query back into the rewriter
        let rewrites = mocks.rewriter.requests();
        assert!(rewrites[0].messages[1].content.contains("original query"));
        assert!(rewrites[1].messages[1].content.contains("q2"));
        assert!(rewrites[2].messages[1].content.contains("q3"));

        // Generation ran with an empty evidence set
        let generation = &mocks.generator.requests()[0].messages[1].content;
        assert!(!generation.contains("content one"));
        assert_eq!(answer, "I couldn't find that in the show, sorry!");
    }

    #[tokio::test]
    async fn groundedness_retries_regenerate_without_re_retrieving() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, // document grade
                NO, NO, YES, // groundedness: two failures, then grounded
                YES, // answer relevance
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec!["g2", "g3"])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec!["a1", "a2", "a3"])),
        };

        let answer = pipeline(retriever.clone(), &mocks)
            .execute(request("the question"))
            .await;

        // 1 initial + 2 retries, all against the single retrieval
        assert_eq!(answer, "a3");
        assert_eq!(mocks.generator.call_count(), 3);
        assert_eq!(retriever.call_count(), 1);

        // Groundedness retries rewrite the caller's query, not the chain
        let rewrites = mocks.rewriter.requests();
        assert!(rewrites[0].messages[1].content.contains("the question"));
        assert!(rewrites[1].messages[1].content.contains("the question"));
    }

    #[tokio::test]
    async fn groundedness_exhaustion_returns_best_effort() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, // document grade
                NO, NO, NO, NO, // groundedness never passes; budget is 3
                YES, // answer relevance accepts the known-ungrounded answer
            ])),
            rewriter: Arc::new(SequentialMockProvider::repeating("rewritten")),
            generator: Arc::new(SequentialMockProvider::from_texts(vec![
                "a1", "a2", "a3", "a4",
            ])),
        };

        let answer = pipeline(retriever, &mocks).execute(request("q")).await;

        assert_eq!(answer, "a4");
        assert_eq!(mocks.generator.call_count(), 4);
    }

    #[tokio::test]
    async fn irrelevant_answer_restarts_the_whole_cycle() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, YES, NO, // round 1: relevant, grounded, off-topic
                YES, YES, YES, // round 2: accepted
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec!["q2"])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec!["a1", "a2"])),
        };

        let answer = pipeline(retriever.clone(), &mocks).execute(request("q")).await;

        assert_eq!(answer, "a2");
        assert_eq!(retriever.call_count(), 2);
        assert_eq!(retriever.queries()[1], "q2");
        assert_eq!(mocks.generator.call_count(), 2);
    }

    #[tokio::test]
    async fn relevance_exhaustion_returns_the_last_answer() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES, YES, NO, // round 1
                YES, YES, NO, // round 2
                YES, YES, NO, // round 3
                YES, YES, NO, // round 4: budget exhausted, returned anyway
            ])),
            rewriter: Arc::new(SequentialMockProvider::repeating("rewritten")),
            generator: Arc::new(SequentialMockProvider::from_texts(vec![
                "a1", "a2", "a3", "a4",
            ])),
        };

        let answer = pipeline(retriever.clone(), &mocks).execute(request("q")).await;

        assert_eq!(answer, "a4");
        assert_eq!(retriever.call_count(), 4);
        assert_eq!(mocks.rewriter.call_count(), 3);
    }

    #[tokio::test]
    async fn generation_count_stays_bounded_when_everything_fails() {
        let retriever = Arc::new(FixedRetriever::new(vec![
            make_doc("d1", "content one", 0.9),
            make_doc("d2", "content two", 0.8),
        ]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::repeating(NO)),
            rewriter: Arc::new(SequentialMockProvider::repeating("rewritten")),
            generator: Arc::new(SequentialMockProvider::repeating("best effort")),
        };

        let answer = pipeline(retriever.clone(), &mocks).execute(request("q")).await;

        // Still answers, and well under the 4x4x4 generation ceiling
        assert_eq!(answer, "best effort");
        assert!(mocks.generator.call_count() <= 64);
        assert_eq!(mocks.generator.call_count(), 7);
        assert_eq!(retriever.call_count(), 7);
    }

    #[tokio::test]
    async fn sequential_calls_each_get_fresh_budgets() {
        let retriever = Arc::new(FixedRetriever::new(vec![
            make_doc("d1", "content one", 0.9),
            make_doc("d2", "content two", 0.8),
        ]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::repeating(NO)),
            rewriter: Arc::new(SequentialMockProvider::repeating("rewritten")),
            generator: Arc::new(SequentialMockProvider::repeating("best effort")),
        };
        let pipeline = pipeline(retriever.clone(), &mocks);

        pipeline.execute(request("q")).await;
        let after_first = mocks.generator.call_count();

        pipeline.execute(request("q")).await;
        let after_second = mocks.generator.call_count();

        // Call 2 burned exactly as much budget as call 1
        assert_eq!(after_first, 7);
        assert_eq!(after_second - after_first, after_first);
    }

    #[tokio::test]
    async fn malformed_groundedness_output_triggers_a_retry() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![
                YES,                            // document grade
                "groundedness looks fine to me", // malformed: treated as no
                YES,                            // retry passes
                YES,                            // answer relevance
            ])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec!["g2"])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec!["a1", "a2"])),
        };

        let answer = pipeline(retriever, &mocks).execute(request("q")).await;

        assert_eq!(answer, "a2");
        assert_eq!(mocks.generator.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_retriever_yields_diagnostic_string() {
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::from_texts(vec![])),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec![])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec![])),
        };

        let answer = pipeline(Arc::new(FailingRetriever), &mocks)
            .execute(request("q"))
            .await;

        assert!(answer.starts_with("An error occurred:"));
        assert!(answer.contains("connection refused"));
    }

    #[tokio::test]
    async fn zero_retries_runs_a_single_pass() {
        let retriever = Arc::new(FixedRetriever::new(vec![make_doc("d1", "facts", 0.9)]));
        let mocks = Mocks {
            grader: Arc::new(SequentialMockProvider::repeating(NO)),
            rewriter: Arc::new(SequentialMockProvider::from_texts(vec![])),
            generator: Arc::new(SequentialMockProvider::from_texts(vec!["only answer"])),
        };

        let answer = pipeline(retriever.clone(), &mocks)
            .with_max_retries(0)
            .execute(request("q"))
            .await;

        assert_eq!(answer, "only answer");
        assert_eq!(retriever.call_count(), 1);
        assert_eq!(mocks.rewriter.call_count(), 0);
    }
}
