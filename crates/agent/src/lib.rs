//! The RAG control loop — the heart of podchat.
//!
//! One top-level call runs the **retrieve → grade → generate → verify**
//! cycle:
//!
//! 1. **Retrieve** candidate transcript excerpts for the query
//! 2. **Grade** each document for relevance, keeping only the pertinent ones
//! 3. **Generate** a grounded answer from the surviving evidence
//! 4. **Verify** the answer twice: is it grounded in the evidence, and does
//!    it address the question
//!
//! Each failure class (no relevant documents, ungrounded answer, off-topic
//! answer) has its own retry budget. A failed gate rewrites the query and
//! re-enters the cycle at the right place; an exhausted budget degrades to
//! best-effort instead of erroring. The budgets live inside one call — two
//! concurrent sessions can never share or leak them.

pub mod generate;
pub mod grading;
pub mod pipeline;
pub mod prompts;
pub mod rewrite;
pub mod router;

pub use generate::AnswerGenerator;
pub use grading::Grader;
pub use pipeline::{RagPipeline, RagRequest, RetryBudget};
pub use rewrite::QueryRewriter;
pub use router::{RouteClassifier, RouteDecision};

#[cfg(test)]
pub(crate) mod test_helpers;
