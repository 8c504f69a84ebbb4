//! Consensus detection over one round's responses.

use super::rule::ConsensusRule;
use super::similarity::{normalize_text, similarity};
use crate::debate::entities::Response;
use serde::{Deserialize, Serialize};

/// Outcome of checking a round for convergence
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusVerdict {
    /// Whether the round converged under the active rule
    pub reached: bool,
    /// Lowest similarity among scored pairs, if any pair was scored
    pub lowest_similarity: Option<f64>,
}

impl ConsensusVerdict {
    fn trivial() -> Self {
        Self {
            reached: true,
            lowest_similarity: None,
        }
    }

    fn blocked_by_error() -> Self {
        Self {
            reached: false,
            lowest_similarity: None,
        }
    }
}

/// Applies a [`ConsensusRule`] with a similarity threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusDetector {
    rule: ConsensusRule,
    threshold: f64,
}

impl ConsensusDetector {
    pub fn new(rule: ConsensusRule, threshold: f64) -> Self {
        Self { rule, threshold }
    }

    pub fn rule(&self) -> ConsensusRule {
        self.rule
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score a round and decide whether it converged
    pub fn evaluate(&self, responses: &[Response]) -> ConsensusVerdict {
        if responses.len() < 2 {
            return ConsensusVerdict::trivial();
        }
        match self.rule {
            ConsensusRule::Pairwise => self.evaluate_pairwise(responses),
            ConsensusRule::Majority {
                min_agreement_ratio,
            } => self.evaluate_majority(responses, min_agreement_ratio),
        }
    }

    fn evaluate_pairwise(&self, responses: &[Response]) -> ConsensusVerdict {
        if responses.iter().any(Response::is_error) {
            return ConsensusVerdict::blocked_by_error();
        }
        let texts: Vec<String> = responses.iter().map(|r| normalize_text(&r.text)).collect();

        let mut lowest = f64::INFINITY;
        for i in 0..texts.len() {
            for j in (i + 1)..texts.len() {
                lowest = lowest.min(similarity(&texts[i], &texts[j]));
            }
        }

        ConsensusVerdict {
            reached: lowest >= self.threshold,
            lowest_similarity: Some(lowest),
        }
    }

    fn evaluate_majority(&self, responses: &[Response], min_ratio: f64) -> ConsensusVerdict {
        let texts: Vec<Option<String>> = responses
            .iter()
            .map(|r| (!r.error).then(|| normalize_text(&r.text)))
            .collect();
        let n = texts.len();

        // supporters[i] counts responses agreeing with i, itself included
        let mut supporters: Vec<usize> = texts.iter().map(|t| usize::from(t.is_some())).collect();
        let mut lowest: Option<f64> = None;

        for i in 0..n {
            for j in (i + 1)..n {
                let (Some(a), Some(b)) = (&texts[i], &texts[j]) else {
                    continue;
                };
                let score = similarity(a, b);
                lowest = Some(lowest.map_or(score, |l| l.min(score)));
                if score >= self.threshold {
                    supporters[i] += 1;
                    supporters[j] += 1;
                }
            }
        }

        let best = supporters.into_iter().max().unwrap_or(0);
        ConsensusVerdict {
            reached: best as f64 / n as f64 >= min_ratio,
            lowest_similarity: lowest,
        }
    }
}

/// Pairwise consensus check.
///
/// True for fewer than two responses; false if any response is an error;
/// otherwise true iff every pair of normalized texts scores at least
/// `threshold`.
pub fn has_consensus(responses: &[Response], threshold: f64) -> bool {
    ConsensusDetector::new(ConsensusRule::Pairwise, threshold)
        .evaluate(responses)
        .reached
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendId;

    fn ok(id: &str, text: &str) -> Response {
        Response::success(BackendId::new(id), id, text)
    }

    fn failed(id: &str) -> Response {
        Response::failure(BackendId::new(id), id, "connection refused")
    }

    #[test]
    fn test_identical_normalized_texts_converge() {
        let responses = vec![ok("a", "4"), ok("b", " 4 "), ok("c", "4")];
        assert!(has_consensus(&responses, 0.85));
    }

    #[test]
    fn test_case_and_whitespace_are_ignored() {
        let responses = vec![
            ok("a", "The Answer  is\nFOUR"),
            ok("b", "the answer is four"),
        ];
        assert!(has_consensus(&responses, 1.0));
    }

    #[test]
    fn test_fewer_than_two_is_trivial() {
        assert!(has_consensus(&[], 0.85));
        assert!(has_consensus(&[ok("a", "anything")], 0.85));
        // A lone failed response is still trivially "agreed"
        assert!(has_consensus(&[failed("a")], 0.85));
    }

    #[test]
    fn test_error_blocks_consensus() {
        let responses = vec![ok("a", "4"), failed("b")];
        assert!(!has_consensus(&responses, 0.0));
    }

    #[test]
    fn test_single_outlier_blocks_pairwise() {
        let responses = vec![
            ok("a", "the answer is four"),
            ok("b", "the answer is four"),
            ok("c", "object oriented design is best for large teams"),
        ];
        assert!(!has_consensus(&responses, 0.85));
    }

    #[test]
    fn test_threshold_zero_accepts_anything_without_errors() {
        let responses = vec![ok("a", "abc"), ok("b", "xyz")];
        assert!(has_consensus(&responses, 0.0));
    }

    #[test]
    fn test_verdict_reports_lowest_similarity() {
        let detector = ConsensusDetector::new(ConsensusRule::Pairwise, 0.85);
        let verdict = detector.evaluate(&[ok("a", "abcd"), ok("b", "bcde"), ok("c", "abcd")]);
        assert!(!verdict.reached);
        assert_eq!(verdict.lowest_similarity, Some(0.75));
    }

    #[test]
    fn test_majority_tolerates_one_outlier() {
        let detector = ConsensusDetector::new(
            ConsensusRule::Majority {
                min_agreement_ratio: 0.6,
            },
            0.85,
        );
        let responses = vec![
            ok("a", "the answer is four"),
            ok("b", "the answer is four"),
            ok("c", "functional programming wins"),
        ];
        assert!(detector.evaluate(&responses).reached);

        let strict = ConsensusDetector::new(
            ConsensusRule::Majority {
                min_agreement_ratio: 0.8,
            },
            0.85,
        );
        assert!(!strict.evaluate(&responses).reached);
    }

    #[test]
    fn test_majority_errors_never_support() {
        let detector = ConsensusDetector::new(
            ConsensusRule::Majority {
                min_agreement_ratio: 0.5,
            },
            0.85,
        );
        let responses = vec![ok("a", "4"), failed("b"), failed("c")];
        // best group is {a}: 1/3 < 0.5
        assert!(!detector.evaluate(&responses).reached);

        let all_failed = vec![failed("a"), failed("b")];
        let verdict = detector.evaluate(&all_failed);
        assert!(!verdict.reached);
        assert_eq!(verdict.lowest_similarity, None);
    }
}
