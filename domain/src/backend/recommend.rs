//! Local model recommendations by question domain.
//!
//! A keyword scan classifies the question, and each domain maps to a short
//! list of Ollama model families known to do well on it.

use serde::Serialize;

/// Subject area inferred from a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionDomain {
    Code,
    Math,
    Reasoning,
    Science,
    General,
}

/// Keywords checked in order; the first hit wins.
const KEYWORD_DOMAIN: &[(&str, QuestionDomain)] = &[
    ("python", QuestionDomain::Code),
    ("javascript", QuestionDomain::Code),
    ("algorithm", QuestionDomain::Code),
    ("optimize", QuestionDomain::Code),
    ("prove", QuestionDomain::Math),
    ("integral", QuestionDomain::Math),
    ("equation", QuestionDomain::Math),
    ("theorem", QuestionDomain::Math),
    ("reason", QuestionDomain::Reasoning),
    ("strategy", QuestionDomain::Reasoning),
    ("plan", QuestionDomain::Reasoning),
    ("biology", QuestionDomain::Science),
    ("physics", QuestionDomain::Science),
    ("chemistry", QuestionDomain::Science),
];

impl QuestionDomain {
    /// Classify a question by keyword
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();
        KEYWORD_DOMAIN
            .iter()
            .find(|(kw, _)| q.contains(kw))
            .map(|(_, domain)| *domain)
            .unwrap_or(QuestionDomain::General)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionDomain::Code => "code",
            QuestionDomain::Math => "math",
            QuestionDomain::Reasoning => "reasoning",
            QuestionDomain::Science => "science",
            QuestionDomain::General => "general",
        }
    }

    /// Model families recommended for this domain
    pub fn recommended_models(&self) -> &'static [&'static str] {
        match self {
            QuestionDomain::Code => &["deepseek-coder", "qwen2.5-coder", "llama3.1"],
            QuestionDomain::Reasoning => &["llama3.1", "qwen2.5", "gemma2"],
            QuestionDomain::Math => &["mathstral", "deepseek-math"],
            QuestionDomain::General => &["llama3.1", "phi3.5", "qwen2.5"],
            QuestionDomain::Science => &["llama3.1", "mistral", "qwen2.5"],
        }
    }
}

impl std::fmt::Display for QuestionDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recommendation split by what is already installed locally
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelRecommendation {
    pub domain: QuestionDomain,
    pub installed_recommended: Vec<String>,
    pub missing_recommendations: Vec<String>,
    pub all_installed: Vec<String>,
}

impl ModelRecommendation {
    /// Build a recommendation for `question` given the installed model tags
    ///
    /// An installed tag such as `llama3.1:8b` satisfies the family `llama3.1`.
    pub fn for_question(question: &str, installed: Vec<String>) -> Self {
        let domain = QuestionDomain::classify(question);
        let (installed_recommended, missing_recommendations) = domain
            .recommended_models()
            .iter()
            .map(|m| m.to_string())
            .partition(|m| installed.iter().any(|tag| tag.starts_with(m.as_str())));

        Self {
            domain,
            installed_recommended,
            missing_recommendations,
            all_installed: installed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_by_keyword() {
        assert_eq!(
            QuestionDomain::classify("How do I optimize this Python loop?"),
            QuestionDomain::Code
        );
        assert_eq!(
            QuestionDomain::classify("Prove the theorem"),
            QuestionDomain::Math
        );
        assert_eq!(
            QuestionDomain::classify("Explain quantum PHYSICS"),
            QuestionDomain::Science
        );
        assert_eq!(
            QuestionDomain::classify("What is the meaning of life?"),
            QuestionDomain::General
        );
    }

    #[test]
    fn test_recommendation_partitions_installed() {
        let installed = vec!["llama3.1:8b".to_string(), "mistral:latest".to_string()];
        let rec = ModelRecommendation::for_question("physics of black holes", installed);

        assert_eq!(rec.domain, QuestionDomain::Science);
        assert_eq!(rec.installed_recommended, vec!["llama3.1", "mistral"]);
        assert_eq!(rec.missing_recommendations, vec!["qwen2.5"]);
        assert_eq!(rec.all_installed.len(), 2);
    }

    #[test]
    fn test_recommendation_with_nothing_installed() {
        let rec = ModelRecommendation::for_question("integral of x", vec![]);
        assert_eq!(rec.domain, QuestionDomain::Math);
        assert!(rec.installed_recommended.is_empty());
        assert_eq!(rec.missing_recommendations.len(), 2);
    }
}
