//! Prompt templates for each stage of a debate

/// Templates for generating round and synthesis prompts
pub struct DebatePromptTemplate;

impl DebatePromptTemplate {
    /// Round 1: the bare question with an initial-answer instruction
    pub fn initial_prompt(question: &str) -> String {
        format!(
            r#"Question: {}

Provide your answer and reasoning."#,
            question
        )
    }

    /// Round k > 1: the question plus the previous round's labeled responses
    pub fn refinement_prompt(question: &str, previous_round: &str) -> String {
        format!(
            r#"Question: {}

Responses from the previous round:

{}
Review the answers above. Critique their weaknesses, refine your own answer,
and seek common ground with the other participants where the reasoning allows.
Be specific and cite reasoning."#,
            question, previous_round
        )
    }

    /// Synthesis: the question, every round, and whether the rounds converged
    pub fn synthesis_prompt(question: &str, history: &str, consensus_reached: bool) -> String {
        let status = if consensus_reached {
            "The participants reached consensus."
        } else {
            "The participants did not reach consensus within the allowed rounds."
        };

        format!(
            r#"Question: {}

Debate history:

{}
{}

Based on all the arguments and perspectives presented above, provide a final,
synthesized answer to the original question. Consider all viewpoints and give
a balanced, well-reasoned conclusion."#,
            question, history, status
        )
    }
}
