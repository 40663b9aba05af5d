//! Synthesis prompt for the decision stage

/// Placeholder replaced by the original prompt text
pub const ORIGINAL_PROMPT_PLACEHOLDER: &str = "{original_prompt}";
/// Placeholder replaced by the wrapped team responses
pub const TEAM_RESPONSES_PLACEHOLDER: &str = "{team_responses}";

/// Default decision-maker template
pub const DEFAULT_DECISION_TEMPLATE: &str = r#"<purpose>
    You are the decision maker of the agile team. You are given the original question and the responses of your team members. Choose the best direction for the team.
</purpose>
<instructions>
    <instruction>Each team member has proposed an answer to the question posed in the prompt.</instruction>
    <instruction>Team members are identified by model name. Refer to them by model name in your response.</instruction>
    <instruction>Break the decision down into risk, reward, timeline and resources, and add any other dimension that helps.</instruction>
    <instruction>Respond in markdown. Start with a "Team Decision" title, give a short summary of the decision, comment on each team member's proposal, then state the final decision.</instruction>
</instructions>

<original-question>{original_prompt}</original-question>

<team-decisions>
{team_responses}
</team-decisions>
"#;

/// One team member's answer, labelled `provider:model`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamResponse {
    pub model_label: String,
    pub response_text: String,
}

impl TeamResponse {
    pub fn new(model_label: impl Into<String>, response_text: impl Into<String>) -> Self {
        Self {
            model_label: model_label.into(),
            response_text: response_text.into(),
        }
    }
}

/// Input of the synthesis stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub original_prompt: String,
    pub team_responses: Vec<TeamResponse>,
}

impl SynthesisRequest {
    pub fn new(original_prompt: impl Into<String>) -> Self {
        Self {
            original_prompt: original_prompt.into(),
            team_responses: Vec::new(),
        }
    }

    pub fn with_response(mut self, response: TeamResponse) -> Self {
        self.team_responses.push(response);
        self
    }

    /// Each response wrapped in `<team-response>` with its model label
    pub fn team_responses_block(&self) -> String {
        let mut block = String::new();
        for response in &self.team_responses {
            block.push_str(&format!(
                "<team-response>\n<model-name>{}</model-name>\n<response>\n{}\n</response>\n</team-response>\n\n",
                response.model_label, response.response_text
            ));
        }
        block
    }

    /// Fill both placeholders of `template` in a single pass.
    ///
    /// Substituted text is never scanned again, so placeholder-like text in
    /// the prompt or in a response stays verbatim. Other braces are left alone.
    pub fn render(&self, template: &str) -> String {
        let responses = self.team_responses_block();
        let mut rendered = String::with_capacity(template.len() + responses.len());
        let mut rest = template;
        loop {
            let next = [
                (ORIGINAL_PROMPT_PLACEHOLDER, self.original_prompt.as_str()),
                (TEAM_RESPONSES_PLACEHOLDER, responses.as_str()),
            ]
            .into_iter()
            .filter_map(|(placeholder, value)| {
                rest.find(placeholder).map(|at| (at, placeholder, value))
            })
            .min_by_key(|(at, _, _)| *at);

            match next {
                Some((at, placeholder, value)) => {
                    rendered.push_str(&rest[..at]);
                    rendered.push_str(value);
                    rest = &rest[at + placeholder.len()..];
                }
                None => {
                    rendered.push_str(rest);
                    return rendered;
                }
            }
        }
    }

    pub fn render_default(&self) -> String {
        self.render(DEFAULT_DECISION_TEMPLATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SynthesisRequest {
        SynthesisRequest::new("What is the capital of France?")
            .with_response(TeamResponse::new("openai:gpt-4o", "Paris."))
            .with_response(TeamResponse::new("gemini:gemini-2.5-pro", "It is Paris."))
    }

    #[test]
    fn default_template_contains_prompt_and_labels() {
        let rendered = request().render_default();
        assert!(rendered.contains("<original-question>What is the capital of France?</original-question>"));
        assert!(rendered.contains("<model-name>openai:gpt-4o</model-name>"));
        assert!(rendered.contains("<model-name>gemini:gemini-2.5-pro</model-name>"));
        assert!(!rendered.contains(ORIGINAL_PROMPT_PLACEHOLDER));
        assert!(!rendered.contains(TEAM_RESPONSES_PLACEHOLDER));
    }

    #[test]
    fn responses_keep_team_order() {
        let block = request().team_responses_block();
        let first = block.find("openai:gpt-4o").unwrap();
        let second = block.find("gemini:gemini-2.5-pro").unwrap();
        assert!(first < second);
        assert_eq!(block.matches("<team-response>").count(), 2);
    }

    #[test]
    fn custom_template_with_stray_braces() {
        let template = "Q: {original_prompt}\n{json: true}\nA:\n{team_responses}";
        let rendered = request().render(template);
        assert!(rendered.starts_with("Q: What is the capital of France?"));
        assert!(rendered.contains("{json: true}"));
    }

    #[test]
    fn placeholder_text_inside_prompt_is_not_expanded() {
        let rendered = SynthesisRequest::new("explain {team_responses}")
            .with_response(TeamResponse::new("t:a", "x"))
            .render("{original_prompt}");
        assert_eq!(rendered, "explain {team_responses}");
    }

    #[test]
    fn placeholder_text_inside_a_response_is_kept() {
        let rendered = SynthesisRequest::new("SECRET PROMPT")
            .with_response(TeamResponse::new("t:a", "use the {original_prompt} key"))
            .render("{original_prompt}|{team_responses}");
        assert!(rendered.starts_with("SECRET PROMPT|"));
        assert!(rendered.contains("<response>\nuse the {original_prompt} key\n</response>"));
        assert_eq!(rendered.matches("SECRET PROMPT").count(), 1);
    }

    #[test]
    fn repeated_placeholders_are_all_filled() {
        let rendered = SynthesisRequest::new("Q").render("{original_prompt} and {original_prompt}");
        assert_eq!(rendered, "Q and Q");
    }
}
