//! Personas: role prompts wrapped around an input document.

/// Placeholder replaced by the input document
pub const REQUEST_PLACEHOLDER: &str = "{request}";

/// A named role prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Used in artifact names, e.g. `brief_business_analyst.md`
    pub name: String,
    pub template: String,
}

impl Persona {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
        }
    }

    /// Substitute the input document into the template
    pub fn render(&self, request: &str) -> String {
        self.template.replace(REQUEST_PLACEHOLDER, request)
    }

    pub fn business_analyst() -> Self {
        Self::new("business_analyst", BUSINESS_ANALYST_TEMPLATE)
    }

    pub fn product_manager() -> Self {
        Self::new("product_manager", PRODUCT_MANAGER_TEMPLATE)
    }

    pub fn software_engineer() -> Self {
        Self::new("software_engineer", SOFTWARE_ENGINEER_TEMPLATE)
    }

    pub fn builtins() -> Vec<Self> {
        vec![
            Self::business_analyst(),
            Self::product_manager(),
            Self::software_engineer(),
        ]
    }

    /// Look up a built-in persona; `-` and `_` are interchangeable
    pub fn builtin(name: &str) -> Option<Self> {
        let wanted = name.replace('-', "_").to_lowercase();
        Self::builtins().into_iter().find(|p| p.name == wanted)
    }
}

const BUSINESS_ANALYST_TEMPLATE: &str = r#"<purpose>
    You are an expert market and business analyst. Turn the request below into a clear, actionable project brief focused on a minimum viable product.
</purpose>
<instructions>
    <instruction>Cover the core problem, goals, target audience, high-level features and MVP scope (in and out).</instruction>
    <instruction>Use structured sections and lists. Avoid ambiguity.</instruction>
    <instruction>Output only the project brief. Do not ask follow-up questions.</instruction>
</instructions>

<analyst-request>{request}</analyst-request>
"#;

const PRODUCT_MANAGER_TEMPLATE: &str = r#"<purpose>
    You are an experienced product manager. Turn the request below into a product requirements document.
</purpose>
<instructions>
    <instruction>Describe the goal, the users, functional and non-functional requirements, and an ordered list of epics with user stories and acceptance criteria.</instruction>
    <instruction>Keep the scope to what is needed for a first release.</instruction>
    <instruction>Output only the document. Do not ask follow-up questions.</instruction>
</instructions>

<pm-request>{request}</pm-request>
"#;

const SOFTWARE_ENGINEER_TEMPLATE: &str = r#"<purpose>
    You are a senior software engineer. Turn the request below into a technical design and implementation plan.
</purpose>
<instructions>
    <instruction>Propose an architecture, the main components and their interfaces, data models, and the technology choices with their trade-offs.</instruction>
    <instruction>List the implementation steps in order, with testing notes for each.</instruction>
    <instruction>Output only the design. Do not ask follow-up questions.</instruction>
</instructions>

<engineering-request>{request}</engineering-request>
"#;
