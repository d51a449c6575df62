//! Plan extraction
//!
//! The [`Planner`] turns a natural-language question into an ordered list of
//! subtasks. It renders a fixed prompt, asks the model collaborator for a
//! completion, then extracts the fenced ```` ```python ```` block and parses
//! its interior with the literal-only parser in [`literal`].
//!
//! # Failure policy
//!
//! [`Planner::plan`] never fails: every problem (model error, missing fence,
//! malformed literal, wrong type) is logged and folded into an empty
//! [`Plan`]. Callers that need the cause use [`Planner::try_plan`], which
//! returns a [`PlanError`].
//!
//! ```ignore
//! let planner = Planner::new(provider.create_client()?);
//! let plan = planner.plan("今天天气如何？").await;
//! if plan.is_empty() {
//!     // no usable plan
//! }
//! for (i, step) in plan.iter().enumerate() {
//!     println!("{}. {}", i + 1, step);
//! }
//! ```

/// Literal-only parser for the fenced plan block.
pub mod literal;

use crate::llm::LLMClient;
use crate::types::ChatMessage;
use literal::{parse_literal, Literal, LiteralError};
use serde::Serialize;
use std::ops::Deref;
use tracing::{debug, info, warn};

/// Opening marker of the plan block
pub const OPEN_FENCE: &str = "```python";

/// Closing marker of the plan block
pub const CLOSE_FENCE: &str = "```";

/// Prompt sent to the model. `{question}` is replaced with the user's question.
pub const PLANNER_PROMPT_TEMPLATE: &str = r#"
你是一个顶级的AI规划专家。你的任务是将用户提出的复杂问题分解成一个由多个简单步骤组成的行动计划。
请确保计划中的每个步骤都是一个独立的、可执行的子任务，并且严格按照逻辑顺序排列。
你的输出必须是一个Python列表，其中每个元素都是一个描述子任务的字符串。

问题: {question}

请严格按照以下格式输出你的计划,```python与```作为前后缀是必要的:
```python
["步骤1", "步骤2", "步骤3", ...]
```
"#;

/// Render the planner prompt for a question
pub fn render_prompt(question: &str) -> String {
    PLANNER_PROMPT_TEMPLATE.replace("{question}", question)
}

/// Ordered subtasks produced for one question.
///
/// Every step is a non-empty string. An empty plan means no usable plan was
/// extracted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Plan(Vec<String>);

impl Plan {
    /// Build a plan, checking that every step is a non-empty string.
    /// Whitespace is kept as given.
    pub fn from_steps<I, S>(steps: I) -> Result<Self, PlanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let steps: Vec<String> = steps.into_iter().map(Into::into).collect();
        if let Some(index) = steps.iter().position(|s| s.is_empty()) {
            return Err(PlanError::Type(format!("step {} is an empty string", index + 1)));
        }
        Ok(Self(steps))
    }

    pub fn steps(&self) -> &[String] {
        &self.0
    }

    pub fn into_steps(self) -> Vec<String> {
        self.0
    }
}

impl Deref for Plan {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for Plan {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Plan {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Why a model response did not yield a plan
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("response has no ```python ... ``` block")]
    Format,

    #[error("plan block is not a valid literal: {message} (offset {position})")]
    Syntax { position: usize, message: String },

    #[error("plan block has the wrong shape: {0}")]
    Type(String),

    #[error("model completion failed: {0}")]
    Completion(String),
}

impl From<LiteralError> for PlanError {
    fn from(err: LiteralError) -> Self {
        PlanError::Syntax {
            position: err.position,
            message: err.message,
        }
    }
}

/// Interior of the first ```` ```python ```` block, trimmed.
///
/// The block ends at the first ```` ``` ```` after the opening marker.
pub fn extract_fenced_block(text: &str) -> Option<&str> {
    let start = text.find(OPEN_FENCE)? + OPEN_FENCE.len();
    let rest = &text[start..];
    let end = rest.find(CLOSE_FENCE)?;
    Some(rest[..end].trim())
}

/// Parse a full model response into a plan
pub fn parse_plan(response: &str) -> Result<Plan, PlanError> {
    let block = extract_fenced_block(response).ok_or(PlanError::Format)?;
    let literal = parse_literal(block)?;
    plan_from_literal(literal)
}

fn plan_from_literal(literal: Literal) -> Result<Plan, PlanError> {
    let items = match literal {
        Literal::List(items) => items,
        other => {
            return Err(PlanError::Type(format!(
                "expected a list, found {}",
                other.type_name()
            )))
        }
    };

    let steps = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Literal::Str(step) => Ok(step),
            other => Err(PlanError::Type(format!(
                "step {} is {}, expected str",
                index + 1,
                other.type_name()
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Plan::from_steps(steps)
}

/// Generates action plans from questions using a model collaborator
pub struct Planner {
    llm: Box<dyn LLMClient>,
}

impl Planner {
    pub fn new(llm: Box<dyn LLMClient>) -> Self {
        Self { llm }
    }

    /// Generate a plan; any failure yields an empty plan
    pub async fn plan(&self, question: &str) -> Plan {
        let response = match self.request_plan(question).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Plan generation failed, returning empty plan");
                return Plan::default();
            }
        };

        match parse_plan(&response) {
            Ok(plan) => {
                info!(steps = plan.len(), "Plan generated");
                debug!(plan = ?plan.steps(), "Parsed plan");
                plan
            }
            Err(e) => {
                warn!(error = %e, raw_response = %response, "Failed to parse plan, returning empty plan");
                Plan::default()
            }
        }
    }

    /// Generate a plan, reporting why extraction failed
    pub async fn try_plan(&self, question: &str) -> Result<Plan, PlanError> {
        let response = self.request_plan(question).await?;
        parse_plan(&response)
    }

    /// Single user-role message carrying the rendered template.
    /// A missing response is treated as empty text.
    async fn request_plan(&self, question: &str) -> Result<String, PlanError> {
        let messages = [ChatMessage::user(render_prompt(question))];

        info!(model = %self.llm.model_name(), "Generating plan");
        let response = self
            .llm
            .complete(&messages)
            .await
            .map_err(|e| PlanError::Completion(e.to_string()))?
            .unwrap_or_default();

        debug!(response = %response, "Raw planner response");
        Ok(response)
    }
}
