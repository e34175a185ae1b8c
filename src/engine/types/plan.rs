use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ids::AgentId;

/// Opaque unit of work for a single agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubPlan(pub Value);

impl SubPlan {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Structured diagnostics for a query the planner refused to compile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerErrorGroup {
    pub errors: Vec<CompilerError>,
}

impl CompilerErrorGroup {
    pub fn single(line: u32, column: u32, message: impl Into<String>) -> Self {
        Self {
            errors: vec![CompilerError {
                line,
                column,
                message: message.into(),
            }],
        }
    }

    pub fn push(&mut self, line: u32, column: u32, message: impl Into<String>) {
        self.errors.push(CompilerError {
            line,
            column,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for CompilerErrorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}:{}: {}", err.line, err.column, err.message)?;
        }
        Ok(())
    }
}

/// What the planner produced for one query.
#[derive(Debug, Clone, PartialEq)]
pub enum DistributedPlan {
    Compiled(BTreeMap<AgentId, SubPlan>),
    Rejected(CompilerErrorGroup),
}

impl DistributedPlan {
    pub fn is_compiled(&self) -> bool {
        matches!(self, DistributedPlan::Compiled(_))
    }

    /// Agents the plan assigns work to, ascending. Empty for a rejected plan.
    pub fn targets(&self) -> Vec<AgentId> {
        match self {
            DistributedPlan::Compiled(plans) => plans.keys().copied().collect(),
            DistributedPlan::Rejected(_) => Vec::new(),
        }
    }
}
