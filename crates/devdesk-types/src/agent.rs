//! Agent routing configuration and run events for devdesk.
//!
//! A [`RoutingConfig`] names the entry agent and every agent it may hand off
//! to. It is pure data: instruction text, handoff descriptions and allowed
//! handoff targets. Which agent answers a request is decided by the model.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::llm::StreamEvent;

/// One agent in the routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Display name, unique within a config (e.g., "Backend Agent").
    pub name: String,
    /// Natural-language behavioral instructions, sent as the system prompt.
    pub instructions: String,
    /// Shown to *other* agents when this agent is offered as a handoff target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_description: Option<String>,
    /// Names of agents this agent may hand off to.
    #[serde(default)]
    pub handoffs: Vec<String>,
}

impl AgentSpec {
    /// Name of the tool that transfers control to this agent.
    pub fn handoff_tool_name(&self) -> String {
        handoff_tool_name(&self.name)
    }
}

/// Build the `transfer_to_<agent>` tool name for an agent name.
///
/// Lowercases, maps whitespace and dashes to `_`, and drops anything else
/// that is not ASCII alphanumeric ("Backend Agent" -> `transfer_to_backend_agent`).
pub fn handoff_tool_name(agent_name: &str) -> String {
    let mut slug = String::with_capacity(agent_name.len());
    for c in agent_name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if (c.is_whitespace() || c == '-' || c == '_') && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    format!("transfer_to_{}", slug.trim_end_matches('_'))
}

/// The declarative agent graph consumed by the completion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Name of the agent that receives every turn first.
    pub entry_agent: String,
    pub agents: Vec<AgentSpec>,
}

impl RoutingConfig {
    /// Look up an agent by exact name.
    pub fn agent(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// The entry agent. Only fails on a config that skipped [`validate`](Self::validate).
    pub fn entry(&self) -> Result<&AgentSpec, RoutingError> {
        self.agent(&self.entry_agent)
            .ok_or_else(|| RoutingError::UnknownEntryAgent(self.entry_agent.clone()))
    }

    /// Check structural integrity: non-empty unique names, a known entry
    /// agent, and known handoff targets.
    pub fn validate(&self) -> Result<(), RoutingError> {
        let mut seen = std::collections::HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(RoutingError::EmptyAgentName);
            }
            if !seen.insert(agent.name.as_str()) {
                return Err(RoutingError::DuplicateAgent(agent.name.clone()));
            }
        }

        self.entry()?;

        for agent in &self.agents {
            for target in &agent.handoffs {
                if self.agent(target).is_none() {
                    return Err(RoutingError::UnknownHandoffTarget {
                        agent: agent.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Events produced by one streamed agent run.
///
/// Consumers relay `TextDelta` and may display `AgentUpdated`; every other
/// kind is informational.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    /// Incremental reply text.
    TextDelta { text: String },
    /// The active agent changed (also emitted once at run start).
    AgentUpdated { agent: String },
    /// The model transferred control from one agent to another.
    Handoff { from: String, to: String },
    /// Any other provider event, passed through untouched.
    Raw(StreamEvent),
    /// Terminal event carrying the assembled output of the run.
    Completed {
        final_output: String,
        last_agent: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, handoffs: &[&str]) -> AgentSpec {
        AgentSpec {
            name: name.to_string(),
            instructions: format!("You are {name}."),
            handoff_description: None,
            handoffs: handoffs.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config() -> RoutingConfig {
        RoutingConfig {
            entry_agent: "Web Development Agent".to_string(),
            agents: vec![
                spec("Web Development Agent", &["Frontend Agent", "Backend Agent"]),
                spec("Frontend Agent", &[]),
                spec("Backend Agent", &[]),
            ],
        }
    }

    #[test]
    fn test_handoff_tool_name() {
        assert_eq!(handoff_tool_name("Backend Agent"), "transfer_to_backend_agent");
        assert_eq!(handoff_tool_name("  Front-end  Agent "), "transfer_to_front_end_agent");
        assert_eq!(handoff_tool_name("QA (beta)"), "transfer_to_qa_beta");
    }

    #[test]
    fn test_valid_config() {
        let cfg = config();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.entry().unwrap().handoffs.len(), 2);
    }

    #[test]
    fn test_unknown_entry_agent() {
        let mut cfg = config();
        cfg.entry_agent = "Manager Agent".to_string();
        assert!(matches!(
            cfg.validate(),
            Err(RoutingError::UnknownEntryAgent(name)) if name == "Manager Agent"
        ));
    }

    #[test]
    fn test_unknown_handoff_target() {
        let mut cfg = config();
        cfg.agents[1].handoffs.push("Mobile Agent".to_string());
        assert!(matches!(
            cfg.validate(),
            Err(RoutingError::UnknownHandoffTarget { target, .. }) if target == "Mobile Agent"
        ));
    }

    #[test]
    fn test_duplicate_agent() {
        let mut cfg = config();
        cfg.agents.push(spec("Backend Agent", &[]));
        assert!(matches!(cfg.validate(), Err(RoutingError::DuplicateAgent(_))));
    }

    #[test]
    fn test_routing_config_from_toml() {
        let toml_str = r#"
entry_agent = "Triage"

[[agents]]
name = "Triage"
instructions = "Route requests."
handoffs = ["Docs"]

[[agents]]
name = "Docs"
instructions = "Answer documentation questions."
handoff_description = "Documentation specialist."
"#;
        let cfg: RoutingConfig = toml::from_str(toml_str).unwrap();
        assert!(cfg.validate().is_ok());
        assert_eq!(
            cfg.agent("Docs").unwrap().handoff_description.as_deref(),
            Some("Documentation specialist.")
        );
        assert!(cfg.agent("Docs").unwrap().handoffs.is_empty());
    }

    #[test]
    fn test_run_event_serde() {
        let event = RunEvent::Handoff {
            from: "Web Development Agent".to_string(),
            to: "Backend Agent".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "handoff");
        assert_eq!(json["to"], "Backend Agent");
    }
}
