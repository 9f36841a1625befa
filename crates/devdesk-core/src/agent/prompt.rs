//! System prompt and tool assembly for a single agent.
//!
//! Handoffs are offered to the model as `transfer_to_<agent>` tools. The
//! prompt lists them in a `<handoffs>` section ahead of the agent's own
//! `<instructions>`, using XML tags for section boundaries.

use serde_json::json;

use devdesk_types::agent::{AgentSpec, RoutingConfig};
use devdesk_types::llm::ToolDefinition;

/// Builds the system prompt and tool list an agent is called with.
///
/// Layout:
/// ```text
/// <handoffs>
/// You are part of a multi-agent system ...
/// - Frontend Agent (call `transfer_to_frontend_agent`): ...
/// </handoffs>
///
/// <instructions>{agent.instructions}</instructions>
/// ```
pub struct AgentPromptBuilder;

impl AgentPromptBuilder {
    /// Build the system prompt for `agent`.
    ///
    /// The `<handoffs>` section is only present when the agent has handoff
    /// targets that resolve in `routing`.
    pub fn build(routing: &RoutingConfig, agent: &AgentSpec) -> String {
        let mut sections = Vec::with_capacity(2);

        let targets: Vec<&AgentSpec> = Self::targets(routing, agent).collect();
        if !targets.is_empty() {
            let lines: Vec<String> = targets
                .iter()
                .map(|t| {
                    format!(
                        "- {} (call `{}`): {}",
                        t.name,
                        t.handoff_tool_name(),
                        Self::describe(t)
                    )
                })
                .collect();
            sections.push(format!(
                "<handoffs>\n\
                You are part of a multi-agent system. You may transfer the conversation \
                to another agent by calling its transfer tool. Transfers happen silently; \
                do not mention them to the user.\n\
                {}\n\
                </handoffs>",
                lines.join("\n")
            ));
        }

        sections.push(format!(
            "<instructions>\n{}\n</instructions>",
            agent.instructions.trim()
        ));

        sections.join("\n\n")
    }

    /// One function tool per handoff target. Transfer tools take no arguments.
    pub fn handoff_tools(routing: &RoutingConfig, agent: &AgentSpec) -> Vec<ToolDefinition> {
        Self::targets(routing, agent)
            .map(|target| ToolDefinition {
                name: target.handoff_tool_name(),
                description: Self::describe(target),
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false,
                }),
            })
            .collect()
    }

    /// Resolve a tool name called by `agent` to the name of its target agent.
    pub fn resolve_handoff(
        routing: &RoutingConfig,
        agent: &AgentSpec,
        tool_name: &str,
    ) -> Option<String> {
        Self::targets(routing, agent)
            .find(|target| target.handoff_tool_name() == tool_name)
            .map(|target| target.name.clone())
    }

    fn targets<'a>(
        routing: &'a RoutingConfig,
        agent: &'a AgentSpec,
    ) -> impl Iterator<Item = &'a AgentSpec> + 'a {
        agent.handoffs.iter().filter_map(|name| routing.agent(name))
    }

    fn describe(target: &AgentSpec) -> String {
        match target.handoff_description.as_deref().map(str::trim) {
            Some(desc) if !desc.is_empty() => desc.to_string(),
            _ => format!("Handoff to the {} to handle the request.", target.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::defaults::{BACKEND_AGENT, FRONTEND_AGENT, WEB_DEV_AGENT, default_routing};

    #[test]
    fn test_entry_prompt_lists_handoffs_before_instructions() {
        let routing = default_routing();
        let agent = routing.agent(WEB_DEV_AGENT).unwrap();
        let prompt = AgentPromptBuilder::build(&routing, agent);

        assert!(prompt.starts_with("<handoffs>"));
        assert!(prompt.contains("`transfer_to_frontend_agent`"));
        assert!(prompt.contains("`transfer_to_backend_agent`"));
        let handoffs_end = prompt.find("</handoffs>").unwrap();
        let instructions_start = prompt.find("<instructions>").unwrap();
        assert!(handoffs_end < instructions_start);
        assert!(prompt.contains("Main Web Development Agent"));
    }

    #[test]
    fn test_specialist_prompt_has_no_handoff_section() {
        let routing = default_routing();
        let agent = routing.agent(BACKEND_AGENT).unwrap();
        let prompt = AgentPromptBuilder::build(&routing, agent);

        assert!(!prompt.contains("<handoffs>"));
        assert!(prompt.starts_with("<instructions>\nYou are a highly skilled Backend"));
        assert!(prompt.ends_with("</instructions>"));
    }

    #[test]
    fn test_handoff_tools() {
        let routing = default_routing();
        let entry = routing.entry().unwrap();
        let tools = AgentPromptBuilder::handoff_tools(&routing, entry);

        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["transfer_to_frontend_agent", "transfer_to_backend_agent"]);
        assert_eq!(
            tools[0].description,
            "Handoff to the Frontend Agent to handle the request."
        );
        assert_eq!(tools[0].parameters["type"], "object");

        let specialist = routing.agent(FRONTEND_AGENT).unwrap();
        assert!(AgentPromptBuilder::handoff_tools(&routing, specialist).is_empty());
    }

    #[test]
    fn test_resolve_handoff() {
        let routing = default_routing();
        let entry = routing.entry().unwrap();
        assert_eq!(
            AgentPromptBuilder::resolve_handoff(&routing, entry, "transfer_to_backend_agent"),
            Some(BACKEND_AGENT.to_string())
        );
        assert_eq!(
            AgentPromptBuilder::resolve_handoff(&routing, entry, "transfer_to_mobile_agent"),
            None
        );

        let backend = routing.agent(BACKEND_AGENT).unwrap();
        assert_eq!(
            AgentPromptBuilder::resolve_handoff(&routing, backend, "transfer_to_frontend_agent"),
            None
        );
    }

    #[test]
    fn test_custom_handoff_description_is_used() {
        let mut routing = default_routing();
        routing.agents[1].handoff_description = Some("  UI specialist.  ".to_string());
        let entry = routing.entry().unwrap();
        let tools = AgentPromptBuilder::handoff_tools(&routing, entry);
        let frontend = tools
            .iter()
            .find(|t| t.name == "transfer_to_frontend_agent")
            .unwrap();
        assert_eq!(frontend.description, "UI specialist.");
    }
}
