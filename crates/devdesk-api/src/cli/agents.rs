//! `devdesk agents` - print the routing graph.

use console::style;

use devdesk_types::agent::RoutingConfig;

/// Print the routing configuration as styled text or pretty JSON.
pub fn print_agents(routing: &RoutingConfig, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(routing)?);
    } else {
        print!("{}", render_agents(routing));
    }
    Ok(())
}

fn render_agents(routing: &RoutingConfig) -> String {
    let mut out = String::from("\n");
    for agent in &routing.agents {
        let marker = if agent.name == routing.entry_agent {
            format!(" {}", style("(entry)").green())
        } else {
            String::new()
        };
        out.push_str(&format!("  {}{marker}\n", style(&agent.name).cyan().bold()));
        out.push_str(&format!(
            "    {}  {}\n",
            style("tool:").bold(),
            style(agent.handoff_tool_name()).dim()
        ));
        if let Some(description) = &agent.handoff_description {
            out.push_str(&format!("    {}  {description}\n", style("when:").bold()));
        }
        if !agent.handoffs.is_empty() {
            out.push_str(&format!(
                "    {}  {}\n",
                style("hands off to:").bold(),
                agent.handoffs.join(", ")
            ));
        }
        if let Some(first_line) = agent.instructions.lines().find(|l| !l.trim().is_empty()) {
            out.push_str(&format!("    {}\n", style(first_line.trim()).dim()));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use devdesk_core::agent::defaults::default_routing;

    use super::*;

    #[test]
    fn test_render_lists_every_agent() {
        let text = render_agents(&default_routing());
        assert!(text.contains("Web Development Agent"));
        assert!(text.contains("(entry)"));
        assert!(text.contains("transfer_to_backend_agent"));
        assert!(text.contains("Frontend Agent, Backend Agent"));
    }
}
