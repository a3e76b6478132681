pub struct CommandDef {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
}

pub static COMMANDS: &[CommandDef] = &[
    CommandDef {
        name: "filter",
        aliases: &["f"],
        description: "Toggle a facet by label or type (e.g. :filter push)",
    },
    CommandDef {
        name: "clear",
        aliases: &["c"],
        description: "Clear all facet selections",
    },
    CommandDef {
        name: "expand",
        aliases: &["e"],
        description: "Expand every visible event",
    },
    CommandDef {
        name: "collapse",
        aliases: &["co"],
        description: "Collapse every event",
    },
    CommandDef {
        name: "reload",
        aliases: &["r"],
        description: "Reload events from the source",
    },
    CommandDef {
        name: "quit",
        aliases: &["q"],
        description: "Quit etrace",
    },
    CommandDef {
        name: "help",
        aliases: &["h"],
        description: "Show help",
    },
];

pub fn matching_commands(input: &str) -> Vec<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .filter(|cmd| {
            cmd.name.starts_with(&input_lower)
                || cmd.aliases.iter().any(|a| a.starts_with(&input_lower))
        })
        .collect()
}

/// Resolve a full command name or alias.
pub fn find_command(input: &str) -> Option<&'static CommandDef> {
    let input_lower = input.to_lowercase();
    COMMANDS
        .iter()
        .find(|cmd| cmd.name == input_lower || cmd.aliases.contains(&input_lower.as_str()))
}
