use std::collections::BTreeMap;

use strsim::levenshtein;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// Largest edit distance still offered as a "did you mean" suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    /// First-argument keywords offered by tab completion.
    pub subcommands: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            subcommands: &[],
            handler,
        }
    }

    pub fn with_subcommands(mut self, subcommands: &'static [&'static str]) -> Self {
        self.subcommands = subcommands;
        self
    }
}

/// Commands in registration order, looked up case-insensitively.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    by_name: BTreeMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entry`; a later entry with the same name replaces the earlier one.
    pub fn register(&mut self, entry: CommandEntry) {
        match self.by_name.get(entry.name) {
            Some(&idx) => self.entries[idx] = entry,
            None => {
                self.by_name.insert(entry.name, self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        let key = name.to_ascii_lowercase();
        self.by_name
            .get(key.as_str())
            .and_then(|idx| self.entries.get(*idx))
    }

    pub fn list(&self) -> impl Iterator<Item = &CommandEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }

    /// Closest registered name by Levenshtein distance, if close enough.
    pub fn suggest(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_ascii_lowercase();
        self.names()
            .map(|name| (levenshtein(name, &needle), name))
            .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, name)| name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut ShellContext, _: &[&str]) -> CommandResult {
        Ok(())
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("pets", "List pets", "pets", noop));
        registry.register(CommandEntry::new("show", "Show a pet", "show <pet>", noop));
        registry.register(
            CommandEntry::new("wizard", "Drive the wizard", "wizard <action>", noop)
                .with_subcommands(&["next", "back"]),
        );
        registry
    }

    #[test]
    fn lookup_is_case_insensitive_and_ordered() {
        let registry = registry();
        assert!(registry.get("PETS").is_some());
        assert_eq!(registry.names().collect::<Vec<_>>(), ["pets", "show", "wizard"]);
        assert_eq!(registry.get("wizard").map(|e| e.subcommands.len()), Some(2));
    }

    #[test]
    fn re_registering_replaces_in_place() {
        let mut registry = registry();
        registry.register(CommandEntry::new("pets", "Dashboard", "pets", noop));
        assert_eq!(registry.list().count(), 3);
        assert_eq!(registry.get("pets").map(|e| e.description), Some("Dashboard"));
    }

    #[test]
    fn suggests_close_names_only() {
        let registry = registry();
        assert_eq!(registry.suggest("pest"), Some("pets"));
        assert_eq!(registry.suggest("wizrd"), Some("wizard"));
        assert_eq!(registry.suggest("completely-different"), None);
    }
}
