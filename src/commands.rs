//! REPL command table
//!
//! The table is an immutable value built once at startup and handed to the
//! REPL. Lookups are by exact (lower-cased) name; help lists commands in table
//! order.

/// What a command does when dispatched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Help,
    Exit,
    Map,
    MapBack,
    Explore,
    Catch,
    Inspect,
    Pokedex,
    Config,
}

/// A named REPL command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: CommandKind,
}

impl Command {
    pub const fn new(name: &'static str, description: &'static str, kind: CommandKind) -> Self {
        Self {
            name,
            description,
            kind,
        }
    }
}

/// Commands available in a normal session
const STANDARD_COMMANDS: [Command; 9] = [
    Command::new("help", "Displays a help message", CommandKind::Help),
    Command::new("exit", "Exit the Pokedex", CommandKind::Exit),
    Command::new("map", "Show the next page of location areas", CommandKind::Map),
    Command::new("mapb", "Show the previous page of location areas", CommandKind::MapBack),
    Command::new("explore", "explore <area>: list the Pokemon found in a location area", CommandKind::Explore),
    Command::new("catch", "catch <pokemon>: try to catch a Pokemon", CommandKind::Catch),
    Command::new("inspect", "inspect <pokemon>: show a Pokemon's stats and types", CommandKind::Inspect),
    Command::new("pokedex", "List the Pokemon you have caught", CommandKind::Pokedex),
    Command::new("config", "Show the page cursor, cache settings and pokedex", CommandKind::Config),
];

/// Name-to-command mapping used by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTable {
    commands: Vec<Command>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl CommandTable {
    /// Builds a table from `commands`; later duplicates of a name are ignored
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        let mut table: Vec<Command> = Vec::new();
        for command in commands {
            if !table.iter().any(|c| c.name == command.name) {
                table.push(command);
            }
        }
        Self { commands: table }
    }

    /// The full set of session commands
    pub fn standard() -> Self {
        Self::new(STANDARD_COMMANDS)
    }

    pub fn lookup(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_has_browse_commands() {
        let table = CommandTable::standard();
        assert_eq!(table.lookup("map").map(|c| c.kind), Some(CommandKind::Map));
        assert_eq!(table.lookup("mapb").map(|c| c.kind), Some(CommandKind::MapBack));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn test_lookup_is_exact() {
        let table = CommandTable::standard();
        assert!(table.lookup("MAP").is_none());
        assert!(table.lookup("ma").is_none());
        assert!(table.lookup("").is_none());
    }

    #[test]
    fn test_iter_keeps_table_order() {
        let names: Vec<_> = CommandTable::standard().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["help", "exit", "map", "mapb", "explore", "catch", "inspect", "pokedex", "config"]
        );
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let table = CommandTable::new([
            Command::new("go", "first", CommandKind::Map),
            Command::new("go", "second", CommandKind::MapBack),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("go").map(|c| c.description), Some("first"));
    }
}
