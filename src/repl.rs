//! Read-eval-print loop
//!
//! Reads lines from an async reader, lower-cases and splits them on
//! whitespace, looks the first word up in the command table and runs it
//! against the session. A failing command is reported and the loop carries
//! on; only I/O errors on the terminal itself end it.

use std::io::{self, Write};

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::api::{ApiError, Fetch};
use crate::commands::{CommandKind, CommandTable};
use crate::cursor::Step;
use crate::session::Session;

/// Default prompt printed before each line is read
pub const DEFAULT_PROMPT: &str = "Pokedex > ";

/// Errors a command can report back to the loop
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Lower-cases `text` and splits it into words
pub fn clean_input(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// The interactive loop around a `Session`
#[derive(Debug)]
pub struct Repl<S> {
    session: Session<S>,
    commands: CommandTable,
    prompt: String,
}

impl<S: Fetch> Repl<S> {
    pub fn new(session: Session<S>, commands: CommandTable) -> Self {
        Self {
            session,
            commands,
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Runs until `exit` or end of input
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();

        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(output)?;
                debug!("End of input");
                return Ok(());
            };

            match self.execute_line(&line, output).await {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => return Ok(()),
                Err(CommandError::Io(e)) => return Err(e),
                Err(e) => {
                    warn!(line = %line.trim(), "Command failed: {}", e);
                    writeln!(output, "Error: {}", e)?;
                }
            }
        }
    }

    /// Parses and runs a single input line
    pub async fn execute_line<W: Write>(
        &mut self,
        line: &str,
        output: &mut W,
    ) -> Result<Flow, CommandError> {
        let words = clean_input(line);
        let Some((name, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };

        let Some(command) = self.commands.lookup(name) else {
            writeln!(output, "Unknown command")?;
            return Ok(Flow::Continue);
        };

        debug!(command = command.name, ?args, "Dispatching");
        let kind = command.kind;
        self.execute(kind, &args.join(" "), output).await
    }

    async fn execute<W: Write>(
        &mut self,
        kind: CommandKind,
        argument: &str,
        output: &mut W,
    ) -> Result<Flow, CommandError> {
        match kind {
            CommandKind::Help => self.help(output)?,
            CommandKind::Exit => {
                writeln!(output, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            CommandKind::Map => {
                let step = self.session.next_page().await?;
                print_step(&step, output)?;
            }
            CommandKind::MapBack => {
                let step = self.session.previous_page().await?;
                print_step(&step, output)?;
            }
            CommandKind::Explore => {
                if argument.is_empty() {
                    writeln!(output, "Please provide a location name")?;
                } else {
                    self.explore(argument, output).await?;
                }
            }
            CommandKind::Catch => {
                if argument.is_empty() {
                    writeln!(output, "Please provide a pokemon name")?;
                } else {
                    self.catch(argument, output).await?;
                }
            }
            CommandKind::Inspect => {
                if argument.is_empty() {
                    writeln!(output, "Please provide a pokemon name")?;
                } else {
                    self.inspect(argument, output).await?;
                }
            }
            CommandKind::Pokedex => self.pokedex(output)?,
            CommandKind::Config => self.config(output)?,
        }
        Ok(Flow::Continue)
    }

    fn help<W: Write>(&self, output: &mut W) -> io::Result<()> {
        writeln!(output, "Welcome to the Pokedex!")?;
        writeln!(output, "Usage:")?;
        writeln!(output)?;
        for command in self.commands.iter() {
            writeln!(output, "{}: {}", command.name, command.description)?;
        }
        Ok(())
    }

    async fn explore<W: Write>(&self, area: &str, output: &mut W) -> Result<(), CommandError> {
        let names = self.session.explore(area).await?;
        writeln!(output, "Exploring {}...", area)?;
        writeln!(output, "Found Pokemon:")?;
        for name in names {
            writeln!(output, " - {}", name)?;
        }
        Ok(())
    }

    async fn catch<W: Write>(&mut self, name: &str, output: &mut W) -> Result<(), CommandError> {
        let outcome = self.session.catch(name).await?;
        writeln!(output, "Throwing a Pokeball at {}...", outcome.name)?;
        if outcome.caught {
            writeln!(output, "{} was caught!", outcome.name)?;
            writeln!(output, "You may now inspect it with the inspect command.")?;
        } else {
            writeln!(output, "{} escaped!", outcome.name)?;
        }
        Ok(())
    }

    async fn inspect<W: Write>(&self, name: &str, output: &mut W) -> Result<(), CommandError> {
        let pokemon = self.session.inspect(name).await?;
        writeln!(output, "Name: {}", pokemon.name)?;
        writeln!(output, "Height: {}", pokemon.height)?;
        writeln!(output, "Weight: {}", pokemon.weight)?;
        writeln!(output, "Stats:")?;
        for stat in &pokemon.stats {
            writeln!(output, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(output, "Types:")?;
        for kind in &pokemon.types {
            writeln!(output, "  - {}", kind.kind.name)?;
        }
        if !self.session.has_caught(&pokemon.name) {
            writeln!(output, "(not caught yet)")?;
        }
        Ok(())
    }

    fn pokedex<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let mut entries = self.session.pokedex().peekable();
        if entries.peek().is_none() {
            return writeln!(output, "Your Pokedex is empty");
        }
        writeln!(output, "Your Pokedex:")?;
        for entry in entries {
            writeln!(
                output,
                "  - {} (caught {})",
                entry.pokemon.name,
                entry.caught_at.format("%H:%M:%S")
            )?;
        }
        Ok(())
    }

    fn config<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let cursor = self.session.cursor();
        let cache = self.session.cache();
        writeln!(output, "Next: {}", cursor.next().unwrap_or("none"))?;
        writeln!(output, "Previous: {}", cursor.previous().unwrap_or("none"))?;
        writeln!(
            output,
            "Cache: {} entries, ttl {}s, reap every {}ms",
            cache.len(),
            cache.ttl().as_secs(),
            cache.reap_interval().as_millis()
        )?;
        let caught: Vec<_> = self
            .session
            .pokedex()
            .map(|entry| entry.pokemon.name.as_str())
            .collect();
        if caught.is_empty() {
            writeln!(output, "Pokedex: none")
        } else {
            writeln!(output, "Pokedex: {}", caught.join(", "))
        }
    }
}

fn print_step<W: Write>(step: &Step, output: &mut W) -> io::Result<()> {
    match step {
        Step::Page(names) => {
            for name in names {
                writeln!(output, "{}", name)?;
            }
            Ok(())
        }
        Step::Boundary(boundary) => writeln!(output, "{}", boundary.message()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Endpoints;
    use crate::cache::{Cache, CacheConfig};
    use crate::test_support::FakeSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const PAGE_1: &str = "https://pokeapi.co/api/v2/location-area/";
    const PAGE_2: &str = "https://pokeapi.co/api/v2/location-area/?offset=20&limit=20";

    fn source() -> FakeSource {
        FakeSource::new()
            .with(
                PAGE_1,
                &format!(
                    r#"{{"next":"{}","previous":null,"results":[{{"name":"canalave-city-area","url":"1"}}]}}"#,
                    PAGE_2
                ),
            )
            .with(
                PAGE_2,
                &format!(
                    r#"{{"next":null,"previous":"{}","results":[{{"name":"sunyshore-city-area","url":"21"}}]}}"#,
                    PAGE_1
                ),
            )
    }

    fn repl(source: FakeSource) -> Repl<FakeSource> {
        let session = Session::new(
            source,
            Cache::new(CacheConfig::default()),
            Endpoints::default(),
            StdRng::seed_from_u64(0),
        );
        Repl::new(session, CommandTable::standard()).with_prompt("> ")
    }

    async fn run(repl: &mut Repl<FakeSource>, input: &str) -> String {
        let mut output = Vec::new();
        repl.run(input.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_clean_input_lowercases_and_splits() {
        assert_eq!(clean_input("  Hello  World "), vec!["hello", "world"]);
        assert_eq!(clean_input("Charmander Bulbasaur PIKACHU"), vec!["charmander", "bulbasaur", "pikachu"]);
        assert!(clean_input("   ").is_empty());
    }

    #[tokio::test]
    async fn test_map_then_mapb() {
        let mut repl = repl(source());

        let out = run(&mut repl, "map\nmap\nmapb\n").await;

        assert_eq!(
            out,
            "> canalave-city-area\n> sunyshore-city-area\n> canalave-city-area\n> \n"
        );
        assert_eq!(repl.session().fetcher().source().calls(), 2);
    }

    #[tokio::test]
    async fn test_map_past_last_page_reports_boundary() {
        let mut repl = repl(source());

        let out = run(&mut repl, "map\nmap\nmap\n").await;

        assert!(out.contains("you're on the last page"));
        assert_eq!(repl.session().cursor().previous(), Some(PAGE_1));
    }

    #[tokio::test]
    async fn test_mapb_at_start_reports_first_page() {
        let mut repl = repl(source());

        let out = run(&mut repl, "mapb\n").await;

        assert!(out.contains("you're on the first page"));
        assert_eq!(repl.session().fetcher().source().calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_command_keeps_loop_running() {
        let mut repl = repl(FakeSource::new());

        let out = run(&mut repl, "map\nhelp\n").await;

        assert!(out.contains("Error: "));
        assert!(out.contains("returned HTTP 404"));
        assert!(out.contains("Welcome to the Pokedex!"));
    }

    #[tokio::test]
    async fn test_exit_stops_reading() {
        let mut repl = repl(source());

        let out = run(&mut repl, "exit\nmap\n").await;

        assert_eq!(out, "> Closing the Pokedex... Goodbye!\n");
        assert_eq!(repl.session().fetcher().source().calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_and_blank_lines() {
        let mut repl = repl(source());

        let out = run(&mut repl, "\n   \nfly\n").await;

        assert_eq!(out, "> > > Unknown command\n> \n");
    }

    #[tokio::test]
    async fn test_commands_are_case_insensitive() {
        let mut repl = repl(source());

        let out = run(&mut repl, "MAP\n").await;

        assert!(out.contains("canalave-city-area"));
    }

    #[tokio::test]
    async fn test_missing_arguments_print_usage() {
        let mut repl = repl(source());

        let out = run(&mut repl, "explore\ncatch\ninspect\n").await;

        assert!(out.contains("Please provide a location name"));
        assert_eq!(out.matches("Please provide a pokemon name").count(), 2);
    }

    #[tokio::test]
    async fn test_help_lists_every_command() {
        let mut repl = repl(source());

        let out = run(&mut repl, "help\n").await;

        for command in CommandTable::standard().iter() {
            assert!(out.contains(&format!("{}: ", command.name)));
        }
    }

    #[tokio::test]
    async fn test_catch_inspect_and_pokedex() {
        let source = source().with(
            "https://pokeapi.co/api/v2/pokemon/pidgey",
            r#"{"name":"pidgey","base_experience":20,"height":3,"weight":18,
                "stats":[{"base_stat":40,"stat":{"name":"hp","url":"s"}}],
                "types":[{"slot":1,"type":{"name":"flying","url":"t"}}]}"#,
        );
        let mut repl = repl(source);

        let out = run(&mut repl, "pokedex\ncatch Pidgey\ninspect pidgey\npokedex\n").await;

        assert!(out.contains("Your Pokedex is empty"));
        assert!(out.contains("Throwing a Pokeball at pidgey...\npidgey was caught!"));
        assert!(out.contains("Name: pidgey\nHeight: 3\nWeight: 18\nStats:\n  -hp: 40\nTypes:\n  - flying\n"));
        assert!(out.contains("Your Pokedex:\n  - pidgey (caught "));
    }

    #[tokio::test]
    async fn test_config_shows_cursor_and_cache() {
        let mut repl = repl(source());

        let out = run(&mut repl, "map\nconfig\n").await;

        assert!(out.contains(&format!("Next: {}", PAGE_2)));
        assert!(out.contains("Previous: none"));
        assert!(out.contains("Cache: 1 entries, ttl 300s, reap every 1000ms"));
        assert!(out.contains("Pokedex: none"));
    }
}
