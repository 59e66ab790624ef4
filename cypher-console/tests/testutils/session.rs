//! Session builders and a scripted line editor

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use cypher_console::{
    CapturedOutput, ConsoleConfig, Dispatcher, Environment, LineEditor, ReadOutcome, Repl,
    Result,
};

use super::fake_server::FakeServer;

/// Everything a test needs to drive one console session
pub struct TestSession {
    pub server: FakeServer,
    pub output: CapturedOutput,
    pub env: Environment,
    pub dispatcher: Dispatcher,
}

impl TestSession {
    /// Connected session with the default configuration
    pub fn connected() -> Self {
        let mut session = Self::disconnected(ConsoleConfig::default());
        session
            .env
            .connect_default()
            .expect("fake server accepts connections");
        session
    }

    /// Connected session flagged as interactive
    pub fn interactive() -> Self {
        let mut session = Self::build(ConsoleConfig::default(), true);
        session
            .env
            .connect_default()
            .expect("fake server accepts connections");
        session
    }

    pub fn disconnected(config: ConsoleConfig) -> Self {
        Self::build(config, false)
    }

    fn build(config: ConsoleConfig, interactive: bool) -> Self {
        let server = FakeServer::new();
        let output = CapturedOutput::new();
        let dispatcher = Dispatcher::from_config(&config).expect("builtin dispatcher");
        let env = Environment::new(
            server.driver(),
            config,
            Box::new(output.clone()),
            interactive,
        );
        Self {
            server,
            output,
            env,
            dispatcher,
        }
    }

    pub fn feed(&mut self, line: &str) -> cypher_console::Flow {
        self.dispatcher.dispatch(&mut self.env, line)
    }

    pub fn feed_all(&mut self, lines: &[&str]) {
        for line in lines {
            self.feed(line);
        }
    }

    pub fn into_repl(self) -> (Repl, FakeServer, CapturedOutput) {
        (
            Repl::new(self.env, self.dispatcher),
            self.server,
            self.output,
        )
    }
}

/// Line editor that replays a fixed script and records what it was asked
#[derive(Debug, Default)]
pub struct ScriptedEditor {
    script: VecDeque<ReadOutcome>,
    pub prompts: Vec<String>,
    pub history: Vec<String>,
    pub loaded_from: Option<PathBuf>,
    pub saved_to: Option<PathBuf>,
}

impl ScriptedEditor {
    pub fn new(script: Vec<ReadOutcome>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    pub fn lines(lines: &[&str]) -> Self {
        Self::new(
            lines
                .iter()
                .map(|line| ReadOutcome::Line(line.to_string()))
                .collect(),
        )
    }
}

impl LineEditor for ScriptedEditor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome> {
        self.prompts.push(prompt.to_string());
        Ok(self.script.pop_front().unwrap_or(ReadOutcome::Eof))
    }

    fn add_history_entry(&mut self, line: &str) {
        self.history.push(line.to_string());
    }

    fn load_history(&mut self, path: &Path) -> Result<()> {
        self.loaded_from = Some(path.to_path_buf());
        Ok(())
    }

    fn save_history(&mut self, path: &Path) -> Result<()> {
        self.saved_to = Some(path.to_path_buf());
        Ok(())
    }
}
