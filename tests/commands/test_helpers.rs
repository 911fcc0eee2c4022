//! Shared fixtures for command BDD scenarios.

use rstest::fixture;
use ukfast::commands::{CommandContext, CommandError, ErrorLevel};
use ukfast::output::{RenderFormat, RenderOptions};
use ukfast::resources::ecloud::{Volume, VolumeEntity};
use ukfast::resources::loadbalancer::{Listener, ListenerEntity};
use ukfast::resources::loadtest::{LoadTestDomain, LoadTestDomainEntity};
use ukfast::test_support::ScriptedService;

pub const DOMAIN_UUID: &str = "c1a2b3c4-0000-4000-8000-000000000001";

#[derive(Clone, Debug)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub level: ErrorLevel,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct CommandsContext {
    pub volumes: ScriptedService<Volume>,
    pub listeners: ScriptedService<Listener>,
    pub domains: ScriptedService<LoadTestDomain>,
    pub outcome: Option<CommandOutcome>,
}

impl CommandsContext {
    /// Runs `body` against in-memory streams and records what it produced.
    pub fn run(
        mut self,
        body: impl FnOnce(&mut CommandContext<'_>, &Self) -> Result<(), CommandError>,
    ) -> Self {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let options = RenderOptions::new(RenderFormat::Csv)
            .with_fields(["id", "name"])
            .with_no_header(true);
        let (result, level) = {
            let mut ctx = CommandContext::new(&mut out, &mut err, options);
            let result = body(&mut ctx, &self);
            (result, ctx.errors())
        };
        self.outcome = Some(CommandOutcome {
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
            level,
            error: result.err().map(|failure| failure.to_string()),
        });
        self
    }

    pub fn outcome(&self) -> &CommandOutcome {
        self.outcome
            .as_ref()
            .unwrap_or_else(|| panic!("scenario did not run a command"))
    }
}

#[fixture]
pub fn commands_context() -> CommandsContext {
    CommandsContext {
        volumes: ScriptedService::new(),
        listeners: ScriptedService::new(),
        domains: ScriptedService::new(),
        outcome: None,
    }
}

pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split_whitespace().map(str::to_owned).collect()
}

pub fn volume(id: &str, name: &str) -> VolumeEntity {
    VolumeEntity {
        id: id.to_owned(),
        name: name.to_owned(),
        ..VolumeEntity::default()
    }
}

pub fn listener(id: u32, name: &str) -> ListenerEntity {
    ListenerEntity {
        id,
        name: name.to_owned(),
        ..ListenerEntity::default()
    }
}

pub fn domain(name: &str) -> LoadTestDomainEntity {
    LoadTestDomainEntity {
        id: String::from(DOMAIN_UUID),
        name: name.to_owned(),
        ..LoadTestDomainEntity::default()
    }
}
