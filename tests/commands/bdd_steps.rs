//! BDD step definitions for multi-item command handling.

use rstest_bdd_macros::{given, then, when};
use ukfast::commands::{delete, list, show, show_located};
use ukfast::params::FlagSnapshot;
use ukfast::resources::ecloud::Volume;
use ukfast::resources::loadbalancer::Listener;
use ukfast::resources::loadtest::LoadTestDomain;
use ukfast::test_support::ServiceCall;

use super::test_helpers::{CommandsContext, domain, listener, split_ids, volume};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("listener \"{id}\" named \"{name}\" exists")]
fn listener_exists(commands_context: CommandsContext, id: u32, name: String) -> CommandsContext {
    commands_context.listeners.insert(id, listener(id, &name));
    commands_context
}

#[given("retrieving listener \"{id}\" fails with \"{message}\"")]
fn listener_fails(commands_context: CommandsContext, id: u32, message: String) -> CommandsContext {
    commands_context.listeners.fail_get(id, &message);
    commands_context
}

#[given("volume \"{id}\" named \"{name}\" exists")]
fn volume_exists(commands_context: CommandsContext, id: String, name: String) -> CommandsContext {
    commands_context.volumes.insert(&id, volume(&id, &name));
    commands_context
}

#[given("load test domain \"{name}\" exists")]
fn domain_exists(commands_context: CommandsContext, name: String) -> CommandsContext {
    commands_context.domains.push_list(Ok(vec![domain(&name)]));
    commands_context
}

#[given("two load test domains named \"{name}\" exist")]
fn duplicate_domains_exist(commands_context: CommandsContext, name: String) -> CommandsContext {
    commands_context
        .domains
        .push_list(Ok(vec![domain(&name), domain(&name)]));
    commands_context
}

#[when("I show listeners \"{ids}\"")]
fn show_listeners(commands_context: CommandsContext, ids: String) -> CommandsContext {
    commands_context.run(|ctx, scenario| {
        show::<Listener, _>(ctx, &scenario.listeners, &split_ids(&ids))
    })
}

#[when("I delete volumes \"{ids}\"")]
fn delete_volumes(commands_context: CommandsContext, ids: String) -> CommandsContext {
    commands_context.run(|ctx, scenario| {
        delete::<Volume, _>(ctx, &scenario.volumes, &split_ids(&ids));
        Ok(())
    })
}

#[when("I show load test domains \"{values}\"")]
fn show_domains(commands_context: CommandsContext, values: String) -> CommandsContext {
    commands_context.run(|ctx, scenario| {
        show_located::<LoadTestDomain, _>(ctx, &scenario.domains, &split_ids(&values))
    })
}

#[when("I list volumes with filter \"{filter}\" and name flag \"{name}\"")]
fn list_with_typed_flag(
    commands_context: CommandsContext,
    filter: String,
    name: String,
) -> CommandsContext {
    let flags = FlagSnapshot::new()
        .filter(filter)
        .typed("name", Some(name.as_str()));
    commands_context.run(|ctx, scenario| list::<Volume, _>(ctx, &scenario.volumes, &flags))
}

#[when("I list volumes filtered by \"{filter}\"")]
fn list_with_filter(commands_context: CommandsContext, filter: String) -> CommandsContext {
    let flags = FlagSnapshot::new().filter(filter);
    commands_context.run(|ctx, scenario| list::<Volume, _>(ctx, &scenario.volumes, &flags))
}

#[then("stdout is \"{expected}\"")]
fn stdout_is(commands_context: &CommandsContext, expected: String) -> Result<(), StepError> {
    let stdout = &commands_context.outcome().stdout;
    if stdout.trim_end() == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected stdout {expected:?}, got {stdout:?}"
        )))
    }
}

#[then("stderr is \"{expected}\"")]
fn stderr_is(commands_context: &CommandsContext, expected: String) -> Result<(), StepError> {
    let stderr = &commands_context.outcome().stderr;
    if stderr.trim_end() == expected {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected stderr {expected:?}, got {stderr:?}"
        )))
    }
}

#[then("the error level is {level:u32}")]
fn error_level_is(commands_context: &CommandsContext, level: u32) -> Result<(), StepError> {
    let actual = commands_context.outcome().level.exit_code();
    if u32::from(actual) == level {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected error level {level}, got {actual}"
        )))
    }
}

#[then("volume \"{id}\" was deleted")]
fn volume_deleted(commands_context: &CommandsContext, id: String) -> Result<(), StepError> {
    let calls = commands_context.volumes.calls();
    if calls.contains(&ServiceCall::Delete(id.clone())) {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected delete of {id}, got {calls:?}"
        )))
    }
}

#[then("the volume list request filters \"{property}\" twice")]
fn list_filters_twice(
    commands_context: &CommandsContext,
    property: String,
) -> Result<(), StepError> {
    let calls = commands_context.volumes.calls();
    let [ServiceCall::List(params)] = calls.as_slice() else {
        return Err(StepError::Assertion(format!(
            "expected a single list call, got {calls:?}"
        )));
    };
    let matching = params
        .filters()
        .iter()
        .filter(|filter| filter.property == property)
        .count();
    if matching == 2 {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected two {property} filters, got {params}"
        )))
    }
}

#[then("the command fails mentioning \"{fragment}\"")]
fn command_fails(commands_context: &CommandsContext, fragment: String) -> Result<(), StepError> {
    match commands_context.outcome().error.as_deref() {
        Some(message) if message.contains(&fragment) => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected failure mentioning {fragment:?}, got {other:?}"
        ))),
    }
}

#[then("no volume service calls were made")]
fn no_volume_calls(commands_context: &CommandsContext) -> Result<(), StepError> {
    let calls = commands_context.volumes.calls();
    if calls.is_empty() {
        Ok(())
    } else {
        Err(StepError::Assertion(format!("unexpected calls: {calls:?}")))
    }
}
