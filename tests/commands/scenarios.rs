//! BDD scenarios for multi-item command handling.

use rstest_bdd_macros::scenario;

use super::test_helpers::{CommandsContext, commands_context};

#[scenario(
    path = "tests/features/commands.feature",
    name = "Show renders successes and reports a failed listener"
)]
fn scenario_partial_show(commands_context: CommandsContext) {
    let _ = commands_context;
}

#[scenario(
    path = "tests/features/commands.feature",
    name = "Delete continues after a missing volume"
)]
fn scenario_delete_continues(commands_context: CommandsContext) {
    let _ = commands_context;
}

#[scenario(
    path = "tests/features/commands.feature",
    name = "Locate a load test domain by name"
)]
fn scenario_locate_domain(commands_context: CommandsContext) {
    let _ = commands_context;
}

#[scenario(
    path = "tests/features/commands.feature",
    name = "Report ambiguous load test domain names"
)]
fn scenario_ambiguous_domain(commands_context: CommandsContext) {
    let _ = commands_context;
}

#[scenario(
    path = "tests/features/commands.feature",
    name = "Keep typed and generic filters on the same property"
)]
fn scenario_duplicate_filters(commands_context: CommandsContext) {
    let _ = commands_context;
}

#[scenario(
    path = "tests/features/commands.feature",
    name = "Abort on malformed filters before calling the service"
)]
fn scenario_malformed_filter(commands_context: CommandsContext) {
    let _ = commands_context;
}
