//! Unit tests for the generic command handlers.

use super::*;
use crate::output::RenderFormat;
use crate::params::{FilterExpression, Operator, RequestParameters};
use crate::resources::ecloud::{Volume, VolumeCreate, VolumeEntity, VolumePatch};
use crate::resources::loadbalancer::{Listener, ListenerEntity};
use crate::resources::loadtest::{LoadTestDomain, LoadTestDomainEntity};
use crate::test_support::{ScriptedService, ServiceCall};
use rstest::rstest;

const DOMAIN_UUID: &str = "c1a2b3c4-0000-4000-8000-000000000001";

#[derive(Debug, Default)]
struct Streams {
    out: Vec<u8>,
    err: Vec<u8>,
}

impl Streams {
    fn run(
        &mut self,
        options: RenderOptions,
        body: impl FnOnce(&mut CommandContext<'_>) -> Result<(), CommandError>,
    ) -> (Result<(), CommandError>, ErrorLevel) {
        let mut ctx = CommandContext::new(&mut self.out, &mut self.err, options);
        let result = body(&mut ctx);
        (result, ctx.errors())
    }

    fn stdout(&self) -> String {
        String::from_utf8(self.out.clone()).unwrap_or_else(|err| panic!("stdout utf8: {err}"))
    }

    fn stderr(&self) -> String {
        String::from_utf8(self.err.clone()).unwrap_or_else(|err| panic!("stderr utf8: {err}"))
    }
}

fn listener(id: u32, name: &str) -> ListenerEntity {
    ListenerEntity {
        id,
        name: name.to_owned(),
        cluster_id: 1,
        mode: String::from("http"),
        ..ListenerEntity::default()
    }
}

fn volume(id: &str, name: &str) -> VolumeEntity {
    VolumeEntity {
        id: id.to_owned(),
        name: name.to_owned(),
        capacity: 20,
        sync: String::from("complete"),
        ..VolumeEntity::default()
    }
}

fn ids(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|id| (*id).to_owned()).collect()
}

fn csv_fields(fields: &[&str]) -> RenderOptions {
    RenderOptions::new(RenderFormat::Csv)
        .with_fields(fields.iter().copied())
        .with_no_header(true)
}

#[rstest]
fn show_renders_successes_and_reports_failures() {
    let service = ScriptedService::<Listener>::new();
    service.insert(123, listener(123, "web"));
    service.fail_get(456, "network down");
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["id", "name"]), |ctx| {
        show::<Listener, _>(ctx, &service, &ids(&["123", "456"]))
    });

    result.unwrap_or_else(|err| panic!("show: {err}"));
    assert_eq!(streams.stdout(), "123,web\n");
    assert_eq!(
        streams.stderr(),
        "Error retrieving listener [456]: network down\n"
    );
    assert_eq!(level.failures(), 1);
    assert_eq!(level.exit_code(), 1);
}

#[rstest]
fn show_reports_unparseable_ids_without_calling_service() {
    let service = ScriptedService::<Listener>::new();
    service.insert(7, listener(7, "api"));
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["id"]), |ctx| {
        show::<Listener, _>(ctx, &service, &ids(&["abc", "7"]))
    });

    result.unwrap_or_else(|err| panic!("show: {err}"));
    assert_eq!(streams.stdout(), "7\n");
    assert_eq!(streams.stderr(), "Invalid listener ID [abc]\n");
    assert_eq!(level.failures(), 1);
    assert_eq!(service.calls(), [ServiceCall::Get(String::from("7"))]);
}

#[rstest]
fn list_applies_typed_flags_after_filters() {
    let service = ScriptedService::<Volume>::new();
    service.push_list(Ok(vec![volume("vol-1", "data")]));
    let flags = FlagSnapshot::new()
        .filter("capacity:gt=10")
        .typed("router", Some("rtr-1"));
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["id"]), |ctx| {
        list::<Volume, _>(ctx, &service, &flags)
    });

    result.unwrap_or_else(|err| panic!("list: {err}"));
    assert_eq!(streams.stdout(), "vol-1\n");
    assert!(!level.is_failure());
    let expected = RequestParameters::new()
        .with_filter(FilterExpression::new(
            "capacity",
            Operator::Gt,
            vec![String::from("10")],
        ))
        .with_filter(FilterExpression::eq("router_id", "rtr-1"));
    assert_eq!(service.calls(), [ServiceCall::List(expected)]);
}

#[rstest]
fn list_failure_is_fatal_with_context() {
    let service = ScriptedService::<Volume>::new();
    service.push_list(Err(ServiceError::Backend(String::from("test error"))));
    let mut streams = Streams::default();

    let (result, _) = streams.run(RenderOptions::default(), |ctx| {
        list::<Volume, _>(ctx, &service, &FlagSnapshot::new())
    });

    let err = result.expect_err("list failure should abort");
    assert_eq!(err.to_string(), "Error retrieving volumes: test error");
    assert!(streams.stdout().is_empty());
}

#[rstest]
fn malformed_filter_aborts_before_service_call() {
    let service = ScriptedService::<Volume>::new();
    let flags = FlagSnapshot::new().filter("invalidfilter");
    let mut streams = Streams::default();

    let (result, _) = streams.run(RenderOptions::default(), |ctx| {
        list::<Volume, _>(ctx, &service, &flags)
    });

    assert!(matches!(result, Err(CommandError::Parameters(_))));
    assert!(service.calls().is_empty());
    assert!(streams.stdout().is_empty());
}

#[rstest]
fn update_reports_patch_and_refresh_failures_separately() {
    let service = ScriptedService::<Volume>::new();
    service.insert("vol-1", volume("vol-1", "renamed"));
    service.fail_patch("vol-2", "locked");
    let patch = VolumePatch {
        name: Some(String::from("renamed")),
    };
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["id", "name"]), |ctx| {
        update::<Volume, _>(ctx, &service, &ids(&["vol-1", "vol-2"]), &patch)
    });

    result.unwrap_or_else(|err| panic!("update: {err}"));
    assert_eq!(streams.stdout(), "vol-1,renamed\n");
    assert_eq!(streams.stderr(), "Error updating volume [vol-2]: locked\n");
    assert_eq!(level.failures(), 1);
    assert!(service.calls().contains(&ServiceCall::Patch {
        id: String::from("vol-1"),
        body: String::from(r#"{"name":"renamed"}"#),
    }));
}

#[rstest]
fn delete_continues_after_failure() {
    let service = ScriptedService::<Volume>::new();
    service.insert("b", volume("b", "logs"));
    let mut streams = Streams::default();

    let (result, level) = streams.run(RenderOptions::default(), |ctx| {
        delete::<Volume, _>(ctx, &service, &ids(&["a", "b"]));
        Ok(())
    });

    result.unwrap_or_else(|err| panic!("delete: {err}"));
    assert_eq!(
        streams.stderr(),
        "Error removing volume [a]: volume not found with ID [a]\n"
    );
    assert_eq!(level.exit_code(), 1);
    assert_eq!(
        service.calls(),
        [
            ServiceCall::Delete(String::from("a")),
            ServiceCall::Delete(String::from("b"))
        ]
    );
}

#[rstest]
fn show_located_routes_names_through_locator() {
    let service = ScriptedService::<LoadTestDomain>::new();
    let domain = LoadTestDomainEntity {
        id: String::from(DOMAIN_UUID),
        name: String::from("example.com"),
        ..LoadTestDomainEntity::default()
    };
    service.push_list(Ok(vec![domain.clone()]));
    service.insert(DOMAIN_UUID, domain);
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["name"]), |ctx| {
        show_located::<LoadTestDomain, _>(ctx, &service, &ids(&["example.com", DOMAIN_UUID]))
    });

    result.unwrap_or_else(|err| panic!("show: {err}"));
    assert_eq!(streams.stdout(), "example.com\nexample.com\n");
    assert!(!level.is_failure());
    let calls = service.calls();
    let [ServiceCall::List(params), ServiceCall::Get(id)] = calls.as_slice() else {
        panic!("unexpected calls: {calls:?}");
    };
    assert_eq!(params.filters(), [FilterExpression::eq("name", "example.com")]);
    assert_eq!(id, DOMAIN_UUID);
}

#[rstest]
fn show_located_reports_locator_failures() {
    let service = ScriptedService::<LoadTestDomain>::new();
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["name"]), |ctx| {
        show_located::<LoadTestDomain, _>(ctx, &service, &ids(&["missing.example"]))
    });

    result.unwrap_or_else(|err| panic!("show: {err}"));
    assert_eq!(
        streams.stderr(),
        "Error locating domain [missing.example]: no resource found with name [missing.example]\n"
    );
    assert!(level.is_failure());
}

type VolumeHandler =
    fn(&mut CommandContext<'_>, &ScriptedService<Volume>) -> Result<(), CommandError>;

fn new_volume() -> VolumeCreate {
    VolumeCreate {
        vpc_id: String::from("vpc-1"),
        capacity: 40,
        ..VolumeCreate::default()
    }
}

fn list_volumes(
    ctx: &mut CommandContext<'_>,
    service: &ScriptedService<Volume>,
) -> Result<(), CommandError> {
    list::<Volume, _>(ctx, service, &FlagSnapshot::new())
}

fn show_volume(
    ctx: &mut CommandContext<'_>,
    service: &ScriptedService<Volume>,
) -> Result<(), CommandError> {
    show::<Volume, _>(ctx, service, &ids(&["vol-1"]))
}

fn show_volume_by_name(
    ctx: &mut CommandContext<'_>,
    service: &ScriptedService<Volume>,
) -> Result<(), CommandError> {
    show_located::<Volume, _>(ctx, service, &ids(&["data"]))
}

fn rename_volume(
    ctx: &mut CommandContext<'_>,
    service: &ScriptedService<Volume>,
) -> Result<(), CommandError> {
    let patch = VolumePatch {
        name: Some(String::from("renamed")),
    };
    update::<Volume, _>(ctx, service, &ids(&["vol-1"]), &patch)
}

fn create_volume(
    ctx: &mut CommandContext<'_>,
    service: &ScriptedService<Volume>,
) -> Result<(), CommandError> {
    create::<Volume, _>(ctx, service, &new_volume())
}

#[rstest]
#[case::list(list_volumes)]
#[case::show(show_volume)]
#[case::show_located(show_volume_by_name)]
#[case::update(rename_volume)]
#[case::create(create_volume)]
fn unsupported_field_fails_before_any_service_call(#[case] handler: VolumeHandler) {
    let service = ScriptedService::<Volume>::new();
    service.insert("vol-1", volume("vol-1", "data"));
    service.push_create(Ok(String::from("vol-1")));
    let mut streams = Streams::default();

    let (result, level) = streams.run(
        RenderOptions::new(RenderFormat::Table).with_fields(["colour"]),
        |ctx| handler(ctx, &service),
    );

    assert!(matches!(
        result,
        Err(CommandError::Output(OutputError::UnsupportedField { ref field }))
            if field == "colour"
    ));
    assert!(service.calls().is_empty(), "calls: {:?}", service.calls());
    assert!(streams.stdout().is_empty());
    assert!(!level.is_failure());
}

#[rstest]
fn value_output_without_one_field_blocks_update() {
    let service = ScriptedService::<Volume>::new();
    service.insert("vol-1", volume("vol-1", "data"));
    let mut streams = Streams::default();
    let patch = VolumePatch {
        name: Some(String::from("renamed")),
    };

    let (result, _) = streams.run(RenderOptions::new(RenderFormat::Value), |ctx| {
        update::<Volume, _>(ctx, &service, &ids(&["vol-1"]), &patch)
    });

    assert!(matches!(
        result,
        Err(CommandError::Output(OutputError::ValueFieldCount { count: 0 }))
    ));
    assert!(service.calls().is_empty());
}

#[rstest]
fn value_output_lists_every_shown_item() {
    let service = ScriptedService::<Volume>::new();
    service.insert("vol-1", volume("vol-1", "data"));
    service.insert("vol-2", volume("vol-2", "logs"));
    let mut streams = Streams::default();

    let (result, _) = streams.run(
        RenderOptions::new(RenderFormat::Value).with_fields(["id"]),
        |ctx| show::<Volume, _>(ctx, &service, &ids(&["vol-1", "vol-2"])),
    );

    result.unwrap_or_else(|err| panic!("show: {err}"));
    assert_eq!(streams.stdout(), "vol-1\nvol-2\n");
}

#[rstest]
fn create_renders_the_refetched_entity() {
    let service = ScriptedService::<Volume>::new();
    service.push_create(Ok(String::from("vol-9")));
    service.insert("vol-9", volume("vol-9", "scratch"));
    let mut streams = Streams::default();

    let (result, level) = streams.run(csv_fields(&["id", "name"]), |ctx| {
        create::<Volume, _>(ctx, &service, &new_volume())
    });

    result.unwrap_or_else(|err| panic!("create: {err}"));
    assert_eq!(streams.stdout(), "vol-9,scratch\n");
    assert!(!level.is_failure());
    assert_eq!(
        service.calls(),
        [
            ServiceCall::Create(String::from(r#"{"vpc_id":"vpc-1","capacity":40}"#)),
            ServiceCall::Get(String::from("vol-9")),
        ]
    );
}

#[rstest]
#[case::create_rejected(
    Err(ServiceError::Backend(String::from("quota exceeded"))),
    "Error creating volume: quota exceeded"
)]
#[case::refetch_fails(
    Ok(String::from("vol-404")),
    "Error retrieving new volume: volume not found with ID [vol-404]"
)]
fn create_failures_are_fatal(
    #[case] response: Result<String, ServiceError>,
    #[case] expected: &str,
) {
    let service = ScriptedService::<Volume>::new();
    service.push_create(response);
    let mut streams = Streams::default();

    let (result, _) = streams.run(csv_fields(&["id"]), |ctx| {
        create::<Volume, _>(ctx, &service, &new_volume())
    });

    let err = result.expect_err("create should fail");
    assert_eq!(err.to_string(), expected);
    assert!(streams.stdout().is_empty());
}

#[rstest]
#[case(0, 0)]
#[case(1, 1)]
#[case(3, 1)]
fn exit_code_is_binary(#[case] failures: usize, #[case] expected: u8) {
    let mut level = ErrorLevel::new();
    for _ in 0..failures {
        level.record();
    }
    assert_eq!(level.exit_code(), expected);
}
