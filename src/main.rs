//! Binary entry point for the `ukfast` CLI.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use ukfast::commands::{self, CommandContext, CommandError, ErrorLevel};
use ukfast::config::CliConfig;
use ukfast::output::{RenderFormat, RenderOptions, parse_field_list};
use ukfast::params::FlagSnapshot;
use ukfast::resources::account::Contact;
use ukfast::resources::ddosx::DdosxDomain;
use ukfast::resources::ecloud::{Volume, VolumeCreate, VolumePatch, Vpc};
use ukfast::resources::loadbalancer::{Listener, ListenerCreate, ListenerPatch};
use ukfast::resources::loadtest::LoadTestDomain;
use ukfast::{Catalog, logging};

mod cli;

use cli::{
    AccountCommand, Cli, Command, ContactCommand, DdosxCommand, DdosxDomainCommand,
    EcloudCommand, GlobalArgs, ListArgs, ListenerCommand, ListenerCreateArgs, LoadBalancerCommand,
    LoadTestCommand, LoadTestDomainCommand, OutputFormat, VolumeCommand, VolumeCreateArgs,
    VpcCommand,
};

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(level) => ExitCode::from(level.exit_code()),
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ErrorLevel, CommandError> {
    let config = CliConfig::load_without_cli_args()?;
    config.validate()?;
    logging::init(&config.log_level)?;
    let options = render_options(&cli.global, &config)?;
    let catalog = Catalog::open(config.catalog_path())?;

    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut ctx = CommandContext::new(&mut out, &mut err, options);
    dispatch(&mut ctx, &catalog, &cli.command)?;
    Ok(ctx.errors())
}

fn render_options(global: &GlobalArgs, config: &CliConfig) -> Result<RenderOptions, CommandError> {
    let format = global
        .output
        .map_or_else(|| config.render_format(), |format| Ok(render_format(format)))?;
    let fields = global
        .fields
        .as_deref()
        .map(parse_field_list)
        .unwrap_or_default();
    Ok(RenderOptions::new(format)
        .with_fields(fields)
        .with_no_header(global.no_header))
}

const fn render_format(format: OutputFormat) -> RenderFormat {
    match format {
        OutputFormat::Table => RenderFormat::Table,
        OutputFormat::Csv => RenderFormat::Csv,
        OutputFormat::Json => RenderFormat::Json,
        OutputFormat::Value => RenderFormat::Value,
        OutputFormat::List => RenderFormat::List,
    }
}

fn snapshot(args: &ListArgs) -> FlagSnapshot {
    FlagSnapshot::new()
        .filters(args.filter.iter().cloned())
        .sorts(args.sort.iter().cloned())
        .page(args.page)
        .per_page(args.per_page)
}

fn dispatch(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &Command,
) -> Result<(), CommandError> {
    match command {
        Command::Ecloud { command } => match command {
            EcloudCommand::Volume { command } => volume(ctx, catalog, command),
            EcloudCommand::Vpc { command } => vpc(ctx, catalog, command),
        },
        Command::Loadbalancer {
            command: LoadBalancerCommand::Listener { command },
        } => listener(ctx, catalog, command),
        Command::Loadtest {
            command: LoadTestCommand::Domain { command },
        } => loadtest_domain(ctx, catalog, command),
        Command::Account {
            command: AccountCommand::Contact { command },
        } => contact(ctx, catalog, command),
        Command::Ddosx {
            command: DdosxCommand::Domain { command },
        } => ddosx_domain(ctx, catalog, command),
    }
}

fn volume(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &VolumeCommand,
) -> Result<(), CommandError> {
    match command {
        VolumeCommand::List(args) => {
            let flags = snapshot(&args.list)
                .typed("name", args.name.as_deref())
                .typed("router", args.router.as_deref());
            commands::list::<Volume, _>(ctx, catalog, &flags)
        }
        VolumeCommand::Show(args) => commands::show::<Volume, _>(ctx, catalog, &args.ids),
        VolumeCommand::Create(args) => {
            commands::create::<Volume, _>(ctx, catalog, &volume_request(args))
        }
        VolumeCommand::Update(args) => {
            let patch = VolumePatch {
                name: args.name.clone(),
            };
            commands::update::<Volume, _>(ctx, catalog, &args.target.ids, &patch)
        }
        VolumeCommand::Delete(args) => {
            commands::delete::<Volume, _>(ctx, catalog, &args.ids);
            Ok(())
        }
    }
}

fn vpc(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &VpcCommand,
) -> Result<(), CommandError> {
    match command {
        VpcCommand::List(args) => {
            let flags = snapshot(&args.list).typed("name", args.name.as_deref());
            commands::list::<Vpc, _>(ctx, catalog, &flags)
        }
        VpcCommand::Show(args) => commands::show::<Vpc, _>(ctx, catalog, &args.ids),
    }
}

fn listener(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &ListenerCommand,
) -> Result<(), CommandError> {
    match command {
        ListenerCommand::List(args) => {
            let flags = snapshot(&args.list).typed("name", args.name.as_deref());
            commands::list::<Listener, _>(ctx, catalog, &flags)
        }
        ListenerCommand::Show(args) => commands::show::<Listener, _>(ctx, catalog, &args.ids),
        ListenerCommand::Create(args) => {
            let request = listener_request(args)?;
            commands::create::<Listener, _>(ctx, catalog, &request)
        }
        ListenerCommand::Update(args) => {
            let patch = ListenerPatch {
                name: args.name.clone(),
                hsts_enabled: args.hsts_enabled,
                redirect_https: args.redirect_https,
            };
            commands::update::<Listener, _>(ctx, catalog, &args.target.ids, &patch)
        }
        ListenerCommand::Delete(args) => {
            commands::delete::<Listener, _>(ctx, catalog, &args.ids);
            Ok(())
        }
    }
}

fn volume_request(args: &VolumeCreateArgs) -> VolumeCreate {
    VolumeCreate {
        name: args.name.clone(),
        vpc_id: args.vpc.clone(),
        router_id: args.router.clone(),
        capacity: args.capacity,
        iops: args.iops,
    }
}

fn listener_request(args: &ListenerCreateArgs) -> Result<ListenerCreate, CommandError> {
    Ok(ListenerCreate {
        name: args.name.clone(),
        cluster_id: args.cluster,
        default_target_group_id: args.default_target_group,
        mode: args.mode.parse()?,
        hsts_enabled: args.hsts_enabled,
        redirect_https: args.redirect_https,
    })
}

fn loadtest_domain(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &LoadTestDomainCommand,
) -> Result<(), CommandError> {
    match command {
        LoadTestDomainCommand::List(args) => {
            let flags = snapshot(&args.list).typed("name", args.name.as_deref());
            commands::list::<LoadTestDomain, _>(ctx, catalog, &flags)
        }
        LoadTestDomainCommand::Show(args) => {
            commands::show_located::<LoadTestDomain, _>(ctx, catalog, &args.ids)
        }
        LoadTestDomainCommand::Delete(args) => {
            commands::delete::<LoadTestDomain, _>(ctx, catalog, &args.ids);
            Ok(())
        }
    }
}

fn contact(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &ContactCommand,
) -> Result<(), CommandError> {
    match command {
        ContactCommand::List(args) => {
            let flags = snapshot(&args.list).typed("type", args.contact_type.as_deref());
            commands::list::<Contact, _>(ctx, catalog, &flags)
        }
        ContactCommand::Show(args) => commands::show::<Contact, _>(ctx, catalog, &args.ids),
    }
}

fn ddosx_domain(
    ctx: &mut CommandContext<'_>,
    catalog: &Catalog,
    command: &DdosxDomainCommand,
) -> Result<(), CommandError> {
    match command {
        DdosxDomainCommand::List(args) => {
            let flags = snapshot(&args.list).typed("name", args.name.as_deref());
            commands::list::<DdosxDomain, _>(ctx, catalog, &flags)
        }
        DdosxDomainCommand::Show(args) => {
            commands::show::<DdosxDomain, _>(ctx, catalog, &args.ids)
        }
    }
}

fn report_error(err: &CommandError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CommandError) {
    writeln!(target, "{err}").ok();
}
