//! Command-line interface definitions for the `ukfast` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `ukfast` binary.
#[derive(Debug, Parser)]
#[command(
    name = "ukfast",
    version,
    about = "Manage UKFast cloud resources from the command line",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Output flags accepted by every command.
#[derive(Debug, Default, Args)]
pub(crate) struct GlobalArgs {
    /// Output format; defaults to the configured `output` setting.
    #[arg(short = 'o', long, global = true, value_enum, value_name = "FORMAT")]
    pub(crate) output: Option<OutputFormat>,
    /// Comma-separated fields to display, in display order.
    #[arg(long, global = true, value_name = "FIELDS")]
    pub(crate) fields: Option<String>,
    /// Omit the header line from table and CSV output.
    #[arg(long, global = true)]
    pub(crate) no_header: bool,
}

/// Values accepted by `--output`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Column-aligned table.
    Table,
    /// Comma separated values.
    Csv,
    /// Complete records as a JSON array.
    Json,
    /// A single bare value.
    Value,
    /// One line of bare values per record.
    List,
}

/// Service command groups.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Commands relating to eCloud.
    Ecloud {
        #[command(subcommand)]
        command: EcloudCommand,
    },
    /// Commands relating to load balancers.
    Loadbalancer {
        #[command(subcommand)]
        command: LoadBalancerCommand,
    },
    /// Commands relating to load testing.
    Loadtest {
        #[command(subcommand)]
        command: LoadTestCommand,
    },
    /// Commands relating to the account.
    Account {
        #[command(subcommand)]
        command: AccountCommand,
    },
    /// Commands relating to DDoSX.
    Ddosx {
        #[command(subcommand)]
        command: DdosxCommand,
    },
}

/// eCloud resources.
#[derive(Debug, Subcommand)]
pub(crate) enum EcloudCommand {
    /// Manage volumes.
    Volume {
        #[command(subcommand)]
        command: VolumeCommand,
    },
    /// Manage VPCs.
    Vpc {
        #[command(subcommand)]
        command: VpcCommand,
    },
}

/// Load balancer resources.
#[derive(Debug, Subcommand)]
pub(crate) enum LoadBalancerCommand {
    /// Manage listeners.
    Listener {
        #[command(subcommand)]
        command: ListenerCommand,
    },
}

/// Load testing resources.
#[derive(Debug, Subcommand)]
pub(crate) enum LoadTestCommand {
    /// Manage domains.
    Domain {
        #[command(subcommand)]
        command: LoadTestDomainCommand,
    },
}

/// Account resources.
#[derive(Debug, Subcommand)]
pub(crate) enum AccountCommand {
    /// Manage contacts.
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },
}

/// DDoSX resources.
#[derive(Debug, Subcommand)]
pub(crate) enum DdosxCommand {
    /// Manage domains.
    Domain {
        #[command(subcommand)]
        command: DdosxDomainCommand,
    },
}

/// VPC operations.
#[derive(Debug, Subcommand)]
pub(crate) enum VpcCommand {
    /// List VPCs.
    List(NameListArgs),
    /// Show one or more VPCs.
    Show(IdArgs),
}

/// Contact operations.
#[derive(Debug, Subcommand)]
pub(crate) enum ContactCommand {
    /// List contacts.
    List(ContactListArgs),
    /// Show one or more contacts.
    Show(IdArgs),
}

/// DDoSX domain operations.
#[derive(Debug, Subcommand)]
pub(crate) enum DdosxDomainCommand {
    /// List domains.
    List(NameListArgs),
    /// Show one or more domains by name.
    Show(IdArgs),
}

/// Volume operations.
#[derive(Debug, Subcommand)]
pub(crate) enum VolumeCommand {
    /// List volumes.
    List(VolumeListArgs),
    /// Show one or more volumes.
    Show(IdArgs),
    /// Create a volume.
    Create(VolumeCreateArgs),
    /// Update one or more volumes.
    Update(VolumeUpdateArgs),
    /// Remove one or more volumes.
    Delete(IdArgs),
}

/// Listener operations.
#[derive(Debug, Subcommand)]
pub(crate) enum ListenerCommand {
    /// List listeners.
    List(NameListArgs),
    /// Show one or more listeners.
    Show(IdArgs),
    /// Create a listener.
    Create(ListenerCreateArgs),
    /// Update one or more listeners.
    Update(ListenerUpdateArgs),
    /// Remove one or more listeners.
    Delete(IdArgs),
}

/// Load test domain operations.
#[derive(Debug, Subcommand)]
pub(crate) enum LoadTestDomainCommand {
    /// List domains.
    List(NameListArgs),
    /// Show one or more domains by UUID or name.
    Show(IdArgs),
    /// Remove one or more domains.
    Delete(IdArgs),
}

/// Filtering, sorting and paging flags shared by list commands.
#[derive(Debug, Default, Args)]
pub(crate) struct ListArgs {
    /// Filter as `property[:operator]=value[,value...]`; repeatable.
    #[arg(long, value_name = "FILTER")]
    pub(crate) filter: Vec<String>,
    /// Sort as `property[:asc|desc]`; repeatable, first takes precedence.
    #[arg(long, value_name = "SORT")]
    pub(crate) sort: Vec<String>,
    /// Page number to retrieve.
    #[arg(long, value_name = "PAGE")]
    pub(crate) page: Option<u32>,
    /// Number of items per page.
    #[arg(long, value_name = "COUNT")]
    pub(crate) per_page: Option<u32>,
}

/// List flags for resources filterable by name.
#[derive(Debug, Default, Args)]
pub(crate) struct NameListArgs {
    #[command(flatten)]
    pub(crate) list: ListArgs,
    /// Only show resources with this name; `*` matches any run of characters.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
}

/// List flags for volumes.
#[derive(Debug, Default, Args)]
pub(crate) struct VolumeListArgs {
    #[command(flatten)]
    pub(crate) list: ListArgs,
    /// Only show volumes with this name.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
    /// Only show volumes attached through this router.
    #[arg(long, value_name = "ROUTER_ID")]
    pub(crate) router: Option<String>,
}

/// List flags for contacts.
#[derive(Debug, Default, Args)]
pub(crate) struct ContactListArgs {
    #[command(flatten)]
    pub(crate) list: ListArgs,
    /// Only show contacts of these comma-separated types.
    #[arg(long = "type", value_name = "TYPE")]
    pub(crate) contact_type: Option<String>,
}

/// Positional identifiers for show, update and delete.
#[derive(Debug, Default, Args)]
pub(crate) struct IdArgs {
    /// Resource identifiers, processed in order.
    #[arg(required = true, value_name = "ID")]
    pub(crate) ids: Vec<String>,
}

/// Flags for `ecloud volume update`.
#[derive(Debug, Default, Args)]
pub(crate) struct VolumeUpdateArgs {
    #[command(flatten)]
    pub(crate) target: IdArgs,
    /// New volume name.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
}

/// Flags for `ecloud volume create`.
#[derive(Debug, Default, Args)]
pub(crate) struct VolumeCreateArgs {
    /// Name of the volume.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
    /// VPC to create the volume in.
    #[arg(long, required = true, value_name = "VPC_ID")]
    pub(crate) vpc: String,
    /// Capacity in GiB.
    #[arg(long, required = true, value_name = "GIB")]
    pub(crate) capacity: u32,
    /// Provisioned IOPS.
    #[arg(long, value_name = "IOPS")]
    pub(crate) iops: Option<u32>,
    /// Router to attach the volume through.
    #[arg(long, value_name = "ROUTER_ID")]
    pub(crate) router: Option<String>,
}

/// Flags for `loadbalancer listener create`.
#[derive(Debug, Default, Args)]
pub(crate) struct ListenerCreateArgs {
    /// Name of the listener.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
    /// Cluster to add the listener to.
    #[arg(long, required = true, value_name = "CLUSTER_ID")]
    pub(crate) cluster: u32,
    /// Listener mode, `http` or `tcp`.
    #[arg(long, required = true, value_name = "MODE")]
    pub(crate) mode: String,
    /// Target group receiving unmatched traffic.
    #[arg(long, value_name = "TARGET_GROUP_ID")]
    pub(crate) default_target_group: Option<u32>,
    /// Send HSTS headers.
    #[arg(long)]
    pub(crate) hsts_enabled: bool,
    /// Redirect plain HTTP to HTTPS.
    #[arg(long)]
    pub(crate) redirect_https: bool,
}

/// Flags for `loadbalancer listener update`.
#[derive(Debug, Default, Args)]
pub(crate) struct ListenerUpdateArgs {
    #[command(flatten)]
    pub(crate) target: IdArgs,
    /// New listener name.
    #[arg(long, value_name = "NAME")]
    pub(crate) name: Option<String>,
    /// Enable or disable HSTS.
    #[arg(long, value_name = "BOOL")]
    pub(crate) hsts_enabled: Option<bool>,
    /// Enable or disable redirection from HTTP to HTTPS.
    #[arg(long, value_name = "BOOL")]
    pub(crate) redirect_https: Option<bool>,
}
