//! Sovereign CLI
//!
//! Command-line access to the configuration collections in a data directory.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use sovereign_store::datasource::{
    CreateDataSource, DataSourceFilter, DataSourceRepository, ListDataSource, SelectDataSource,
};
use sovereign_store::namespace::{
    CreateNamespace, ListNamespace, NamespaceFilter, NamespaceRepository, SelectNamespace,
};
use sovereign_store::query::{Order, PageRequest, SortField};
use sovereign_store::{Config, Driver, Registry, Result, Snowflake, Status, StoreError, Uid};

/// Sovereign configuration store CLI
#[derive(Parser, Debug)]
#[command(name = "sovereign")]
#[command(about = "Manage namespaces and data sources in a file-backed store")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./sovereign_data")]
    data_dir: String,

    /// Repository driver (file or memory)
    #[arg(long, default_value = "file")]
    driver: String,

    /// Node id for generated identifiers (0-1023)
    #[arg(short, long, default_value = "1")]
    node_id: u16,

    /// Background flush interval in milliseconds
    #[arg(long, default_value = "5000")]
    flush_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Data source definitions
    #[command(subcommand)]
    Datasource(DataSourceCommand),

    /// Namespaces
    #[command(subcommand)]
    Namespace(NamespaceCommand),
}

#[derive(Subcommand, Debug)]
enum DataSourceCommand {
    /// Create a data source
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        namespace: Uid,
        #[arg(long = "type", default_value = "metric")]
        kind: String,
        #[arg(long, default_value = "prometheus")]
        engine: String,
        #[arg(long, default_value = "")]
        endpoint: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "enabled")]
        status: Status,
        /// Config entry as key=value (repeatable)
        #[arg(long = "config", value_parser = parse_key_value)]
        config: Vec<(String, String)>,
        /// Metadata entry as key=value (repeatable)
        #[arg(long = "metadata", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
        #[arg(long, default_value = "1")]
        creator: Uid,
    },

    /// Show one data source
    Get { uid: Uid },

    /// Change the status of a data source
    UpdateStatus { uid: Uid, status: Status },

    /// Delete a data source
    Delete { uid: Uid },

    /// List data sources page by page
    List {
        #[command(flatten)]
        filter: DataSourceFilterArgs,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Select data sources after a cursor
    Select {
        #[command(flatten)]
        filter: DataSourceFilterArgs,
        #[command(flatten)]
        cursor: CursorArgs,
    },
}

#[derive(Subcommand, Debug)]
enum NamespaceCommand {
    /// Create a namespace
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "enabled")]
        status: Status,
        /// Metadata entry as key=value (repeatable)
        #[arg(long = "metadata", value_parser = parse_key_value)]
        metadata: Vec<(String, String)>,
        #[arg(long, default_value = "1")]
        creator: Uid,
    },

    /// Show one namespace
    Get { uid: Uid },

    /// Delete a namespace
    Delete { uid: Uid },

    /// List namespaces page by page
    List {
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value = "unknown")]
        status: Status,
        #[command(flatten)]
        page: PageArgs,
    },

    /// Select namespaces after a cursor
    Select {
        #[arg(long, default_value = "")]
        keyword: String,
        #[arg(long, default_value = "unknown")]
        status: Status,
        #[command(flatten)]
        cursor: CursorArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct DataSourceFilterArgs {
    #[arg(long)]
    namespace: Option<Uid>,
    #[arg(long, default_value = "unknown")]
    status: Status,
    #[arg(long = "type", default_value = "")]
    kind: String,
    #[arg(long, default_value = "")]
    engine: String,
    #[arg(long, default_value = "")]
    keyword: String,
}

impl From<DataSourceFilterArgs> for DataSourceFilter {
    fn from(args: DataSourceFilterArgs) -> Self {
        Self {
            namespace_uid: args.namespace,
            status: args.status,
            kind: args.kind,
            engine: args.engine,
            keyword: args.keyword,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct PageArgs {
    /// 1-based page; 0 lists everything
    #[arg(long, default_value = "0")]
    page: i32,
    #[arg(long, default_value = "0")]
    page_size: i32,
    #[arg(long, value_enum, default_value = "uid")]
    sort: SortArg,
    /// Sort descending
    #[arg(long)]
    desc: bool,
}

#[derive(ClapArgs, Debug)]
struct CursorArgs {
    /// Uid of the last item from the previous call
    #[arg(long)]
    cursor: Option<Uid>,
    #[arg(long, default_value = "20")]
    limit: i32,
    #[arg(long)]
    desc: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Id,
    Uid,
    Name,
    CreatedAt,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => SortField::SequenceId,
            SortArg::Uid => SortField::Uid,
            SortArg::Name => SortField::Name,
            SortArg::CreatedAt => SortField::CreatedAt,
        }
    }
}

fn order(desc: bool) -> Order {
    if desc {
        Order::Desc
    } else {
        Order::Asc
    }
}

fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {:?}", s))?;
    Ok((key.to_string(), value.to_string()))
}

#[derive(Serialize)]
struct Affected {
    rows_affected: u64,
}

fn print_yaml<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_yaml_ng::to_string(value).map_err(|e| StoreError::Encode(e.to_string()))?;
    print!("{}", text);
    Ok(())
}

fn main() {
    // Initialize tracing/logging (stderr, so stdout stays parseable YAML)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sovereign_store=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let driver: Driver = args.driver.parse()?;
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .driver(driver)
        .node_id(args.node_id)
        .flush_interval(Duration::from_millis(args.flush_ms.max(1)))
        .build();

    tracing::debug!("sovereign v{} using {} driver at {}", sovereign_store::VERSION, driver, args.data_dir);

    let registry = Registry::builtin();
    let ids = Arc::new(Snowflake::new(config.node_id)?);

    match args.command {
        Commands::Datasource(command) => {
            let repo = registry.open_datasource(&config, ids)?;
            let outcome = run_datasource(repo.as_ref(), command);
            repo.close()?;
            outcome
        }
        Commands::Namespace(command) => {
            let repo = registry.open_namespace(&config, ids)?;
            let outcome = run_namespace(repo.as_ref(), command);
            repo.close()?;
            outcome
        }
    }
}

fn run_datasource(repo: &dyn DataSourceRepository, command: DataSourceCommand) -> Result<()> {
    match command {
        DataSourceCommand::Create {
            name,
            namespace,
            kind,
            engine,
            endpoint,
            description,
            status,
            config,
            metadata,
            creator,
        } => {
            let created = repo.create(CreateDataSource {
                namespace_uid: namespace,
                kind,
                engine,
                name,
                status,
                endpoint,
                description,
                config: config.into_iter().collect::<BTreeMap<_, _>>(),
                metadata: metadata.into_iter().collect::<BTreeMap<_, _>>(),
                creator,
            })?;
            print_yaml(&created)
        }
        DataSourceCommand::Get { uid } => print_yaml(&repo.get(uid)?),
        DataSourceCommand::UpdateStatus { uid, status } => print_yaml(&Affected {
            rows_affected: repo.update_status(uid, status)?,
        }),
        DataSourceCommand::Delete { uid } => print_yaml(&Affected {
            rows_affected: repo.delete(uid)?,
        }),
        DataSourceCommand::List { filter, page } => {
            let request = ListDataSource {
                filter: filter.into(),
                sort_by: page.sort.into(),
                order: order(page.desc),
                page: PageRequest::new(page.page, page.page_size),
            };
            print_yaml(&repo.list(&request)?)
        }
        DataSourceCommand::Select { filter, cursor } => {
            let request = SelectDataSource {
                filter: filter.into(),
                order: order(cursor.desc),
                last_uid: cursor.cursor,
                limit: cursor.limit,
            };
            print_yaml(&repo.select(&request)?)
        }
    }
}

fn run_namespace(repo: &dyn NamespaceRepository, command: NamespaceCommand) -> Result<()> {
    match command {
        NamespaceCommand::Create {
            name,
            status,
            metadata,
            creator,
        } => {
            let created = repo.create(CreateNamespace {
                name,
                status,
                metadata: metadata.into_iter().collect(),
                creator,
            })?;
            print_yaml(&created)
        }
        NamespaceCommand::Get { uid } => print_yaml(&repo.get(uid)?),
        NamespaceCommand::Delete { uid } => print_yaml(&Affected {
            rows_affected: repo.delete(uid)?,
        }),
        NamespaceCommand::List {
            keyword,
            status,
            page,
        } => {
            let request = ListNamespace {
                filter: NamespaceFilter { status, keyword },
                sort_by: page.sort.into(),
                order: order(page.desc),
                page: PageRequest::new(page.page, page.page_size),
            };
            print_yaml(&repo.list(&request)?)
        }
        NamespaceCommand::Select {
            keyword,
            status,
            cursor,
        } => {
            let request = SelectNamespace {
                filter: NamespaceFilter { status, keyword },
                order: order(cursor.desc),
                last_uid: cursor.cursor,
                limit: cursor.limit,
            };
            print_yaml(&repo.select(&request)?)
        }
    }
}
