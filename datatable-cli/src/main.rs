mod render;

use std::fs::File;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use datatable_lib::RestClient;
use datatable_lib::ResourceService;
use datatable_lib::actions::ActionConfig;
use datatable_lib::actions::ActionResolver;
use datatable_lib::actions::CrudAction;
use datatable_lib::auth::StaticTokenProvider;
use datatable_lib::columns::ColumnDef;
use datatable_lib::columns::ColumnSet;
use datatable_lib::columns::HeaderOptions;
use datatable_lib::columns::formatters;
use datatable_lib::fetch::ListController;
use datatable_lib::fetch::ListOptions;
use datatable_lib::model::Item;
use datatable_lib::model::Key;
use datatable_lib::selection::SelectionOptions;
use datatable_lib::selection::TableSelection;
use datatable_lib::transport::QueryParams;
use simplelog::ColorChoice;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;

/// Browse and edit a paginated REST resource from the terminal.
#[derive(Debug, Parser)]
#[command(name = "datatable", version)]
struct Cli {
    /// API base URL, e.g. https://api.example.com/v1
    #[arg(long, env = "DATATABLE_URL")]
    url: String,

    /// Bearer token sent with every request
    #[arg(long, env = "DATATABLE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Log file
    #[arg(long, default_value = "datatable.log")]
    log_file: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List records as a table
    List(ListArgs),
    /// Show one record as JSON
    Get { resource: String, id: String },
    /// Create a record from a JSON object
    Create { resource: String, json: String },
    /// Replace a record from a JSON object (id included)
    Update { resource: String, json: String },
    /// Delete a record
    Delete { resource: String, id: String },
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Resource path, e.g. /api/users
    resource: String,

    #[arg(long, default_value_t = 1)]
    page: usize,

    #[arg(long, default_value_t = 10)]
    per_page: usize,

    /// Keep loading pages until the last one
    #[arg(long)]
    all: bool,

    /// Extra query parameter, repeatable
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_pair)]
    params: Vec<(String, String)>,

    /// Columns to show (dotted paths); defaults to the fields of the first row
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Columns rendered with thousands separators
    #[arg(long, value_delimiter = ',')]
    numeric: Vec<String>,

    /// Field to group rows by
    #[arg(long)]
    group_by: Option<String>,

    /// Field identifying a row
    #[arg(long)]
    key: Option<String>,

    /// Mark rows with these keys as selected
    #[arg(long, value_delimiter = ',')]
    select: Vec<String>,

    /// Show a row number column
    #[arg(long)]
    index: bool,

    /// Row actions to list
    #[arg(long, value_delimiter = ',')]
    actions: Vec<CrudArg>,

    /// Route action, repeatable
    #[arg(long = "route", value_name = "NAME=TARGET", value_parser = parse_pair)]
    routes: Vec<(String, String)>,

    /// Download action, repeatable
    #[arg(long = "download", value_name = "NAME=URL", value_parser = parse_pair)]
    downloads: Vec<(String, String)>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CrudArg {
    View,
    Edit,
    Delete,
}

impl From<CrudArg> for CrudAction {
    fn from(arg: CrudArg) -> Self {
        match arg {
            CrudArg::View => CrudAction::View,
            CrudArg::Edit => CrudAction::Edit,
            CrudArg::Delete => CrudAction::Delete,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Api(#[from] datatable_lib::error::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object")]
    NotAnObject,
}

impl From<datatable_lib::error::ApiError> for CliError {
    fn from(err: datatable_lib::error::ApiError) -> Self {
        CliError::Api(err.into())
    }
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got `{s}`"))
}

fn init_logging(path: &str) {
    let result = match File::create(path) {
        Ok(file) => WriteLogger::init(LevelFilter::Debug, Config::default(), file),
        Err(_) => TermLogger::init(
            LevelFilter::Warn,
            Config::default(),
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ),
    };
    if let Err(e) = result {
        eprintln!("Logging disabled: {}", e);
    }
}

fn build_client(cli: &Cli) -> Result<RestClient, CliError> {
    let mut builder = RestClient::builder()
        .url(cli.url.clone())
        .timeout(Duration::from_secs(cli.timeout));
    if let Some(token) = &cli.token {
        builder = builder.token_provider(StaticTokenProvider::new(token.clone()));
    }
    Ok(builder.build()?)
}

fn parse_object(json: &str) -> Result<Item, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(CliError::NotAnObject);
    }
    Ok(serde_json::from_value(value)?)
}

fn print_record(item: Option<&Item>) -> Result<(), CliError> {
    if let Some(item) = item {
        println!("{}", serde_json::to_string_pretty(item)?);
    }
    Ok(())
}

fn parse_key(s: &str) -> Key {
    match s.parse::<i64>() {
        Ok(n) => Key::Int(n),
        Err(_) => Key::from(s),
    }
}

async fn list(client: Arc<RestClient>, args: ListArgs) -> Result<(), CliError> {
    let query: QueryParams = args.params.into_iter().collect();
    let list = ListController::new(
        client,
        ListOptions::new(args.resource)
            .with_page_size(args.per_page)
            .with_query_params(query)
            .with_auto_fetch(false),
    );

    list.fetch(QueryParams::new().with("page", args.page)).await?;
    if args.all {
        while list.state().has_more {
            list.load_more().await?;
        }
    }

    let state = list.state();

    let mut selection_options = SelectionOptions::new();
    if let Some(group_by) = &args.group_by {
        selection_options = selection_options.with_group_by(group_by.as_str());
    }
    if let Some(key) = &args.key {
        selection_options = selection_options.with_unique_key(key.as_str());
    }
    let mut selection = TableSelection::new(selection_options);
    selection.set_items(state.items.to_vec());
    if !args.select.is_empty() {
        let keys: Vec<Key> = args.select.iter().map(|s| parse_key(s)).collect();
        selection.select_where(&keys);
    }
    selection.expand_all_groups();

    let mut action_config = ActionConfig::new().with_crud(args.actions.into_iter().map(CrudAction::from));
    for (name, target) in args.routes {
        action_config = action_config.with_route(name, target);
    }
    for (name, url) in args.downloads {
        action_config = action_config.with_download(name, url);
    }
    let actions = ActionResolver::new(action_config);

    let keys = if args.columns.is_empty() {
        state
            .items
            .first()
            .map(|item| item.keys().map(str::to_string).collect())
            .unwrap_or_default()
    } else {
        args.columns
    };
    let defs = keys.into_iter().map(|key| {
        let def = ColumnDef::new(key.clone(), key.clone());
        if args.numeric.contains(&key) {
            def.with_formatter(formatters::thousands(0))
        } else {
            def
        }
    });
    let columns = ColumnSet::normalize(
        defs,
        &HeaderOptions::new()
            .with_selectable(!args.select.is_empty())
            .with_index(args.index)
            .with_actions(actions.has_any_actions()),
    );

    render::print_list(&state, &selection, &columns, &actions, args.group_by.is_some());
    Ok(())
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = Arc::new(build_client(&cli)?);

    match cli.command {
        Command::List(args) => list(client, args).await,
        Command::Get { resource, id } => {
            let item = ResourceService::new(client, resource).get(id).await?;
            print_record(Some(&item))
        }
        Command::Create { resource, json } => {
            let item = parse_object(&json)?;
            let created = ResourceService::new(client, resource).create(&item).await?;
            print_record(created.as_ref())
        }
        Command::Update { resource, json } => {
            let item = parse_object(&json)?;
            let updated = ResourceService::new(client, resource).update(&item).await?;
            print_record(updated.as_ref())
        }
        Command::Delete { resource, id } => {
            ResourceService::new(client, resource).delete(&id).await?;
            println!("Deleted {id}");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&cli.log_file);

    if let Err(e) = run(cli).await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
