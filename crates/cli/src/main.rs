mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use leadsync_core::{ClientConfig, DEFAULT_PAGE_LIMIT};
use tracing_subscriber::EnvFilter;

use crate::commands::resource::ResourceAction;

#[derive(Parser)]
#[command(name = "leadsync")]
#[command(about = "Paginated CRM resources from the command line", long_about = None)]
struct Cli {
    /// Backend base URL. Overrides LEADSYNC_API_URL.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Bearer token. Overrides LEADSYNC_API_TOKEN.
    #[arg(long, global = true)]
    token: Option<String>,
    /// Workspace id sent as x-workspace-id. Overrides LEADSYNC_WORKSPACE_ID.
    #[arg(long, global = true)]
    workspace: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one page of a resource
    List {
        resource: String,
        #[arg(short, long, default_value = "1")]
        page: i64,
        #[arg(short, long, default_value_t = i64::from(DEFAULT_PAGE_LIMIT))]
        limit: i64,
    },
    /// Create a record from a JSON payload
    Create {
        resource: String,
        #[arg(long)]
        json: String,
    },
    /// Update a record with a JSON payload
    Update {
        resource: String,
        id: String,
        #[arg(long)]
        json: String,
    },
    /// Delete a record by id
    Delete { resource: String, id: String },
    /// Run the in-memory reference backend
    Serve {
        #[arg(short, long, default_value = "37780")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_base_url(url);
        }
        if let Some(token) = &self.token {
            config = config.with_token(token);
        }
        if let Some(workspace) = &self.workspace {
            config = config.with_workspace(workspace);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();

    let (resource, action) = match cli.command {
        Commands::Serve { port, host } => return commands::serve::run(&host, port).await,
        Commands::List { resource, page, limit } => {
            (resource, ResourceAction::List { page, limit })
        },
        Commands::Create { resource, json } => (resource, ResourceAction::Create { json }),
        Commands::Update { resource, id, json } => {
            (resource, ResourceAction::Update { id, json })
        },
        Commands::Delete { resource, id } => (resource, ResourceAction::Delete { id }),
    };
    let output = commands::resource::run(&config, &resource, action).await?;
    println!("{output}");
    Ok(())
}
