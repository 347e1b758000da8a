use std::io::{self, BufReader};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notes::config::{ClientConfig, ServerConfig};
use notes::client::{NotesClient, NotesStore};
use notes::ui::{NoteForm, Ui};
use notes::{api, db};

#[derive(Parser)]
#[command(name = "notes")]
#[command(about = "Single-user notes server and terminal client")]
struct Cli {
    /// API base URL for client commands (overrides NOTES_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the notes server
    Serve {
        /// Port for HTTP API (overrides NOTES_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    #[command(flatten)]
    Client(ClientCommand),
}

#[derive(Subcommand)]
enum ClientCommand {
    /// List all notes
    List,
    /// Show one note
    Show { id: i64 },
    /// Create a note
    New {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        content: String,
    },
    /// Edit a note; omitted fields keep their current value
    Edit {
        id: i64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note after confirmation
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "notes=debug,tower_http=debug".into()),
    );

    // stdout belongs to the views; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let config = ServerConfig::from_env()?.with_port(port);

    let db = match &config.db_path {
        Some(path) => db::Database::open(path.clone())?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()?).await?;
    tracing::info!("Notes server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Notes server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}

async fn run_client(url: Option<String>, command: ClientCommand) -> anyhow::Result<()> {
    let config = ClientConfig::from_env().with_base_url(url);
    let mut ui = Ui::new(
        NotesStore::new(NotesClient::from_config(&config)),
        BufReader::new(io::stdin()),
        io::stdout(),
        io::stderr(),
    );

    match command {
        ClientCommand::List => ui.list().await?,
        ClientCommand::Show { id } => ui.show(id).await?,
        ClientCommand::New { title, content } => {
            ui.create(NoteForm::new(title, content)).await?;
        }
        ClientCommand::Edit { id, title, content } => {
            ui.edit(id, title, content).await?;
        }
        ClientCommand::Delete { id, yes } => {
            ui.delete(id, yes).await?;
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Serve { port } => serve(port).await,
        Commands::Client(command) => run_client(cli.url, command).await,
    }
}
