use anyhow::Result;
use clap::{Parser, Subcommand};
use sqlx::migrate::MigrateDatabase;

use cookbox::{AppState, Config, create_pool, router, run_migrations};

/// cookbox - Recipe box, pantry tracking and suggestion API
#[derive(Parser)]
#[command(name = "cookbox")]
#[command(about = "Recipe box, pantry tracking and suggestion API", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Create an admin user (or promote an existing one)
    CreateAdmin {
        #[arg(long)]
        username: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    cookbox::observability::init_observability(&config.observability.log_level)?;

    match cli.command {
        Commands::Serve { host, port } => serve_command(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::CreateAdmin {
            username,
            email,
            password,
        } => create_admin_command(config, username, email, password).await,
    }
}

#[tracing::instrument(skip(config))]
async fn serve_command(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting cookbox server...");

    let host = host_override.unwrap_or_else(|| config.server.host.clone());
    let port = port_override.unwrap_or(config.server.port);

    let pool = create_pool(&config.database.url, config.database.max_connections).await?;

    let state = AppState {
        pool,
        config: config.clone(),
    };

    let app = router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = create_pool(&config.database.url, 1).await?;
    run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config, password))]
async fn create_admin_command(
    config: Config,
    username: String,
    email: String,
    password: String,
) -> Result<()> {
    let pool = create_pool(&config.database.url, 1).await?;

    let password_hash = cookbox::auth::hash_password(&password)?;

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?1")
        .bind(&username)
        .fetch_optional(&pool)
        .await?;

    match existing {
        Some((id,)) => {
            sqlx::query("UPDATE users SET is_admin = 1, password_hash = ?1 WHERE id = ?2")
                .bind(&password_hash)
                .bind(id)
                .execute(&pool)
                .await?;
            tracing::info!(user_id = id, %username, "Existing user promoted to admin");
        }
        None => {
            let id = sqlx::query(
                "INSERT INTO users (username, email, password_hash, is_admin) VALUES (?1, ?2, ?3, 1)",
            )
            .bind(&username)
            .bind(&email)
            .bind(&password_hash)
            .execute(&pool)
            .await?
            .last_insert_rowid();
            tracing::info!(user_id = id, %username, "Admin user created");
        }
    }

    Ok(())
}
