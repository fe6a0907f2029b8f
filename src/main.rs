use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use portfolio_api::config::mongo_config::setup_mongo;
use portfolio_api::config::{AdminBootstrap, AppConfig};
use portfolio_api::models::admin::{AdminUser, AdminUserCreate};
use portfolio_api::repository::{MemoryStore, MongoStore, RecordStore, Repository};
use portfolio_api::services::admin_provisioning::{self, Provisioned};
use portfolio_api::services::password::PasswordHasher;
use portfolio_api::{build_rocket, logging};

#[derive(Parser, Debug)]
#[command(name = "portfolio-api", version, about = "Content API for the portfolio site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Keep all data in process memory instead of MongoDB.
        #[arg(long)]
        in_memory: bool,
    },
    /// Create an administrator account.
    CreateAdmin {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();
    let config = AppConfig::load();

    match cli.command.unwrap_or(Command::Serve { in_memory: false }) {
        Command::Serve { in_memory } => serve(config, in_memory).await,
        Command::CreateAdmin {
            username,
            email,
            password,
        } => {
            let store = open_store(&config, false).await?;
            let users = Repository::<AdminUser>::new(store.clone());
            let hasher = PasswordHasher::new(config.bcrypt_cost);
            let input = AdminUserCreate {
                username,
                email,
                password,
            };

            let admin = admin_provisioning::create_admin(&users, &hasher, input)
                .await
                .context("could not create admin account")?;
            println!("Admin account {} created", admin.username);
            store.shutdown().await;
            Ok(())
        }
    }
}

async fn open_store(config: &AppConfig, in_memory: bool) -> anyhow::Result<Arc<dyn RecordStore>> {
    if in_memory {
        warn!("using the in-memory record store, data is lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let client = setup_mongo(config)
        .await
        .with_context(|| format!("invalid MongoDB url {}", config.mongo_url))?;
    info!(db = %config.db_name, "using MongoDB record store");
    Ok(Arc::new(MongoStore::new(client, &config.db_name)))
}

async fn bootstrap_admin(
    config: &AppConfig,
    store: &Arc<dyn RecordStore>,
    bootstrap: &AdminBootstrap,
) -> anyhow::Result<()> {
    let users = Repository::<AdminUser>::new(store.clone());
    let input = AdminUserCreate {
        username: bootstrap.username.clone(),
        email: bootstrap.email.clone(),
        password: bootstrap.password.clone(),
    };

    match admin_provisioning::provision_first_admin(&users, &PasswordHasher::new(config.bcrypt_cost), input)
        .await
        .context("admin bootstrap failed")?
    {
        Provisioned::Created(admin) => info!(username = %admin.username, "bootstrap admin created"),
        Provisioned::AlreadyProvisioned => {}
    }
    Ok(())
}

async fn serve(config: AppConfig, in_memory: bool) -> anyhow::Result<()> {
    if config.uses_insecure_secret() {
        warn!("SECRET_KEY is not set, tokens are signed with an insecure default key");
    }
    let store = open_store(&config, in_memory).await?;

    match &config.admin_bootstrap {
        Some(bootstrap) => bootstrap_admin(&config, &store, bootstrap).await?,
        None => info!("no ADMIN_* variables set, run `portfolio-api create-admin` to add an account"),
    }

    build_rocket(config, store)
        .launch()
        .await
        .map_err(|e| anyhow!("server failed: {e}"))?;
    Ok(())
}
