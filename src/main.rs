use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use storefront_client::api::Api;
use storefront_client::auth::{AuthManager, SqliteSessionStore};
use storefront_client::config::{CliArgs, Config};
use storefront_client::http_client::CatalogHttpClient;
use storefront_client::models::{CreateProduct, LoginCredentials, ProductFilter, UpdateProduct};

/// Storefront - CLI for the product catalog API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: CliArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with email and password
    Login {
        email: String,

        /// Password; prompted interactively when omitted
        #[arg(long)]
        password: Option<String>,
    },

    /// Drop the stored session
    Logout,

    /// Show the authenticated user's profile
    Profile,

    /// Product operations
    #[command(subcommand)]
    Products(ProductsCommand),

    /// List categories
    Categories,

    /// Upload files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
enum ProductsCommand {
    /// List products
    List {
        /// Filter by title substring
        #[arg(long)]
        title: Option<String>,

        /// Filter by category slug
        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        price_min: Option<u64>,

        #[arg(long)]
        price_max: Option<u64>,

        #[arg(long)]
        offset: Option<u64>,

        #[arg(long)]
        limit: Option<u64>,
    },

    /// Show one product
    Show { id: i64 },

    /// Create a product
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        price: f64,

        #[arg(long)]
        description: String,

        #[arg(long)]
        category_id: i64,

        /// Image URL; repeat for several images
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Update a product
    Update {
        id: i64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        price: Option<f64>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        category_id: Option<i64>,

        /// Image URL; repeat to replace the image list
        #[arg(long = "image")]
        images: Vec<String>,
    },

    /// Delete a product
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap so env-backed defaults pick it up
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::from_args(&cli.config)?;
    config.validate()?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_level.to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();

    tracing::debug!("Using catalog API at {}", config.api_base_url);

    let store = Arc::new(SqliteSessionStore::open(&config.session_file)?);
    let auth = Arc::new(AuthManager::new(
        store,
        config.refresh_url(),
        config.expiry_buffer,
    )?);
    let http = CatalogHttpClient::new(
        auth.clone(),
        config.http_connect_timeout,
        config.http_request_timeout,
    )?;
    let api = Api::new(http, auth, config.api_base_url.clone());

    run_command(&api, cli.command).await
}

async fn run_command(api: &Api, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let password = match password {
                Some(password) => password,
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()
                    .context("Failed to read password")?,
            };

            api.login(&LoginCredentials { email, password }).await?;
            let user = api.profile().await?;
            println!("Logged in as {} <{}>", user.name, user.email);
        }

        Command::Logout => {
            api.logout()?;
            println!("Session cleared");
        }

        Command::Profile => print_json(&api.profile().await?)?,

        Command::Categories => print_json(&api.categories().await?)?,

        Command::Products(command) => run_products_command(api, command).await?,

        Command::Upload { files } => {
            let uploaded = api.upload_files(&files).await?;
            print_json(&uploaded)?;
        }
    }

    Ok(())
}

async fn run_products_command(api: &Api, command: ProductsCommand) -> Result<()> {
    match command {
        ProductsCommand::List {
            title,
            category,
            price_min,
            price_max,
            offset,
            limit,
        } => {
            let filter = ProductFilter {
                title,
                category_slug: category,
                price_min,
                price_max,
                offset,
                limit,
            };
            print_json(&api.products(&filter).await?)?;
        }

        ProductsCommand::Show { id } => print_json(&api.product(id).await?)?,

        ProductsCommand::Create {
            title,
            price,
            description,
            category_id,
            images,
        } => {
            let product = CreateProduct {
                title,
                price,
                description,
                category_id,
                images,
            };
            print_json(&api.create_product(&product).await?)?;
        }

        ProductsCommand::Update {
            id,
            title,
            price,
            description,
            category_id,
            images,
        } => {
            let update = UpdateProduct {
                title,
                price,
                description,
                category_id,
                images: if images.is_empty() { None } else { Some(images) },
            };
            print_json(&api.update_product(id, &update).await?)?;
        }

        ProductsCommand::Delete { id } => {
            let deleted = api.delete_product(id).await?;
            println!("{deleted}");
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
