//! Shoplist CLI
//!
//! Command-line interface for Shoplist - shared shopping lists.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shoplist_core::resources::{ProductFilter, ShoppingListFilter};
use shoplist_core::{Config, EntityId, Session};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shoplist")]
#[command(about = "Shoplist - Shared shopping lists from the terminal")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Manage shopping lists
    Lists {
        #[command(subcommand)]
        command: ListCommands,
    },
    /// Manage the items of a shopping list
    Items {
        #[command(subcommand)]
        command: ItemCommands,
    },
    /// Browse past purchases
    Purchases {
        #[command(subcommand)]
        command: PurchaseCommands,
    },
    /// Create an account
    Register {
        email: String,
        name: String,
        surname: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and remember the token
    Login {
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log out and forget the token
    Logout,
    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Change or reset your password
    Password {
        #[command(subcommand)]
        command: PasswordCommands,
    },
    /// Verify your account
    Verify {
        #[command(subcommand)]
        command: VerifyCommands,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

/// Paging and client-side search shared by every listing
#[derive(clap::Args)]
struct ListingArgs {
    /// Only show loaded entries containing this text
    #[arg(short, long)]
    search: Option<String>,
    /// Load every page instead of just the first
    #[arg(short, long)]
    all: bool,
}

#[derive(Subcommand)]
enum ProductCommands {
    /// List products
    #[command(alias = "ls")]
    List {
        /// Filter by name (server-side)
        #[arg(short, long)]
        name: Option<String>,
        /// Filter by category ID
        #[arg(short, long)]
        category: Option<EntityId>,
        /// Filter by pantry ID
        #[arg(short, long)]
        pantry: Option<EntityId>,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Create a product
    #[command(alias = "add")]
    Create {
        name: String,
        /// Category ID
        #[arg(short, long)]
        category: EntityId,
    },
    /// Delete a product
    #[command(alias = "rm")]
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// List categories
    #[command(alias = "ls")]
    List {
        /// Filter by name (server-side)
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Create a category
    #[command(alias = "add")]
    Create { name: String },
    /// Rename a category
    Rename { id: EntityId, name: String },
    /// Delete a category
    #[command(alias = "rm")]
    Delete { id: EntityId },
}

#[derive(Subcommand)]
enum ListCommands {
    /// List shopping lists
    #[command(alias = "ls")]
    List {
        /// Filter by name (server-side)
        #[arg(short, long)]
        name: Option<String>,
        /// Only lists you own
        #[arg(long, conflicts_with = "shared")]
        owner: bool,
        /// Only lists shared with you
        #[arg(long)]
        shared: bool,
        /// Only recurring lists
        #[arg(short, long)]
        recurring: bool,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Show list details
    Show { id: EntityId },
    /// Create a shopping list
    #[command(alias = "add")]
    Create {
        name: String,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Keep the list after purchasing it
        #[arg(short, long)]
        recurring: bool,
    },
    /// Rename a shopping list
    Rename { id: EntityId, name: String },
    /// Delete a shopping list
    #[command(alias = "rm")]
    Delete { id: EntityId },
    /// Record a purchase of the checked items
    Purchase { id: EntityId },
    /// Uncheck every item
    Reset { id: EntityId },
    /// Move the list's products into a pantry
    MoveToPantry { id: EntityId, pantry_id: EntityId },
    /// Share a list by email
    Share { id: EntityId, email: String },
    /// Show who a list is shared with
    Shared { id: EntityId },
    /// Stop sharing a list with a user
    Revoke { id: EntityId, user_id: EntityId },
}

#[derive(Subcommand)]
enum ItemCommands {
    /// List the items of a shopping list
    #[command(alias = "ls")]
    List {
        list_id: EntityId,
        /// Only checked items
        #[arg(long, conflicts_with = "pending")]
        purchased: bool,
        /// Only unchecked items
        #[arg(long)]
        pending: bool,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Add a product to a list
    Add {
        list_id: EntityId,
        product_id: EntityId,
        /// Quantity
        #[arg(short = 'n', long, default_value_t = 1.0)]
        quantity: f64,
        /// Unit (unit, kilograms, liters, pack, ...)
        #[arg(short, long, default_value = "unit")]
        unit: String,
    },
    /// Change the quantity of an item
    Quantity {
        list_id: EntityId,
        item_id: EntityId,
        quantity: f64,
        /// New unit
        #[arg(short, long)]
        unit: Option<String>,
    },
    /// Mark an item as purchased
    Check { list_id: EntityId, item_id: EntityId },
    /// Mark an item as not purchased
    Uncheck { list_id: EntityId, item_id: EntityId },
    /// Remove an item from a list
    #[command(alias = "rm")]
    Remove { list_id: EntityId, item_id: EntityId },
}

#[derive(Subcommand)]
enum PurchaseCommands {
    /// List purchases
    #[command(alias = "ls")]
    List {
        /// Only purchases of this list
        #[arg(short, long)]
        list: Option<EntityId>,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Recreate a shopping list from a purchase
    Restore { id: EntityId },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,
    /// Change your name
    Update {
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        surname: Option<String>,
    },
}

#[derive(Subcommand)]
enum PasswordCommands {
    /// Change your password (prompts for missing values)
    Change {
        #[arg(long)]
        current: Option<String>,
        #[arg(long)]
        new: Option<String>,
    },
    /// Email a reset code
    Forgot { email: String },
    /// Set a new password using a reset code
    Reset {
        code: String,
        /// New password (read from stdin when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum VerifyCommands {
    /// Email a verification code
    Send { email: String },
    /// Verify the account with a code
    Confirm { code: String },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (api_url, timeout_secs, page_size, token, log_level)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need a session
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let mut config = Config::load().context("Failed to load configuration")?;
    init_logging(&config);

    let session = Session::from_config(&config).context("Failed to set up API client")?;

    match cli.command {
        Commands::Products { command } => handle_product_command(command, &session, &output).await,
        Commands::Categories { command } => {
            handle_category_command(command, &session, &output).await
        }
        Commands::Lists { command } => handle_list_command(command, &session, &output).await,
        Commands::Items { command } => handle_item_command(command, &session, &output).await,
        Commands::Purchases { command } => {
            handle_purchase_command(command, &session, &output).await
        }
        Commands::Register {
            email,
            name,
            surname,
            password,
        } => commands::auth::register(&session, email, name, surname, password, &output).await,
        Commands::Login { email, password } => {
            commands::auth::login(&session, &mut config, email, password, &output).await
        }
        Commands::Logout => commands::auth::logout(&session, &mut config, &output).await,
        Commands::Profile { command } => handle_profile_command(command, &session, &output).await,
        Commands::Password { command } => {
            handle_password_command(command, &session, &output).await
        }
        Commands::Verify { command } => match command {
            VerifyCommands::Send { email } => {
                commands::auth::send_verification(&session, email, &output).await
            }
            VerifyCommands::Confirm { code } => commands::auth::verify(&session, code, &output).await,
        },
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Log to stderr; `RUST_LOG` wins over the configured level
fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.log_level.as_deref().unwrap_or("warn");
        EnvFilter::new(format!("shoplist_core={},shoplist_cli={}", level, level))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn handle_product_command(
    command: ProductCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        ProductCommands::List {
            name,
            category,
            pantry,
            listing,
        } => {
            let filter = ProductFilter {
                name,
                category_id: category,
                pantry_id: pantry,
                ..Default::default()
            };
            commands::products::list(session, filter, listing.search, listing.all, output).await
        }
        ProductCommands::Create { name, category } => {
            commands::products::create(session, name, category, output).await
        }
        ProductCommands::Delete { id } => commands::products::delete(session, id, output).await,
    }
}

async fn handle_category_command(
    command: CategoryCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        CategoryCommands::List { name, listing } => {
            commands::categories::list(session, name, listing.search, listing.all, output).await
        }
        CategoryCommands::Create { name } => {
            commands::categories::create(session, name, output).await
        }
        CategoryCommands::Rename { id, name } => {
            commands::categories::rename(session, id, name, output).await
        }
        CategoryCommands::Delete { id } => commands::categories::delete(session, id, output).await,
    }
}

async fn handle_list_command(
    command: ListCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        ListCommands::List {
            name,
            owner,
            shared,
            recurring,
            listing,
        } => {
            let filter = ShoppingListFilter {
                name,
                owner: flag_pair(owner, shared),
                recurring: recurring.then_some(true),
                ..Default::default()
            };
            commands::lists::list(session, filter, listing.search, listing.all, output).await
        }
        ListCommands::Show { id } => commands::lists::show(session, id, output).await,
        ListCommands::Create {
            name,
            description,
            recurring,
        } => commands::lists::create(session, name, description, recurring, output).await,
        ListCommands::Rename { id, name } => {
            commands::lists::rename(session, id, name, output).await
        }
        ListCommands::Delete { id } => commands::lists::delete(session, id, output).await,
        ListCommands::Purchase { id } => commands::lists::purchase(session, id, output).await,
        ListCommands::Reset { id } => commands::lists::reset(session, id, output).await,
        ListCommands::MoveToPantry { id, pantry_id } => {
            commands::lists::move_to_pantry(session, id, pantry_id, output).await
        }
        ListCommands::Share { id, email } => {
            commands::lists::share(session, id, email, output).await
        }
        ListCommands::Shared { id } => commands::lists::shared(session, id, output).await,
        ListCommands::Revoke { id, user_id } => {
            commands::lists::revoke(session, id, user_id, output).await
        }
    }
}

async fn handle_item_command(
    command: ItemCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        ItemCommands::List {
            list_id,
            purchased,
            pending,
            listing,
        } => {
            let purchased = flag_pair(purchased, pending);
            commands::items::list(
                session,
                list_id,
                purchased,
                listing.search,
                listing.all,
                output,
            )
            .await
        }
        ItemCommands::Add {
            list_id,
            product_id,
            quantity,
            unit,
        } => commands::items::add(session, list_id, product_id, quantity, unit, output).await,
        ItemCommands::Quantity {
            list_id,
            item_id,
            quantity,
            unit,
        } => commands::items::quantity(session, list_id, item_id, quantity, unit, output).await,
        ItemCommands::Check { list_id, item_id } => {
            commands::items::mark(session, list_id, item_id, true, output).await
        }
        ItemCommands::Uncheck { list_id, item_id } => {
            commands::items::mark(session, list_id, item_id, false, output).await
        }
        ItemCommands::Remove { list_id, item_id } => {
            commands::items::remove(session, list_id, item_id, output).await
        }
    }
}

async fn handle_purchase_command(
    command: PurchaseCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        PurchaseCommands::List { list, listing } => {
            commands::purchases::list(session, list, listing.search, listing.all, output).await
        }
        PurchaseCommands::Restore { id } => commands::purchases::restore(session, id, output).await,
    }
}

async fn handle_profile_command(
    command: Option<ProfileCommands>,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ProfileCommands::Show) | None => commands::auth::profile(session, output).await,
        Some(ProfileCommands::Update { name, surname }) => {
            commands::auth::update_profile(session, name, surname, output).await
        }
    }
}

async fn handle_password_command(
    command: PasswordCommands,
    session: &Session,
    output: &Output,
) -> Result<()> {
    match command {
        PasswordCommands::Change { current, new } => {
            commands::auth::change_password(session, current, new, output).await
        }
        PasswordCommands::Forgot { email } => {
            commands::auth::forgot_password(session, email, output).await
        }
        PasswordCommands::Reset { code, password } => {
            commands::auth::reset_password(session, code, password, output).await
        }
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Two mutually exclusive flags as a tri-state filter
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}
