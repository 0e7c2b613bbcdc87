//! PawHaven command-line front end.
//!
//! Drives the shelter core through plain function calls: account
//! registration, login/logout with a persisted session, profile management,
//! the animal catalog, and the adoption-request lifecycle.
//!
//! # Security Guarantees
//! - Secrets are prompted interactively and never echoed or logged
//! - The persisted session record is re-verified on every start

use clap::{Args, Parser, Subcommand};
use pawhaven_core::{
    AppConfig, Catalog, CredentialStore, Gender, SessionManager, SessionRecord, ShelterStore,
    SizeCategory, init_logging,
};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "pawhaven")]
#[command(about = "Animal shelter adoption manager")]
#[command(version)]
#[command(long_about = "
PawHaven - animal shelter adoption manager

Browse the adoptable-animal catalog, manage your profile, and submit or
cancel adoption requests. A successful login is remembered across runs
through a session record that is re-verified on every start.

EXAMPLES:
  pawhaven register a@b.com
  pawhaven login a@b.com
  pawhaven animals list
  pawhaven requests submit DOG-007
  pawhaven requests audit
")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// SQLite database location
    #[arg(
        long,
        env = "PAWHAVEN_DATABASE_URL",
        default_value = "pawhaven.db",
        help = "Shelter database (sqlite:// URL or .db path)"
    )]
    pub database_url: String,

    /// Session record file
    #[arg(
        long,
        env = "PAWHAVEN_SESSION_FILE",
        default_value = "session.txt",
        help = "Two-line session record location"
    )]
    pub session_file: PathBuf,

    /// Root directory for generated request documents
    #[arg(
        long,
        env = "PAWHAVEN_DOCUMENTS_ROOT",
        default_value = "adoption_requests",
        help = "Directory receiving per-animal request documents"
    )]
    pub documents_root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create an account (prompts for the secret twice)
    Register {
        /// Account identifier (email)
        identifier: String,
    },
    /// Log in and persist the session (prompts for the secret)
    Login {
        /// Account identifier (email)
        identifier: String,
    },
    /// Clear the persisted session
    Logout,
    /// Show the current session and profile
    Whoami,
    /// Update the profile of the logged-in account
    Profile(ProfileArgs),
    /// Manage the animal catalog
    #[command(subcommand)]
    Animals(AnimalsCommand),
    /// Manage adoption requests
    #[command(subcommand)]
    Requests(RequestsCommand),
}

#[derive(Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub first_name: Option<String>,
    #[arg(long)]
    pub last_name: Option<String>,
    /// Date of birth (YYYY-MM-DD)
    #[arg(long)]
    pub date_of_birth: Option<chrono::NaiveDate>,
    #[arg(long)]
    pub living_conditions: Option<String>,
    #[arg(long)]
    pub pet_experience: Option<String>,
    #[arg(long)]
    pub motivation: Option<String>,
    #[arg(long)]
    pub phone_number: Option<String>,
}

#[derive(Subcommand)]
pub enum AnimalsCommand {
    /// List the catalog
    List,
    /// Add an animal to the catalog
    Add(AddAnimalArgs),
    /// Remove an animal from the catalog
    Remove {
        /// Staff-assigned animal code
        code: String,
    },
}

#[derive(Args)]
pub struct AddAnimalArgs {
    /// Unique staff-assigned code
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub species: String,
    #[arg(long)]
    pub breed: String,
    /// Age in whole years
    #[arg(long)]
    pub age: u32,
    /// male or female
    #[arg(long)]
    pub gender: Gender,
    /// small, medium or large
    #[arg(long)]
    pub size: SizeCategory,
    #[arg(long)]
    pub description: String,
    /// Optional path to a photo
    #[arg(long)]
    pub image_path: Option<String>,
}

#[derive(Subcommand)]
pub enum RequestsCommand {
    /// Submit an adoption request for an animal
    Submit {
        /// Staff-assigned animal code
        code: String,
    },
    /// Cancel an adoption request
    Cancel {
        /// Staff-assigned animal code
        code: String,
    },
    /// List request rows whose document is missing
    Audit,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all output except errors")]
    pub quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let config = AppConfig::new(
        cli.database_url.clone(),
        cli.session_file.clone(),
        cli.documents_root.clone(),
    )?;

    let store = ShelterStore::open(&config.database_url).await?;
    let credentials = CredentialStore::new(&store);
    let catalog = Catalog::new(&store);

    // Process start: restore whatever session the record still verifies.
    let mut manager = SessionManager::new(
        credentials.clone(),
        SessionRecord::new(config.session_file.clone()),
    );
    manager.restore().await?;

    match cli.command {
        Command::Register { identifier } => {
            commands::register(&credentials, &identifier).await?;
        }
        Command::Login { identifier } => {
            commands::login(&mut manager, &identifier).await?;
        }
        Command::Logout => {
            commands::logout(&mut manager).await?;
        }
        Command::Whoami => {
            commands::whoami(&manager);
        }
        Command::Profile(args) => {
            commands::update_profile(&mut manager, &credentials, args).await?;
        }
        Command::Animals(command) => match command {
            AnimalsCommand::List => commands::list_animals(&catalog).await?,
            AnimalsCommand::Add(args) => commands::add_animal(&catalog, args).await?,
            AnimalsCommand::Remove { code } => commands::remove_animal(&catalog, &code).await?,
        },
        Command::Requests(command) => {
            let service = commands::request_service(&store, &config);
            match command {
                RequestsCommand::Submit { code } => {
                    commands::submit_request(&service, &manager, &catalog, &code).await?;
                }
                RequestsCommand::Cancel { code } => {
                    commands::cancel_request(&service, &manager, &catalog, &code).await?;
                }
                RequestsCommand::Audit => commands::audit_requests(&service).await?,
            }
        }
    }

    store.close().await;
    Ok(())
}
