//! Library CLI Entry Point
//!
//! Wires the concrete service clients into the account use cases and
//! catalog repositories and exposes them as subcommands. Uses `anyhow`
//! for startup and top-level errors; everything below the entry point
//! reports through the domain error types.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use accounts::application::{LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase};
use accounts::domain::repository::{ProfileRepository, SessionStore};
use accounts::infra::identity::ProviderIdentityGateway;
use accounts::infra::postgrest::PostgrestProfileRepository;
use accounts::infra::session::FileSessionStore;
use accounts::models::Profile;
use catalog::MediaService;
use catalog::domain::repository::{
    AuthorRepository, BookRepository, BorrowingRepository, CategoryRepository,
};
use catalog::infra::postgrest::{
    PostgrestAuthorRepository, PostgrestBookRepository, PostgrestBorrowingRepository,
    PostgrestCategoryRepository,
};
use platform::config::RemoteConfig;
use platform::fetch::UriFetcher;
use platform::identity::GoTrueClient;
use platform::postgrest::PostgrestClient;
use platform::storage::StorageClient;

#[derive(Parser)]
#[command(name = "library", about = "Library account and catalog tooling")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        username: String,
        email: String,
        password: String,
        /// Register with the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Sign in with a username or an email address
    Login {
        identifier: String,
        password: String,
    },
    /// Terminate the provider session and drop the local one
    Logout,
    /// Show the locally cached signed-in user
    Whoami,
    /// List all user profiles
    Users,
    /// List books, optionally filtered by a title search
    Books {
        #[arg(long)]
        query: Option<String>,
    },
    /// List authors, optionally filtered by a name search
    Authors {
        #[arg(long)]
        query: Option<String>,
    },
    /// List categories, optionally filtered by a name search
    Categories {
        #[arg(long)]
        query: Option<String>,
    },
    /// List the signed-in user's borrowings, most recent first
    Loans,
    /// Return a borrowed book
    Return { borrowing_id: i64 },
    /// Upload a cover image and print its public URL
    UploadCover {
        /// Image source: an http(s) URL or a local path
        source: String,
        /// Public URL of the cover being replaced
        #[arg(long)]
        replace: Option<String>,
    },
}

fn print_profile(profile: &Profile) {
    println!(
        "{}  {} <{}> ({})",
        profile.id,
        profile.username,
        profile.email,
        profile.role.as_str()
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cli=info,accounts=info,catalog=info,platform=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = RemoteConfig::from_env()?;

    // Concrete clients; everything below depends on the ports only.
    let backend = Arc::new(PostgrestClient::new(&config));
    let identity_api = Arc::new(GoTrueClient::new(&config));
    let storage = Arc::new(StorageClient::new(&config));
    let fetcher = Arc::new(UriFetcher::new());

    let profiles = Arc::new(PostgrestProfileRepository::new(Arc::clone(&backend)));
    let gateway = Arc::new(ProviderIdentityGateway::new(identity_api));
    let session_path =
        std::env::var("SESSION_FILE").unwrap_or_else(|_| ".session.json".to_string());
    let session = Arc::new(FileSessionStore::new(session_path));

    match cli.command {
        Command::Register {
            username,
            email,
            password,
            admin,
        } => {
            let use_case = RegisterUseCase::new(profiles, gateway, session);
            let profile = use_case
                .execute(RegisterInput {
                    username,
                    email,
                    password,
                    is_admin: admin,
                })
                .await?;
            println!("Registered:");
            print_profile(&profile);
        }
        Command::Login {
            identifier,
            password,
        } => {
            let use_case = LoginUseCase::new(profiles, gateway, session);
            let profile = use_case.execute(&identifier, &password).await?;
            println!("Signed in:");
            print_profile(&profile);
        }
        Command::Logout => {
            LogoutUseCase::new(gateway, session).execute().await?;
            println!("Signed out");
        }
        Command::Whoami => {
            // The provider session lives in-process, so across CLI
            // invocations the durable slot is the source of truth here.
            match session.load().await? {
                Some(profile) => print_profile(&profile),
                None => println!("Not signed in"),
            }
        }
        Command::Users => {
            for profile in profiles.list_all().await? {
                print_profile(&profile);
            }
        }
        Command::Books { query } => {
            let books = PostgrestBookRepository::new(backend);
            let listing = match query {
                Some(query) => books.search(&query).await?,
                None => books.list().await?,
            };
            for book in listing {
                println!(
                    "{}  {} by {} ({}) [{}/{} available]",
                    book.id,
                    book.title,
                    book.author,
                    book.category,
                    book.available_copies,
                    book.total_copies
                );
            }
        }
        Command::Authors { query } => {
            let authors = PostgrestAuthorRepository::new(backend);
            let listing = match query {
                Some(query) => authors.search(&query).await?,
                None => authors.list().await?,
            };
            for author in listing {
                println!("{}  {}", author.id, author.name);
            }
        }
        Command::Categories { query } => {
            let categories = PostgrestCategoryRepository::new(backend);
            let listing = match query {
                Some(query) => categories.search(&query).await?,
                None => categories.list().await?,
            };
            for category in listing {
                println!("{}  {}", category.id, category.name);
            }
        }
        Command::Loans => {
            let Some(profile) = session.load().await? else {
                anyhow::bail!("not signed in");
            };
            let borrowings = PostgrestBorrowingRepository::new(backend);
            for loan in borrowings.list_for_user(profile.id).await? {
                let title = loan
                    .book
                    .as_ref()
                    .map(|b| b.title.as_str())
                    .unwrap_or("(unknown book)");
                println!(
                    "{}  {}  {}  borrowed {}",
                    loan.id,
                    title,
                    loan.status,
                    loan.borrow_date.format("%Y-%m-%d")
                );
            }
        }
        Command::Return { borrowing_id } => {
            let borrowings = PostgrestBorrowingRepository::new(backend);
            let loan = borrowings.return_borrowing(borrowing_id).await?;
            println!("Returned borrowing {} ({})", loan.id, loan.status);
        }
        Command::UploadCover { source, replace } => {
            let media = MediaService::new(storage, fetcher);
            let url = media.replace(replace.as_deref(), &source).await?;
            println!("{url}");
        }
    }

    Ok(())
}
