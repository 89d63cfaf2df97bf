use auth::Role;
use auth_service::config::Config;
use auth_service::outbound::repositories::PostgresUserRepository;
use auth_service::user::models::EmailAddress;
use auth_service::user::ports::UserRepository;
use clap::Parser;
use clap::Subcommand;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Out-of-band account administration.
#[derive(Parser, Debug)]
#[command(name = "auth-admin", about = "Administer auth-service accounts")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Change the role of an existing account. The only way to grant `admin`.
    SetRole {
        /// Email address of the account (case insensitive).
        #[arg(long)]
        email: String,

        /// Role to assign (`user`, `courier` or `admin`).
        #[arg(long)]
        role: Role,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_service=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database.url)
        .await?;
    let users = PostgresUserRepository::new(pool);

    match args.command {
        Command::SetRole { email, role } => {
            let email = EmailAddress::new(&email)?;
            let user = users.update_role(&email, role).await?;

            tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "Role updated");
            println!("{} is now {}", user.email, user.role);
        }
    }

    Ok(())
}
