mod api;
mod dashboard;
mod error;
mod form;
mod models;
mod notify;
mod session;
#[cfg(test)]
mod testutil;

use anyhow::Result;
use clap::{Parser, Subcommand};

use api::ApiClient;
use dashboard::{confirm, Dashboard};
use models::{ContactInput, SignupRequest};
use notify::{Console, Notifier};
use session::{SessionManager, SessionStore};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "contactly", about = "Contactly contact book client")]
struct Cli {
    /// Base URL of the remote Contactly API
    #[arg(
        long,
        env = "CONTACTLY_API",
        default_value = "https://contactly-1clq.onrender.com/api"
    )]
    api_url: String,

    /// Path of the persisted session file
    #[arg(long, env = "CONTACTLY_SESSION", default_value = "contactly-session.json")]
    session: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an account on the remote API
    Signup {
        username: String,
        email: String,
        password: String,
        confirm_password: String,
    },
    /// Log in and persist the session locally
    Login { email: String, password: String },
    /// Clear the persisted session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List all contacts
    List,
    /// Add a new contact
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        country: String,
    },
    /// Edit an existing contact; omitted fields keep their current value
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        country: Option<String>,
    },
    /// Delete a contact
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Interactive dashboard (the default)
    Dashboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("contactly=info".parse()?))
        .init();

    let cli = Cli::parse();
    let notifier = Console;
    let mut session = SessionManager::new(SessionStore::new(&cli.session));
    let mut api = ApiClient::new(&cli.api_url);

    match cli.command.unwrap_or(Command::Dashboard) {
        Command::Signup {
            username,
            email,
            password,
            confirm_password,
        } => {
            let request = SignupRequest {
                username,
                email,
                password,
            };
            match session.signup(&api, request, &confirm_password).await {
                Ok(message) => notifier.success(&message),
                Err(err) => fail(&notifier, &err.to_string()),
            }
        }
        Command::Login { email, password } => {
            match session.login(&mut api, &email, &password).await {
                Ok(user) => {
                    notifier.success("Login Successful!");
                    notifier.info(&format!("Logged in as: {}", user.email));
                }
                Err(err) => fail(&notifier, &err.to_string()),
            }
        }
        Command::Logout => {
            session.logout(&mut api)?;
            notifier.success("Logged out successfully!");
        }
        Command::Whoami => match session.restore() {
            Some(user) => println!("Logged in as: {} ({})", user.email, user.username),
            None => fail(&notifier, "Not logged in"),
        },
        Command::List => {
            let mut dashboard = enter_or_exit(session, api);
            if dashboard.refresh().await.is_err() {
                std::process::exit(1);
            }
            dashboard.render();
        }
        Command::Add {
            name,
            phone,
            email,
            city,
            country,
        } => {
            let mut dashboard = enter_or_exit(session, api);
            dashboard.form_mut().set_input(ContactInput {
                name,
                phone,
                email,
                city,
                country,
            });
            if dashboard.submit().await.is_err() {
                std::process::exit(1);
            }
        }
        Command::Edit {
            id,
            name,
            phone,
            email,
            city,
            country,
        } => {
            let mut dashboard = enter_or_exit(session, api);
            if dashboard.refresh().await.is_err() {
                std::process::exit(1);
            }
            let Some(index) = dashboard.contacts().iter().position(|c| c.id == id) else {
                fail(&notifier, "Contact not found");
            };
            dashboard.begin_edit(index);
            let form = dashboard.form_mut();
            if let Some(value) = name {
                form.name = value;
            }
            if let Some(value) = phone {
                form.phone = value;
            }
            if let Some(value) = email {
                form.email = value;
            }
            if let Some(value) = city {
                form.city = value;
            }
            if let Some(value) = country {
                form.country = value;
            }
            if dashboard.submit().await.is_err() {
                std::process::exit(1);
            }
        }
        Command::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this contact?")? {
                return Ok(());
            }
            let mut dashboard = enter_or_exit(session, api);
            if dashboard.remove(&id).await.is_err() {
                std::process::exit(1);
            }
        }
        Command::Dashboard => {
            let mut dashboard = enter_or_exit(session, api);
            dashboard.run().await?;
        }
    }

    Ok(())
}

/// The dashboard gate already notified the redirect-to-login; the process
/// just reflects it in its exit code.
fn enter_or_exit(session: SessionManager, api: ApiClient) -> Dashboard<Console> {
    match Dashboard::enter(session, api, Console) {
        Ok(dashboard) => dashboard,
        Err(_) => std::process::exit(1),
    }
}

fn fail(notifier: &Console, message: &str) -> ! {
    notifier.error(message);
    std::process::exit(1);
}
