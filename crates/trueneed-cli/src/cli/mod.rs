//! CLI entry and dispatch.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::broadcast;
use trueneed_core::auth::AuthService;
use trueneed_core::config::Config;
use trueneed_core::{SessionEvent, SessionStore, logging};
use trueneed_shell::ShellState;

mod commands;

#[derive(Parser)]
#[command(name = "trueneed")]
#[command(version)]
#[command(about = "TrueNeed: buy what you need, not what they sell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account (a verification code is emailed)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Avatar color (defaults to a color derived from the name)
        #[arg(long = "avatar-color", value_name = "HEX")]
        avatar_color: Option<String>,
    },
    /// Complete registration with the emailed code
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long, value_name = "DIGITS")]
        code: String,
    },
    /// Email a new verification code
    ResendOtp {
        #[arg(long)]
        email: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in profile
    Whoami {
        /// Fetch the profile from the backend instead of the local cache
        #[arg(long)]
        refresh: bool,
    },
    /// Update profile details
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long = "avatar-color", value_name = "HEX")]
        avatar_color: Option<String>,
        /// Image file to upload as the profile picture (max 2MB)
        #[arg(long, value_name = "PATH", conflicts_with = "remove_image")]
        image: Option<PathBuf>,
        /// Remove the profile picture
        #[arg(long = "remove-image")]
        remove_image: bool,
    },
    /// Permanently delete the account
    DeleteAccount {
        /// Confirm the account password
        #[arg(long)]
        password: Option<String>,
        /// Agree that deletion is permanent and irreversible
        #[arg(long)]
        yes: bool,
    },
    /// Email a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with a reset token
    ResetPassword {
        #[arg(long)]
        token: String,
        /// New password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Sign in with Google, Apple or Microsoft
    Oauth {
        #[command(subcommand)]
        command: OAuthCommands,
    },
    /// Sign in with a phone number
    Phone {
        #[command(subcommand)]
        command: PhoneCommands,
    },
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
    /// Chat with the product advisor (reads questions from stdin, `:q` quits)
    Chat {
        /// Start from the first-visit example conversation
        #[arg(long)]
        sample: bool,
    },
    /// Analyze a product page
    Analyze {
        #[arg(value_name = "URL")]
        url: String,
    },
    /// List featured products
    Products,
    /// Print the landing headline
    Banner {
        /// Play one full typing cycle
        #[arg(long)]
        animate: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum OAuthCommands {
    /// Print the provider's authorization URL
    Url {
        #[arg(value_name = "PROVIDER")]
        provider: String,
    },
    /// Exchange an authorization code for a session
    Callback {
        #[arg(value_name = "PROVIDER")]
        provider: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        state: String,
    },
    /// Store the session from the URL the browser was redirected to
    Complete {
        #[arg(value_name = "URL")]
        url: String,
    },
}

#[derive(clap::Subcommand)]
enum PhoneCommands {
    /// Create an account (a code is texted)
    Register {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
        #[arg(long = "avatar-color", value_name = "HEX")]
        avatar_color: Option<String>,
    },
    /// Text a sign-in code
    Login {
        #[arg(long)]
        phone: String,
    },
    /// Verify a texted code
    Verify {
        #[arg(long)]
        phone: String,
        #[arg(long, value_name = "DIGITS")]
        code: String,
    },
    /// Sign in with an ID token from the phone identity provider
    Firebase {
        #[arg(long = "id-token", env = "TRUENEED_FIREBASE_TOKEN")]
        id_token: String,
        /// Name for a new account
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ThemeCommands {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set the theme explicitly
    Set {
        #[arg(value_name = "THEME")]
        theme: String,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Point the client at another backend
    SetApiUrl {
        #[arg(value_name = "URL")]
        url: String,
    },
}

/// Shared handles for command handlers.
pub(crate) struct App {
    pub config: Config,
    pub store: SessionStore,
    pub auth: AuthService,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = match logging::init() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = Config::load().context("load config")?;
    let store = SessionStore::open_default();
    let auth = AuthService::from_config(&config, store.clone()).context("create API client")?;
    let mut events = auth.client().subscribe();

    let app = App {
        config,
        store,
        auth,
    };
    let result = run_command(&app, cli.command).await;

    report_session_events(&app.store, &mut events);
    result
}

async fn run_command(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Register {
            name,
            email,
            password,
            avatar_color,
        } => {
            commands::auth::register(app, &name, &email, password, avatar_color.as_deref()).await
        }
        Commands::VerifyOtp { email, code } => commands::auth::verify_otp(app, &email, &code).await,
        Commands::ResendOtp { email } => commands::auth::resend_otp(app, &email).await,
        Commands::Login { email, password } => {
            commands::auth::login(app, &email, password).await
        }
        Commands::Logout => commands::auth::logout(app).await,
        Commands::Whoami { refresh } => commands::account::whoami(app, refresh).await,
        Commands::Profile {
            name,
            avatar_color,
            image,
            remove_image,
        } => {
            commands::account::update_profile(
                app,
                commands::account::ProfileArgs {
                    name,
                    avatar_color,
                    image,
                    remove_image,
                },
            )
            .await
        }
        Commands::DeleteAccount { password, yes } => {
            commands::account::delete_account(app, password.as_deref(), yes).await
        }
        Commands::ForgotPassword { email } => {
            commands::account::forgot_password(app, &email).await
        }
        Commands::ResetPassword { token, password } => {
            commands::account::reset_password(app, &token, password).await
        }

        Commands::Oauth { command } => match command {
            OAuthCommands::Url { provider } => commands::oauth::url(app, &provider).await,
            OAuthCommands::Callback {
                provider,
                code,
                state,
            } => commands::oauth::callback(app, &provider, &code, &state).await,
            OAuthCommands::Complete { url } => commands::oauth::complete(app, &url),
        },

        Commands::Phone { command } => match command {
            PhoneCommands::Register {
                phone,
                name,
                password,
                avatar_color,
            } => {
                commands::phone::register(app, &phone, &name, password, avatar_color.as_deref())
                    .await
            }
            PhoneCommands::Login { phone } => commands::phone::login(app, &phone).await,
            PhoneCommands::Verify { phone, code } => {
                commands::phone::verify(app, &phone, &code).await
            }
            PhoneCommands::Firebase {
                id_token,
                name,
                password,
            } => {
                commands::phone::firebase(app, &id_token, name.as_deref(), password.as_deref())
                    .await
            }
        },

        Commands::Theme { command } => match command {
            ThemeCommands::Show => commands::theme::show(app),
            ThemeCommands::Toggle => commands::theme::toggle(app),
            ThemeCommands::Set { theme } => commands::theme::set(app, &theme),
        },

        Commands::Chat { sample } => commands::chat::run(app, sample).await,
        Commands::Analyze { url } => commands::chat::analyze(app, &url).await,
        Commands::Products => {
            commands::chat::products();
            Ok(())
        }
        Commands::Banner { animate } => commands::chat::banner(animate).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetApiUrl { url } => commands::config::set_api_url(&url),
        },
    }
}

/// Prints a notice for session transitions the user did not ask for.
fn report_session_events(store: &SessionStore, events: &mut broadcast::Receiver<SessionEvent>) {
    let mut shell = ShellState::default();
    let now = Instant::now();

    while let Ok(event) = events.try_recv() {
        if let Err(e) = shell.apply_session_event(event, store, now) {
            tracing::warn!(error = %e, "failed to apply session event");
        }
    }

    if let Some(toast) = shell.toast.visible(now) {
        eprintln!("{}", toast.message);
    }
}
