mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use usergate::forms::validation::{
    self, ForgotPasswordForm, LoginForm, ResetPasswordForm, SignupForm,
};
use usergate::forms::{Field, FormErrors, SubmitError};
use usergate::net::transport::TransportError;
use usergate::util::token_claims;
use usergate::{
    ApiClient, ApiError, AuthPhase, ClientConfig, ConfigError, Credentials, Dispatcher, FileStorage,
    Navigator, ReqwestTransport, Route, SessionContext, TokenStore, UserDirectory, UserUpdate,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("could not create HTTP client: {0}")]
    Transport(#[from] TransportError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Form(FormErrors),
    #[error("not signed in; run `usergate-cli login` first")]
    NotSignedIn,
    #[error("no fields to update; pass at least one of --email, --name, --active, --password")]
    EmptyUpdate,
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<SubmitError> for CliError {
    fn from(error: SubmitError) -> Self {
        Self::Form(error.form_errors())
    }
}

#[derive(Parser, Debug)]
#[command(name = "usergate-cli", about = "Account and user administration client")]
struct Cli {
    #[arg(long, env = "USERGATE_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "USERGATE_STATE_DIR", help = "Directory holding the persisted token")]
    state_dir: Option<PathBuf>,

    #[arg(long, global = true, default_value_t = false, help = "Print raw JSON instead of tables")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and persist the access token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "USERGATE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out locally and on the server.
    Logout,
    /// Create an account, then sign in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "USERGATE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, help = "Defaults to --password")]
        confirm_password: Option<String>,
    },
    /// Ask the server to email a password reset link.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using a reset token.
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "USERGATE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, help = "Defaults to --password")]
        confirm_password: Option<String>,
    },
    /// Show the signed-in user.
    Whoami,
    /// Update the signed-in user's own record.
    Profile(UpdateArgs),
    /// Show the unverified claims of the stored token.
    Token,
    /// Administer user records (requires an admin account).
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List {
        #[arg(long)]
        skip: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    Get {
        user_id: i64,
    },
    Update {
        user_id: i64,
        #[command(flatten)]
        fields: UpdateArgs,
    },
    Delete {
        user_id: i64,
    },
}

#[derive(Args, Debug)]
struct UpdateArgs {
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    active: Option<bool>,
    #[arg(long)]
    password: Option<String>,
}

impl UpdateArgs {
    fn into_update(self) -> Result<UserUpdate, CliError> {
        let mut errors = FormErrors::new();
        if let Some(message) = self.email.as_deref().and_then(validation::email_error) {
            errors.insert(Field::Email, message);
        }
        if let Some(message) = self.name.as_deref().and_then(validation::name_error) {
            errors.insert(Field::FullName, message);
        }
        if let Some(message) = self.password.as_deref().and_then(validation::password_error) {
            errors.insert(Field::Password, message);
        }
        if !errors.is_empty() {
            return Err(CliError::Form(errors));
        }

        let update = UserUpdate {
            email: self.email.map(|e| e.trim().to_lowercase()),
            full_name: self.name.map(|n| n.trim().to_owned()),
            is_active: self.active,
            password: self.password,
        };
        if update.is_empty() {
            return Err(CliError::EmptyUpdate);
        }
        Ok(update)
    }
}

/// Navigation for a terminal: there is no page to switch, so report where
/// the session would go next.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        tracing::debug!(path = route.path(), "navigate");
        if route == Route::Login {
            eprintln!("signed out");
        }
    }
}

struct App {
    session: SessionContext,
    json: bool,
}

impl App {
    fn build(cli: &Cli) -> Result<Self, CliError> {
        let mut config = ClientConfig::from_env()?;
        if let Some(api_url) = cli.api_url.as_deref() {
            config = config.with_api_url(api_url)?;
        }
        if let Some(state_dir) = &cli.state_dir {
            config.state_dir.clone_from(state_dir);
        }
        tracing::debug!(api_url = %config.api_url, state_dir = %config.state_dir.display(), "client configured");

        let transport = ReqwestTransport::new(&config.api_url, config.timeouts)?;
        let tokens = TokenStore::new(Arc::new(FileStorage::new(&config.state_dir)), config.token_key.clone());
        let dispatcher = Dispatcher::new(Arc::new(transport), tokens);
        dispatcher.on_session_expired(|| {
            eprintln!("session expired; run `usergate-cli login` to sign in again");
        });

        let session = SessionContext::new(ApiClient::new(dispatcher), Arc::new(TerminalNavigator));
        Ok(Self { session, json: cli.json })
    }

    fn api(&self) -> &ApiClient {
        self.session.api()
    }

    fn print_value(&self, value: &serde_json::Value, text: impl FnOnce() -> String) -> Result<(), CliError> {
        if self.json {
            println!("{}", render::json(value)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    async fn signed_in(&self) -> Result<(), CliError> {
        match self.session.restore().await {
            AuthPhase::Authenticated(_) => Ok(()),
            AuthPhase::Unauthenticated | AuthPhase::Authenticating => Err(CliError::NotSignedIn),
        }
    }

    async fn admin(&self) -> Result<(), CliError> {
        self.signed_in().await?;
        self.session.require_admin().map(|_| ()).map_err(CliError::Form)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn report(error: &CliError) {
    match error {
        CliError::Form(errors) => {
            for line in render::form_errors(errors) {
                eprintln!("{line}");
            }
        }
        other => {
            let message = other.to_string();
            if message.trim().is_empty() {
                eprintln!("error: An unexpected error occurred.");
            } else {
                eprintln!("error: {message}");
            }
            if matches!(other, CliError::Api(ApiError::Transport { .. } | ApiError::Server { .. })) {
                eprintln!("the request can be retried");
            }
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let app = App::build(&cli)?;
    match cli.command {
        Command::Login { email, password } => run_login(&app, email, password).await,
        Command::Logout => run_logout(&app).await,
        Command::Signup { name, email, password, confirm_password } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            let form = SignupForm { full_name: name, email, password, confirm_password };
            let user = app.session.signup(&form).await?;
            println!("account created; signed in as {}", user.email);
            Ok(())
        }
        Command::ForgotPassword { email } => run_forgot_password(&app, email).await,
        Command::ResetPassword { token, password, confirm_password } => {
            let confirm_password = confirm_password.unwrap_or_else(|| password.clone());
            run_reset_password(&app, ResetPasswordForm { token, password, confirm_password }).await
        }
        Command::Whoami => {
            app.signed_in().await?;
            let user = app.session.current_user().ok_or(CliError::NotSignedIn)?;
            app.print_value(&serde_json::to_value(&user)?, || render::user_detail(&user))
        }
        Command::Profile(fields) => {
            let update = fields.into_update()?;
            app.signed_in().await?;
            let user = app.session.update_profile(&update).await?;
            app.print_value(&serde_json::to_value(&user)?, || render::user_detail(&user))
        }
        Command::Token => run_token(&app),
        Command::Users(users) => run_users(&app, users).await,
    }
}

async fn run_login(app: &App, email: String, password: String) -> Result<(), CliError> {
    let form = LoginForm { email, password };
    let errors = validation::validate_login(&form);
    if !errors.is_empty() {
        return Err(CliError::Form(errors));
    }

    let credentials = Credentials::new(form.email.trim().to_lowercase(), form.password);
    let user = app
        .session
        .login(&credentials)
        .await
        .map_err(|error| CliError::Form(FormErrors::from_api_error(&error)))?;
    println!("signed in as {}{}", user.email, if user.is_admin() { " (admin)" } else { "" });
    Ok(())
}

async fn run_logout(app: &App) -> Result<(), CliError> {
    if let Err(error) = app.session.logout().await {
        eprintln!("warning: server logout failed: {error}");
    }
    Ok(())
}

async fn run_forgot_password(app: &App, email: String) -> Result<(), CliError> {
    let form = ForgotPasswordForm { email };
    let errors = validation::validate_forgot_password(&form);
    if !errors.is_empty() {
        return Err(CliError::Form(errors));
    }

    app.api()
        .forgot_password(form.email.trim())
        .await
        .map_err(|error| CliError::Form(FormErrors::from_api_error(&error)))?;
    println!("Password reset link has been sent to your email.");
    Ok(())
}

async fn run_reset_password(app: &App, form: ResetPasswordForm) -> Result<(), CliError> {
    let errors = validation::validate_reset_password(&form);
    if !errors.is_empty() {
        return Err(CliError::Form(errors));
    }

    let response = app
        .api()
        .reset_password(form.token.trim(), &form.password)
        .await
        .map_err(|error| CliError::Form(FormErrors::from_api_error(&error)))?;
    println!("{}", response.message.as_deref().unwrap_or("Password has been reset."));
    Ok(())
}

fn run_token(app: &App) -> Result<(), CliError> {
    let token = app.api().dispatcher().tokens().get().ok_or(CliError::NotSignedIn)?;
    let Some(claims) = token_claims::decode_claims(&token) else {
        println!("stored token is opaque; no claims to show");
        return Ok(());
    };
    app.print_value(&claims.raw, || render::claims(&claims))
}

async fn run_users(app: &App, users: UsersCommand) -> Result<(), CliError> {
    app.admin().await?;
    let mut directory = UserDirectory::new();

    match users.command {
        UsersSubcommand::List { skip, limit } => {
            let list = directory.fetch_users(app.api(), skip, limit).await?;
            app.print_value(&serde_json::to_value(list)?, || render::user_table(list))
        }
        UsersSubcommand::Get { user_id } => {
            let user = directory.fetch_user(app.api(), user_id).await?;
            app.print_value(&serde_json::to_value(&user)?, || render::user_detail(&user))
        }
        UsersSubcommand::Update { user_id, fields } => {
            let update = fields.into_update()?;
            let user = directory.update_user(app.api(), user_id, &update).await?;
            app.print_value(&serde_json::to_value(&user)?, || render::user_detail(&user))
        }
        UsersSubcommand::Delete { user_id } => {
            directory.delete_user(app.api(), user_id).await?;
            println!("deleted user {user_id}");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
