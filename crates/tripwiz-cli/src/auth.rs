//! Account command handlers: login, registration, and profile.

use clap::Subcommand;
use tripwiz_api::TripApiClient;
use tripwiz_core::account::password_strength;
use tripwiz_core::{
    AccountField, AuthResponse, FieldErrors, LoginRequest, ProfileUpdate, RegistrationForm,
    RegistrationStep,
};
use tripwiz_wizard::Notifier;

use crate::terminal::Terminal;

/// Sub-commands available under `auth`.
#[derive(Debug, Subcommand)]
pub enum AuthCommands {
    /// Sign in and print an API token
    Login {
        #[arg(long)]
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account step by step
    Register,
    /// Show the signed-in user, optionally renaming them
    Profile {
        /// New display name
        #[arg(long)]
        name: Option<String>,
    },
}

/// Log in and print the token for `TRIPWIZ_API_TOKEN`.
///
/// # Errors
///
/// Returns an error if the credentials fail validation or are rejected.
pub(crate) async fn run_auth_login(
    client: &TripApiClient,
    terminal: &Terminal,
    email: String,
    password: Option<String>,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => terminal.read_line("Password: ").await?.unwrap_or_default(),
    };
    let request = LoginRequest { email, password };
    let errors = request.validate();
    if !errors.is_empty() {
        anyhow::bail!("invalid login: {errors}");
    }

    let auth = client.login(&request).await.map_err(|e| {
        anyhow::anyhow!(
            "{}",
            e.server_message()
                .unwrap_or("Login failed. Please check your credentials.")
        )
    })?;
    print_auth(&auth);
    Ok(())
}

/// Walk through the registration steps, then create the account.
///
/// # Errors
///
/// Returns an error if stdin closes early or the server refuses the account.
pub(crate) async fn run_auth_register(
    client: &TripApiClient,
    terminal: &Terminal,
) -> anyhow::Result<()> {
    let mut form = RegistrationForm::default();

    for step in RegistrationStep::ALL {
        loop {
            for &field in step.fields() {
                let value = ask(terminal, field).await?;
                if field == AccountField::Password {
                    eprintln!("strength: {}/4", password_strength(&value));
                }
                match field {
                    AccountField::Name => form.name = value,
                    AccountField::Email => form.email = value,
                    AccountField::Password => form.password = value,
                    AccountField::ConfirmPassword => form.confirm_password = value,
                    AccountField::Role => form.role = value,
                }
            }
            let errors = form.validate_step(step);
            if errors.is_empty() {
                break;
            }
            print_errors(terminal, &errors);
        }
    }

    let errors = form.validate();
    if !errors.is_empty() {
        anyhow::bail!("registration incomplete: {errors}");
    }

    let auth = client
        .register(&form.into_request())
        .await
        .map_err(|e| {
            anyhow::anyhow!(
                "{}",
                e.server_message()
                    .unwrap_or("Registration failed. Please try again.")
            )
        })?;
    terminal.success("Account created successfully!");
    print_auth(&auth);
    Ok(())
}

/// Print the profile of the token's user; rename first when `name` is given.
///
/// # Errors
///
/// Returns an error if no token is configured or the request fails.
pub(crate) async fn run_auth_profile(
    client: &TripApiClient,
    name: Option<String>,
) -> anyhow::Result<()> {
    if !client.has_token() {
        anyhow::bail!("no API token configured; run `auth login` and set TRIPWIZ_API_TOKEN");
    }
    let user = match name {
        Some(name) => client.update_profile(&ProfileUpdate { name }).await?,
        None => client.profile().await?,
    };
    println!("ID:     {}", user.id);
    println!("Name:   {}", user.name);
    println!("Email:  {}", user.email);
    println!("Role:   {}", user.role);
    println!("Joined: {}", user.created_at.format("%Y-%m-%d"));
    Ok(())
}

async fn ask(terminal: &Terminal, field: AccountField) -> anyhow::Result<String> {
    let prompt = match field {
        AccountField::Name => "Full name: ",
        AccountField::Email => "Email: ",
        AccountField::Password => "Password: ",
        AccountField::ConfirmPassword => "Confirm password: ",
        AccountField::Role => "Role (e.g. visitor): ",
    };
    terminal
        .read_line(prompt)
        .await?
        .ok_or_else(|| anyhow::anyhow!("registration aborted: stdin closed"))
}

fn print_errors(terminal: &Terminal, errors: &FieldErrors<AccountField>) {
    for (field, message) in errors.iter() {
        terminal.error(&format!("{field}: {message}"));
    }
}

fn print_auth(auth: &AuthResponse) {
    eprintln!("signed in as {} <{}>", auth.user.name, auth.user.email);
    println!("export TRIPWIZ_API_TOKEN={}", auth.token);
}
