//! Authentication commands.

use super::prompt;
use crate::app::App;
use crate::output::{self, OutputFormat};
use anyhow::{bail, Result};
use identity_engine::FederatedProvider;
use serde::Serialize;
use session_propagation::{AuthOutcome, SessionPrincipal, SignUpForm};

/// Create an account.
pub async fn register(app: &App, photo_url: Option<String>) -> Result<()> {
    let name = prompt("Name: ")?;
    if name.is_empty() {
        bail!("Name is required");
    }
    let email = prompt("Email: ")?;
    if email.is_empty() {
        bail!("Email is required");
    }
    let password = rpassword::prompt_password("Password: ")?;

    let form = SignUpForm {
        name,
        email,
        password,
        photo_url,
    };
    let outcome = app.session.sign_up(&form).await?;
    print_outcome(&outcome, app.format)
}

/// Sign in with email and password, or through a federated provider.
pub async fn login(
    app: &App,
    provider: Option<FederatedProvider>,
    redirect: Option<&str>,
) -> Result<()> {
    if let Some(principal) = app.session.snapshot().principal() {
        output::print_success(
            &format!("Already logged in as {}", principal.label()),
            app.format,
        );
        return Ok(());
    }

    let outcome = match provider {
        Some(provider) => app.session.federated_sign_in(provider, redirect).await?,
        None => {
            let email = prompt("Email: ")?;
            if email.is_empty() {
                bail!("Email is required");
            }
            let password = rpassword::prompt_password("Password: ")?;
            if password.is_empty() {
                bail!("Password is required");
            }
            app.session.sign_in(&email, &password, redirect).await?
        }
    };
    print_outcome(&outcome, app.format)
}

fn print_outcome(outcome: &AuthOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("Signed in as {}", outcome.principal.label());
            if !outcome.profile_synced {
                println!("Your profile could not be saved yet; it will sync on next sign-in.");
            }
            println!("Next: {}", outcome.redirect);
        }
        OutputFormat::Json => output::print_json(outcome)?,
    }
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    app.session.sign_out().await?;
    Ok(())
}

#[derive(Serialize)]
struct StatusView<'a> {
    logged_in: bool,
    user: Option<&'a SessionPrincipal>,
}

/// Show who is signed in.
pub async fn status(app: &App) -> Result<()> {
    let snapshot = app.session.snapshot();
    let principal = snapshot.principal();

    match app.format {
        OutputFormat::Text => match principal {
            Some(user) => {
                println!("Auth:     logged in");
                output::print_row("Name", user.display_name.as_deref().unwrap_or("-"));
                output::print_row("Email", user.email.as_deref().unwrap_or("-"));
                output::print_row("User ID", user.backend_id.as_deref().unwrap_or("-"));
                output::print_row("UID", &user.uid);
            }
            None => println!("Auth:     not logged in"),
        },
        OutputFormat::Json => output::print_json(&StatusView {
            logged_in: principal.is_some(),
            user: principal,
        })?,
    }
    Ok(())
}
