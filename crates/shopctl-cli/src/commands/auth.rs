//! Auth commands
//!
//! Login, register, logout and whoami. Login/register are public
//! screens: an already-authenticated session is bounced to the
//! dashboard instead of re-authenticating.

use anyhow::{bail, Result};
use serde::Serialize;
use tabled::Tabled;

use shopctl_core::guard::{public_access, DASHBOARD_PATH};
use shopctl_core::{PublicAccess, Role};

use super::{confirm, prompt_line, Context};
use crate::output::{print_info, print_single, print_success};

#[derive(Debug, Serialize, Tabled)]
pub struct SessionRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Role")]
    pub role: String,
}

pub async fn login(ctx: &mut Context, email: String, password: Option<String>) -> Result<()> {
    if let PublicAccess::Redirect(_) = public_access(ctx.session.session(), DASHBOARD_PATH) {
        print_info("Already logged in. Run 'shopctl logout' first to switch accounts.", ctx.quiet);
        return Ok(());
    }

    let password = match password {
        Some(password) => password,
        None => prompt_line("Password: ")?,
    };

    let outcome = ctx.session.login(&email, &password).await;
    if !outcome.success {
        bail!("{}", outcome.message.unwrap_or_else(|| "Login failed".to_string()));
    }

    let name = ctx
        .session
        .session()
        .user()
        .map(|u| u.name.clone())
        .unwrap_or_else(|| email.clone());
    print_success(&format!("Logged in as {}", name), ctx.quiet);
    Ok(())
}

pub async fn register(
    ctx: &mut Context,
    name: String,
    email: String,
    password: Option<String>,
    role: Option<String>,
) -> Result<()> {
    if let PublicAccess::Redirect(_) = public_access(ctx.session.session(), DASHBOARD_PATH) {
        print_info("Already logged in. Run 'shopctl logout' first to switch accounts.", ctx.quiet);
        return Ok(());
    }

    let role = match role.as_deref() {
        None => None,
        Some(value) => match Role::parse(value) {
            Some(role) => Some(role),
            None => bail!("Unknown role: {}. Use buyer, seller or admin", value),
        },
    };

    let password = match password {
        Some(password) => password,
        None => prompt_line("Password: ")?,
    };

    let outcome = ctx.session.register(&name, &email, &password, role).await;
    if !outcome.success {
        bail!("{}", outcome.message.unwrap_or_else(|| "Registration failed".to_string()));
    }

    print_success(&format!("Account created for {}", email), ctx.quiet);
    Ok(())
}

pub async fn logout(ctx: &mut Context) -> Result<()> {
    if !ctx.session.session().is_authenticated() {
        print_info("Not logged in.", ctx.quiet);
        return Ok(());
    }
    if !confirm("Log out?", ctx.assume_yes)? {
        print_info("Cancelled.", ctx.quiet);
        return Ok(());
    }

    ctx.session.logout().await;
    print_success("Logged out", ctx.quiet);
    Ok(())
}

pub fn whoami(ctx: &mut Context) -> Result<()> {
    match ctx.session.session().user() {
        Some(user) => {
            let row = SessionRow {
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role.to_string(),
            };
            print_single(&row, ctx.format)?;
        }
        None => print_info("Not logged in.", ctx.quiet),
    }
    Ok(())
}
