//! CLI commands module
//!
//! Each dashboard-area command resolves its route through the guard
//! before doing any work, so the screens share one authorization
//! decision.

pub mod auth;
pub mod categories;
pub mod dashboard;
pub mod products;
pub mod reviews;

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use shopctl_core::guard::{route_access, Access};
use shopctl_core::{ApiClient, Session, SessionStore, UserSummary};

use crate::output::OutputFormat;

/// Shared context for all commands
pub struct Context {
    pub api: ApiClient,
    pub session: SessionStore<ApiClient>,
    pub format: OutputFormat,
    pub quiet: bool,
    pub assume_yes: bool,
}

/// Gate a screen on the session: grants return the signed-in user,
/// everything else becomes the redirect message.
pub fn ensure_route(ctx: &mut Context, path: &str) -> Result<UserSummary> {
    let session = ctx.session.session().clone();
    let Some(access) = route_access(&session, path) else {
        bail!("No such screen: {}", path);
    };
    match access {
        Access::Grant => match session {
            Session::Authenticated(user) => Ok(user),
            _ => bail!("Session state out of sync"),
        },
        Access::ToLogin => bail!("Please login to access this page"),
        Access::ToUnauthorized => bail!("You do not have permission to access this page"),
        Access::Wait => bail!("Session check has not completed"),
    }
}

/// Ask before a destructive action; `--yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Read one line from stdin with a prompt (used for omitted passwords)
pub fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
