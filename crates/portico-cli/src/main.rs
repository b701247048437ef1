//! portico — operator debug tool for the auth layer.
//!
//! Resolves the active auth scheme, fetches the current user, prints the
//! identity-provider login URL, or posts a logout, all against the
//! configured backend. Credentials are supplied via `--cookie` and
//! `--email`, mimicking what a real inbound request would carry.

use clap::{Parser, Subcommand};
use portico_auth::{Forwarder, RequestContext, auth_url, current_user, logout, resolve_auth_type};
use portico_config::Settings;
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

#[derive(Debug, Parser)]
#[command(name = "portico", about = "Portico auth layer debug tool")]
struct Cli {
    /// Backend origin, overriding PORTICO_BACKEND_ORIGIN.
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Cookie to attach, as name=value. Repeatable.
    #[arg(long = "cookie", value_parser = parse_key_val, global = true)]
    cookies: Vec<(String, String)>,

    /// Identity header value (a pre-verified email).
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the active auth scheme and redirect policy
    AuthType,
    /// Fetch the current authenticated user
    Whoami,
    /// Print the identity-provider login URL for the active scheme
    LoginUrl {
        /// Post-login destination
        #[arg(long)]
        next: Option<String>,
    },
    /// Post a logout for the active scheme
    Logout,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s.find('=').ok_or_else(|| "must be NAME=VALUE".to_string())?;
    Ok((s[..pos].to_string(), s[pos + 1..].to_string()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if let Some(backend) = &cli.backend_url {
        settings.backend_origin = backend.trim_end_matches('/').to_string();
    }

    let forwarder = Forwarder::new(settings)?;

    let mut ctx = RequestContext::new();
    for (name, value) in &cli.cookies {
        ctx = ctx.with_cookie(name, value);
    }
    if let Some(email) = &cli.email {
        ctx = ctx.with_identity(email);
    }

    match cli.command {
        Commands::AuthType => {
            let metadata = resolve_auth_type(&forwarder, &ctx).await?;
            println!("{}", serde_json::to_string_pretty(&metadata)?);
        }
        Commands::Whoami => match current_user(&forwarder, &ctx).await {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => println!("null"),
        },
        Commands::LoginUrl { next } => {
            let metadata = resolve_auth_type(&forwarder, &ctx).await?;
            let url = auth_url(&forwarder, &ctx, metadata.auth_type, next.as_deref()).await?;
            if url.is_empty() {
                println!("(no redirect for auth type {})", metadata.auth_type);
            } else {
                println!("{url}");
            }
        }
        Commands::Logout => {
            let metadata = resolve_auth_type(&forwarder, &ctx).await?;
            let mut headers = HeaderMap::new();
            if let Some(cookie) = ctx.cookie_header() {
                headers.insert(COOKIE, HeaderValue::from_str(&cookie)?);
            }
            match logout(&forwarder, metadata.auth_type, headers).await? {
                Some(response) => println!("logout: {}", response.status()),
                None => println!("logout: skipped, auth is disabled"),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeated_cookies_and_email() {
        let cli = Cli::try_parse_from([
            "portico",
            "--cookie",
            "sid=abc",
            "--cookie",
            "theme=dark",
            "--email",
            "u@x.com",
            "whoami",
        ])
        .unwrap();

        assert_eq!(cli.cookies.len(), 2);
        assert_eq!(cli.cookies[0], ("sid".to_string(), "abc".to_string()));
        assert_eq!(cli.email.as_deref(), Some("u@x.com"));
    }

    #[test]
    fn key_val_requires_an_equals_sign() {
        assert!(parse_key_val("sid=abc").is_ok());
        assert!(parse_key_val("sid").is_err());
    }
}
