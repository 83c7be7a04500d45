use std::sync::Arc;

use secrecy::SecretString;
use tracing::warn;

use crate::cli::ConnectArgs;
use crate::cli::output;
use vievents::{AppConfig, EventHistoryCollector, HttpTransport, Result, ViError, ViSession};

/// Connection settings after merging flags, environment and config file.
pub struct Connection {
    pub config: AppConfig,
    pub url: String,
    pub username: Option<String>,
    pub password: Option<SecretString>,
}

impl Connection {
    /// Resolve settings without touching the network. Flags win over the
    /// config file.
    pub fn resolve(args: &ConnectArgs, config: AppConfig) -> Result<Self> {
        let mut config = config;
        if args.insecure {
            config.server.accept_invalid_certs = true;
        }

        let url = args
            .server
            .clone()
            .or_else(|| config.server.url.clone())
            .ok_or_else(|| ViError::InvalidConfig {
                detail: "no server URL given".into(),
            })?;
        vievents::config::app_config::validate_url(&url)?;

        let username = args.username.clone().or_else(|| config.server.username.clone());
        let password = args.password.clone().map(SecretString::from);

        Ok(Self {
            config,
            url,
            username,
            password,
        })
    }

    /// Fail early when a command needs credentials that were not given.
    pub fn require_credentials(&self) -> Result<(&str, &SecretString)> {
        let username = self.username.as_deref().ok_or_else(|| ViError::InvalidConfig {
            detail: "no username given".into(),
        })?;
        let password = self.password.as_ref().ok_or_else(|| ViError::InvalidConfig {
            detail: "no password given; set VIEVENTS_PASSWORD or pass --password".into(),
        })?;
        Ok((username, password))
    }

    /// Connect without logging in.
    pub fn connect(&self) -> Result<Arc<ViSession>> {
        let transport = HttpTransport::new(&self.url, &self.config.server)?;
        Ok(Arc::new(ViSession::connect(transport)?))
    }

    /// Connect and log in.
    pub fn open_session(&self) -> Result<Arc<ViSession>> {
        let (username, password) = self.require_credentials()?;
        let session = self.connect()?;
        session.login(username, password)?;
        Ok(session)
    }
}

/// Log out. Warns on failure instead of propagating, so the command's
/// own result is what the user sees.
pub fn close_session(session: &ViSession) {
    if let Err(e) = session.logout() {
        warn!(error = %e, "logout failed");
        output::warning(&format!("Could not log out: {e}"));
    }
}

/// Destroy the collector, warning on failure.
pub fn release_collector(collector: &EventHistoryCollector) {
    if let Err(e) = collector.destroy_collector() {
        warn!(collector = %collector.moref(), error = %e, "destroy failed");
        output::warning(&format!("Could not destroy collector {}: {e}", collector.moref()));
    }
}
