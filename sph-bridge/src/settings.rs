//! Startup settings resolution
//!
//! Flag/env overrides win, then the TOML file, then an interactive prompt
//! (or a compiled default for settings that are never prompted).

use sph_common::config::{
    InstrumentConfig, StoreConfig, TomlConfig, DEFAULT_DATABASE, DEFAULT_HTTP_TIMEOUT_SECS,
    DEFAULT_INSTRUMENT_ADDRESS, DEFAULT_NOTIFY_PORT, DEFAULT_SAMPLE_PATH, DEFAULT_STORE_PORT,
};
use sph_common::{Error, Result};
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// Source of operator answers
pub trait Prompter {
    /// Ask for a visible line of input
    fn line(&mut self, prompt: &str) -> io::Result<String>;
    /// Ask for a masked secret
    fn secret(&mut self, prompt: &str) -> io::Result<String>;
}

/// Prompts on the controlling terminal
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().to_string())
    }

    fn secret(&mut self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Values supplied on the command line or through `SPH_*` variables
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
    pub instrument: Option<String>,
    pub notify_port: Option<u16>,
}

/// Resolve store settings, prompting for host, user and password as needed
pub fn resolve_store(
    overrides: &Overrides,
    file: &TomlConfig,
    prompter: &mut dyn Prompter,
) -> Result<StoreConfig> {
    let host = pick(overrides.db_host.as_ref(), file.store.host.as_ref())
        .map(Ok)
        .unwrap_or_else(|| prompter.line("Database host: "))?;
    if host.is_empty() {
        return Err(Error::Config("Database host is required".to_string()));
    }

    let user = pick(overrides.db_user.as_ref(), file.store.user.as_ref())
        .map(Ok)
        .unwrap_or_else(|| prompter.line("Database user: "))?;

    let password = match overrides.db_password.as_ref() {
        Some(password) => password.clone(),
        None => prompter.secret("Database password: ")?,
    };

    Ok(StoreConfig {
        host,
        port: overrides.db_port.or(file.store.port).unwrap_or(DEFAULT_STORE_PORT),
        user,
        password,
        database: pick(overrides.db_name.as_ref(), file.store.database.as_ref())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
    })
}

/// Resolve instrument settings, prompting for the address as needed
///
/// A blank answer selects the default instrument address.
pub fn resolve_instrument(
    overrides: &Overrides,
    file: &TomlConfig,
    prompter: &mut dyn Prompter,
) -> Result<InstrumentConfig> {
    let address = match pick(overrides.instrument.as_ref(), file.instrument.address.as_ref()) {
        Some(address) => address,
        None => prompter.line(&format!(
            "Instrument address [{}]: ",
            DEFAULT_INSTRUMENT_ADDRESS
        ))?,
    };

    InstrumentConfig::new(
        &address,
        overrides
            .notify_port
            .or(file.instrument.notify_port)
            .unwrap_or(DEFAULT_NOTIFY_PORT),
        file.instrument
            .sample_path
            .as_deref()
            .unwrap_or(DEFAULT_SAMPLE_PATH),
        Duration::from_secs(
            file.instrument
                .timeout_secs
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        ),
    )
}

/// First non-blank value in priority order
fn pick(first: Option<&String>, second: Option<&String>) -> Option<String> {
    [first, second]
        .into_iter()
        .flatten()
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
