//! Credential storage: API key and default model.
//!
//! Two string secrets, two homes. The environment wins because it is the
//! cheapest to check and the easiest to override (CI, docker, one-off
//! shells); the OS keyring is the durable fallback that survives across
//! processes. `load` populates the environment from the keyring so the rest
//! of the process — and any child it spawns — sees one consistent view.
//!
//! Absence of credentials is not an error here. It becomes one only when a
//! stage that needs them runs (see [`crate::pipeline::llm`]).

use crate::error::DsegenError;
use keyring::Entry;
use tracing::debug;

/// Environment variable holding the OpenRouter API key.
pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
/// Environment variable holding the default model identifier.
pub const ENV_DEFAULT_MODEL: &str = "OPENROUTER_DEFAULT_MODEL";

const KEYRING_SERVICE: &str = "dsegen";
const KEYRING_API_KEY: &str = "api-key";
const KEYRING_DEFAULT_MODEL: &str = "default-model";

/// The (api_key, default_model) pair, loaded once at process start and
/// read-only afterwards.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never let the key leak through {:?} in logs.
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

impl Credentials {
    /// Read both values from the process environment. Empty strings count
    /// as absent.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(ENV_API_KEY).ok().filter(|v| !v.is_empty())?;
        let model = std::env::var(ENV_DEFAULT_MODEL)
            .ok()
            .filter(|v| !v.is_empty())?;
        Some(Self { api_key, model })
    }

    /// Load credentials: environment first, keyring second.
    ///
    /// Idempotent — if both env vars are already set the keyring is never
    /// touched. When the keyring supplies the values they are exported into
    /// the process environment so a second call short-circuits.
    ///
    /// Returns `Ok(None)` when neither store has both values; that is not an
    /// error by itself.
    pub fn load() -> Result<Option<Self>, DsegenError> {
        if let Some(creds) = Self::from_env() {
            debug!("Credentials found in environment");
            return Ok(Some(creds));
        }

        let api_key = keyring_get(KEYRING_API_KEY)?;
        let model = keyring_get(KEYRING_DEFAULT_MODEL)?;

        match (api_key, model) {
            (Some(api_key), Some(model)) => {
                std::env::set_var(ENV_API_KEY, &api_key);
                std::env::set_var(ENV_DEFAULT_MODEL, &model);
                debug!("Credentials loaded from keyring");
                Ok(Some(Self { api_key, model }))
            }
            _ => Ok(None),
        }
    }

    /// Persist both values to the keyring and export them into the current
    /// process environment.
    pub fn save(&self) -> Result<(), DsegenError> {
        keyring_set(KEYRING_API_KEY, &self.api_key)?;
        keyring_set(KEYRING_DEFAULT_MODEL, &self.model)?;
        std::env::set_var(ENV_API_KEY, &self.api_key);
        std::env::set_var(ENV_DEFAULT_MODEL, &self.model);
        debug!("Credentials saved to keyring");
        Ok(())
    }
}

fn entry(name: &str) -> Result<Entry, DsegenError> {
    Entry::new(KEYRING_SERVICE, name).map_err(|e| DsegenError::CredentialStore {
        detail: e.to_string(),
    })
}

/// Read one secret; a missing entry is `None`, any other fault is an error.
fn keyring_get(name: &str) -> Result<Option<String>, DsegenError> {
    match entry(name)?.get_password() {
        Ok(v) if !v.is_empty() => Ok(Some(v)),
        Ok(_) => Ok(None),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(DsegenError::CredentialStore {
            detail: e.to_string(),
        }),
    }
}

fn keyring_set(name: &str, value: &str) -> Result<(), DsegenError> {
    entry(name)?
        .set_password(value)
        .map_err(|e| DsegenError::CredentialStore {
            detail: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment-variable tests share process state; keep them in a single
    // test so the default parallel runner cannot interleave them.
    #[test]
    fn from_env_requires_both_values() {
        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_DEFAULT_MODEL);
        assert!(Credentials::from_env().is_none());

        std::env::set_var(ENV_API_KEY, "sk-or-test");
        assert!(Credentials::from_env().is_none(), "model still missing");

        std::env::set_var(ENV_DEFAULT_MODEL, "");
        assert!(Credentials::from_env().is_none(), "empty counts as absent");

        std::env::set_var(ENV_DEFAULT_MODEL, "openai/gpt-4o-mini");
        let creds = Credentials::from_env().expect("both values set");
        assert_eq!(creds.api_key, "sk-or-test");
        assert_eq!(creds.model, "openai/gpt-4o-mini");

        std::env::remove_var(ENV_API_KEY);
        std::env::remove_var(ENV_DEFAULT_MODEL);
    }

    #[test]
    fn debug_redacts_the_key() {
        let creds = Credentials {
            api_key: "sk-or-secret".into(),
            model: "openai/gpt-4o-mini".into(),
        };
        let dump = format!("{creds:?}");
        assert!(!dump.contains("sk-or-secret"));
        assert!(dump.contains("openai/gpt-4o-mini"));
    }
}
