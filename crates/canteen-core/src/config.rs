use serde::de::DeserializeOwned;

/// Service configuration read from environment variables.
///
/// Implementors derive `serde::Deserialize`; field `database_url` is read from
/// `DATABASE_URL` and so on. Optional settings use `#[serde(default = ..)]`.
pub trait Config: Sized + DeserializeOwned {
    /// Load from the process environment.
    ///
    /// # Panics
    ///
    /// Panics if a required variable is missing or cannot be parsed. Call once
    /// at startup only.
    fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|e| panic!("failed to load config from environment: {e}"))
    }

    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load from an explicit set of variables instead of the process environment.
    fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }
}
