//! AWS credential sources.

use std::fmt;
use std::path::PathBuf;

use crate::{CREDENTIALS_TARGET, Error, Result};

const ACCESS_KEY_ID_VAR: &str = "AWS_ACCESS_KEY_ID";
const SECRET_ACCESS_KEY_VAR: &str = "AWS_SECRET_ACCESS_KEY";
const SESSION_TOKEN_VAR: &str = "AWS_SESSION_TOKEN";
const SHARED_CREDENTIALS_FILE_VAR: &str = "AWS_SHARED_CREDENTIALS_FILE";

/// Name of the profile used when none is given.
pub const DEFAULT_PROFILE: &str = "default";

/// Resolved access key pair, optionally with a session token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    /// Creates long-term credentials.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attaches a session token for temporary credentials.
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Access key identifier.
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    /// Secret access key.
    pub fn secret_access_key(&self) -> &str {
        &self.secret_access_key
    }

    /// Session token, for temporary credentials.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    /// Reads credentials through `lookup`, using the standard variable names.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let access_key_id = non_empty(ACCESS_KEY_ID_VAR)
            .ok_or_else(|| Error::credentials(format!("{ACCESS_KEY_ID_VAR} is not set")))?;
        let secret_access_key = non_empty(SECRET_ACCESS_KEY_VAR)
            .ok_or_else(|| Error::credentials(format!("{SECRET_ACCESS_KEY_VAR} is not set")))?;

        let mut credentials = Self::new(access_key_id, secret_access_key);
        credentials.session_token = non_empty(SESSION_TOKEN_VAR);
        Ok(credentials)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Where the client obtains its credentials from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and `AWS_SESSION_TOKEN`.
    Environment,
    /// Named profile in the shared credentials file.
    Profile(String),
    /// Credentials supplied directly.
    Static(Credentials),
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::Profile(DEFAULT_PROFILE.to_owned())
    }
}

impl CredentialSource {
    /// Resolves the source into usable credentials.
    ///
    /// Profiles are read from disk on every call so rotated keys are picked
    /// up without a restart.
    pub async fn resolve(&self) -> Result<Credentials> {
        match self {
            Self::Static(credentials) => Ok(credentials.clone()),
            Self::Environment => Credentials::from_lookup(|name| std::env::var(name).ok()),
            Self::Profile(profile) => {
                let path = shared_credentials_path()?;
                tracing::trace!(
                    target: CREDENTIALS_TARGET,
                    path = %path.display(),
                    profile = %profile,
                    "Reading shared credentials file"
                );

                let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
                    Error::credentials(format!(
                        "cannot read shared credentials file '{}': {}",
                        path.display(),
                        e
                    ))
                })?;

                parse_profile(&contents, profile)
            }
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Environment => "environment".to_owned(),
            Self::Profile(name) => format!("profile:{name}"),
            Self::Static(_) => "static".to_owned(),
        }
    }
}

/// Location of the shared credentials file.
fn shared_credentials_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(SHARED_CREDENTIALS_FILE_VAR) {
        return Ok(PathBuf::from(path));
    }

    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .ok_or_else(|| Error::credentials("cannot locate home directory"))?;

    Ok(PathBuf::from(home).join(".aws").join("credentials"))
}

/// Extracts one profile from an INI-formatted credentials file.
fn parse_profile(contents: &str, profile: &str) -> Result<Credentials> {
    let mut in_profile = false;
    let mut found = false;
    let mut access_key_id = None;
    let mut secret_access_key = None;
    let mut session_token = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(section) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            in_profile = section.trim() == profile;
            found |= in_profile;
            continue;
        }

        if !in_profile {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };

        let value = value.trim().to_owned();
        match key.trim().to_ascii_lowercase().as_str() {
            "aws_access_key_id" => access_key_id = Some(value),
            "aws_secret_access_key" => secret_access_key = Some(value),
            "aws_session_token" => session_token = Some(value),
            _ => {}
        }
    }

    if !found {
        return Err(Error::credentials(format!(
            "profile '{profile}' not found in shared credentials file"
        )));
    }

    let access_key_id = access_key_id.filter(|v| !v.is_empty()).ok_or_else(|| {
        Error::credentials(format!("profile '{profile}' has no aws_access_key_id"))
    })?;
    let secret_access_key = secret_access_key.filter(|v| !v.is_empty()).ok_or_else(|| {
        Error::credentials(format!("profile '{profile}' has no aws_secret_access_key"))
    })?;

    let mut credentials = Credentials::new(access_key_id, secret_access_key);
    credentials.session_token = session_token.filter(|v| !v.is_empty());
    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const FILE: &str = "\
# shared credentials
[default]
aws_access_key_id = AKIDDEFAULT
aws_secret_access_key = secret-default

[ci]
AWS_ACCESS_KEY_ID=AKIDCI
aws_secret_access_key=secret-ci
aws_session_token = token-ci
; trailing comment

[broken]
aws_access_key_id = AKIDBROKEN
";

    #[test]
    fn test_parse_default_profile() {
        let credentials = parse_profile(FILE, "default").unwrap();
        assert_eq!(credentials.access_key_id(), "AKIDDEFAULT");
        assert_eq!(credentials.secret_access_key(), "secret-default");
        assert_eq!(credentials.session_token(), None);
    }

    #[test]
    fn test_parse_named_profile_with_token() {
        let credentials = parse_profile(FILE, "ci").unwrap();
        assert_eq!(credentials.access_key_id(), "AKIDCI");
        assert_eq!(credentials.session_token(), Some("token-ci"));
    }

    #[test]
    fn test_missing_profile() {
        let error = parse_profile(FILE, "prod").unwrap_err();
        assert!(error.to_string().contains("'prod' not found"));
    }

    #[test]
    fn test_incomplete_profile() {
        let error = parse_profile(FILE, "broken").unwrap_err();
        assert!(error.to_string().contains("aws_secret_access_key"));
    }

    #[test]
    fn test_environment_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("AWS_ACCESS_KEY_ID", "AKIDENV"),
            ("AWS_SECRET_ACCESS_KEY", "secret-env"),
            ("AWS_SESSION_TOKEN", ""),
        ]);

        let credentials =
            Credentials::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(credentials.access_key_id(), "AKIDENV");
        assert_eq!(credentials.session_token(), None);

        let error = Credentials::from_lookup(|_| None).unwrap_err();
        assert_eq!(error.category(), "credentials");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let credentials = Credentials::new("AKIDEXAMPLE", "super-secret")
            .with_session_token("session-token-9f3a71");
        let debug = format!("{credentials:?}");
        assert!(debug.contains("AKIDEXAMPLE"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("session-token-9f3a71"));

        let source = format!("{:?}", CredentialSource::Static(credentials));
        assert!(!source.contains("super-secret"));
        assert!(!source.contains("session-token-9f3a71"));
    }

    #[tokio::test]
    async fn test_static_source_resolves() {
        let source = CredentialSource::Static(Credentials::new("AKID", "secret"));
        assert_eq!(source.resolve().await.unwrap().access_key_id(), "AKID");
        assert_eq!(source.describe(), "static");
        assert_eq!(CredentialSource::default().describe(), "profile:default");
    }
}
