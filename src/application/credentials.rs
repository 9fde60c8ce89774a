/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Credential providers.
//!
//! The client never stores credentials. Each login asks a provider for a
//! username/password pair and, when the server challenges, for a
//! multi-factor code.

use crate::error::AppError;
use crate::utils::config::get_env_non_empty;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Username/password pair with an optional pre-supplied MFA code
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Account username (usually the email address)
    pub username: String,
    /// Account password
    pub password: String,
    /// Multi-factor code to use if the server asks for one
    #[serde(default)]
    pub mfa_code: Option<String>,
}

impl Credentials {
    /// Creates credentials without an MFA code
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            mfa_code: None,
        }
    }

    /// Attaches a pre-supplied MFA code
    #[must_use]
    pub fn with_mfa_code(mut self, code: impl Into<String>) -> Self {
        self.mfa_code = Some(code.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .field("mfa_code", &self.mfa_code.as_ref().map(|_| "******"))
            .finish()
    }
}

/// Source of login credentials
pub trait CredentialProvider: Send + Sync {
    /// Supplies the username/password pair
    fn credentials(&self) -> Result<Credentials, AppError>;

    /// Supplies a multi-factor code after the server asked for one
    ///
    /// `mfa_type` is the server's hint (for example `"sms"`). The default
    /// implementation cannot answer a challenge.
    fn mfa_code(&self, mfa_type: Option<&str>) -> Result<String, AppError> {
        Err(AppError::MissingCredentials(format!(
            "mfa code ({})",
            mfa_type.unwrap_or("unspecified type")
        )))
    }
}

/// Provider handing out fixed credentials
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    /// Wraps the given credentials
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }
}

impl CredentialProvider for StaticCredentials {
    fn credentials(&self) -> Result<Credentials, AppError> {
        Ok(self.credentials.clone())
    }

    fn mfa_code(&self, mfa_type: Option<&str>) -> Result<String, AppError> {
        self.credentials.mfa_code.clone().ok_or_else(|| {
            AppError::MissingCredentials(format!(
                "mfa code ({})",
                mfa_type.unwrap_or("unspecified type")
            ))
        })
    }
}

/// Provider reading `RH_USERNAME`, `RH_PASSWORD` and `RH_MFA_CODE`
#[derive(Debug, Clone, Default)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Creates the provider; variables are read on every login
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials, AppError> {
        let username = get_env_non_empty("RH_USERNAME")
            .ok_or_else(|| AppError::MissingCredentials("RH_USERNAME".to_string()))?;
        let password = get_env_non_empty("RH_PASSWORD")
            .ok_or_else(|| AppError::MissingCredentials("RH_PASSWORD".to_string()))?;
        Ok(Credentials {
            username,
            password,
            mfa_code: get_env_non_empty("RH_MFA_CODE"),
        })
    }

    fn mfa_code(&self, _mfa_type: Option<&str>) -> Result<String, AppError> {
        get_env_non_empty("RH_MFA_CODE")
            .ok_or_else(|| AppError::MissingCredentials("RH_MFA_CODE".to_string()))
    }
}

/// Provider reading a JSON file of the form
/// `{"username": "...", "password": "...", "mfa_code": null}`
///
/// Kept for setups that already have such a file; nothing in the client
/// requires one.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    /// Creates the provider; the file is read on every login
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl CredentialProvider for FileCredentials {
    fn credentials(&self) -> Result<Credentials, AppError> {
        debug!("Reading credentials from {}", self.path.display());
        let contents = std::fs::read_to_string(&self.path)?;
        let credentials: Credentials = serde_json::from_str(&contents)?;
        if credentials.username.trim().is_empty() || credentials.password.is_empty() {
            return Err(AppError::MissingCredentials(format!(
                "username or password in {}",
                self.path.display()
            )));
        }
        Ok(credentials)
    }
}

/// Provider asking on the console
///
/// Input is read line by line from the given reader (stdin by default) and
/// prompts go to stderr.
pub struct PromptCredentials<R: BufRead + Send> {
    input: std::sync::Mutex<R>,
}

impl PromptCredentials<io::BufReader<io::Stdin>> {
    /// Prompts on stdin
    #[must_use]
    pub fn stdin() -> Self {
        Self::from_reader(io::BufReader::new(io::stdin()))
    }
}

impl<R: BufRead + Send> PromptCredentials<R> {
    /// Prompts using an arbitrary line reader
    pub fn from_reader(reader: R) -> Self {
        Self {
            input: std::sync::Mutex::new(reader),
        }
    }

    fn ask(&self, prompt: &str) -> Result<String, AppError> {
        let mut stderr = io::stderr();
        write!(stderr, "{prompt}: ")?;
        stderr.flush()?;

        let mut line = String::new();
        let mut input = self
            .input
            .lock()
            .map_err(|_| AppError::InvalidInput("prompt input poisoned".to_string()))?;
        if input.read_line(&mut line)? == 0 {
            return Err(AppError::MissingCredentials(prompt.to_lowercase()));
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        if answer.is_empty() {
            return Err(AppError::MissingCredentials(prompt.to_lowercase()));
        }
        Ok(answer)
    }
}

impl<R: BufRead + Send> CredentialProvider for PromptCredentials<R> {
    fn credentials(&self) -> Result<Credentials, AppError> {
        let username = self.ask("Username")?;
        let password = self.ask("Password")?;
        Ok(Credentials::new(username, password))
    }

    fn mfa_code(&self, mfa_type: Option<&str>) -> Result<String, AppError> {
        match mfa_type {
            Some(kind) => self.ask(&format!("MFA code ({kind})")),
            None => self.ask("MFA code"),
        }
    }
}
