// AWS config file sections, written as they are discovered
use crate::error::Result;
use crate::models::{AccountRole, Params};
use std::fmt;
use std::io::Write;

const REGISTRATION_SCOPES_HINT: &str = "sso:account:access";

/// `[sso-session NAME]` section pointing at the Identity Center portal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsoSession {
    pub session_name: String,
    pub sso_start_url: String,
    pub sso_region: String,
}

impl SsoSession {
    pub fn from_params(params: &Params) -> Self {
        Self {
            session_name: params.sso_session_name.clone(),
            sso_start_url: params.start_url.clone(),
            sso_region: params.sso_region.clone(),
        }
    }
}

impl fmt::Display for SsoSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# This is the Identity Center portal entry")?;
        writeln!(f, "[sso-session {}]", self.session_name)?;
        writeln!(f, "sso_region = {}", self.sso_region)?;
        writeln!(f, "sso_start_url = {}", self.sso_start_url)?;
        writeln!(f, "# sso_registration_scopes = {}", REGISTRATION_SCOPES_HINT)?;
        writeln!(f)
    }
}

/// `[profile ACCOUNT-ROLE]` section for one role
#[derive(Debug, Clone, Copy)]
pub struct Profile<'a> {
    pub session: &'a SsoSession,
    pub role: &'a AccountRole,
}

impl fmt::Display for Profile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Names are written verbatim; a ']' or newline in them breaks the file.
        writeln!(f, "[profile {}]", self.role.profile_name())?;
        writeln!(f, "sso_session = {}", self.session.session_name)?;
        writeln!(f, "sso_account_id = {}", self.role.account_id)?;
        writeln!(f, "sso_role_name = {}", self.role.role_name)?;
        writeln!(f, "# region = {}", self.session.sso_region)?;
        writeln!(f)
    }
}

/// Streams one session section followed by any number of profile sections
pub struct ConfigWriter<W: Write> {
    out: W,
    session: SsoSession,
    profiles: usize,
}

impl<W: Write> ConfigWriter<W> {
    /// Write the `[sso-session]` section right away
    pub fn new(mut out: W, session: SsoSession) -> Result<Self> {
        write!(out, "{}", session)?;
        out.flush()?;
        Ok(Self {
            out,
            session,
            profiles: 0,
        })
    }

    pub fn write_profile(&mut self, role: &AccountRole) -> Result<()> {
        let profile = Profile {
            session: &self.session,
            role,
        };
        write!(self.out, "{}", profile)?;
        self.out.flush()?;
        self.profiles += 1;
        Ok(())
    }

    /// Number of profile sections written so far
    pub fn profiles_written(&self) -> usize {
        self.profiles
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}
