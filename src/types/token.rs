use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Record proving a successful login.
///
/// A token admits a request only while `valid` is set and the current time is
/// strictly before `expiration_time`. Expiration times are kept at microsecond
/// precision, matching what the token table can hold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub token_id: String,
    pub user_name: String,
    pub valid: bool,
    pub expiration_time: DateTime<Utc>,
    pub access_rights: Vec<i16>,
}

impl SessionToken {
    pub fn new(
        token_id: impl Into<String>,
        user_name: impl Into<String>,
        expiration_time: DateTime<Utc>,
        access_rights: Vec<i16>,
    ) -> Self {
        Self {
            token_id: token_id.into(),
            user_name: user_name.into(),
            valid: true,
            expiration_time: expiration_time.trunc_subsecs(6),
            access_rights,
        }
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> TokenState {
        if !self.valid {
            TokenState::Invalid
        } else if now >= self.expiration_time {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessRight {
    Create = 0,
    Read = 1,
    Update = 2,
    Delete = 3,
}

impl From<AccessRight> for i16 {
    fn from(right: AccessRight) -> Self {
        right as i16
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    Valid,
    Invalid,
    Expired,
}

/// Outcome of checking a token: the rights it grants, if any.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRights {
    pub access_rights: Vec<i16>,
    pub state: TokenState,
}

impl TokenRights {
    pub(crate) fn granted(access_rights: Vec<i16>) -> Self {
        Self {
            access_rights,
            state: TokenState::Valid,
        }
    }

    pub(crate) fn denied(state: TokenState) -> Self {
        Self {
            access_rights: Vec::new(),
            state,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.state == TokenState::Valid
    }

    pub fn permits(&self, right: AccessRight) -> bool {
        self.is_valid() && self.access_rights.contains(&i16::from(right))
    }
}
