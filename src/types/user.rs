use crate::core::error::Error;

pub type Username = String;

#[derive(Clone)]
pub struct UserAccount {
    pub username: Username,
    pub password_hash: String,
    pub access_rights: Vec<i16>,
}

impl UserAccount {
    /// Builds an account by hashing `password` at the given bcrypt cost.
    pub fn with_password(
        username: &str,
        password: &str,
        access_rights: Vec<i16>,
        cost: u32,
    ) -> Result<Self, Error> {
        Ok(Self {
            username: username.into(),
            password_hash: bcrypt::hash(password, cost)?,
            access_rights,
        })
    }
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("username", &self.username)
            .field("access_rights", &self.access_rights)
            .finish_non_exhaustive()
    }
}
