use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{DomainError, DomainResult};
use crate::model::MemberId;
use crate::value_object::Version;

/// 会员角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

/// 会员
///
/// 邮箱在全体会员中唯一（由仓储保证），`password_hash` 始终是编码后的凭证。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMember")]
pub struct Member {
    id: MemberId,
    version: Version,
    name: String,
    email: String,
    password_hash: String,
    address: String,
    role: Role,
}

impl Member {
    /// 以普通用户角色注册新会员
    pub fn register(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        Self::with_role(name, email, password_hash, address, Role::User)
    }

    pub fn with_role(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        address: impl Into<String>,
        role: Role,
    ) -> DomainResult<Self> {
        let name = name.into();
        let email = email.into();
        let password_hash = password_hash.into();

        ensure_profile(&name, &email, &password_hash)?;

        Ok(Self {
            id: MemberId::new(),
            version: Version::new(),
            name,
            email,
            password_hash,
            address: address.into(),
            role,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

fn ensure_profile(name: &str, email: &str, password_hash: &str) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::invalid_argument("member name is required"));
    }
    if !is_plausible_email(email) {
        return Err(DomainError::invalid_argument(format!(
            "malformed email: {email}"
        )));
    }
    if password_hash.is_empty() {
        return Err(DomainError::invalid_argument("credential hash is required"));
    }
    Ok(())
}

#[derive(Deserialize)]
struct RawMember {
    id: MemberId,
    version: Version,
    name: String,
    email: String,
    password_hash: String,
    address: String,
    role: Role,
}

impl TryFrom<RawMember> for Member {
    type Error = DomainError;

    fn try_from(raw: RawMember) -> Result<Self, Self::Error> {
        ensure_profile(&raw.name, &raw.email, &raw.password_hash)?;

        Ok(Self {
            id: raw.id,
            version: raw.version,
            name: raw.name,
            email: raw.email,
            password_hash: raw.password_hash,
            address: raw.address,
            role: raw.role,
        })
    }
}

impl Entity for Member {
    type Id = MemberId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> Version {
        self.version
    }
}

// local@domain，两侧非空且不含空白
fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}
