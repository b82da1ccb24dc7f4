use async_trait::async_trait;
use bon::Builder;
use serde::Deserialize;
use shop_domain::entity::Entity;
use shop_domain::error::DomainError;
use shop_domain::model::{Member, MemberId, Role};
use shop_domain::persist::{MemberRepository, Transaction, TxMode, UnitOfWork};
use tracing::{info, warn};

use crate::command::{Command, CommandHandler};
use crate::context::AppContext;
use crate::error::{AppError, AppResult};
use crate::member::password::{Argon2PasswordEncoder, PasswordEncoder};

/// 会员注册表单
#[derive(Debug, Clone, Builder, Deserialize)]
#[builder(on(String, into))]
pub struct MemberForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[builder(default)]
    #[serde(default)]
    pub address: String,
}

/// 会员服务：注册与登录认证
pub struct MemberService<U, P = Argon2PasswordEncoder> {
    uow: U,
    encoder: P,
}

impl<U: UnitOfWork> MemberService<U> {
    pub fn new(uow: U) -> Self {
        Self::with_encoder(uow, Argon2PasswordEncoder)
    }
}

impl<U: UnitOfWork, P: PasswordEncoder> MemberService<U, P> {
    pub fn with_encoder(uow: U, encoder: P) -> Self {
        Self { uow, encoder }
    }

    /// 注册普通会员；邮箱已被注册时返回 `Conflict`
    pub async fn register_member(&self, form: MemberForm) -> AppResult<MemberId> {
        self.register(form, Role::User).await
    }

    /// 注册管理员会员
    pub async fn register_admin(&self, form: MemberForm) -> AppResult<MemberId> {
        self.register(form, Role::Admin).await
    }

    #[tracing::instrument(
        name = "member.register",
        skip_all,
        fields(email = %form.email, role = ?role)
    )]
    async fn register(&self, form: MemberForm, role: Role) -> AppResult<MemberId> {
        if form.password.trim().is_empty() {
            return Err(DomainError::invalid_argument("password is required").into());
        }
        let password_hash = self.encoder.encode(&form.password)?;

        let mut tx = self.uow.begin(TxMode::ReadWrite).await?;

        if tx.find_member_by_email(&form.email).await?.is_some() {
            return Err(DomainError::conflict("member already registered").into());
        }

        let member = Member::with_role(
            form.name,
            form.email,
            password_hash,
            form.address,
            role,
        )?;
        let member_id = *member.id();

        tx.save_member(member).await?;
        tx.commit().await?;

        info!(%member_id, "member registered");
        Ok(member_id)
    }

    /// 邮箱与口令认证；邮箱不存在与口令错误返回同一授权错误
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<Member> {
        let tx = self.uow.begin(TxMode::ReadOnly).await?;

        match tx.find_member_by_email(email).await? {
            Some(member) if self.encoder.matches(password, member.password_hash()) => Ok(member),
            _ => {
                warn!(email, "authentication failed");
                Err(AppError::Authorization(
                    "check your email or password".to_string(),
                ))
            }
        }
    }
}

/// 会员注册命令，无需登录
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMember {
    pub form: MemberForm,
}

impl Command for RegisterMember {
    const NAME: &'static str = "member.register";
    type Output = MemberId;
}

#[async_trait]
impl<U, P> CommandHandler<RegisterMember> for MemberService<U, P>
where
    U: UnitOfWork + 'static,
    P: PasswordEncoder + 'static,
{
    async fn handle(&self, _ctx: &AppContext, cmd: RegisterMember) -> AppResult<MemberId> {
        self.register_member(cmd.form).await
    }
}
