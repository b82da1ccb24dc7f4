//! 会员注册与认证
pub mod password;
pub mod service;

pub use password::{Argon2PasswordEncoder, PasswordEncoder};
pub use service::{MemberForm, MemberService, RegisterMember};
