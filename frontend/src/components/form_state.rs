//! 表单状态管理模块
//!
//! 将零散的 signal 整合为结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换
//!
//! 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。

use leptos::prelude::*;
use rateboard_shared::Role;
use rateboard_shared::protocol::{
    CreateStoreRequest, CreateUserRequest, LoginRequest, SignupRequest, UpdatePasswordRequest,
};

/// 表单提交状态：提交中标记与错误列表
#[derive(Clone, Copy)]
pub struct Submission {
    pub submitting: RwSignal<bool>,
    pub errors: RwSignal<Vec<String>>,
}

impl Submission {
    pub fn new() -> Self {
        Self {
            submitting: RwSignal::new(false),
            errors: RwSignal::new(Vec::new()),
        }
    }

    /// 开始提交；已有提交在途时返回 `false`
    pub fn begin(&self) -> bool {
        if self.submitting.get_untracked() {
            return false;
        }
        self.errors.set(Vec::new());
        self.submitting.set(true);
        true
    }

    pub fn fail(&self, errors: Vec<String>) {
        self.errors.set(errors);
        self.submitting.set(false);
    }

    pub fn finish(&self) {
        self.submitting.set(false);
    }

    pub fn reset(&self) {
        self.errors.set(Vec::new());
        self.submitting.set(false);
    }
}

impl Default for Submission {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub struct LoginForm {
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    pub fn to_request(&self) -> LoginRequest {
        LoginRequest {
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct SignupForm {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub address: RwSignal<String>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
        }
    }

    pub fn to_request(&self) -> SignupRequest {
        SignupRequest {
            name: self.name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
            address: self.address.get_untracked().trim().to_string(),
        }
    }
}

/// 修改密码表单
#[derive(Clone, Copy)]
pub struct PasswordForm {
    pub current_password: RwSignal<String>,
    pub new_password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
}

impl PasswordForm {
    pub fn new() -> Self {
        Self {
            current_password: RwSignal::new(String::new()),
            new_password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        self.current_password.set(String::new());
        self.new_password.set(String::new());
        self.confirm_password.set(String::new());
    }

    pub fn passwords_match(&self) -> bool {
        self.new_password.get_untracked() == self.confirm_password.get_untracked()
    }

    pub fn to_request(&self) -> UpdatePasswordRequest {
        UpdatePasswordRequest {
            current_password: self.current_password.get_untracked(),
            new_password: self.new_password.get_untracked(),
        }
    }
}

/// 管理员新建用户表单
#[derive(Clone, Copy)]
pub struct NewUserForm {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub password: RwSignal<String>,
    pub address: RwSignal<String>,
    pub role: RwSignal<Role>,
}

impl NewUserForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            role: RwSignal::new(Role::NormalUser),
        }
    }

    pub fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.password.set(String::new());
        self.address.set(String::new());
        self.role.set(Role::NormalUser);
    }

    pub fn to_request(&self) -> CreateUserRequest {
        CreateUserRequest {
            name: self.name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
            address: self.address.get_untracked().trim().to_string(),
            role: Some(self.role.get_untracked()),
        }
    }
}

/// 管理员新建商店表单
#[derive(Clone, Copy)]
pub struct NewStoreForm {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub address: RwSignal<String>,
    pub owner_email: RwSignal<String>,
}

impl NewStoreForm {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            address: RwSignal::new(String::new()),
            owner_email: RwSignal::new(String::new()),
        }
    }

    pub fn reset(&self) {
        self.name.set(String::new());
        self.email.set(String::new());
        self.address.set(String::new());
        self.owner_email.set(String::new());
    }

    pub fn to_request(&self) -> CreateStoreRequest {
        CreateStoreRequest {
            name: self.name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            address: self.address.get_untracked().trim().to_string(),
            owner_email: self.owner_email.get_untracked().trim().to_string(),
        }
    }
}
