use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

pub mod protocol;
pub mod validation;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

// =========================================================
// 角色 (Role)
// =========================================================

/// 用户角色
///
/// 封闭枚举，所有按角色分支的地方都必须穷尽匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    NormalUser,
    StoreOwner,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::NormalUser, Role::StoreOwner];

    /// 协议中的字符串形式
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::NormalUser => "NORMAL_USER",
            Role::StoreOwner => "STORE_OWNER",
        }
    }

    /// 界面展示用的标签
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::NormalUser => "NORMAL USER",
            Role::StoreOwner => "STORE OWNER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
}

/// 登录/注册的响应体
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

/// 商店列表项
///
/// `average_rating` 与 `total_ratings` 由服务端聚合；
/// `user_rating` 是调用者自己最近一次的评分，未评分时为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDetails {
    #[serde(flatten)]
    pub store: Store,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    pub owner: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAuthor {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedStore {
    pub id: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub id: String,
    pub rating: u8,
    /// 服务端原样返回的时间戳，展示时再解析
    pub created_at: String,
    pub user: RatingAuthor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<RatedStore>,
}

impl Rating {
    pub fn date_label(&self) -> String {
        date_label(&self.created_at)
    }
}

/// 以 `YYYY-MM-DD` 形式展示时间戳
///
/// 接受 RFC 3339、`YYYY-MM-DD HH:MM:SS` 与纯日期；无法识别时原样返回。
pub fn date_label(raw: &str) -> String {
    let raw = raw.trim();
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub total_stores: u64,
    pub total_ratings: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: String,
    pub name: String,
}

/// 管理员用户列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserWithStore {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<StoreRef>,
}

/// 管理员商店列表项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStore {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_ratings: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Contact>,
}

// =========================================================
// 错误响应 (Error Payload)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub msg: String,
}

/// 服务端失败响应体：`message` 和/或字段校验错误列表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(
            serde_json::to_value(Role::NormalUser).unwrap(),
            json!("NORMAL_USER")
        );
        let role: Role = serde_json::from_value(json!("STORE_OWNER")).unwrap();
        assert_eq!(role, Role::StoreOwner);
        assert!(serde_json::from_value::<Role>(json!("SUPERUSER")).is_err());
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::NormalUser.label(), "NORMAL USER");
    }

    #[test]
    fn test_store_details_flattens_store() {
        let details: StoreDetails = serde_json::from_value(json!({
            "id": "s1",
            "name": "Corner Shop",
            "email": "corner@shop.test",
            "address": "1 Main St",
            "averageRating": 3.5,
            "totalRatings": 2,
            "owner": { "name": "Olive Owner", "email": "olive@shop.test" },
            "ratings": [{
                "id": "r1",
                "rating": 4,
                "createdAt": "2024-05-01T10:00:00.000Z",
                "user": { "id": "u1", "name": "Nora", "email": "nora@test.io" }
            }]
        }))
        .unwrap();

        assert_eq!(details.store.id, "s1");
        assert_eq!(details.store.user_rating, None);
        assert_eq!(details.ratings.len(), 1);
        assert_eq!(details.ratings[0].date_label(), "2024-05-01");
        assert_eq!(details.owner.name, "Olive Owner");
    }

    #[test]
    fn test_rating_timestamps_decode_in_any_format() {
        let ratings: Vec<Rating> = serde_json::from_value(json!([
            {
                "id": "r1",
                "rating": 5,
                "createdAt": "2024-05-01 10:00:00",
                "user": { "id": "u1", "name": "Nora", "email": "nora@test.io" }
            },
            {
                "id": "r2",
                "rating": 2,
                "createdAt": "yesterday",
                "user": { "id": "u2", "name": "Ned", "email": "ned@test.io" }
            }
        ]))
        .unwrap();

        assert_eq!(ratings[0].date_label(), "2024-05-01");
        assert_eq!(ratings[1].date_label(), "yesterday");
        assert_eq!(date_label("2024-05-01T23:30:00+02:00"), "2024-05-01");
        assert_eq!(date_label("2024-05-01"), "2024-05-01");
    }

    #[test]
    fn test_error_body_tolerates_missing_fields() {
        let body: ApiErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body, ApiErrorBody::default());

        let body: ApiErrorBody = serde_json::from_value(json!({
            "message": "Validation failed",
            "errors": [{ "msg": "Invalid email", "param": "email" }]
        }))
        .unwrap();
        assert_eq!(body.errors[0].msg, "Invalid email");
    }
}
