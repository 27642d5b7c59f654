use crate::{
    AdminStore, AuthResponse, DashboardStats, PaginationInfo, Rating, Role, Store, StoreDetails,
    User, UserWithStore,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// GET requests carry their parameters in [`ApiRequest::query`]; every other
/// method serializes the request itself as the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// The URL path relative to the API base.
    fn path(&self) -> String;
    /// Query string pairs, in order.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// 排序参数 (Sorting)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

/// 可排序字段的公共行为
pub trait SortField: Copy + PartialEq {
    fn as_str(&self) -> &'static str;
}

/// 排序状态：点击当前字段翻转顺序，点击其他字段则切换并重置为升序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort<F> {
    pub field: F,
    pub order: SortOrder,
}

impl<F: SortField> Sort<F> {
    pub fn new(field: F) -> Self {
        Self {
            field,
            order: SortOrder::Asc,
        }
    }

    pub fn toggle(&mut self, field: F) {
        if self.field == field {
            self.order = self.order.toggled();
        } else {
            self.field = field;
            self.order = SortOrder::Asc;
        }
    }

    /// 字段按钮上显示的箭头，非当前字段为空
    pub fn indicator(&self, field: F) -> &'static str {
        if self.field == field {
            self.order.arrow()
        } else {
            ""
        }
    }

    fn push_query(&self, query: &mut Vec<(&'static str, String)>) {
        query.push(("sortBy", self.field.as_str().to_string()));
        query.push(("sortOrder", self.order.as_str().to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSortField {
    #[default]
    Name,
    Email,
    Address,
    AverageRating,
}

impl SortField for StoreSortField {
    fn as_str(&self) -> &'static str {
        match self {
            StoreSortField::Name => "name",
            StoreSortField::Email => "email",
            StoreSortField::Address => "address",
            StoreSortField::AverageRating => "averageRating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserSortField {
    #[default]
    Name,
    Email,
    Address,
    Role,
    CreatedAt,
}

impl SortField for UserSortField {
    fn as_str(&self) -> &'static str {
        match self {
            UserSortField::Name => "name",
            UserSortField::Email => "email",
            UserSortField::Address => "address",
            UserSortField::Role => "role",
            UserSortField::CreatedAt => "createdAt",
        }
    }
}

fn push_search(query: &mut Vec<(&'static str, String)>, search: &str) {
    let search = search.trim();
    if !search.is_empty() {
        query.push(("search", search.to_string()));
    }
}

// =========================================================
// 通用响应 (Responses)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoresResponse {
    pub stores: Vec<Store>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDetailsResponse {
    pub store: StoreDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingsResponse {
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub stats: DashboardStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersPage {
    pub users: Vec<UserWithStore>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStoresPage {
    pub stores: Vec<AdminStore>,
    #[serde(default)]
    pub pagination: PaginationInfo,
}

// =========================================================
// Auth Requests
// =========================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
}

impl ApiRequest for SignupRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/signup".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ApiRequest for UpdatePasswordRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Put;
    fn path(&self) -> String {
        "/auth/password".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRequest;

impl ApiRequest for ProfileRequest {
    type Response = ProfileResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/auth/profile".to_string()
    }
}

// =========================================================
// Store Requests
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListStoresRequest {
    pub search: String,
    #[serde(skip)]
    pub sort: Sort<StoreSortField>,
}

impl ApiRequest for ListStoresRequest {
    type Response = StoresResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/stores".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_search(&mut query, &self.search);
        self.sort.push_query(&mut query);
        query
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDetailsRequest {
    pub id: String,
}

impl ApiRequest for StoreDetailsRequest {
    type Response = StoreDetailsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/stores/{}", urlencoding::encode(&self.id))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyStoreRequest;

impl ApiRequest for MyStoreRequest {
    type Response = StoreDetailsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/stores/my-store".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub name: String,
    pub email: String,
    pub address: String,
    pub owner_email: String,
}

impl ApiRequest for CreateStoreRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/stores".to_string()
    }
}

// =========================================================
// Rating Requests
// =========================================================

/// 评分提交；服务端对 (用户, 商店) 做 upsert，并负责范围校验
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRatingRequest {
    pub store_id: String,
    pub rating: u8,
}

impl ApiRequest for SubmitRatingRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/ratings".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyRatingsRequest;

impl ApiRequest for MyRatingsRequest {
    type Response = RatingsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/ratings/my-ratings".to_string()
    }
}

// =========================================================
// Admin Requests
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsRequest;

impl ApiRequest for DashboardStatsRequest {
    type Response = DashboardStatsResponse;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/dashboard".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListUsersRequest {
    pub search: String,
    pub role: Option<Role>,
    #[serde(skip)]
    pub sort: Sort<UserSortField>,
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for ListUsersRequest {
    type Response = UsersPage;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/users".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_search(&mut query, &self.search);
        if let Some(role) = self.role {
            query.push(("role", role.as_str().to_string()));
        }
        self.sort.push_query(&mut query);
        query.push(("page", self.page.to_string()));
        query.push(("limit", self.limit.to_string()));
        query
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ApiRequest for CreateUserRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminListStoresRequest {
    pub search: String,
    #[serde(skip)]
    pub sort: Sort<StoreSortField>,
    pub page: u32,
    pub limit: u32,
}

impl ApiRequest for AdminListStoresRequest {
    type Response = AdminStoresPage;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/admin/stores".to_string()
    }
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        push_search(&mut query, &self.search);
        self.sort.push_query(&mut query);
        query.push(("page", self.page.to_string()));
        query.push(("limit", self.limit.to_string()));
        query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_toggle_flips_then_resets() {
        let mut sort = Sort::new(StoreSortField::Name);
        sort.toggle(StoreSortField::Name);
        assert_eq!(sort.order, SortOrder::Desc);
        assert_eq!(sort.indicator(StoreSortField::Name), "↓");
        assert_eq!(sort.indicator(StoreSortField::Address), "");

        sort.toggle(StoreSortField::Address);
        assert_eq!(sort.field, StoreSortField::Address);
        assert_eq!(sort.order, SortOrder::Asc);
    }

    #[test]
    fn test_list_stores_query_omits_blank_search() {
        let req = ListStoresRequest {
            search: "   ".to_string(),
            sort: Sort::new(StoreSortField::Name),
        };
        assert_eq!(
            req.query(),
            vec![("sortBy", "name".to_string()), ("sortOrder", "asc".to_string())]
        );

        let req = ListStoresRequest {
            search: "bakery".to_string(),
            sort: Sort {
                field: StoreSortField::Address,
                order: SortOrder::Desc,
            },
        };
        assert_eq!(req.query()[0], ("search", "bakery".to_string()));
        assert_eq!(req.query()[1], ("sortBy", "address".to_string()));
        assert_eq!(req.query()[2], ("sortOrder", "desc".to_string()));
    }

    #[test]
    fn test_list_users_query_includes_role_and_paging() {
        let req = ListUsersRequest {
            search: String::new(),
            role: Some(Role::StoreOwner),
            sort: Sort::new(UserSortField::CreatedAt),
            page: 2,
            limit: 10,
        };
        assert_eq!(
            req.query(),
            vec![
                ("role", "STORE_OWNER".to_string()),
                ("sortBy", "createdAt".to_string()),
                ("sortOrder", "asc".to_string()),
                ("page", "2".to_string()),
                ("limit", "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_request_paths_and_bodies() {
        assert_eq!(
            StoreDetailsRequest { id: "abc".into() }.path(),
            "/stores/abc"
        );
        assert_eq!(
            StoreDetailsRequest { id: "a/b c?".into() }.path(),
            "/stores/a%2Fb%20c%3F"
        );
        assert_eq!(MyStoreRequest.path(), "/stores/my-store");
        assert_eq!(UpdatePasswordRequest::METHOD, HttpMethod::Put);

        let body = serde_json::to_value(SubmitRatingRequest {
            store_id: "s1".into(),
            rating: 4,
        })
        .unwrap();
        assert_eq!(body, json!({ "storeId": "s1", "rating": 4 }));

        let body = serde_json::to_value(CreateUserRequest {
            name: "n".into(),
            email: "e".into(),
            password: "p".into(),
            address: "a".into(),
            role: None,
        })
        .unwrap();
        assert!(body.get("role").is_none());

        let body = serde_json::to_value(CreateStoreRequest {
            owner_email: "o@x.io".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body["ownerEmail"], "o@x.io");
    }

    #[test]
    fn test_users_page_defaults_missing_pagination() {
        let page: UsersPage = serde_json::from_value(json!({ "users": [] })).unwrap();
        assert_eq!(page.pagination, PaginationInfo::default());
    }
}
