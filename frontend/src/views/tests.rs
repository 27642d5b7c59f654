use super::*;
use crate::api::tests::{MockHttpClient, create_client, store_json};
use crate::session::SessionStore;
use crate::session::tests::{MemoryStorage, sample_session};
use rateboard_shared::protocol::{HttpMethod, SortOrder};
use rateboard_shared::{ApiErrorBody, Role};
use serde_json::json;

fn store(id: &str, user_rating: Option<u8>) -> Store {
    Store {
        id: id.to_string(),
        name: format!("Store {}", id),
        email: format!("{}@stores.test", id),
        address: "1 Main Street".to_string(),
        average_rating: 3.0,
        total_ratings: 1,
        user_rating,
    }
}

fn server_error(status: u16, message: &str) -> ApiError {
    ApiError::Status {
        status,
        body: ApiErrorBody {
            message: Some(message.to_string()),
            errors: Vec::new(),
        },
    }
}

fn page(current: u32, total: u32) -> PaginationInfo {
    PaginationInfo {
        current_page: current,
        total_pages: total,
        total_count: u64::from(total) * 10,
        has_next: current < total,
        has_prev: current > 1,
    }
}

// =========================================================
// 请求序号
// =========================================================

#[test]
fn test_stale_response_is_dropped() {
    let mut model = StoresModel::default();
    let first = model.begin_fetch();
    let second = model.begin_fetch();

    assert!(model.finish_fetch(second, Ok(vec![store("new", None)])));
    assert!(!model.finish_fetch(first, Ok(vec![store("old", None)])));

    assert_eq!(model.stores.len(), 1);
    assert_eq!(model.stores[0].id, "new");
    assert!(!model.loading);
}

#[test]
fn test_stale_failure_does_not_override_newer_data() {
    let mut model = StoresModel::default();
    let first = model.begin_fetch();
    let second = model.begin_fetch();

    model.finish_fetch(second, Ok(vec![store("a", None)]));
    model.finish_fetch(first, Err(ApiError::Network("timeout".into())));

    assert_eq!(model.error, None);
}

#[test]
fn test_fetch_failure_uses_server_message_or_fallback() {
    let mut model = StoresModel::default();
    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Err(server_error(500, "Database unavailable")));
    assert_eq!(model.error.as_deref(), Some("Database unavailable"));

    let ticket = model.begin_fetch();
    assert_eq!(model.error, None);
    model.finish_fetch(ticket, Err(ApiError::Network("offline".into())));
    assert_eq!(model.error.as_deref(), Some("Failed to fetch stores"));
}

#[test]
fn test_failed_fetch_is_not_an_empty_list() {
    let mut model = StoresModel::default();
    assert!(!model.is_empty());

    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Err(server_error(500, "Database unavailable")));
    assert!(!model.is_empty());

    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Ok(Vec::new()));
    assert!(model.is_empty());

    let mut users = UsersModel::default();
    let ticket = users.list.begin_fetch();
    users
        .list
        .finish_fetch(ticket, Err(ApiError::Network("offline".into())), "Failed to fetch users");
    assert!(!users.list.is_empty());
    assert_eq!(users.list.error.as_deref(), Some("Failed to fetch users"));
}

// =========================================================
// 评分
// =========================================================

#[test]
fn test_rating_update_replaces_in_place() {
    let mut model = StoresModel::default();
    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Ok(vec![store("s1", Some(2)), store("s2", None)]));

    assert!(model.begin_rating("s1"));
    assert!(model.finish_rating("s1", 4, Ok(())));

    assert_eq!(model.stores.len(), 2);
    assert_eq!(model.stores.iter().filter(|s| s.id == "s1").count(), 1);
    assert_eq!(model.stores[0].user_rating, Some(4));
    assert_eq!(model.stores[1].user_rating, None);
}

#[test]
fn test_duplicate_submission_is_blocked() {
    let mut model = StoresModel::default();
    assert!(model.begin_rating("s1"));
    assert!(model.is_submitting("s1"));
    assert!(!model.begin_rating("s1"));
    // 其他商店不受影响
    assert!(model.begin_rating("s2"));

    model.finish_rating("s1", 3, Ok(()));
    assert!(!model.is_submitting("s1"));
    assert!(model.begin_rating("s1"));
}

#[test]
fn test_failed_rating_keeps_previous_value() {
    let mut model = StoresModel::default();
    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Ok(vec![store("s1", Some(2))]));

    model.begin_rating("s1");
    let refetch = model.finish_rating::<()>("s1", 5, Err(server_error(400, "Rating must be between 1 and 5")));

    assert!(!refetch);
    assert_eq!(model.stores[0].user_rating, Some(2));
    assert_eq!(model.error.as_deref(), Some("Rating must be between 1 and 5"));
    assert!(!model.is_submitting("s1"));
}

#[tokio::test]
async fn test_rating_flow_against_api() {
    let transport = MockHttpClient::new();
    transport.mock_response(HttpMethod::Post, "/ratings", 201, json!({ "message": "Rating submitted" }));
    transport.mock_response(HttpMethod::Get, "/stores", 200, json!({ "stores": [store_json("s1", Some(4))] }));

    let storage = MemoryStorage::new();
    SessionStore::new(storage.clone()).persist(&sample_session(Role::NormalUser));
    let client = create_client(transport, storage);

    let mut model = StoresModel::default();
    let ticket = model.begin_fetch();
    model.finish_fetch(ticket, Ok(vec![store("s1", Some(2))]));

    assert!(model.begin_rating("s1"));
    let result = client.submit_rating("s1", 4).await;
    assert!(model.finish_rating("s1", 4, result));
    assert_eq!(model.stores[0].user_rating, Some(4));

    let ticket = model.begin_fetch();
    let refreshed = client.list_stores(&model.request()).await;
    assert!(model.finish_fetch(ticket, refreshed));
    assert_eq!(model.stores.len(), 1);
    assert_eq!(model.stores[0].user_rating, Some(4));
    assert_eq!(model.stores[0].total_ratings, 2);
}

// =========================================================
// 搜索与排序
// =========================================================

#[test]
fn test_stores_request_reflects_search_and_sort() {
    let mut model = StoresModel::default();
    model.set_search("grocer".into());
    model.toggle_sort(StoreSortField::Address);
    model.toggle_sort(StoreSortField::Address);

    let req = model.request();
    assert_eq!(req.search, "grocer");
    assert_eq!(req.sort.field, StoreSortField::Address);
    assert_eq!(req.sort.order, SortOrder::Desc);
}

// =========================================================
// 分页
// =========================================================

#[test]
fn test_paging_follows_server_flags() {
    let mut model = UsersModel::default();
    assert!(!model.list.next_page());

    let ticket = model.list.begin_fetch();
    model
        .list
        .finish_fetch(ticket, Ok((Vec::new(), page(1, 3))), "Failed to fetch users");
    assert!(!model.list.prev_page());
    assert!(model.list.next_page());
    assert_eq!(model.request().page, 2);
}

#[test]
fn test_filters_reset_to_first_page() {
    let mut model = UsersModel::default();
    model.list.page = 3;
    model.set_role(Some(Role::StoreOwner));
    assert_eq!(model.list.page, 1);

    model.list.page = 2;
    model.list.set_search("ann".into());
    assert_eq!(model.list.page, 1);

    model.list.page = 2;
    model.list.toggle_sort(UserSortField::Email);
    assert_eq!(model.list.page, 1);

    let req = model.request();
    assert_eq!(req.role, Some(Role::StoreOwner));
    assert_eq!(req.limit, 10);
}

#[test]
fn test_admin_stores_request() {
    let mut model = AdminStoresModel::default();
    model.toggle_sort(StoreSortField::AverageRating);
    let req = model.request();
    assert_eq!(req.sort.field, StoreSortField::AverageRating);
    assert_eq!(req.sort.order, SortOrder::Asc);
    assert_eq!((req.page, req.limit), (1, DEFAULT_PAGE_SIZE));
}

// =========================================================
// 三态与空数据
// =========================================================

#[test]
fn test_not_found_is_empty_state() {
    let missing: Result<u8, ApiError> = Err(server_error(404, "Store not found"));
    assert_eq!(found(missing), Ok(None));

    let forbidden: Result<u8, ApiError> = Err(server_error(403, "Access denied"));
    let loadable = Loadable::from_result(found(forbidden), "Failed to fetch store data");
    assert_eq!(loadable, Loadable::Failed("Access denied".to_string()));
}

#[test]
fn test_format_average() {
    assert_eq!(format_average(Some(4.26)), "4.3");
    assert_eq!(format_average(Some(0.0)), "N/A");
    assert_eq!(format_average(None), "N/A");
}
