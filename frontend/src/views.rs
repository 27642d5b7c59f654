//! 页面状态模型
//!
//! 与 DOM 无关的视图状态：加载/错误/就绪三态、列表请求序号、
//! 评分提交与分页。组件只负责把这些模型放进 `RwSignal` 并渲染。

use std::collections::HashSet;

use rateboard_shared::protocol::{
    AdminListStoresRequest, ListStoresRequest, ListUsersRequest, Sort, SortField,
    StoreSortField, UserSortField,
};
use rateboard_shared::{AdminStore, DEFAULT_PAGE_SIZE, PaginationInfo, Role, Store, UserWithStore};

use crate::error::ApiError;

// =========================================================
// 请求序号 (Request Sequencing)
// =========================================================

/// 单个列表请求的凭据
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// 单调递增的请求序号，只有最新请求的响应会被应用
#[derive(Debug, Clone, Default)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

// =========================================================
// 三态 (Loadable)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Loadable<T> {
    #[default]
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Loadable<T> {
    pub fn from_result(result: Result<T, ApiError>, fallback: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => Self::Failed(e.message(fallback)),
        }
    }
}

/// 404 视为"没有数据"而非错误
pub fn found<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

// =========================================================
// 商店列表 (Stores)
// =========================================================

/// 普通用户的商店列表：搜索、排序与评分提交
#[derive(Debug, Clone)]
pub struct StoresModel {
    pub stores: Vec<Store>,
    pub loading: bool,
    pub error: Option<String>,
    pub search: String,
    pub sort: Sort<StoreSortField>,
    submitting: HashSet<String>,
    seq: RequestSeq,
}

impl Default for StoresModel {
    fn default() -> Self {
        Self {
            stores: Vec::new(),
            loading: true,
            error: None,
            search: String::new(),
            sort: Sort::new(StoreSortField::Name),
            submitting: HashSet::new(),
            seq: RequestSeq::default(),
        }
    }
}

impl StoresModel {
    pub fn request(&self) -> ListStoresRequest {
        ListStoresRequest {
            search: self.search.clone(),
            sort: self.sort,
        }
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.seq.issue()
    }

    /// 应用列表响应；过期的响应被丢弃并返回 `false`
    pub fn finish_fetch(&mut self, ticket: Ticket, result: Result<Vec<Store>, ApiError>) -> bool {
        if !self.seq.is_current(ticket) {
            log::debug!("[Stores] Dropping stale response {:?}", ticket);
            return false;
        }
        self.loading = false;
        match result {
            Ok(stores) => self.stores = stores,
            Err(e) => self.error = Some(e.message("Failed to fetch stores")),
        }
        true
    }

    /// 加载完成、没有出错且列表为空
    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.stores.is_empty()
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
    }

    pub fn toggle_sort(&mut self, field: StoreSortField) {
        self.sort.toggle(field);
    }

    pub fn is_submitting(&self, store_id: &str) -> bool {
        self.submitting.contains(store_id)
    }

    /// 标记提交中；同一商店已有提交在途时返回 `false`
    pub fn begin_rating(&mut self, store_id: &str) -> bool {
        self.submitting.insert(store_id.to_string())
    }

    /// 提交结束。成功时就地更新 `user_rating`，返回是否需要重新拉取聚合数据
    pub fn finish_rating<R>(&mut self, store_id: &str, rating: u8, result: Result<R, ApiError>) -> bool {
        self.submitting.remove(store_id);
        match result {
            Ok(_) => {
                if let Some(store) = self.stores.iter_mut().find(|s| s.id == store_id) {
                    store.user_rating = Some(rating);
                }
                true
            }
            Err(e) => {
                self.error = Some(e.message("Failed to submit rating"));
                false
            }
        }
    }
}

// =========================================================
// 分页列表 (Paged Lists)
// =========================================================

/// 管理端的分页列表
///
/// 搜索或排序变化时回到第一页。
#[derive(Debug, Clone)]
pub struct PagedList<T, F> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
    pub search: String,
    pub sort: Sort<F>,
    pub page: u32,
    pub limit: u32,
    pub loading: bool,
    pub error: Option<String>,
    seq: RequestSeq,
}

impl<T, F: SortField> PagedList<T, F> {
    pub fn new(sort_field: F) -> Self {
        Self {
            items: Vec::new(),
            pagination: PaginationInfo::default(),
            search: String::new(),
            sort: Sort::new(sort_field),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            loading: true,
            error: None,
            seq: RequestSeq::default(),
        }
    }

    pub fn begin_fetch(&mut self) -> Ticket {
        self.loading = true;
        self.error = None;
        self.seq.issue()
    }

    pub fn finish_fetch(
        &mut self,
        ticket: Ticket,
        result: Result<(Vec<T>, PaginationInfo), ApiError>,
        fallback: &str,
    ) -> bool {
        if !self.seq.is_current(ticket) {
            return false;
        }
        self.loading = false;
        match result {
            Ok((items, pagination)) => {
                self.items = items;
                self.pagination = pagination;
            }
            Err(e) => self.error = Some(e.message(fallback)),
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        !self.loading && self.error.is_none() && self.items.is_empty()
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, field: F) {
        self.sort.toggle(field);
        self.page = 1;
    }

    /// 翻到下一页；没有下一页时返回 `false`
    pub fn next_page(&mut self) -> bool {
        if !self.pagination.has_next {
            return false;
        }
        self.page += 1;
        true
    }

    pub fn prev_page(&mut self) -> bool {
        if !self.pagination.has_prev || self.page <= 1 {
            return false;
        }
        self.page -= 1;
        true
    }
}

/// 管理端用户列表，额外带角色筛选
#[derive(Debug, Clone)]
pub struct UsersModel {
    pub list: PagedList<UserWithStore, UserSortField>,
    pub role: Option<Role>,
}

impl Default for UsersModel {
    fn default() -> Self {
        Self {
            list: PagedList::new(UserSortField::Name),
            role: None,
        }
    }
}

impl UsersModel {
    pub fn request(&self) -> ListUsersRequest {
        ListUsersRequest {
            search: self.list.search.clone(),
            role: self.role,
            sort: self.list.sort,
            page: self.list.page,
            limit: self.list.limit,
        }
    }

    pub fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
        self.list.page = 1;
    }
}

pub type AdminStoresModel = PagedList<AdminStore, StoreSortField>;

impl Default for AdminStoresModel {
    fn default() -> Self {
        Self::new(StoreSortField::Name)
    }
}

impl AdminStoresModel {
    pub fn request(&self) -> AdminListStoresRequest {
        AdminListStoresRequest {
            search: self.search.clone(),
            sort: self.sort,
            page: self.page,
            limit: self.limit,
        }
    }
}

/// 评分显示为一位小数，没有评分时显示占位
pub fn format_average(average: Option<f64>) -> String {
    match average {
        Some(avg) if avg > 0.0 => format!("{:.1}", avg),
        _ => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests;
