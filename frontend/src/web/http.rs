//! 浏览器 HTTP 传输层
//!
//! 基于 `gloo-net` 的 fetch 封装，实现 [`HttpTransport`]。

use gloo_net::http::{Request, RequestBuilder};
use rateboard_shared::protocol::HttpMethod;

use crate::api::{HttpRequest, HttpResponse, HttpTransport};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct FetchTransport;

impl FetchTransport {
    fn builder(req: &HttpRequest) -> RequestBuilder {
        let builder = match req.method {
            HttpMethod::Get => Request::get(&req.url),
            HttpMethod::Post => Request::post(&req.url),
            HttpMethod::Put => Request::put(&req.url),
        };

        let builder = req
            .headers
            .iter()
            .fold(builder, |builder, (key, value)| builder.header(key, value));

        if req.query.is_empty() {
            builder
        } else {
            builder.query(req.query.iter().map(|(k, v)| (*k, v.as_str())))
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let builder = Self::builder(&req);
        let request = match req.body {
            Some(body) => builder.body(body),
            None => builder.build(),
        }
        .map_err(|e| ApiError::Request(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
