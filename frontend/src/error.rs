use rateboard_shared::ApiErrorBody;
use thiserror::Error;

/// API 调用错误
///
/// 只对 401 做特殊处理，其余状态码原样携带响应体交给调用方展示。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// 没有收到响应
    #[error("network error: {0}")]
    Network(String),
    /// 请求构建或序列化失败
    #[error("failed to build request: {0}")]
    Request(String),
    /// 401: 会话失效
    #[error("session is no longer valid")]
    Unauthorized(ApiErrorBody),
    #[error("request failed with status {status}")]
    Status { status: u16, body: ApiErrorBody },
    /// 响应解析失败
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 根据失败响应构造错误，响应体不是预期的 JSON 时按空处理
    pub fn from_response(status: u16, body: &str) -> Self {
        let body = serde_json::from_str::<ApiErrorBody>(body).unwrap_or_default();
        if status == 401 {
            Self::Unauthorized(body)
        } else {
            Self::Status { status, body }
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::Request(_) | Self::Decode(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    fn body(&self) -> Option<&ApiErrorBody> {
        match self {
            Self::Unauthorized(body) | Self::Status { body, .. } => Some(body),
            Self::Network(_) | Self::Request(_) | Self::Decode(_) => None,
        }
    }

    /// 展示用的错误列表：优先字段错误，其次 `message`，最后使用 `fallback`
    pub fn messages(&self, fallback: &str) -> Vec<String> {
        if let Some(body) = self.body() {
            if !body.errors.is_empty() {
                return body.errors.iter().map(|e| e.msg.clone()).collect();
            }
        }
        vec![self.message(fallback)]
    }

    /// 展示用的单条错误：服务端 `message`，否则 `fallback`
    pub fn message(&self, fallback: &str) -> String {
        self.body()
            .and_then(|body| body.message.clone())
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_prefers_field_errors() {
        let err = ApiError::from_response(
            400,
            r#"{"message":"Validation failed","errors":[{"msg":"Name too short"},{"msg":"Invalid email"}]}"#,
        );
        assert_eq!(err.messages("Signup failed"), vec!["Name too short", "Invalid email"]);
        assert_eq!(err.message("Signup failed"), "Validation failed");
    }

    #[test]
    fn test_fallback_when_body_is_not_json() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.message("Failed to fetch stores"), "Failed to fetch stores");

        let err = ApiError::Network("connection refused".into());
        assert_eq!(err.messages("Login failed"), vec!["Login failed"]);
    }

    #[test]
    fn test_unauthorized_keeps_server_message() {
        let err = ApiError::from_response(401, r#"{"message":"Invalid credentials"}"#);
        assert!(err.is_unauthorized());
        assert_eq!(err.message("Login failed"), "Invalid credentials");
    }
}
