use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortcoderError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Storage(String),
    Serialization(String),
    Encoding(String),
    Unexpected(String),
}

impl ShortcoderError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShortcoderError::Validation(_) => "E001",
            ShortcoderError::NotFound(_) => "E002",
            ShortcoderError::Conflict(_) => "E003",
            ShortcoderError::Storage(_) => "E004",
            ShortcoderError::Serialization(_) => "E005",
            ShortcoderError::Encoding(_) => "E006",
            ShortcoderError::Unexpected(_) => "E007",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShortcoderError::Validation(_) => "Validation Error",
            ShortcoderError::NotFound(_) => "Resource Not Found",
            ShortcoderError::Conflict(_) => "Resource Conflict",
            ShortcoderError::Storage(_) => "Storage Error",
            ShortcoderError::Serialization(_) => "Serialization Error",
            ShortcoderError::Encoding(_) => "Encoding Error",
            ShortcoderError::Unexpected(_) => "Unexpected Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShortcoderError::Validation(msg) => msg,
            ShortcoderError::NotFound(msg) => msg,
            ShortcoderError::Conflict(msg) => msg,
            ShortcoderError::Storage(msg) => msg,
            ShortcoderError::Serialization(msg) => msg,
            ShortcoderError::Encoding(msg) => msg,
            ShortcoderError::Unexpected(msg) => msg,
        }
    }

    /// 对应的 HTTP 状态码，非客户端错误一律为 500
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShortcoderError::Validation(_) => StatusCode::BAD_REQUEST,
            ShortcoderError::NotFound(_) => StatusCode::NOT_FOUND,
            ShortcoderError::Conflict(_) => StatusCode::CONFLICT,
            ShortcoderError::Storage(_)
            | ShortcoderError::Serialization(_)
            | ShortcoderError::Encoding(_)
            | ShortcoderError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 客户端错误由控制器直接响应，其余错误交给外层适配器转换
    pub fn is_client_error(&self) -> bool {
        self.http_status().is_client_error()
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShortcoderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShortcoderError {}

// 便捷的构造函数
impl ShortcoderError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::Conflict(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::Storage(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::Serialization(msg.into())
    }

    pub fn unexpected<T: Into<String>>(msg: T) -> Self {
        ShortcoderError::Unexpected(msg.into())
    }
}

impl From<std::io::Error> for ShortcoderError {
    fn from(err: std::io::Error) -> Self {
        ShortcoderError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ShortcoderError {
    fn from(err: serde_json::Error) -> Self {
        ShortcoderError::Serialization(err.to_string())
    }
}

impl From<base64::DecodeError> for ShortcoderError {
    fn from(err: base64::DecodeError) -> Self {
        ShortcoderError::Encoding(format!("invalid base64 body: {}", err))
    }
}

impl From<qrcode::types::QrError> for ShortcoderError {
    fn from(err: qrcode::types::QrError) -> Self {
        ShortcoderError::Encoding(format!("QR code generation failed: {}", err))
    }
}

impl actix_web::ResponseError for ShortcoderError {
    fn status_code(&self) -> StatusCode {
        self.http_status()
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let body = crate::api::serializer::error_document(self);
        actix_web::HttpResponse::build(self.http_status())
            .insert_header(("Content-Type", crate::api::constants::JSON_API_MEDIA_TYPE))
            .body(body.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShortcoderError>;
