//! API 模块常量定义

/// JSON:API 媒体类型，所有结构化响应都使用它
pub const JSON_API_MEDIA_TYPE: &str = "application/vnd.api+json";

pub const JSON_MEDIA_TYPE: &str = "application/json";

/// 纯文本表示的内容类型
pub const HTML_MEDIA_TYPE: &str = "text/html; charset=utf-8";

/// 跨域请求中允许浏览器携带的请求头
pub const CORS_ALLOWED_HEADERS: &str =
    "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";

/// 短码资源的稀疏字段集查询参数
pub const SHORTCODE_FIELDS_PARAM: &str = "fields[shortcodes]";

pub const DESTINATION_PARAM: &str = "destination";

/// JSON:API 资源类型
pub const SHORTCODE_TYPE: &str = "shortcode";
pub const SUGGESTION_TYPE: &str = "suggestion";

/// 短码资源的属性名
pub const ATTR_NAME: &str = "name";
pub const ATTR_DESTINATION: &str = "destination";
pub const ATTR_SSL: &str = "ssl";
pub const ATTR_QR_CODE: &str = "qr-code";

/// 路由解析时锚定的路径段
pub const SHORTCODES_SEGMENT: &str = "shortcodes";
pub const SUGGESTION_SEGMENT: &str = "suggestion";

/// 从最后一个路径段剥离的格式扩展名
pub const FORMAT_EXTENSIONS: [&str; 4] = ["json", "xml", "html", "txt"];

pub const MAX_NAME_LENGTH: usize = 128;

/// 生成未占用建议短码的最大尝试次数
pub const SUGGESTION_ATTEMPTS: usize = 5;
