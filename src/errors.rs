use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum ShorthostError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    ObjectStore(String),
    ObjectNotFound(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    ArchiveRead(String),
    InvalidMultipart(String),
}

impl ShorthostError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ShorthostError::DatabaseConfig(_) => "E001",
            ShorthostError::DatabaseConnection(_) => "E002",
            ShorthostError::DatabaseOperation(_) => "E003",
            ShorthostError::ObjectStore(_) => "E004",
            ShorthostError::ObjectNotFound(_) => "E005",
            ShorthostError::Validation(_) => "E006",
            ShorthostError::NotFound(_) => "E007",
            ShorthostError::Serialization(_) => "E008",
            ShorthostError::ArchiveRead(_) => "E009",
            ShorthostError::InvalidMultipart(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ShorthostError::DatabaseConfig(_) => "Database Configuration Error",
            ShorthostError::DatabaseConnection(_) => "Database Connection Error",
            ShorthostError::DatabaseOperation(_) => "Database Operation Error",
            ShorthostError::ObjectStore(_) => "Object Store Error",
            ShorthostError::ObjectNotFound(_) => "Object Not Found",
            ShorthostError::Validation(_) => "Validation Error",
            ShorthostError::NotFound(_) => "Resource Not Found",
            ShorthostError::Serialization(_) => "Serialization Error",
            ShorthostError::ArchiveRead(_) => "Archive Read Error",
            ShorthostError::InvalidMultipart(_) => "Invalid Multipart Data",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ShorthostError::DatabaseConfig(msg) => msg,
            ShorthostError::DatabaseConnection(msg) => msg,
            ShorthostError::DatabaseOperation(msg) => msg,
            ShorthostError::ObjectStore(msg) => msg,
            ShorthostError::ObjectNotFound(msg) => msg,
            ShorthostError::Validation(msg) => msg,
            ShorthostError::NotFound(msg) => msg,
            ShorthostError::Serialization(msg) => msg,
            ShorthostError::ArchiveRead(msg) => msg,
            ShorthostError::InvalidMultipart(msg) => msg,
        }
    }

    /// HTTP 状态码映射（Admin API 使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            ShorthostError::Validation(_)
            | ShorthostError::ArchiveRead(_)
            | ShorthostError::InvalidMultipart(_) => StatusCode::BAD_REQUEST,
            ShorthostError::NotFound(_) | ShorthostError::ObjectNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否为上游存储错误（需要生成关联 ID 并隐藏细节）
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ShorthostError::DatabaseConfig(_)
                | ShorthostError::DatabaseConnection(_)
                | ShorthostError::DatabaseOperation(_)
                | ShorthostError::ObjectStore(_)
                | ShorthostError::Serialization(_)
        )
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ShorthostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ShorthostError {}

// 便捷的构造函数
impl ShorthostError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        ShorthostError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        ShorthostError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        ShorthostError::DatabaseOperation(msg.into())
    }

    pub fn object_store<T: Into<String>>(msg: T) -> Self {
        ShorthostError::ObjectStore(msg.into())
    }

    pub fn object_not_found<T: Into<String>>(msg: T) -> Self {
        ShorthostError::ObjectNotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ShorthostError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ShorthostError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ShorthostError::Serialization(msg.into())
    }

    pub fn archive_read<T: Into<String>>(msg: T) -> Self {
        ShorthostError::ArchiveRead(msg.into())
    }

    pub fn invalid_multipart<T: Into<String>>(msg: T) -> Self {
        ShorthostError::InvalidMultipart(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for ShorthostError {
    fn from(err: sea_orm::DbErr) -> Self {
        ShorthostError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for ShorthostError {
    fn from(err: std::io::Error) -> Self {
        ShorthostError::ObjectStore(err.to_string())
    }
}

impl From<serde_json::Error> for ShorthostError {
    fn from(err: serde_json::Error) -> Self {
        ShorthostError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShorthostError>;
