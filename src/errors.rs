use serde::Serialize;

pub type RouterResult<T> = Result<T, RouterError>;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouterErrorCode {
    // Registration-time: validation
    MethodEmpty = 10001,
    PathMissingLeadingSlash,
    EmptyWildcardName,
    AdjacentWildcards,
    BraceInParamName,
    InvalidRegex,
    // Registration-time: placement
    CatchAllNotAtEnd = 10101,
    CatchAllWithoutSlash,
    // Registration-time: conflicts
    DuplicateHandler = 10201,
    WildcardConflict,
}

impl RouterErrorCode {
    pub fn code(self) -> u16 {
        self as u16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RouterErrorCode::MethodEmpty => "MethodEmpty",
            RouterErrorCode::PathMissingLeadingSlash => "PathMissingLeadingSlash",
            RouterErrorCode::EmptyWildcardName => "EmptyWildcardName",
            RouterErrorCode::AdjacentWildcards => "AdjacentWildcards",
            RouterErrorCode::BraceInParamName => "BraceInParamName",
            RouterErrorCode::InvalidRegex => "InvalidRegex",
            RouterErrorCode::CatchAllNotAtEnd => "CatchAllNotAtEnd",
            RouterErrorCode::CatchAllWithoutSlash => "CatchAllWithoutSlash",
            RouterErrorCode::DuplicateHandler => "DuplicateHandler",
            RouterErrorCode::WildcardConflict => "WildcardConflict",
        }
    }
}

impl From<RouterErrorCode> for u16 {
    fn from(code: RouterErrorCode) -> u16 {
        code as u16
    }
}

/// Registration-time error. `description` is the stable, exact message text
/// asserted by the test suite; `detail` carries structured context.
#[derive(Debug, Clone, Serialize)]
pub struct RouterError {
    pub code: RouterErrorCode,
    pub error: String,
    pub description: String,
    pub detail: Option<serde_json::Value>,
}

impl RouterError {
    pub fn new(
        code: RouterErrorCode,
        description: String,
        detail: Option<serde_json::Value>,
    ) -> Self {
        RouterError {
            error: code.as_str().to_string(),
            code,
            description,
            detail,
        }
    }
}

impl std::fmt::Display for RouterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.description)
    }
}

impl std::error::Error for RouterError {}
