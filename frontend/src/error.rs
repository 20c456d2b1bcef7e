//! 前端错误类型
//!
//! 本层的错误从不跨组件边界抛出：所有异步边界捕获后降级为日志或占位 UI。

/// 门户前端错误
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalError {
    /// 网络请求失败
    Network(String),
    /// 服务端返回非 2xx 状态码
    Api(u16),
    /// JSON 解析失败（存储快照或 Socket 帧）
    Parse(String),
    /// Socket 连接失败
    Socket(String),
    /// 工作区上下文初始化失败
    ContextInit(String),
}

impl core::fmt::Display for PortalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PortalError::Network(msg) => write!(f, "erreur réseau: {}", msg),
            PortalError::Api(status) => write!(f, "réponse API {}", status),
            PortalError::Parse(msg) => write!(f, "décodage impossible: {}", msg),
            PortalError::Socket(msg) => write!(f, "connexion socket: {}", msg),
            PortalError::ContextInit(msg) => write!(f, "initialisation du contexte: {}", msg),
        }
    }
}

impl std::error::Error for PortalError {}

impl From<gloo_net::Error> for PortalError {
    fn from(e: gloo_net::Error) -> Self {
        PortalError::Network(e.to_string())
    }
}
