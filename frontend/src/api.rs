use crate::error::PortalError;
use gloo_net::http::Request;
use portalis_shared::protocol::{
    ApiRequest, HttpMethod, LoginRequest, LoginResponse, ModuleAccessRequest, ModuleAccessResponse,
};
use portalis_shared::{EmployeeId, HEADER_AUTH};

/// API 入口；空串表示同源部署
pub const API_BASE_URL: &str = "";

/// ERP 后端 API 客户端
///
/// 认证后的请求携带 Bearer 令牌；`base_url` 为空表示同源部署。
#[derive(Clone, Debug, PartialEq, Default)]
pub struct PortalApi {
    pub base_url: String,
    token: Option<String>,
}

impl PortalApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 按协议定义发送请求
    pub async fn send<R: ApiRequest>(&self, req: &R) -> Result<R::Response, PortalError> {
        let url = self.url(&req.path());
        let mut builder = match R::METHOD {
            HttpMethod::Get => Request::get(&url),
            HttpMethod::Post => Request::post(&url),
        };
        if let Some(token) = &self.token {
            let bearer = format!("Bearer {}", token);
            builder = builder.header(HEADER_AUTH, &bearer);
        }

        let response = match R::METHOD {
            HttpMethod::Get => builder.send().await?,
            HttpMethod::Post => {
                builder
                    .header("Content-Type", "application/json")
                    .json(req)
                    .map_err(|e| PortalError::Parse(e.to_string()))?
                    .send()
                    .await?
            }
        };

        if !response.ok() {
            return Err(PortalError::Api(response.status()));
        }
        response
            .json::<R::Response>()
            .await
            .map_err(|e| PortalError::Parse(e.to_string()))
    }

    /// 登录
    pub async fn login(&self, email: String, password: String) -> Result<LoginResponse, PortalError> {
        self.send(&LoginRequest { email, password }).await
    }

    /// 获取员工的模块访问快照
    pub async fn module_access(
        &self,
        employee_id: EmployeeId,
    ) -> Result<ModuleAccessResponse, PortalError> {
        self.send(&ModuleAccessRequest { employee_id }).await
    }
}
