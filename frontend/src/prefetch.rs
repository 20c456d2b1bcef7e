//! 路由预取模块
//!
//! 挂载后的空闲延迟（2 秒）结束时，对固定路由清单逐一发起后台预取，
//! 同一 tick 内全部派发、不限并发。尽力而为：单条失败只记 debug 级
//! 日志，绝不影响其余路由。
//!
//! 取消是批次级的（全有或全无）：持有方在延迟窗口内卸载时，定时器
//! 被清除且取消令牌置位，整批预取一次都不会发生。令牌同时传入每次
//! 预取调用，供实现在发起前再次检查。

use crate::error::PortalError;
use crate::web::Timeout;
use async_trait::async_trait;
use gloo_net::http::Request;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::cell::Cell;
use std::rc::Rc;

/// 空闲延迟，挂载后到首次预取的间隔
pub const PREFETCH_DELAY_MS: u32 = 2000;

/// 预取路由清单（构建期固定）
///
/// 高频导航目标：各工作区仪表盘与常用列表页。
pub const PREFETCH_ROUTES: &[&str] = &[
    "/tableau",
    "/tableau/finances",
    "/tableau/management",
    "/tableau/projects",
    "/clients",
    "/facturation",
];

/// 批次取消令牌
#[derive(Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// 路由预取适配器
#[async_trait(?Send)]
pub trait RoutePrefetcher {
    async fn prefetch(&self, path: &str, cancel: &CancelToken) -> Result<(), PortalError>;
}

/// HTTP GET 预取实现
///
/// 低优先级地拉一次路由资源，结果进浏览器缓存即可；取消后在途
/// 响应只被忽略，不做请求级中止。
pub struct HttpPrefetcher {
    base_url: String,
}

impl HttpPrefetcher {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait(?Send)]
impl RoutePrefetcher for HttpPrefetcher {
    async fn prefetch(&self, path: &str, cancel: &CancelToken) -> Result<(), PortalError> {
        if cancel.is_cancelled() {
            return Ok(());
        }
        let url = format!("{}{}", self.base_url, path);
        let response = Request::get(&url).send().await?;
        if cancel.is_cancelled() {
            return Ok(());
        }
        if !response.ok() {
            return Err(PortalError::Api(response.status()));
        }
        Ok(())
    }
}

/// 执行一个预取批次
///
/// 所有请求在同一 tick 内按清单顺序派发；每条路由的失败各自捕获。
pub async fn run_batch(prefetcher: &dyn RoutePrefetcher, routes: &[&str], cancel: &CancelToken) {
    if cancel.is_cancelled() {
        return;
    }
    let tasks = routes.iter().map(|route| {
        let route = *route;
        async move {
            if let Err(e) = prefetcher.prefetch(route, cancel).await {
                // debug 级：预取失败不值得打扰任何人
                logging::log!("[Prefetch] {} ignoré: {}", route, e);
            }
        }
    });
    futures::future::join_all(tasks).await;
}

/// 预取批次的所有权凭据
///
/// drop 时清除定时器并置位取消令牌。
pub struct PrefetchGuard {
    cancel: CancelToken,
    #[allow(dead_code)]
    timer: Timeout,
}

impl Drop for PrefetchGuard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// 预取调度器
pub struct PrefetchScheduler;

impl PrefetchScheduler {
    /// 安排一个批次；返回的凭据决定批次的生死
    pub fn schedule<P>(prefetcher: P) -> PrefetchGuard
    where
        P: RoutePrefetcher + 'static,
    {
        let cancel = CancelToken::new();
        let prefetcher = Rc::new(prefetcher);

        let timer_cancel = cancel.clone();
        let timer = Timeout::new(PREFETCH_DELAY_MS, move || {
            let prefetcher = prefetcher.clone();
            let cancel = timer_cancel.clone();
            spawn_local(async move {
                run_batch(prefetcher.as_ref(), PREFETCH_ROUTES, &cancel).await;
            });
        });

        PrefetchGuard { cancel, timer }
    }
}

/// 预取挂载点
///
/// 在认证后的外壳中挂载一次；卸载即取消整批。
#[component]
pub fn PrefetchMount() -> impl IntoView {
    let guard = send_wrapper::SendWrapper::new(PrefetchScheduler::schedule(HttpPrefetcher::new(
        crate::api::API_BASE_URL,
    )));
    on_cleanup(move || drop(guard));
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingPrefetcher {
        calls: RefCell<Vec<String>>,
        fail_paths: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl RoutePrefetcher for RecordingPrefetcher {
        async fn prefetch(&self, path: &str, cancel: &CancelToken) -> Result<(), PortalError> {
            if cancel.is_cancelled() {
                return Ok(());
            }
            self.calls.borrow_mut().push(path.to_string());
            if self.fail_paths.borrow().iter().any(|p| p == path) {
                Err(PortalError::Network(format!("refus simulé: {path}")))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn batch_hits_each_route_exactly_once_in_order() {
        let prefetcher = RecordingPrefetcher::default();
        block_on(run_batch(
            &prefetcher,
            PREFETCH_ROUTES,
            &CancelToken::new(),
        ));
        assert_eq!(prefetcher.calls.borrow().as_slice(), PREFETCH_ROUTES);
    }

    #[test]
    fn cancelled_batch_makes_zero_calls() {
        let prefetcher = RecordingPrefetcher::default();
        let cancel = CancelToken::new();
        cancel.cancel();
        block_on(run_batch(&prefetcher, PREFETCH_ROUTES, &cancel));
        assert!(prefetcher.calls.borrow().is_empty());
    }

    #[test]
    fn one_failure_does_not_abort_the_rest() {
        let prefetcher = RecordingPrefetcher::default();
        prefetcher
            .fail_paths
            .borrow_mut()
            .push("/tableau/finances".to_string());
        block_on(run_batch(
            &prefetcher,
            PREFETCH_ROUTES,
            &CancelToken::new(),
        ));
        assert_eq!(prefetcher.calls.borrow().len(), PREFETCH_ROUTES.len());
    }

    #[test]
    fn token_is_observed_by_each_call() {
        struct CancelAfterFirst {
            calls: RefCell<u32>,
        }

        #[async_trait(?Send)]
        impl RoutePrefetcher for CancelAfterFirst {
            async fn prefetch(&self, _path: &str, cancel: &CancelToken) -> Result<(), PortalError> {
                if cancel.is_cancelled() {
                    return Ok(());
                }
                *self.calls.borrow_mut() += 1;
                cancel.cancel();
                Ok(())
            }
        }

        let prefetcher = CancelAfterFirst {
            calls: RefCell::new(0),
        };
        let cancel = CancelToken::new();
        block_on(run_batch(&prefetcher, PREFETCH_ROUTES, &cancel));
        // 第一条之后全部在实现内部被令牌拦下
        assert_eq!(*prefetcher.calls.borrow(), 1);
    }
}
