//! 会话模块
//!
//! 进程内唯一的认证状态，持久化到浏览器存储并在启动时自动恢复。
//! 存储介质通过 trait 注入而不是环境单例，测试可以完全隔离。
//!
//! 存储写入失败对调用方静默（只留一条日志）：UI 对此无能为力，
//! 会话在内存中照常生效，下次启动再走登录流程。

use crate::web::LocalStorage;
use leptos::logging;
use leptos::prelude::*;
use portalis_shared::{STORAGE_SESSION_KEY, SessionUser};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// 会话持久化适配器
pub trait SessionStorage {
    /// 读取序列化的会话快照
    fn load(&self) -> Option<String>;
    /// 写入快照，返回是否成功
    fn save(&self, blob: &str) -> bool;
    /// 清除快照，返回是否成功
    fn clear(&self) -> bool;
}

/// LocalStorage 实现，固定使用 [`STORAGE_SESSION_KEY`]
pub struct WebSessionStorage;

impl SessionStorage for WebSessionStorage {
    fn load(&self) -> Option<String> {
        LocalStorage::get(STORAGE_SESSION_KEY)
    }

    fn save(&self, blob: &str) -> bool {
        LocalStorage::set(STORAGE_SESSION_KEY, blob)
    }

    fn clear(&self) -> bool {
        LocalStorage::delete(STORAGE_SESSION_KEY)
    }
}

/// 会话状态
///
/// `is_authenticated` 当且仅当用户与令牌同时存在。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub user: Option<SessionUser>,
    pub token: Option<String>,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }
}

/// 会话存储
///
/// 显式持有的存储对象，经 Context 注入组件树；写入为 last-write-wins。
#[derive(Clone)]
pub struct SessionStore {
    state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
    storage: Rc<dyn SessionStorage>,
}

impl SessionStore {
    /// 创建并从持久化存储恢复会话
    ///
    /// 快照缺失或解析失败都退回未认证状态。
    pub fn new(storage: Rc<dyn SessionStorage>) -> Self {
        let initial = match storage.load() {
            None => SessionState::default(),
            Some(blob) => match serde_json_wasm::from_str(&blob) {
                Ok(state) => state,
                Err(e) => {
                    logging::warn!("[Session] instantané illisible, session vidée: {}", e);
                    SessionState::default()
                }
            },
        };
        let (state, set_state) = signal(initial);
        Self {
            state,
            set_state,
            storage,
        }
    }

    pub fn state(&self) -> ReadSignal<SessionState> {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.get_untracked().is_authenticated()
    }

    /// 认证状态信号（用于路由守卫注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.get().is_authenticated())
    }

    /// 登录：写入用户与令牌并持久化
    pub fn login(&self, user: SessionUser, token: String) {
        self.apply(SessionState {
            user: Some(user),
            token: Some(token),
        });
    }

    /// 注销：清空内存状态与持久化快照
    pub fn logout(&self) {
        self.set_state.set(SessionState::default());
        if !self.storage.clear() {
            logging::warn!("[Session] échec de purge du stockage local");
        }
    }

    /// 仅更新令牌（刷新场景），不触发完整登录流程
    pub fn set_token(&self, token: Option<String>) {
        let mut next = self.state.get_untracked();
        next.token = token;
        self.apply(next);
    }

    /// 仅更新用户资料
    pub fn set_user(&self, user: SessionUser) {
        let mut next = self.state.get_untracked();
        next.user = Some(user);
        self.apply(next);
    }

    fn apply(&self, next: SessionState) {
        self.persist(&next);
        self.set_state.set(next);
    }

    fn persist(&self, state: &SessionState) {
        match serde_json_wasm::to_string(state) {
            Ok(blob) => {
                if !self.storage.save(&blob) {
                    // 静默降级：见模块注释
                    logging::warn!("[Session] écriture du stockage local refusée");
                }
            }
            Err(e) => logging::warn!("[Session] sérialisation impossible: {}", e),
        }
    }
}

/// 从 Context 获取会话存储
pub fn use_session() -> SessionStore {
    use_context::<send_wrapper::SendWrapper<SessionStore>>()
        .expect("SessionStore should be provided")
        .take()
}
