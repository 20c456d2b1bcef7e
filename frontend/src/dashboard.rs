//! 工作区上下文模块
//!
//! 每个仪表盘组件树都运行在一个命名工作区（上下文键）之下。
//! 上下文状态在首次进入时惰性创建，并在存储实例的生命周期内保留；
//! 切换上下文会清除上一个上下文的瞬态状态。
//!
//! 每个工作区的专用 hook 只在挂载时调用一次 `set_context`，从不响应式
//! 重新调用：切换工作区需要整棵组件树重新挂载。这是刻意的简化。

use crate::error::PortalError;
use leptos::logging;
use leptos::prelude::*;
use std::collections::HashMap;
use std::rc::Rc;

/// 工作区上下文键（闭合枚举，无隐式默认值）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Main,
    Finances,
    Management,
    Projects,
    Reseau,
}

impl ContextKey {
    pub const ALL: &'static [ContextKey] = &[
        ContextKey::Main,
        ContextKey::Finances,
        ContextKey::Management,
        ContextKey::Projects,
        ContextKey::Reseau,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::Main => "main",
            ContextKey::Finances => "finances",
            ContextKey::Management => "management",
            ContextKey::Projects => "projects",
            ContextKey::Reseau => "reseau",
        }
    }

    /// 从 URL 片段解析上下文键（`main` 没有自己的片段）
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == slug)
    }
}

/// 单个工作区的 UI 状态
///
/// `selection` 与 `search` 是瞬态的，离开上下文即清除；
/// `entered` 跨切换保留，记录该工作区被初始化的次数。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceState {
    pub selection: Option<String>,
    pub search: String,
    pub entered: u32,
}

impl WorkspaceState {
    fn reset_transient(&mut self) {
        self.selection = None;
        self.search.clear();
    }
}

/// 上下文初始化适配器
///
/// 拆出 trait 以便测试注入；Web 实现只做日志记录，真实数据
/// 由各页面自行加载。
pub trait ContextInit {
    fn init(&self, key: ContextKey) -> Result<(), PortalError>;
    fn teardown(&self, key: ContextKey);
}

/// 生产环境实现
pub struct WebContextInit;

impl ContextInit for WebContextInit {
    fn init(&self, key: ContextKey) -> Result<(), PortalError> {
        logging::log!("[Dashboard] contexte actif: {}", key.as_str());
        Ok(())
    }

    fn teardown(&self, key: ContextKey) {
        logging::log!("[Dashboard] contexte quitté: {}", key.as_str());
    }
}

/// 工作区上下文存储
///
/// 同一个存储实例在任一时刻最多有一个活跃上下文。
#[derive(Clone)]
pub struct DashboardStore {
    active: ReadSignal<Option<ContextKey>>,
    set_active: WriteSignal<Option<ContextKey>>,
    states: Rc<std::cell::RefCell<HashMap<ContextKey, WorkspaceState>>>,
    init: Rc<dyn ContextInit>,
}

impl DashboardStore {
    pub fn new(init: Rc<dyn ContextInit>) -> Self {
        let (active, set_active) = signal(None);
        Self {
            active,
            set_active,
            states: Rc::new(std::cell::RefCell::new(HashMap::new())),
            init,
        }
    }

    /// 当前活跃上下文（只读信号）
    pub fn active(&self) -> ReadSignal<Option<ContextKey>> {
        self.active
    }

    /// 切换活跃上下文
    ///
    /// 幂等：传入当前活跃键时不做任何事。否则先清除上一个上下文的
    /// 瞬态状态，再初始化新上下文。初始化失败只记录日志，从不向上
    /// 抛出，活跃键照常更新。
    pub fn set_context(&self, key: ContextKey) {
        let previous = self.active.get_untracked();
        if previous == Some(key) {
            return;
        }

        if let Some(prev) = previous {
            self.init.teardown(prev);
            if let Some(state) = self.states.borrow_mut().get_mut(&prev) {
                state.reset_transient();
            }
        }

        {
            let mut states = self.states.borrow_mut();
            let state = states.entry(key).or_default();
            state.entered += 1;
        }

        if let Err(e) = self.init.init(key) {
            logging::error!("[Dashboard] échec d'initialisation ({}): {}", key.as_str(), e);
        }
        self.set_active.set(Some(key));
    }

    /// 工作区状态快照（尚未进入过的工作区返回 `None`）
    pub fn state_of(&self, key: ContextKey) -> Option<WorkspaceState> {
        self.states.borrow().get(&key).cloned()
    }

    /// 修改工作区状态（仅对已进入过的工作区生效）
    pub fn update_state(&self, key: ContextKey, f: impl FnOnce(&mut WorkspaceState)) {
        if let Some(state) = self.states.borrow_mut().get_mut(&key) {
            f(state);
        }
    }
}

/// 从 Context 获取工作区存储
pub fn use_dashboard() -> DashboardStore {
    use_context::<send_wrapper::SendWrapper<DashboardStore>>()
        .expect("DashboardStore should be provided")
        .take()
}

// 每个工作区一个专用 hook；只在组件函数体内调用（即仅挂载时执行一次）。

pub fn use_main_dashboard() -> DashboardStore {
    let store = use_dashboard();
    store.set_context(ContextKey::Main);
    store
}

pub fn use_finances_dashboard() -> DashboardStore {
    let store = use_dashboard();
    store.set_context(ContextKey::Finances);
    store
}

pub fn use_management_dashboard() -> DashboardStore {
    let store = use_dashboard();
    store.set_context(ContextKey::Management);
    store
}

pub fn use_projects_dashboard() -> DashboardStore {
    let store = use_dashboard();
    store.set_context(ContextKey::Projects);
    store
}

pub fn use_reseau_dashboard() -> DashboardStore {
    let store = use_dashboard();
    store.set_context(ContextKey::Reseau);
    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingInit {
        log: RefCell<Vec<String>>,
        fail: RefCell<Vec<ContextKey>>,
    }

    impl RecordingInit {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                log: RefCell::new(Vec::new()),
                fail: RefCell::new(Vec::new()),
            })
        }

        fn log(&self) -> Vec<String> {
            self.log.borrow().clone()
        }
    }

    impl ContextInit for RecordingInit {
        fn init(&self, key: ContextKey) -> Result<(), PortalError> {
            self.log.borrow_mut().push(format!("init:{}", key.as_str()));
            if self.fail.borrow().contains(&key) {
                Err(PortalError::ContextInit(key.as_str().to_string()))
            } else {
                Ok(())
            }
        }

        fn teardown(&self, key: ContextKey) {
            self.log
                .borrow_mut()
                .push(format!("teardown:{}", key.as_str()));
        }
    }

    #[test]
    fn set_context_is_idempotent() {
        let init = RecordingInit::new();
        let store = DashboardStore::new(init.clone());

        store.set_context(ContextKey::Finances);
        store.set_context(ContextKey::Finances);

        assert_eq!(init.log(), vec!["init:finances"]);
        assert_eq!(store.active().get_untracked(), Some(ContextKey::Finances));
        assert_eq!(store.state_of(ContextKey::Finances).unwrap().entered, 1);
    }

    #[test]
    fn switching_tears_down_previous_then_initializes() {
        let init = RecordingInit::new();
        let store = DashboardStore::new(init.clone());

        store.set_context(ContextKey::Main);
        store.update_state(ContextKey::Main, |s| {
            s.search = "dupont".to_string();
            s.selection = Some("opp-3".to_string());
        });
        store.set_context(ContextKey::Projects);

        assert_eq!(
            init.log(),
            vec!["init:main", "teardown:main", "init:projects"]
        );
        // 瞬态状态被清除，持久计数保留
        let main = store.state_of(ContextKey::Main).unwrap();
        assert_eq!(main.search, "");
        assert_eq!(main.selection, None);
        assert_eq!(main.entered, 1);
    }

    #[test]
    fn reentering_a_context_reinitializes_it() {
        let init = RecordingInit::new();
        let store = DashboardStore::new(init.clone());

        store.set_context(ContextKey::Main);
        store.set_context(ContextKey::Reseau);
        store.set_context(ContextKey::Main);

        assert_eq!(store.state_of(ContextKey::Main).unwrap().entered, 2);
    }

    #[test]
    fn init_failure_is_non_fatal_and_still_activates() {
        let init = RecordingInit::new();
        init.fail.borrow_mut().push(ContextKey::Finances);
        let store = DashboardStore::new(init.clone());

        store.set_context(ContextKey::Finances);

        assert_eq!(store.active().get_untracked(), Some(ContextKey::Finances));
        // 幂等性在失败后依然成立
        store.set_context(ContextKey::Finances);
        assert_eq!(init.log(), vec!["init:finances"]);
    }

    #[test]
    fn every_key_has_a_distinct_slug() {
        for k in ContextKey::ALL {
            assert_eq!(ContextKey::from_slug(k.as_str()), Some(*k));
        }
        assert_eq!(ContextKey::from_slug("commercial"), None);
    }
}
