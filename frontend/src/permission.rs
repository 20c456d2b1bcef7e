//! 权限解析模块
//!
//! 员工门户的嵌套路由按 (员工, 模块) 判定可达性。权限快照按员工
//! 加载一次并缓存；员工 id 变化时缓存作废、重新拉取。
//!
//! 快照未就绪时解析结果是 `Loading` 而不是否定，避免数据到达前的
//! 闪烁重定向；加载失败停留在 `Loading`（既定策略，无自动重试）。

use crate::api::PortalApi;
use crate::error::PortalError;
use leptos::logging;
use leptos::prelude::*;
use leptos::task::spawn_local;
use portalis_shared::protocol::ModuleAccessResponse;
use portalis_shared::{EmployeeId, ModuleKey};

/// 单个模块的访问判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// 权限快照尚未加载完成
    Loading,
    Granted,
    Denied,
}

/// 权限快照的加载状态
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AccessMapState {
    #[default]
    Loading,
    Loaded(portalis_shared::ModuleAccessMap),
}

/// 访问判定：(快照状态, 模块) 的纯函数
///
/// 不受保护的模块无条件放行，连加载都不必等。
pub fn resolve(map: &AccessMapState, module: ModuleKey) -> AccessState {
    if !module.is_protected() {
        return AccessState::Granted;
    }
    match map {
        AccessMapState::Loading => AccessState::Loading,
        AccessMapState::Loaded(snapshot) => {
            if snapshot.allows(module) {
                AccessState::Granted
            } else {
                AccessState::Denied
            }
        }
    }
}

/// 权限存储
///
/// 每个员工 id 至多拉取一次快照；跨员工从不复用。
#[derive(Clone, Copy)]
pub struct PermissionStore {
    employee: ReadSignal<Option<EmployeeId>>,
    set_employee: WriteSignal<Option<EmployeeId>>,
    map: ReadSignal<AccessMapState>,
    set_map: WriteSignal<AccessMapState>,
}

impl PermissionStore {
    pub fn new() -> Self {
        let (employee, set_employee) = signal(None);
        let (map, set_map) = signal(AccessMapState::default());
        Self {
            employee,
            set_employee,
            map,
            set_map,
        }
    }

    pub fn map_state(&self) -> ReadSignal<AccessMapState> {
        self.map
    }

    /// 某模块的访问判定信号
    pub fn access_signal(&self, module: ModuleKey) -> Signal<AccessState> {
        let map = self.map;
        Signal::derive(move || resolve(&map.get(), module))
    }

    /// 声明当前关注的员工；返回是否需要发起拉取
    ///
    /// 同一员工重复调用返回 `false`（快照已加载或在途）。
    pub fn begin(&self, id: &EmployeeId) -> bool {
        if self.employee.get_untracked().as_ref() == Some(id) {
            return false;
        }
        self.set_employee.set(Some(id.clone()));
        self.set_map.set(AccessMapState::Loading);
        true
    }

    /// 写入拉取结果
    ///
    /// 员工 id 在等待期间变化时结果视为过期并丢弃；拉取失败只记录
    /// 日志，状态停留在 `Loading`。
    pub fn apply(&self, id: &EmployeeId, result: Result<ModuleAccessResponse, PortalError>) {
        if self.employee.get_untracked().as_ref() != Some(id) {
            logging::log!("[Permission] réponse obsolète ignorée ({})", id);
            return;
        }
        match result {
            Ok(response) => self.set_map.set(AccessMapState::Loaded(response.modules)),
            Err(e) => logging::warn!("[Permission] chargement impossible ({}): {}", id, e),
        }
    }

    /// 确保指定员工的快照已加载或在途
    pub fn ensure_loaded(&self, api: PortalApi, id: EmployeeId) {
        if !self.begin(&id) {
            return;
        }
        let store = *self;
        spawn_local(async move {
            let result = api.module_access(id.clone()).await;
            store.apply(&id, result);
        });
    }
}

impl Default for PermissionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取权限存储
pub fn use_permissions() -> PermissionStore {
    use_context::<PermissionStore>().expect("PermissionStore should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalis_shared::ModuleAccessMap;

    fn id(raw: &str) -> EmployeeId {
        EmployeeId::new(raw).unwrap()
    }

    fn response(id: &EmployeeId, modules: ModuleAccessMap) -> ModuleAccessResponse {
        ModuleAccessResponse {
            employee_id: id.clone(),
            modules,
        }
    }

    #[test]
    fn protected_module_is_loading_until_snapshot_arrives() {
        let state = AccessMapState::Loading;
        assert_eq!(resolve(&state, ModuleKey::Commercial), AccessState::Loading);
        // 从不在数据到达前给出否定
        assert_ne!(resolve(&state, ModuleKey::Finances), AccessState::Denied);
    }

    #[test]
    fn unprotected_module_bypasses_loading() {
        assert_eq!(
            resolve(&AccessMapState::Loading, ModuleKey::Reseau),
            AccessState::Granted
        );
    }

    #[test]
    fn snapshot_decides_granted_or_denied() {
        let snapshot =
            AccessMapState::Loaded(ModuleAccessMap::default().with(ModuleKey::Commercial, true));
        assert_eq!(
            resolve(&snapshot, ModuleKey::Commercial),
            AccessState::Granted
        );
        assert_eq!(resolve(&snapshot, ModuleKey::Finances), AccessState::Denied);
    }

    #[test]
    fn begin_fetches_once_per_employee() {
        let store = PermissionStore::new();
        let emp = id("e-1");
        assert!(store.begin(&emp));
        assert!(!store.begin(&emp));

        store.apply(&emp, Ok(response(&emp, ModuleAccessMap::uniform(true))));
        // 已加载后仍然不再拉取
        assert!(!store.begin(&emp));
        assert_eq!(
            resolve(&store.map_state().get_untracked(), ModuleKey::Projects),
            AccessState::Granted
        );
    }

    #[test]
    fn changing_employee_resets_to_loading() {
        let store = PermissionStore::new();
        let first = id("e-1");
        store.begin(&first);
        store.apply(&first, Ok(response(&first, ModuleAccessMap::uniform(true))));

        let second = id("e-2");
        assert!(store.begin(&second));
        assert_eq!(store.map_state().get_untracked(), AccessMapState::Loading);
    }

    #[test]
    fn stale_response_is_discarded() {
        let store = PermissionStore::new();
        let first = id("e-1");
        let second = id("e-2");
        store.begin(&first);
        store.begin(&second);

        // e-1 的响应迟到：不得污染 e-2 的快照
        store.apply(&first, Ok(response(&first, ModuleAccessMap::uniform(true))));
        assert_eq!(store.map_state().get_untracked(), AccessMapState::Loading);
    }

    #[test]
    fn load_failure_stays_loading() {
        let store = PermissionStore::new();
        let emp = id("e-1");
        store.begin(&emp);
        store.apply(&emp, Err(PortalError::Api(503)));
        assert_eq!(store.map_state().get_untracked(), AccessMapState::Loading);
    }
}
