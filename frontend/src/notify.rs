//! 通知桥模块
//!
//! 把服务端推送的自动化事件投影成本地 toast：规则名 + 可选的商机名
//! + 可选的 (pipeline, étape) 组合拼成一句法文，按 `success` 标志选择
//! 成功或警告样式，固定展示 6 秒。
//!
//! 没有队列、没有去重：事件到达即渲染，重复与乱序原样呈现。

use crate::error::PortalError;
use leptos::logging;
use leptos::prelude::*;
use portalis_shared::EVENT_AUTOMATION_TRIGGERED;
use portalis_shared::protocol::{AutomationEvent, SocketEnvelope};
use std::cell::Cell;
use std::rc::Rc;

/// toast 固定展示时长（毫秒）
pub const TOAST_DURATION_MS: u32 = 6000;

/// 自动化事件的 Socket 路径
pub const SOCKET_PATH: &str = "/ws/automations";

/// toast 视觉级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
}

/// 一条待展示的 toast
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub message: String,
    pub level: ToastLevel,
    pub duration_ms: u32,
}

/// 事件文案：事件载荷到一句自然语言的纯投影
pub fn format_message(event: &AutomationEvent) -> String {
    let mut message = format!("Automatisation \"{}\" déclenchée", event.rule_name);
    if let Some(opportunity) = &event.opportunity_name {
        message.push_str(&format!(" pour l'opportunité \"{}\"", opportunity));
    }
    if let (Some(pipeline), Some(stage)) = (&event.pipeline_name, &event.stage_name) {
        message.push_str(&format!(" (pipeline \"{}\", étape \"{}\")", pipeline, stage));
    }
    message
}

/// toast 列表存储
#[derive(Clone)]
pub struct ToastStore {
    toasts: ReadSignal<Vec<Toast>>,
    set_toasts: WriteSignal<Vec<Toast>>,
    next_id: Rc<Cell<u64>>,
}

impl ToastStore {
    pub fn new() -> Self {
        let (toasts, set_toasts) = signal(Vec::new());
        Self {
            toasts,
            set_toasts,
            next_id: Rc::new(Cell::new(0)),
        }
    }

    pub fn toasts(&self) -> ReadSignal<Vec<Toast>> {
        self.toasts
    }

    pub fn push(&self, message: String, level: ToastLevel) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let toast = Toast {
            id,
            message,
            level,
            duration_ms: TOAST_DURATION_MS,
        };
        self.set_toasts.update(|toasts| toasts.push(toast));
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.set_toasts.update(|toasts| toasts.retain(|t| t.id != id));
    }
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 从 Context 获取 toast 存储
pub fn use_toasts() -> ToastStore {
    use_context::<send_wrapper::SendWrapper<ToastStore>>()
        .expect("ToastStore should be provided")
        .take()
}

/// 通知桥：Socket 帧 -> toast
#[derive(Clone)]
pub struct NotificationBridge {
    toasts: ToastStore,
}

impl NotificationBridge {
    pub fn new(toasts: ToastStore) -> Self {
        Self { toasts }
    }

    /// 渲染一个事件（至多一次，随到随渲）
    pub fn handle_event(&self, event: &AutomationEvent) {
        let level = if event.success {
            ToastLevel::Success
        } else {
            ToastLevel::Warning
        };
        logging::log!(
            "[Notify] règle {} reçue à {}",
            event.rule_id,
            event.timestamp.to_rfc3339().unwrap_or_default()
        );
        self.toasts.push(format_message(event), level);
    }

    /// 解析并处理一帧文本；无法解码或事件名不符的帧丢弃
    pub fn handle_frame(&self, raw: &str) -> Result<(), PortalError> {
        let envelope: SocketEnvelope =
            serde_json_wasm::from_str(raw).map_err(|e| PortalError::Parse(e.to_string()))?;
        if envelope.event != EVENT_AUTOMATION_TRIGGERED {
            return Err(PortalError::Parse(format!(
                "événement inattendu: {}",
                envelope.event
            )));
        }
        self.handle_event(&envelope.payload);
        Ok(())
    }
}

/// 自动化事件监听组件
///
/// 挂载时打开唯一一条 Socket 订阅，卸载时随清理回调关闭。
/// 连接失败不致命：记录日志后页面照常工作，只是收不到通知。
#[component]
pub fn AutomationListener() -> impl IntoView {
    let bridge = NotificationBridge::new(use_toasts());

    match crate::web::default_socket_url(SOCKET_PATH) {
        Some(url) => match crate::web::EventSocket::connect(&url, move |raw| {
            if let Err(e) = bridge.handle_frame(&raw) {
                logging::warn!("[Notify] trame ignorée: {}", e);
            }
        }) {
            Ok(socket) => {
                let socket = send_wrapper::SendWrapper::new(socket);
                on_cleanup(move || drop(socket))
            }
            Err(e) => logging::error!("[Notify] {}", e),
        },
        None => logging::error!("[Notify] adresse socket indisponible"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portalis_shared::date::Timestamp;

    fn event(rule_name: &str, success: bool) -> AutomationEvent {
        AutomationEvent {
            rule_id: "r1".into(),
            rule_name: rule_name.into(),
            trigger_event: "opportunity_won".into(),
            success,
            opportunity_name: None,
            pipeline_name: None,
            stage_name: None,
            timestamp: Timestamp::new(1_700_000_000_000),
        }
    }

    #[test]
    fn bare_event_renders_exact_sentence() {
        let ev = event("Welcome Email", true);
        assert_eq!(
            format_message(&ev),
            "Automatisation \"Welcome Email\" déclenchée"
        );
    }

    #[test]
    fn opportunity_then_pipeline_stage_in_documented_order() {
        let mut ev = event("Relance devis", true);
        ev.opportunity_name = Some("Chantier Dupont".into());
        ev.pipeline_name = Some("Ventes".into());
        ev.stage_name = Some("Négociation".into());
        assert_eq!(
            format_message(&ev),
            "Automatisation \"Relance devis\" déclenchée \
             pour l'opportunité \"Chantier Dupont\" \
             (pipeline \"Ventes\", étape \"Négociation\")"
        );
    }

    #[test]
    fn pipeline_without_stage_is_omitted() {
        let mut ev = event("Relance devis", true);
        ev.pipeline_name = Some("Ventes".into());
        assert_eq!(
            format_message(&ev),
            "Automatisation \"Relance devis\" déclenchée"
        );
    }

    #[test]
    fn success_flag_selects_visual_treatment() {
        let toasts = ToastStore::new();
        let bridge = NotificationBridge::new(toasts.clone());

        bridge.handle_event(&event("A", true));
        bridge.handle_event(&event("B", false));

        let rendered = toasts.toasts().get_untracked();
        assert_eq!(rendered[0].level, ToastLevel::Success);
        assert_eq!(rendered[1].level, ToastLevel::Warning);
        assert!(rendered.iter().all(|t| t.duration_ms == TOAST_DURATION_MS));
    }

    #[test]
    fn duplicate_delivery_is_not_deduplicated() {
        let toasts = ToastStore::new();
        let bridge = NotificationBridge::new(toasts.clone());
        let ev = event("Doublon", true);

        bridge.handle_event(&ev);
        bridge.handle_event(&ev);

        // 既定缺口：同一事件到两次就渲染两次
        assert_eq!(toasts.toasts().get_untracked().len(), 2);
    }

    #[test]
    fn frames_round_trip_through_the_bridge() {
        let toasts = ToastStore::new();
        let bridge = NotificationBridge::new(toasts.clone());

        let raw = r#"{
            "event": "automation-triggered",
            "payload": {
                "rule_id": "r9",
                "rule_name": "Welcome Email",
                "trigger_event": "contact_created",
                "success": true,
                "timestamp": 1700000000000
            }
        }"#;
        bridge.handle_frame(raw).unwrap();

        let rendered = toasts.toasts().get_untracked();
        assert_eq!(
            rendered[0].message,
            "Automatisation \"Welcome Email\" déclenchée"
        );
    }

    #[test]
    fn garbage_frames_are_dropped_without_toast() {
        let toasts = ToastStore::new();
        let bridge = NotificationBridge::new(toasts.clone());

        assert!(bridge.handle_frame("{').unwrap").is_err());
        assert!(bridge.handle_frame(r#"{"event":"inconnu","payload":{}}"#).is_err());
        assert!(toasts.toasts().get_untracked().is_empty());
    }

    #[test]
    fn dismiss_removes_only_the_target() {
        let toasts = ToastStore::new();
        let first = toasts.push("un".into(), ToastLevel::Success);
        let second = toasts.push("deux".into(), ToastLevel::Warning);

        toasts.dismiss(first);

        let rendered = toasts.toasts().get_untracked();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].id, second);
    }
}
