//! WebSocket 封装模块
//!
//! 一个连接对应一个 `EventSocket` 实例；drop 时注销回调并关闭连接，
//! 与组件卸载的清理语义对齐。

use crate::error::PortalError;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

/// 事件订阅 Socket
///
/// 仅处理文本帧；二进制帧直接忽略。
pub struct EventSocket {
    ws: WebSocket,
    #[allow(dead_code)]
    onmessage: Closure<dyn Fn(MessageEvent)>,
}

impl EventSocket {
    /// 打开连接并注册文本帧回调
    pub fn connect<F>(url: &str, on_text: F) -> Result<Self, PortalError>
    where
        F: Fn(String) + 'static,
    {
        let ws = WebSocket::new(url)
            .map_err(|e| PortalError::Socket(format!("{:?}", e)))?;

        let onmessage = Closure::<dyn Fn(MessageEvent)>::new(move |ev: MessageEvent| {
            if let Some(text) = ev.data().as_string() {
                on_text(text);
            }
        });
        ws.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));

        Ok(Self { ws, onmessage })
    }
}

impl Drop for EventSocket {
    fn drop(&mut self) {
        self.ws.set_onmessage(None);
        let _ = self.ws.close();
    }
}

/// 基于当前页面地址推导 Socket 入口
///
/// `https://` 页面使用 `wss://`，其余使用 `ws://`。
pub fn default_socket_url(path: &str) -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Some(format!("{}://{}{}", scheme, host, path))
}
