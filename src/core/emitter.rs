use serde_json::Value;
use std::collections::HashMap;

/// 監聽器註冊的識別碼，用於 `off`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Registration {
    id: ListenerId,
    callback: Box<dyn FnMut(&Value) + Send>,
    once: bool,
}

/// 同步事件發射器：監聽器依事件名稱分組，emit 時按註冊順序呼叫。
///
/// `emit` 需要 `&mut self`，監聽器因此無法重入同一個發射器；
/// 監聽器內的 panic 不會被攔截。
pub struct EventEmitter {
    channels: HashMap<String, Vec<Registration>>,
    next_id: u64,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self {
            channels: HashMap::new(),
            next_id: 0,
        }
    }

    /// 註冊監聽器，emit 時依註冊順序呼叫
    pub fn on(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&Value) + Send + 'static,
    ) -> ListenerId {
        self.register(event.into(), Box::new(listener), false)
    }

    /// 註冊一次性監聽器：第一次呼叫後即移除
    pub fn once(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&Value) + Send + 'static,
    ) -> ListenerId {
        self.register(event.into(), Box::new(listener), true)
    }

    fn register(
        &mut self,
        event: String,
        callback: Box<dyn FnMut(&Value) + Send>,
        once: bool,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.channels.entry(event).or_default().push(Registration {
            id,
            callback,
            once,
        });
        id
    }

    /// 移除一筆註冊；找不到時回傳 false
    pub fn off(&mut self, event: &str, id: ListenerId) -> bool {
        let registrations = match self.channels.get_mut(event) {
            Some(registrations) => registrations,
            None => return false,
        };
        let before = registrations.len();
        registrations.retain(|registration| registration.id != id);
        let removed = registrations.len() != before;
        if registrations.is_empty() {
            self.channels.remove(event);
        }
        removed
    }

    /// 依註冊順序呼叫該事件的所有監聽器，回傳被呼叫的數量。
    /// 一次性監聽器在 emit 結束後移除。
    pub fn emit(&mut self, event: &str, payload: &Value) -> usize {
        let registrations = match self.channels.get_mut(event) {
            Some(registrations) => registrations,
            None => return 0,
        };

        let mut fired = 0;
        for registration in registrations.iter_mut() {
            (registration.callback)(payload);
            fired += 1;
        }

        registrations.retain(|registration| !registration.once);
        if registrations.is_empty() {
            self.channels.remove(event);
        }

        tracing::debug!("📣 emit '{}' reached {} listeners", event, fired);
        fired
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.channels
            .get(event)
            .map(|registrations| registrations.len())
            .unwrap_or(0)
    }

    /// 目前仍有監聽器的事件名稱
    pub fn event_names(&self) -> Vec<&str> {
        self.channels.keys().map(|name| name.as_str()).collect()
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new()
    }
}
