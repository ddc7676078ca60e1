use tokio::time::{Duration, Instant};

/// 前緣節流：`call` 立即執行 action 並開啟抑制窗口，
/// 窗口內的呼叫被丟棄（回傳 false）。無排隊、無尾緣呼叫。
pub struct Throttler<A> {
    interval: Duration,
    action: Box<dyn FnMut(A) + Send>,
    window_until: Option<Instant>,
}

impl<A> Throttler<A> {
    pub fn new(interval: Duration, action: impl FnMut(A) + Send + 'static) -> Self {
        Self {
            interval,
            action: Box::new(action),
            window_until: None,
        }
    }

    /// 窗口開著就執行 action 並回傳 true；抑制中回傳 false
    pub fn call(&mut self, arg: A) -> bool {
        let now = Instant::now();
        if let Some(until) = self.window_until {
            if now < until {
                tracing::debug!("🚫 throttled call dropped");
                return false;
            }
        }

        (self.action)(arg);
        self.window_until = Some(now + self.interval);
        true
    }

    /// 清除抑制窗口，下一次呼叫立即觸發
    pub fn cancel(&mut self) {
        self.window_until = None;
    }

    /// 現在呼叫是否會觸發 action
    pub fn is_open(&self) -> bool {
        match self.window_until {
            Some(until) => Instant::now() >= until,
            None => true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
