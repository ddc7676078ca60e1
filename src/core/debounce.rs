use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

struct PendingCall<A> {
    handle: JoinHandle<()>,
    last_arg: A,
}

/// 尾緣防抖：每次 `call` 取消並重排唯一的待定計時器，
/// 安靜期過後以最後一個參數呼叫 action 恰好一次。
///
/// 必須在 tokio runtime 內使用（計時器透過 `tokio::spawn` 排程）。
/// 不保證已經開始執行中的 action 會被攔下。
pub struct Debouncer<A> {
    delay: Duration,
    action: Arc<dyn Fn(A) + Send + Sync>,
    pending: Option<PendingCall<A>>,
}

impl<A> Debouncer<A>
where
    A: Clone + Send + 'static,
{
    pub fn new(delay: Duration, action: impl Fn(A) + Send + Sync + 'static) -> Self {
        Self {
            delay,
            action: Arc::new(action),
            pending: None,
        }
    }

    /// 取消既有計時器並以這個參數重新排程
    pub fn call(&mut self, arg: A) {
        self.clear_timer();

        let action = Arc::clone(&self.action);
        let delay = self.delay;
        let task_arg = arg.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action(task_arg);
        });

        tracing::debug!("⏲️ debounce armed for {:?}", delay);
        self.pending = Some(PendingCall {
            handle,
            last_arg: arg,
        });
    }

    /// 清除待定計時器，抑制尚未發生的呼叫
    pub fn cancel(&mut self) {
        self.clear_timer();
    }

    /// 立即以最後一個參數觸發待定的呼叫；沒有待定呼叫時不做事
    pub fn flush(&mut self) {
        if let Some(pending) = self.pending.take() {
            if pending.handle.is_finished() {
                return;
            }
            pending.handle.abort();
            (self.action)(pending.last_arg);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map(|pending| !pending.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    fn clear_timer(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}

impl<A> Drop for Debouncer<A> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }
}
