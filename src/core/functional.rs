use std::collections::HashMap;
use std::hash::Hash;

/// 值導向串接：`value.pipe(f).pipe(g)` 由左到右把值餵進下一個函數
pub trait Pipe: Sized {
    fn pipe<U, F>(self, f: F) -> U
    where
        F: FnOnce(Self) -> U,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

/// 右到左合成：`compose(f, g)(x)` 等於 `f(g(x))`
pub fn compose<A, B, C, F, G>(f: F, g: G) -> impl Fn(A) -> C
where
    F: Fn(B) -> C,
    G: Fn(A) -> B,
{
    move |input| f(g(input))
}

/// 純函數的快取包裝：同一個鍵只會真正計算一次，之後直接回放
pub struct Memoized<K, V, F> {
    function: F,
    cache: HashMap<K, V>,
    invocations: usize,
}

impl<K, V, F> Memoized<K, V, F>
where
    K: Clone + Eq + Hash,
    V: Clone,
    F: FnMut(&K) -> V,
{
    pub fn new(function: F) -> Self {
        Self {
            function,
            cache: HashMap::new(),
            invocations: 0,
        }
    }

    pub fn call(&mut self, key: K) -> V {
        match self.cache.get(&key) {
            Some(cached) => cached.clone(),
            None => {
                self.invocations += 1;
                let value = (self.function)(&key);
                self.cache.insert(key, value.clone());
                value
            }
        }
    }

    /// 實際執行被包裝函數的次數
    pub fn invocations(&self) -> usize {
        self.invocations
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

/// 最多執行一次的包裝：第一次呼叫執行函數並記住結果，之後回放同一個結果
pub struct CallOnce<F, R> {
    function: Option<F>,
    result: Option<R>,
}

impl<F, R> CallOnce<F, R>
where
    F: FnOnce() -> R,
    R: Clone,
{
    pub fn new(function: F) -> Self {
        Self {
            function: Some(function),
            result: None,
        }
    }

    pub fn call(&mut self) -> R {
        if let Some(result) = &self.result {
            return result.clone();
        }

        // result 為空時 function 必定還在；被包函數 panic 後再呼叫視為程式錯誤
        let function = match self.function.take() {
            Some(function) => function,
            None => unreachable!("call_once: function consumed without a stored result"),
        };
        let result = function();
        self.result = Some(result.clone());
        result
    }

    pub fn has_run(&self) -> bool {
        self.result.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_pipe_threads_values_left_to_right() {
        let result = 5.pipe(|n| n * 2).pipe(|n| n + 1).pipe(|n| format!("={n}"));
        assert_eq!(result, "=11");
    }

    #[test]
    fn test_compose_applies_right_to_left() {
        let double = |n: i32| n * 2;
        let add_three = |n: i32| n + 3;

        let composed = compose(double, add_three);
        assert_eq!(composed(4), 14);
        assert_eq!(compose(add_three, double)(4), 11);
    }

    #[test]
    fn test_memoized_collapses_calls_per_key() {
        let mut squares = Memoized::new(|n: &u64| n * n);

        assert_eq!(squares.call(3), 9);
        assert_eq!(squares.call(3), 9);
        assert_eq!(squares.call(4), 16);

        assert_eq!(squares.invocations(), 2);
        assert_eq!(squares.cached_len(), 2);
    }

    #[test]
    fn test_memoized_clear_forgets_cached_keys() {
        let mut lengths = Memoized::new(|s: &String| s.len());

        lengths.call("hello".to_string());
        lengths.clear();
        lengths.call("hello".to_string());

        assert_eq!(lengths.invocations(), 2);
    }

    #[test]
    fn test_call_once_runs_exactly_once_and_replays() {
        let counter = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&counter);
        let mut boot = CallOnce::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
            42
        });

        assert!(!boot.has_run());
        assert_eq!(boot.call(), 42);
        assert_eq!(boot.call(), 42);
        assert!(boot.has_run());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
