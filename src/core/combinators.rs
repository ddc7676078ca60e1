use crate::domain::model::{AggregateError, Settled};
use crate::utils::error::KitError;
use futures::future::{join_all, select_all};
use futures::stream::{self, StreamExt};
use std::future::Future;
use tokio::time::Duration;

/// 超時競速：在 `limit` 內完成就回傳結果，否則回傳 `TimeoutError`。
/// 超時後剩餘的工作直接丟棄（取消即 drop）。
pub async fn with_timeout<F>(limit: Duration, future: F) -> crate::utils::error::Result<F::Output>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| KitError::TimeoutError {
            limit_ms: limit.as_millis() as u64,
        })
}

/// 第一個成功者勝出，其餘工作丟棄；全部失敗時以輸入順序聚合所有錯誤。
/// 空輸入立即回傳空的聚合錯誤。
pub async fn race_any<T, E, F>(futures: Vec<F>) -> std::result::Result<T, AggregateError<E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    if futures.is_empty() {
        return Err(AggregateError::empty());
    }

    let mut racing: Vec<_> = futures
        .into_iter()
        .enumerate()
        .map(|(index, future)| Box::pin(async move { (index, future.await) }))
        .collect();

    let mut failures: Vec<(usize, E)> = Vec::with_capacity(racing.len());
    while !racing.is_empty() {
        let ((index, outcome), _, remaining) = select_all(racing).await;
        match outcome {
            Ok(value) => return Ok(value),
            Err(error) => failures.push((index, error)),
        }
        racing = remaining;
    }

    failures.sort_by_key(|(index, _)| *index);
    Err(AggregateError::new(
        failures.into_iter().map(|(_, error)| error).collect(),
    ))
}

/// 驅動所有 future 到完成並依輸入順序回報每個結果，永不短路
pub async fn all_settled<T, E, F>(futures: Vec<F>) -> Vec<Settled<T, E>>
where
    F: Future<Output = std::result::Result<T, E>>,
{
    join_all(futures.into_iter().map(|future| async move {
        match future.await {
            Ok(value) => Settled::Fulfilled(value),
            Err(error) => Settled::Rejected(error),
        }
    }))
    .await
}

/// 有並發上限的 map：同時最多 `limit` 個 future 在飛行中，
/// 結果依輸入順序排列，第一個錯誤出現即中止（fail-fast）。
/// `limit == 0` 視為 1。
pub async fn map_concurrent<I, T, E, F, Fut>(
    limit: usize,
    items: I,
    f: F,
) -> std::result::Result<Vec<T>, E>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let limit = limit.max(1);
    let tagged: Vec<_> = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let future = f(item);
            async move { (index, future.await) }
        })
        .collect();

    let total = tagged.len();
    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();
    let mut in_flight = stream::iter(tagged).buffer_unordered(limit);

    while let Some((index, outcome)) = in_flight.next().await {
        slots[index] = Some(outcome?);
    }

    Ok(slots.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_race_any_empty_input_rejects_immediately() {
        let futures: Vec<std::future::Ready<Result<i32, String>>> = Vec::new();
        let error = race_any(futures).await.unwrap_err();
        assert!(error.is_empty());
        assert_eq!(error.to_string(), "no futures to race");
    }

    #[tokio::test]
    async fn test_map_concurrent_empty_input() {
        let mapped =
            map_concurrent(4, Vec::<u32>::new(), |n| async move { Ok::<_, String>(n) }).await;
        assert_eq!(mapped, Ok(Vec::new()));
    }
}
