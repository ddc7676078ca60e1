use crate::config::scenario::ScenarioConfig;
use crate::core::collections::{group_by, unique};
use crate::core::emitter::EventEmitter;
use crate::core::json::deep_merge;
use crate::domain::model::{Event, ScenarioReport};
use crate::domain::ports::Scenario;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// 事件廣播場景：對每個事件名稱掛常駐監聽器，第一個名稱再掛一個
/// 一次性監聽器與一個馬上移除的監聽器，然後依序廣播配置的事件
pub struct EmitterFanoutScenario {
    events: Vec<Event>,
}

impl EmitterFanoutScenario {
    pub fn new(config: &ScenarioConfig) -> Self {
        let mut events: Vec<Event> = config
            .event_specs()
            .iter()
            .map(|spec| {
                Event::new(
                    spec.name.clone(),
                    spec.payload
                        .clone()
                        .unwrap_or_else(|| serde_json::json!({})),
                )
            })
            .collect();
        if events.is_empty() {
            events = Self::default_events();
        }
        Self { events }
    }

    /// 配置沒給事件時的示範組
    fn default_events() -> Vec<Event> {
        vec![
            Event::new("user.login", serde_json::json!({"user": "amy"})),
            Event::new("user.login", serde_json::json!({"user": "ben"})),
            Event::new("cache.evict", serde_json::json!({})),
        ]
    }
}

#[async_trait]
impl Scenario for EmitterFanoutScenario {
    fn name(&self) -> &str {
        "emitter-fanout"
    }

    async fn run(&self) -> Result<ScenarioReport> {
        let mut emitter = EventEmitter::new();

        let names: Vec<String> = self.events.iter().map(|event| event.name.clone()).collect();
        let distinct = unique(&names);

        let observed = Arc::new(AtomicU32::new(0));
        for name in &distinct {
            let counter = Arc::clone(&observed);
            emitter.on(name, move |_payload| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }

        let once_hits = Arc::new(AtomicU32::new(0));
        let first_name = match distinct.first() {
            Some(name) => name.clone(),
            None => {
                return Ok(ScenarioReport::new(self.name()));
            }
        };
        let once_counter = Arc::clone(&once_hits);
        emitter.once(&first_name, move |_payload| {
            once_counter.fetch_add(1, Ordering::SeqCst);
        });

        // 掛上去又立刻拆掉，廣播時不該收到任何東西
        let muted = emitter.on(&first_name, |_payload| {});
        let removed = emitter.off(&first_name, muted);

        tracing::info!(
            "📣 broadcasting {} event(s) across {} channel(s)",
            self.events.len(),
            distinct.len()
        );

        let mut deliveries = 0usize;
        for (sequence, event) in self.events.iter().enumerate() {
            let mut payload = serde_json::json!({
                "source": "workbench",
                "sequence": sequence,
            });
            deep_merge(&mut payload, &event.payload);
            deliveries += emitter.emit(&event.name, &payload);
        }

        let per_event: Vec<serde_json::Value> = group_by(&names, |name| name.clone())
            .into_iter()
            .map(|(name, hits)| serde_json::json!({"event": name, "emits": hits.len()}))
            .collect();

        tracing::info!(
            "📊 {} delivery(ies), once listener fired {} time(s)",
            deliveries,
            once_hits.load(Ordering::SeqCst)
        );

        let mut report = ScenarioReport::new(self.name());
        report.insert_detail("events_emitted", serde_json::json!(self.events.len()));
        report.insert_detail("distinct_events", serde_json::json!(distinct.len()));
        report.insert_detail("deliveries", serde_json::json!(deliveries));
        report.insert_detail(
            "observed_by_listeners",
            serde_json::json!(observed.load(Ordering::SeqCst)),
        );
        report.insert_detail(
            "once_fired",
            serde_json::json!(once_hits.load(Ordering::SeqCst)),
        );
        report.insert_detail("muted_listener_removed", serde_json::json!(removed));
        report.insert_detail("per_event", serde_json::Value::Array(per_event));
        Ok(report)
    }
}
