use serde_json::{Map, Value};

/// 遞迴合併：object 對 object 逐鍵深入，其餘情況以 overlay 取代
pub fn deep_merge(target: &mut Value, overlay: &Value) {
    match (target, overlay) {
        (Value::Object(target_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match target_map.get_mut(key) {
                    Some(existing) => deep_merge(existing, overlay_value),
                    None => {
                        target_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (slot, other) => *slot = other.clone(),
    }
}

/// 結構相等：數字跨表示法比較（`1` 等於 `1.0`），
/// 陣列逐元素、object 比鍵集合與遞迴值
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(fx), Some(fy)) => fx == fy,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}

/// 巢狀結構攤平成點分隔路徑；陣列元素用數字片段。
/// 空的 object／array 保留為葉節點，不會遺失資料。
pub fn flatten(value: &Value) -> Map<String, Value> {
    let mut flat = Map::new();
    flatten_into(&mut flat, "", value);
    flat
}

fn flatten_into(flat: &mut Map<String, Value>, prefix: &str, value: &Value) {
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, child) in map {
                flatten_into(flat, &join_path(prefix, key), child);
            }
        }
        Value::Array(items) if !items.is_empty() => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(flat, &join_path(prefix, &index.to_string()), child);
            }
        }
        leaf => {
            flat.insert(prefix.to_string(), leaf.clone());
        }
    }
}

fn join_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}

/// `flatten` 的反函數：某一層的鍵恰好是連續整數 `0..n` 時重建為陣列，
/// 否則維持 object
pub fn unflatten(flat: &Map<String, Value>) -> Value {
    if flat.len() == 1 {
        // 純量根：flatten 用空字串當鍵
        if let Some(root) = flat.get("") {
            return root.clone();
        }
    }

    let mut root = Map::new();
    for (path, leaf) in flat {
        let segments: Vec<&str> = path.split('.').collect();
        insert_segments(&mut root, &segments, leaf);
    }
    rebuild_arrays(Value::Object(root))
}

fn insert_segments(node: &mut Map<String, Value>, segments: &[&str], leaf: &Value) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => return,
    };

    if rest.is_empty() {
        node.insert((*head).to_string(), leaf.clone());
        return;
    }

    let child = node
        .entry((*head).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child_map) = child {
        insert_segments(child_map, rest, leaf);
    }
}

fn rebuild_arrays(value: Value) -> Value {
    let map = match value {
        Value::Object(map) => map,
        other => return other,
    };

    let rebuilt: Map<String, Value> = map
        .into_iter()
        .map(|(key, child)| (key, rebuild_arrays(child)))
        .collect();

    if is_index_sequence(&rebuilt) {
        let mut items: Vec<(usize, Value)> = rebuilt
            .into_iter()
            .filter_map(|(key, child)| key.parse::<usize>().ok().map(|index| (index, child)))
            .collect();
        items.sort_unstable_by_key(|(index, _)| *index);
        Value::Array(items.into_iter().map(|(_, child)| child).collect())
    } else {
        Value::Object(rebuilt)
    }
}

fn is_index_sequence(map: &Map<String, Value>) -> bool {
    if map.is_empty() {
        return false;
    }

    let mut indices: Vec<usize> = Vec::with_capacity(map.len());
    for key in map.keys() {
        match key.parse::<usize>() {
            // 只接受正規的十進位表示（"01" 不算索引）
            Ok(index) if index.to_string() == *key => indices.push(index),
            _ => return false,
        }
    }
    indices.sort_unstable();
    indices.iter().copied().eq(0..map.len())
}

/// 以點分隔路徑讀取巢狀值；路徑走到純量或缺鍵時回傳 None
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(value);
    }

    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(current)
}

/// 以點分隔路徑寫入巢狀值，缺的容器自動建立：
/// 數字片段建陣列（空隙補 null），其餘建 object；路徑上的純量被取代
pub fn set_path(value: &mut Value, path: &str, new_value: Value) {
    if path.is_empty() {
        *value = new_value;
        return;
    }

    let segments: Vec<&str> = path.split('.').collect();
    set_segments(value, &segments, new_value);
}

fn set_segments(node: &mut Value, segments: &[&str], new_value: Value) {
    let (head, rest) = match segments.split_first() {
        Some(split) => split,
        None => {
            *node = new_value;
            return;
        }
    };

    match head.parse::<usize>() {
        Ok(index) => {
            if !node.is_array() {
                *node = Value::Array(Vec::new());
            }
            if let Value::Array(items) = node {
                while items.len() <= index {
                    items.push(Value::Null);
                }
                set_segments(&mut items[index], rest, new_value);
            }
        }
        Err(_) => {
            if !node.is_object() {
                *node = Value::Object(Map::new());
            }
            if let Value::Object(map) = node {
                let child = map.entry((*head).to_string()).or_insert(Value::Null);
                set_segments(child, rest, new_value);
            }
        }
    }
}
