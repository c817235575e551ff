use std::collections::HashMap;

use trellis_core::Key;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChildAction {
    /// Present in both renders.
    Keep,
    /// Present only in the new render.
    Enter,
    /// Present only in the previous render.
    Leave,
}

/// Diffs two keyed orderings into one merged ordering with an action per
/// key.
///
/// Keys present in both renders come out in the new render's order. A key
/// only in `prev` is emitted just before the first surviving key that
/// followed it in `prev`, or after every new key when nothing survived
/// behind it. Children added in the same render therefore precede stale
/// leaving ones.
pub fn reconcile(prev: &[Key], next: &[Key]) -> Vec<(Key, ChildAction)> {
    let next_index: HashMap<&str, usize> = next
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();
    let prev_index: HashMap<&str, usize> = prev
        .iter()
        .enumerate()
        .map(|(i, k)| (k.as_str(), i))
        .collect();

    // For each surviving prev key, the run of leaving keys just before it.
    let mut runs: HashMap<&str, Vec<&Key>> = HashMap::new();
    let mut pending: Vec<&Key> = Vec::new();
    for key in prev {
        if next_index.contains_key(key.as_str()) {
            if !pending.is_empty() {
                runs.insert(key.as_str(), std::mem::take(&mut pending));
            }
        } else {
            pending.push(key);
        }
    }

    let mut out = Vec::with_capacity(prev.len() + next.len());
    for key in next {
        if let Some(run) = runs.remove(key.as_str()) {
            for leaving in run {
                out.push((leaving.clone(), ChildAction::Leave));
            }
        }
        let action = if prev_index.contains_key(key.as_str()) {
            ChildAction::Keep
        } else {
            ChildAction::Enter
        };
        out.push((key.clone(), action));
    }
    for leaving in pending {
        out.push((leaving.clone(), ChildAction::Leave));
    }
    out
}
