use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use trellis_core::{
    Completion, Diagnostics, Hook, Host, HostError, Key, LifecycleHooks, NodeId, Revision, TimerId,
    Timers, TransitionPhase, View,
};
use web_time::Duration;

use crate::reconcile::{ChildAction, reconcile};

/// Deadline for a leave completion signal before a warning is emitted.
pub const DEFAULT_LEAVE_TIMEOUT: Duration = Duration::from_millis(5000);

/// Per-render transition settings.
#[derive(Clone, Debug)]
pub struct TransitionConfig {
    /// Marker prefix for named transitions. Mounted nodes carry a
    /// `{name}-enter` or `{name}-leave` class while transitioning, and the
    /// visual layer is expected to report back via
    /// [`TransitionGroup::transition_end`].
    pub name: Option<String>,
    pub enter: bool,
    pub leave: bool,
    pub timeout: Duration,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            name: None,
            enter: true,
            leave: true,
            timeout: DEFAULT_LEAVE_TIMEOUT,
        }
    }
}

impl TransitionConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn enter(mut self, enabled: bool) -> Self {
        self.enter = enabled;
        self
    }

    pub fn leave(mut self, enabled: bool) -> Self {
        self.leave = enabled;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// The child position of a render call.
///
/// `Absent` models a render that supplies no child expression at all; it
/// is distinct from an empty list, which states that membership is now
/// empty. Re-rendering a group to `Absent` while children are mounted is
/// a no-op, not a removal.
#[derive(Clone)]
pub enum ChildSet {
    Absent,
    Children(Vec<Option<View>>),
}

impl From<Vec<View>> for ChildSet {
    fn from(views: Vec<View>) -> Self {
        ChildSet::Children(views.into_iter().map(Some).collect())
    }
}

impl From<View> for ChildSet {
    fn from(view: View) -> Self {
        ChildSet::Children(vec![Some(view)])
    }
}

impl From<Option<View>> for ChildSet {
    fn from(view: Option<View>) -> Self {
        match view {
            Some(view) => view.into(),
            None => ChildSet::Absent,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionState {
    Present,
    Entering,
    Leaving,
    /// Leave finished; unmount is pending the end of the current render
    /// pass.
    Removed,
}

struct ChildEntry {
    id: u64,
    key: Key,
    node: NodeId,
    state: TransitionState,
    hooks: LifecycleHooks,
    /// At most one pending deadline per leaving child.
    deadline: Option<TimerId>,
    warned: bool,
}

struct GroupInner {
    host: Rc<RefCell<Host>>,
    container: NodeId,
    timers: Rc<dyn Timers>,
    diag: Rc<dyn Diagnostics>,
    entries: Vec<ChildEntry>,
    next_entry_id: u64,
    rendered_once: bool,
    /// Depth of in-flight render passes; unmount flushes wait for zero.
    render_depth: u32,
}

/// Orchestrates enter/leave lifecycles for the keyed children of one
/// container.
///
/// The group owns the container's child list: it mounts, reorders and
/// unmounts through the injected [`Host`], fires [`LifecycleHooks`] per
/// the child state machine, and keeps removed children mounted until
/// their leave completes or the deadline warns.
#[derive(Clone)]
pub struct TransitionGroup {
    inner: Rc<RefCell<GroupInner>>,
    revision: Revision,
}

impl TransitionGroup {
    pub fn new(
        host: Rc<RefCell<Host>>,
        container: NodeId,
        timers: Rc<dyn Timers>,
        diag: Rc<dyn Diagnostics>,
    ) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GroupInner {
                host,
                container,
                timers,
                diag,
                entries: Vec::new(),
                next_entry_id: 1,
                rendered_once: false,
                render_depth: 0,
            })),
            revision: Revision::new(),
        }
    }

    /// Bumped after every structural change; embedders observe it to know
    /// when to repaint.
    pub fn revision(&self) -> Revision {
        self.revision.clone()
    }

    /// Number of currently mounted child entries, leaving ones included.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    pub fn state_of(&self, key: &str) -> Option<TransitionState> {
        self.inner
            .borrow()
            .entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.state)
    }

    /// Applies a new render of the group's children.
    pub fn render(&self, config: &TransitionConfig, children: ChildSet) -> Result<(), HostError> {
        let next = match children {
            ChildSet::Absent => {
                // A missing child expression is not a removal: whatever is
                // mounted stays mounted, nothing fires.
                self.inner.borrow_mut().rendered_once = true;
                return Ok(());
            }
            ChildSet::Children(list) => normalize(list),
        };

        let first_render = {
            let mut inner = self.inner.borrow_mut();
            let first = !inner.rendered_once;
            inner.rendered_once = true;
            inner.render_depth += 1;
            first
        };
        let result = self.render_pass(config, next, first_render);
        self.inner.borrow_mut().render_depth -= 1;
        self.flush_unmounts();
        self.bump();
        result
    }

    /// External completion signal for the named transition on `key`, the
    /// transition-end analog. Ignored unless the key is currently entering
    /// or leaving.
    pub fn transition_end(&self, key: &str) {
        let found = {
            let inner = self.inner.borrow();
            inner
                .entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| (e.id, e.state))
        };
        match found {
            Some((id, TransitionState::Entering)) => self.complete_enter(id),
            Some((id, TransitionState::Leaving)) => self.complete_leave(id),
            _ => {}
        }
    }

    fn render_pass(
        &self,
        config: &TransitionConfig,
        next: Vec<(Key, View)>,
        first_render: bool,
    ) -> Result<(), HostError> {
        let (host, timers, container) = {
            let inner = self.inner.borrow();
            (inner.host.clone(), inner.timers.clone(), inner.container)
        };

        let merged = {
            let inner = self.inner.borrow();
            let prev_keys: Vec<Key> = inner.entries.iter().map(|e| e.key.clone()).collect();
            let next_keys: Vec<Key> = next.iter().map(|(k, _)| k.clone()).collect();
            reconcile(&prev_keys, &next_keys)
        };
        let mut views: HashMap<Key, View> = next.into_iter().collect();

        // Mount new children first, appended; the container is put into
        // merged order below.
        let mut mounted: HashMap<Key, (NodeId, LifecycleHooks)> = HashMap::new();
        let mut did_mounts: Vec<Hook> = Vec::new();
        for (key, action) in &merged {
            if *action != ChildAction::Enter {
                continue;
            }
            let Some(view) = views.remove(key) else {
                continue;
            };
            let index = host.borrow().child_count(container);
            let node = host.borrow_mut().mount(container, index, &view)?;
            let hooks = view.hooks.clone().unwrap_or_default();
            if let Some(hook) = hooks.did_mount.clone() {
                did_mounts.push(hook);
            }
            mounted.insert(key.clone(), (node, hooks));
        }

        // Kept children re-render in place, no hooks.
        for (key, action) in &merged {
            if *action != ChildAction::Keep {
                continue;
            }
            let Some(view) = views.remove(key) else {
                continue;
            };
            let hooks = view.hooks.clone().unwrap_or_default();
            let node = {
                let inner = self.inner.borrow();
                inner.entries.iter().find(|e| e.key == *key).map(|e| e.node)
            };
            if let Some(node) = node {
                host.borrow_mut().patch(node, &view)?;
                let mut inner = self.inner.borrow_mut();
                if let Some(entry) = inner.entries.iter_mut().find(|e| e.key == *key) {
                    entry.hooks = hooks;
                }
            }
        }

        // Rebuild the entry list in merged order.
        let mut newly_mounted: Vec<u64> = Vec::new();
        let mut newly_leaving: Vec<u64> = Vec::new();
        let order: Vec<NodeId> = {
            let mut inner = self.inner.borrow_mut();
            let mut old: HashMap<Key, ChildEntry> = std::mem::take(&mut inner.entries)
                .into_iter()
                .map(|e| (e.key.clone(), e))
                .collect();
            let mut rebuilt: Vec<ChildEntry> = Vec::with_capacity(merged.len());
            for (key, action) in &merged {
                match action {
                    ChildAction::Enter => {
                        let Some((node, hooks)) = mounted.remove(key) else {
                            continue;
                        };
                        let id = inner.next_entry_id;
                        inner.next_entry_id += 1;
                        newly_mounted.push(id);
                        rebuilt.push(ChildEntry {
                            id,
                            key: key.clone(),
                            node,
                            state: TransitionState::Present,
                            hooks,
                            deadline: None,
                            warned: false,
                        });
                    }
                    ChildAction::Keep | ChildAction::Leave => {
                        let Some(mut entry) = old.remove(key) else {
                            continue;
                        };
                        match action {
                            ChildAction::Keep if entry.state == TransitionState::Leaving => {
                                // The key came back: cancel the leave.
                                if let Some(timer) = entry.deadline.take() {
                                    timers.cancel(timer);
                                }
                                entry.warned = false;
                                entry.state = TransitionState::Present;
                                let _ = host.borrow_mut().set_transition_class(entry.node, None);
                            }
                            ChildAction::Leave if entry.state != TransitionState::Leaving => {
                                newly_leaving.push(entry.id);
                            }
                            _ => {}
                        }
                        rebuilt.push(entry);
                    }
                }
            }
            let order = rebuilt.iter().map(|e| e.node).collect();
            inner.entries = rebuilt;
            order
        };
        host.borrow_mut().reorder_children(container, &order)?;

        for hook in did_mounts {
            hook();
        }

        if !first_render && config.enter {
            for id in &newly_mounted {
                self.initiate_enter(*id, config);
            }
        }

        for id in &newly_leaving {
            if config.leave {
                self.initiate_leave(*id, config);
            } else {
                self.remove_immediately(*id);
            }
        }

        Ok(())
    }

    fn initiate_enter(&self, entry_id: u64, config: &TransitionConfig) {
        let (hook, immediate) = {
            let mut inner = self.inner.borrow_mut();
            let host = inner.host.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            inner.entries[idx].state = TransitionState::Entering;
            if let Some(name) = &config.name {
                let _ = host
                    .borrow_mut()
                    .set_transition_class(inner.entries[idx].node, Some(format!("{name}-enter")));
            }
            let hook = inner.entries[idx].hooks.will_enter.clone();
            let immediate = hook.is_none() && config.name.is_none();
            (hook, immediate)
        };
        if let Some(hook) = hook {
            hook(self.enter_completion(entry_id));
        } else if immediate {
            self.complete_enter(entry_id);
        }
    }

    fn initiate_leave(&self, entry_id: u64, config: &TransitionConfig) {
        let (hook, immediate) = {
            let mut inner = self.inner.borrow_mut();
            let host = inner.host.clone();
            let timers = inner.timers.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            if inner.entries[idx].state == TransitionState::Leaving {
                return;
            }
            inner.entries[idx].state = TransitionState::Leaving;
            inner.entries[idx].warned = false;
            if let Some(name) = &config.name {
                let _ = host
                    .borrow_mut()
                    .set_transition_class(inner.entries[idx].node, Some(format!("{name}-leave")));
            }
            let hook = inner.entries[idx].hooks.will_leave.clone();
            let immediate = hook.is_none() && config.name.is_none();
            if !immediate {
                let group = self.clone();
                let timeout = config.timeout;
                let timer = timers.schedule(
                    timeout,
                    Box::new(move || group.on_deadline(entry_id, timeout)),
                );
                inner.entries[idx].deadline = Some(timer);
            }
            (hook, immediate)
        };
        if let Some(hook) = hook {
            hook(self.leave_completion(entry_id));
        } else if immediate {
            self.complete_leave(entry_id);
        }
    }

    fn enter_completion(&self, entry_id: u64) -> Completion {
        let group = self.clone();
        Completion::new(TransitionPhase::Enter, move || {
            group.complete_enter(entry_id)
        })
    }

    fn leave_completion(&self, entry_id: u64) -> Completion {
        let group = self.clone();
        Completion::new(TransitionPhase::Leave, move || {
            group.complete_leave(entry_id)
        })
    }

    /// Stale signals (entry gone, or no longer entering) are ignored.
    fn complete_enter(&self, entry_id: u64) {
        let hook = {
            let mut inner = self.inner.borrow_mut();
            let host = inner.host.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            if inner.entries[idx].state != TransitionState::Entering {
                return;
            }
            inner.entries[idx].state = TransitionState::Present;
            let _ = host
                .borrow_mut()
                .set_transition_class(inner.entries[idx].node, None);
            inner.entries[idx].hooks.did_enter.clone()
        };
        if let Some(hook) = hook {
            hook();
        }
        self.bump();
    }

    fn complete_leave(&self, entry_id: u64) {
        let hook = {
            let mut inner = self.inner.borrow_mut();
            let timers = inner.timers.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            if inner.entries[idx].state != TransitionState::Leaving {
                return;
            }
            if let Some(timer) = inner.entries[idx].deadline.take() {
                timers.cancel(timer);
            }
            inner.entries[idx].state = TransitionState::Removed;
            inner.entries[idx].hooks.did_leave.clone()
        };
        if let Some(hook) = hook {
            hook();
        }
        self.flush_unmounts();
        self.bump();
    }

    /// Removal with the leave lifecycle disabled: no leave hooks, but the
    /// child is still told it is unmounting.
    fn remove_immediately(&self, entry_id: u64) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let timers = inner.timers.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            let mut entry = inner.entries.remove(idx);
            if let Some(timer) = entry.deadline.take() {
                timers.cancel(timer);
            }
            (entry, inner.host.clone())
        };
        let (entry, host) = removed;
        if let Some(hook) = entry.hooks.will_unmount.clone() {
            hook();
        }
        let _ = host.borrow_mut().unmount(entry.node);
    }

    /// Unmounts entries whose leave has completed. During a render pass
    /// this is deferred, so a batch removal fires every `will_leave` /
    /// `did_leave` pair before any `will_unmount`.
    fn flush_unmounts(&self) {
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                if inner.render_depth > 0 {
                    return;
                }
                let Some(idx) = inner
                    .entries
                    .iter()
                    .position(|e| e.state == TransitionState::Removed)
                else {
                    return;
                };
                let entry = inner.entries.remove(idx);
                (entry, inner.host.clone())
            };
            let (entry, host) = next;
            if let Some(hook) = entry.hooks.will_unmount.clone() {
                hook();
            }
            let _ = host.borrow_mut().unmount(entry.node);
        }
    }

    fn on_deadline(&self, entry_id: u64, timeout: Duration) {
        let warn = {
            let mut inner = self.inner.borrow_mut();
            let diag = inner.diag.clone();
            let Some(idx) = inner.entries.iter().position(|e| e.id == entry_id) else {
                return;
            };
            if inner.entries[idx].state != TransitionState::Leaving || inner.entries[idx].warned {
                return;
            }
            inner.entries[idx].deadline = None;
            inner.entries[idx].warned = true;
            let message = format!(
                "leave transition for key '{}' received no completion signal within {} ms; \
                 leaving the child mounted",
                inner.entries[idx].key,
                timeout.as_millis()
            );
            (diag, message)
        };
        let (diag, message) = warn;
        diag.warn(&message);
    }

    fn bump(&self) {
        self.revision.bump();
    }
}

/// Drops null entries and un-keyed or duplicate-keyed views from a child
/// list.
fn normalize(list: Vec<Option<View>>) -> Vec<(Key, View)> {
    let mut out: Vec<(Key, View)> = Vec::with_capacity(list.len());
    for view in list.into_iter().flatten() {
        let Some(key) = view.key.clone() else {
            log::warn!("transition group child without a key is ignored");
            continue;
        };
        if out.iter().any(|(k, _)| *k == key) {
            log::warn!("duplicate transition group key '{key}'; keeping the first");
            continue;
        }
        out.push((key, view));
    }
    out
}
