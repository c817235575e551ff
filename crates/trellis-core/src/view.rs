use std::rc::Rc;

use crate::Completion;

/// Stable identity of a child across renders.
pub type Key = String;

pub type Hook = Rc<dyn Fn()>;
pub type TransitionHook = Rc<dyn Fn(Completion)>;

#[derive(Clone, Debug)]
pub enum ViewKind {
    /// Container; the only kind that accepts children.
    Panel,
    /// Leaf carrying an identifying attribute.
    Item { ident: String },
    Label { text: String },
}

/// Optional lifecycle capabilities a child view may carry.
///
/// Every member is absent by default and checked before invocation.
/// `will_enter` and `will_leave` receive a [`Completion`] the child fires
/// when its transition has finished; the other hooks are plain
/// notifications.
#[derive(Clone, Default)]
pub struct LifecycleHooks {
    pub did_mount: Option<Hook>,
    pub will_enter: Option<TransitionHook>,
    pub did_enter: Option<Hook>,
    pub will_leave: Option<TransitionHook>,
    pub did_leave: Option<Hook>,
    pub will_unmount: Option<Hook>,
}

impl std::fmt::Debug for LifecycleHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleHooks")
            .field("did_mount", &self.did_mount.is_some())
            .field("will_enter", &self.will_enter.is_some())
            .field("did_enter", &self.did_enter.is_some())
            .field("will_leave", &self.will_leave.is_some())
            .field("did_leave", &self.did_leave.is_some())
            .field("will_unmount", &self.will_unmount.is_some())
            .finish()
    }
}

/// Tree description handed to [`crate::Host::mount`].
#[derive(Clone, Debug)]
pub struct View {
    pub key: Option<Key>,
    pub kind: ViewKind,
    pub hooks: Option<LifecycleHooks>,
    pub children: Vec<View>,
}

impl View {
    pub fn new(kind: ViewKind) -> Self {
        View {
            key: None,
            kind,
            hooks: None,
            children: vec![],
        }
    }

    pub fn panel() -> Self {
        View::new(ViewKind::Panel)
    }

    pub fn item(ident: impl Into<String>) -> Self {
        View::new(ViewKind::Item {
            ident: ident.into(),
        })
    }

    pub fn label(text: impl Into<String>) -> Self {
        View::new(ViewKind::Label { text: text.into() })
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn hooks(mut self, hooks: LifecycleHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_children(mut self, kids: Vec<View>) -> Self {
        self.children = kids;
        self
    }
}
