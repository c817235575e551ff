#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::completion::{Completion, TransitionPhase};
    use crate::diag::{CountingDiagnostics, Diagnostics};
    use crate::error::HostError;
    use crate::host::Host;
    use crate::revision::Revision;
    use crate::timer::{FrameTimers, ManualTimers, Timers};
    use crate::view::View;
    use web_time::Duration;

    #[test]
    fn test_mount_and_query() {
        let mut host = Host::new();
        let root = host.create_root();

        let one = host.mount(root, 0, &View::item("one").key("one")).unwrap();
        let two = host.mount(root, 1, &View::item("two").key("two")).unwrap();

        assert_eq!(host.child_count(root), 2);
        assert_eq!(host.child_at(root, 0), Some(one));
        assert_eq!(host.child_at(root, 1), Some(two));
        assert_eq!(host.ident(one), Some("one"));
        assert_eq!(host.key(two), Some("two"));
        assert_eq!(host.ident(root), None);
    }

    #[test]
    fn test_mount_subtree_and_unmount() {
        let mut host = Host::new();
        let root = host.create_root();

        let panel = host
            .mount(
                root,
                0,
                &View::panel().with_children(vec![View::label("hello"), View::item("leaf")]),
            )
            .unwrap();
        assert_eq!(host.child_count(panel), 2);
        let label = host.child_at(panel, 0).unwrap();
        assert_eq!(host.text(label), Some("hello"));

        host.unmount(panel).unwrap();
        assert_eq!(host.child_count(root), 0);
        assert!(!host.contains(panel));
        assert!(!host.contains(label));
        assert_eq!(host.unmount(panel), Err(HostError::UnknownNode(panel)));
    }

    #[test]
    fn test_mount_rejects_bad_targets() {
        let mut host = Host::new();
        let root = host.create_root();
        let leaf = host.mount(root, 0, &View::item("leaf")).unwrap();

        assert_eq!(
            host.mount(leaf, 0, &View::item("x")),
            Err(HostError::NotAContainer(leaf))
        );
        assert_eq!(
            host.mount(root, 5, &View::item("x")),
            Err(HostError::IndexOutOfBounds {
                parent: root,
                index: 5,
                len: 1
            })
        );
    }

    #[test]
    fn test_reorder_children() {
        let mut host = Host::new();
        let root = host.create_root();
        let a = host.mount(root, 0, &View::item("a")).unwrap();
        let b = host.mount(root, 1, &View::item("b")).unwrap();
        let c = host.mount(root, 2, &View::item("c")).unwrap();

        host.reorder_children(root, &[c, a, b]).unwrap();
        assert_eq!(host.child_at(root, 0), Some(c));
        assert_eq!(host.child_at(root, 1), Some(a));
        assert_eq!(host.child_at(root, 2), Some(b));

        assert_eq!(
            host.reorder_children(root, &[a, b]),
            Err(HostError::ReorderMismatch(root))
        );
        assert_eq!(
            host.reorder_children(root, &[a, b, b]),
            Err(HostError::ReorderMismatch(root))
        );
    }

    #[test]
    fn test_patch_in_place() {
        let mut host = Host::new();
        let root = host.create_root();
        let node = host.mount(root, 0, &View::item("before").key("k")).unwrap();

        host.patch(node, &View::item("after").key("k")).unwrap();
        assert_eq!(host.ident(node), Some("after"));
        assert_eq!(host.child_count(root), 1);
    }

    #[test]
    fn test_transition_class_marker() {
        let mut host = Host::new();
        let root = host.create_root();
        let node = host.mount(root, 0, &View::item("one")).unwrap();

        assert_eq!(host.transition_class(node), None);
        host.set_transition_class(node, Some("yolo-leave".into()))
            .unwrap();
        assert_eq!(host.transition_class(node), Some("yolo-leave"));
        host.set_transition_class(node, None).unwrap();
        assert_eq!(host.transition_class(node), None);
    }

    #[test]
    fn test_frame_timers_fire_in_deadline_order() {
        let timers = FrameTimers::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = order.clone();
        timers.schedule(
            Duration::from_millis(100),
            Box::new(move || o.borrow_mut().push("slow")),
        );
        let o = order.clone();
        timers.schedule(
            Duration::from_millis(50),
            Box::new(move || o.borrow_mut().push("fast")),
        );

        timers.advance(Duration::from_millis(60));
        assert_eq!(*order.borrow(), vec!["fast"]);
        assert_eq!(timers.pending_count(), 1);

        timers.advance(Duration::from_millis(60));
        assert_eq!(*order.borrow(), vec!["fast", "slow"]);
        assert_eq!(timers.pending_count(), 0);
    }

    #[test]
    fn test_frame_timers_cancel() {
        let timers = FrameTimers::new();
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        let id = timers.schedule(
            Duration::from_millis(10),
            Box::new(move || *f.borrow_mut() = true),
        );
        timers.cancel(id);
        timers.advance(Duration::from_millis(20));
        assert!(!*fired.borrow());

        // cancelling again is a no-op
        timers.cancel(id);
    }

    #[test]
    fn test_frame_timers_reschedule_during_fire() {
        let timers = Rc::new(FrameTimers::new());
        let fired = Rc::new(RefCell::new(0u32));

        let t = timers.clone();
        let f = fired.clone();
        timers.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                *f.borrow_mut() += 1;
                let f = f.clone();
                t.schedule(Duration::ZERO, Box::new(move || *f.borrow_mut() += 1));
            }),
        );

        // the rescheduled callback waits for the next advance
        timers.advance(Duration::from_millis(10));
        assert_eq!(*fired.borrow(), 1);
        timers.advance(Duration::ZERO);
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn test_frame_timers_tick_uses_elapsed_time() {
        let timers = FrameTimers::new();
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        timers.schedule(
            Duration::from_secs(3600),
            Box::new(move || *f.borrow_mut() = true),
        );
        // no meaningful wall-clock time has passed
        timers.tick();
        assert!(!*fired.borrow());
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn test_manual_timers_fire_by_delay() {
        let timers = ManualTimers::new();
        let fired = Rc::new(RefCell::new(Vec::new()));

        let f = fired.clone();
        timers.schedule(
            Duration::from_millis(5000),
            Box::new(move || f.borrow_mut().push(5000u64)),
        );
        let f = fired.clone();
        timers.schedule(
            Duration::from_millis(100),
            Box::new(move || f.borrow_mut().push(100u64)),
        );

        assert_eq!(timers.scheduled_total(), 2);
        assert!(timers.fire_first_with_delay(Duration::from_millis(5000)));
        assert_eq!(*fired.borrow(), vec![5000]);
        // consumed: the same deadline does not fire twice
        assert!(!timers.fire_first_with_delay(Duration::from_millis(5000)));
        assert_eq!(timers.pending_count(), 1);
    }

    #[test]
    fn test_manual_timers_cancel() {
        let timers = ManualTimers::new();
        let fired = Rc::new(RefCell::new(false));

        let f = fired.clone();
        let id = timers.schedule(
            Duration::from_millis(10),
            Box::new(move || *f.borrow_mut() = true),
        );
        timers.cancel(id);
        assert!(!timers.fire(id));
        assert!(!*fired.borrow());
        assert_eq!(timers.scheduled_total(), 1);
    }

    #[test]
    fn test_completion_runs_once_and_reports_its_phase() {
        let count = Rc::new(RefCell::new(0u32));
        let c = count.clone();
        let done = Completion::new(TransitionPhase::Leave, move || *c.borrow_mut() += 1);

        assert_eq!(done.phase(), TransitionPhase::Leave);
        assert!(!done.is_finished());
        done.finish();
        done.finish();
        assert_eq!(*count.borrow(), 1);
        assert!(done.is_finished());
    }

    #[test]
    fn test_revision_bump_and_observe() {
        let revision = Revision::new();
        assert_eq!(revision.current(), 0);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        revision.observe(move |r| s.borrow_mut().push(r));

        revision.bump();
        revision.bump();
        assert_eq!(revision.current(), 2);
        assert_eq!(*seen.borrow(), vec![1, 2]);

        // clones share the counter and the observers
        let handle = revision.clone();
        handle.bump();
        assert_eq!(revision.current(), 3);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_counting_diagnostics() {
        let diag = CountingDiagnostics::new();
        assert_eq!(diag.warning_count(), 0);

        diag.warn("first");
        diag.warn("second");
        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.messages(), vec!["first", "second"]);
    }
}
