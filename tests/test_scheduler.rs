use space_explorer::scheduler::Timers;

#[test]
fn fires_in_due_order() {
    let mut timers = Timers::new();
    timers.after(3.0, 'c');
    timers.after(1.0, 'a');
    timers.after(2.0, 'b');

    let fired: Vec<char> = timers.advance(5.0).into_iter().map(|f| f.label).collect();
    assert_eq!(fired, vec!['a', 'b', 'c']);
    assert!(timers.is_empty());
    assert_eq!(timers.now(), 5.0);
}

#[test]
fn equal_due_times_fire_in_scheduling_order() {
    let mut timers = Timers::new();
    for label in 0..5 {
        timers.after(1.0, label);
    }
    let fired: Vec<i32> = timers.advance(1.0).into_iter().map(|f| f.label).collect();
    assert_eq!(fired, vec![0, 1, 2, 3, 4]);
}

#[test]
fn nothing_fires_before_due() {
    let mut timers = Timers::new();
    timers.after(2.0, ());
    assert!(timers.advance(1.5).is_empty());
    assert_eq!(timers.len(), 1);
    assert_eq!(timers.advance(0.5).len(), 1);
}

#[test]
fn poll_moves_clock_to_due_time() {
    let mut timers = Timers::new();
    timers.after(1.0, "first");
    timers.after(4.0, "second");

    let task = timers.poll_until(10.0).expect("first task is due");
    assert_eq!(task.label, "first");
    assert_eq!(timers.now(), 1.0);

    // Re-arming is relative to the firing instant, not the horizon
    let id = timers.after(1.0, "rearmed");
    assert_eq!(timers.remaining(id), Some(1.0));

    let next = timers.poll_until(10.0).expect("rearmed task is due");
    assert_eq!(next.label, "rearmed");
    assert_eq!(next.due, 2.0);
}

#[test]
fn negative_delay_fires_immediately() {
    let mut timers = Timers::new();
    timers.advance(3.0);
    let id = timers.after(-1.0, ());
    assert_eq!(timers.remaining(id), Some(0.0));
    let fired = timers.advance(0.0);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].due, 3.0);
}

#[test]
fn cancel_removes_single_task() {
    let mut timers = Timers::new();
    let keep = timers.after(1.0, "keep");
    let dropped = timers.after(1.0, "drop");

    assert!(timers.cancel(dropped));
    assert!(!timers.cancel(dropped));
    assert!(!timers.is_pending(dropped));
    assert!(timers.is_pending(keep));
    assert_eq!(timers.remaining(dropped), None);

    let fired: Vec<&str> = timers.advance(1.0).into_iter().map(|f| f.label).collect();
    assert_eq!(fired, vec!["keep"]);
}

#[test]
fn cancel_all_drops_everything() {
    let mut timers = Timers::new();
    for i in 0..4 {
        timers.after(i as f64, i);
    }
    assert_eq!(timers.cancel_all(), 4);
    assert!(timers.is_empty());
    assert!(timers.advance(100.0).is_empty());
}

#[test]
fn remaining_counts_down() {
    let mut timers = Timers::new();
    let id = timers.after(2.0, ());
    timers.advance(0.5);
    assert_eq!(timers.remaining(id), Some(1.5));
}

#[test]
fn periodic_loop_keeps_its_cadence() {
    let mut timers = Timers::new();
    timers.after(2.0, ());

    // Uneven frame steps must not shift the 2 s cadence
    let mut fired_at = Vec::new();
    for dt in [0.75, 1.5, 0.25, 3.0, 0.5] {
        let horizon = timers.now() + dt;
        while let Some(task) = timers.poll_until(horizon) {
            fired_at.push(task.due);
            timers.after(2.0, ());
        }
        timers.settle(horizon);
    }
    assert_eq!(fired_at, vec![2.0, 4.0, 6.0]);
}
