use super::*;

fn numbers(count: u32) -> Rc<[u32]> {
    (0..count).collect::<Vec<_>>().into()
}

fn host(values: Rc<[u32]>, index: i32) -> (PickerHost<u32>, Rc<RefCell<Vec<usize>>>) {
    let reported = Rc::new(RefCell::new(Vec::new()));
    let host = {
        let reported = Rc::clone(&reported);
        PickerHost::new(values, index, false, move |index| {
            reported.borrow_mut().push(index)
        })
        .unwrap()
    };
    host.state().model().on_layout(48, 2);
    (host, reported)
}

#[test]
fn initial_index_is_not_reported() {
    let (host, reported) = host(numbers(10), 4);
    assert_eq!(host.state().settled_index(), 4);
    assert!(reported.borrow().is_empty());
}

#[test]
fn user_selection_is_reported() {
    let (host, reported) = host(numbers(10), 4);
    let model = host.state().model();

    model.apply_delta(-100.0);
    model.scroll_to_index(6);

    assert_eq!(reported.borrow().as_slice(), &[6]);
}

#[test]
fn external_index_change_jumps_silently() {
    let values = numbers(10);
    let (mut host, reported) = host(Rc::clone(&values), 4);

    assert!(!host.update(&values, 8).unwrap());

    assert_eq!(host.state().model().raw_index(), 8.0);
    assert_eq!(host.state().settled_index(), 8);
    assert!(reported.borrow().is_empty(), "echo of the host's own index");
}

#[test]
fn repeated_index_leaves_a_drag_alone() {
    let values = numbers(10);
    let (mut host, _reported) = host(Rc::clone(&values), 4);

    host.state().model().apply_delta(-60.0);
    host.update(&values, 4).unwrap();

    assert!((host.state().model().raw_index() - 5.2).abs() < 1e-4);
}

#[test]
fn new_value_list_recreates_the_state() {
    let (mut host, reported) = host(numbers(10), 4);
    let old_model = host.state().model().clone();

    let replacement = numbers(5);
    assert!(host.update(&replacement, 2).unwrap());

    assert!(host.state().is_for(&replacement));
    assert!(*host.state().model() != old_model);
    assert_eq!(host.state().settled_index(), 2);
    assert!(reported.borrow().is_empty());

    old_model.scroll_to_index(9);
    assert!(reported.borrow().is_empty(), "old model is unsubscribed");

    host.state().model().scroll_to_index(3);
    assert_eq!(reported.borrow().as_slice(), &[3]);
}

#[test]
fn replaced_callback_receives_later_changes() {
    let (mut host, first) = host(numbers(10), 0);
    let second = Rc::new(RefCell::new(Vec::new()));
    {
        let second = Rc::clone(&second);
        host.set_on_index_change(move |index| second.borrow_mut().push(index));
    }

    host.state().model().scroll_to_index(7);

    assert!(first.borrow().is_empty());
    assert_eq!(second.borrow().as_slice(), &[7]);
}

#[test]
fn rejected_value_list_keeps_the_previous_binding() {
    let values = numbers(10);
    let (mut host, reported) = host(Rc::clone(&values), 4);

    let empty: Rc<[u32]> = Rc::from(Vec::new());
    assert_eq!(host.update(&empty, 7), Err(PickerError::EmptyValues));
    assert!(host.state().is_for(&values));
    assert_eq!(host.state().settled_index(), 4);

    // Index 7 was never applied, so it still moves the picker.
    assert!(!host.update(&values, 7).unwrap());
    assert_eq!(host.state().settled_index(), 7);
    assert!(reported.borrow().is_empty());

    host.state().model().scroll_to_index(4);
    assert_eq!(reported.borrow().as_slice(), &[4]);
}
