//! End-to-end counter scenario.
//!
//! A producer component builds a heading bound to a cell and a button
//! registered under a name; its deferred initializer wires a click handler
//! that increments the cell. Three dispatched clicks must leave the heading
//! at "3" without any explicit render call.

use std::cell::Cell;
use std::rc::Rc;

use sprig::{Kind, Produced, TreeDescriptor, host, mount, on_change, reactive};

fn counter_app(count: sprig::Reactive<i32>) -> Kind {
    Kind::producer(move |_data, on_init| {
        let clicks = count.clone();
        on_init.register(move |refs| {
            refs.get("btn")
                .unwrap()
                .add_event("click", move |_| clicks.update(|c| *c += 1));
        });

        Produced::Delegate(TreeDescriptor {
            kind: Some(Kind::tag("div")),
            attributes: Some(vec![("id".into(), "app".into())]),
            style: vec![("font-family".into(), "Arial, Helvetica, sans-serif".into())],
            children: vec![
                TreeDescriptor {
                    kind: Some(Kind::tag("h1")),
                    text: Some(count.clone().into()),
                    ..Default::default()
                }
                .into(),
                TreeDescriptor {
                    kind: Some(Kind::tag("button")),
                    text: Some("CLICK ME!!".into()),
                    ref_name: Some("btn".into()),
                    ..Default::default()
                }
                .into(),
            ],
            ..Default::default()
        })
    })
}

#[test]
fn three_clicks_count_to_three() {
    host::reset();

    let count = reactive(0);

    let (_root, refs) = mount(TreeDescriptor {
        kind: Some(counter_app(count.clone())),
        parent: Some("body".into()),
        ..Default::default()
    })
    .unwrap();

    let app = host::query_selector("#app").unwrap();
    assert_eq!(host::parent(app), Some(host::root()));
    assert_eq!(
        host::style(app, "font-family"),
        Some("Arial, Helvetica, sans-serif".to_string())
    );

    let heading = host::query_selector("h1").unwrap();
    assert_eq!(host::text(heading), "0");

    let button = refs.get("btn").unwrap();
    assert_eq!(host::text(button.node()), "CLICK ME!!");

    for _ in 0..3 {
        host::dispatch(button.node(), "click");
    }

    assert_eq!(host::text(heading), "3");
    assert_eq!(count.get(), 3);
}

#[test]
fn change_listener_fires_once_per_click() {
    host::reset();

    let count = reactive(0);
    let fired = Rc::new(Cell::new(0));

    let fired_clone = fired.clone();
    let _sub = on_change(&count, move || {
        fired_clone.set(fired_clone.get() + 1);
    });

    let (_root, refs) = mount(TreeDescriptor {
        kind: Some(counter_app(count.clone())),
        parent: Some("body".into()),
        ..Default::default()
    })
    .unwrap();

    let button = refs.get("btn").unwrap();
    host::dispatch(button.node(), "click");
    host::dispatch(button.node(), "click");

    assert_eq!(fired.get(), 2);
    // Writing the current value back must not fire the listener.
    count.set(2);
    assert_eq!(fired.get(), 2);
}
