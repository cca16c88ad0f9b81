//! Counter demo - declarative tree, reactive text, and event wiring.
//!
//! Builds the classic counter: a heading bound to a cell, a button whose
//! click handler increments it, wired together in a producer's deferred
//! initializer through the registry.
//!
//! Run with: cargo run --example counter
//! (set RUST_LOG=sprig=trace for the mount/render log)

use sprig::{Kind, Produced, TreeDescriptor, host, mount, on_change, reactive};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let count = reactive(0);

    let log_count = count.clone();
    let _sub = on_change(&count, move || {
        println!("count changed: {}", log_count.get());
    });

    let cell = count.clone();
    let app = Kind::producer(move |_data, on_init| {
        let clicks = cell.clone();
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
                    text: Some(cell.clone().into()),
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
    });

    let (_root, refs) = mount(TreeDescriptor {
        kind: Some(app),
        parent: Some("body".into()),
        ..Default::default()
    })
    .expect("mount counter app");

    let heading = host::query_selector("h1").expect("heading exists");
    println!("heading: {}", host::text(heading));

    let button = refs.get("btn").expect("button registered");
    for _ in 0..3 {
        host::dispatch(button.node(), "click");
    }

    println!("after 3 clicks: {}", host::text(heading));
}
