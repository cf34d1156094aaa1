//! Simulated issues page: a `submitting` flag drives a parent node whose
//! children watch the query outcome and copy it back into page state. Run
//! with `RUST_LOG=trace` to watch the nodes arm and fire.

use log::info;

use vigil_core::prelude::*;
use vigil_store::Store;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let store = Store::new();
    let submitting = store.observable(false);
    let result = store.observable(None::<Vec<String>>);
    let error = store.observable(None::<String>);
    let issues = store.observable(Vec::<String>::new());
    let failures = store.observable(Vec::<String>::new());

    let page = whenever(
        &store,
        { let submitting = submitting.clone(); move || submitting.get() },
        || info!("query dispatched"),
        vec![
            Box::new({
                let store = store.clone();
                let result = result.clone();
                let issues = issues.clone();
                let submitting = submitting.clone();
                move |_: &()| {
                    let result = result.clone();
                    let issues = issues.clone();
                    let submitting = submitting.clone();
                    whenever(
                        &store,
                        { let result = result.clone(); move || result.get().is_some() },
                        move || {
                            if let Some(list) = result.get() {
                                info!("query succeeded with {} issues", list.len());
                                issues.set(list);
                            }
                            submitting.set(false);
                        },
                        vec![],
                        None,
                    )
                }
            }),
            Box::new({
                let store = store.clone();
                let error = error.clone();
                let failures = failures.clone();
                let submitting = submitting.clone();
                move |_: &()| {
                    let error = error.clone();
                    let failures = failures.clone();
                    let submitting = submitting.clone();
                    whenever(
                        &store,
                        { let error = error.clone(); move || error.get().is_some() },
                        move || {
                            if let Some(message) = error.get() {
                                info!("query failed: {message}");
                                failures.update(|f| f.push(message));
                            }
                            submitting.set(false);
                        },
                        vec![],
                        None,
                    )
                }
            }),
        ],
        Some(Box::new(|| info!("submission settled"))),
    );

    store.transaction(|| {
        submitting.set(true);
        result.set(Some(vec!["add dark mode".into(), "fix scrolling".into()]));
    });

    store.transaction(|| {
        result.set(None);
        submitting.set(true);
        result.set(Some(vec!["update dependencies".into()]));
    });

    store.transaction(|| {
        result.set(None);
        submitting.set(true);
        error.set(Some("network unreachable".into()));
    });

    info!("issues: {:?}", issues.get());
    info!("failures: {:?}", failures.get());

    page.run();
    submitting.set(true);
    info!("page disposed; the last submission went nowhere");
}
