//! Smoke test against a live admin API.
//!
//! Signs in with real credentials, then creates, edits, and deletes a
//! throwaway product, checking the list after each step.
//!
//! Run with:
//! ```sh
//! CATALOG_API_PATH=my-shop CATALOG_USERNAME=me@example.com CATALOG_PASSWORD=... \
//!     cargo test --test smoke_test -- --ignored --nocapture
//! ```

use catalog_console::{
    AdminConsole, Credential, DraftSource, MemoryTokenStore, Product, ProductField,
};
use std::env;

/// Failed step labels. Steps keep running after a failure so one run
/// reports everything that is broken.
#[derive(Default)]
struct Failures(Vec<String>);

impl Failures {
    fn check(&mut self, label: &str, ok: bool, detail: impl std::fmt::Debug) {
        if ok {
            eprintln!("ok   {}", label);
        } else {
            eprintln!("FAIL {} ({:?})", label, detail);
            self.0.push(label.to_string());
        }
    }
}

fn find_by_title<'a>(products: &'a [Product], title: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.title == title)
}

// ---------------------------------------------------------------------------
// Smoke test
// ---------------------------------------------------------------------------

#[test]
#[ignore]
fn smoke_test_live_api() {
    let (Ok(username), Ok(password)) = (env::var("CATALOG_USERNAME"), env::var("CATALOG_PASSWORD"))
    else {
        eprintln!("CATALOG_USERNAME / CATALOG_PASSWORD not set; skipping");
        return;
    };

    let mut failures = Failures::default();
    let mut console = AdminConsole::builder()
        .token_store(MemoryTokenStore::new())
        .build()
        .expect("set CATALOG_API_PATH");

    let state = console.start();
    failures.check("start without token is unauthenticated", !state.is_authenticated(), state);
    let login = console.login(&Credential::new(username, password));
    failures.check("login", login.is_ok(), login.as_ref().err());
    if login.is_err() {
        panic!("cannot continue without a session");
    }
    let state = console.check_session();
    failures.check("check_session after login", state.is_authenticated(), state);

    let title = format!("smoke-{}", chrono::Utc::now().timestamp_millis());
    console.open_draft(DraftSource::Empty).unwrap();
    for (field, value) in [
        (ProductField::Title, title.as_str()),
        (ProductField::Category, "Smoke"),
        (ProductField::Price, "100"),
        (ProductField::OriginPrice, "150"),
    ] {
        console.update_draft_field(field, value.into()).unwrap();
    }
    let created = console.submit_draft();
    failures.check("create", created.is_ok(), created.err());
    let id = find_by_title(console.products(), &title).map(|p| p.id.clone());
    failures.check("created product listed", id.is_some(), &title);

    if let Some(id) = id {
        console.edit_product(&id).unwrap();
        console
            .update_draft_field(ProductField::Price, "120".into())
            .unwrap();
        let edited = console.submit_draft();
        failures.check("edit", edited.is_ok(), edited.err());
        let price = console
            .products()
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.price);
        failures.check("edited price listed", price == Some(120.0), price);

        let deleted = console.delete_product(&id);
        failures.check("delete", deleted.is_ok(), deleted.err());
        failures.check(
            "deleted product gone",
            console.products().iter().all(|p| p.id != id),
            &id,
        );
    }

    assert!(failures.0.is_empty(), "failed steps: {:?}", failures.0);
}
