//! Demo: memoized report sections on an owner struct.
//!
//! Run with `RUST_LOG=debug cargo run --example report_cache` to watch the
//! registry's hit/miss events.

use std::cell::Cell;

use memo::{init_tracing, once, MemoOwner, OwnerId, OwnerToken};

struct ReportBuilder {
    token: OwnerToken,
    renders: Cell<u32>,
}

impl MemoOwner for ReportBuilder {
    fn owner_id(&self) -> OwnerId {
        self.token.id()
    }
}

impl ReportBuilder {
    fn new() -> Self {
        Self {
            token: OwnerToken::new(),
            renders: Cell::new(0),
        }
    }

    /// Pretends to be expensive; memoized per section name.
    fn section(&self, name: &str) -> memo::Result<String> {
        once!(self, (name), || {
            self.renders.set(self.renders.get() + 1);
            format!("[{}] rendered on pass {}", name, self.renders.get())
        })
    }
}

struct Defaults;

impl Defaults {
    /// Type-scoped: no instance in play.
    fn footer() -> memo::Result<String> {
        once!(type Defaults, || "generated footer".to_string())
    }
}

fn main() -> Result<(), anyhow::Error> {
    init_tracing()?;

    let report = ReportBuilder::new();

    println!("{}", report.section("intro")?);
    println!("{}", report.section("intro")?); // cached, no second render
    println!("{}", report.section("summary")?);
    println!("renders: {}", report.renders.get());

    println!("{}", Defaults::footer()?);
    println!("{}", Defaults::footer()?);

    // Request-boundary hygiene: drop one owner's entries as a unit.
    memo::clear_owner(&report.owner_id());
    println!("{}", report.section("intro")?); // renders again
    println!("renders after clear: {}", report.renders.get());

    Ok(())
}
