//! Implementation for the `check` subcommand.

use tilegrid_engine::LayoutStore;
use tilegrid_geom::{GridGeometry, clamp_rect};
use tilegrid_ids::WidgetId;
use tracing::info;

use crate::{
    cli::CheckArgs,
    error::{Error, Result},
    replay::read_layout,
};

/// One thing wrong with a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// Two widgets share at least one cell.
    Overlap(WidgetId, WidgetId),
    /// A widget reaches past the last grid column.
    OutsideGrid(WidgetId),
}

/// Every problem in `store` for a grid of `columns` columns, overlaps first.
pub fn problems(store: &LayoutStore, columns: u32) -> Vec<Problem> {
    // Only the column count matters for clamping.
    let geom = GridGeometry::new(columns, 0.0, 0.0);
    let mut out: Vec<Problem> = store
        .overlapping_pairs()
        .into_iter()
        .map(|(a, b)| Problem::Overlap(a, b))
        .collect();
    out.extend(
        store
            .iter()
            .filter(|(_, r)| clamp_rect(**r, &geom) != **r)
            .map(|(id, _)| Problem::OutsideGrid(id.clone())),
    );
    out
}

/// Run the layout check, printing one line per problem.
pub fn run(args: &CheckArgs) -> Result<()> {
    let cfg = config::load_or_default(args.config.as_deref())?;
    let store = LayoutStore::load(read_layout(&args.layout)?)?;
    let found = problems(&store, cfg.grid.columns);
    for p in &found {
        match p {
            Problem::Overlap(a, b) => println!("overlap: {a} {b}"),
            Problem::OutsideGrid(id) => println!(
                "outside grid: {id} {}",
                store.get(id).map(|r| r.to_string()).unwrap_or_default()
            ),
        }
    }
    if !found.is_empty() {
        return Err(Error::Problems(found.len()));
    }
    info!(widgets = store.len(), columns = cfg.grid.columns, "layout ok");
    println!("ok: {} widgets", store.len());
    Ok(())
}
