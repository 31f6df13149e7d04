//! PNG rasterization of the SVG charts.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{fontdb, Options, Tree};

/// System fonts, loaded once per process.
fn fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!("loaded {} font face(s) for chart text", db.len());
            Arc::new(db)
        })
        .clone()
}

/// Render an SVG document into a pixmap at its declared size.
pub fn rasterize(svg: &str) -> Result<Pixmap> {
    let options = Options {
        fontdb: fonts(),
        ..Options::default()
    };
    let tree = Tree::from_str(svg, &options).context("failed to parse chart SVG")?;
    let size = tree.size().to_int_size();
    let mut pixmap =
        Pixmap::new(size.width(), size.height()).context("chart canvas has zero size")?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok(pixmap)
}

/// Rasterize `svg` and write it to `path` as a PNG.
pub fn write_png(path: &Path, svg: &str) -> Result<()> {
    let png = rasterize(svg)?
        .encode_png()
        .with_context(|| format!("failed to encode chart {}", path.display()))?;
    std::fs::write(path, png)
        .with_context(|| format!("failed to write chart to {}", path.display()))
}
