use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use rand::SeedableRng;
use rand::rngs::StdRng;

use rw_core::catalog::Catalog;
use rw_core::clock::{Clock, SystemClock};
use rw_core::generator::IncidentGenerator;

pub(crate) fn run(
    count: i64,
    seed: Option<u64>,
    at: Option<DateTime<FixedOffset>>,
    catalog: Option<PathBuf>,
) -> Result<()> {
    let catalog = match catalog {
        Some(path) => Catalog::load(&path).map_err(|e| anyhow::anyhow!("{e}"))?,
        None => Catalog::builtin(),
    };
    let now = at.unwrap_or_else(|| SystemClock::local().now());
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let generator = IncidentGenerator::new(Arc::new(catalog));
    let incidents = generator
        .generate(count, now, &mut rng)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for incident in &incidents {
        serde_json::to_writer(&mut out, incident)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
