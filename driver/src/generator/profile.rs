use anyhow::{bail, Context};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use swcore::table::{Column, DataTable};

/// Upper bound on generated depth samples per request.
pub const MAX_ROWS: usize = 1_000_000;

/// Configuration for generating a synthetic well log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub rows: usize,
    pub start_depth: f64,
    pub step: f64,
    pub zones: usize,
    pub noise: f64,
    pub seed: u64,
    /// Every n-th resistivity sample reads zero (tool dropout); 0 disables.
    pub dropout_every: usize,
    /// Append a wholly-empty `CGR` column like many exported logs carry.
    pub empty_column: bool,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            rows: 400,
            start_depth: 2500.0,
            step: 0.5,
            zones: 3,
            noise: 0.05,
            seed: 0,
            dropout_every: 50,
            empty_column: true,
            description: None,
            scenario: None,
        }
    }
}

struct Curves {
    zone: Vec<f64>,
    depth: Vec<f64>,
    dtco: Vec<f64>,
    nphi: Vec<f64>,
    rhob: Vec<f64>,
    rla3: Vec<f64>,
    rla5: Vec<f64>,
    sgr: Vec<f64>,
    cali: Vec<f64>,
    pef: Vec<f64>,
}

fn build_curves(config: &GeneratorConfig) -> anyhow::Result<Curves> {
    let rows = config.rows;
    let zones = config.zones.max(1);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut jitter = |scale: f64| -> f64 {
        if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise) * scale
        } else {
            0.0
        }
    };

    let mut curves = Curves {
        zone: Vec::with_capacity(rows),
        depth: Vec::with_capacity(rows),
        dtco: Vec::with_capacity(rows),
        nphi: Vec::with_capacity(rows),
        rhob: Vec::with_capacity(rows),
        rla3: Vec::with_capacity(rows),
        rla5: Vec::with_capacity(rows),
        sgr: Vec::with_capacity(rows),
        cali: Vec::with_capacity(rows),
        pef: Vec::with_capacity(rows),
    };

    for i in 0..rows {
        let zone = i
            .checked_mul(zones)
            .context("overflow computing zone index for generator")?
            / rows;
        let zone = zone as f64 + 1.0;
        // Shale fraction oscillates through each zone.
        let phase = (i as f64 / rows.max(1) as f64) * 2.0 * PI * zones as f64;
        let shale = 0.5 + 0.4 * phase.sin();
        let porosity = 0.08 + 0.18 * (1.0 - shale) + jitter(0.2);

        let resistivity = (2.0 + 60.0 * (1.0 - shale) * (1.0 + jitter(1.0))).max(0.2);
        let dropout = config.dropout_every > 0 && i % config.dropout_every == 0;

        curves.zone.push(zone);
        curves.depth.push(config.start_depth + i as f64 * config.step);
        curves.dtco.push(52.0 + 40.0 * porosity + 8.0 * shale + jitter(10.0));
        curves.nphi.push(porosity + 0.1 * shale);
        curves.rhob.push(2.71 - 1.65 * porosity + jitter(0.5));
        curves.rla3.push(if dropout { 0.0 } else { resistivity });
        curves.rla5.push(if dropout { 0.0 } else { resistivity * 1.15 });
        curves.sgr.push(15.0 + 45.0 * shale + jitter(20.0));
        curves.cali.push(8.5 + 0.6 * shale + jitter(1.0));
        curves.pef.push(2.5 + 2.0 * shale + jitter(1.0));
    }
    Ok(curves)
}

/// Build a depth-ordered table with the required curves plus `Cali`/`PEF`.
pub fn build_well_log(config: &GeneratorConfig) -> anyhow::Result<DataTable> {
    if config.rows == 0 {
        bail!("synthetic well log needs at least one row");
    }
    if config.rows > MAX_ROWS {
        bail!("synthetic well log is capped at {} rows, got {}", MAX_ROWS, config.rows);
    }
    if config.zones > config.rows {
        bail!("{} zones do not fit in {} rows", config.zones, config.rows);
    }
    if !(config.step > 0.0) {
        bail!("depth step must be positive, got {}", config.step);
    }

    let curves = build_curves(config)?;
    let mut columns = vec![
        Column::numeric("zone", curves.zone),
        Column::numeric("Depth", curves.depth),
        Column::numeric("DTCO", curves.dtco),
        Column::numeric("NPHI", curves.nphi),
        Column::numeric("RHOB", curves.rhob),
        Column::numeric("RLA3", curves.rla3),
        Column::numeric("RLA5", curves.rla5),
        Column::numeric("SGR", curves.sgr),
        Column::numeric("Cali", curves.cali),
        Column::numeric("PEF", curves.pef),
    ];
    if config.empty_column {
        columns.push(Column::numeric("CGR", vec![f64::NAN; config.rows]));
    }

    DataTable::new(columns).context("assembling synthetic well log")
}
