use serde::{Deserialize, Serialize};
use swcore::schema::FeatureColumn;
use swcore::PreparedRun;

/// Axis settings for one curve on the multi-track log plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSpec {
    pub curve: &'static str,
    pub label: &'static str,
    pub x_range: (f64, f64),
}

pub const TRACK_CATALOG: [TrackSpec; 10] = [
    TrackSpec {
        curve: "Cali",
        label: "Cali (in)",
        x_range: (7.0, 13.0),
    },
    TrackSpec {
        curve: "CGR",
        label: "CGR (GAPI)",
        x_range: (0.0, 100.0),
    },
    TrackSpec {
        curve: "DTCO",
        label: "DTCO (US/F)",
        x_range: (40.0, 80.0),
    },
    TrackSpec {
        curve: "NPHI",
        label: "NPHI (V/V)",
        x_range: (-0.1, 0.3),
    },
    TrackSpec {
        curve: "PEF",
        label: "PEF (API)",
        x_range: (2.0, 8.0),
    },
    TrackSpec {
        curve: "PHIE",
        label: "PHIE (V/V)",
        x_range: (0.0, 1.0),
    },
    TrackSpec {
        curve: "RHOB",
        label: "RHOB (G/CM³)",
        x_range: (1.5, 3.5),
    },
    TrackSpec {
        curve: "log(RLA3)",
        label: "log(RLA3) (ohm.m)",
        x_range: (2.0, 10.0),
    },
    TrackSpec {
        curve: "log(RLA5)",
        label: "log(RLA5) (ohm.m)",
        x_range: (2.0, 10.0),
    },
    TrackSpec {
        curve: "SGR",
        label: "SGR (GAPI)",
        x_range: (0.0, 60.0),
    },
];

const TRACK_COLORS: [&str; 10] = [
    "blue", "green", "red", "cyan", "magenta", "black", "purple", "orange", "brown", "black",
];

/// One curve plotted against depth; the depth axis increases downward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogTrack {
    pub curve: String,
    pub label: String,
    pub x_range: (f64, f64),
    pub color: String,
    pub depth: Vec<f64>,
    pub values: Vec<f64>,
}

/// Tracks for every catalog curve present in the run, in catalog order.
///
/// Engineered features win over smoothed input curves of the same name.
pub fn build_tracks(prepared: &PreparedRun) -> Vec<LogTrack> {
    let depth = prepared.depth();
    TRACK_CATALOG
        .iter()
        .filter_map(|spec| {
            let values = match FeatureColumn::from_name(spec.curve) {
                Some(feature) => prepared.features.column(feature).to_vec(),
                None => prepared.smoothed.table().numeric(spec.curve)?.to_vec(),
            };
            Some((spec, values))
        })
        .enumerate()
        .map(|(i, (spec, values))| LogTrack {
            curve: spec.curve.to_string(),
            label: spec.label.to_string(),
            x_range: spec.x_range,
            color: TRACK_COLORS[i % TRACK_COLORS.len()].to_string(),
            depth: depth.clone(),
            values,
        })
        .collect()
}
