//! Procedural flower decorations.
//!
//! Two populations are generated per render: a ring of motifs around the
//! symbol at a fixed angular step, and a scatter of smaller motifs in the
//! lower part of the canvas. Randomness is always supplied by the caller.

use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::compose::Layer;
use crate::layout::Bounds;

/// Largest motif radius that is rasterised; bigger sizes are drawn at this.
pub const MAX_MOTIF_SIZE: u32 = 1024;
/// Cap on the ring and on the scatter population.
pub const MAX_MOTIFS_PER_POPULATION: u32 = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotifKind {
    Flower,
}

/// One decorative element instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationMotif {
    pub center_x: i64,
    pub center_y: i64,
    /// Nominal diameter in pixels.
    pub size: u32,
    pub color: Rgba<u8>,
    pub kind: MotifKind,
}

impl DecorationMotif {
    /// Drawn radius, capped at [`MAX_MOTIF_SIZE`].
    pub fn reach(&self) -> u32 {
        self.size.min(MAX_MOTIF_SIZE)
    }

    /// Painted extent: petals sit `size / 2` out with radius `size / 2`.
    pub fn bounds(&self) -> Bounds {
        let reach = i64::from(self.reach());
        Bounds {
            left: self.center_x - reach,
            top: self.center_y - reach,
            right: self.center_x + reach + 1,
            bottom: self.center_y + reach + 1,
        }
    }
}

/// Parameters of both motif populations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSpec {
    pub kind: MotifKind,
    pub ring_count: u32,
    pub ring_step_degrees: f64,
    /// Ring radius as a fraction of `min(width, height)`.
    pub ring_radius_fraction: f64,
    /// Inclusive size range of ring motifs.
    pub ring_size: (u32, u32),
    pub scatter_count: u32,
    /// Top of the scatter band as a fraction of canvas height.
    pub scatter_top_fraction: f64,
    /// Gap between the scatter band and the bottom edge.
    pub scatter_bottom_margin: u32,
    pub scatter_size: (u32, u32),
    pub petal_step_degrees: u32,
    pub palette: Vec<[u8; 4]>,
    pub core_color: [u8; 4],
}

impl Default for DecorationSpec {
    fn default() -> Self {
        Self {
            kind: MotifKind::Flower,
            ring_count: 12,
            ring_step_degrees: 30.0,
            ring_radius_fraction: 0.42,
            ring_size: (30, 60),
            scatter_count: 20,
            scatter_top_fraction: 0.5,
            scatter_bottom_margin: 100,
            scatter_size: (15, 30),
            petal_step_degrees: 45,
            palette: vec![
                [255, 182, 193, 200], // light pink
                [255, 151, 187, 200], // pink
                [221, 160, 221, 200], // plum
                [255, 192, 203, 200], // pink
                [255, 228, 225, 200], // misty rose
            ],
            core_color: [255, 215, 0, 230],
        }
    }
}

fn size_range((a, b): (u32, u32)) -> std::ops::RangeInclusive<u32> {
    a.min(b)..=a.max(b)
}

/// Generate the ring and scatter populations.
///
/// Random values are drawn in a fixed order (ring: size, colour; scatter:
/// x, y, size, colour), so the same seeded source always yields the same
/// motifs.
pub fn generate_motifs<R: Rng + ?Sized>(
    spec: &DecorationSpec,
    width: u32,
    height: u32,
    ring_center: (i64, i64),
    rng: &mut R,
) -> Vec<DecorationMotif> {
    if spec.palette.is_empty() {
        warn!("Decoration palette is empty, no motifs generated");
        return Vec::new();
    }

    let ring_count = capped_count("ring", spec.ring_count);
    let scatter_count = capped_count("scatter", spec.scatter_count);
    let mut motifs = Vec::with_capacity((ring_count + scatter_count) as usize);
    let (cx, cy) = ring_center;
    let radius = f64::from(width.min(height)) * spec.ring_radius_fraction;

    for i in 0..ring_count {
        let angle = (f64::from(i) * spec.ring_step_degrees).to_radians();
        let size = rng.gen_range(size_range(spec.ring_size));
        let color = pick_color(&spec.palette, rng);
        motifs.push(DecorationMotif {
            center_x: cx + (radius * angle.cos()) as i64,
            center_y: cy + (radius * angle.sin()) as i64,
            size,
            color,
            kind: spec.kind,
        });
    }

    let top = (f64::from(height) * spec.scatter_top_fraction) as i64;
    let bottom = (i64::from(height) - i64::from(spec.scatter_bottom_margin)).max(top);
    for _ in 0..scatter_count {
        let x = rng.gen_range(0..=i64::from(width));
        let y = rng.gen_range(top..=bottom);
        let size = rng.gen_range(size_range(spec.scatter_size));
        let color = pick_color(&spec.palette, rng);
        motifs.push(DecorationMotif {
            center_x: x,
            center_y: y,
            size,
            color,
            kind: spec.kind,
        });
    }

    debug!(count = motifs.len(), "Generated decoration motifs");
    motifs
}

fn capped_count(population: &str, count: u32) -> u32 {
    if count > MAX_MOTIFS_PER_POPULATION {
        warn!(
            population,
            requested = count,
            max = MAX_MOTIFS_PER_POPULATION,
            "Motif count capped"
        );
    }
    count.min(MAX_MOTIFS_PER_POPULATION)
}

fn pick_color<R: Rng + ?Sized>(palette: &[[u8; 4]], rng: &mut R) -> Rgba<u8> {
    // Callers guarantee a non-empty palette.
    Rgba(*palette.choose(rng).unwrap_or(&[0, 0, 0, 0]))
}

/// Rasterise a motif as a rosette on its own transparent tile.
///
/// Petals overwrite each other on the tile so overlaps keep a flat colour;
/// the tile is then blended onto the canvas as a unit.
pub fn render_motif(motif: &DecorationMotif, spec: &DecorationSpec) -> RgbaImage {
    let reach = motif.reach();
    let size = reach as i32;
    let side = reach * 2 + 1;
    let mut tile = RgbaImage::new(side, side);
    let (cx, cy) = (size, size);
    let offset = f64::from(size / 2);

    match motif.kind {
        MotifKind::Flower => {
            let step = spec.petal_step_degrees.clamp(1, 360);
            for angle in (0..360).step_by(step as usize) {
                let rad = f64::from(angle).to_radians();
                let px = cx + (offset * rad.cos()) as i32;
                let py = cy + (offset * rad.sin()) as i32;
                draw_filled_circle_mut(&mut tile, (px, py), size / 2, motif.color);
            }
            draw_filled_circle_mut(&mut tile, (cx, cy), size / 3, Rgba(spec.core_color));
        }
    }

    tile
}

pub fn paint_motif(layer: &mut Layer<'_>, motif: &DecorationMotif, spec: &DecorationSpec) {
    let tile = render_motif(motif, spec);
    let reach = i64::from(motif.reach());
    layer.overlay(&tile, motif.center_x - reach, motif.center_y - reach);
}
