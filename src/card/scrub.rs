//! Plaque mask engine for the teeth-cleaning mini-game.
//!
//! Owns a per-pixel alpha raster ("plaque") over the drawable region: a
//! uniform base tint with randomly stamped darker blemish disks. Pointer
//! input carves transparent brush disks out of the mask; remaining coverage
//! is estimated by sampling the raster at a fixed stride, and when the dirty
//! fraction drops below [`CLEAN_RATIO`] the mask latches into its terminal
//! clean state. Everything here is pure Rust; the canvas adapter in `card`
//! renders the raster and feeds coordinates in, so the whole engine runs
//! under native `cargo test`.

use crate::card::rng::Rng64;

/// Number of darker blemish disks stamped over the base tint.
pub const BLEMISH_COUNT: usize = 80;
/// Blemish radius range in pixels (uniform, half-open).
pub const BLEMISH_RADIUS_MIN: f64 = 20.0;
pub const BLEMISH_RADIUS_MAX: f64 = 60.0;
/// Base plaque coverage, ~0.6 of full opacity.
pub const BASE_ALPHA: u8 = 153;
/// Opacity of a single blemish stamp before compositing onto the base.
pub const BLEMISH_ALPHA: u8 = 102;
/// Brush radius carved out by one erase event.
pub const BRUSH_RADIUS: f64 = 20.0;
/// Sampled alpha above this still counts as dirty.
pub const DIRTY_ALPHA_THRESHOLD: u8 = 20;
/// Sample every Nth pixel (by flattened pixel index) when estimating coverage.
pub const SAMPLE_STRIDE: usize = 4;
/// Dirty ratio below which the surface counts as clean.
pub const CLEAN_RATIO: f64 = 0.02;
/// Coverage is re-evaluated once per this many erase calls.
pub const EVALUATE_EVERY: u64 = 2;

/// The dirty-mask raster plus its one-way completion latch.
///
/// Two states: dirty (initial) and clean (terminal). The only transition is
/// dirty -> clean inside [`PlaqueMask::evaluate_coverage`]; re-initializing
/// starts a fresh raster generation back in the dirty state. Within one
/// generation, per-pixel alpha only ever decreases.
#[derive(Debug, Clone)]
pub struct PlaqueMask {
    width: usize,
    height: usize,
    /// Row-major, one alpha byte per pixel. Empty until initialized.
    alpha: Vec<u8>,
    clean: bool,
    erase_calls: u64,
}

impl PlaqueMask {
    /// A mask with no surface yet; erases and queries are no-ops until
    /// [`PlaqueMask::initialize`] is called with valid dimensions.
    pub const fn new() -> Self {
        Self {
            width: 0,
            height: 0,
            alpha: Vec::new(),
            clean: false,
            erase_calls: 0,
        }
    }

    /// (Re)build the raster for a drawable region of the given size.
    ///
    /// Discards any previous surface and progress, fills the base tint and
    /// stamps [`BLEMISH_COUNT`] random blemish disks. Zero or negative
    /// dimensions drop the surface and leave the mask uninitialized (the
    /// caller retries once the host layout settles).
    pub fn initialize(&mut self, width: i32, height: i32, rng: &mut Rng64) {
        self.clean = false;
        self.erase_calls = 0;
        if width <= 0 || height <= 0 {
            self.width = 0;
            self.height = 0;
            self.alpha.clear();
            return;
        }
        self.width = width as usize;
        self.height = height as usize;
        self.alpha.clear();
        self.alpha.resize(self.width * self.height, BASE_ALPHA);

        for _ in 0..BLEMISH_COUNT {
            let cx = rng.range_f64(0.0, width as f64);
            let cy = rng.range_f64(0.0, height as f64);
            let r = rng.range_f64(BLEMISH_RADIUS_MIN, BLEMISH_RADIUS_MAX);
            self.stamp_blemish(cx, cy, r);
        }
    }

    /// Erase a brush disk centered at canvas-local (x, y).
    ///
    /// Out-of-bounds coordinates are clamped into the raster by the disk
    /// loop; an erase before initialization or after the clean latch is a
    /// silent no-op. Coverage is re-evaluated every [`EVALUATE_EVERY`]th
    /// call; returns `true` exactly once, on the call whose evaluation
    /// crosses the clean threshold.
    pub fn erase_at(&mut self, x: i32, y: i32) -> bool {
        if self.clean || self.alpha.is_empty() {
            return false;
        }
        self.carve_disk(x as f64, y as f64, BRUSH_RADIUS);
        self.erase_calls += 1;
        if self.erase_calls % EVALUATE_EVERY == 0 {
            let was_clean = self.clean;
            self.evaluate_coverage();
            return self.clean && !was_clean;
        }
        false
    }

    /// Estimate the fraction of the raster still dirty.
    ///
    /// Samples every [`SAMPLE_STRIDE`]th pixel and counts alpha above
    /// [`DIRTY_ALPHA_THRESHOLD`]. Crossing below [`CLEAN_RATIO`] sets the
    /// clean latch; once set it never resets within this generation. An
    /// uninitialized mask reports fully dirty and never latches.
    pub fn evaluate_coverage(&mut self) -> f64 {
        if self.alpha.is_empty() {
            return 1.0;
        }
        let mut dirty = 0usize;
        let mut total = 0usize;
        let mut i = 0;
        while i < self.alpha.len() {
            total += 1;
            if self.alpha[i] > DIRTY_ALPHA_THRESHOLD {
                dirty += 1;
            }
            i += SAMPLE_STRIDE;
        }
        let ratio = dirty as f64 / total as f64;
        if ratio < CLEAN_RATIO {
            self.clean = true;
        }
        ratio
    }

    pub const fn is_clean(&self) -> bool {
        self.clean
    }

    pub fn is_initialized(&self) -> bool {
        !self.alpha.is_empty()
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Row-major alpha bytes, one per pixel. Empty until initialized.
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    /// Composite a partially opaque blemish disk onto the mask (source-over).
    fn stamp_blemish(&mut self, cx: f64, cy: f64, r: f64) {
        let src = BLEMISH_ALPHA as f64 / 255.0;
        self.for_disk(cx, cy, r, |a| {
            let dst = a as f64 / 255.0;
            let out = (src + dst * (1.0 - src)) * 255.0;
            out.round().min(255.0) as u8
        });
    }

    /// Zero alpha inside the disk (destination-out: erased stays erased).
    fn carve_disk(&mut self, cx: f64, cy: f64, r: f64) {
        self.for_disk(cx, cy, r, |_| 0);
    }

    fn for_disk(&mut self, cx: f64, cy: f64, r: f64, f: impl Fn(u8) -> u8) {
        let y_lo = ((cy - r).floor().max(0.0)) as usize;
        let y_hi = ((cy + r).ceil().min(self.height as f64 - 1.0)).max(0.0) as usize;
        let x_lo = ((cx - r).floor().max(0.0)) as usize;
        let x_hi = ((cx + r).ceil().min(self.width as f64 - 1.0)).max(0.0) as usize;
        if cy + r < 0.0 || cx + r < 0.0 {
            return;
        }
        let r2 = r * r;
        for y in y_lo..=y_hi {
            let dy = y as f64 - cy;
            let row = y * self.width;
            for x in x_lo..=x_hi {
                let dx = x as f64 - cx;
                if dx * dx + dy * dy <= r2 {
                    let a = &mut self.alpha[row + x];
                    *a = f(*a);
                }
            }
        }
    }
}

impl Default for PlaqueMask {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_mask(w: i32, h: i32) -> PlaqueMask {
        let mut rng = Rng64::from_seed(0xDEC4F);
        let mut mask = PlaqueMask::new();
        mask.initialize(w, h, &mut rng);
        mask
    }

    #[test]
    fn fresh_surface_is_almost_entirely_dirty() {
        let mut mask = seeded_mask(400, 300);
        assert!(!mask.is_clean());
        assert!(mask.evaluate_coverage() >= 0.95);
    }

    #[test]
    fn erase_never_restores_opacity() {
        let mut mask = seeded_mask(120, 90);
        let before = mask.alpha().to_vec();
        mask.erase_at(40, 40);
        mask.erase_at(60, 45);
        let after = mask.alpha();
        for (b, a) in before.iter().zip(after) {
            assert!(a <= b, "alpha increased: {b} -> {a}");
        }
    }

    #[test]
    fn erase_before_initialize_is_a_noop() {
        let mut mask = PlaqueMask::new();
        assert!(!mask.erase_at(10, 10));
        assert!(!mask.is_clean());
        assert!((mask.evaluate_coverage() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_area_dimensions_leave_mask_uninitialized() {
        let mut rng = Rng64::from_seed(1);
        let mut mask = PlaqueMask::new();
        mask.initialize(0, 240, &mut rng);
        assert!(!mask.is_initialized());
        mask.initialize(-3, -7, &mut rng);
        assert!(!mask.is_initialized());
        assert!(!mask.erase_at(5, 5));
    }

    #[test]
    fn out_of_bounds_erase_is_clamped_not_an_error() {
        let mut mask = seeded_mask(100, 100);
        mask.erase_at(-50, -50);
        mask.erase_at(500, 500);
        mask.erase_at(-5, 50);
        assert!(!mask.is_clean());
    }

    #[test]
    fn blemish_stamps_darken_the_base_tint() {
        let mask = seeded_mask(200, 200);
        assert!(mask.alpha().iter().any(|&a| a > BASE_ALPHA));
        assert!(mask.alpha().iter().all(|&a| a >= BASE_ALPHA));
    }
}
