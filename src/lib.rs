//! Dominant-color swatches from sampled video frames.
//!
//! On every frame handed in by the host, a [`PaletteSource`] extracts a
//! representative palette, [`extend`] stretches it over the configured
//! number of display slots and [`arrange`] orders the swatches before
//! they reach a [`RenderTarget`].  The whole pass is driven through
//! [`Session::tick`]; the host decides when frames are sampled and how
//! often ticks fire.
//!
//! All pipeline stages are pure and synchronous.  The only mutable
//! state is the [`Session`] configuration (slot count, arrangement
//! mode), which is owned by the host and read fresh on each tick, so a
//! change takes effect on the next frame.

use rgb::RGB8;
use thiserror::Error;

mod arrange;
pub use arrange::{arrange, extend, ArrangementMode, SortKey};

/// Color hosts paint while no frame is available yet.
pub const PLACEHOLDER: RGB8 = RGB8 { r: 0xAA, g: 0xAA, b: 0xAA };

/// Number of display slots a fresh [`Session`] starts with.
pub const DEFAULT_SLOT_COUNT: usize = 10;

/// A color in the HSL color space, derived from RGB when swatches are
/// ordered.  It is never stored; ordering recomputes it on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    /// The hue in degrees in the range 0. to 360. (excluded).
    pub h: f64,
    /// The saturation in the range 0. to 100.
    pub s: f64,
    /// The lightness in the range 0. to 100.
    pub l: f64,
}

impl Hsl {
    /// Convert an RGB color to HSL.  Pure; every input yields a
    /// defined output.  Achromatic colors (equal channels) have hue
    /// and saturation 0.
    pub fn from_rgb(c: RGB8) -> Hsl {
        let r = c.r as f64 / 255.;
        let g = c.g as f64 / 255.;
        let b = c.b as f64 / 255.;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.;
        if max == min {
            return Hsl { h: 0., s: 0., l: l * 100. };
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2. - max - min) } else { d / (max + min) };
        let h = {
            if max == r { (g - b) / d + if g < b { 6. } else { 0. } }
            else if max == g { (b - r) / d + 2. }
            else { (r - g) / d + 4. } };
        Hsl { h: h * 60., s: s * 100., l: l * 100. }
    }
}

/// Produces a representative palette from a raster frame.
///
/// The frame type is opaque to the pipeline: whatever the host samples
/// (a decoded still, a canvas snapshot) is passed through unexamined.
/// The extraction algorithm is the source's business; the pipeline
/// only relies on the returned palette holding at most `desired`
/// colors.
pub trait PaletteSource<Frame> {
    /// Surfaced when a frame cannot be decoded or quantized.
    type Error;

    /// Extract at most `desired` representative colors from `frame`,
    /// most dominant first.
    fn extract(&mut self, frame: &Frame, desired: usize)
               -> Result<Vec<RGB8>, Self::Error>;
}

/// Anything that can display one swatch per slot.
///
/// Keeps the pipeline free of any presentation technology: a host may
/// paint DOM boxes, a terminal row or a plain string.
pub trait RenderTarget {
    /// Paint `swatches`, one per display slot, replacing the previous
    /// rendering.
    fn render(&mut self, swatches: &[RGB8]);
}

/// CSS functional notation for a color, e.g. `rgb(255,0,0)`.
pub fn css_rgb(c: RGB8) -> String {
    format!("rgb({},{},{})", c.r, c.g, c.b)
}

/// CSS horizontal gradient through `colors`, one stop per swatch.
pub fn linear_gradient(colors: &[RGB8]) -> String {
    let stops: Vec<_> = colors.iter().map(|&c| css_rgb(c)).collect();
    format!("linear-gradient(to right, {})", stops.join(", "))
}

/// Renders swatches as a CSS `linear-gradient` declaration, the way
/// the single-strip display paints its background.
#[derive(Debug, Default)]
pub struct CssGradient {
    background: String,
}

impl CssGradient {
    pub fn new() -> Self { Self::default() }

    /// The last rendered `background` value.  Empty before the first
    /// frame.
    pub fn background(&self) -> &str { &self.background }
}

impl RenderTarget for CssGradient {
    fn render(&mut self, swatches: &[RGB8]) {
        self.background = linear_gradient(swatches);
    }
}

/// Errors surfaced by [`Session::tick`].  Every failure is immediate;
/// nothing in the pipeline retries.
#[derive(Debug, Error)]
pub enum PipelineError<E> {
    /// The palette source could not produce a palette from the frame.
    #[error("palette extraction failed: {0}")]
    Extract(E),
    /// The palette source returned zero colors.  The extender cycles
    /// over the palette, so it has no defined behavior for an empty
    /// one; the tick fails before reaching it.
    #[error("palette source returned no colors")]
    EmptyPalette,
}

/// Host-owned pipeline configuration: the display-slot count and the
/// arrangement policy.
///
/// The hosting application keeps one session per display and hands it
/// to [`tick`](Session::tick) on every sampled frame; the pipeline
/// itself holds no module-level state.
#[derive(Debug, Clone)]
pub struct Session {
    slot_count: usize,
    mode: ArrangementMode,
    key: SortKey,
}

impl Default for Session {
    fn default() -> Self {
        Session { slot_count: DEFAULT_SLOT_COUNT,
                  mode: ArrangementMode::default(),
                  key: SortKey::default() }
    }
}

impl Session {
    pub fn new() -> Self { Self::default() }

    /// Current number of display slots.
    pub fn slot_count(&self) -> usize { self.slot_count }

    /// Set the number of display slots.  Zero is invalid and the
    /// previous count is retained.
    pub fn set_slot_count(&mut self, n: usize) {
        if n == 0 {
            log::warn!("ignoring slot count 0, keeping {}", self.slot_count);
            return;
        }
        self.slot_count = n;
    }

    /// Currently selected arrangement mode.
    pub fn mode(&self) -> ArrangementMode { self.mode }

    pub fn set_mode(&mut self, mode: ArrangementMode) { self.mode = mode }

    /// HSL component [`ArrangementMode::Sort`] orders by.
    pub fn sort_key(&self) -> SortKey { self.key }

    pub fn set_sort_key(&mut self, key: SortKey) { self.key = key }

    /// Run one pipeline pass over `frame`: extract a palette, stretch
    /// it over the configured slots and arrange the swatches.  Returns
    /// exactly [`slot_count`](Session::slot_count) colors, one per
    /// display slot.
    ///
    /// Extraction failures are surfaced as
    /// [`PipelineError::Extract`], never retried.
    pub fn tick<F, S>(&self, source: &mut S, frame: &F)
                      -> Result<Vec<RGB8>, PipelineError<S::Error>>
    where S: PaletteSource<F> {
        // Quantizers misbehave below two colors; a single-slot display
        // still asks for two and fills its slot from index 0.
        let desired = self.slot_count.max(2);
        let palette = source.extract(frame, desired)
            .map_err(PipelineError::Extract)?;
        if palette.is_empty() {
            return Err(PipelineError::EmptyPalette);
        }
        log::debug!("palette of {} colors for {} slots",
                    palette.len(), self.slot_count);
        let swatches = extend(&palette, self.slot_count);
        Ok(arrange(&swatches, self.mode, self.key))
    }

    /// [`tick`](Session::tick), then hand the swatches to `target`.
    pub fn tick_into<F, S, R>(&self, source: &mut S, frame: &F,
                              target: &mut R)
                              -> Result<(), PipelineError<S::Error>>
    where S: PaletteSource<F>, R: RenderTarget {
        let swatches = self.tick(source, frame)?;
        target.render(&swatches);
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::convert::Infallible;
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> RGB8 { RGB8 { r, g, b } }

    #[test]
    fn hsl_primaries() {
        let red = Hsl::from_rgb(rgb(255, 0, 0));
        assert_eq!((red.h, red.s, red.l), (0., 100., 50.));
        let green = Hsl::from_rgb(rgb(0, 255, 0));
        assert!((green.h - 120.).abs() < 1e-9);
        assert_eq!((green.s, green.l), (100., 50.));
        let blue = Hsl::from_rgb(rgb(0, 0, 255));
        assert!((blue.h - 240.).abs() < 1e-9);
        assert_eq!((blue.s, blue.l), (100., 50.));
    }

    #[test]
    fn hsl_achromatic() {
        for v in [0u8, 1, 127, 170, 255] {
            let c = Hsl::from_rgb(rgb(v, v, v));
            assert_eq!(c.h, 0.);
            assert_eq!(c.s, 0.);
            assert!((c.l - v as f64 / 255. * 100.).abs() < 1e-9);
        }
    }

    #[test]
    fn css_formatting() {
        assert_eq!(css_rgb(rgb(255, 0, 10)), "rgb(255,0,10)");
        assert_eq!(css_rgb(PLACEHOLDER), "rgb(170,170,170)");
        assert_eq!(
            linear_gradient(&[rgb(255, 0, 0), rgb(0, 0, 255)]),
            "linear-gradient(to right, rgb(255,0,0), rgb(0,0,255))");
    }

    /// Source handing out a fixed palette, truncated to `desired`.
    struct Fixed(Vec<RGB8>);

    impl PaletteSource<()> for Fixed {
        type Error = Infallible;

        fn extract(&mut self, _: &(), desired: usize)
                   -> Result<Vec<RGB8>, Infallible> {
            Ok(self.0.iter().copied().take(desired).collect())
        }
    }

    /// Source recording the count it was asked for.
    struct Probe {
        palette: Vec<RGB8>,
        last_desired: usize,
    }

    impl PaletteSource<()> for Probe {
        type Error = Infallible;

        fn extract(&mut self, _: &(), desired: usize)
                   -> Result<Vec<RGB8>, Infallible> {
            self.last_desired = desired;
            Ok(self.palette.clone())
        }
    }

    struct Failing;

    impl PaletteSource<()> for Failing {
        type Error = &'static str;

        fn extract(&mut self, _: &(), _: usize)
                   -> Result<Vec<RGB8>, &'static str> {
            Err("undecodable frame")
        }
    }

    #[test]
    fn tick_equal_lightness_sort_keeps_palette_order() {
        // The three primaries share lightness 50, so the stable sort
        // leaves the extended sequence untouched.
        let primaries = vec![rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 0, 255)];
        let mut source = Fixed(primaries.clone());
        let mut session = Session::new();
        session.set_slot_count(6);
        let swatches = session.tick(&mut source, &()).unwrap();
        assert_eq!(swatches,
                   vec![primaries[0], primaries[1], primaries[2],
                        primaries[0], primaries[1], primaries[2]]);
    }

    #[test]
    fn tick_single_slot_asks_for_two() {
        let mut source = Probe { palette: vec![rgb(10, 10, 10)],
                                 last_desired: 0 };
        let mut session = Session::new();
        session.set_slot_count(1);
        let swatches = session.tick(&mut source, &()).unwrap();
        assert_eq!(source.last_desired, 2);
        assert_eq!(swatches, vec![rgb(10, 10, 10)]);
    }

    #[test]
    fn tick_rejects_empty_palette() {
        let mut source = Fixed(vec![]);
        let session = Session::new();
        match session.tick(&mut source, &()) {
            Err(PipelineError::EmptyPalette) => (),
            other => panic!("expected EmptyPalette, got {other:?}"),
        }
    }

    #[test]
    fn tick_surfaces_extraction_faults() {
        let session = Session::new();
        match session.tick(&mut Failing, &()) {
            Err(PipelineError::Extract(e)) => assert_eq!(e, "undecodable frame"),
            other => panic!("expected Extract, got {other:?}"),
        }
    }

    #[test]
    fn slot_count_zero_is_retained() {
        let mut session = Session::new();
        assert_eq!(session.slot_count(), DEFAULT_SLOT_COUNT);
        session.set_slot_count(4);
        session.set_slot_count(0);
        assert_eq!(session.slot_count(), 4);
    }

    #[test]
    fn tick_reads_configuration_fresh() {
        let mut source = Fixed(vec![rgb(1, 2, 3)]);
        let mut session = Session::new();
        session.set_slot_count(3);
        assert_eq!(session.tick(&mut source, &()).unwrap().len(), 3);
        session.set_slot_count(7);
        assert_eq!(session.tick(&mut source, &()).unwrap().len(), 7);
    }

    #[test]
    fn gradient_render_target() {
        let mut target = CssGradient::new();
        assert_eq!(target.background(), "");
        let mut source = Fixed(vec![rgb(255, 0, 0), rgb(0, 0, 255)]);
        let mut session = Session::new();
        session.set_slot_count(2);
        session.tick_into(&mut source, &(), &mut target).unwrap();
        assert_eq!(target.background(),
                   "linear-gradient(to right, rgb(255,0,0), rgb(0,0,255))");
    }
}
