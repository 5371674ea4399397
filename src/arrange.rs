//! Spreading a palette over display slots and ordering the swatches.

use rgb::RGB8;

use crate::Hsl;

/// Policy ordering swatches before they are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrangementMode {
    /// Stable ascending sort by an HSL component.
    #[default]
    Sort,
    /// Uniform random permutation, fresh on every call.
    Shuffle,
}

impl ArrangementMode {
    /// Mode selected by `name`.  Unrecognized names select
    /// [`Sort`](ArrangementMode::Sort), keeping selection total.
    pub fn from_name(name: &str) -> Self {
        match name {
            "shuffle" => ArrangementMode::Shuffle,
            _ => ArrangementMode::Sort,
        }
    }
}

/// HSL component [`ArrangementMode::Sort`] orders by.
///
/// Earlier strip displays ordered by hue, later box displays by
/// lightness; both orderings remain available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Hue in degrees, ascending.
    Hue,
    /// Lightness, ascending (dark to light).
    #[default]
    Lightness,
}

impl SortKey {
    fn of(self, c: RGB8) -> f64 {
        let hsl = Hsl::from_rgb(c);
        match self {
            SortKey::Hue => hsl.h,
            SortKey::Lightness => hsl.l,
        }
    }
}

/// Stretch `palette` over exactly `slot_count` slots, cycling from the
/// start once the palette runs out.  Deterministic and
/// order-preserving: for `slot_count ≤ palette.len()` the output is
/// the palette's prefix, unchanged.
///
/// The palette must hold at least one color; [`Session::tick`] rejects
/// an empty palette before calling this.
///
/// [`Session::tick`]: crate::Session::tick
pub fn extend(palette: &[RGB8], slot_count: usize) -> Vec<RGB8> {
    debug_assert!(!palette.is_empty());
    (0..slot_count).map(|i| palette[i % palette.len()]).collect()
}

/// Return a permutation of `colors` arranged per `mode`.
///
/// Sorting is stable: swatches with equal keys keep their relative
/// order, so arranging an already sorted sequence changes nothing.
/// Shuffling draws fresh entropy per call and is not reproducible.
pub fn arrange(colors: &[RGB8], mode: ArrangementMode, key: SortKey)
               -> Vec<RGB8> {
    match mode {
        ArrangementMode::Sort => sorted(colors, key),
        ArrangementMode::Shuffle => shuffled(colors, &mut fastrand::Rng::new()),
    }
}

fn sorted(colors: &[RGB8], key: SortKey) -> Vec<RGB8> {
    // Decorate with the key, keeping original positions for ties.
    let mut keyed: Vec<(f64, RGB8)> =
        colors.iter().map(|&c| (key.of(c), c)).collect();
    keyed.sort_by(|c1, c2| c1.0.total_cmp(&c2.0));
    keyed.into_iter().map(|(_, c)| c).collect()
}

/// Fisher–Yates over a copy of `colors`.
fn shuffled(colors: &[RGB8], rng: &mut fastrand::Rng) -> Vec<RGB8> {
    let mut swatches = colors.to_vec();
    for i in (1..swatches.len()).rev() {
        let j = rng.usize(..=i);
        swatches.swap(i, j);
    }
    swatches
}
