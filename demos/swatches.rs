use std::{collections::HashMap,
          convert::Infallible,
          io::{BufWriter, Write},
          fs::File,
          error::Error};
use rgb::RGB8;
use swatchcam::{css_rgb, linear_gradient, ArrangementMode, PaletteSource,
                Session, SortKey, PLACEHOLDER};

type Err = Box<dyn Error>;

/// A frame as a host would sample it: a bag of decoded pixels.
struct Frame {
    pixels: Vec<RGB8>,
}

fn scene(colors: &[(RGB8, usize)]) -> Frame {
    let mut pixels = Vec::new();
    for &(c, n) in colors {
        pixels.extend(std::iter::repeat(c).take(n));
    }
    Frame { pixels }
}

/// Stand-in palette source: buckets pixels on their high channel bits
/// and hands back the most populated buckets.
struct Binned;

impl PaletteSource<Frame> for Binned {
    type Error = Infallible;

    fn extract(&mut self, frame: &Frame, desired: usize)
               -> Result<Vec<RGB8>, Infallible> {
        let mut buckets: HashMap<(u8, u8, u8), (u32, RGB8)> = HashMap::new();
        for &p in &frame.pixels {
            let bucket = buckets.entry((p.r >> 5, p.g >> 5, p.b >> 5))
                .or_insert((0, p));
            bucket.0 += 1;
        }
        let mut ranked: Vec<_> = buckets.into_values().collect();
        ranked.sort_by(|b1, b2| b2.0.cmp(&b1.0));
        Ok(ranked.into_iter().take(desired).map(|(_, c)| c).collect())
    }
}

fn swatch_row(fh: &mut impl Write, swatches: &[RGB8], width: u32,
              comment: &str) -> Result<(), Err> {
    writeln!(fh, "<table style=\"border: 0px;  border-spacing: 0px\"><tr>")?;
    for &c in swatches {
        writeln!(fh, "  <td style=\"width: {width}px; height: 30px; \
                      background-color: {}\"></td>",
                 css_rgb(c))?;
    }
    writeln!(fh, "<td style=\"padding-left: 7px\">{comment}</td></tr>\
                  </table>")?;
    Ok(())
}

fn gradient_strip(fh: &mut impl Write, swatches: &[RGB8],
                  comment: &str) -> Result<(), Err> {
    writeln!(fh, "<div style=\"width: 430px; height: 30px; \
                  background: {}\"></div><p>{comment}</p>",
             linear_gradient(swatches))?;
    Ok(())
}

fn main() -> Result<(), Err> {
    let mut fh = BufWriter::new(File::create("swatches.html")?);
    writeln!(fh, "<html>\n\
                  <head>\n\
                  <title>swatchcam: sampled frames</title>\n\
                  </head>\n\
                  <body>")?;

    let frames = [
        ("sunset", scene(&[(RGB8 { r: 250, g: 115, b: 35 }, 500),
                           (RGB8 { r: 210, g: 60, b: 80 }, 300),
                           (RGB8 { r: 70, g: 40, b: 90 }, 150),
                           (RGB8 { r: 255, g: 210, b: 120 }, 80)])),
        ("forest", scene(&[(RGB8 { r: 30, g: 90, b: 40 }, 600),
                           (RGB8 { r: 90, g: 140, b: 60 }, 250),
                           (RGB8 { r: 50, g: 40, b: 30 }, 120),
                           (RGB8 { r: 190, g: 200, b: 160 }, 60)])),
        ("night", scene(&[(RGB8 { r: 10, g: 10, b: 30 }, 800),
                          (RGB8 { r: 40, g: 45, b: 80 }, 150),
                          (RGB8 { r: 230, g: 230, b: 200 }, 20)])),
    ];

    let mut source = Binned;
    let mut session = Session::new();

    writeln!(fh, "<h3>No frame yet</h3>")?;
    swatch_row(&mut fh, &[PLACEHOLDER; 10], 43, "placeholder")?;

    writeln!(fh, "<h3>Sorted by lightness (10 slots)</h3>")?;
    for (name, frame) in &frames {
        let swatches = session.tick(&mut source, frame)?;
        swatch_row(&mut fh, &swatches, 43, name)?;
    }

    writeln!(fh, "<h3>Sorted by hue (6 slots)</h3>")?;
    session.set_slot_count(6);
    session.set_sort_key(SortKey::Hue);
    for (name, frame) in &frames {
        let swatches = session.tick(&mut source, frame)?;
        swatch_row(&mut fh, &swatches, 43, name)?;
    }

    writeln!(fh, "<h3>Shuffled (6 slots)</h3>")?;
    session.set_mode(ArrangementMode::from_name("shuffle"));
    for (name, frame) in &frames {
        let swatches = session.tick(&mut source, frame)?;
        swatch_row(&mut fh, &swatches, 43, name)?;
    }

    writeln!(fh, "<h3>Gradient strip</h3>")?;
    session.set_mode(ArrangementMode::Sort);
    for (name, frame) in &frames {
        let swatches = session.tick(&mut source, frame)?;
        gradient_strip(&mut fh, &swatches, name)?;
    }

    writeln!(fh, "</body>\n\
                  </html>")?;
    Ok(())
}
