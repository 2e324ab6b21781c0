//! Fill canvas with a dithered gradient described by JSON settings and save it as PNG
#![deny(warnings)]

use gradfill::*;
use std::{
    env,
    fs::File,
    io::{BufWriter, Read},
    sync::{Arc, atomic::AtomicBool},
};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

type Error = Box<dyn std::error::Error>;

#[derive(Debug)]
struct Args {
    settings_file: String,
    output_file: String,
    width: usize,
    height: usize,
    palette: Option<String>,
    bg: RGBA,
    full: bool,
    print: bool,
}

impl Args {
    fn parse() -> Result<Args, Error> {
        let mut result = Args {
            settings_file: String::new(),
            output_file: String::new(),
            width: 256,
            height: 256,
            palette: None,
            bg: RGBA::TRANSPARENT,
            full: false,
            print: false,
        };
        let mut positional = 0;
        let mut args = env::args();
        let cmd = args.next().unwrap_or_else(|| "fill".to_owned());
        while let Some(arg) = args.next() {
            match arg.as_ref() {
                "-h" => {
                    positional = 0;
                    break;
                }
                "-w" => {
                    result.width = args.next().ok_or("-w requires argument")?.parse()?;
                }
                "-H" => {
                    result.height = args.next().ok_or("-H requires argument")?.parse()?;
                }
                "-p" => {
                    let palette = args.next().ok_or("-p requires argument")?;
                    result.palette = Some(palette);
                }
                "-bg" => {
                    result.bg = args
                        .next()
                        .ok_or("-bg requires color #rrggbb(aa) argument")?
                        .parse()?;
                }
                "-f" => {
                    result.full = true;
                }
                "-d" => {
                    result.print = true;
                }
                _ => {
                    positional += 1;
                    match positional {
                        1 => result.settings_file = arg,
                        2 => result.output_file = arg,
                        _ => return Err("unexpected positional argument".into()),
                    }
                }
            }
        }
        if positional < 2 {
            eprintln!("Fill canvas with a dithered gradient and save it as PNG");
            eprintln!("\nUSAGE:");
            eprintln!(
                "    {} [-w <width>] [-H <height>] [-p <palette>] [-bg <color>] [-f] [-d] <settings.json> <out.png>",
                cmd
            );
            eprintln!("\nARGS:");
            eprintln!("    -w <width>         width of the canvas (default: 256)");
            eprintln!("    -H <height>        height of the canvas (default: 256)");
            eprintln!("    -p <palette>       override palette, list of #rrggbb(aa) colors");
            eprintln!("    -bg <color>        background color");
            eprintln!("    -f                 fill whole canvas instead of the inscribed circle");
            eprintln!("    -d                 dump effective settings to stderr");
            eprintln!("    <settings.json>    fill settings ('-' means stdin)");
            eprintln!("    <out.png>          output image");
            std::process::exit(1);
        }
        Ok(result)
    }
}

fn settings_load(path: &str) -> Result<FillSettings, Error> {
    if path != "-" {
        Ok(FillSettings::from_json(File::open(path)?)?)
    } else {
        let mut contents = String::new();
        std::io::stdin().read_to_string(&mut contents)?;
        Ok(FillSettings::from_json(contents.as_bytes())?)
    }
}

/// Coverage of the circle inscribed into the region, edge is anti-aliased
/// with 4x4 supersampling
fn circle_mask(size: Size) -> ImageOwned<u8> {
    const SAMPLES: usize = 4;
    let center = Point::new(size.width as Scalar / 2.0, size.height as Scalar / 2.0);
    let radius = center.x().min(center.y());
    ImageOwned::new_with(size, |row, col| {
        let mut inside = 0;
        for sy in 0..SAMPLES {
            for sx in 0..SAMPLES {
                let point = Point::new(
                    col as Scalar + (sx as Scalar + 0.5) / SAMPLES as Scalar,
                    row as Scalar + (sy as Scalar + 0.5) / SAMPLES as Scalar,
                );
                if point.dist(center) <= radius {
                    inside += 1;
                }
            }
        }
        (inside * 255 / (SAMPLES * SAMPLES)) as u8
    })
}

fn png_save(image: &ImageOwned<RGBA>, path: &str) -> Result<(), Error> {
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = png::Encoder::new(file, image.width() as u32, image.height() as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(bytemuck::cast_slice(image.data()))?;
    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let mut settings = settings_load(&args.settings_file)?;
    if let Some(palette) = args.palette.as_deref() {
        settings = settings.with_palette_str(palette)?;
    }
    if args.print {
        settings.to_json(std::io::stderr())?;
        eprintln!();
    }

    let size = Size {
        width: args.width,
        height: args.height,
    };
    let mut canvas = ImageOwned::new_with(size, |_, _| args.bg);
    let target = Rect::new(0, 0, size.width, size.height);
    let mask = if args.full {
        full_mask(size)
    } else {
        circle_mask(size)
    };

    // never raised, the demo runs to completion
    let cancel = Arc::new(AtomicBool::new(false));
    let result = settings
        .fill()
        .with_cancel(&cancel)
        .apply(&mut canvas, target, &mask)?;
    tracing::debug!(
        "[fill] covered={} bounds={:?}",
        result.covered,
        result.bounds
    );

    tracing::debug_span!("[save]").in_scope(|| png_save(&canvas, &args.output_file))
}
