// main.rs      nqgif command
//
// Copyright (c) 2026  Douglas Lau
//
#![forbid(unsafe_code)]

use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use nqgif::block::DisposalMethod;
use nqgif::{EncoderConfig, Encoder, RgbSlice};
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Crate version
const VERSION: &str = std::env!("CARGO_PKG_VERSION");

/// Command line error
#[derive(Debug)]
struct CmdError(String);

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Error for CmdError {}

/// Create a boxed command error
fn cmd_err(msg: impl Into<String>) -> Box<dyn Error> {
    Box::new(CmdError(msg.into()))
}

/// Main entry point
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder().format_timestamp(None).init();
    let mut out = StandardStream::stdout(ColorChoice::Always);
    match create_app().get_matches().subcommand() {
        ("wrap", Some(matches)) => wrap(&mut out, matches)?,
        (cmd, _) => return Err(cmd_err(format!("unknown command: {}", cmd))),
    }
    out.reset()?;
    Ok(())
}

/// Create clap App
fn create_app() -> App<'static, 'static> {
    App::new("nqgif")
        .version(VERSION)
        .setting(AppSettings::GlobalVersion)
        .about("Animated GIF encoder")
        .setting(AppSettings::ArgRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("wrap")
                .about("Wrap image frames into an animated GIF")
                .arg(
                    Arg::with_name("files")
                        .required(true)
                        .min_values(1)
                        .help("input image file(s), one per frame"),
                )
                .arg(
                    Arg::with_name("output")
                        .short("o")
                        .long("output")
                        .takes_value(true)
                        .default_value("out.gif")
                        .help("output GIF file"),
                )
                .arg(
                    Arg::with_name("delay")
                        .short("d")
                        .long("delay")
                        .takes_value(true)
                        .help("frame delay (ms)"),
                )
                .arg(
                    Arg::with_name("fps")
                        .long("fps")
                        .takes_value(true)
                        .conflicts_with("delay")
                        .help("frame rate (frames per second)"),
                )
                .arg(
                    Arg::with_name("repeat")
                        .short("r")
                        .long("repeat")
                        .takes_value(true)
                        .allow_hyphen_values(true)
                        .help("repeat count (-1: none, 0: forever)"),
                )
                .arg(
                    Arg::with_name("quality")
                        .short("q")
                        .long("quality")
                        .takes_value(true)
                        .help("quantizer sample factor (1: best, 30: fastest)"),
                )
                .arg(
                    Arg::with_name("transparent")
                        .short("t")
                        .long("transparent")
                        .takes_value(true)
                        .help("transparent color (RRGGBB)"),
                )
                .arg(
                    Arg::with_name("disposal")
                        .long("disposal")
                        .takes_value(true)
                        .possible_values(&[
                            "none",
                            "keep",
                            "background",
                            "previous",
                        ])
                        .help("frame disposal method"),
                ),
        )
}

/// Parse a numeric option
fn parse_opt<T: std::str::FromStr>(
    matches: &ArgMatches,
    name: &str,
) -> Result<Option<T>, Box<dyn Error>> {
    match matches.value_of(name) {
        Some(v) => match v.parse() {
            Ok(n) => Ok(Some(n)),
            Err(_) => Err(cmd_err(format!("invalid {}: {}", name, v))),
        },
        None => Ok(None),
    }
}

/// Parse a hex color (RRGGBB)
fn parse_color(v: &str) -> Result<[u8; 3], Box<dyn Error>> {
    let v = v.trim_start_matches('#');
    if v.len() != 6 || !v.is_ascii() {
        return Err(cmd_err(format!("invalid color: {}", v)));
    }
    let mut rgb = [0; 3];
    for (i, c) in rgb.iter_mut().enumerate() {
        *c = u8::from_str_radix(&v[i * 2..i * 2 + 2], 16)
            .map_err(|_| cmd_err(format!("invalid color: {}", v)))?;
    }
    Ok(rgb)
}

/// Parse a disposal method name
fn parse_disposal(v: &str) -> Option<DisposalMethod> {
    match v {
        "none" => Some(DisposalMethod::NoAction),
        "keep" => Some(DisposalMethod::Keep),
        "background" => Some(DisposalMethod::Background),
        "previous" => Some(DisposalMethod::Previous),
        _ => None,
    }
}

/// Build encoder config from options
fn config(matches: &ArgMatches) -> Result<EncoderConfig, Box<dyn Error>> {
    let mut config = EncoderConfig::default();
    if let Some(delay) = parse_opt(matches, "delay")? {
        config.set_delay_ms(delay);
    }
    if let Some(fps) = parse_opt(matches, "fps")? {
        config.set_frame_rate(fps);
    }
    if let Some(repeat) = parse_opt(matches, "repeat")? {
        config.set_repeat(repeat);
    }
    if let Some(quality) = parse_opt(matches, "quality")? {
        config.set_quality(quality);
    }
    if let Some(v) = matches.value_of("transparent") {
        config.set_transparent(Some(parse_color(v)?));
    }
    config.set_disposal(matches.value_of("disposal").and_then(parse_disposal));
    Ok(config)
}

/// Read one frame image, in any format supported by `image`
fn read_frame(path: &str) -> Result<image::RgbImage, Box<dyn Error>> {
    let img = image::open(path)
        .map_err(|e| cmd_err(format!("{}: {}", path, e)))?;
    Ok(img.to_rgb8())
}

/// Handle wrap subcommand
fn wrap(
    out: &mut StandardStream,
    matches: &ArgMatches,
) -> Result<(), Box<dyn Error>> {
    let mut magenta = ColorSpec::new();
    magenta.set_fg(Some(Color::Magenta));
    let mut yellow = ColorSpec::new();
    yellow.set_fg(Some(Color::Yellow)).set_intense(true);
    let mut bold = ColorSpec::new();
    bold.set_fg(Some(Color::White))
        .set_intense(true)
        .set_bold(true);
    let mut dflt = ColorSpec::new();
    dflt.set_fg(Some(Color::White));
    let config = config(matches)?;
    let output = matches.value_of("output").unwrap_or("out.gif");
    let files: Vec<&str> = matches.values_of("files").into_iter().flatten().collect();
    let mut enc = Encoder::new(File::create(output)?)
        .into_anim_enc()
        .with_config(config);
    out.set_color(&yellow)?;
    writeln!(out, " {:>3} {:>9}  File", "Fr#", "Size")?;
    for (n, path) in files.iter().enumerate() {
        let img = read_frame(path)?;
        let (w, h) = img.dimensions();
        enc.add_frame(&RgbSlice::new(w, h, img.as_raw())?)?;
        out.set_color(&bold)?;
        write!(out, " {:>3}", n)?;
        out.set_color(&dflt)?;
        let size = format!("{}x{}", w, h);
        writeln!(out, " {:>9}  {}", size, path)?;
    }
    let (width, height) = enc.size().unwrap_or((0, 0));
    enc.finish()?;
    out.set_color(&magenta)?;
    writeln!(out, "{}", output)?;
    out.set_color(&bold)?;
    write!(out, "GIF89a, {}x{}, frames: {}", width, height, files.len())?;
    match enc.config().loop_count() {
        Some(0) => write!(out, ", repeat: ∞")?,
        Some(c) => write!(out, ", repeat: {}", c)?,
        None => (),
    }
    writeln!(out, ", delay: {} cs", enc.config().delay_cs())?;
    Ok(())
}
