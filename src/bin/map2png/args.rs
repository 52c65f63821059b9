use std::path::PathBuf;

pub const USAGE: &str = "Usage: map2png [--width N] [--height N] [--time SECONDS] [--seed N] \
                         [--mobile] [--pixel-ratio R] [--out PATH]";

#[derive(Debug, PartialEq)]
pub struct Options {
    pub width: u32,
    pub height: u32,
    pub time: f64,
    pub seed: Option<u64>,
    pub mobile: bool,
    pub pixel_ratio: f64,
    pub out: PathBuf,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            time: 0.0,
            seed: None,
            mobile: false,
            pixel_ratio: 1.0,
            out: PathBuf::from("tactical-map.png"),
        }
    }
}

impl Options {
    pub fn parse<I>(args: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut opts = Options::default();
        let mut args = args.into_iter();

        while let Some(flag) = args.next() {
            match flag.as_str() {
                "--width" => opts.width = value(&flag, args.next())?,
                "--height" => opts.height = value(&flag, args.next())?,
                "--time" => opts.time = value(&flag, args.next())?,
                "--seed" => opts.seed = Some(value(&flag, args.next())?),
                "--pixel-ratio" => opts.pixel_ratio = value(&flag, args.next())?,
                "--out" | "-o" => opts.out = value::<String>(&flag, args.next())?.into(),
                "--mobile" => opts.mobile = true,
                other => return Err(format!("unknown argument `{other}`")),
            }
        }

        if opts.width == 0 || opts.height == 0 {
            return Err("width and height must be positive".into());
        }
        if !(opts.pixel_ratio > 0.0) {
            return Err("pixel ratio must be positive".into());
        }
        if opts.time < 0.0 {
            return Err("time must not be negative".into());
        }
        Ok(opts)
    }
}

fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T, String> {
    let raw = raw.ok_or_else(|| format!("{flag} needs a value"))?;
    raw.parse().map_err(|_| format!("invalid value `{raw}` for {flag}"))
}
