// map2png - Render one frame of the tactical map to an image
//
// Pipeline:
//   1. Pick the device profile and seed
//   2. Build a map over an offscreen surface with the CPU raster backend
//   3. Advance the clock to the requested time
//   4. Save the drawing buffer
//
// Usage: cargo run --bin map2png -- [--width N] [--height N] [--time SECONDS]
//        [--seed N] [--mobile] [--pixel-ratio R] [--out PATH]

#[cfg(not(target_arch = "wasm32"))]
mod args;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::env;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match args::Options::parse(env::args().skip(1)) {
        Ok(opts) => opts,
        Err(msg) => {
            eprintln!("{msg}\n{}", args::USAGE);
            std::process::exit(2);
        }
    };

    if let Err(err) = preview::run(&opts) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod preview {
    use std::error::Error;

    use tactical_map::{
        DeviceClass, FrameOutcome, MapConfig, Raster, Surface, TacticalMap, VisibilityGate,
    };

    use crate::args::Options;

    /// A surface with a fixed layout box and nothing to hide.
    struct Offscreen {
        width: f64,
        height: f64,
        pixel_ratio: f64,
        hidden: bool,
    }

    impl Surface for Offscreen {
        fn container_size(&self) -> (f64, f64) {
            (self.width, self.height)
        }

        fn device_pixel_ratio(&self) -> f64 {
            self.pixel_ratio
        }

        fn hide(&mut self) {
            self.hidden = true;
        }

        fn is_hidden(&self) -> bool {
            self.hidden
        }
    }

    pub fn run(opts: &Options) -> Result<(), Box<dyn Error>> {
        let device = if opts.mobile { DeviceClass::Mobile } else { DeviceClass::Desktop };
        let mut config = MapConfig::for_device(device);
        if let Some(seed) = opts.seed {
            config = config.with_seed(seed);
        }

        let surface = Offscreen {
            width: opts.width as f64,
            height: opts.height as f64,
            pixel_ratio: opts.pixel_ratio,
            hidden: false,
        };
        let mut map = TacticalMap::build(surface, &config, VisibilityGate::new(), |s, _| {
            let (w, h) = s.container_size();
            Ok(Raster::new(w as u32, h as u32))
        })?;

        // The clock starts on the first frame; the second lands on `time`.
        let mut outcome = map.frame(0.0);
        if opts.time > 0.0 {
            outcome = map.frame(opts.time * 1000.0);
        }
        if outcome != FrameOutcome::Rendered {
            return Err(format!("frame not rendered: {outcome:?}").into());
        }

        let raster = map.backend();
        image::save_buffer(
            &opts.out,
            raster.pixels(),
            raster.width(),
            raster.height(),
            image::ExtendedColorType::Rgba8,
        )?;

        log::info!(
            "wrote {} ({}x{}, {} points, t={}s)",
            opts.out.display(),
            raster.width(),
            raster.height(),
            map.point_count(),
            opts.time
        );
        map.dispose();
        Ok(())
    }
}
