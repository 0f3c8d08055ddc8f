#![warn(clippy::pedantic)]

pub mod assets;
pub mod demo;
pub mod fetch;
pub mod global;
pub mod renderer;
pub mod script;
pub mod textures;

use anyhow::Result as AnyResult;
use gamecanvas_core::{assets::AssetTable, GameCanvas};

const USAGE: &str = "usage: gamecanvas <script.toml> [--assets DIR] [--snapshot OUT.png] [--url IMAGE_URL]";

#[derive(Debug, Default, PartialEq)]
struct Args {
    script: std::path::PathBuf,
    assets: Option<std::path::PathBuf>,
    snapshot: Option<std::path::PathBuf>,
    url: Option<String>,
}
impl Args {
    /// Paths are OSStrings, let the system handle character encoding restrictions.
    fn parse(mut args: impl Iterator<Item = std::ffi::OsString>) -> AnyResult<Self> {
        let mut parsed = Self::default();
        let mut script = None;
        while let Some(arg) = args.next() {
            let flag = arg.to_str().map(str::to_owned);
            match flag.as_deref() {
                Some("--assets") => parsed.assets = Some(Self::value(&mut args, &arg)?.into()),
                Some("--snapshot") => parsed.snapshot = Some(Self::value(&mut args, &arg)?.into()),
                Some("--url") => {
                    let url = Self::value(&mut args, &arg)?;
                    parsed.url = Some(
                        url.into_string()
                            .map_err(|url| anyhow::anyhow!("url {url:?} isn't valid unicode"))?,
                    );
                }
                _ if script.is_none() => script = Some(std::path::PathBuf::from(arg)),
                _ => anyhow::bail!("unexpected argument {arg:?}\n{USAGE}"),
            }
        }
        parsed.script = script.ok_or_else(|| anyhow::anyhow!(USAGE))?;
        Ok(parsed)
    }
    fn value(
        args: &mut impl Iterator<Item = std::ffi::OsString>,
        flag: &std::ffi::OsStr,
    ) -> AnyResult<std::ffi::OsString> {
        args.next()
            .ok_or_else(|| anyhow::anyhow!("{flag:?} needs a value\n{USAGE}"))
    }
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let args = Args::parse(std::env::args_os().skip(1))?;
    let user = global::settings::UserSettings::get();
    if user.did_fail_to_load() && !global::settings::UserSettings::path().is_some_and(|path| path.exists()) {
        // Leave defaults behind for the user to edit.
        if let Err(e) = user.save() {
            log::warn!("Failed to save settings:\n{e:?}");
        }
    }
    let settings = &user.settings;

    let script = script::Script::from_toml_str(&std::fs::read_to_string(&args.script)?)?;
    let frames = script.frames();
    log::info!("replaying {} frames from {:?}", frames.len(), args.script);

    let assets: Box<dyn AssetTable> = match &args.assets {
        Some(dir) => Box::new(assets::DirectoryAssets::load(dir)?),
        None => Box::new(gamecanvas_core::assets::NoAssets),
    };
    let (fetcher, deliveries) = fetch::HttpFetcher::spawn()?;
    let mut canvas = GameCanvas::new(settings, script.display.into(), assets, Box::new(fetcher))?;
    let mut demo = demo::Demo::new(args.url);

    let interval = std::time::Duration::from_secs_f32(settings.frame_interval());
    for input in &frames {
        let start = std::time::Instant::now();
        let frame = canvas.frame_count();
        deliveries.drain_into(canvas.web_cache_mut());
        canvas.tick(settings.frame_interval(), input, |painter| {
            if let Err(e) = demo.frame(painter) {
                log::error!("frame {frame} failed: {e}");
            }
        });
        // Keep to the frame rate so downloads have a chance to land.
        if let Some(rest) = interval.checked_sub(start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    if let Some(path) = &args.snapshot {
        let image = renderer::rasterize(canvas.pool(), canvas.canvas(), &global::textures().read());
        image.save(path)?;
        log::info!("wrote {}x{} snapshot to {path:?}", image.width(), image.height());
    }
    Ok(())
}
