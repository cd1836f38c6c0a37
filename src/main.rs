use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use clap::Parser;
use rand::Rng;

use dialplate::{ArrowUpdate, DialMode, Gauge, GaugeCommand, GaugeConfig, Marker, SeamPolicy};

#[derive(Parser, Debug)]
#[command(version, about = "Circular dials with draggable indicator arrows", long_about = None)]
struct Args {
    /// Which dials to show side by side
    #[arg(long, value_enum, default_value_t = DialMode::Single)]
    mode: DialMode,

    #[arg(long, default_value = "Dials")]
    title: String,

    #[arg(long, default_value_t = 900)]
    width: usize,

    #[arg(long, default_value_t = 450)]
    height: usize,

    /// How close markers on either side of 0° are treated
    #[arg(long, value_enum, default_value_t = SeamPolicy::Open)]
    seam: SeamPolicy,

    /// TrueType font for tick labels
    #[arg(long)]
    label_font: Option<PathBuf>,

    /// TrueType font for marker symbols, e.g. an astrological glyph font
    #[arg(long)]
    symbol_font: Option<PathBuf>,

    /// Feed random markers instead of reading them from stdin
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = GaugeConfig::builder()
        .title(args.title)
        .mode(args.mode)
        .window_width(args.width)
        .window_height(args.height)
        .seam_policy(args.seam)
        .maybe_label_font_path(args.label_font)
        .maybe_symbol_font_path(args.symbol_font)
        .build();

    let mut gauge = Gauge::new(config);
    gauge.set_markers(Marker::default_set())?;

    let (commands, receiver) = mpsc::channel();
    if args.demo {
        thread::spawn(move || feed_random(commands));
    } else {
        thread::spawn(move || feed_stdin(commands));
    }

    let (updates, update_receiver) = mpsc::channel::<ArrowUpdate>();
    thread::spawn(move || {
        for update in update_receiver {
            println!("dial={} angle={:.2}", update.dial, update.angle);
        }
    });

    gauge.show_with_commands(receiver, Some(updates))?;
    Ok(())
}

/// Reads `ID SYMBOL VALUE` lines. A blank line or `---` sends the batch
/// collected so far, as does end of input.
fn feed_stdin(commands: Sender<GaugeCommand>) {
    let stdin = io::stdin();
    let mut batch = Vec::new();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() || line == "---" {
            if !batch.is_empty() {
                let markers = std::mem::take(&mut batch);
                if commands.send(GaugeCommand::SetMarkers(markers)).is_err() {
                    return;
                }
            }
            continue;
        }
        match line.parse::<Marker>() {
            Ok(marker) => batch.push(marker),
            Err(e) => log::warn!("Skipping line: {}", e),
        }
    }
    if !batch.is_empty() {
        let _ = commands.send(GaugeCommand::SetMarkers(batch));
    }
}

fn feed_random(commands: Sender<GaugeCommand>) {
    let mut rng = rand::rng();
    loop {
        let markers = Marker::default_set()
            .into_iter()
            .map(|marker| Marker {
                value: rng.random_range(0.0..360.0),
                ..marker
            })
            .collect();
        if commands.send(GaugeCommand::SetMarkers(markers)).is_err() {
            break;
        }
        thread::sleep(Duration::from_secs(2));
    }
}
