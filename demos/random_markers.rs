use dialplate::{ArrowUpdate, DialId, DialMode, Gauge, GaugeCommand, GaugeConfig, Marker};
use rand::Rng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Two dials: the 90 division dial plots markers, the 120 division dial
    // only carries an arrow
    let config = GaugeConfig::builder()
        .title("Random markers")
        .mode(DialMode::Bi)
        .build();

    let mut gauge = Gauge::new(config);

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut sweep = 0.0;
        loop {
            // a tight cluster plus a few stragglers, so the resolver has work
            let base: f64 = rng.random_range(0.0..300.0);
            let markers = Marker::default_set()
                .into_iter()
                .enumerate()
                .map(|(i, marker)| Marker {
                    value: if i < 6 {
                        base + rng.random_range(0.0..4.0)
                    } else {
                        rng.random_range(0.0..360.0)
                    },
                    ..marker
                })
                .collect();

            let commands = [
                GaugeCommand::SetMarkers(markers),
                GaugeCommand::SetArrow(DialId(1), sweep),
            ];
            if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                break;
            }

            sweep = (sweep + 15.0) % 360.0;
            thread::sleep(Duration::from_millis(1500));
        }
    });

    let (updates, update_receiver) = mpsc::channel::<ArrowUpdate>();
    thread::spawn(move || {
        for update in update_receiver {
            println!("dial {} -> {:.1}°", update.dial, update.angle);
        }
    });

    println!("Displaying two dials with random markers:");
    println!("- Left dial: 90 divisions, markers reshuffled every 1.5s");
    println!("- Right dial: 120 divisions, arrow sweeping in 15° steps");
    println!("- Drag either arrow with the left mouse button");
    println!("Press Ctrl+C to exit");

    gauge.show_with_commands(receiver, Some(updates))?;
    Ok(())
}
