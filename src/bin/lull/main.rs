//! lull - generative ambience synthesizer
//!
//! Run with: cargo run
//!
//! Streams slowly drifting three-voice chords to the default output device.
//! The synth renders long frames at its own cadence into a sample ring
//! buffer; the audio callback just drains samples, so device buffer sizes
//! and the musical frame rate stay decoupled.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use color_eyre::eyre::{eyre, Result, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

use lull_dsp::synth::message::{control_channel, Controller};
use lull_dsp::synth::{AmbienceDriver, StreamStatus};

/// One new frame every five seconds, the ambience synth's home cadence.
const UPDATE_HZ: f32 = 0.2;

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let (tx, rx) = control_channel(64);
    let mut driver =
        AmbienceDriver::new(sample_rate, UPDATE_HZ, StdRng::from_entropy()).with_control(rx);
    let mut controller = Controller::new(tx, driver.buffer_duration());

    println!("=== lull ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);
    println!("Frame: {} samples", driver.frame_size());
    println!();

    // Two frames of slack between the synth cadence and the device callbacks.
    let (mut sample_tx, mut sample_rx) = rtrb::RingBuffer::<f32>::new(2 * driver.frame_size());

    let render = thread::spawn(move || {
        loop {
            let frame_size = driver.frame_size();
            while sample_tx.slots() < frame_size {
                thread::sleep(Duration::from_millis(50));
            }

            let (frame, status) = driver.produce_buffer(frame_size);
            for &sample in frame {
                // Cannot fail: slots were checked above and the consumer
                // only ever frees more.
                let _ = sample_tx.push(sample);
            }

            if status == StreamStatus::Complete {
                break;
            }
        }
    });

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            for frame in data.chunks_mut(channels) {
                let sample = sample_rx.pop().unwrap_or(0.0);
                frame.fill(sample);
            }
        },
        |err| eprintln!("Audio error: {}", err),
        None,
    )?;
    stream.play()?;

    println!("v <0.0-1.0> - volume, s <root> <interval> - scale, q - quit");
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        let mut parts = line.split_whitespace();

        match parts.next() {
            Some("v") => match parts.next().map(str::parse::<f32>) {
                Some(Ok(volume)) => {
                    controller.set_volume(volume);
                }
                _ => eprintln!("usage: v <0.0-1.0>"),
            },
            Some("s") => match (parts.next(), parts.next()) {
                (Some(root), Some(interval)) => {
                    match (root.parse(), interval.parse()) {
                        (Ok(root), Ok(interval)) => {
                            controller.set_scale(root, interval);
                        }
                        (Err(e), _) | (_, Err(e)) => eprintln!("{}", e),
                    }
                }
                _ => eprintln!("usage: s <root> <interval> (e.g. s C major)"),
            },
            Some("q") => break,
            Some(_) | None => {
                eprintln!("v <0.0-1.0> - volume, s <root> <interval> - scale, q - quit");
            }
        }
        print!("> ");
        io::stdout().flush().ok();
    }

    println!("Fading out...");
    controller.stop();
    render
        .join()
        .map_err(|_| eyre!("render thread panicked"))?;

    Ok(())
}
