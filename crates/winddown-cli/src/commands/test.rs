use std::time::Duration;

use clap::Subcommand;
use winddown_core::alert::{AudioSink, WARNING_CHIME_SPACING};

use crate::audio::CpalAudio;

#[derive(Subcommand)]
pub enum TestAction {
    /// Sound the continuous alarm for a few seconds, then dismiss it
    Alarm,
    /// Play the pre-ritual warning chime
    Chime,
}

pub fn run(action: TestAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut audio = CpalAudio::new();
    match action {
        TestAction::Alarm => {
            println!("sounding test alarm for 4 seconds...");
            if let Err(err) = audio.start_alarm() {
                eprintln!("audio unavailable: {err}");
                return Ok(());
            }
            std::thread::sleep(Duration::from_secs(4));
            audio.stop_alarm();
        }
        TestAction::Chime => {
            println!("playing warning chime...");
            if let Err(err) = audio.play_chime_burst(3, WARNING_CHIME_SPACING) {
                eprintln!("audio unavailable: {err}");
                return Ok(());
            }
            // The burst runs on a background thread; give it time to
            // finish before the process exits.
            std::thread::sleep(WARNING_CHIME_SPACING * 3);
        }
    }
    Ok(())
}
