//! Progress bar utilities

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Progress bar counting rendered frames
///
/// Hidden when `quiet` is set so scripted runs only print errors.
pub fn frame_progress_bar(frames: u32, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::with_draw_target(Some(u64::from(frames)), ProgressDrawTarget::hidden());
    }

    let pb = ProgressBar::new(u64::from(frames));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} frame {pos}/{len} (eta {eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
