//! Exposure timing: NDIT and NEXP derived from the DIT of the science star.
//!
//! An OB lasts nominally 1800 s of which 900 s are acquisition and setup. The remaining
//! time is split into exposures of `NDIT * DIT` plus a fixed readout overhead, arranged as
//! object/sky/object triplets.

use crate::ui::Ui;

/// Integration time aimed for per exposure, in seconds.
pub const TARGET_INTEGRATION: f64 = 300.0;
pub const MIN_NDIT: i64 = 10;
pub const MAX_NDIT: i64 = 300;
/// Readout and offset overhead per exposure, in seconds.
pub const EXPOSURE_OVERHEAD: f64 = 40.0;
pub const OB_DURATION: f64 = 1800.0;
pub const OB_SETUP_TIME: f64 = 900.0;
/// Shortest sequence is `O S O`.
pub const MIN_NEXP: i64 = 3;
pub const NEXP_WRAP: i64 = 40;
pub const SEQUENCE_PATTERN: &str =
    "O S O O S O O S O O S O O S O O S O O S O O S O O S O O S O O S O O S O O S O O";

/// Values written to `DET2.DIT`, `DET2.NDIT.OBJECT`/`SKY` and `SEQ.OBSSEQ`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureTiming {
    pub dit: f64,
    pub ndit: i64,
    pub nexp: i64,
    pub sequence: String,
}

/// `clamp(round(300 / DIT), 10, 300)`
pub fn ndit_for(dit: f64) -> i64 {
    (TARGET_INTEGRATION / dit)
        .round()
        .clamp(MIN_NDIT as f64, MAX_NDIT as f64) as i64
}

/// First `2 * nexp` characters of the observing sequence pattern.
pub fn observation_sequence(nexp: i64) -> String {
    let len = usize::try_from(2 * nexp).unwrap_or(0);
    SEQUENCE_PATTERN
        .get(..len)
        .unwrap_or(SEQUENCE_PATTERN)
        .to_string()
}

/// Derive NDIT, NEXP and the observing sequence for a given DIT.
///
/// When fewer than three exposures fit into the OB, three are forced and NDIT is recomputed
/// to fit; if that drives NDIT under its minimum the OB will overrun and a warning is logged.
/// NEXP is finally taken modulo 40, so a value of 45 becomes 5.
pub fn compute_exposure_timing(dit: f64, ui: &mut dyn Ui) -> ExposureTiming {
    let mut ndit = ndit_for(dit);
    let mut exposure = ndit as f64 * dit + EXPOSURE_OVERHEAD;
    let mut nexp = ((OB_DURATION - OB_SETUP_TIME) / exposure).floor() as i64;
    ui.add_to_log(
        &format!(
            "number of exposures to reach {} s per OB is {}",
            OB_DURATION, nexp
        ),
        true,
    );

    if nexp < MIN_NEXP {
        nexp = MIN_NEXP;
        exposure = (OB_DURATION - OB_SETUP_TIME) / nexp as f64;
        ndit = ((exposure - EXPOSURE_OVERHEAD) / dit).floor() as i64;
        if ndit < MIN_NDIT {
            ndit = MIN_NDIT;
            let msg = format!(
                "**Warning**, OB NDIT has been set to min value={}, but OB will take longer than {} s",
                ndit, OB_DURATION
            );
            log::warn!("{}", msg);
            ui.add_to_log(&msg, true);
        }
    }

    // wraps, does not saturate
    nexp %= NEXP_WRAP;

    ExposureTiming {
        dit,
        ndit,
        nexp,
        sequence: observation_sequence(nexp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::RecordingUi;
    use proptest::prelude::*;

    #[test]
    fn test_ndit_clamping() {
        assert_eq!(ndit_for(1.0), 300);
        assert_eq!(ndit_for(50.0), 10);
        assert_eq!(ndit_for(7.0), 43);
        assert_eq!(ndit_for(0.3), 300);
    }

    #[test]
    fn test_forced_three_exposures() {
        let mut ui = RecordingUi::new();
        let timing = compute_exposure_timing(10.0, &mut ui);
        assert_eq!(timing.nexp, 3);
        assert_eq!(timing.ndit, 26);
        assert_eq!(timing.sequence, "O S O ");
        assert!(ui.log_contains("per OB is 2"));
        assert!(!ui.log_contains("**Warning**"));
    }

    #[test]
    fn test_ndit_floor_warns() {
        let mut ui = RecordingUi::new();
        let timing = compute_exposure_timing(30.0, &mut ui);
        assert_eq!(timing.nexp, 3);
        assert_eq!(timing.ndit, 10);
        assert!(ui.log_contains("**Warning**, OB NDIT has been set to min value=10"));
    }

    #[test]
    fn test_short_dit_allows_more_exposures() {
        let mut ui = RecordingUi::new();
        let timing = compute_exposure_timing(0.3, &mut ui);
        assert_eq!(timing.ndit, 300);
        assert_eq!(timing.nexp, 6);
        assert_eq!(timing.sequence, "O S O O S O ");
    }

    #[test]
    fn test_nexp_wraps_instead_of_saturating() {
        // NDIT clamps to 10, exposure = 10 * -2 + 40 = 20 s, 900 / 20 = 45 exposures -> 5
        let mut ui = RecordingUi::new();
        let timing = compute_exposure_timing(-2.0, &mut ui);
        assert_eq!(timing.nexp, 5);
        assert_eq!(timing.sequence.len(), 10);
    }

    #[test]
    fn test_sequence_longer_than_pattern_is_capped() {
        assert_eq!(observation_sequence(60), SEQUENCE_PATTERN);
        assert_eq!(observation_sequence(0), "");
    }

    proptest! {
        #[test]
        fn prop_timing_invariants(dit in 0.01f64..200.0) {
            let mut ui = RecordingUi::new();
            let timing = compute_exposure_timing(dit, &mut ui);
            prop_assert!(timing.nexp >= MIN_NEXP);
            prop_assert!(timing.ndit >= MIN_NDIT && timing.ndit <= MAX_NDIT);
            prop_assert_eq!(timing.sequence.len() as i64, 2 * timing.nexp);
            prop_assert!(SEQUENCE_PATTERN.starts_with(&timing.sequence));
        }
    }
}
