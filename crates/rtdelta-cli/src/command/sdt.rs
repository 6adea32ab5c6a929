use std::path::PathBuf;

use clap::Args;
use rtdelta_analysis::{
    condition::Condition,
    sdt::{PosteriorSummary, SdtCounts, sdt_counts},
};

use crate::util;

#[derive(Debug, Clone, Args)]
pub(crate) struct SdtArg {
    /// Path to the per-trial CSV file
    pub trials: PathBuf,
    /// Posterior summary JSON produced by the external signal-detection model
    #[arg(long)]
    pub posterior: Option<PathBuf>,
}

pub(crate) fn run(arg: &SdtArg) -> anyhow::Result<()> {
    let trials = util::read_trials_file(&arg.trials)?;
    let counts = sdt_counts(&trials);

    println!("Signal Detection Counts");
    println!("=======================\n");
    print_counts(&counts);

    if let Some(path) = &arg.posterior {
        let summary: PosteriorSummary = util::read_json_file("posterior summary", path)?;
        println!();
        print_posterior(&summary);
    }
    Ok(())
}

fn print_counts(counts: &[SdtCounts]) {
    println!(
        "  {:>6} {:<14} {:>6} {:>6} {:>6} {:>6} {:>9} {:>9}",
        "Pnum", "Condition", "Hit", "Miss", "FA", "CR", "Hit rate", "FA rate"
    );
    println!("  {}", "-".repeat(71));
    for c in counts {
        println!(
            "  {:>6} {:<14} {:>6} {:>6} {:>6} {:>6} {:>9} {:>9}",
            c.participant_id,
            c.condition.label(),
            c.hits,
            c.misses,
            c.false_alarms,
            c.correct_rejections,
            util::fmt_value(c.hit_rate()),
            util::fmt_value(c.false_alarm_rate()),
        );
    }
}

fn print_posterior(summary: &PosteriorSummary) {
    println!("Posterior Means per Condition");
    println!("=============================\n");
    println!(
        "  {:<14} {:>10} {:>8} {:>10} {:>8}",
        "Condition", "d'", "sd", "Criterion", "sd"
    );
    println!("  {}", "-".repeat(54));
    for condition in Condition::ALL {
        let Some(posterior) = summary.get(condition) else {
            log::warn!("Posterior summary has no entry for condition {condition}");
            continue;
        };
        println!(
            "  {:<14} {:>10.3} {:>8.3} {:>10.3} {:>8.3}",
            condition.label(),
            posterior.d_prime.mean,
            posterior.d_prime.sd,
            posterior.criterion.mean,
            posterior.criterion.sd,
        );
    }
}
