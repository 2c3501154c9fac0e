use std::collections::BTreeMap;

use pallet_synth::prelude::*;
use pallet_synth_examples::init_tracing;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

const WAREHOUSE_RON: &str = include_str!("../../assets/warehouse.ron");

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Start from the tables in the RON file instead of the built-in defaults.
    let config: DistributionConfig =
        ron::de::from_str(WAREHOUSE_RON).map_err(|e| anyhow::anyhow!(e))?;
    let dists = config.build()?;

    let mut rng = StdRng::seed_from_u64(7);
    for stack in 0..5 {
        let height = dists.sample_stack_height(&mut rng);
        info!("Stack {} ({}):", stack, load_tag(height));
        for level in 0..height {
            let class = dists.sample_pallet_class(&mut rng);
            let plank = dists.sample_damaged_plank(&mut rng);
            let missing = dists.sample_missing_brick(&mut rng);
            info!(
                "  level {}: {} pallet, damaged {}, missing {}",
                level,
                class.as_str(),
                plank.tag(),
                missing.tag()
            );
        }
    }

    // Empirical check of the class table.
    let n = 100_000;
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for _ in 0..n {
        *counts
            .entry(dists.sample_pallet_class(&mut rng).as_str())
            .or_default() += 1;
    }
    for (i, (weight, class)) in dists.pallet_class.iter().enumerate() {
        let observed = counts.get(class.as_str()).copied().unwrap_or(0) as f64 / n as f64;
        info!(
            "{:>7}: weight {:.2} (p = {:.3}), observed {:.3}",
            class.as_str(),
            weight,
            dists.pallet_class.probability(i).unwrap_or(0.0),
            observed
        );
    }

    Ok(())
}
