use chromavis_core::config::ConfigError;
use chromavis_core::{
    compute_distance, log_distance_summary, project_colour_space, subset_by_label, EngineConfig,
    QuantumCatches, SpaceId, VisualMeta,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let options = config.distance_options();
    println!(
        "Loaded config: noise={:?} densities={:?} weber={:?}",
        options.noise, options.densities, options.weber
    );

    let catches = QuantumCatches::from_rows(
        &["crown", "throat", "wing.1", "wing.2"],
        &["u", "s", "m", "l"],
        &[
            vec![12.0, 18.0, 35.0, 60.0],
            vec![40.0, 22.0, 20.0, 21.0],
            vec![8.0, 30.0, 44.0, 42.0],
            vec![9.0, 29.0, 45.0, 40.0],
        ],
        VisualMeta::new(4).with_visual_system("avg.uv"),
    )?;

    let tcs = project_colour_space(&catches, SpaceId::Tetrahedral, &config.space_params())?;
    for (label, d) in tcs.labels().iter().zip(tcs.descriptors()) {
        println!(
            "{label:>8}: r_vec={:.4} hue={:.3} r_achieved={:.3}",
            d.r_vec, d.hue, d.r_achieved
        );
    }

    let distances = compute_distance(&catches, &options)?;
    for pair in distances.pairs() {
        println!("{:>8} - {:<8} dS = {:.3} JND", pair.patch1, pair.patch2, pair.ds);
    }

    let wings = subset_by_label(&distances, &["wing"])?;
    println!("{} pairs involve a wing patch", wings.len());

    log_distance_summary("logs/distances.jsonl", &distances)?;
    Ok(())
}

fn load_config() -> Result<EngineConfig, ConfigError> {
    EngineConfig::load_from_file("config/engine.toml").or_else(|err| {
        eprintln!("Falling back to default config: {err}");
        Ok(EngineConfig::default())
    })
}
