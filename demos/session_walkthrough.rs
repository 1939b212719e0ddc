//! Session Walkthrough
//!
//! Runs one simulated acquisition day end to end: configuration, file,
//! flies, series in both scan modes, epochs, notes, and a reopen that picks
//! the numbering back up from disk.
//!
//! Run with: cargo run --example session_walkthrough
//! (set RUST_LOG=flylab=debug to see every transaction)

use anyhow::Result;
use flylab_data::counter::ScanMode;
use flylab_data::params::{ParamMap, StimParameters};
use flylab_data::session::{ExperimentSession, SessionConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn params(v: serde_json::Value) -> ParamMap {
    v.as_object().cloned().unwrap_or_default()
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flylab=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== flylab-data session walkthrough ===\n");

    let scratch = tempfile::tempdir()?;

    // -------------------------------------------------------------------------
    // 1. Configuration
    // -------------------------------------------------------------------------
    println!("1. Loading rig configuration...");

    let config = SessionConfig::from_toml_str(&format!(
        r#"
        user_name = "mhturner"
        rig_name = "AODscope"
        experimenter = "Max"

        [rig_config.AODscope]
        data_directory = {:?}
        rig = "AODscope"
        series_counter = "dual"
        "#,
        scratch.path().display().to_string()
    ))?;
    let path = config.experiment_path("2024-05-01")?;
    println!("   Rig: {}", config.rig()?.rig_label());
    println!("   Experiment file: {}", path.display());

    // -------------------------------------------------------------------------
    // 2. File and flies
    // -------------------------------------------------------------------------
    println!("\n2. Creating experiment file and flies...");

    let mut session = ExperimentSession::from_config(&config)?;
    session.initialize_experiment_file(&path)?;

    for (id, genotype) in [("fly1", "w1118"), ("fly2", "R65B05>GCaMP6f")] {
        session.create_fly(&params(json!({
            "fly_id": id,
            "genotype": genotype,
            "sex": "female",
            "age": 3,
            "prep": "Left optic lobe",
        })))?;
        println!("   Created {id} ({genotype})");
    }

    // Duplicate ids are refused and nothing is written
    if let Err(e) = session.create_fly(&params(json!({"fly_id": "fly1"}))) {
        println!("   Rejected: {e}");
    }

    // -------------------------------------------------------------------------
    // 3. Series and epochs
    // -------------------------------------------------------------------------
    println!("\n3. Running protocols on fly1...");

    session.select_fly("fly1");
    for (mode, angles) in [
        (ScanMode::Poi, vec![0, 90]),
        (ScanMode::Xyt, vec![0, 45, 90, 135]),
        (ScanMode::Poi, vec![180]),
    ] {
        session.set_scan_mode(mode)?;
        let id = session.series_count();
        let ordinal = session.create_series(
            &params(json!({"num_epochs": angles.len(), "pre_time": 1.0, "stim_time": 2.0})),
            &params(json!({"width": 10.0, "speed": 80.0, "color": [1.0, 1.0, 1.0]})),
        )?;

        for (i, angle) in angles.iter().enumerate() {
            let stim = StimParameters::from(vec![
                params(json!({"name": "MovingRectangle", "angle": angle})),
                params(json!({"name": "UniformWhiteNoise", "rand_seed": null})),
            ]);
            let number = u32::try_from(i)? + 1;
            session.create_epoch(number, &stim, &params(json!({"current_angle": angle})))?;
        }
        println!(
            "   series_{ordinal:03}: {mode:?} #{id}, {} epochs",
            angles.len()
        );
    }

    session.add_note("fly1 responses weak after series 2")?;

    // -------------------------------------------------------------------------
    // 4. Reopen and continue
    // -------------------------------------------------------------------------
    println!("\n4. Reopening the file...");

    drop(session);
    let mut session = ExperimentSession::from_config(&config)?;
    session.open_experiment_file(&path)?;
    println!("   Next POI id: {}", session.series_count());
    session.set_scan_mode(ScanMode::Xyt)?;
    println!("   Next XYT id: {}", session.series_count());

    session.select_fly("fly2");
    let ordinal = session.create_series(&params(json!({"num_epochs": 1})), &ParamMap::new())?;
    println!("   fly2 starts at series_{ordinal:03}");

    // -------------------------------------------------------------------------
    // 5. Summary
    // -------------------------------------------------------------------------
    println!("\n5. Summary");

    let record = session.experiment_record()?;
    println!("   {} on {} by {}", record.date(), record.rig(), record.experimenter());
    for fly in session.list_flies()? {
        println!("   {}:", fly.fly_id());
        for series in session.list_series(fly.fly_id())? {
            println!(
                "     series_{:03} mode={:?} mode_id={:?} epochs={}",
                series.ordinal(),
                series.scan_mode(),
                series.mode_ordinal(),
                series.epoch_count()
            );
        }
    }
    for note in session.list_notes()? {
        println!("   note @ {}: {}", note.time(), note.text());
    }

    println!("\n=== Done ===");
    Ok(())
}
