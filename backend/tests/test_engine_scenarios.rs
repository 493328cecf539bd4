//! End-to-end scenarios through ShowerEngine
//!
//! Two-bin library (10 and 100 GeV, two records per bin). Electromagnetic
//! photons carry t = 1 ns and hadronic photons t = 2 ns, so hit times show
//! which collection a particle was dispatched to.

use hf_shower_core_rs::engine::{ShowerConfig, ShowerEngine, ENERGY_THRESHOLD};
use hf_shower_core_rs::fibre::TransparentFibre;
use hf_shower_core_rs::library::{
    EventInfoRecord, LibraryDocument, LibraryLayout, RecordCollection, ShowerLibraryStore,
};
use hf_shower_core_rs::models::{IncidentStep, PhotonSample};
use hf_shower_core_rs::rng::{FixedSource, RngManager};
use nalgebra::Vector3;
use std::collections::BTreeMap;

const GEV: f64 = 1000.0;

// ============================================================================
// Test Helpers
// ============================================================================

fn collection(t: f64) -> RecordCollection {
    let record: Vec<PhotonSample> = (0..3).map(|_| PhotonSample::new(0.0, 0.0, 10.0, 450.0, t)).collect();
    RecordCollection::Structured(vec![record; 4])
}

fn document() -> LibraryDocument {
    let mut collections = BTreeMap::new();
    collections.insert("emParticles".to_string(), collection(1.0));
    collections.insert("hadParticles".to_string(), collection(2.0));
    LibraryDocument {
        layout: LibraryLayout::Legacy,
        event_info: Some(EventInfoRecord {
            total_events: 4,
            number_of_bins: 2,
            events_per_bin: 2,
            shower_library_version: 1.2,
            phys_list_version: 3.6,
            energy_bins: vec![10.0, 100.0],
        }),
        collections,
    }
}

fn engine() -> ShowerEngine {
    let config = ShowerConfig::default();
    let store = ShowerLibraryStore::from_document(document(), &config.store_options()).unwrap();
    ShowerEngine::with_parts(&config, store, TransparentFibre).unwrap()
}

fn step(pdg_code: i32, baryon_number: i32, kinetic_energy: f64, total_energy: f64) -> IncidentStep {
    IncidentStep {
        hit_point: Vector3::new(300.0, 0.0, 11200.0),
        momentum_direction: Vector3::z(),
        pdg_code,
        is_ion: false,
        baryon_number,
        kinetic_energy,
        total_energy,
        global_time: 0.0,
    }
}

fn fill(engine: &mut ShowerEngine, pdg_code: i32, energy: f64) -> hf_shower_core_rs::ShowerOutcome {
    engine.fill_hits(
        Vector3::new(300.0, 0.0, 11200.0),
        &Vector3::z(),
        pdg_code,
        energy,
        1.0,
        0.0,
        false,
        &mut FixedSource::new(0.0),
    )
}

// ============================================================================
// Classification and threshold
// ============================================================================

#[test]
fn test_below_threshold_is_handled_without_hits() {
    let mut engine = engine();
    let outcome = fill(&mut engine, 22, 49.0);
    assert!(outcome.handled);
    assert!(outcome.hits.is_empty());
}

#[test]
fn test_threshold_is_inclusive() {
    let mut engine = engine();
    let outcome = fill(&mut engine, 11, ENERGY_THRESHOLD);
    assert!(outcome.handled);
    assert_eq!(outcome.hits.len(), 3);
}

#[test]
fn test_non_finite_energy_is_handled_without_hits() {
    let mut engine = engine();
    for energy in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
        let outcome = fill(&mut engine, 11, energy);
        assert!(outcome.handled);
        assert!(outcome.hits.is_empty());
    }
}

#[test]
fn test_early_returns_clear_photon_buffer() {
    let mut engine = engine();
    fill(&mut engine, 11, 50.0 * GEV);
    assert_eq!(engine.photon_buffer().npe(), 3);

    fill(&mut engine, 13, 50.0 * GEV);
    assert!(engine.photon_buffer().is_empty());

    fill(&mut engine, 11, 50.0 * GEV);
    fill(&mut engine, 22, 49.0);
    assert!(engine.photon_buffer().is_empty());
}

#[test]
fn test_unsupported_particle_is_not_handled() {
    let mut engine = engine();
    for pdg in [13, -13, 12, 111, 3122] {
        let outcome = fill(&mut engine, pdg, 50.0 * GEV);
        assert!(!outcome.handled, "pdg {} should not be handled", pdg);
        assert!(outcome.hits.is_empty());
    }
}

#[test]
fn test_electromagnetic_dispatch() {
    let mut engine = engine();
    for pdg in [22, 11, -11] {
        let outcome = fill(&mut engine, pdg, 50.0 * GEV);
        assert!(outcome.handled);
        assert_eq!(outcome.hits.len(), 3);
        assert!(outcome.hits.iter().all(|h| h.time == 1.0), "pdg {} used the wrong collection", pdg);
    }
}

#[test]
fn test_hadronic_dispatch() {
    let mut engine = engine();
    for pdg in [211, -211, 321, 130, 2212, -2112, 1000010020] {
        let outcome = fill(&mut engine, pdg, 50.0 * GEV);
        assert!(outcome.handled);
        assert_eq!(outcome.hits.len(), 3);
        assert!(outcome.hits.iter().all(|h| h.time == 2.0), "pdg {} used the wrong collection", pdg);
    }
}

// ============================================================================
// Step handling
// ============================================================================

#[test]
fn test_ions_are_showered_as_alpha() {
    let mut engine = engine();
    let mut carbon = step(1000060120, 12, 50.0 * GEV, 61.2 * GEV);
    carbon.is_ion = true;

    let outcome = engine.get_hits(&carbon, 1.0, false, &mut FixedSource::new(0.0));
    assert!(outcome.handled);
    assert!(outcome.hits.iter().all(|h| h.time == 2.0));
}

#[test]
fn test_baryons_use_kinetic_energy() {
    let mut engine = engine();
    // 40 MeV kinetic proton: total energy is far above threshold, kinetic is not
    let proton = step(2212, 1, 40.0, 978.3);
    let outcome = engine.get_hits(&proton, 1.0, false, &mut FixedSource::new(0.0));
    assert!(outcome.handled);
    assert!(outcome.hits.is_empty());

    // A pion with the same numbers uses its total energy
    let pion = step(211, 0, 40.0, 978.3);
    let outcome = engine.get_hits(&pion, 1.0, false, &mut FixedSource::new(0.0));
    assert_eq!(outcome.hits.len(), 3);
}

#[test]
fn test_global_time_is_the_time_slice() {
    let mut engine = engine();
    let mut electron = step(11, 0, 20.0 * GEV, 20.0 * GEV);
    electron.global_time = 25.0;

    let outcome = engine.get_hits(&electron, 1.0, false, &mut FixedSource::new(0.0));
    assert!(!outcome.hits.is_empty());
    assert!(outcome.hits.iter().all(|h| h.time == 26.0));
}

#[test]
fn test_zero_weight_rejects_everything() {
    let mut engine = engine();
    let electron = step(11, 0, 20.0 * GEV, 20.0 * GEV);
    let outcome = engine.get_hits(&electron, 0.0, false, &mut FixedSource::new(0.5));
    assert!(outcome.handled);
    assert!(outcome.hits.is_empty());
}

#[test]
fn test_same_seed_same_hits() {
    let mut a = engine();
    let mut b = engine();
    let pion = step(211, 0, 150.0 * GEV, 150.0 * GEV);

    let mut rng_a = RngManager::new(99);
    let mut rng_b = RngManager::new(99);
    for _ in 0..20 {
        assert_eq!(
            a.get_hits(&pion, 1.0, false, &mut rng_a),
            b.get_hits(&pion, 1.0, false, &mut rng_b)
        );
    }
}

// ============================================================================
// Construction from files
// ============================================================================

#[test]
fn test_from_config_resolves_library_next_to_config() {
    let dir = std::env::temp_dir().join(format!("hf_shower_engine_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("library.json"), serde_json::to_string(&document()).unwrap()).unwrap();
    std::fs::write(
        dir.join("config.json"),
        r#"{"shower": {"prob_max": 1.0}, "library": {"file_name": "library.json", "verbosity": true}}"#,
    )
    .unwrap();

    let config = ShowerConfig::from_path(dir.join("config.json")).unwrap();
    let engine = ShowerEngine::from_config(&config);
    std::fs::remove_dir_all(&dir).unwrap();

    let mut engine = engine.unwrap();
    assert_eq!(engine.metadata().total_events, 4);
    assert_eq!(engine.config_hash(), config.config_hash().unwrap());

    let outcome = fill(&mut engine, 11, 50.0 * GEV);
    assert_eq!(outcome.hits.len(), 3);
}

#[test]
fn test_missing_library_file_is_fatal() {
    let config = ShowerConfig::from_json_str(r#"{"library": {"file_name": "/nonexistent/hf_library.json"}}"#).unwrap();
    let err = ShowerEngine::from_config(&config).unwrap_err();
    assert!(err.to_string().contains("hf_library.json"));
}
