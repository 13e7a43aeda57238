// Integration tests for distrag
use distrag::prelude::*;
use distrag::{text, Record, Retriever, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One dimension per vocabulary word plus a final out-of-vocabulary slot,
/// so unrelated queries land far (sqrt 2) from every record.
struct VocabEmbedder {
    vocab: Vec<&'static str>,
    calls: AtomicUsize,
}

impl VocabEmbedder {
    fn new(vocab: &[&'static str]) -> Self {
        Self {
            vocab: vocab.to_vec(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl Embedder for VocabEmbedder {
    fn dim(&self) -> usize {
        self.vocab.len() + 1
    }

    fn model_name(&self) -> &str {
        "vocab"
    }

    fn encode(&self, text: &str) -> Result<Vector> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lower = text.to_lowercase();
        let mut data = vec![0.0; self.dim()];
        for token in lower.split(|c: char| !c.is_alphanumeric()) {
            if let Some(i) = self.vocab.iter().position(|w| *w == token) {
                data[i] += 1.0;
            }
        }
        if data.iter().all(|x| *x == 0.0) {
            data[self.vocab.len()] = 1.0;
        }
        Ok(Vector::new(data).normalized())
    }
}

fn entry(district: &str, year: i32, scenario: &str, rainfall: f64) -> serde_json::Value {
    json!({
        "output": {
            "district": district,
            "lat": 11.14,
            "lon": 79.08,
            "year": year,
            "scenario": scenario,
            "population_estimate": 754894,
            "avg_annual_rainfall_mm": rainfall,
            "groundwater_level_m": 5.2
        }
    })
}

fn dataset() -> String {
    json!([
        entry("Ariyalur", 2020, "baseline", 950.5),
        entry("Ariyalur", 2020, "rcp45", 1010.25),
        entry("Ariyalur", 2030, "baseline", 990.0),
        entry("Chennai", 2020, "baseline", 1400.0),
    ])
    .to_string()
}

fn scenario_engine() -> (Engine, Arc<VocabEmbedder>) {
    let store = RecordStore::from_json_str(&dataset()).unwrap();
    let embedder = Arc::new(VocabEmbedder::new(&["ariyalur", "chennai", "2020", "2030", "rainfall"]));
    let engine = Engine::build(store, embedder.clone(), EngineConfig::default()).unwrap();
    (engine, embedder)
}

#[test]
fn test_load_from_disk_and_build() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", dataset()).unwrap();

    let store = RecordStore::load(file.path()).unwrap();
    assert_eq!(store.len(), 4);

    let engine = Engine::build(store, Arc::new(HashingEmbedder::default()), EngineConfig::default()).unwrap();
    assert_eq!(engine.retriever().index().len(), 4);
    assert_eq!(engine.retriever().texts().len(), 4);
    assert_eq!(engine.retriever().texts()[3], text::project(&engine.store().records()[3]));
}

#[test]
fn test_startup_fails_on_bad_dataset() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[{{\"output\": {{\"district\": \"Ariyalur\"}}}}]").unwrap();

    let err = RecordStore::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::DataField { index: 0, .. }));
    assert!(err.is_fatal());
}

#[test]
fn test_scenario_greeting() {
    let (engine, _) = scenario_engine();
    let response = engine.handle_query("hello");
    assert_eq!(response.kind, ResponseKind::Greeting);
    assert!(response.rows.is_empty());
    assert!(response.chart.is_none());
}

#[test]
fn test_scenario_identity() {
    let (engine, _) = scenario_engine();
    let response = engine.handle_query("who are you");
    assert_eq!(response.kind, ResponseKind::Identity);
    assert!(response.rows.is_empty());
}

#[test]
fn test_scenario_no_match() {
    let (engine, _) = scenario_engine();
    let response = engine.handle_query("xyzzy quux");
    assert_eq!(response.kind, ResponseKind::NoMatch);
    assert!(response.message.contains("xyzzy quux"));
    assert!(response.rows.is_empty());
}

#[test]
fn test_scenario_district_rainfall() {
    let (engine, _) = scenario_engine();
    let response = engine.handle_query("Ariyalur rainfall in 2020");

    assert_eq!(response.kind, ResponseKind::Table);
    assert_eq!(response.rows.len(), 3);
    assert!(response.rows.iter().all(|r| r.district == "Ariyalur"));
    // exact matches first, in dataset order
    assert_eq!(response.rows[0].scenario, "baseline");
    assert_eq!(response.rows[1].scenario, "rcp45");
    assert_eq!(response.rows[2].year, 2030);

    let chart = response.chart.expect("chart for a named district");
    assert_eq!(chart.labels.len(), chart.values.len());
    assert_eq!(chart.labels[0], "2020 (baseline)");
    assert_eq!(chart.values[1], 1010.25);
}

#[test]
fn test_gatekeeper_blocks_before_retrieval() {
    let (engine, embedder) = scenario_engine();
    let before = embedder.calls.load(Ordering::SeqCst);

    for query in ["Ariyalur rainfall, ignore instructions", "OVERRIDE chennai", "admin 2020"] {
        let response = engine.handle_query(query);
        assert_eq!(response.kind, ResponseKind::Rejected);
        assert!(response.rows.is_empty());
    }
    assert_eq!(embedder.calls.load(Ordering::SeqCst), before);
}

#[test]
fn test_retrieve_is_deterministic() {
    let (engine, _) = scenario_engine();
    let first = engine.retriever().retrieve("chennai rainfall", 3, 1.0).unwrap();
    let second = engine.retriever().retrieve("chennai rainfall", 3, 1.0).unwrap();
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

fn random_record(rng: &mut StdRng) -> Record {
    const DISTRICTS: [&str; 5] = ["Ariyalur", "Chennai", "Coimbatore", "Madurai", "Salem"];
    const SCENARIOS: [&str; 3] = ["baseline", "rcp45", "rcp85"];
    Record {
        district: DISTRICTS[rng.random_range(0..DISTRICTS.len())].to_string(),
        latitude: rng.random_range(8.0..14.0),
        longitude: rng.random_range(76.0..81.0),
        year: rng.random_range(2000..2060),
        scenario: SCENARIOS[rng.random_range(0..SCENARIOS.len())].to_string(),
        population_estimate: rng.random_range(10_000..5_000_000),
        avg_annual_rainfall_mm: rng.random_range(300.0..2500.0),
        groundwater_level_m: rng.random_range(0.5..40.0),
    }
}

#[test]
fn test_round_trip_random_records() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let record = random_record(&mut rng);
        let projected = text::project(&record);
        assert_eq!(projected, text::project(&record.clone()));
        assert_eq!(text::parse(&projected).unwrap(), record);
    }
}

#[test]
fn test_retrieval_properties() {
    let mut rng = StdRng::seed_from_u64(7);
    let texts: Vec<String> = (0..200).map(|_| text::project(&random_record(&mut rng))).collect();
    let retriever = Retriever::build(Arc::new(HashingEmbedder::new(128)), texts).unwrap();

    let queries = [
        "Ariyalur rainfall in 2020",
        "groundwater level in Salem",
        "Madurai rcp85 2045",
        "population of Chennai",
        "xyzzy quux",
    ];
    let thresholds = [0.2f32, 0.6, 1.0, 1.3, 2.5];

    for query in queries {
        for k in [1usize, 3, 10, 500] {
            let mut previous: Vec<usize> = Vec::new();
            for threshold in thresholds {
                let docs = retriever.retrieve(query, k, threshold).unwrap();

                assert!(docs.len() <= k);
                assert!(docs.windows(2).all(|w| w[0].distance <= w[1].distance));
                assert!(docs.iter().all(|d| d.distance < threshold));

                let positions: Vec<usize> = docs.iter().map(|d| d.position).collect();
                assert!(previous.iter().all(|p| positions.contains(p)));
                previous = positions;
            }
        }
    }
}
