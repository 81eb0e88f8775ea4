#![cfg(feature = "microlp")]

use milpkit::{
    Domain, Model, ModelError, ServiceBackend, SolutionStatus, SolverBackend, SolverConfig,
    Variable,
};
use std::path::Path;

const EPS: f64 = 1e-6;

fn model() -> Model<ServiceBackend> {
    Model::with_config(SolverConfig::new(SolverBackend::MicroLp)).unwrap()
}

/// x + y <= 10, maximize x + y; returns the handle of x.
fn build(m: &mut Model<ServiceBackend>) -> Variable {
    let x = m.create("x", Domain::NON_NEGATIVE_INTEGER).unwrap();
    let y = m.create("y", Domain::BINARY_INTEGER).unwrap();
    let free = m.create("free", Domain::ANY_REAL).unwrap();
    let z = m.sum(x, y, Domain::ANY_INTEGER).unwrap();
    let ten = m.named_constant("ten", 10, Domain::NON_NEGATIVE_CONSTANT_INTEGER).unwrap();
    m.set_less_or_equal(z, ten).unwrap();
    m.set_equal(free, ten).unwrap();
    m.maximize(z).unwrap();
    x
}

fn round_trip(path: &Path) {
    let mut original = model();
    let x = build(&mut original);
    let saved = original.snapshot();
    original.save_model(path).unwrap();

    let mut restored = model();
    let loaded = restored.load_model(path).unwrap();
    assert_eq!(loaded, saved);
    restored.verify_snapshot(saved).unwrap();

    let y = restored.variable_by_name("y").unwrap();
    assert_eq!(restored.domain(y).unwrap(), Domain::BINARY_INTEGER);
    let x2 = restored.variable_by_name("x").unwrap();
    assert_eq!(restored.domain(x2).unwrap(), Domain::NON_NEGATIVE_INTEGER);
    let free = restored.variable_by_name("free").unwrap();
    assert_eq!(restored.domain(free).unwrap(), Domain::ANY_REAL);
    assert_eq!(x2.id(), x.id());

    let z = restored.variable_by_name("_t1").unwrap();
    let objective = restored.objective().unwrap();
    assert_eq!(objective.coefficient(z.id()), 1.0);
    assert_eq!(objective.terms(), vec![(z.id(), 1.0)]);

    assert_eq!(restored.solve().unwrap(), SolutionStatus::Optimal);
    assert!((restored.value_by_name("_t1").unwrap() - 10.0).abs() < EPS);
    assert!((restored.value(free).unwrap() - 10.0).abs() < EPS);
}

#[test]
fn native_json_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    round_trip(&dir.path().join("model.json"));
}

#[test]
fn mps_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.mps");
    round_trip(&path);
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("OBJSENSE"));
    assert!(text.contains(" BV BND  y"));
    assert!(text.trim_end().ends_with("ENDATA"));
}

#[test]
fn reload_invalidates_earlier_handles() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let mut m = model();
    let x = build(&mut m);
    m.save_model(&path).unwrap();

    m.load_model(&path).unwrap();
    assert!(matches!(m.name(x), Err(ModelError::StaleVariable(_))));
    let fresh = m.variable_by_name("x").unwrap();
    assert_eq!(m.name(fresh).unwrap(), "x");
    assert_eq!(m.constant_value(m.variable_by_name("ten").unwrap()).unwrap(), None);
}

#[test]
fn loaded_model_keeps_growing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    let mut m = model();
    build(&mut m);
    m.save_model(&path).unwrap();

    let mut restored = model();
    let before = restored.load_model(&path).unwrap();
    let x = restored.variable_by_name("x").unwrap();
    let cap = restored.from_constant(3, Domain::NON_NEGATIVE_CONSTANT_INTEGER).unwrap();
    restored.set_less_or_equal(x, cap).unwrap();
    assert_eq!(restored.columns(), before.columns + 1);
    assert_eq!(restored.rows(), before.rows + 2);
    assert!(restored.name(cap).unwrap().starts_with("_t"));
    restored.maximize(x).unwrap();
    assert_eq!(restored.solve().unwrap(), SolutionStatus::Optimal);
    assert!((restored.value(x).unwrap() - 3.0).abs() < EPS);
}

#[test]
fn failed_load_poisons_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut m = model();
    let err = m.load_model(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(err.code(), "BACKEND_REJECTED");
    assert!(m.is_poisoned());
}
