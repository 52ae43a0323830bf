use burrito_core::db::open_db_in_memory;
use burrito_core::{
    FractalRepository, FractalService, NewFractal, RepoError, SqliteFractalRepository,
    MAX_NAME_CHARS, MAX_STATE_CHARS,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

#[test]
fn add_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    let id = repo
        .add_fractal(&NewFractal::new("Mandelbrot", r#"{"c":-0.75}"#))
        .unwrap();

    let loaded = repo.get_fractal(id).unwrap().unwrap();
    assert_eq!(loaded.id, 1);
    assert_eq!(loaded.name, "Mandelbrot");
    assert_eq!(loaded.state, r#"{"c":-0.75}"#);
}

#[test]
fn get_missing_id_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    assert!(repo.get_fractal(42).unwrap().is_none());
}

#[test]
fn ids_are_assigned_in_insert_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    let first = repo.add_fractal(&NewFractal::new("a", "1")).unwrap();
    let second = repo.add_fractal(&NewFractal::new("b", "2")).unwrap();
    assert!(second > first);

    let listed = repo.list_fractals().unwrap();
    let ids: Vec<_> = listed.iter().map(|fractal| fractal.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(repo.count_fractals().unwrap(), 2);
}

#[test]
fn list_on_empty_table_is_empty() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    assert!(repo.list_fractals().unwrap().is_empty());
    assert_eq!(repo.count_fractals().unwrap(), 0);
}

#[test]
fn oversized_fields_are_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    let err = repo
        .add_fractal(&NewFractal::new("n".repeat(MAX_NAME_CHARS + 1), "{}"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let err = repo
        .add_fractal(&NewFractal::new("julia", "s".repeat(MAX_STATE_CHARS + 1)))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    assert_eq!(repo.count_fractals().unwrap(), 0);
}

#[test]
fn null_columns_are_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute("INSERT INTO fractals (name, state) VALUES (NULL, '{}');", [])
        .unwrap();
    let repo = SqliteFractalRepository::new(&conn);

    let err = repo.list_fractals().unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn service_random_pick_on_empty_store_is_none() {
    let conn = open_db_in_memory().unwrap();
    let service = FractalService::new(SqliteFractalRepository::new(&conn));

    assert!(service.random_fractal().unwrap().is_none());
}

#[test]
fn service_random_pick_returns_stored_records_and_reaches_all_of_them() {
    let conn = open_db_in_memory().unwrap();
    let service = FractalService::new(SqliteFractalRepository::new(&conn));
    for index in 0..4 {
        service
            .add_fractal(format!("fractal-{index}"), format!("{{\"i\":{index}}}"))
            .unwrap();
    }

    let all = service.list_fractals().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = HashSet::new();
    for _ in 0..200 {
        let picked = service.random_fractal_with(&mut rng).unwrap().unwrap();
        assert!(all.contains(&picked));
        seen.insert(picked.id);
    }
    assert_eq!(seen.len(), all.len());
}

#[test]
fn service_add_returns_readable_id() {
    let conn = open_db_in_memory().unwrap();
    let service = FractalService::new(SqliteFractalRepository::new(&conn));

    let id = service.add_fractal("Julia", r#"{"c":[0.285,0.01]}"#).unwrap();
    let loaded = service.get_fractal(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Julia");
    assert_eq!(service.count_fractals().unwrap(), 1);
}
