use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Run the binary with an isolated config directory and no colors.
fn taxofacet(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("taxofacet").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("NO_COLOR", "1")
        .env_remove("TAXOFACET_LOG")
        .env_remove("TAXOFACET_PAGE_SIZE")
        .env_remove("TAXOFACET_SHUFFLE_SEED")
        .env_remove("TAXOFACET_TAXONOMY_FILE")
        .env("TAXOFACET_SHUFFLE_TIES", "false");
    cmd
}

fn write_listings(dir: &TempDir) -> std::path::PathBuf {
    let rows = json!([
        {
            "id": "0b6f2c4e-8d1a-4a53-9a1e-2f1d0c3b4a51",
            "title": "Skoda Octavia",
            "price": 42000,
            "location": "Warszawa",
            "created_at": "2025-05-01T08:00:00Z",
            "category": "Motoryzacja",
            "subcategory": "Samochody osobowe",
            "attributes": "{\"fuel_type\":\"Diesel\",\"year\":2017}"
        },
        {
            "id": "5c3a9f10-1e2b-4c7d-8e9f-0a1b2c3d4e5f",
            "title": "Fiat Panda",
            "price": 9000,
            "location": "Warszawa",
            "created_at": "2025-05-02T08:00:00Z",
            "category": "Motoryzacja",
            "subcategory": "Samochody osobowe",
            "attributes": "{\"fuel_type\":\"Benzyna\"}"
        },
        {
            "id": "9a8b7c6d-5e4f-4a3b-8c2d-1e0f9a8b7c6d",
            "title": "Wyróżniony Passat",
            "price": 31000,
            "location": "Poznań",
            "promoted": true,
            "created_at": "2025-04-01T08:00:00Z",
            "category": "Motoryzacja",
            "subcategory": "Samochody osobowe",
            "attributes": "not json"
        }
    ]);
    let path = dir.path().join("listings.json");
    fs::write(&path, serde_json::to_string_pretty(&rows).unwrap()).unwrap();
    path
}

#[test]
fn test_tree_lists_categories() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["tree"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Motoryzacja"))
        .stdout(predicate::str::contains("Konsole/Gry"));
}

#[test]
fn test_schema_shows_subsubcategory_fields() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["schema", "Elektronika", "Telefony i Akcesoria", "Smartfony"])
        .assert()
        .success()
        .stdout(predicate::str::contains("subsubcategory schema"))
        .stdout(predicate::str::contains("dual_sim"));
}

#[test]
fn test_schema_for_unknown_path_warns() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["schema", "Motoryzacja", "Łodzie"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No attribute fields."))
        .stderr(predicate::str::contains("closest match is 'Motoryzacja'"));
}

#[test]
fn test_compile_prints_both_queries() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args([
            "compile",
            "Motoryzacja",
            "Samochody osobowe",
            "--city",
            "Warszawa",
            "--min",
            "5000",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "WHERE category = 'Motoryzacja' AND subcategory = 'Samochody osobowe' \
             AND location ILIKE '%Warszawa%' AND price >= 5000 \
             ORDER BY promoted DESC, created_at DESC LIMIT 12 OFFSET 0",
        ))
        .stdout(predicate::str::contains("SELECT COUNT(*)"));
}

#[test]
fn test_compile_json_from_url() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["compile", "--json", "--url", "/search/Moda?sortBy=popular"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"limit\": 12"))
        .stdout(predicate::str::contains("\"field\": \"views\""));
}

#[test]
fn test_url_encode_and_decode() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["url", "encode", "Elektronika", "Konsole/Gry", "--query", "pad"])
        .assert()
        .success()
        .stdout("/search/Elektronika/Konsole~sGry?q=pad\n");

    taxofacet(&home)
        .args(["url", "decode", "/search/Elektronika/Konsole~sGry?q=pad"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"subcategory\": \"Konsole/Gry\""));
}

#[test]
fn test_url_outside_search_fails() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["url", "decode", "/konto"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error: Invalid search URL"));
}

#[test]
fn test_search_over_listings_file() {
    let home = TempDir::new().unwrap();
    let listings = write_listings(&home);
    taxofacet(&home)
        .args(["search", "Motoryzacja", "--listings"])
        .arg(&listings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wyróżniony Passat"))
        .stdout(predicate::str::contains("Showing 3 of 3"));
}

#[test]
fn test_search_json_applies_attribute_facet() {
    let home = TempDir::new().unwrap();
    let listings = write_listings(&home);
    let output = taxofacet(&home)
        .args([
            "search",
            "Motoryzacja",
            "Samochody osobowe",
            "--attr",
            "fuel_type=Diesel",
            "--json",
            "--listings",
        ])
        .arg(&listings)
        .output()
        .unwrap();
    assert!(output.status.success());

    let results: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(results["page_info"]["total"], 1);
    assert_eq!(results["listings"][0]["title"], "Skoda Octavia");
    assert_eq!(results["listings"][0]["attributes"]["year"], 2017.0);
}

#[test]
fn test_search_with_inverted_range_finds_nothing() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["search", "--min", "8000", "--max", "5000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No listings found."));
}

#[test]
fn test_invalid_attribute_value_is_rejected() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args([
            "search",
            "Elektronika",
            "Telefony i Akcesoria",
            "Smartfony",
            "--attr",
            "brand=Nokla",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("brand: 'Nokla' is not one of the allowed options"));
}

#[test]
fn test_config_file_sets_page_size() {
    let home = TempDir::new().unwrap();
    let listings = write_listings(&home);
    let config = home.path().join("custom.toml");
    fs::write(&config, "page_size = 1\n").unwrap();

    taxofacet(&home)
        .args(["search", "--more", "1", "--listings"])
        .arg(&listings)
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Showing 2 of 3 (page 2 of 3), more available"));
}

#[test]
fn test_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["tree", "--config", "/nonexistent/taxofacet.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn test_submit_prints_pairs_in_schema_order() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args([
            "submit",
            "Elektronika",
            "Telefony i Akcesoria",
            "Smartfony",
            "--field",
            "brand=Apple",
            "--field",
            "model=iPhone 15",
            "--field",
            "condition=Nowy",
        ])
        .assert()
        .success()
        .stdout("brand=Apple\nmodel=iPhone 15\ncondition=Nowy\ndual_sim=false\n");
}

#[test]
fn test_submit_reports_all_missing_fields() {
    let home = TempDir::new().unwrap();
    taxofacet(&home)
        .args(["submit", "Motoryzacja", "Samochody osobowe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("brand: this field is required"))
        .stderr(predicate::str::contains("fuel_type: this field is required"));
}
