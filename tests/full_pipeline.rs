use std::fs;
use std::io::Write;

use listmatch::{run_files, ListmatchConfig, PipelineError};
use serde_json::Value;
use tempfile::{tempdir, NamedTempFile};

const PRODUCTS: &str = r#"{"product_name":"Sony_Cyber-shot_DSC-W310","manufacturer":"Sony","model":"DSC-W310","family":"Cyber-shot","announced-date":"2010-01-06T19:00:00.000-05:00"}
{"product_name":"Samsung_TL240","manufacturer":"Samsung","model":"TL240","announced-date":"2010-01-05T19:00:00.000-05:00"}
{"product_name":"Canon_EOS_7D","manufacturer":"Canon","model":"7D","family":"EOS","announced-date":"2009-08-31T20:00:00.000-04:00"}
"#;

const LISTINGS: &str = r#"{"title":"Sony Cyber-shot DSC-W310 - 12.1MP Digital Camera","manufacturer":"Sony","currency":"USD","price":"109.99"}
{"title":"Samsung TL240 14.2 MP Digital Camera","manufacturer":"Samsung","currency":"GBP","price":"180.00"}

{"title":"Canon EOS 7D 18 MP Digital SLR (Body Only)","manufacturer":"Canon Canada","currency":"CAD","price":"1499.99"}
{"title":"Lens hood for Canon EOS cameras","manufacturer":"JJC","currency":"USD","price":"9.99"}
{"title":"Nikon D90 12.3MP DSLR","manufacturer":"Nikon","currency":"USD","price":"729.00"}
"#;

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}

fn read_lines(path: &std::path::Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read results")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid json line"))
        .collect()
}

#[test]
fn full_pipeline_executes_with_defaults() -> Result<(), PipelineError> {
    let listings = write_temp(LISTINGS);
    let products = write_temp(PRODUCTS);
    let out_dir = tempdir().expect("temp dir");
    let output = out_dir.path().join("results.json");

    let summary = run_files(
        listings.path(),
        products.path(),
        &output,
        4,
        &ListmatchConfig::default(),
    )?;

    assert_eq!(summary.listings, 5);
    assert_eq!(summary.products, 3);
    assert_eq!(summary.accepted_listings, 3);
    assert!(summary.matched_listings >= summary.accepted_listings);

    let lines = read_lines(&output);
    assert_eq!(lines.len(), 3);

    let names: Vec<&str> = lines
        .iter()
        .map(|line| line["product_name"].as_str().expect("product_name"))
        .collect();
    assert_eq!(
        names,
        vec!["Sony_Cyber-shot_DSC-W310", "Samsung_TL240", "Canon_EOS_7D"]
    );

    for line in &lines {
        let listings = line["listings"].as_array().expect("listings array");
        assert_eq!(listings.len(), 1, "{line}");
        for key in ["title", "manufacturer", "currency", "price"] {
            assert!(listings[0][key].is_string(), "missing {key}");
        }
    }
    assert_eq!(lines[2]["listings"][0]["price"], "1499.99");

    Ok(())
}

#[test]
fn single_worker_matches_many_workers() -> Result<(), PipelineError> {
    let listings = write_temp(LISTINGS);
    let products = write_temp(PRODUCTS);
    let out_dir = tempdir().expect("temp dir");
    let one = out_dir.path().join("one.txt");
    let many = out_dir.path().join("many.txt");
    let cfg = ListmatchConfig::default();

    run_files(listings.path(), products.path(), &one, 1, &cfg)?;
    run_files(listings.path(), products.path(), &many, 8, &cfg)?;

    assert_eq!(read_lines(&one), read_lines(&many));
    Ok(())
}

#[test]
fn higher_threshold_drops_weaker_matches() -> Result<(), PipelineError> {
    let listings = write_temp(LISTINGS);
    let products = write_temp(PRODUCTS);
    let out_dir = tempdir().expect("temp dir");
    let output = out_dir.path().join("results.json");

    let mut cfg = ListmatchConfig::default();
    cfg.matcher.acceptance_threshold = 1.5;
    let summary = run_files(listings.path(), products.path(), &output, 2, &cfg)?;

    assert_eq!(summary.accepted_listings, 0);
    for line in read_lines(&output) {
        assert!(line["listings"].as_array().expect("array").is_empty());
    }
    Ok(())
}
