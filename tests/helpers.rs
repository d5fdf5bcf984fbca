use anyhow::Result;
use chrono::NaiveDate;
use docinput::helpers::*;

#[test]
fn add_days_converts_between_formats() -> Result<()> {
    assert_eq!(add_days("2008-02-28", 1, "%Y-%m-%d", "%m/%y/%d")?, "02/08/29");
    assert_eq!(add_days("2008-02-28", -29, "%Y-%m-%d", "%m/%y/%d")?, "01/08/30");
    assert_eq!(add_days("2008-02-28", 0, "%Y-%m-%d", "%m/%y/%d")?, "02/08/28");
    assert_eq!(add_days("2008-12-31", 1, "%Y-%m-%d", "%m/%Y/%d")?, "01/2009/01");
    Ok(())
}

#[test]
fn add_days_iso_handles_leap_years() -> Result<()> {
    assert_eq!(add_days_iso("2008-02-28", 1)?, "2008-02-29");
    assert_eq!(add_days_iso("2009-02-28", 1)?, "2009-03-01");
    assert_eq!(add_days_iso("2011-01-01", -1)?, "2010-12-31");
    Ok(())
}

#[test]
fn add_days_rejects_bad_input() {
    assert!(add_days_iso("2008-02-30", 1).is_err());
    assert!(add_days_iso("yesterday", 1).is_err());
    assert!(add_days("2008-02-28", 1, ISO_DATE, "%Q").is_err());
}

#[test]
fn convert_date_keeps_time_of_day() -> Result<()> {
    assert_eq!(
        convert_date("2011-08-01 13:45", "%Y-%m-%d %H:%M", "%Y/%m/%d %Hh")?,
        "2011/08/01 13h"
    );
    assert_eq!(convert_date("2011/08", "%Y/%m", "%Y-%m-%d")?, "2011-08-01");
    assert!(convert_date("2011/13", "%Y/%m", "%Y-%m-%d").is_err());
    Ok(())
}

#[test]
fn month_fallback_never_invents_a_day() {
    assert!(parse_date("2011-08", "%Y-%m-%d").is_err());
    assert!(parse_date("2011-08-32", "%Y-%m-%d").is_err());
    assert!(convert_date("2011-02-30", ISO_DATE, "%Y/%m").is_err());
}

#[test]
fn date_range_is_inclusive() -> Result<()> {
    let month = |s: &str| parse_date(s, "%Y/%m");
    let (start, end) = (month("2011/07")?, month("2011/09")?);

    assert!(is_within(&month("2011/08")?, &start, &end));
    assert!(!is_within(&month("2011/11")?, &start, &end));
    assert!(is_within(&month("2011/07")?, &start, &end));
    assert!(is_within(&month("2011/09")?, &start, &end));

    let day = |d| NaiveDate::from_ymd_opt(2011, 7, d).expect("valid day");
    assert!(!is_within(&day(1), &day(2), &day(3)));
    Ok(())
}

#[test]
fn one_to_one_correspondence_holds_for_copied_trees() {
    let inputs = [
        "input/2011/11/02/in/in2/in3/tfidf1",
        "input/2011/11/02/in/in2/tfidf1",
        "input/2011/11/02/in/tfidf1",
        "input/2011/11/02/tfidf1",
        "input/2011/11/02/tfidf2",
        "input/2011/11/03/input",
        "input/2011/11/03/input1",
        "input/2011/11/03/tfidf",
    ];
    let outputs: Vec<String> = inputs
        .iter()
        .map(|p| p.replacen("input/", "output/", 1))
        .collect();
    let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();

    assert!(validate_one_to_one("input", "output", &inputs, &outputs));
}

#[test]
fn file_names_may_differ_but_directories_may_not() {
    assert!(validate_one_to_one(
        "input",
        "output",
        &["input/2011/11/02/part-0"],
        &["output/2011/11/02/result.txt"],
    ));
    assert!(!validate_one_to_one(
        "input",
        "output",
        &["input/2011/11/02/part-0"],
        &["output/2011/11/03/part-0"],
    ));
}

#[test]
fn correspondence_rejects_wrong_roots_and_sizes() {
    assert!(!validate_one_to_one("input", "output", &["in/2011/a"], &["output/2011/a"]));
    assert!(!validate_one_to_one("input", "output", &["input/2011/a"], &["out/2011/a"]));
    assert!(!validate_one_to_one(
        "input",
        "output",
        &["input/2011/a", "input/2011/b"],
        &["output/2011/a"],
    ));
    assert!(!validate_one_to_one("input", "output", &["input"], &["output"]));
    assert!(validate_one_to_one::<&str>("input", "output", &[], &[]));
}
