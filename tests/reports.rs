use weatherlog::{generate_daily_summary, generate_summary, parse_readings, Reading, ReportError};

fn two_days() -> Vec<Reading> {
    vec![
        Reading {
            date: "2021-07-02T07:00:00+08:00".to_string(),
            min_temp: 49.0,
            max_temp: 67.0,
        },
        Reading {
            date: "2021-07-03T07:00:00+08:00".to_string(),
            min_temp: 57.0,
            max_temp: 68.0,
        },
    ]
}

#[test]
fn overview_report() {
    let summary = generate_summary(&two_days()).unwrap();
    assert_eq!(
        summary,
        "2 Day Overview\n\
         \x20 The lowest temperature will be 9.4°C, and will occur on Friday 02 July 2021.\n\
         \x20 The highest temperature will be 20.0°C, and will occur on Saturday 03 July 2021.\n\
         \x20 The average low this week is 11.7°C.\n\
         \x20 The average high this week is 19.7°C.\n"
    );
}

#[test]
fn daily_report() {
    let daily = generate_daily_summary(&two_days()).unwrap();
    assert_eq!(
        daily,
        "---- Friday 02 July 2021 ----\n\
         \x20 Minimum Temperature: 9.4°C\n\
         \x20 Maximum Temperature: 19.4°C\n\
         \n\
         ---- Saturday 03 July 2021 ----\n\
         \x20 Minimum Temperature: 13.9°C\n\
         \x20 Maximum Temperature: 20.0°C\n\
         \n"
    );
}

#[test]
fn daily_report_keeps_its_trailing_whitespace() {
    let daily = generate_daily_summary(&two_days()).unwrap();
    assert!(daily.ends_with("20.0°C\n\n"));
}

#[test]
fn extreme_dates_prefer_the_last_tie() {
    // Both days share the same maximum, the later date must win
    let mut readings = two_days();
    readings[0].max_temp = 68.0;
    let summary = generate_summary(&readings).unwrap();
    assert!(summary.contains("will occur on Saturday 03 July 2021"));
}

#[test]
fn reports_are_idempotent() {
    let readings = two_days();
    assert_eq!(
        generate_summary(&readings).unwrap(),
        generate_summary(&readings).unwrap()
    );
    assert_eq!(
        generate_daily_summary(&readings).unwrap(),
        generate_daily_summary(&readings).unwrap()
    );
}

#[test]
fn reports_refuse_an_empty_set() {
    assert!(matches!(
        generate_summary(&[]),
        Err(ReportError::EmptyData)
    ));
    assert!(matches!(
        generate_daily_summary(&[]),
        Err(ReportError::EmptyData)
    ));
}

#[test]
fn reports_propagate_a_broken_date() {
    let mut readings = two_days();
    // Day two holds the hottest maximum, so the overview looks its date up too
    readings[1].date = "not a date".to_string();
    assert!(matches!(
        generate_daily_summary(&readings),
        Err(ReportError::Parse(_))
    ));
    assert!(matches!(
        generate_summary(&readings),
        Err(ReportError::Parse(_))
    ));
}

#[test]
fn csv_to_overview_end_to_end() {
    let input = "date,min,max\n\
                 2021-07-02T07:00:00+08:00,49,67\n\
                 not,a,row\n\
                 2021-07-03T07:00:00+08:00,57,68\n";
    let set = parse_readings(input);
    assert_eq!(set.skipped_rows, 1);
    let summary = generate_summary(&set.readings).unwrap();
    assert!(summary.starts_with("2 Day Overview\n"));
    assert!(summary.contains("9.4°C"));
}
