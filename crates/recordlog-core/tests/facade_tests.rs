#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{NaiveDate, NaiveDateTime};
use recordlog_core::enrich::RequestInfoProvider;
use recordlog_core::format::parse_line;
use recordlog_core::rotation::Clock;
use recordlog_core::schema::{EXTRA_IP, EXTRA_LOG_SOURCE, EXTRA_PROCESS_ID, EXTRA_UID};
use recordlog_core::{
    context_from, log_here, CallSite, Context, ErrorKind, LogOptions, RecordLog,
};
use recordlog_core_types::RequestInfo;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn dir_option(dir: &TempDir) -> String {
    dir.path().to_string_lossy().into_owned()
}

fn facade(dir: &TempDir) -> RecordLog {
    RecordLog::new(LogOptions::new().channel("Platform").path(dir_option(dir)))
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

struct StepClock(Mutex<NaiveDateTime>);

impl StepClock {
    fn at(day: u32) -> Arc<Self> {
        Arc::new(Self(Mutex::new(noon(day))))
    }

    fn set(&self, day: u32) {
        *self.0.lock().unwrap() = noon(day);
    }
}

impl Clock for StepClock {
    fn now(&self) -> NaiveDateTime {
        *self.0.lock().unwrap()
    }
}

fn noon(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 9, day)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

struct ServingRequest;

impl RequestInfoProvider for ServingRequest {
    fn current(&self) -> RequestInfo {
        RequestInfo::new("203.0.113.7", "/checkout", "POST")
    }
}

#[test]
fn test_each_severity_method_writes_one_line_to_its_file() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.emergency("m", Context::new()).unwrap();
    log.alert("m", Context::new()).unwrap();
    log.critical("m", Context::new()).unwrap();
    log.error("m", Context::new()).unwrap();
    log.warning("m", Context::new()).unwrap();
    log.notice("m", Context::new()).unwrap();
    log.info("m", Context::new()).unwrap();
    log.debug("m", Context::new()).unwrap();

    for (key, name) in [
        ("emergency", "EMERGENCY"),
        ("alert", "ALERT"),
        ("critical", "CRITICAL"),
        ("error", "ERROR"),
        ("warning", "WARNING"),
        ("notice", "NOTICE"),
        ("info", "INFO"),
        ("debug", "DEBUG"),
    ] {
        let file = dir.path().join(format!("{key}.log"));
        let written = lines(&file);
        assert_eq!(written.len(), 1, "expected one line in {key}.log");
        assert_eq!(parse_line(&written[0]).unwrap().level, name);
    }
    assert_eq!(log.writer_count(), 8);
}

#[test]
fn test_sql_goes_to_debug_file() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.sql("SELECT 1", Context::new()).unwrap();

    assert!(!dir.path().join("sql.log").exists());
    let written = lines(&dir.path().join("debug.log"));
    assert_eq!(written.len(), 1);
    let parsed = parse_line(&written[0]).unwrap();
    assert_eq!(parsed.level, "DEBUG");
    assert_eq!(parsed.message, "SELECT 1");
    assert_eq!(log.writer_keys(), vec!["debug"]);
}

#[test]
fn test_disabled_facade_creates_nothing() {
    // Scenario: construct with {close: true}, call every severity method,
    // the log directory stays empty.
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("logs");
    let log = RecordLog::new(
        LogOptions::new()
            .path(target.to_string_lossy())
            .close(true),
    );

    log.emergency("x", Context::new()).unwrap();
    log.alert("x", Context::new()).unwrap();
    log.critical("x", Context::new()).unwrap();
    log.error("x", Context::new()).unwrap();
    log.warning("x", Context::new()).unwrap();
    log.notice("x", Context::new()).unwrap();
    log.info("x", Context::new()).unwrap();
    log.debug("x", Context::new()).unwrap();
    log.sql("x", Context::new()).unwrap();
    log.log("custom", "x", Context::new()).unwrap();

    assert!(!target.exists());
    assert_eq!(log.writer_count(), 0);
}

#[test]
fn test_same_key_reuses_writer() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.info("one", Context::new()).unwrap();
    let first = log.resolve_writer("info").unwrap();
    log.info("two", Context::new()).unwrap();
    let second = log.resolve_writer("info").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(log.writer_count(), 1);
    assert_eq!(lines(first.path()).len(), 2);
}

#[test]
fn test_unrecognized_level_recorded_as_info() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.log("audit", "user logged in", Context::new()).unwrap();

    let written = lines(&dir.path().join("audit.log"));
    assert_eq!(written.len(), 1);
    assert_eq!(parse_line(&written[0]).unwrap().level, "INFO");
}

#[test]
fn test_context_round_trips_through_content_group() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.info("login", context_from(json!({"user": "abc"}))).unwrap();

    let written = lines(&dir.path().join("info.log"));
    let parsed = parse_line(&written[0]).unwrap();
    assert_eq!(Value::Object(parsed.context), json!({"user": "abc"}));
}

#[test]
fn test_platform_error_scenario() {
    // Scenario: {channel: "Platform", path: "<dir>/", max_files: 0}
    // error("disk full", {"code": 500}) writes one matching line to error.log
    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(
        LogOptions::new()
            .channel("Platform")
            .path(format!("{}/", dir_option(&dir)))
            .max_files(0),
    );

    log.error("disk full", context_from(json!({"code": 500})))
        .unwrap();

    let written = lines(&dir.path().join("error.log"));
    assert_eq!(written.len(), 1);
    let line = &written[0];

    let fields: Vec<&str> = line.split("###").collect();
    assert_eq!(fields.len(), 6);
    assert!(NaiveDateTime::parse_from_str(fields[0], "%Y-%m-%d %H:%M:%S").is_ok());
    assert_eq!(fields[1], "Platform");
    assert_eq!(fields[2], "ERROR");
    assert!(fields[3].contains("disk full"));
    assert!(fields[4].starts_with("content:"));
    assert!(fields[4].contains("code") && fields[4].contains("500"));
    assert!(fields[5].starts_with("extra:"));
}

#[test]
fn test_extra_group_carries_enrichment() {
    let dir = TempDir::new().unwrap();
    let log = RecordLog::builder(LogOptions::new().path(dir_option(&dir)))
        .request_info(Arc::new(ServingRequest))
        .build();

    log.notice("paid", Context::new()).unwrap();

    let parsed = parse_line(&lines(&dir.path().join("notice.log"))[0]).unwrap();
    assert_eq!(
        parsed.extra.get(EXTRA_UID),
        Some(&json!(log.run_id().as_str()))
    );
    assert_eq!(
        parsed.extra.get(EXTRA_PROCESS_ID),
        Some(&json!(std::process::id()))
    );
    assert_eq!(parsed.extra.get(EXTRA_IP), Some(&json!("203.0.113.7")));
    assert_eq!(parsed.extra.get(EXTRA_LOG_SOURCE), Some(&json!("recordlog")));
}

#[test]
fn test_run_id_shared_across_writers() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    log.info("a", Context::new()).unwrap();
    log.error("b", Context::new()).unwrap();

    let info = parse_line(&lines(&dir.path().join("info.log"))[0]).unwrap();
    let error = parse_line(&lines(&dir.path().join("error.log"))[0]).unwrap();
    assert_eq!(info.extra.get(EXTRA_UID), error.extra.get(EXTRA_UID));
}

#[test]
fn test_records_below_floor_are_dropped() {
    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(LogOptions::new().path(dir_option(&dir)).level("warning"));

    log.info("chatter", Context::new()).unwrap();
    log.error("real problem", Context::new()).unwrap();

    assert_eq!(
        fs::read_to_string(dir.path().join("info.log")).unwrap_or_default(),
        ""
    );
    assert_eq!(lines(&dir.path().join("error.log")).len(), 1);
}

#[test]
fn test_single_file_mode_routes_every_level_to_one_file() {
    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(
        LogOptions::new()
            .path(dir_option(&dir))
            .single_file("platform"),
    );

    log.error("e", Context::new()).unwrap();
    log.info("i", Context::new()).unwrap();
    log.sql("s", Context::new()).unwrap();

    assert_eq!(files_in(dir.path()), vec!["platform.log"]);
    let levels: Vec<String> = lines(&dir.path().join("platform.log"))
        .iter()
        .map(|l| parse_line(l).unwrap().level)
        .collect();
    assert_eq!(levels, vec!["ERROR", "INFO", "DEBUG"]);
    assert_eq!(log.writer_count(), 1);
}

#[test]
fn test_log_at_annotates_when_trace_enabled() {
    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(LogOptions::new().path(dir_option(&dir)).trace(true));

    let site = CallSite::new("/srv/app/src/billing.rs", 88).with_function("charge");
    log.log_at("warning", "card declined", Context::new(), &site)
        .unwrap();

    let parsed = parse_line(&lines(&dir.path().join("warning.log"))[0]).unwrap();
    assert_eq!(
        parsed.message,
        "==> LOG: card declined -- billing.rs:88##charge"
    );
}

#[test]
fn test_log_at_leaves_message_when_trace_disabled() {
    let dir = TempDir::new().unwrap();
    let log = facade(&dir);

    let site = CallSite::here();
    log.log_at("warning", "card declined", Context::new(), &site)
        .unwrap();

    let parsed = parse_line(&lines(&dir.path().join("warning.log"))[0]).unwrap();
    assert_eq!(parsed.message, "card declined");
}

#[test]
fn test_log_here_macro_stamps_call_site() {
    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(LogOptions::new().path(dir_option(&dir)).trace(true));

    let line = line!() + 1;
    log_here!(log, "info", "warmed").unwrap();

    let parsed = parse_line(&lines(&dir.path().join("info.log"))[0]).unwrap();
    assert_eq!(
        parsed.message,
        format!("==> LOG: warmed -- facade_tests.rs:{}##facade_tests", line)
    );
}

#[test]
fn test_rotation_retains_max_files() {
    // Writes spanning 4 daily periods with max_files = 2 leave at most
    // 2 rotated files plus the active file.
    let dir = TempDir::new().unwrap();
    let clock = StepClock::at(1);
    let log = RecordLog::builder(LogOptions::new().path(dir_option(&dir)).max_files(2))
        .clock(clock.clone())
        .build();

    for day in 1..=4 {
        clock.set(day);
        log.info(format!("day {day}"), Context::new()).unwrap();
    }

    assert_eq!(
        files_in(dir.path()),
        vec!["info-2024-09-02.log", "info-2024-09-03.log", "info.log"]
    );
    let active = lines(&dir.path().join("info.log"));
    assert_eq!(active.len(), 1);
    assert!(active[0].starts_with("2024-09-04 12:00:00###"));
}

#[test]
fn test_two_facades_share_rotation() {
    let dir = TempDir::new().unwrap();
    let clock = StepClock::at(1);
    let open = || {
        RecordLog::builder(LogOptions::new().path(dir_option(&dir)))
            .clock(clock.clone())
            .build()
    };
    let a = open();
    let b = open();

    a.info("a1", Context::new()).unwrap();
    b.info("b1", Context::new()).unwrap();
    clock.set(2);
    a.info("a2", Context::new()).unwrap();
    b.info("b2", Context::new()).unwrap();
    a.info("a3", Context::new()).unwrap();

    let messages = |name: &str| -> Vec<String> {
        lines(&dir.path().join(name))
            .iter()
            .map(|l| parse_line(l).unwrap().message)
            .collect()
    };
    assert_eq!(files_in(dir.path()), vec!["info-2024-09-01.log", "info.log"]);
    assert_eq!(messages("info-2024-09-01.log"), vec!["a1", "b1"]);
    assert_eq!(messages("info.log"), vec!["a2", "b2", "a3"]);
}

#[test]
fn test_active_file_from_earlier_day_rotates_on_first_write() {
    use chrono::{DateTime, Local};
    use std::time::{Duration, SystemTime};

    let dir = TempDir::new().unwrap();
    let active = dir.path().join("info.log");
    fs::write(&active, "left over from an earlier run\n").unwrap();
    let three_days_ago = SystemTime::now() - Duration::from_secs(3 * 24 * 60 * 60);
    fs::File::options()
        .write(true)
        .open(&active)
        .unwrap()
        .set_modified(three_days_ago)
        .unwrap();
    let rotated = format!(
        "info-{}.log",
        DateTime::<Local>::from(three_days_ago).format("%Y-%m-%d")
    );

    let log = facade(&dir);
    log.info("fresh", Context::new()).unwrap();

    assert_eq!(files_in(dir.path()), vec![rotated.clone(), "info.log".to_string()]);
    assert_eq!(
        fs::read_to_string(dir.path().join(&rotated)).unwrap(),
        "left over from an earlier run\n"
    );
    let current = lines(&active);
    assert_eq!(current.len(), 1);
    assert_eq!(parse_line(&current[0]).unwrap().message, "fresh");
}

#[test]
fn test_level_with_path_separators_stays_in_log_dir() {
    let base = TempDir::new().unwrap();
    let logs = base.path().join("a").join("b").join("logs");
    let log = RecordLog::new(LogOptions::new().path(logs.to_string_lossy()));

    log.log("../../escape", "contained", Context::new()).unwrap();

    assert!(!base.path().join("a").join("escape.log").exists());
    assert_eq!(files_in(&logs), vec!["info.log"]);
    let written = lines(&logs.join("info.log"));
    let parsed = parse_line(&written[0]).unwrap();
    assert_eq!(parsed.level, "INFO");
    assert_eq!(parsed.message, "contained");
    assert_eq!(log.writer_keys(), vec!["info"]);
}

#[test]
fn test_io_failure_propagates_and_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "not a directory").unwrap();

    let log = RecordLog::new(
        LogOptions::new().path(blocker.join("logs").to_string_lossy()),
    );
    let err = log.error("lost", Context::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert_eq!(err.code(), "ERR_IO");
    assert_eq!(log.writer_count(), 0);
}

#[cfg(unix)]
#[test]
fn test_configured_file_permission_applied() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let log = RecordLog::new(
        LogOptions::new()
            .path(dir_option(&dir))
            .file_permission(0o600),
    );
    log.info("x", Context::new()).unwrap();

    let mode = fs::metadata(dir.path().join("info.log"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o777, 0o600);
}
