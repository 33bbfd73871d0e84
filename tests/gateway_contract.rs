//! Gateway Contract Tests
//!
//! End-to-end operation behaviour against a scripted driver:
//! - empty point reads are NOT_FOUND, empty point writes are NO_CONTENT
//! - vendor failures keep their raw state and code
//! - access denial never reaches the database
//! - finder arity and operator checks

mod common;

use std::sync::Arc;

use serde_json::json;

use common::{gateway_with, ScriptedDriver};
use tablegate::model::BindValue;
use tablegate::gateway::{Body, ContractError, ReadOptions, Target};
use tablegate::taxonomy::OutcomeCategory;

fn car(principal: &str) -> Target<'_> {
    Target::new("demo1", "car", principal)
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// =============================================================================
// Reads
// =============================================================================

#[test]
fn test_short_first_page_skips_count() {
    let driver = Arc::new(
        ScriptedDriver::new().then_rows(vec![json!({"cid": 1}), json!({"cid": 2})]),
    );
    let gateway = gateway_with(driver.clone());

    let envelope = gateway.list(car("anonymous"), &ReadOptions::default()).unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    assert_eq!(envelope.rows().len(), 2);
    let pagination = envelope.pagination.unwrap();
    assert_eq!(pagination.total_rows, 2);
    assert_eq!(pagination.total_pages, 1);
    assert_eq!(driver.sql(), vec!["SELECT * FROM car LIMIT 25 OFFSET 0"]);
}

#[test]
fn test_full_page_is_counted() {
    let driver = Arc::new(
        ScriptedDriver::new()
            .then_rows(vec![json!({"cid": 1}), json!({"cid": 2})])
            .then_count(5),
    );
    let gateway = gateway_with(driver.clone());
    let options = ReadOptions {
        limit: Some("2".into()),
        ..Default::default()
    };

    let envelope = gateway.list(car("anonymous"), &options).unwrap();

    let pagination = envelope.pagination.unwrap();
    assert_eq!(pagination.page_size, 2);
    assert_eq!(pagination.page_rows, 2);
    assert_eq!(pagination.total_rows, 5);
    assert_eq!(pagination.total_pages, 3);
    assert_eq!(
        driver.sql(),
        vec!["SELECT * FROM car LIMIT 2 OFFSET 0", "SELECT COUNT(*) FROM car"]
    );
}

#[test]
fn test_unreadable_count_is_internal() {
    let driver = Arc::new(
        ScriptedDriver::new()
            .then_rows(vec![json!({"cid": 1})])
            .then_rows(vec![json!({"C1": "many"})]),
    );
    let gateway = gateway_with(driver.clone());
    let options = ReadOptions {
        limit: Some("1".into()),
        ..Default::default()
    };

    let envelope = gateway.list(car("anonymous"), &options).unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Internal);
    assert!(envelope.pagination.is_none());
    assert_eq!(driver.sql().len(), 2);
}

#[test]
fn test_empty_list_is_ok() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver);

    let envelope = gateway.list(car("anonymous"), &ReadOptions::default()).unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    assert!(envelope.rows().is_empty());
    assert_eq!(envelope.pagination.unwrap().total_pages, 0);
}

#[test]
fn test_sort_and_direction() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());
    let options = ReadOptions {
        sort: Some("maker".into()),
        dir: Some("desc".into()),
        ..Default::default()
    };

    gateway.list(car("anonymous"), &options).unwrap();

    assert_eq!(
        driver.sql(),
        vec!["SELECT * FROM car ORDER BY maker DESC LIMIT 25 OFFSET 0"]
    );
}

#[test]
fn test_bad_paging_is_bad_request() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    for options in [
        ReadOptions { limit: Some("5000".into()), ..Default::default() },
        ReadOptions { offset: Some("-1".into()), ..Default::default() },
        ReadOptions { dir: Some("sideways".into()), ..Default::default() },
    ] {
        let envelope = gateway.list(car("anonymous"), &options).unwrap();
        assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    }
    assert!(driver.sql().is_empty());
}

#[test]
fn test_get_missing_key_is_not_found() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway.get(car("anonymous"), None, "7").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::NotFound);
    assert!(!envelope.success);
    let executed = driver.executed();
    assert_eq!(executed[0].sql, "SELECT * FROM car WHERE cid = ?");
    assert_eq!(executed[0].binds, vec![BindValue::text("7")]);
}

#[test]
fn test_get_with_key_override() {
    let driver = Arc::new(ScriptedDriver::new().then_rows(vec![json!({"cid": 1, "maker": "Ford"})]));
    let gateway = gateway_with(driver.clone());

    let envelope = gateway.get(car("anonymous"), Some("maker"), "Ford").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    assert_eq!(envelope.rows()[0]["maker"], "Ford");
    assert_eq!(driver.sql(), vec!["SELECT * FROM car WHERE maker = ?"]);
}

#[test]
fn test_missing_id_is_bad_request() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway.get(car("anonymous"), None, "  ").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert!(driver.sql().is_empty());
}

#[test]
fn test_find_by_column_empty_is_not_found() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .find_by_column(car("anonymous"), "maker", "Ford", &ReadOptions::default())
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::NotFound);
    assert_eq!(
        driver.sql(),
        vec!["SELECT * FROM car WHERE maker = ? LIMIT 25 OFFSET 0"]
    );
}

#[test]
fn test_unknown_resource_goes_to_the_database() {
    let driver = Arc::new(ScriptedDriver::new().then_vendor("42501", -5501));
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .list(Target::new("demo1", "boats", "anonymous"), &ReadOptions::default())
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert_eq!(envelope.sql_state.as_deref(), Some("42501"));
    assert_eq!(envelope.sql_code, Some(-5501));
    assert_eq!(driver.sql(), vec!["SELECT * FROM boats LIMIT 25 OFFSET 0"]);
}

#[test]
fn test_malformed_resource_name_has_stable_diagnostic() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .list(
            Target::new("demo1", "this table doesnt exists", "anonymous"),
            &ReadOptions::default(),
        )
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert_eq!(envelope.sql_state.as_deref(), Some("42602"));
    assert_eq!(envelope.sql_code, Some(0));
    assert!(driver.sql().is_empty());
}

// =============================================================================
// Dynamic Finders
// =============================================================================

#[test]
fn test_finder_like_and_less_than_equals() {
    let driver = Arc::new(ScriptedDriver::new().then_rows(vec![json!({"cid": 3, "maker": "Audi"})]));
    let gateway = gateway_with(driver.clone());
    let arguments = args(&["A%", "4"]);

    let envelope = gateway
        .find(
            car("anonymous"),
            "findAllByMakerLikeAndMonthLessThanEquals",
            Some(arguments.as_slice()),
            &ReadOptions::default(),
        )
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    let executed = driver.executed();
    assert_eq!(
        executed[0].sql,
        "SELECT * FROM car WHERE maker LIKE ? AND month <= ? LIMIT 25 OFFSET 0"
    );
    assert_eq!(
        executed[0].binds,
        vec![BindValue::text("A%"), BindValue::text("4")]
    );
}

#[test]
fn test_finder_arity_mismatch() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .find(car("anonymous"), "findAllByCreditLessThan", Some(&[][..]), &ReadOptions::default())
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    let message = envelope.message.unwrap();
    assert!(message.contains("expects 1"), "{}", message);
    assert!(message.contains("got 0"), "{}", message);
    assert!(driver.sql().is_empty());
}

#[test]
fn test_finder_unknown_operator() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    for supplied in [args(&[]), args(&["1"]), args(&["1", "2"])] {
        let envelope = gateway
            .find(
                car("anonymous"),
                "findAllByCreditLessThhhhan",
                Some(supplied.as_slice()),
                &ReadOptions::default(),
            )
            .unwrap();
        assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    }
    assert!(driver.sql().is_empty());
}

#[test]
fn test_finder_without_arguments_breaks_contract() {
    let gateway = gateway_with(Arc::new(ScriptedDriver::new()));

    let result = gateway.find(car("anonymous"), "findAllByMaker", None, &ReadOptions::default());

    assert_eq!(result.unwrap_err(), ContractError::MissingArguments);
}

#[test]
fn test_finder_null_check_binds_nothing() {
    let driver = Arc::new(ScriptedDriver::new().then_rows(vec![json!({"cid": 9})]));
    let gateway = gateway_with(driver.clone());

    gateway
        .find(car("anonymous"), "findAllByModelIsNull", Some(&[][..]), &ReadOptions::default())
        .unwrap();

    let executed = driver.executed();
    assert_eq!(
        executed[0].sql,
        "SELECT * FROM car WHERE model IS NULL LIMIT 25 OFFSET 0"
    );
    assert!(executed[0].binds.is_empty());
}

// =============================================================================
// Writes
// =============================================================================

#[test]
fn test_create_echoes_payload() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(1));
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .create(car("anonymous"), &Body::Json(r#"{"maker":"Ford","month":3}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Created);
    assert_eq!(envelope.rows()[0]["maker"], "Ford");
    let executed = driver.executed();
    assert_eq!(executed[0].sql, "INSERT INTO car (maker, month) VALUES (?, ?)");
    assert_eq!(
        executed[0].binds,
        vec![BindValue::text("Ford"), BindValue::text("3")]
    );
}

#[test]
fn test_create_from_form_pairs() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(1));
    let gateway = gateway_with(driver.clone());
    let body = Body::Form(&b"maker=Fiat"[..]);

    let envelope = gateway.create(car("anonymous"), &body).unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Created);
    assert_eq!(driver.sql(), vec!["INSERT INTO car (maker) VALUES (?)"]);
}

#[test]
fn test_create_rejects_bad_bodies() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    for body in ["", "{not json", "{}", r#"{"maker":{"nested":true}}"#] {
        let envelope = gateway.create(car("anonymous"), &Body::Json(body)).unwrap();
        assert_eq!(envelope.category, OutcomeCategory::BadRequest, "body {:?}", body);
    }
    assert!(driver.sql().is_empty());
}

#[test]
fn test_not_null_violation_is_bad_request() {
    let driver = Arc::new(ScriptedDriver::new().then_vendor("23502", -10));
    let gateway = gateway_with(driver);

    let envelope = gateway
        .create(car("anonymous"), &Body::Json(r#"{"model":"T"}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert_eq!(envelope.sql_state.as_deref(), Some("23502"));
    assert_eq!(envelope.sql_code, Some(-10));
}

#[test]
fn test_invalid_datetime_keeps_its_code() {
    let driver = Arc::new(ScriptedDriver::new().then_vendor("22007", -3407));
    let gateway = gateway_with(driver);

    let envelope = gateway
        .create(car("anonymous"), &Body::Json(r#"{"last_update":"yesterday"}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert_eq!(envelope.sql_state.as_deref(), Some("22007"));
    assert_eq!(envelope.sql_code, Some(-3407));
    assert!(!envelope.message.unwrap().contains("vendor text"));
}

#[test]
fn test_duplicate_key_is_conflict() {
    let driver = Arc::new(ScriptedDriver::new().then_vendor("23505", -104));
    let gateway = gateway_with(driver);

    let envelope = gateway
        .create(car("anonymous"), &Body::Json(r#"{"cid":1}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Conflict);
}

#[test]
fn test_update_missing_key_is_no_content() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(0));
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .update(car("anonymous"), None, "404", &Body::Json(r#"{"maker":"Kia"}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::NoContent);
    assert_eq!(driver.sql(), vec!["UPDATE car SET maker = ? WHERE cid = ?"]);
}

#[test]
fn test_update_echoes_key() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(1));
    let gateway = gateway_with(driver);

    let envelope = gateway
        .update(car("anonymous"), None, "5", &Body::Json(r#"{"maker":"Kia"}"#))
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    assert_eq!(envelope.rows()[0]["cid"], "5");
    assert_eq!(envelope.rows()[0]["maker"], "Kia");
}

#[test]
fn test_delete_missing_key_is_no_content() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(0));
    let gateway = gateway_with(driver.clone());

    let envelope = gateway.delete(car("anonymous"), None, "404").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::NoContent);
    assert_eq!(driver.sql(), vec!["DELETE FROM car WHERE cid = ?"]);
}

#[test]
fn test_driver_unavailable_is_internal() {
    let driver = Arc::new(ScriptedDriver::new().then(Err(
        tablegate::gateway::DriverError::Unavailable("pool exhausted".into()),
    )));
    let gateway = gateway_with(driver);

    let envelope = gateway.delete(car("anonymous"), None, "1").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Internal);
    assert!(!envelope.message.unwrap().contains("pool exhausted"));
}

// =============================================================================
// Access Control
// =============================================================================

#[test]
fn test_denied_resource_never_reaches_the_database() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());

    let envelope = gateway
        .list(Target::new("demo1", "users", "anonymous"), &ReadOptions::default())
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert!(envelope.message.unwrap().contains("Access denied"));
    assert!(driver.sql().is_empty());
}

#[test]
fn test_resource_rule_overrides_alias_default() {
    let driver = Arc::new(ScriptedDriver::new().then_affected(1));
    let gateway = gateway_with(driver.clone());

    // demo2 allows everyone to read, but car belongs to admin
    let denied = gateway
        .list(Target::new("demo2", "car", "anonymous"), &ReadOptions::default())
        .unwrap();
    assert_eq!(denied.category, OutcomeCategory::BadRequest);

    let created = gateway
        .create(Target::new("demo2", "car", "admin"), &Body::Json(r#"{"maker":"Seat"}"#))
        .unwrap();
    assert_eq!(created.category, OutcomeCategory::Created);
    assert_eq!(driver.sql(), vec!["INSERT INTO car (maker) VALUES ($1)"]);
}

#[test]
fn test_alias_default_limits_operations() {
    let gateway = gateway_with(Arc::new(ScriptedDriver::new()));

    let envelope = gateway
        .delete(Target::new("demo2", "comments", "anonymous"), None, "1")
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
}

#[test]
fn test_unknown_alias_breaks_contract() {
    let gateway = gateway_with(Arc::new(ScriptedDriver::new()));

    let result = gateway.list(Target::new("demo9", "car", "anonymous"), &ReadOptions::default());

    assert_eq!(result.unwrap_err(), ContractError::UnknownAlias("demo9".into()));
}

// =============================================================================
// Metadata and Calls
// =============================================================================

#[test]
fn test_alias_metadata_lists_tables() {
    let driver = Arc::new(ScriptedDriver::with_tables(&["CAR", "USERS"]));
    let gateway = gateway_with(driver);

    let envelope = gateway.metadata("demo1", "anonymous").unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    let names: Vec<_> = envelope.rows().iter().map(|r| r["name"].clone()).collect();
    assert_eq!(names, vec![json!("CAR"), json!("USERS")]);
}

#[test]
fn test_resource_metadata_marks_primary_key() {
    let gateway = gateway_with(Arc::new(ScriptedDriver::new()));

    let envelope = gateway.resource_metadata(car("anonymous")).unwrap();

    let cid = &envelope.rows()[0];
    assert_eq!(cid["name"], "cid");
    assert_eq!(cid["primaryKey"], true);
    assert_eq!(envelope.rows()[1]["primaryKey"], false);
}

#[test]
fn test_stored_call() {
    let driver = Arc::new(ScriptedDriver::new().then_rows(vec![json!({"total": 2})]));
    let gateway = gateway_with(driver.clone());
    let parameters = r#"[
        {"name": "car_id", "index": 1, "type": "INTEGER", "value": 1},
        {"name": "total", "index": 2, "type": "INTEGER", "outParameter": true}
    ]"#;

    let envelope = gateway
        .call(Target::new("demo1", "insert_comment", "anonymous"), parameters)
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::Ok);
    assert_eq!(envelope.rows()[0]["total"], 2);
    let calls = driver.calls();
    assert_eq!(calls[0].sql, "CALL insert_comment(?, ?)");
    assert_eq!(calls[0].bindings.len(), 2);
}

#[test]
fn test_stored_call_rejects_gapped_indexes() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());
    let parameters = r#"[{"name": "a", "index": 2, "type": "INTEGER", "value": 1}]"#;

    let envelope = gateway
        .call(Target::new("demo1", "insert_comment", "anonymous"), parameters)
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert!(driver.calls().is_empty());
}

#[test]
fn test_stored_call_rejects_nested_values() {
    let driver = Arc::new(ScriptedDriver::new());
    let gateway = gateway_with(driver.clone());
    let parameters = r#"[{"name": "car_id", "index": 1, "type": "INTEGER", "value": [1, 2]}]"#;

    let envelope = gateway
        .call(Target::new("demo1", "insert_comment", "anonymous"), parameters)
        .unwrap();

    assert_eq!(envelope.category, OutcomeCategory::BadRequest);
    assert!(driver.calls().is_empty());
}
