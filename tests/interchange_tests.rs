mod common;

use common::{date, new_expense, new_income, new_investment, recurring, setup_storage};
use finance_core::{
    core::errors::FinanceError,
    core::services::{InvestmentService, RecurringService, TransactionService},
    domain::Book,
    storage::{json_backend, StorageBackend},
};

fn sample_book() -> Book {
    let today = date(2024, 3, 1);
    let mut book = Book::new();
    TransactionService::create(&mut book, new_income("Paycheck", 3000, today), today).unwrap();
    TransactionService::create(
        &mut book,
        new_expense("Rent", 900, today, Some(date(2024, 3, 5))),
        today,
    )
    .unwrap();
    RecurringService::submit(&mut book, &recurring("Loan", 100, date(2024, 3, 10), 3), today)
        .unwrap();
    InvestmentService::create(&mut book, new_investment("Fund", 1000, 1200)).unwrap();
    book
}

#[test]
fn export_then_import_reproduces_the_book_exactly() {
    let (_storage, base) = setup_storage();
    let book = sample_book();
    let path = base.join("export.json");

    json_backend::export_book(&book, &path).expect("export");
    let imported = json_backend::import_book(&path).expect("import");

    // Ids, amounts, dates, statuses, and group links all survive.
    assert_eq!(imported, book);
}

#[test]
fn the_document_shape_carries_both_collections() {
    let (_storage, base) = setup_storage();
    let path = base.join("export.json");
    json_backend::export_book(&sample_book(), &path).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(value.get("transactions").is_some());
    assert!(value.get("investments").is_some());
    // Dates serialize as ISO-8601 calendar days.
    let first_date = &value["transactions"][0]["date"];
    assert_eq!(first_date, "2024-03-01");
}

#[test]
fn import_rejects_documents_missing_a_collection() {
    let err = json_backend::from_document_str(r#"{ "transactions": [] }"#).unwrap_err();
    match err {
        FinanceError::Import(message) => {
            assert!(message.contains("investments"), "unexpected: {message}")
        }
        other => panic!("expected an import error, got {other:?}"),
    }

    let err = json_backend::from_document_str(r#"{ "investments": [] }"#).unwrap_err();
    assert!(matches!(err, FinanceError::Import(_)));
}

#[test]
fn import_rejects_malformed_json_and_bad_dates() {
    assert!(matches!(
        json_backend::from_document_str("not json at all"),
        Err(FinanceError::Import(_))
    ));

    let bad_date = r#"{
        "transactions": [{
            "id": "1f7a9f6e-9f9b-4d76-93d4-111111111111",
            "description": "Rent",
            "amount": "900",
            "kind": "Expense",
            "category": "Housing",
            "date": "yesterday",
            "status": "Pending"
        }],
        "investments": []
    }"#;
    assert!(matches!(
        json_backend::from_document_str(bad_date),
        Err(FinanceError::Import(_))
    ));
}

#[test]
fn failed_import_leaves_the_current_book_untouched() {
    let (_storage, base) = setup_storage();
    let mut active = sample_book();
    let before = active.clone();

    let path = base.join("broken.json");
    std::fs::write(&path, r#"{ "transactions": [] }"#).unwrap();

    // The caller replaces its snapshot only on success.
    match json_backend::import_book(&path) {
        Ok(imported) => active = imported,
        Err(err) => assert!(matches!(err, FinanceError::Import(_))),
    }
    assert_eq!(active, before);
}

#[test]
fn import_accepts_legacy_rows_without_installment_fields() {
    let legacy = r#"{
        "transactions": [{
            "id": "1f7a9f6e-9f9b-4d76-93d4-111111111111",
            "description": "Course (2/6)",
            "amount": "150",
            "kind": "Expense",
            "category": "Education",
            "date": "2024-01-10",
            "due_date": "2024-02-10",
            "recurring_group_id": "2b8c3c4d-5e6f-4a1b-8c9d-222222222222",
            "status": "Pending"
        }],
        "investments": []
    }"#;
    let book = json_backend::from_document_str(legacy).unwrap();
    let row = &book.transactions[0];
    assert!(row.installment.is_none());
    assert_eq!(row.base_description(), "Course");
}

#[test]
fn gateway_trait_paths_forward_to_the_document_helpers() {
    let (storage, base) = setup_storage();
    let book = sample_book();
    let path = base.join("via_trait.json");

    storage.save_to_path(&book, &path).unwrap();
    let loaded = storage.load_from_path(&path).unwrap();
    assert_eq!(loaded, book);
}
