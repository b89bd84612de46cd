use vellum::common::Value;
use vellum::document::DocumentInstance;
use vellum::errors::ViolationKind;
use vellum::record;
use vellum::schema::{FieldDescriptor, Schema};
use vellum_int_test::test_util::course_schema;

#[ctor::ctor]
fn init_logger() {
    colog::init();
}

#[test]
fn test_published_course_requires_price() {
    let schema = course_schema();
    let record = record! {
        name: "Node Fundamentals",
        category: "web",
        is_published: true,
    };

    let issues = schema.validate(&record).unwrap_err();
    assert!(issues
        .iter()
        .any(|i| i.field() == "price" && i.kind() == &ViolationKind::MissingRequiredField));
}

#[test]
fn test_draft_course_needs_no_price() {
    let schema = course_schema();
    let record = record! {
        name: "Node Fundamentals",
        category: "web",
        is_published: false,
    };
    assert!(schema.validate(&record).is_ok());
}

#[test]
fn test_defaults_apply_before_validation() {
    // is_published defaults to false, so the price requirement stays quiet
    let schema = course_schema();
    let mut record = record! { name: "Node Fundamentals" };
    schema.normalize(&mut record);

    assert_eq!(record.get("is_published"), Value::Bool(false));
    assert!(record.get("created_at").as_date().is_some());
    assert!(schema.validate(&record).is_ok());
}

#[test]
fn test_category_is_normalized_then_checked() {
    let schema = course_schema();
    let mut record = record! {
        name: "Node Fundamentals",
        category: "  Web ",
    };
    schema.normalize(&mut record);

    assert_eq!(record.get("category"), Value::from("web"));
    assert!(schema.validate(&record).is_ok());
}

#[test]
fn test_unknown_category_is_flagged() {
    let schema = course_schema();
    let record = record! {
        name: "Node Fundamentals",
        category: "cooking",
    };

    let issues = schema.validate(&record).unwrap_err();
    assert!(issues
        .iter()
        .any(|i| i.field() == "category" && i.kind() == &ViolationKind::InvalidEnumValue));
}

#[test]
fn test_every_violation_is_reported() {
    let schema = course_schema();
    let record = record! {
        name: "abc",
        category: "cooking",
        tags: "not-an-array",
        is_published: true,
        price: 5,
    };

    let issues = schema.validate(&record).unwrap_err();
    let fields: Vec<&str> = issues.iter().map(|i| i.field()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"category"));
    assert!(fields.contains(&"tags"));
    assert!(fields.contains(&"price"));
    assert_eq!(issues.len(), 4);
}

#[test]
fn test_conditional_requirement_ignores_declaration_order() {
    // price is declared before the flag it depends on
    let schema = Schema::new(vec![
        FieldDescriptor::number("price")
            .required_if(|doc| doc.get("is_published") == Value::Bool(true)),
        FieldDescriptor::boolean("is_published"),
    ])
    .unwrap();

    let issues = schema.validate(&record! { is_published: true }).unwrap_err();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].kind(), &ViolationKind::MissingRequiredField);

    assert!(schema.validate(&record! { is_published: false }).is_ok());
}

#[test]
fn test_instance_validation_matches_schema_validation() {
    let doc = DocumentInstance::new(
        course_schema(),
        record! {
            name: "Node Fundamentals",
            category: "web",
            is_published: true,
        },
    );

    let issues = doc.validate().unwrap_err();
    assert!(issues.iter().any(|i| i.field() == "price"));
}

#[test]
fn test_string_array_field() {
    let schema = course_schema();

    let good = record! { name: "Node Fundamentals", tags: ["node", "backend"] };
    assert!(schema.validate(&good).is_ok());

    let bad = record! { name: "Node Fundamentals", tags: (Value::Array(vec![Value::I64(1)])) };
    let issues = schema.validate(&bad).unwrap_err();
    assert!(issues
        .iter()
        .any(|i| i.field() == "tags" && i.kind() == &ViolationKind::TypeMismatch));
}
