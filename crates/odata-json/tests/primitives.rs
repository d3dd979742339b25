use chrono::{FixedOffset, TimeZone};

use odata_json::{
    EdmModel, Error, MetadataLevel, ODataWriter, Options, PathSegment, PrimitiveKind, Property,
    QueryShape, Resource, StructuredType, Value,
};

fn model() -> EdmModel {
    EdmModel::new().with_type(
        StructuredType::new("Sample")
            .with_structural(Property::primitive("Flag", PrimitiveKind::Boolean))
            .with_structural(Property::primitive("Small", PrimitiveKind::Int32))
            .with_structural(Property::primitive("Big", PrimitiveKind::Int64))
            .with_structural(Property::primitive("Ratio", PrimitiveKind::Double))
            .with_structural(Property::primitive("Price", PrimitiveKind::Decimal))
            .with_structural(Property::primitive("Name", PrimitiveKind::String))
            .with_structural(Property::primitive("Blob", PrimitiveKind::Binary))
            .with_structural(Property::primitive("Seen", PrimitiveKind::DateTimeOffset))
            .with_structural(Property::primitive("Codes", PrimitiveKind::Int32).as_collection()),
    )
}

fn shape() -> QueryShape {
    QueryShape::new(
        "https://host/svc/",
        vec![PathSegment::EntitySet("Samples".into())],
    )
}

fn quiet_writer(model: &EdmModel) -> ODataWriter<'_> {
    ODataWriter::new(model).with_options(Options {
        metadata: MetadataLevel::None,
        ..Options::default()
    })
}

#[test]
fn scalar_kinds_take_their_wire_forms() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = quiet_writer(&model);
    let seen = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
        .unwrap();
    let resource = Resource::new("Sample")
        .with_property("Flag", Value::Boolean(true))
        .with_property("Small", Value::Int32(-7))
        .with_property("Big", Value::Int64(9_007_199_254_740_993))
        .with_property("Ratio", Value::Double(1.5))
        .with_property("Price", Value::Decimal("12.50".into()))
        .with_property("Name", Value::String("a \"b\"\n".into()))
        .with_property("Blob", Value::Binary(b"hello".to_vec()))
        .with_property("Seen", Value::DateTimeOffset(seen))
        .with_property(
            "Codes",
            Value::Collection(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]),
        );
    let json = writer.resource_to_string(&resource, &shape())?;
    assert_eq!(
        json,
        concat!(
            r#"{"Flag":true,"Small":-7,"Big":9007199254740993,"Ratio":1.5,"#,
            r#""Price":12.50,"Name":"a \"b\"\n","Blob":"aGVsbG8","#,
            r#""Seen":"2024-01-02T03:04:05Z","Codes":[1,2,3]}"#
        )
    );
    Ok(())
}

#[test]
fn null_properties_are_emitted_as_null() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = quiet_writer(&model);
    let resource = Resource::new("Sample").with_property("Name", Value::Null);
    let json = writer.resource_to_string(&resource, &shape())?;
    assert_eq!(json, r#"{"Name":null}"#);
    Ok(())
}

#[test]
fn non_finite_doubles_take_their_string_spellings() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = quiet_writer(&model);
    let resource = Resource::new("Sample")
        .with_property("Ratio", Value::Double(f64::INFINITY));
    assert_eq!(
        writer.resource_to_string(&resource, &shape())?,
        r#"{"Ratio":"INF"}"#
    );

    let resource = Resource::new("Sample")
        .with_property("Ratio", Value::Double(f64::NEG_INFINITY));
    assert_eq!(
        writer.resource_to_string(&resource, &shape())?,
        r#"{"Ratio":"-INF"}"#
    );

    let resource = Resource::new("Sample").with_property("Ratio", Value::Double(f64::NAN));
    assert_eq!(
        writer.resource_to_string(&resource, &shape())?,
        r#"{"Ratio":"NaN"}"#
    );
    Ok(())
}

#[test]
fn ieee754_compatible_quotes_int64_and_decimal() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model).with_options(Options {
        metadata: MetadataLevel::None,
        ieee754_compatible: true,
    });
    let resource = Resource::new("Sample")
        .with_property("Big", Value::Int64(42))
        .with_property("Price", Value::Decimal("12.50".into()));
    let json = writer.resource_to_string(&resource, &shape())?;
    assert_eq!(json, r#"{"Big":"42","Price":"12.50"}"#);
    Ok(())
}

#[test]
fn malformed_decimal_literal_fails_the_write() {
    let model = model();
    let writer = quiet_writer(&model);
    let resource = Resource::new("Sample").with_property("Price", Value::Decimal("12,50".into()));
    let err = writer.resource_to_string(&resource, &shape()).unwrap_err();
    assert!(matches!(err, Error::InvalidDecimal(lit) if lit == "12,50"));
}
