use odata_json::{
    EdmModel, Error, MetadataLevel, ODataWriter, Options, PathSegment, PrimitiveKind, Property,
    QueryShape, Resource, SelectExpandTree, SelectItem, StructuredType, Value,
};

fn model() -> EdmModel {
    EdmModel::new()
        .with_type(
            StructuredType::new("Order")
                .with_structural(Property::primitive("Id", PrimitiveKind::Int32))
                .with_structural(Property::primitive("Total", PrimitiveKind::Decimal))
                .with_structural(Property::complex("ShipTo", "Address"))
                .with_navigation(Property::navigation("Customer", "Customer"))
                .with_navigation(Property::navigation("Lines", "OrderLine").as_collection()),
        )
        .with_type(
            StructuredType::new("Address")
                .with_structural(Property::primitive("City", PrimitiveKind::String))
                .with_structural(Property::primitive("Zip", PrimitiveKind::String)),
        )
        .with_type(
            StructuredType::new("Customer")
                .with_structural(Property::primitive("Name", PrimitiveKind::String)),
        )
        .with_type(
            StructuredType::new("OrderLine")
                .with_structural(Property::primitive("Sku", PrimitiveKind::String))
                .with_structural(Property::primitive("Qty", PrimitiveKind::Int32)),
        )
}

fn order() -> Resource {
    Resource::new("Order")
        .with_property(
            "ShipTo",
            Value::Resource(
                Resource::new("Address")
                    .with_property("City", Value::String("Berlin".into()))
                    .with_property("Zip", Value::String("12209".into())),
            ),
        )
        .with_property("Total", Value::Decimal("12.50".into()))
        .with_property("Id", Value::Int32(5))
        .with_property(
            "Customer",
            Value::Resource(
                Resource::new("Customer").with_property("Name", Value::String("Ana".into())),
            ),
        )
}

fn by_key_shape() -> QueryShape {
    QueryShape::new(
        "https://host/svc/",
        vec![
            PathSegment::EntitySet("Orders".into()),
            PathSegment::Key("5".into()),
        ],
    )
}

#[test]
fn default_shape_writes_structural_properties_in_declaration_order()
-> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    let json = writer.resource_to_string(&order(), &by_key_shape())?;
    assert_eq!(
        json,
        concat!(
            r#"{"@odata.context":"https://host/svc/$metadata#Orders('5')/$entity","#,
            r#""Id":5,"Total":12.50,"ShipTo":{"City":"Berlin","Zip":"12209"}}"#
        )
    );
    Ok(())
}

#[test]
fn etag_precedes_properties() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    let resource = Resource::new("Order")
        .with_etag("W/\"1\"")
        .with_property("Id", Value::Int32(5));
    let json = writer.resource_to_string(&resource, &by_key_shape())?;
    let etag_at = json.find("@odata.etag").unwrap();
    let id_at = json.find("\"Id\"").unwrap();
    assert!(etag_at < id_at);
    assert!(json.contains(r#""@odata.etag":"W/\"1\"""#));
    Ok(())
}

#[test]
fn metadata_none_drops_context_and_etag() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model).with_options(Options {
        metadata: MetadataLevel::None,
        ..Options::default()
    });
    let resource = Resource::new("Order")
        .with_etag("W/\"1\"")
        .with_property("Id", Value::Int32(5));
    let json = writer.resource_to_string(&resource, &by_key_shape())?;
    assert_eq!(json, r#"{"Id":5}"#);
    Ok(())
}

#[test]
fn selected_properties_precede_expanded_navigations() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    // Parser order has the expand first; the wire order must not.
    let shape = by_key_shape().with_select_expand(SelectExpandTree::new(vec![
        SelectItem::expand("Customer"),
        SelectItem::path("Id"),
    ]));
    let json = writer.resource_to_string(&order(), &shape)?;
    let id_at = json.find("\"Id\"").unwrap();
    let customer_at = json.find("\"Customer\"").unwrap();
    assert!(id_at < customer_at);
    assert!(json.contains(r#""Customer":{"Name":"Ana"}"#));
    Ok(())
}

#[test]
fn nested_select_restricts_a_complex_property() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    let shape = by_key_shape().with_select_expand(SelectExpandTree::new(vec![
        SelectItem::path_with(
            "ShipTo",
            SelectExpandTree::new(vec![SelectItem::path("City")]),
        ),
    ]));
    let json = writer.resource_to_string(&order(), &shape)?;
    assert!(json.contains(r#""ShipTo":{"City":"Berlin"}"#));
    assert!(!json.contains("Zip"));
    Ok(())
}

#[test]
fn wildcard_selects_all_structural_properties_but_no_navigations()
-> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    let shape =
        by_key_shape().with_select_expand(SelectExpandTree::new(vec![SelectItem::Wildcard]));
    let json = writer.resource_to_string(&order(), &shape)?;
    assert!(json.contains("\"Id\""));
    assert!(json.contains("\"Total\""));
    assert!(json.contains("\"ShipTo\""));
    assert!(!json.contains("\"Customer\""));
    Ok(())
}

#[test]
fn empty_tree_selects_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model).with_options(Options {
        metadata: MetadataLevel::None,
        ..Options::default()
    });
    let shape = by_key_shape().with_select_expand(SelectExpandTree::new(vec![]));
    let json = writer.resource_to_string(&order(), &shape)?;
    assert_eq!(json, "{}");
    Ok(())
}

#[test]
fn undeclared_selection_on_a_closed_type_fails_the_write() {
    let model = model();
    let writer = ODataWriter::new(&model);
    let shape = by_key_shape()
        .with_select_expand(SelectExpandTree::new(vec![SelectItem::path("Nope")]));
    let err = writer.resource_to_string(&order(), &shape).unwrap_err();
    assert!(matches!(
        err,
        Error::UndeclaredProperty { ref type_name, ref property }
            if type_name == "Order" && property == "Nope"
    ));
}

#[test]
fn wildcard_does_not_mask_an_undeclared_selection() {
    let model = model();
    let writer = ODataWriter::new(&model);
    let shape = by_key_shape().with_select_expand(SelectExpandTree::new(vec![
        SelectItem::Wildcard,
        SelectItem::path("Nope"),
    ]));
    let err = writer.resource_to_string(&order(), &shape).unwrap_err();
    assert!(matches!(
        err,
        Error::UndeclaredProperty { ref type_name, ref property }
            if type_name == "Order" && property == "Nope"
    ));
}

#[test]
fn wildcard_tolerates_explicit_paths_on_an_open_type() -> Result<(), Box<dyn std::error::Error>> {
    let model = EdmModel::new().with_type(
        StructuredType::new("Bag")
            .open()
            .with_structural(Property::primitive("Id", PrimitiveKind::Int32)),
    );
    let writer = ODataWriter::new(&model);
    let shape = QueryShape::new(
        "https://host/svc/",
        vec![PathSegment::EntitySet("Bags".into())],
    )
    .with_select_expand(SelectExpandTree::new(vec![
        SelectItem::Wildcard,
        SelectItem::path("Color"),
    ]));
    let resource = Resource::new("Bag").with_property("Id", Value::Int32(1));
    let json = writer.resource_to_string(&resource, &shape)?;
    assert!(json.contains(r#""Id":1"#));
    Ok(())
}

#[test]
fn open_types_write_selected_dynamic_values() -> Result<(), Box<dyn std::error::Error>> {
    let model = EdmModel::new().with_type(
        StructuredType::new("Bag")
            .open()
            .with_structural(Property::primitive("Id", PrimitiveKind::Int32)),
    );
    let writer = ODataWriter::new(&model);
    let shape = QueryShape::new(
        "https://host/svc/",
        vec![PathSegment::EntitySet("Bags".into())],
    )
    .with_select_expand(SelectExpandTree::new(vec![
        SelectItem::path("Id"),
        SelectItem::path("Color"),
    ]));
    let resource = Resource::new("Bag")
        .with_property("Id", Value::Int32(1))
        .with_property("Color", Value::String("teal".into()));
    let json = writer.resource_to_string(&resource, &shape)?;
    assert!(json.contains(r#""Color":"teal""#));
    Ok(())
}

#[test]
fn selected_navigation_without_expand_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
    let model = model();
    let writer = ODataWriter::new(&model);
    let shape = by_key_shape().with_select_expand(SelectExpandTree::new(vec![
        SelectItem::path("Id"),
        SelectItem::path("Customer"),
    ]));
    let json = writer.resource_to_string(&order(), &shape)?;
    assert!(json.contains("\"Id\""));
    assert!(!json.contains("\"Customer\""));
    Ok(())
}

#[test]
fn top_level_dispatcher_rejects_non_structured_payloads() {
    let model = model();
    let writer = ODataWriter::new(&model);
    let mut sink = odata_json::TextSink::new(Vec::new());
    let err = writer
        .write_value(&Value::Int32(5), &by_key_shape(), &mut sink)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedPayload("int32")));
}
