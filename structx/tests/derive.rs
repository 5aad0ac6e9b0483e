//! Shapes generated by `#[derive(Walk)]`

use structx::{fields, Describe, Shape, TagRule, TypeDesc, Walk};

#[derive(Walk)]
pub struct Renamed {
    #[structs(rename = "Name")]
    pub name: String,
    #[structs(rename = "Type", omitnested)]
    pub kind: Point,
}

#[derive(Walk)]
pub struct Point(pub i32, pub i32);

#[derive(Walk)]
pub struct Secretive {
    pub visible: u8,
    hidden: u8,
    pub(crate) shared: u8,
}

impl Secretive {
    fn new() -> Self {
        Self {
            visible: 1,
            hidden: 2,
            shared: 3,
        }
    }

    fn hidden(&self) -> u8 {
        self.hidden
    }
}

#[derive(Walk)]
pub struct Wrapper<T> {
    pub inner: T,
    pub items: Vec<T>,
}

#[derive(Walk)]
pub struct Marker;

#[derive(Walk)]
pub struct Keyword {
    pub r#type: String,
}

#[test]
fn rename_overrides_path_segment() {
    let value = Renamed {
        name: "n".to_string(),
        kind: Point(1, 2),
    };
    let values = fields(&value);
    assert_eq!(values.paths(), vec!["Renamed.Name", "Renamed.Type"]);
    assert_eq!(
        values.get("Renamed.Type").unwrap().tag().rule(),
        TagRule::OmitNested
    );
}

#[test]
fn tuple_fields_use_their_index() {
    let values = fields(&Point(3, 4));
    assert_eq!(values.paths(), vec!["Point.0", "Point.1"]);
    assert_eq!(values.get_as::<i32>("Point.1").unwrap(), &4);
}

#[test]
fn private_fields_are_inaccessible() {
    let value = Secretive::new();
    assert_eq!(value.hidden(), 2);

    match value.shape() {
        Shape::Struct(shape) => {
            let names: Vec<&str> = shape.fields().iter().map(|f| f.name()).collect();
            assert_eq!(names, vec!["visible", "hidden", "shared"]);
            assert!(!shape.fields()[1].value().shape().is_valid());
        }
        other => panic!("expected struct, got {:?}", other),
    }

    let values = fields(&value);
    assert_eq!(values.paths(), vec!["Secretive.shared", "Secretive.visible"]);
}

#[test]
fn generic_structs_walk_their_parameters() {
    #[derive(Walk)]
    pub struct Item {
        pub id: u32,
    }

    let value = Wrapper {
        inner: Item { id: 1 },
        items: vec![Item { id: 2 }],
    };
    let values = fields(&value);
    assert_eq!(values.paths(), vec!["Wrapper.inner.id", "Wrapper.items[0].id"]);
    assert_eq!(Wrapper::<Item>::describe(), TypeDesc::Struct("Wrapper"));
}

#[test]
fn unit_struct_has_no_fields() {
    assert!(fields(&Marker).is_empty());
    assert_eq!(Marker::describe(), TypeDesc::Struct("Marker"));
}

#[test]
fn raw_identifiers_are_unescaped() {
    let value = Keyword {
        r#type: "t".to_string(),
    };
    assert_eq!(fields(&value).paths(), vec!["Keyword.type"]);
}

#[test]
fn derived_values_downcast() {
    let point = Point(5, 6);
    let any = point.as_any().unwrap();
    assert_eq!(any.downcast_ref::<Point>().map(|p| p.0), Some(5));
    assert_eq!(Vec::<Point>::describe(), TypeDesc::sequence(TypeDesc::Struct("Point")));
}
