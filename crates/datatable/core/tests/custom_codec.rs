use std::sync::Arc;

use datatable_core::codec::ByteCodec;
use datatable_core::{
    BlobFormat, ColumnCodec, DecodeError, LoadOptions, LookupError, MatrixLayout, ParseError,
    RowLayout, RowReader, Schema, TypeRegistry, Value, WriteError, decode_table, encode_table,
    load,
};

/// `percent`: text `"40%"`, one byte on the wire.
#[derive(Debug)]
struct PercentCodec;

impl ColumnCodec for PercentCodec {
    fn type_keyword(&self) -> &str {
        "percent"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let digits = text.trim().strip_suffix('%').unwrap_or(text.trim());
        match digits.parse::<u8>() {
            Ok(value) if value <= 100 => Ok(Value::U8(value)),
            Ok(_) => Err(ParseError::out_of_range("percent", text)),
            Err(_) => Err(ParseError::invalid("percent", text)),
        }
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        ByteCodec.write(value, sink)
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        ByteCodec.read(reader)
    }
}

fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    registry
        .register(&["percent", "pct"], Arc::new(PercentCodec))
        .expect("percent is not reserved");
    registry
}

#[test]
fn test_registered_codec_round_trips() {
    let registry = registry();
    let layout = MatrixLayout::new(0, 1, 3, 0).with_default_row(2);
    let text = "Id\tCrit\nid\tPct\n\t5%\n1\t40%\n2\t250%\n";

    let matrix = load(text, &LoadOptions::default(), &layout).unwrap();
    let schema = Schema::build(&matrix, &layout, &registry).unwrap();
    assert_eq!(schema.columns()[1].type_keyword, "percent");

    let table = encode_table(&matrix, &schema, BlobFormat::Raw).unwrap();
    assert_eq!(table.fallbacks.len(), 1);
    assert_eq!(table.blob, vec![2, 1, 40, 2, 2, 5]);

    let declared = RowLayout::declare(&registry, &[("Id", "id"), ("Crit", "percent")]).unwrap();
    let records = decode_table(&table.blob, &declared, BlobFormat::Raw).unwrap();
    assert_eq!(records[0].field::<u8>("Crit"), Ok(40));
    assert_eq!(records[1].field::<u8>("Crit"), Ok(5));
}

#[test]
fn test_identifier_keyword_cannot_be_replaced() {
    let mut registry = TypeRegistry::new();
    assert_eq!(
        registry.register(&["Id"], Arc::new(PercentCodec)),
        Err(LookupError::ReservedKeyword {
            keyword: "Id".to_owned()
        })
    );
    assert!(registry.resolve("id").unwrap().is_identifier());
}
