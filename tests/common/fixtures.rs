//! Raw catalog documents used across harnesses.
//!
//! Each fixture is the JSON text a catalog source would hand over, dirt
//! included: sentinel strings, numeric codes, delimiter soup in services and
//! the occasional entry that is not a record at all.

use std::path::{Path, PathBuf};

use eir_core::Part;

use crate::common::builders::PartBuilder;

/// The single-record catalog from the product walkthrough.
pub fn scenario_part() -> Part {
    PartBuilder::new("zoll-1", "Sensor SpO2 Zoll")
        .provider("one direct")
        .machine("")
        .services(["uci"])
        .build()
}

/// A small, realistic raw catalog.
pub const RAW_CATALOG: &str = r#"[
  {
    "id": "p-001",
    "name": "Sensor SpO2 Zoll",
    "commonName": "Pinza de dedo adulto",
    "providerRef": "8000-0294",
    "internalCode": 40021,
    "provider": "one direct",
    "machine": "",
    "services": ["uci"],
    "price": 95.5,
    "category": "compras",
    "imageFile": "NaN"
  },
  {
    "id": "p-002",
    "name": "Válvula espiratoria",
    "commonName": "NaN",
    "providerRef": "ma-1181",
    "provider": "Dräger",
    "machine": "Respirador Evita",
    "services": "UCI, urg; Quirófano",
    "price": "120"
  },
  {
    "id": "p-003",
    "name": "Cable ECG 5 latiguillos",
    "providerRef": "M1668A",
    "provider": "Philips",
    "machine": "Monitor MX450",
    "services": ["URGENCIAS UCI REANIMACION"]
  },
  {
    "id": "p-004",
    "name": "Batería desfibrilador",
    "provider": "One Direct S.L.",
    "machine": "nan",
    "services": ["ext"]
  },
  {
    "id": "p-005",
    "name": "Filtro antibacteriano",
    "provider": "NaN",
    "machine": "SIN M√ÅQUINA",
    "services": ["nan"]
  },
  {
    "id": "p-002",
    "name": "Tubuladura paciente",
    "provider": "survival",
    "machine": "Respirador Evita",
    "services": ["Consultas Externas", "uci"]
  },
  "not a record",
  { "name": "NaN", "provider": "Philips" }
]"#;

/// Number of entries in [`RAW_CATALOG`] that become parts.
pub const RAW_CATALOG_ACCEPTED: usize = 6;

/// A document that parses but is not a catalog.
pub const RAW_NOT_AN_ARRAY: &str = r#"{"parts": [{"name": "Sensor"}]}"#;

/// Write `contents` to `name` inside `dir`, returning the path.
pub fn write_catalog(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write catalog fixture");
    path
}
