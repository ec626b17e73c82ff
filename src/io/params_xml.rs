// Copyright @yucwang 2026

//! Loads a renderer type and its parameter set from an XML fragment:
//!
//! ```xml
//! <renderer type="research_volume">
//!     <default name="spr" value="64"/>
//!     <integer name="volumeSamplesPerRay" value="$spr"/>
//!     <rgb name="bgColor" value="0, 0, 0"/>
//!     <ivector name="volumeDimensions" value="64, 64, 32"/>
//!     <boolean name="shadingEnabled" value="true"/>
//! </renderer>
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use crate::core::params::{ParamValue, ParameterSet};
use crate::math::constants::{Float, Int, Vector3f, Vector3i};

#[derive(Error, Debug)]
pub enum ParamsLoadError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed xml: {0}")]
    Xml(String),
    #[error("invalid value: {0}")]
    Parse(String),
    #[error("<{tag}> is missing the `{attribute}` attribute")]
    MissingAttribute { tag: String, attribute: &'static str },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RendererDescription {
    pub renderer_type: Option<String>,
    pub params: ParameterSet,
}

pub fn load_params<P: AsRef<Path>>(path: P) -> Result<RendererDescription, ParamsLoadError> {
    let xml = fs::read_to_string(path.as_ref())?;
    parse_params(&xml)
}

pub fn parse_params(xml: &str) -> Result<RendererDescription, ParamsLoadError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    let mut defaults: HashMap<String, String> = HashMap::new();
    let mut description = RendererDescription::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                let mut name: Option<String> = None;
                let mut value: Option<String> = None;
                let mut kind: Option<String> = None;
                for attr in e.attributes().flatten() {
                    let text = attr.unescape_value().unwrap_or_default().to_string();
                    match attr.key.as_ref() {
                        b"name" => name = Some(text),
                        b"value" => value = Some(text),
                        b"type" => kind = Some(text),
                        _ => {}
                    }
                }

                match tag.as_str() {
                    "renderer" => {
                        description.renderer_type = kind.map(|k| resolve_value(&k, &defaults));
                    }
                    "default" => {
                        let name = name.ok_or_else(|| missing(&tag, "name"))?;
                        let value = value.ok_or_else(|| missing(&tag, "value"))?;
                        defaults.insert(name, value);
                    }
                    "float" | "integer" | "boolean" | "rgb" | "vector" | "ivector" => {
                        let name = name.ok_or_else(|| missing(&tag, "name"))?;
                        let raw = value.ok_or_else(|| missing(&tag, "value"))?;
                        let param = parse_value(&tag, &resolve_value(&raw, &defaults))?;
                        description.params.set(&name, param);
                    }
                    _ => log::debug!("Ignoring <{}> in parameter file.", tag),
                }
            }
            Err(e) => {
                return Err(ParamsLoadError::Xml(e.to_string()));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(description)
}

fn missing(tag: &str, attribute: &'static str) -> ParamsLoadError {
    ParamsLoadError::MissingAttribute { tag: tag.to_string(), attribute }
}

fn resolve_value(raw: &str, defaults: &HashMap<String, String>) -> String {
    let mut out = raw.to_string();
    for (k, v) in defaults {
        out = out.replace(&format!("${}", k), v);
    }
    out
}

fn parse_value(tag: &str, value: &str) -> Result<ParamValue, ParamsLoadError> {
    match tag {
        "float" => Ok(ParamValue::Float(parse_float(value)?)),
        "integer" => Ok(ParamValue::Int(parse_int(value)?)),
        "boolean" => parse_bool(value).map(ParamValue::Bool),
        "ivector" => {
            let [x, y, z] = split3(value)?;
            Ok(ParamValue::Vec3i(Vector3i::new(parse_int(x)?, parse_int(y)?, parse_int(z)?)))
        }
        _ => {
            let [x, y, z] = split3(value)?;
            Ok(ParamValue::Vec3f(Vector3f::new(parse_float(x)?, parse_float(y)?, parse_float(z)?)))
        }
    }
}

fn parse_float(value: &str) -> Result<Float, ParamsLoadError> {
    value.trim().parse::<Float>().map_err(|_| ParamsLoadError::Parse(format!("invalid float: {}", value)))
}

fn parse_int(value: &str) -> Result<Int, ParamsLoadError> {
    value.trim().parse::<Int>().map_err(|_| ParamsLoadError::Parse(format!("invalid integer: {}", value)))
}

fn parse_bool(value: &str) -> Result<bool, ParamsLoadError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(ParamsLoadError::Parse(format!("invalid boolean: {}", other))),
    }
}

fn split3(value: &str) -> Result<[&str; 3], ParamsLoadError> {
    let parts: Vec<&str> = value
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    match parts.as_slice() {
        [x, y, z] => Ok([*x, *y, *z]),
        _ => Err(ParamsLoadError::Parse(format!("expected three components: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind() {
        let xml = r#"
            <renderer type="research_volume">
                <default name="spr" value="64"/>
                <integer name="volumeSamplesPerRay" value="$spr"/>
                <float name="aoWeight" value="0.5"/>
                <boolean name="electronShading" value="true"/>
                <rgb name="bgColor" value="0.1, 0.2, 0.3"/>
                <ivector name="volumeDimensions" value="4 5 6"/>
            </renderer>
        "#;
        let desc = parse_params(xml).expect("parse");
        assert_eq!(desc.renderer_type.as_deref(), Some("research_volume"));
        assert_eq!(desc.params.get_int("volumeSamplesPerRay", 0), Ok(64));
        assert_eq!(desc.params.get_float("aoWeight", 0.0), Ok(0.5));
        assert_eq!(desc.params.get_bool("electronShading", false), Ok(true));
        assert_eq!(desc.params.get_vec3f("bgColor", Vector3f::zeros()), Ok(Vector3f::new(0.1, 0.2, 0.3)));
        assert_eq!(desc.params.get_vec3i("volumeDimensions", Vector3i::zeros()), Ok(Vector3i::new(4, 5, 6)));
    }

    #[test]
    fn missing_value_is_reported() {
        let err = parse_params(r#"<renderer><float name="aoWeight"/></renderer>"#).err();
        assert!(matches!(err, Some(ParamsLoadError::MissingAttribute { attribute: "value", .. })));
    }

    #[test]
    fn bad_number_is_reported() {
        let err = parse_params(r#"<renderer><integer name="spp" value="four"/></renderer>"#).err();
        assert!(matches!(err, Some(ParamsLoadError::Parse(_))));
    }
}
