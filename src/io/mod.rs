// Copyright @yucwang 2026

pub mod params_xml;
