// Copyright @yucwang 2026

pub mod field;
pub mod transfer_function;
