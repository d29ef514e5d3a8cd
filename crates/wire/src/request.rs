// SPDX-License-Identifier: MIT

use indexmap::IndexMap;

use crate::params::ParamValue;

/// One query as submitted to a lead or child queue, before
/// canonicalization against a specific engine.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub sql_template: String,
    pub params: IndexMap<String, ParamValue>,
}

impl QueryRequest {
    pub fn new(sql_template: impl Into<String>, params: IndexMap<String, ParamValue>) -> Self {
        Self {
            sql_template: sql_template.into(),
            params,
        }
    }
}
