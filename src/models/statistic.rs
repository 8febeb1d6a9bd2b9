//! Statistic model

use serde::{Deserialize, Serialize};

/// A headline number on the home and testimonials pages, e.g. "50K+".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Statistic {
    pub id: i64,
    pub label: String,
    pub value: String,
    /// e.g. "+", "%", "Cr"
    pub suffix: Option<String>,
    /// FontAwesome icon class
    pub icon: Option<String>,
    pub order_index: i64,
    pub is_active: bool,
}

impl Statistic {
    pub fn new(label: String, value: String) -> Self {
        Self {
            id: 0,
            label,
            value,
            suffix: None,
            icon: None,
            order_index: 0,
            is_active: true,
        }
    }
}
